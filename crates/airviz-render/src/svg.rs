// File: crates/airviz-render/src/svg.rs
// Summary: Frame -> standalone SVG document through plotters' SVGBackend (grid, clipped primitives, axes, legend).

use airviz_core::axis::Axis;
use airviz_core::geometry::{Frame, Primitive, Rect};
use anyhow::{anyhow, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::theme::{Rgba, Theme};

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const FONT: &str = "sans-serif";
const LEGEND_ROW_PX: f64 = 20.0;
const SWATCH_PX: i32 = 12;

fn px(x: f64, y: f64) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

// Plotters draws in backend pixels without clipping, so primitives are pinned
// to the plot rectangle before they are handed over.
fn pin(plot: &Rect, (x, y): (f64, f64)) -> (i32, i32) {
    px(x.clamp(plot.left, plot.right), y.clamp(plot.top, plot.bottom))
}

fn text_style(size: f64, color: Rgba, h: HPos, v: VPos) -> TextStyle<'static> {
    (FONT, size).into_font().color(&color.to_plotters()).pos(Pos::new(h, v))
}

fn backend_err(e: impl std::fmt::Display) -> anyhow::Error {
    anyhow!("svg backend: {e}")
}

fn draw_primitive(root: &Area, plot: &Rect, p: &Primitive, theme: &Theme) -> Result<()> {
    match p {
        Primitive::Area { color, points, baseline, .. } => {
            let (Some(first), Some(last)) = (points.first(), points.last()) else { return Ok(()) };
            let mut outline: Vec<(i32, i32)> = points.iter().map(|&pt| pin(plot, pt)).collect();
            outline.push(pin(plot, (last.0, *baseline)));
            outline.push(pin(plot, (first.0, *baseline)));
            root.draw(&Polygon::new(outline, theme.series(*color).to_plotters().filled())).map_err(backend_err)?;
        }
        Primitive::Path { color, points, width, .. } => {
            if points.len() < 2 {
                return Ok(());
            }
            let line: Vec<(i32, i32)> = points.iter().map(|&pt| pin(plot, pt)).collect();
            let style = theme.series(*color).to_plotters().stroke_width(width.round().max(1.0) as u32);
            root.draw(&PathElement::new(line, style)).map_err(backend_err)?;
        }
        Primitive::Rect { color, rect, .. } => {
            let corners = [pin(plot, (rect.left, rect.top)), pin(plot, (rect.right, rect.bottom))];
            root.draw(&Rectangle::new(corners, theme.series(*color).to_plotters().filled())).map_err(backend_err)?;
        }
        Primitive::Circle { color, cx, cy, r, highlighted, .. } => {
            if !plot.contains(*cx, *cy) {
                return Ok(());
            }
            let center = px(*cx, *cy);
            let radius = (if *highlighted { r * 1.5 } else { *r }).round() as i32;
            root.draw(&Circle::new(center, radius, theme.series(*color).to_plotters().filled())).map_err(backend_err)?;
            if *highlighted {
                root.draw(&Circle::new(center, radius, theme.highlight.to_plotters().stroke_width(2)))
                    .map_err(backend_err)?;
            }
        }
        Primitive::Brush { rect } => {
            let corners = [pin(plot, (rect.left, rect.top)), pin(plot, (rect.right, rect.bottom))];
            root.draw(&Rectangle::new(corners, theme.brush_fill.to_plotters().filled())).map_err(backend_err)?;
            root.draw(&Rectangle::new(corners, theme.brush_stroke.to_plotters().stroke_width(1)))
                .map_err(backend_err)?;
        }
    }
    Ok(())
}

fn draw_grid(root: &Area, frame: &Frame, theme: &Theme) -> Result<()> {
    let p = &frame.plot;
    let style = theme.grid.to_plotters().stroke_width(1);
    for t in frame.y_axis.ticks.iter().filter(|t| t.position >= p.top - 0.5 && t.position <= p.bottom + 0.5) {
        root.draw(&PathElement::new(vec![px(p.left, t.position), px(p.right, t.position)], style))
            .map_err(backend_err)?;
    }
    Ok(())
}

fn draw_axes(root: &Area, plot: &Rect, x: &Axis, y: &Axis, theme: &Theme) -> Result<()> {
    let (l, t, r, b) = (plot.left, plot.top, plot.right, plot.bottom);
    let axis = theme.axis_line.to_plotters().stroke_width(1);
    let tick = theme.tick.to_plotters().stroke_width(1);
    root.draw(&PathElement::new(vec![px(l, b), px(r, b)], axis)).map_err(backend_err)?;
    root.draw(&PathElement::new(vec![px(l, t), px(l, b)], axis)).map_err(backend_err)?;

    let x_label = text_style(10.0, theme.axis_label, HPos::Center, VPos::Top);
    for k in x.ticks.iter().filter(|k| k.position >= l - 0.5 && k.position <= r + 0.5) {
        root.draw(&PathElement::new(vec![px(k.position, b), px(k.position, b + 6.0)], tick)).map_err(backend_err)?;
        root.draw(&Text::new(k.label.clone(), px(k.position, b + 8.0), x_label.clone())).map_err(backend_err)?;
    }
    let y_label = text_style(10.0, theme.axis_label, HPos::Right, VPos::Center);
    for k in y.ticks.iter().filter(|k| k.position >= t - 0.5 && k.position <= b + 0.5) {
        root.draw(&PathElement::new(vec![px(l - 6.0, k.position), px(l, k.position)], tick)).map_err(backend_err)?;
        root.draw(&Text::new(k.label.clone(), px(l - 9.0, k.position), y_label.clone())).map_err(backend_err)?;
    }

    if !x.label.is_empty() {
        let style = text_style(12.0, theme.axis_label, HPos::Center, VPos::Top);
        root.draw(&Text::new(x.label.clone(), px((l + r) / 2.0, b + 26.0), style)).map_err(backend_err)?;
    }
    if !y.label.is_empty() {
        let style = text_style(12.0, theme.axis_label, HPos::Left, VPos::Bottom);
        root.draw(&Text::new(y.label.clone(), px(l + 3.0, t - 6.0), style)).map_err(backend_err)?;
    }
    Ok(())
}

fn draw_legend(root: &Area, frame: &Frame, theme: &Theme) -> Result<()> {
    let x = frame.plot.right + 10.0;
    let label = text_style(12.0, theme.axis_label, HPos::Left, VPos::Top);
    for (i, name) in frame.legend.iter().enumerate() {
        let (sx, sy) = px(x, frame.plot.top + i as f64 * LEGEND_ROW_PX);
        root.draw(&Rectangle::new([(sx, sy), (sx + SWATCH_PX, sy + SWATCH_PX)], theme.series(i).to_plotters().filled()))
            .map_err(backend_err)?;
        root.draw(&Text::new(name.clone(), (sx + SWATCH_PX + 4, sy), label.clone())).map_err(backend_err)?;
    }

    if !frame.title.is_empty() {
        let style = text_style(16.0, theme.axis_label, HPos::Center, VPos::Center);
        let at = px(frame.width / 2.0, (frame.plot.top / 2.0).max(14.0));
        root.draw(&Text::new(frame.title.clone(), at, style)).map_err(backend_err)?;
    }
    Ok(())
}

fn paint(root: &Area, frame: &Frame, theme: &Theme) -> Result<()> {
    root.fill(&theme.background.to_plotters()).map_err(backend_err)?;
    draw_grid(root, frame, theme)?;
    for p in &frame.primitives {
        draw_primitive(root, &frame.plot, p, theme)?;
    }
    draw_axes(root, &frame.plot, &frame.x_axis, &frame.y_axis, theme)?;
    draw_legend(root, frame, theme)?;
    root.present().map_err(backend_err)?;
    Ok(())
}

/// Render `frame` as a standalone SVG document.
pub fn render_svg(frame: &Frame, theme: &Theme) -> Result<String> {
    let size = (frame.width.round().max(1.0) as u32, frame.height.round().max(1.0) as u32);
    let mut doc = String::new();
    {
        let root = SVGBackend::with_string(&mut doc, size).into_drawing_area();
        paint(&root, frame, theme)?;
    }
    Ok(doc)
}

/// Render `frame` to an SVG file at `path`, creating parent directories.
pub fn render_svg_file(frame: &Frame, theme: &Theme, path: impl AsRef<std::path::Path>) -> Result<()> {
    let doc = render_svg(frame, theme)?;
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path.as_ref(), doc)?;
    tracing::debug!("wrote {} ({} primitives)", path.as_ref().display(), frame.primitives.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_keeps_points_inside_plot() {
        let plot = Rect::from_ltrb(10.0, 20.0, 110.0, 220.0);
        assert_eq!(pin(&plot, (-50.0, 500.0)), (10, 220));
        assert_eq!(pin(&plot, (60.4, 99.6)), (60, 100));
    }

    #[test]
    fn document_has_requested_size() {
        let frame = Frame {
            title: "t".into(),
            width: 200.0,
            height: 100.0,
            plot: Rect::from_ltrb(20.0, 10.0, 180.0, 80.0),
            primitives: vec![],
            x_axis: Axis { label: String::new(), min: 0.0, max: 1.0, ticks: vec![] },
            y_axis: Axis { label: String::new(), min: 0.0, max: 1.0, ticks: vec![] },
            legend: vec![],
        };
        let doc = render_svg(&frame, &Theme::light()).expect("render");
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains("width=\"200\"") && doc.contains("height=\"100\""));
        assert!(doc.trim_end().ends_with("</svg>"));
    }
}
