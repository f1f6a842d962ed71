// File: crates/airviz-render/src/png.rs
// Summary: Headless PNG rasterization of a Frame using Skia CPU raster surfaces.

use airviz_core::axis::Axis;
use airviz_core::geometry::{Frame, Primitive, Rect};
use anyhow::Result;
use skia_safe as skia;

use crate::theme::Theme;

fn sk_rect(r: &Rect) -> skia::Rect {
    skia::Rect::from_ltrb(r.left as f32, r.top as f32, r.right as f32, r.bottom as f32)
}

fn polyline(points: &[(f64, f64)]) -> Option<skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut path = skia::Path::new();
    path.move_to((first.0 as f32, first.1 as f32));
    for &(x, y) in rest {
        path.line_to((x as f32, y as f32));
    }
    Some(path)
}

/// Render `frame` to PNG bytes.
pub fn render_png_bytes(frame: &Frame, theme: &Theme) -> Result<Vec<u8>> {
    let (w, h) = (frame.width.round() as i32, frame.height.round() as i32);
    let mut surface = skia::surfaces::raster_n32_premul((w.max(1), h.max(1)))
        .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
    let canvas = surface.canvas();
    canvas.clear(theme.background.to_skia());

    draw_grid(canvas, frame, theme);

    canvas.save();
    canvas.clip_rect(sk_rect(&frame.plot), None, Some(true));
    for p in &frame.primitives {
        draw_primitive(canvas, p, theme);
    }
    canvas.restore();

    draw_axes(canvas, &frame.plot, &frame.x_axis, &frame.y_axis, theme);
    draw_legend(canvas, frame, theme);

    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
    Ok(data.as_bytes().to_vec())
}

/// Render `frame` to a PNG at `path`, creating parent directories.
pub fn render_png(frame: &Frame, theme: &Theme, path: impl AsRef<std::path::Path>) -> Result<()> {
    let bytes = render_png_bytes(frame, theme)?;
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

// ---- helpers ----------------------------------------------------------------

fn draw_grid(canvas: &skia::Canvas, frame: &Frame, theme: &Theme) {
    let mut paint = skia::Paint::default();
    paint.set_color(theme.grid.to_skia());
    paint.set_anti_alias(true);
    paint.set_stroke_width(1.0);
    let p = &frame.plot;
    for t in &frame.y_axis.ticks {
        let y = t.position as f32;
        canvas.draw_line((p.left as f32, y), (p.right as f32, y), &paint);
    }
}

fn draw_primitive(canvas: &skia::Canvas, p: &Primitive, theme: &Theme) {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    match p {
        Primitive::Area { color, points, baseline, .. } => {
            let (Some(first), Some(last)) = (points.first(), points.last()) else { return };
            let Some(mut path) = polyline(points) else { return };
            path.line_to((last.0 as f32, *baseline as f32));
            path.line_to((first.0 as f32, *baseline as f32));
            path.close();
            paint.set_style(skia::paint::Style::Fill);
            paint.set_color(theme.series(*color).to_skia());
            canvas.draw_path(&path, &paint);
        }
        Primitive::Path { color, points, width, .. } => {
            let Some(path) = polyline(points) else { return };
            paint.set_style(skia::paint::Style::Stroke);
            paint.set_stroke_width(*width as f32);
            paint.set_color(theme.series(*color).to_skia());
            canvas.draw_path(&path, &paint);
        }
        Primitive::Rect { color, rect, .. } => {
            paint.set_style(skia::paint::Style::Fill);
            paint.set_color(theme.series(*color).to_skia());
            canvas.draw_rect(sk_rect(rect), &paint);
        }
        Primitive::Circle { color, cx, cy, r, highlighted, .. } => {
            let radius = (if *highlighted { r * 1.5 } else { *r }) as f32;
            paint.set_style(skia::paint::Style::Fill);
            paint.set_color(theme.series(*color).to_skia());
            canvas.draw_circle((*cx as f32, *cy as f32), radius, &paint);
            if *highlighted {
                paint.set_style(skia::paint::Style::Stroke);
                paint.set_stroke_width(1.5);
                paint.set_color(theme.highlight.to_skia());
                canvas.draw_circle((*cx as f32, *cy as f32), radius, &paint);
            }
        }
        Primitive::Brush { rect } => {
            paint.set_style(skia::paint::Style::Fill);
            paint.set_color(theme.brush_fill.to_skia());
            canvas.draw_rect(sk_rect(rect), &paint);
            paint.set_style(skia::paint::Style::Stroke);
            paint.set_stroke_width(1.0);
            paint.set_color(theme.brush_stroke.to_skia());
            canvas.draw_rect(sk_rect(rect), &paint);
        }
    }
}

fn draw_axes(canvas: &skia::Canvas, plot: &Rect, x: &Axis, y: &Axis, theme: &Theme) {
    let (l, t, r, b) = (plot.left as f32, plot.top as f32, plot.right as f32, plot.bottom as f32);

    let mut axis_paint = skia::Paint::default();
    axis_paint.set_color(theme.axis_line.to_skia());
    axis_paint.set_anti_alias(true);
    axis_paint.set_stroke_width(1.5);
    canvas.draw_line((l, b), (r, b), &axis_paint);
    canvas.draw_line((l, t), (l, b), &axis_paint);

    let mut tick_paint = skia::Paint::default();
    tick_paint.set_color(theme.tick.to_skia());
    tick_paint.set_anti_alias(true);

    let mut text = skia::Paint::default();
    text.set_color(theme.axis_label.to_skia());
    text.set_anti_alias(true);
    let mut font = skia::Font::default();
    font.set_size(11.0);

    for tick in x.ticks.iter().filter(|k| k.position >= plot.left - 0.5 && k.position <= plot.right + 0.5) {
        let px = tick.position as f32;
        canvas.draw_line((px, b), (px, b + 6.0), &tick_paint);
        let (w, _) = font.measure_str(&tick.label, Some(&text));
        canvas.draw_str(&tick.label, (px - w / 2.0, b + 18.0), &font, &text);
    }
    for tick in y.ticks.iter().filter(|k| k.position >= plot.top - 0.5 && k.position <= plot.bottom + 0.5) {
        let py = tick.position as f32;
        canvas.draw_line((l - 6.0, py), (l, py), &tick_paint);
        let (w, _) = font.measure_str(&tick.label, Some(&text));
        canvas.draw_str(&tick.label, (l - 9.0 - w, py + 4.0), &font, &text);
    }

    font.set_size(13.0);
    canvas.draw_str(&x.label, (r - 80.0, b + 36.0), &font, &text);
    canvas.draw_str(&y.label, (l + 3.0, t - 6.0), &font, &text);
}

fn draw_legend(canvas: &skia::Canvas, frame: &Frame, theme: &Theme) {
    let mut swatch = skia::Paint::default();
    swatch.set_anti_alias(true);
    let mut text = skia::Paint::default();
    text.set_color(theme.axis_label.to_skia());
    text.set_anti_alias(true);
    let mut font = skia::Font::default();
    font.set_size(12.0);

    let x = frame.plot.right as f32 + 10.0;
    for (i, name) in frame.legend.iter().enumerate() {
        let y = frame.plot.top as f32 + i as f32 * 20.0;
        swatch.set_color(theme.series(i).to_skia());
        canvas.draw_rect(skia::Rect::from_xywh(x, y, 12.0, 12.0), &swatch);
        canvas.draw_str(name, (x + 16.0, y + 10.0), &font, &text);
    }

    if !frame.title.is_empty() {
        font.set_size(16.0);
        let (w, _) = font.measure_str(&frame.title, Some(&text));
        let y = (frame.plot.top as f32 / 2.0).max(14.0);
        canvas.draw_str(&frame.title, (frame.width as f32 / 2.0 - w / 2.0, y), &font, &text);
    }
}
