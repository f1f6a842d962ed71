// File: crates/airviz-render/src/theme.rs
// Summary: Light/Dark theming for frame rendering colors, plus the per-channel palette.

/// Straight (non-premultiplied) RGBA.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// `#rrggbb`; alpha is emitted separately as an opacity attribute.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }

    pub fn to_plotters(self) -> plotters::style::RGBAColor {
        plotters::style::RGBAColor(self.r, self.g, self.b, self.opacity())
    }

    #[cfg(feature = "skia")]
    pub fn to_skia(self) -> skia_safe::Color {
        skia_safe::Color::from_argb(self.a, self.r, self.g, self.b)
    }
}

/// d3's category10, the palette the charts are keyed by.
pub const CATEGORY10: [Rgba; 10] = [
    Rgba::rgb(0x1f, 0x77, 0xb4),
    Rgba::rgb(0xff, 0x7f, 0x0e),
    Rgba::rgb(0x2c, 0xa0, 0x2c),
    Rgba::rgb(0xd6, 0x27, 0x28),
    Rgba::rgb(0x94, 0x67, 0xbd),
    Rgba::rgb(0x8c, 0x56, 0x4b),
    Rgba::rgb(0xe3, 0x77, 0xc2),
    Rgba::rgb(0x7f, 0x7f, 0x7f),
    Rgba::rgb(0xbc, 0xbd, 0x22),
    Rgba::rgb(0x17, 0xbe, 0xcf),
];

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: Rgba,
    pub grid: Rgba,
    pub axis_line: Rgba,
    pub axis_label: Rgba,
    pub tick: Rgba,
    pub brush_fill: Rgba,
    pub brush_stroke: Rgba,
    pub highlight: Rgba,
    pub palette: [Rgba; 10],
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Rgba::rgb(18, 18, 20),
            grid: Rgba::rgb(40, 40, 45),
            axis_line: Rgba::rgb(180, 180, 190),
            axis_label: Rgba::rgb(235, 235, 245),
            tick: Rgba::rgb(150, 150, 160),
            brush_fill: Rgba::rgb(255, 230, 70).with_alpha(40),
            brush_stroke: Rgba::rgb(255, 230, 70),
            highlight: Rgba::rgb(255, 255, 255),
            palette: CATEGORY10,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: Rgba::rgb(255, 255, 255),
            grid: Rgba::rgb(230, 230, 235),
            axis_line: Rgba::rgb(0, 0, 0),
            axis_label: Rgba::rgb(20, 20, 30),
            tick: Rgba::rgb(100, 100, 110),
            brush_fill: Rgba::rgb(30, 120, 240).with_alpha(40),
            brush_stroke: Rgba::rgb(30, 120, 240),
            highlight: Rgba::rgb(0, 0, 0),
            palette: CATEGORY10,
        }
    }

    /// Palette color for a primitive's `color` index; wraps past ten channels.
    pub fn series(&self, index: usize) -> Rgba {
        self.palette[index % self.palette.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    presets().into_iter().find(|t| t.name.eq_ignore_ascii_case(name)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_lookup() {
        assert_eq!(CATEGORY10[0].hex(), "#1f77b4");
        assert_eq!(find("DARK").name, "dark");
        assert_eq!(find("nope").name, "light");
        assert_eq!(Theme::light().series(11), CATEGORY10[1]);
    }
}
