// File: crates/airviz-render/src/lib.rs
// Summary: Reference rendering surface for airviz-core Frames (SVG always, PNG with the `skia` feature).

pub mod svg;
pub mod theme;

#[cfg(feature = "skia")]
pub mod png;

pub use svg::{render_svg, render_svg_file};
pub use theme::{Rgba, Theme};

#[cfg(feature = "skia")]
pub use png::{render_png, render_png_bytes};
