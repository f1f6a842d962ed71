// File: crates/airviz-core/src/config.rs
// Summary: Engine configuration (parsing, validity floor, zoom, layout, channel sets) with serde defaults.

use serde::Deserialize;

use crate::types::{
    Insets, DEFAULT_DATE_FORMAT, DEFAULT_SENTINEL_FLOOR, DEFAULT_ZOOM, HEIGHT, MAX_ZOOM, MIN_ZOOM,
    TICK_SPACING_PX, WIDTH,
};

/// Top-level configuration. Every field has a default so a partial TOML
/// file (or none at all) is enough.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub parse: ParseOptions,
    /// Readings strictly below this value are treated as sensor faults.
    pub sentinel_floor: f64,
    pub zoom: ZoomConfig,
    pub layout: LayoutConfig,
    pub tick_spacing_px: f64,
    /// Channel order for stacked bars. Empty means every parsed channel.
    pub stack_channels: Vec<String>,
    /// Channels that get a zoomable area chart. Empty means every parsed channel.
    pub area_channels: Vec<String>,
    /// Channels drawn on the brushable line chart. Empty means every parsed channel.
    pub brush_channels: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            sentinel_floor: DEFAULT_SENTINEL_FLOOR,
            zoom: ZoomConfig::default(),
            layout: LayoutConfig::default(),
            tick_spacing_px: TICK_SPACING_PX,
            stack_channels: vec![
                "PT08.S1(CO)".into(),
                "PT08.S2(NMHC)".into(),
                "PT08.S3(NOx)".into(),
                "PT08.S4(NO2)".into(),
                "PT08.S5(O3)".into(),
            ],
            area_channels: Vec::new(),
            brush_channels: vec![
                "CO(GT)".into(),
                "C6H6(GT)".into(),
                "NMHC(GT)".into(),
                "NOx(GT)".into(),
                "NO2(GT)".into(),
                "PT08.S5(O3)".into(),
            ],
        }
    }
}

impl EngineConfig {
    /// Resolve a configured channel list against the channels actually present.
    /// Unknown names are dropped; an empty list (or one with no survivors)
    /// falls back to every available channel.
    pub fn resolve_channels(wanted: &[String], available: &[String]) -> Vec<String> {
        let picked: Vec<String> = wanted
            .iter()
            .filter(|w| available.iter().any(|a| a == *w))
            .cloned()
            .collect();
        if picked.is_empty() { available.to_vec() } else { picked }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// chrono format of the date column.
    pub date_format: String,
    /// Field delimiter; `None` sniffs it from the header line.
    pub delimiter: Option<char>,
    pub date_column: String,
    pub time_column: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            delimiter: None,
            date_column: "Date".to_string(),
            time_column: "Time".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    pub default_factor: f64,
    /// `YYYY-MM-DD`; the initial zoom centers here. `None` uses the first record.
    pub reference_date: Option<String>,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_ZOOM,
            max_scale: MAX_ZOOM,
            default_factor: DEFAULT_ZOOM,
            reference_date: Some("2004-03-10".to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: u32,
    pub height: u32,
    pub insets: Insets,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { width: WIDTH, height: HEIGHT, insets: Insets::default() }
    }
}
