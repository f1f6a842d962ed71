// File: crates/airviz-cli/src/settings.rs
// Summary: Layered engine configuration: built-in defaults, optional TOML file, AIRVIZ_* environment.

use std::path::Path;

use airviz_core::EngineConfig;
use anyhow::{Context, Result};

/// Environment prefix; nested keys use `__` (`AIRVIZ_ZOOM__DEFAULT_FACTOR=8`).
pub const ENV_PREFIX: &str = "AIRVIZ";

pub fn load(file: Option<&Path>) -> Result<EngineConfig> {
    let mut builder = config::Config::builder();
    if let Some(path) = file {
        builder = builder.add_source(config::File::from(path).required(true));
    }
    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("stack_channels")
            .with_list_parse_key("area_channels")
            .with_list_parse_key("brush_channels"),
    );
    let settings = builder
        .build()
        .with_context(|| match file {
            Some(p) => format!("reading config '{}'", p.display()),
            None => "reading configuration from the environment".to_string(),
        })?;
    let cfg: EngineConfig = settings.try_deserialize().context("invalid configuration")?;
    tracing::debug!(?cfg, "configuration loaded");
    Ok(cfg)
}
