// File: crates/airviz-core/src/dataset.rs
// Summary: A loaded, cleaned dataset and the load session that guards access to it.

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{AirVizError, LoadStatus, ParseError, Result};
use crate::impute::{clean_records, compute_channel_means, ChannelMeans};
use crate::parse::parse;
use crate::record::{CleanedRecord, RawRecord};

/// Everything derived from one file load. Replaced wholesale on the next load.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub channels: Vec<String>,
    pub raw: Vec<RawRecord>,
    pub means: ChannelMeans,
    pub cleaned: Vec<CleanedRecord>,
}

impl Dataset {
    /// Parse, compute channel means and clean in one pass.
    pub fn from_text(text: &str, cfg: &EngineConfig) -> Result<Self, ParseError> {
        let table = parse(text, &cfg.parse)?;
        let means = compute_channel_means(&table.records, &table.channels, cfg.sentinel_floor);
        let cleaned = clean_records(&table.records, &means);
        info!(rows = cleaned.len(), channels = table.channels.len(), "dataset loaded");
        Ok(Self { channels: table.channels, raw: table.records, means, cleaned })
    }

    /// Distinct date strings in file order.
    pub fn available_dates(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.cleaned
            .iter()
            .map(|r| r.date_text.as_str())
            .filter(|d| seen.insert(*d))
            .collect()
    }

    /// First cleaned record for `date_text`.
    pub fn snapshot(&self, date_text: &str) -> Option<&CleanedRecord> {
        self.cleaned.iter().find(|r| r.date_text == date_text)
    }

    /// Resolve a configured channel list against this dataset.
    pub fn resolve(&self, wanted: &[String]) -> Vec<String> {
        EngineConfig::resolve_channels(wanted, &self.channels)
    }
}

#[derive(Clone, Debug, Default)]
pub enum LoadState {
    #[default]
    Empty,
    Pending,
    Ready(Dataset),
    Failed(String),
}

/// Holds at most one dataset. Views ask the session and get an error
/// instead of an empty dataset while nothing usable is loaded.
#[derive(Debug, Default)]
pub struct Session {
    cfg: EngineConfig,
    state: LoadState,
}

impl Session {
    pub fn new(cfg: EngineConfig) -> Self {
        Self { cfg, state: LoadState::Empty }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// A read has started; the previous dataset is dropped.
    pub fn begin_load(&mut self) {
        self.state = LoadState::Pending;
    }

    /// Completion of a read: file text, or the reader's error message.
    pub fn finish_load(&mut self, read: std::result::Result<String, String>) -> Result<&Dataset> {
        let text = match read {
            Ok(t) => t,
            Err(msg) => {
                warn!(error = %msg, "file read failed");
                self.state = LoadState::Failed(msg);
                return Err(AirVizError::MissingDataset(LoadStatus::Failed));
            }
        };
        match Dataset::from_text(&text, &self.cfg) {
            Ok(ds) => {
                self.state = LoadState::Ready(ds);
                self.dataset()
            }
            Err(e) => {
                warn!(error = %e, "parse failed");
                self.state = LoadState::Failed(e.to_string());
                Err(AirVizError::Parse(e))
            }
        }
    }

    pub fn unload(&mut self) {
        self.state = LoadState::Empty;
    }

    pub fn dataset(&self) -> Result<&Dataset> {
        match &self.state {
            LoadState::Ready(ds) => Ok(ds),
            LoadState::Empty => Err(AirVizError::MissingDataset(LoadStatus::Empty)),
            LoadState::Pending => Err(AirVizError::MissingDataset(LoadStatus::Pending)),
            LoadState::Failed(_) => Err(AirVizError::MissingDataset(LoadStatus::Failed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Date,Time,CO(GT),NOx(GT)\n3/10/2004,18:00:00,2.6,-200\n3/10/2004,19:00:00,2.6,100\n3/11/2004,00:00:00,1.0,50\n";

    #[test]
    fn from_text_cleans() {
        let ds = Dataset::from_text(CSV, &EngineConfig::default()).unwrap();
        assert_eq!(ds.channels, vec!["CO(GT)", "NOx(GT)"]);
        assert_eq!(ds.means.get("NOx(GT)"), 75.0);
        assert_eq!(ds.cleaned[0].value("NOx(GT)"), 75.0);
        assert_eq!(ds.available_dates(), vec!["3/10/2004", "3/11/2004"]);
        assert_eq!(ds.snapshot("3/10/2004").unwrap().value("NOx(GT)"), 75.0);
        assert!(ds.snapshot("1/1/1999").is_none());
    }

    #[test]
    fn session_states() {
        let mut s = Session::new(EngineConfig::default());
        assert!(matches!(s.dataset(), Err(AirVizError::MissingDataset(LoadStatus::Empty))));
        s.begin_load();
        assert!(matches!(s.dataset(), Err(AirVizError::MissingDataset(LoadStatus::Pending))));
        assert!(s.finish_load(Ok(CSV.to_string())).is_ok());
        assert_eq!(s.dataset().unwrap().cleaned.len(), 3);
        s.begin_load();
        assert!(matches!(s.finish_load(Ok(String::new())), Err(AirVizError::Parse(ParseError::EmptyInput))));
        assert!(matches!(s.dataset(), Err(AirVizError::MissingDataset(LoadStatus::Failed))));
        s.unload();
        assert!(matches!(s.state(), LoadState::Empty));
    }
}
