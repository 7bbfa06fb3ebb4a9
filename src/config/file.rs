//! TOML settings file layer.
//!
//! Two optional files are consulted, base first, then environment-specific:
//! `metronome.toml` and `metronome.<env>.toml`. Every field is optional; a
//! missing field leaves the previous layer's value in place.
//!
//! ```toml
//! [schedule]
//! initial_delay_ms = 0
//! interval_ms = 5000
//! overlap = "concurrent"
//!
//! [host]
//! grace_secs = 20
//! flush_timeout_secs = 2
//! bus_capacity = 1024
//! debug = false
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::policies::OverlapPolicy;

/// Parsed settings file; all fields optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub schedule: Option<ScheduleSection>,
    pub host: Option<HostSection>,
}

/// `[schedule]` section.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleSection {
    pub initial_delay_ms: Option<u64>,
    pub interval_ms: Option<u64>,
    pub overlap: Option<OverlapPolicy>,
}

/// `[host]` section.
#[derive(Debug, Default, Deserialize)]
pub struct HostSection {
    pub grace_secs: Option<u64>,
    pub flush_timeout_secs: Option<u64>,
    pub bus_capacity: Option<usize>,
    pub debug: Option<bool>,
}

/// Loads a settings file if it exists; `Ok(None)` when absent.
pub fn load(path: &Path) -> Result<Option<FileConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let parsed = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_file() {
        let f: FileConfig = toml::from_str(
            r#"
            [schedule]
            initial_delay_ms = 250
            interval_ms = 1000
            overlap = "skip"

            [host]
            grace_secs = 5
            flush_timeout_secs = 1
            bus_capacity = 64
            debug = true
            "#,
        )
        .unwrap();
        let schedule = f.schedule.unwrap();
        assert_eq!(schedule.initial_delay_ms, Some(250));
        assert_eq!(schedule.interval_ms, Some(1000));
        assert_eq!(schedule.overlap, Some(OverlapPolicy::Skip));
        let host = f.host.unwrap();
        assert_eq!(host.grace_secs, Some(5));
        assert_eq!(host.bus_capacity, Some(64));
        assert_eq!(host.debug, Some(true));
    }

    #[test]
    fn test_partial_file_leaves_rest_unset() {
        let f: FileConfig = toml::from_str("[schedule]\ninterval_ms = 60000\n").unwrap();
        let schedule = f.schedule.unwrap();
        assert_eq!(schedule.interval_ms, Some(60000));
        assert_eq!(schedule.initial_delay_ms, None);
        assert!(f.host.is_none());
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("metronome.toml")).unwrap().is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metronome.toml");
        std::fs::write(&path, "interval_ms = [nonsense").unwrap();
        assert!(load(&path).is_err());
    }
}
