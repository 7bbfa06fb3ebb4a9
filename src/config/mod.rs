//! # Runtime configuration and layered resolution.
//!
//! [`ScheduleConfig`] defines the worker's timing; [`HostConfig`] defines the
//! host supervisor's shutdown behavior. Both are resolved once at startup and
//! immutable afterwards.
//!
//! ## Precedence (highest wins)
//! 1. command-line overrides
//! 2. environment variables (`METRONOME_` prefix)
//! 3. environment-specific settings file (`metronome.<env>.toml`)
//! 4. base settings file (`metronome.toml`)
//! 5. built-in defaults
//!
//! The environment name comes from the `--environment` flag or `METRONOME_ENV`.
//! The worker itself consumes only the resolved values and knows nothing about
//! this mechanism.

mod file;

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::policies::OverlapPolicy;

pub use file::{FileConfig, HostSection, ScheduleSection};

/// Prefix for environment-variable overrides.
pub const ENV_PREFIX: &str = "METRONOME_";

/// Base settings file name, looked up in the config directory.
const BASE_FILE: &str = "metronome.toml";

/// Timing of the periodic schedule. Immutable once the worker is constructed.
#[derive(Clone, Copy, Debug)]
pub struct ScheduleConfig {
    /// Delay before the first tick.
    pub initial_delay: Duration,
    /// Interval between tick starts thereafter.
    pub interval: Duration,
    /// What to do when a tick falls due while the previous one still runs.
    pub overlap: OverlapPolicy,
}

impl Default for ScheduleConfig {
    /// `initial_delay = 0`, `interval = 5s`, `overlap = concurrent`.
    fn default() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            interval: Duration::from_secs(5),
            overlap: OverlapPolicy::default(),
        }
    }
}

/// Host supervisor settings.
#[derive(Clone, Copy, Debug)]
pub struct HostConfig {
    /// Maximum time to wait for in-flight ticks after stop before forcing
    /// termination.
    pub grace: Duration,
    /// Bounded wait for subscriber queues to drain on exit.
    pub flush_timeout: Duration,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
    /// Enables verbose logging in the binary.
    pub debug: bool,
}

impl Default for HostConfig {
    /// `grace = 20s`, `flush_timeout = 2s`, `bus_capacity = 1024`,
    /// `debug = false`.
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(20),
            flush_timeout: Duration::from_secs(2),
            bus_capacity: 1024,
            debug: false,
        }
    }
}

/// Fully resolved application configuration.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub schedule: ScheduleConfig,
    pub host: HostConfig,
}

/// One layer of overrides (used for both env vars and CLI flags).
///
/// `None` means "not set at this layer, keep the value from below".
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub initial_delay_ms: Option<u64>,
    pub interval_ms: Option<u64>,
    pub overlap: Option<OverlapPolicy>,
    pub grace_secs: Option<u64>,
    pub flush_timeout_secs: Option<u64>,
    pub debug: Option<bool>,
}

/// Resolves the configuration with the full precedence chain.
///
/// Reads the optional base and environment-specific TOML files from
/// `config_dir`, then applies environment-variable overrides, then `cli`.
pub fn resolve(config_dir: &Path, environment: Option<&str>, cli: Overrides) -> Result<AppConfig> {
    let base = file::load(&config_dir.join(BASE_FILE))?;
    let env_name = environment
        .map(str::to_string)
        .or_else(|| std::env::var(format!("{ENV_PREFIX}ENV")).ok());
    let env_file = match env_name.as_deref() {
        Some(name) => file::load(&config_dir.join(format!("metronome.{name}.toml")))?,
        None => None,
    };
    resolve_with(base, env_file, env_overrides()?, cli)
}

/// Pure resolution step: defaults ← base file ← env file ← env ← cli.
pub fn resolve_with(
    base: Option<FileConfig>,
    env_file: Option<FileConfig>,
    env: Overrides,
    cli: Overrides,
) -> Result<AppConfig> {
    let mut cfg = AppConfig::default();
    if let Some(f) = &base {
        apply_file(&mut cfg, f);
    }
    if let Some(f) = &env_file {
        apply_file(&mut cfg, f);
    }
    apply_overrides(&mut cfg, &env);
    apply_overrides(&mut cfg, &cli);

    if cfg.schedule.interval.is_zero() {
        bail!("schedule.interval must be greater than zero");
    }
    Ok(cfg)
}

/// Reads the `METRONOME_*` override variables from the process environment.
pub fn env_overrides() -> Result<Overrides> {
    Ok(Overrides {
        initial_delay_ms: parse_var(&var_name("INITIAL_DELAY_MS"))?,
        interval_ms: parse_var(&var_name("INTERVAL_MS"))?,
        overlap: overlap_var(&var_name("OVERLAP"))?,
        grace_secs: parse_var(&var_name("GRACE_SECS"))?,
        flush_timeout_secs: parse_var(&var_name("FLUSH_TIMEOUT_SECS"))?,
        debug: bool_var(&var_name("DEBUG"))?,
    })
}

fn var_name(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

fn apply_file(cfg: &mut AppConfig, f: &FileConfig) {
    if let Some(s) = &f.schedule {
        if let Some(ms) = s.initial_delay_ms {
            cfg.schedule.initial_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = s.interval_ms {
            cfg.schedule.interval = Duration::from_millis(ms);
        }
        if let Some(overlap) = s.overlap {
            cfg.schedule.overlap = overlap;
        }
    }
    if let Some(h) = &f.host {
        if let Some(secs) = h.grace_secs {
            cfg.host.grace = Duration::from_secs(secs);
        }
        if let Some(secs) = h.flush_timeout_secs {
            cfg.host.flush_timeout = Duration::from_secs(secs);
        }
        if let Some(cap) = h.bus_capacity {
            cfg.host.bus_capacity = cap;
        }
        if let Some(debug) = h.debug {
            cfg.host.debug = debug;
        }
    }
}

fn apply_overrides(cfg: &mut AppConfig, o: &Overrides) {
    if let Some(ms) = o.initial_delay_ms {
        cfg.schedule.initial_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = o.interval_ms {
        cfg.schedule.interval = Duration::from_millis(ms);
    }
    if let Some(overlap) = o.overlap {
        cfg.schedule.overlap = overlap;
    }
    if let Some(secs) = o.grace_secs {
        cfg.host.grace = Duration::from_secs(secs);
    }
    if let Some(secs) = o.flush_timeout_secs {
        cfg.host.flush_timeout = Duration::from_secs(secs);
    }
    if let Some(debug) = o.debug {
        cfg.host.debug = debug;
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => Ok(Some(v)),
            Err(e) => bail!("invalid value for {name}: {e}"),
        },
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => bail!("cannot read {name}: {e}"),
    }
}

fn overlap_var(name: &str) -> Result<Option<OverlapPolicy>> {
    match std::env::var(name) {
        Ok(raw) => match raw.to_ascii_lowercase().as_str() {
            "concurrent" => Ok(Some(OverlapPolicy::Concurrent)),
            "skip" => Ok(Some(OverlapPolicy::Skip)),
            other => bail!("invalid value for {name}: {other:?} (expected concurrent|skip)"),
        },
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => bail!("cannot read {name}: {e}"),
    }
}

fn bool_var(name: &str) -> Result<Option<bool>> {
    match std::env::var(name) {
        Ok(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(Some(true)),
            "0" | "false" | "no" => Ok(Some(false)),
            other => bail!("invalid value for {name}: {other:?} (expected a boolean)"),
        },
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => bail!("cannot read {name}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_with_interval(ms: u64) -> FileConfig {
        toml::from_str(&format!("[schedule]\ninterval_ms = {ms}\n")).unwrap()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let cfg = resolve_with(None, None, Overrides::default(), Overrides::default()).unwrap();
        assert_eq!(cfg.schedule.initial_delay, Duration::ZERO);
        assert_eq!(cfg.schedule.interval, Duration::from_secs(5));
        assert_eq!(cfg.schedule.overlap, OverlapPolicy::Concurrent);
        assert_eq!(cfg.host.grace, Duration::from_secs(20));
        assert_eq!(cfg.host.flush_timeout, Duration::from_secs(2));
        assert!(!cfg.host.debug);
    }

    #[test]
    fn test_base_file_overrides_defaults() {
        let cfg = resolve_with(
            Some(file_with_interval(1000)),
            None,
            Overrides::default(),
            Overrides::default(),
        )
        .unwrap();
        assert_eq!(cfg.schedule.interval, Duration::from_millis(1000));
    }

    #[test]
    fn test_env_file_overrides_base_file() {
        let cfg = resolve_with(
            Some(file_with_interval(1000)),
            Some(file_with_interval(2000)),
            Overrides::default(),
            Overrides::default(),
        )
        .unwrap();
        assert_eq!(cfg.schedule.interval, Duration::from_millis(2000));
    }

    #[test]
    fn test_env_overrides_files() {
        let env = Overrides {
            interval_ms: Some(3000),
            ..Overrides::default()
        };
        let cfg = resolve_with(
            Some(file_with_interval(1000)),
            Some(file_with_interval(2000)),
            env,
            Overrides::default(),
        )
        .unwrap();
        assert_eq!(cfg.schedule.interval, Duration::from_millis(3000));
    }

    #[test]
    fn test_cli_overrides_everything() {
        let env = Overrides {
            interval_ms: Some(3000),
            debug: Some(false),
            ..Overrides::default()
        };
        let cli = Overrides {
            interval_ms: Some(4000),
            overlap: Some(OverlapPolicy::Skip),
            debug: Some(true),
            ..Overrides::default()
        };
        let cfg = resolve_with(
            Some(file_with_interval(1000)),
            Some(file_with_interval(2000)),
            env,
            cli,
        )
        .unwrap();
        assert_eq!(cfg.schedule.interval, Duration::from_millis(4000));
        assert_eq!(cfg.schedule.overlap, OverlapPolicy::Skip);
        assert!(cfg.host.debug);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let cli = Overrides {
            interval_ms: Some(0),
            ..Overrides::default()
        };
        assert!(resolve_with(None, None, Overrides::default(), cli).is_err());
    }

    #[test]
    fn test_resolve_reads_files_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("metronome.toml"),
            "[schedule]\ninterval_ms = 1500\n\n[host]\ngrace_secs = 7\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("metronome.staging.toml"),
            "[host]\ngrace_secs = 9\n",
        )
        .unwrap();

        let cfg = resolve(dir.path(), Some("staging"), Overrides::default()).unwrap();
        assert_eq!(cfg.schedule.interval, Duration::from_millis(1500));
        assert_eq!(cfg.host.grace, Duration::from_secs(9));
    }
}
