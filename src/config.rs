use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "QUIZ_CONFIG";

/// Default config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

// ------------------------------------------------------------
// Root configuration
// ------------------------------------------------------------
//
// Top-level structure loaded from `config.json`.
//
// Every field has a default, so the file itself is optional and
// may override only the values it cares about.
//
// It defines:
// - Remote API settings
// - Where the collection is stored
// - Polling loop tuning
// - Analyzer behavior
//
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub collector: CollectorConfig,
    pub analyzer: AnalyzerConfig,
}

// ------------------------------------------------------------
// Remote API
// ------------------------------------------------------------
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint without the `amount` query parameter
    pub url: String,

    /// Records requested per call (`amount=`)
    pub batch_size: u32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "https://opentdb.com/api.php".to_string(),
            batch_size: 20,
            timeout_secs: 15,
        }
    }
}

// ------------------------------------------------------------
// Storage
// ------------------------------------------------------------
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Persisted collection, read and written by the collector,
    /// read by the analyzer
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "unique_quizzes.json".to_string(),
        }
    }
}

// ------------------------------------------------------------
// Polling loop
// ------------------------------------------------------------
//
// NOTE:
// `max_requests` is a safety cap only. With `None` the loop is
// bounded solely by the saturation threshold.
//
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CollectorConfig {
    /// Consecutive zero-addition batches before stopping
    pub saturation_threshold: u32,

    /// Fetch+merge cycles run by the idempotency probe
    pub probe_requests: u32,

    /// Hard cap on fetches issued by the main loop
    pub max_requests: Option<u64>,

    pub delay: DelayConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            saturation_threshold: 6,
            probe_requests: 3,
            max_requests: None,
            delay: DelayConfig::default(),
        }
    }
}

/// Inter-request delay, drawn uniformly from `[min_ms, max_ms)`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DelayConfig {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            min_ms: 1200,
            max_ms: 4200,
        }
    }
}

// ------------------------------------------------------------
// Analyzer
// ------------------------------------------------------------
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Exit non-zero when the collection cannot be read or parsed
    pub strict_exit: bool,

    /// Length of the category ranking
    pub top_categories: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            strict_exit: false,
            top_categories: 10,
        }
    }
}

impl AnalyzerConfig {
    /// Exit status after a failure to produce the report.
    ///
    /// Non-strict mode still exits 0.
    pub fn failure_exit(&self) -> ExitCode {
        if self.strict_exit {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

// ------------------------------------------------------------
// Configuration loader
// ------------------------------------------------------------
//
// Location: `$QUIZ_CONFIG`, falling back to `config.json`.
//
// A missing file yields defaults. A file that exists but does not
// parse is an error.
//
pub fn load_config() -> anyhow::Result<Config> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config_from(Path::new(&path))
}

pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(e).with_context(|| format!("reading config {}", path.display()));
        }
    };

    let cfg: Config = serde_json::from_str(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;

    anyhow::ensure!(
        cfg.collector.delay.min_ms < cfg.collector.delay.max_ms,
        "collector.delay.min_ms must be below max_ms"
    );
    anyhow::ensure!(
        cfg.collector.saturation_threshold > 0,
        "collector.saturation_threshold must be at least 1"
    );
    anyhow::ensure!(
        cfg.collector.probe_requests > 0,
        "collector.probe_requests must be at least 1"
    );

    Ok(cfg)
}
