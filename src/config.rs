//! Runtime configuration: artifact and log file locations.
//!
//! Precedence is CLI flag, then environment (a `.env` file is honored), then
//! the built-in default.

use std::path::PathBuf;

pub const ENV_MODEL_PATH: &str = "LDR_MODEL_PATH";
pub const ENV_THRESHOLD_PATH: &str = "LDR_THRESHOLD_PATH";
pub const ENV_LOG_FILE: &str = "LDR_LOG_FILE";

pub const DEFAULT_MODEL_PATH: &str = "models/loan_default_model.json";
pub const DEFAULT_THRESHOLD_PATH: &str = "models/best_threshold.txt";
pub const DEFAULT_LOG_FILE: &str = "ldr.log";

/// Where the classifier and threshold are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub threshold: PathBuf,
}

impl ArtifactPaths {
    /// Resolve both paths from flags and the environment.
    pub fn resolve(model_flag: Option<PathBuf>, threshold_flag: Option<PathBuf>) -> Self {
        dotenvy::dotenv().ok();
        Self {
            model: resolve_path(model_flag, std::env::var(ENV_MODEL_PATH).ok(), DEFAULT_MODEL_PATH),
            threshold: resolve_path(
                threshold_flag,
                std::env::var(ENV_THRESHOLD_PATH).ok(),
                DEFAULT_THRESHOLD_PATH,
            ),
        }
    }
}

/// Log file used while the TUI owns the terminal.
pub fn log_file_path() -> PathBuf {
    dotenvy::dotenv().ok();
    resolve_path(None, std::env::var(ENV_LOG_FILE).ok(), DEFAULT_LOG_FILE)
}

fn resolve_path(flag: Option<PathBuf>, env_value: Option<String>, default: &str) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    match env_value {
        Some(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => PathBuf::from(default),
    }
}
