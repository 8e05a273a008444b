//! Error types.
//!
//! - `ArtifactError`: startup failures while loading the classifier/threshold (fatal)
//! - `ScoringError`: a single request was rejected (the process keeps running)
//! - `AppError`: what `main` prints, carrying the process exit code

use std::fmt;
use std::path::PathBuf;

/// Exit code for configuration, usage, and artifact errors.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for a scoring request rejected by the CLI.
pub const EXIT_REJECTED: u8 = 3;
/// Exit code for terminal and I/O runtime failures.
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures while loading the model artifact at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactError {
    /// The classifier or threshold file does not exist.
    ArtifactNotFound { path: PathBuf },

    /// The classifier file could not be read or deserialized, or is inconsistent.
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// The threshold file does not hold a single float in [0, 1].
    ThresholdParseError { path: PathBuf, reason: String },

    /// The classifier was trained on a different feature schema.
    SchemaMismatch(String),
}

impl fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactError::ArtifactNotFound { path } => {
                write!(f, "Model artifact not found: {}", path.display())
            }
            ArtifactError::ArtifactCorrupt { path, reason } => {
                write!(f, "Model artifact '{}' is corrupt: {}", path.display(), reason)
            }
            ArtifactError::ThresholdParseError { path, reason } => {
                write!(f, "Invalid threshold file '{}': {}", path.display(), reason)
            }
            ArtifactError::SchemaMismatch(msg) => write!(f, "Artifact schema mismatch: {}", msg),
        }
    }
}

impl std::error::Error for ArtifactError {}

/// A single scoring request was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// The request does not match the classifier's input schema.
    SchemaMismatch(String),

    /// The classifier produced a probability that is not a finite number.
    NonFiniteProbability(f64),
}

impl fmt::Display for ScoringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringError::SchemaMismatch(msg) => write!(f, "Schema mismatch: {}", msg),
            ScoringError::NonFiniteProbability(p) => {
                write!(f, "Classifier returned a non-finite probability ({})", p)
            }
        }
    }
}

impl std::error::Error for ScoringError {}

impl From<ArtifactError> for AppError {
    fn from(err: ArtifactError) -> Self {
        AppError::new(EXIT_CONFIG, err.to_string())
    }
}

impl From<ScoringError> for AppError {
    fn from(err: ScoringError) -> Self {
        AppError::new(EXIT_REJECTED, err.to_string())
    }
}
