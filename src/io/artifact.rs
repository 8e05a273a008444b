//! Read the classifier artifact and the decision threshold.
//!
//! Both files are read once at startup. Any failure here is fatal: the
//! scorer cannot run without its artifact, so nothing falls back to defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::domain::{FeatureSpec, Threshold};
use crate::error::ArtifactError;
use crate::models::{ArtifactClassifier, ArtifactFile, Classifier, check_schema};

/// Load the classifier and threshold, checking the classifier against `expected`.
pub fn load_artifacts(
    model_path: &Path,
    threshold_path: &Path,
    expected: &[FeatureSpec],
) -> Result<(ArtifactClassifier, Threshold), ArtifactError> {
    let classifier = read_classifier(model_path)?;
    let threshold = read_threshold(threshold_path)?;

    check_schema(expected, classifier.schema()).map_err(ArtifactError::SchemaMismatch)?;

    log::info!(
        "loaded classifier '{}' ({}, {} encoded columns) from {}",
        classifier.name(),
        classifier.estimator_kind(),
        classifier.encoded_width(),
        model_path.display()
    );
    log::info!("decision threshold {} from {}", threshold.value(), threshold_path.display());

    Ok((classifier, threshold))
}

/// Read and validate a classifier artifact JSON file.
pub fn read_classifier(path: &Path) -> Result<ArtifactClassifier, ArtifactError> {
    let text = read_file(path)?;
    let file: ArtifactFile = serde_json::from_str(&text).map_err(|e| ArtifactError::ArtifactCorrupt {
        path: path.to_path_buf(),
        reason: format!("invalid artifact JSON: {e}"),
    })?;
    ArtifactClassifier::from_artifact(file).map_err(|reason| ArtifactError::ArtifactCorrupt {
        path: path.to_path_buf(),
        reason,
    })
}

/// Read a threshold file holding exactly one float in `[0, 1]`.
pub fn read_threshold(path: &Path) -> Result<Threshold, ArtifactError> {
    let text = read_file(path)?;
    parse_threshold(&text).map_err(|reason| ArtifactError::ThresholdParseError {
        path: path.to_path_buf(),
        reason,
    })
}

/// Parse threshold file contents; surrounding whitespace is ignored.
pub fn parse_threshold(text: &str) -> Result<Threshold, String> {
    let mut tokens = text.split_whitespace();
    let Some(token) = tokens.next() else {
        return Err("file is empty".to_string());
    };
    if tokens.next().is_some() {
        return Err("expected a single value".to_string());
    }
    let value: f64 = token
        .parse()
        .map_err(|e| format!("'{token}' is not a number: {e}"))?;
    Threshold::new(value).ok_or_else(|| format!("{value} is not a probability in [0, 1]"))
}

fn read_file(path: &Path) -> Result<String, ArtifactError> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ArtifactError::ArtifactNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::ArtifactCorrupt {
                path: path.to_path_buf(),
                reason: format!("unreadable: {e}"),
            }
        }
    })
}
