//! Classifier trait and the artifact-backed implementation.
//!
//! The scoring code only sees `dyn Classifier`: a feature schema plus a
//! probability for one encoded row. `ArtifactClassifier` is the implementation
//! deserialized from the exported model JSON; tests plug in their own.

use serde::{Deserialize, Serialize};

use crate::domain::{FeatureSpec, ScoringRequest};
use crate::error::ScoringError;
use crate::models::encode::{encode_request, encoded_width};
use crate::models::logistic::LogisticModel;
use crate::models::trees::TreeEnsemble;

/// Value of the `format` field every artifact must carry.
pub const ARTIFACT_FORMAT: &str = "loan-default-classifier";
/// Highest artifact version this build understands.
pub const ARTIFACT_VERSION: u32 = 1;

/// A trained binary classifier exposing a probability for the positive class.
///
/// Implementations must be pure: the same row always yields the same output.
pub trait Classifier: Send + Sync {
    /// Model name, for display and logs.
    fn name(&self) -> &str;

    /// Estimator family, for display and logs.
    fn estimator_kind(&self) -> &'static str;

    /// Input schema the classifier was trained on.
    fn schema(&self) -> &[FeatureSpec];

    /// Probability of default for one already-encoded row.
    fn predict_row(&self, row: &[f64]) -> f64;

    /// Encode `request` against `schema()` and predict.
    fn predict_proba(&self, request: &ScoringRequest) -> Result<f64, ScoringError> {
        let row = encode_request(self.schema(), request)?;
        Ok(self.predict_row(&row))
    }
}

/// Estimator section of the artifact JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    Logistic(LogisticModel),
    GradientBoostedTrees(TreeEnsemble),
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::Logistic(_) => "logistic",
            Estimator::GradientBoostedTrees(_) => "gradient_boosted_trees",
        }
    }
}

/// On-disk artifact layout, as written by the training export step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub format: String,
    pub version: u32,
    pub name: String,
    pub features: Vec<FeatureSpec>,
    pub estimator: Estimator,
}

/// Validated classifier built from an `ArtifactFile`.
#[derive(Debug, Clone)]
pub struct ArtifactClassifier {
    name: String,
    features: Vec<FeatureSpec>,
    estimator: Estimator,
    width: usize,
}

impl ArtifactClassifier {
    /// Validate the artifact's internal consistency.
    ///
    /// The error string describes what is wrong; the loader wraps it as
    /// `ArtifactCorrupt`.
    pub fn from_artifact(file: ArtifactFile) -> Result<Self, String> {
        if file.format != ARTIFACT_FORMAT {
            return Err(format!(
                "unexpected format '{}' (expected '{ARTIFACT_FORMAT}')",
                file.format
            ));
        }
        if file.version == 0 || file.version > ARTIFACT_VERSION {
            return Err(format!(
                "unsupported artifact version {} (this build reads up to {ARTIFACT_VERSION})",
                file.version
            ));
        }
        if file.features.is_empty() {
            return Err("artifact declares no features".to_string());
        }
        for spec in &file.features {
            validate_feature(spec)?;
        }
        for (i, spec) in file.features.iter().enumerate() {
            if file.features[..i].iter().any(|f| f.name == spec.name) {
                return Err(format!("feature '{}' is declared twice", spec.name));
            }
        }

        let width = encoded_width(&file.features);
        match &file.estimator {
            Estimator::Logistic(m) => m.validate(width)?,
            Estimator::GradientBoostedTrees(m) => m.validate(width)?,
        }

        Ok(Self {
            name: file.name,
            features: file.features,
            estimator: file.estimator,
            width,
        })
    }

    /// Number of columns in an encoded row.
    pub fn encoded_width(&self) -> usize {
        self.width
    }
}

fn validate_feature(spec: &FeatureSpec) -> Result<(), String> {
    use crate::domain::FeatureKind;

    match spec.kind {
        FeatureKind::Numeric if !spec.categories.is_empty() => Err(format!(
            "numeric feature '{}' must not list categories",
            spec.name
        )),
        FeatureKind::Categorical if spec.categories.is_empty() => {
            Err(format!("categorical feature '{}' has no categories", spec.name))
        }
        FeatureKind::Categorical => {
            for (i, c) in spec.categories.iter().enumerate() {
                if spec.categories[..i].contains(c) {
                    return Err(format!(
                        "categorical feature '{}' lists '{}' twice",
                        spec.name, c
                    ));
                }
            }
            Ok(())
        }
        FeatureKind::Numeric => Ok(()),
    }
}

impl Classifier for ArtifactClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn estimator_kind(&self) -> &'static str {
        self.estimator.kind()
    }

    fn schema(&self) -> &[FeatureSpec] {
        &self.features
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        match &self.estimator {
            Estimator::Logistic(m) => m.predict(row),
            Estimator::GradientBoostedTrees(m) => m.predict(row),
        }
    }
}
