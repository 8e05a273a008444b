//! Terminal and JSON output for the CLI.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::scoring::ScoringContext;
use crate::domain::{FeatureKind, ScoreResult, Threshold};

/// Machine-readable result of `ldr score --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub probability: f64,
    pub threshold: f64,
    pub decision: bool,
    pub label: &'static str,
    pub risk_category: String,
    pub model: String,
    pub scored_at: DateTime<Utc>,
}

impl ScoreReport {
    pub fn new(result: &ScoreResult, threshold: Threshold, model: &str) -> Self {
        Self {
            probability: result.probability,
            threshold: threshold.value(),
            decision: result.decision,
            label: result.label.as_str(),
            risk_category: result.label.category(),
            model: model.to_string(),
            scored_at: Utc::now(),
        }
    }
}

/// Human-readable banner for the decision.
pub fn decision_banner(result: &ScoreResult) -> String {
    format!(
        "{} – {}",
        result.label.as_str().to_uppercase(),
        result.label.description()
    )
}

/// Format a score result for the terminal.
pub fn format_score(result: &ScoreResult, threshold: Threshold) -> String {
    let mut out = String::new();
    out.push_str("=== ldr - Loan Default Prediction ===\n");
    out.push_str(&format!("Probability of Default: {:.4}\n", result.probability));
    out.push_str(&format!("Threshold Used: {}\n", threshold.value()));
    out.push_str(&format!("Decision: {}\n", decision_banner(result)));
    out.push_str(&format!("Risk Category: {}", result.label.category()));
    out
}

/// Format the loaded classifier, threshold, and expected schema.
pub fn format_model_info(ctx: &ScoringContext) -> String {
    let clf = ctx.classifier();
    let mut out = String::new();

    out.push_str("=== ldr - Model Artifact ===\n");
    out.push_str(&format!("Name: {}\n", clf.name()));
    out.push_str(&format!("Estimator: {}\n", clf.estimator_kind()));
    out.push_str(&format!(
        "Encoded width: {}\n",
        crate::models::encoded_width(clf.schema())
    ));
    out.push_str(&format!("Threshold: {}\n", ctx.threshold().value()));
    if let Some(paths) = ctx.paths() {
        out.push_str(&format!("Model file: {}\n", paths.model.display()));
        out.push_str(&format!("Threshold file: {}\n", paths.threshold.display()));
    }

    out.push_str("\nFeatures:\n");
    for (i, spec) in clf.schema().iter().enumerate() {
        match spec.kind {
            FeatureKind::Numeric => {
                out.push_str(&format!("{:>3}. {:<38} numeric\n", i + 1, spec.name));
            }
            FeatureKind::Categorical => {
                out.push_str(&format!(
                    "{:>3}. {:<38} categorical [{}]\n",
                    i + 1,
                    spec.name,
                    spec.categories.join(", ")
                ));
            }
        }
    }

    out
}
