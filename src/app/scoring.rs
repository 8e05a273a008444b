//! Shared scoring logic used by both CLI and TUI front-ends.
//!
//! The loaded artifact is held in an explicit, immutable `ScoringContext`
//! that front-ends borrow; there is no process-global model. The context is
//! `Send + Sync`, so concurrent callers need no locking.

use rayon::prelude::*;

use crate::config::ArtifactPaths;
use crate::domain::{FeatureValue, ScoreResult, ScoringRequest, Threshold, application_schema};
use crate::error::{ArtifactError, ScoringError};
use crate::models::Classifier;

/// Score one request against a classifier and threshold.
///
/// Pure and deterministic; the only failure is a request that does not fit the
/// classifier's schema (or a classifier misbehaving with a non-finite output).
pub fn score(
    request: &ScoringRequest,
    classifier: &dyn Classifier,
    threshold: Threshold,
) -> Result<ScoreResult, ScoringError> {
    let probability = classifier.predict_proba(request)?;
    if !probability.is_finite() {
        return Err(ScoringError::NonFiniteProbability(probability));
    }
    let result = ScoreResult::from_probability(probability.clamp(0.0, 1.0), threshold);
    log::debug!(
        "scored request: p={:.6} threshold={} -> {}",
        result.probability,
        threshold.value(),
        result.label.as_str()
    );
    Ok(result)
}

/// Loaded classifier + threshold, read-only for the life of the process.
pub struct ScoringContext {
    classifier: Box<dyn Classifier>,
    threshold: Threshold,
    paths: Option<ArtifactPaths>,
}

impl ScoringContext {
    /// Load the artifact from disk, checking it against the borrower form schema.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let (classifier, threshold) =
            crate::io::load_artifacts(&paths.model, &paths.threshold, &application_schema())?;
        Ok(Self {
            classifier: Box::new(classifier),
            threshold,
            paths: Some(paths.clone()),
        })
    }

    /// Build a context around an in-memory classifier.
    pub fn new(classifier: Box<dyn Classifier>, threshold: Threshold) -> Self {
        Self {
            classifier,
            threshold,
            paths: None,
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Files the context was loaded from (`None` for in-memory classifiers).
    pub fn paths(&self) -> Option<&ArtifactPaths> {
        self.paths.as_ref()
    }

    pub fn score(&self, request: &ScoringRequest) -> Result<ScoreResult, ScoringError> {
        score(request, self.classifier(), self.threshold)
    }

    /// Probability of default as one numeric field takes each of `values`.
    ///
    /// All other fields stay as in `base`. Points are scored in parallel and
    /// returned in the order of `values`.
    pub fn sweep(
        &self,
        base: &ScoringRequest,
        field: &str,
        values: &[f64],
    ) -> Result<Vec<(f64, f64)>, ScoringError> {
        if base.get(field).is_none() {
            return Err(ScoringError::SchemaMismatch(format!(
                "cannot sweep '{field}': not in request"
            )));
        }
        values
            .par_iter()
            .map(|&v| {
                let request = base.with_value(field, FeatureValue::Numeric(v));
                self.score(&request).map(|r| (v, r.probability))
            })
            .collect()
    }
}

/// `n` evenly spaced points over `[lo, hi]` (inclusive).
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            lo + u * (hi - lo)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BorrowerProfile, FeatureSpec, RiskLabel};

    /// Classifier whose probability is the value of one numeric feature.
    struct Echo {
        schema: Vec<FeatureSpec>,
        column: usize,
    }

    impl Classifier for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn estimator_kind(&self) -> &'static str {
            "mock"
        }
        fn schema(&self) -> &[FeatureSpec] {
            &self.schema
        }
        fn predict_row(&self, row: &[f64]) -> f64 {
            row[self.column]
        }
    }

    fn echo_context(threshold: f64) -> ScoringContext {
        ScoringContext::new(
            Box::new(Echo {
                schema: vec![FeatureSpec::numeric("p")],
                column: 0,
            }),
            Threshold::new(threshold).unwrap(),
        )
    }

    fn req(p: f64) -> ScoringRequest {
        ScoringRequest::new(vec![("p".to_string(), FeatureValue::Numeric(p))])
    }

    #[test]
    fn inclusive_boundary_examples() {
        let ctx = echo_context(0.50);
        let at = ctx.score(&req(0.50)).unwrap();
        assert!(at.decision);
        assert_eq!(at.label, RiskLabel::High);

        let below = ctx.score(&req(0.4999)).unwrap();
        assert!(!below.decision);
        assert_eq!(below.label, RiskLabel::Low);
    }

    #[test]
    fn missing_field_is_schema_mismatch() {
        let ctx = echo_context(0.5);
        let err = ctx.score(&ScoringRequest::new(Vec::new())).unwrap_err();
        assert!(matches!(err, ScoringError::SchemaMismatch(_)));
    }

    #[test]
    fn non_finite_output_is_rejected() {
        let ctx = echo_context(0.5);

        struct Broken(Vec<FeatureSpec>);
        impl Classifier for Broken {
            fn name(&self) -> &str {
                "broken"
            }
            fn estimator_kind(&self) -> &'static str {
                "mock"
            }
            fn schema(&self) -> &[FeatureSpec] {
                &self.0
            }
            fn predict_row(&self, _row: &[f64]) -> f64 {
                f64::NAN
            }
        }
        let broken = Broken(vec![FeatureSpec::numeric("p")]);
        assert!(matches!(
            score(&req(0.2), &broken, ctx.threshold()),
            Err(ScoringError::NonFiniteProbability(_))
        ));
    }

    #[test]
    fn sweep_matches_sequential_scoring() {
        let ctx = echo_context(0.3);
        let xs = linspace(0.0, 1.0, 41);
        let swept = ctx.sweep(&req(0.0), "p", &xs).unwrap();
        let sequential: Vec<(f64, f64)> = xs
            .iter()
            .map(|&x| (x, ctx.score(&req(x)).unwrap().probability))
            .collect();
        assert_eq!(swept, sequential);
        assert!(ctx.sweep(&req(0.0), "q", &xs).is_err());
    }

    #[test]
    fn form_request_is_rejected_by_foreign_schema() {
        let ctx = echo_context(0.5);
        let err = ctx.score(&BorrowerProfile::default().to_request()).unwrap_err();
        assert!(matches!(err, ScoringError::SchemaMismatch(_)));
    }

    #[test]
    fn linspace_includes_both_ends() {
        let xs = linspace(18.0, 80.0, 5);
        assert_eq!(xs.first(), Some(&18.0));
        assert_eq!(xs.last(), Some(&80.0));
        assert_eq!(xs.len(), 5);
    }
}
