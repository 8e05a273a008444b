use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use loan_default_risk::app::scoring::ScoringContext;
use loan_default_risk::config::ArtifactPaths;
use loan_default_risk::domain::{
    BorrowerProfile, FeatureValue, RiskLabel, ScoreResult, Threshold, application_schema, field_index,
};
use loan_default_risk::error::ArtifactError;

fn write_artifacts(dir: &Path, estimator: serde_json::Value, threshold: &str) -> ArtifactPaths {
    let model = dir.join("model.json");
    let artifact = json!({
        "format": "loan-default-classifier",
        "version": 1,
        "name": "test_model",
        "features": application_schema(),
        "estimator": estimator,
    });
    fs::write(&model, serde_json::to_string_pretty(&artifact).unwrap()).unwrap();

    let thr = dir.join("threshold.txt");
    fs::write(&thr, threshold).unwrap();

    ArtifactPaths { model, threshold: thr }
}

/// Logistic model that only looks at the bureau score (encoded column 7).
fn bureau_score_logistic() -> serde_json::Value {
    let mut coefficients = vec![0.0; 19];
    coefficients[7] = -0.01;
    json!({ "type": "logistic", "intercept": 5.0, "coefficients": coefficients })
}

#[test]
fn shipped_demo_artifact_scores_default_profile() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let paths = ArtifactPaths {
        model: root.join("models/loan_default_model.json"),
        threshold: root.join("models/best_threshold.txt"),
    };
    let ctx = ScoringContext::load(&paths).unwrap();
    assert_eq!(ctx.threshold().value(), 0.42);

    let result = ctx.score(&BorrowerProfile::default().to_request()).unwrap();
    assert!((0.0..=1.0).contains(&result.probability));
    assert_eq!(result.label, RiskLabel::Low);
}

#[test]
fn load_and_score_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_artifacts(dir.path(), bureau_score_logistic(), "0.5\n");
    let ctx = ScoringContext::load(&paths).unwrap();

    let request = BorrowerProfile::default().to_request();
    let first = ctx.score(&request).unwrap();
    let second = ctx.score(&request).unwrap();
    assert_eq!(first, second);

    // Default bureau score 650: sigmoid(5 - 6.5)
    let expected = 1.0 / (1.0 + (1.5f64).exp());
    assert!((first.probability - expected).abs() < 1e-12);
    assert_eq!(first.label, RiskLabel::Low);

    let risky = request.with_value("PERFORM_CNS.SCORE", FeatureValue::Numeric(100.0));
    let result = ctx.score(&risky).unwrap();
    assert!(result.decision);
    assert_eq!(result.label, RiskLabel::High);
}

#[test]
fn missing_model_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = write_artifacts(dir.path(), bureau_score_logistic(), "0.5");
    paths.model = dir.path().join("nope.json");
    let err = ScoringContext::load(&paths).err().unwrap();
    assert!(matches!(err, ArtifactError::ArtifactNotFound { .. }));
}

#[test]
fn broken_json_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_artifacts(dir.path(), bureau_score_logistic(), "0.5");
    fs::write(&paths.model, "{ not json").unwrap();
    let err = ScoringContext::load(&paths).err().unwrap();
    assert!(matches!(err, ArtifactError::ArtifactCorrupt { .. }));
}

#[test]
fn bad_threshold_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_artifacts(dir.path(), bureau_score_logistic(), "1.7");
    let err = ScoringContext::load(&paths).err().unwrap();
    assert!(matches!(err, ArtifactError::ThresholdParseError { .. }));
}

#[test]
fn artifact_trained_on_other_schema_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("model.json");
    let artifact = json!({
        "format": "loan-default-classifier",
        "version": 1,
        "name": "other",
        "features": [{ "name": "income", "kind": "numeric" }],
        "estimator": { "type": "logistic", "intercept": 0.0, "coefficients": [1.0] },
    });
    fs::write(&model, artifact.to_string()).unwrap();
    let threshold = dir.path().join("threshold.txt");
    fs::write(&threshold, "0.5").unwrap();

    let err = ScoringContext::load(&ArtifactPaths { model, threshold }).err().unwrap();
    assert!(matches!(err, ArtifactError::SchemaMismatch(_)));
}

#[test]
fn tree_ensemble_artifact_scores() {
    let dir = tempfile::tempdir().unwrap();
    // One stump on the delinquent-accounts column (encoded index 9).
    let estimator = json!({
        "type": "gradient_boosted_trees",
        "base_score": 0.5,
        "trees": [{
            "nodes": [
                { "feature": 9, "threshold": 0.5, "left": 1, "right": 2 },
                { "leaf": -2.0 },
                { "leaf": 2.0 }
            ]
        }]
    });
    let paths = write_artifacts(dir.path(), estimator, "0.5");
    let ctx = ScoringContext::load(&paths).unwrap();
    assert_eq!(ctx.classifier().estimator_kind(), "gradient_boosted_trees");

    let mut profile = BorrowerProfile::default();
    let low = ctx.score(&profile.to_request()).unwrap();
    assert!((low.probability - 1.0 / (1.0 + 2.0f64.exp())).abs() < 1e-12);
    assert_eq!(low.label, RiskLabel::Low);

    let idx = field_index("DELINQUENT.ACCTS.IN.LAST.SIX.MONTHS").unwrap();
    profile.set_number(idx, 3.0);
    let high = ctx.score(&profile.to_request()).unwrap();
    assert!((high.probability - 1.0 / (1.0 + (-2.0f64).exp())).abs() < 1e-12);
    assert_eq!(high.label, RiskLabel::High);
}

#[test]
fn decision_is_probability_at_or_above_threshold() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..2000 {
        let t = Threshold::new(rng.gen_range(0.0..=1.0)).unwrap();
        let p: f64 = rng.gen_range(0.0..=1.0);
        let result = ScoreResult::from_probability(p, t);
        assert_eq!(result.decision, p >= t.value());
        assert_eq!(result.label == RiskLabel::High, result.decision);
    }
    // Exact boundary.
    let t = Threshold::new(0.3).unwrap();
    assert!(ScoreResult::from_probability(0.3, t).decision);
}
