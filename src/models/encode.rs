//! Request encoding: named feature values -> dense numeric row.
//!
//! Numeric features are copied as-is; each categorical feature expands in place
//! into one 0/1 column per trained category (one-hot). Columns follow the
//! schema order, not the request order.

use std::collections::HashSet;

use crate::domain::{FeatureKind, FeatureSpec, FeatureValue, ScoringRequest};
use crate::error::ScoringError;

/// Total width of an encoded row for `schema`.
pub fn encoded_width(schema: &[FeatureSpec]) -> usize {
    schema.iter().map(FeatureSpec::encoded_width).sum()
}

/// Encode `request` against `schema`.
///
/// Every schema feature must be present with the right kind; unknown extra
/// fields, duplicate fields, unseen categories, and non-finite numbers are all
/// rejected. Nothing is ever filled in with a default.
pub fn encode_request(schema: &[FeatureSpec], request: &ScoringRequest) -> Result<Vec<f64>, ScoringError> {
    let mut seen = HashSet::with_capacity(request.len());
    for (name, _) in request.fields() {
        if !seen.insert(name.as_str()) {
            return Err(mismatch(format!("duplicate field '{name}'")));
        }
        if !schema.iter().any(|f| &f.name == name) {
            return Err(mismatch(format!("unexpected field '{name}'")));
        }
    }

    let mut row = Vec::with_capacity(encoded_width(schema));
    for spec in schema {
        let value = request
            .get(&spec.name)
            .ok_or_else(|| mismatch(format!("missing required field '{}'", spec.name)))?;

        match (spec.kind, value) {
            (FeatureKind::Numeric, FeatureValue::Numeric(x)) => {
                if !x.is_finite() {
                    return Err(mismatch(format!("field '{}' is not a finite number", spec.name)));
                }
                row.push(*x);
            }
            (FeatureKind::Categorical, FeatureValue::Categorical(c)) => {
                let hot = spec.categories.iter().position(|k| k == c).ok_or_else(|| {
                    mismatch(format!(
                        "field '{}' has unknown category '{}' (expected one of: {})",
                        spec.name,
                        c,
                        spec.categories.join(", ")
                    ))
                })?;
                row.extend((0..spec.categories.len()).map(|i| if i == hot { 1.0 } else { 0.0 }));
            }
            (expected, got) => {
                return Err(mismatch(format!(
                    "field '{}' should be {:?} but got {:?} value '{}'",
                    spec.name,
                    expected,
                    got.kind(),
                    got
                )));
            }
        }
    }

    Ok(row)
}

/// Compare a trained schema against the schema the application was built for.
///
/// Returns a readable description of the first difference.
pub fn check_schema(expected: &[FeatureSpec], trained: &[FeatureSpec]) -> Result<(), String> {
    for (idx, (e, t)) in expected.iter().zip(trained).enumerate() {
        if e.name != t.name {
            return Err(format!(
                "feature #{} is '{}' in the artifact but '{}' is expected",
                idx + 1,
                t.name,
                e.name
            ));
        }
        if e.kind != t.kind {
            return Err(format!(
                "feature '{}' is {:?} in the artifact but {:?} is expected",
                e.name, t.kind, e.kind
            ));
        }
        if e.categories != t.categories {
            return Err(format!(
                "feature '{}' has categories [{}] in the artifact but [{}] are expected",
                e.name,
                t.categories.join(", "),
                e.categories.join(", ")
            ));
        }
    }

    if expected.len() != trained.len() {
        return Err(format!(
            "artifact has {} features but {} are expected",
            trained.len(),
            expected.len()
        ));
    }

    Ok(())
}

fn mismatch(msg: String) -> ScoringError {
    ScoringError::SchemaMismatch(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<FeatureSpec> {
        vec![
            FeatureSpec::numeric("ltv"),
            FeatureSpec::categorical("Employment.Type", &["Salaried", "Self-employed"]),
            FeatureSpec::numeric("Age"),
        ]
    }

    fn request() -> ScoringRequest {
        ScoringRequest::new(vec![
            ("Age".to_string(), FeatureValue::Numeric(35.0)),
            ("ltv".to_string(), FeatureValue::Numeric(75.0)),
            (
                "Employment.Type".to_string(),
                FeatureValue::Categorical("Self-employed".to_string()),
            ),
        ])
    }

    #[test]
    fn encodes_in_schema_order_with_one_hot() {
        let row = encode_request(&schema(), &request()).unwrap();
        assert_eq!(row, vec![75.0, 0.0, 1.0, 35.0]);
        assert_eq!(encoded_width(&schema()), 4);
    }

    #[test]
    fn missing_field_is_rejected() {
        let partial = ScoringRequest::new(
            request()
                .fields()
                .iter()
                .filter(|(n, _)| n != "Age")
                .cloned()
                .collect(),
        );
        let err = encode_request(&schema(), &partial).unwrap_err();
        assert_eq!(
            err,
            ScoringError::SchemaMismatch("missing required field 'Age'".to_string())
        );
    }

    #[test]
    fn extra_and_duplicate_fields_are_rejected() {
        let extra = request().with_value("bonus", FeatureValue::Numeric(1.0));
        assert!(encode_request(&schema(), &extra).is_err());

        let mut fields = request().fields().to_vec();
        fields.push(("ltv".to_string(), FeatureValue::Numeric(80.0)));
        assert!(encode_request(&schema(), &ScoringRequest::new(fields)).is_err());
    }

    #[test]
    fn wrong_kind_unknown_category_and_nan_are_rejected() {
        let wrong_kind = request().with_value("ltv", FeatureValue::Categorical("high".to_string()));
        assert!(encode_request(&schema(), &wrong_kind).is_err());

        let unknown = request().with_value(
            "Employment.Type",
            FeatureValue::Categorical("Retired".to_string()),
        );
        assert!(encode_request(&schema(), &unknown).is_err());

        let nan = request().with_value("Age", FeatureValue::Numeric(f64::NAN));
        assert!(encode_request(&schema(), &nan).is_err());
    }

    #[test]
    fn check_schema_reports_first_difference() {
        assert!(check_schema(&schema(), &schema()).is_ok());

        let mut renamed = schema();
        renamed[2].name = "age".to_string();
        let msg = check_schema(&schema(), &renamed).unwrap_err();
        assert!(msg.contains("'age'"));

        let mut shorter = schema();
        shorter.pop();
        assert!(check_schema(&schema(), &shorter).is_err());

        let mut recat = schema();
        recat[1].categories = vec!["Salaried".to_string()];
        assert!(check_schema(&schema(), &recat).is_err());
    }
}
