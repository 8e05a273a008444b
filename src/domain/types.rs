//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - read from the classifier artifact (feature schema)
//! - built from the TUI form, CLI flags, or a request JSON file
//! - written out as JSON results

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ScoringError;

/// Kind of a feature in the training schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Numeric,
    Categorical,
}

/// One named column of the training schema.
///
/// Categorical features carry the ordered category list used for one-hot
/// encoding; numeric features leave it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    pub kind: FeatureKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl FeatureSpec {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Numeric,
            categories: Vec::new(),
        }
    }

    pub fn categorical(name: impl Into<String>, categories: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Categorical,
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Number of columns this feature occupies in an encoded row.
    pub fn encoded_width(&self) -> usize {
        match self.kind {
            FeatureKind::Numeric => 1,
            FeatureKind::Categorical => self.categories.len(),
        }
    }
}

/// A single feature value: a number, or a category label.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Categorical(String),
}

impl FeatureValue {
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureValue::Numeric(_) => FeatureKind::Numeric,
            FeatureValue::Categorical(_) => FeatureKind::Categorical,
        }
    }
}

impl std::fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureValue::Numeric(v) => write!(f, "{v}"),
            FeatureValue::Categorical(c) => write!(f, "{c}"),
        }
    }
}

/// One record of named feature values submitted for inference.
///
/// Fields keep the order they were supplied in. The request is never mutated;
/// `with_value` returns a modified copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringRequest {
    fields: Vec<(String, FeatureValue)>,
}

impl ScoringRequest {
    pub fn new(fields: Vec<(String, FeatureValue)>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[(String, FeatureValue)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Copy of this request with `name` set to `value` (appended if absent).
    pub fn with_value(&self, name: &str, value: FeatureValue) -> Self {
        let mut fields = self.fields.clone();
        match fields.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => fields.push((name.to_string(), value)),
        }
        Self { fields }
    }

    /// Build a request from a JSON object.
    ///
    /// Numbers become numeric values and strings become categorical values;
    /// any other JSON type is rejected rather than coerced.
    pub fn from_json(value: &Value) -> Result<Self, ScoringError> {
        let Some(obj) = value.as_object() else {
            return Err(ScoringError::SchemaMismatch(
                "request must be a JSON object of feature names to values".to_string(),
            ));
        };

        let mut fields = Vec::with_capacity(obj.len());
        for (name, v) in obj {
            let fv = match v {
                Value::Number(n) => match n.as_f64() {
                    Some(x) => FeatureValue::Numeric(x),
                    None => {
                        return Err(ScoringError::SchemaMismatch(format!(
                            "field '{name}' is not representable as a number"
                        )));
                    }
                },
                Value::String(s) => FeatureValue::Categorical(s.clone()),
                other => {
                    return Err(ScoringError::SchemaMismatch(format!(
                        "field '{name}' has unsupported JSON type ({})",
                        json_type_name(other)
                    )));
                }
            };
            fields.push((name.clone(), fv));
        }

        Ok(Self { fields })
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::with_capacity(self.fields.len());
        for (name, value) in &self.fields {
            let v = match value {
                FeatureValue::Numeric(x) => serde_json::Number::from_f64(*x)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                FeatureValue::Categorical(c) => Value::String(c.clone()),
            };
            obj.insert(name.clone(), v);
        }
        Value::Object(obj)
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Scalar cutoff converting a probability into a binary risk decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Threshold(f64);

impl Threshold {
    /// Returns `None` unless `value` is finite and within `[0, 1]`.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// High-risk decision; the boundary is inclusive (`p == t` is high risk).
    pub fn decide(self, probability: f64) -> bool {
        probability >= self.0
    }
}

/// Two-way risk category; a pure function of the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLabel {
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Low Risk")]
    Low,
}

impl RiskLabel {
    pub fn from_decision(decision: bool) -> Self {
        if decision {
            RiskLabel::High
        } else {
            RiskLabel::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLabel::High => "High Risk",
            RiskLabel::Low => "Low Risk",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RiskLabel::High => "Likely Default",
            RiskLabel::Low => "Safe Customer",
        }
    }

    /// Label with its description, e.g. `High Risk (Likely Default)`.
    pub fn category(self) -> String {
        format!("{} ({})", self.as_str(), self.description())
    }
}

/// Output of one scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    pub probability: f64,
    pub decision: bool,
    pub label: RiskLabel,
}

impl ScoreResult {
    pub fn from_probability(probability: f64, threshold: Threshold) -> Self {
        let decision = threshold.decide(probability);
        Self {
            probability,
            decision,
            label: RiskLabel::from_decision(decision),
        }
    }
}
