//! Borrower form: the 18 input fields, their ranges, and clamping.
//!
//! The field table is the application's copy of the training schema. The
//! artifact loader checks the classifier's feature list against
//! `application_schema()` and refuses to start on any difference.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::{FeatureSpec, FeatureValue, ScoringRequest};

/// Employment category, the only categorical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum EmploymentType {
    #[serde(rename = "Salaried")]
    #[value(name = "salaried")]
    Salaried,
    #[serde(rename = "Self-employed")]
    #[value(name = "self-employed")]
    SelfEmployed,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 2] = [EmploymentType::Salaried, EmploymentType::SelfEmployed];

    /// Category label as the model was trained on it.
    pub fn as_str(self) -> &'static str {
        match self {
            EmploymentType::Salaried => "Salaried",
            EmploymentType::SelfEmployed => "Self-employed",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            EmploymentType::Salaried => EmploymentType::SelfEmployed,
            EmploymentType::SelfEmployed => EmploymentType::Salaried,
        }
    }
}

/// Range and step of a numeric form field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    /// Whole numbers only (counts, IDs, currency amounts).
    pub integer: bool,
}

impl NumericRange {
    const fn int(min: f64, max: f64, default: f64, step: f64) -> Self {
        Self {
            min,
            max,
            default,
            step,
            integer: true,
        }
    }

    const fn real(min: f64, max: f64, default: f64, step: f64) -> Self {
        Self {
            min,
            max,
            default,
            step,
            integer: false,
        }
    }

    /// Clamp into `[min, max]`; integer fields are rounded first.
    pub fn clamp(&self, value: f64) -> f64 {
        let v = if self.integer { value.round() } else { value };
        v.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Numeric(NumericRange),
    Employment,
}

/// One input field of the borrower form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormField {
    /// Feature name in the training schema.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub kind: FieldKind,
}

pub const EMPLOYMENT_FIELD: &str = "Employment.Type";

/// The form fields, in training-schema order.
pub const FORM_FIELDS: [FormField; 18] = [
    FormField {
        name: "disbursed_amount",
        label: "Disbursed Amount (₹)",
        kind: FieldKind::Numeric(NumericRange::int(1000.0, 5_000_000.0, 100_000.0, 5000.0)),
    },
    FormField {
        name: "asset_cost",
        label: "Asset Cost (₹)",
        kind: FieldKind::Numeric(NumericRange::int(10_000.0, 10_000_000.0, 200_000.0, 5000.0)),
    },
    FormField {
        name: "ltv",
        label: "LTV (Loan-to-Value Ratio %)",
        kind: FieldKind::Numeric(NumericRange::real(10.0, 120.0, 75.0, 0.5)),
    },
    FormField {
        name: "Age",
        label: "Customer Age",
        kind: FieldKind::Numeric(NumericRange::int(18.0, 80.0, 35.0, 1.0)),
    },
    FormField {
        name: "Loan_Age_Days",
        label: "Loan Age (Days)",
        kind: FieldKind::Numeric(NumericRange::int(0.0, 5000.0, 100.0, 10.0)),
    },
    FormField {
        name: EMPLOYMENT_FIELD,
        label: "Employment Type",
        kind: FieldKind::Employment,
    },
    FormField {
        name: "PERFORM_CNS.SCORE",
        label: "Credit Bureau Score",
        kind: FieldKind::Numeric(NumericRange::int(0.0, 900.0, 650.0, 10.0)),
    },
    FormField {
        name: "NO.OF_INQUIRIES",
        label: "No. of Enquiries (last 6 months)",
        kind: FieldKind::Numeric(NumericRange::int(0.0, 50.0, 2.0, 1.0)),
    },
    FormField {
        name: "DELINQUENT.ACCTS.IN.LAST.SIX.MONTHS",
        label: "Delinquent Accts (last 6 months)",
        kind: FieldKind::Numeric(NumericRange::int(0.0, 20.0, 0.0, 1.0)),
    },
    FormField {
        name: "PRI.NO.OF.ACCTS",
        label: "PRI Number of Accounts",
        kind: FieldKind::Numeric(NumericRange::int(0.0, 50.0, 2.0, 1.0)),
    },
    FormField {
        name: "PRI.ACTIVE.ACCTS",
        label: "PRI Active Accounts",
        kind: FieldKind::Numeric(NumericRange::int(0.0, 50.0, 1.0, 1.0)),
    },
    FormField {
        name: "PRI.OVERDUE.ACCTS",
        label: "PRI Overdue Accounts",
        kind: FieldKind::Numeric(NumericRange::int(0.0, 20.0, 0.0, 1.0)),
    },
    FormField {
        name: "PRI.SANCTIONED.AMOUNT",
        label: "PRI Sanctioned Amount",
        kind: FieldKind::Numeric(NumericRange::int(0.0, 10_000_000.0, 50_000.0, 5000.0)),
    },
    FormField {
        name: "PRI.DISBURSED.AMOUNT",
        label: "PRI Disbursed Amount",
        kind: FieldKind::Numeric(NumericRange::int(0.0, 10_000_000.0, 50_000.0, 5000.0)),
    },
    FormField {
        name: "CREDIT.HISTORY.LENGTH_MONTHS",
        label: "Credit History Length (Months)",
        kind: FieldKind::Numeric(NumericRange::int(0.0, 500.0, 60.0, 1.0)),
    },
    FormField {
        name: "AVERAGE.ACCT.AGE_MONTHS",
        label: "Average Account Age (Months)",
        kind: FieldKind::Numeric(NumericRange::int(0.0, 500.0, 40.0, 1.0)),
    },
    FormField {
        name: "State_ID",
        label: "State ID",
        kind: FieldKind::Numeric(NumericRange::int(1.0, 50.0, 10.0, 1.0)),
    },
    FormField {
        name: "Current_pincode_ID",
        label: "Current Pincode ID",
        kind: FieldKind::Numeric(NumericRange::int(100_000.0, 999_999.0, 560_001.0, 1.0)),
    },
];

/// Feature schema the application expects the artifact to be trained on.
pub fn application_schema() -> Vec<FeatureSpec> {
    FORM_FIELDS
        .iter()
        .map(|field| match field.kind {
            FieldKind::Numeric(_) => FeatureSpec::numeric(field.name),
            FieldKind::Employment => {
                let cats: Vec<&str> = EmploymentType::ALL.iter().map(|e| e.as_str()).collect();
                FeatureSpec::categorical(field.name, &cats)
            }
        })
        .collect()
}

pub fn field_index(name: &str) -> Option<usize> {
    FORM_FIELDS.iter().position(|f| f.name == name)
}

/// Value held by one form slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Employment(EmploymentType),
}

/// Current form state: one value per entry of `FORM_FIELDS`.
#[derive(Debug, Clone, PartialEq)]
pub struct BorrowerProfile {
    values: Vec<FieldValue>,
}

impl Default for BorrowerProfile {
    fn default() -> Self {
        let values = FORM_FIELDS
            .iter()
            .map(|f| match f.kind {
                FieldKind::Numeric(range) => FieldValue::Number(range.default),
                FieldKind::Employment => FieldValue::Employment(EmploymentType::Salaried),
            })
            .collect();
        Self { values }
    }
}

impl BorrowerProfile {
    pub fn value(&self, idx: usize) -> Option<FieldValue> {
        self.values.get(idx).copied()
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.values.get(field_index(name)?)? {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Employment(_) => None,
        }
    }

    pub fn employment(&self) -> EmploymentType {
        self.values
            .iter()
            .find_map(|v| match v {
                FieldValue::Employment(e) => Some(*e),
                FieldValue::Number(_) => None,
            })
            .unwrap_or(EmploymentType::Salaried)
    }

    /// Set a numeric field, clamped into its form range.
    ///
    /// Returns the stored value, or `None` (leaving the field untouched) if
    /// `idx` is not a numeric field or `value` is not finite.
    pub fn set_number(&mut self, idx: usize, value: f64) -> Option<f64> {
        let FieldKind::Numeric(range) = FORM_FIELDS.get(idx)?.kind else {
            return None;
        };
        if !value.is_finite() {
            return None;
        }
        let clamped = range.clamp(value);
        if clamped != value {
            log::warn!(
                "{} = {} is outside [{}, {}]; clamped to {}",
                FORM_FIELDS[idx].name,
                value,
                range.min,
                range.max,
                clamped
            );
        }
        self.values[idx] = FieldValue::Number(clamped);
        Some(clamped)
    }

    /// Store a finite numeric value as given, without clamping.
    ///
    /// Call `clamped()` before scoring.
    pub fn set_raw_number(&mut self, idx: usize, value: f64) -> bool {
        let is_numeric = matches!(FORM_FIELDS.get(idx).map(|f| f.kind), Some(FieldKind::Numeric(_)));
        if !is_numeric || !value.is_finite() {
            return false;
        }
        self.values[idx] = FieldValue::Number(value);
        true
    }

    pub fn set_employment(&mut self, employment: EmploymentType) {
        for v in &mut self.values {
            if let FieldValue::Employment(e) = v {
                *e = employment;
            }
        }
    }

    /// Move a field by `steps` increments (numeric) or toggle it (categorical).
    pub fn step(&mut self, idx: usize, steps: i32) {
        match self.values.get(idx).copied() {
            Some(FieldValue::Number(v)) => {
                if let FieldKind::Numeric(range) = FORM_FIELDS[idx].kind {
                    self.set_number(idx, v + range.step * steps as f64);
                }
            }
            Some(FieldValue::Employment(e)) => {
                if steps != 0 {
                    self.set_employment(e.toggle());
                }
            }
            None => {}
        }
    }

    /// Copy with every numeric field clamped into its form range.
    pub fn clamped(&self) -> Self {
        let mut out = self.clone();
        for idx in 0..out.values.len() {
            if let FieldValue::Number(v) = out.values[idx] {
                out.set_number(idx, v);
            }
        }
        out
    }

    /// Build a scoring request in training-schema order.
    pub fn to_request(&self) -> ScoringRequest {
        let fields = FORM_FIELDS
            .iter()
            .zip(&self.values)
            .map(|(field, value)| {
                let fv = match value {
                    FieldValue::Number(v) => FeatureValue::Numeric(*v),
                    FieldValue::Employment(e) => FeatureValue::Categorical(e.as_str().to_string()),
                };
                (field.name.to_string(), fv)
            })
            .collect();
        ScoringRequest::new(fields)
    }
}

/// Format a form value for display.
pub fn format_field_value(field: &FormField, value: FieldValue) -> String {
    match (field.kind, value) {
        (FieldKind::Numeric(range), FieldValue::Number(v)) if range.integer => format!("{v:.0}"),
        (FieldKind::Numeric(_), FieldValue::Number(v)) => format!("{v:.1}"),
        (_, FieldValue::Employment(e)) => e.as_str().to_string(),
        (FieldKind::Employment, FieldValue::Number(v)) => format!("{v}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureKind;

    #[test]
    fn schema_has_eighteen_fields_with_one_categorical() {
        let schema = application_schema();
        assert_eq!(schema.len(), 18);
        let cats: Vec<_> = schema
            .iter()
            .filter(|f| f.kind == FeatureKind::Categorical)
            .collect();
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].name, "Employment.Type");
        assert_eq!(cats[0].categories, vec!["Salaried", "Self-employed"]);
    }

    #[test]
    fn default_profile_matches_form_defaults() {
        let p = BorrowerProfile::default();
        assert_eq!(p.number("disbursed_amount"), Some(100_000.0));
        assert_eq!(p.number("ltv"), Some(75.0));
        assert_eq!(p.number("Current_pincode_ID"), Some(560_001.0));
        assert_eq!(p.employment(), EmploymentType::Salaried);
    }

    #[test]
    fn set_number_clamps_to_nearest_bound() {
        let mut p = BorrowerProfile::default();
        let age = field_index("Age").unwrap();
        assert_eq!(p.set_number(age, 12.0), Some(18.0));
        assert_eq!(p.set_number(age, 99.0), Some(80.0));
        assert_eq!(p.set_number(age, 41.6), Some(42.0));

        let ltv = field_index("ltv").unwrap();
        assert_eq!(p.set_number(ltv, 75.25), Some(75.25));
    }

    #[test]
    fn set_number_refuses_categorical_slot() {
        let mut p = BorrowerProfile::default();
        let idx = field_index(EMPLOYMENT_FIELD).unwrap();
        assert_eq!(p.set_number(idx, 1.0), None);
    }

    #[test]
    fn non_finite_values_are_refused_not_defaulted() {
        let mut p = BorrowerProfile::default();
        let age = field_index("Age").unwrap();
        p.set_number(age, 50.0);
        assert_eq!(p.set_number(age, f64::NAN), None);
        assert_eq!(p.set_number(age, f64::INFINITY), None);
        assert!(!p.set_raw_number(age, f64::NAN));
        assert_eq!(p.number("Age"), Some(50.0));
    }

    #[test]
    fn clamped_pulls_raw_values_into_range() {
        let mut p = BorrowerProfile::default();
        let age = field_index("Age").unwrap();
        let ltv = field_index("ltv").unwrap();
        let cns = field_index("PERFORM_CNS.SCORE").unwrap();
        assert!(p.set_raw_number(age, 95.0));
        assert!(p.set_raw_number(ltv, 5.0));
        assert!(p.set_raw_number(cns, 712.4));
        assert!(!p.set_raw_number(field_index(EMPLOYMENT_FIELD).unwrap(), 1.0));
        assert_eq!(p.number("Age"), Some(95.0));

        let c = p.clamped();
        assert_eq!(c.number("Age"), Some(80.0));
        assert_eq!(c.number("ltv"), Some(10.0));
        assert_eq!(c.number("PERFORM_CNS.SCORE"), Some(712.0));
        assert_eq!(c.number("disbursed_amount"), Some(100_000.0));
        assert_eq!(c.clamped(), c);
    }

    #[test]
    fn step_moves_and_toggles() {
        let mut p = BorrowerProfile::default();
        let cns = field_index("PERFORM_CNS.SCORE").unwrap();
        p.step(cns, 3);
        assert_eq!(p.number("PERFORM_CNS.SCORE"), Some(680.0));
        p.step(cns, 1000);
        assert_eq!(p.number("PERFORM_CNS.SCORE"), Some(900.0));

        let emp = field_index(EMPLOYMENT_FIELD).unwrap();
        p.step(emp, -1);
        assert_eq!(p.employment(), EmploymentType::SelfEmployed);
    }

    #[test]
    fn request_follows_schema_order() {
        let req = BorrowerProfile::default().to_request();
        let names: Vec<&str> = req.fields().iter().map(|(n, _)| n.as_str()).collect();
        let expected: Vec<&str> = FORM_FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names, expected);
        assert_eq!(
            req.get(EMPLOYMENT_FIELD),
            Some(&FeatureValue::Categorical("Salaried".to_string()))
        );
    }
}
