//! Logistic regression estimator with optional standard scaling.
//!
//! `p = sigmoid(intercept + Σ coefficients[i] * (x[i] - mean[i]) / scale[i])`

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::math::sigmoid;

/// Per-column standardization fitted at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<StandardScaler>,
}

impl LogisticModel {
    /// Check the model against the encoded row width.
    pub fn validate(&self, width: usize) -> Result<(), String> {
        if self.coefficients.len() != width {
            return Err(format!(
                "logistic model has {} coefficients but the schema encodes {} columns",
                self.coefficients.len(),
                width
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("logistic model has non-finite parameters".to_string());
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != width || scaler.scale.len() != width {
                return Err(format!(
                    "scaler has {}/{} mean/scale entries but the schema encodes {} columns",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    width
                ));
            }
            if scaler.mean.iter().any(|m| !m.is_finite()) {
                return Err("scaler mean has non-finite entries".to_string());
            }
            if scaler.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
                return Err("scaler scale must be finite and non-zero".to_string());
            }
        }
        Ok(())
    }

    /// Log-odds for one encoded row.
    pub fn margin(&self, row: &[f64]) -> f64 {
        let mut x = DVector::from_column_slice(row);
        if let Some(scaler) = &self.scaler {
            let mean = DVector::from_column_slice(&scaler.mean);
            let scale = DVector::from_column_slice(&scaler.scale);
            x = (x - mean).component_div(&scale);
        }
        let w = DVector::from_column_slice(&self.coefficients);
        self.intercept + w.dot(&x)
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        sigmoid(self.margin(row))
    }
}
