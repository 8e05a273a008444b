//! Logistic link functions.
//!
//! Both estimators produce a log-odds margin and convert it to a probability:
//!
//! - `sigmoid(z) = 1 / (1 + exp(-z))`
//! - `logit(p)   = ln(p / (1 - p))`
//!
//! Numerical notes:
//! - For large negative `z`, `exp(-z)` overflows; we evaluate `exp(z) / (1 + exp(z))`
//!   on that side instead so the result never leaves `[0, 1]`.
//! - `logit` is only called on validated priors in `(0, 1)`.

/// Map a log-odds margin to a probability in `[0, 1]`.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Map a probability in `(0, 1)` to its log-odds.
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_midpoint_and_tails() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(-800.0).is_finite());
    }

    #[test]
    fn logit_inverts_sigmoid() {
        for p in [0.01, 0.2, 0.5, 0.73, 0.99] {
            assert!((sigmoid(logit(p)) - p).abs() < 1e-12);
        }
    }
}
