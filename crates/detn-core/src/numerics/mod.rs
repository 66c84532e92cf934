pub mod closed_form;
pub mod crout;
pub mod matrix;

pub use closed_form::{determinant_2x2, determinant_3x3};
pub use crout::{CroutScratch, LuError, TINY_PIVOT};
pub use matrix::MatrixView;

use serde::{Deserialize, Serialize};

/// Absolute-or-relative comparison window used when checking determinants
/// against expected values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericTolerance {
    pub abs_tol: f64,
    pub rel_tol: f64,
    pub relative_floor: f64,
}

impl Default for NumericTolerance {
    fn default() -> Self {
        Self {
            abs_tol: 1.0e-10,
            rel_tol: 1.0e-9,
            relative_floor: 1.0e-12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceComparison {
    pub abs_diff: f64,
    pub rel_diff: f64,
    pub passes: bool,
}

pub fn relative_difference(lhs: f64, rhs: f64, relative_floor: f64) -> f64 {
    let scale = lhs.abs().max(rhs.abs()).max(relative_floor);
    (lhs - rhs).abs() / scale
}

/// NaN only matches NaN; infinities only match themselves.
pub fn compare_with_tolerance(
    expected: f64,
    actual: f64,
    tolerance: NumericTolerance,
) -> ToleranceComparison {
    if expected.is_nan() || actual.is_nan() || expected.is_infinite() || actual.is_infinite() {
        let passes = (expected.is_nan() && actual.is_nan()) || expected == actual;
        return ToleranceComparison {
            abs_diff: if passes { 0.0 } else { f64::INFINITY },
            rel_diff: if passes { 0.0 } else { f64::INFINITY },
            passes,
        };
    }

    let abs_diff = (actual - expected).abs();
    let rel_diff = relative_difference(expected, actual, tolerance.relative_floor);
    let passes = abs_diff <= tolerance.abs_tol || rel_diff <= tolerance.rel_tol;

    ToleranceComparison {
        abs_diff,
        rel_diff,
        passes,
    }
}

pub fn within_tolerance(expected: f64, actual: f64, tolerance: NumericTolerance) -> bool {
    compare_with_tolerance(expected, actual, tolerance).passes
}

pub fn format_determinant(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }

    if value == f64::INFINITY {
        return "inf".to_string();
    }

    if value == f64::NEG_INFINITY {
        return "-inf".to_string();
    }

    format!("{value:.15E}")
}
