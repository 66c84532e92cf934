pub mod errors;

pub use errors::{DetnError, DetnErrorCategory, DetnResult};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage order of the flat array holding the batch.
///
/// `ColumnMajor` arrays have shape `[n, n, b1, ..., bk]` with the first axis
/// fastest. `RowMajor` arrays have shape `[b1, ..., bk, n, n]` with the last
/// axis fastest. Either way every matrix is one contiguous block of `n * n`
/// values and blocks are laid out in batch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementOrder {
    #[default]
    ColumnMajor,
    RowMajor,
}

impl ElementOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ColumnMajor => "column-major",
            Self::RowMajor => "row-major",
        }
    }

    /// Offset of element `(row, col)` inside an `n * n` block.
    #[inline]
    pub const fn offset(self, dimension: usize, row: usize, col: usize) -> usize {
        match self {
            Self::ColumnMajor => row + col * dimension,
            Self::RowMajor => row * dimension + col,
        }
    }
}

impl Display for ElementOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionMode {
    #[default]
    Serial,
    Parallel,
}

impl ExecutionMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Parallel => "parallel",
        }
    }
}

impl Display for ExecutionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// What the batch driver does when a matrix has an all-zero row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SingularMatrixPolicy {
    /// Stop the whole batch at the first singular matrix. No partial output.
    #[default]
    Abort,
    /// Store `NaN` for that slot, remember its index and keep going.
    RecordNan,
}

impl SingularMatrixPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::RecordNan => "nan",
        }
    }
}

impl Display for SingularMatrixPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{ElementOrder, ExecutionMode, SingularMatrixPolicy};

    #[test]
    fn element_order_offsets_follow_layout() {
        assert_eq!(ElementOrder::ColumnMajor.offset(3, 2, 0), 2);
        assert_eq!(ElementOrder::ColumnMajor.offset(3, 0, 2), 6);
        assert_eq!(ElementOrder::RowMajor.offset(3, 2, 0), 6);
        assert_eq!(ElementOrder::RowMajor.offset(3, 0, 2), 2);
        assert_eq!(ElementOrder::RowMajor.offset(3, 1, 1), 4);
    }

    #[test]
    fn enums_use_camel_case_in_json() {
        let order: ElementOrder = serde_json::from_str("\"rowMajor\"").expect("order");
        let mode: ExecutionMode = serde_json::from_str("\"parallel\"").expect("mode");
        let policy: SingularMatrixPolicy = serde_json::from_str("\"recordNan\"").expect("policy");

        assert_eq!(order, ElementOrder::RowMajor);
        assert_eq!(mode, ExecutionMode::Parallel);
        assert_eq!(policy, SingularMatrixPolicy::RecordNan);
        assert_eq!(
            serde_json::to_string(&ElementOrder::ColumnMajor).expect("serialize"),
            "\"columnMajor\""
        );
    }

    #[test]
    fn defaults_are_column_major_serial_abort() {
        assert_eq!(ElementOrder::default(), ElementOrder::ColumnMajor);
        assert_eq!(ExecutionMode::default(), ExecutionMode::Serial);
        assert_eq!(SingularMatrixPolicy::default(), SingularMatrixPolicy::Abort);
    }
}
