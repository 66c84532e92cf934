mod array;
mod strategy;

pub use array::{BatchArray, DeterminantArray};
pub use strategy::{DeterminantStrategy, crout_determinant, determinant};

use crate::config::DeterminantConfig;
use crate::domain::{DetnError, DetnResult, ExecutionMode, SingularMatrixPolicy};
use crate::numerics::{CroutScratch, LuError};
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    #[error("input must be double precision: element {index} is not a number")]
    NotFloatingPoint { index: usize },
    #[error("input must have 2+ dimensions, got rank {rank}")]
    RankTooSmall { rank: usize },
    #[error("matrix axes must have equal extent, got {rows}x{cols}")]
    UnequalMatrixAxes { rows: usize, cols: usize },
    #[error("shape requires {expected} elements but data holds {actual}")]
    DataLengthMismatch { expected: usize, actual: usize },
    #[error("element count of shape {shape:?} overflows usize")]
    ShapeOverflow { shape: Vec<usize> },
    #[error("out of memory allocating {what} ({elements} elements)")]
    AllocationFailure { what: &'static str, elements: usize },
    #[error("singular matrix at batch index {batch_index}: row {row} is all zeros")]
    SingularMatrix { batch_index: usize, row: usize },
    #[error("determinant kernel failed at batch index {batch_index}: {source}")]
    Kernel { batch_index: usize, source: LuError },
}

impl BatchError {
    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::NotFloatingPoint { .. } => "INPUT.NOT_FLOATING_POINT",
            Self::RankTooSmall { .. } => "INPUT.RANK",
            Self::UnequalMatrixAxes { .. } => "INPUT.MATRIX_AXES",
            Self::DataLengthMismatch { .. } => "INPUT.DATA_LENGTH",
            Self::ShapeOverflow { .. } => "INPUT.SHAPE_OVERFLOW",
            Self::AllocationFailure { .. } => "SYS.ALLOCATION",
            Self::SingularMatrix { .. } => "RUN.SINGULAR_MATRIX",
            Self::Kernel { .. } => "SYS.KERNEL",
        }
    }
}

impl From<BatchError> for DetnError {
    fn from(error: BatchError) -> Self {
        let placeholder = error.placeholder();
        let message = error.to_string();
        match error {
            BatchError::NotFloatingPoint { .. }
            | BatchError::RankTooSmall { .. }
            | BatchError::UnequalMatrixAxes { .. }
            | BatchError::DataLengthMismatch { .. }
            | BatchError::ShapeOverflow { .. } => DetnError::input_validation(placeholder, message),
            BatchError::SingularMatrix { .. } => DetnError::computation(placeholder, message),
            BatchError::AllocationFailure { .. } | BatchError::Kernel { .. } => {
                DetnError::internal(placeholder, message)
            }
        }
    }
}

pub trait BatchDeterminantApi {
    fn determinants(&self, input: &BatchArray<'_>) -> DetnResult<DeterminantArray>;
}

/// Drives the per-matrix kernel across a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchDeterminant {
    config: DeterminantConfig,
}

impl BatchDeterminant {
    pub fn new(config: DeterminantConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeterminantConfig {
        &self.config
    }

    /// Computes one determinant per matrix of `input`.
    ///
    /// Under [`SingularMatrixPolicy::Abort`] the first singular matrix in
    /// batch order ends the call and nothing is returned. Parallel runs report
    /// the same error and the same values as serial runs.
    pub fn compute(&self, input: &BatchArray<'_>) -> Result<DeterminantArray, BatchError> {
        let dimension = input.dimension();
        let batch_len = input.batch_len();
        let strategy = DeterminantStrategy::for_dimension(dimension);
        tracing::debug!(
            dimension,
            batch_len,
            strategy = strategy.as_str(),
            mode = %self.config.execution_mode,
            policy = %self.config.singular_policy,
            "computing batch determinants"
        );

        let mut values = Vec::new();
        values
            .try_reserve_exact(batch_len)
            .map_err(|_| BatchError::AllocationFailure {
                what: "determinant output",
                elements: batch_len,
            })?;
        let scratch_dimension = strategy.scratch_dimension(dimension);
        let mut scratch = CroutScratch::try_new(scratch_dimension).map_err(|_| {
            BatchError::AllocationFailure {
                what: "LU scratch matrix",
                elements: scratch_dimension.saturating_mul(scratch_dimension),
            }
        })?;
        let mut singular_indices = Vec::new();

        match self.config.execution_mode {
            ExecutionMode::Serial => {
                for index in 0..batch_len {
                    let outcome = strategy.evaluate(&input.block(index), &mut scratch);
                    self.record(index, outcome, &mut values, &mut singular_indices)?;
                }
            }
            ExecutionMode::Parallel => {
                let outcomes: Vec<Result<f64, LuError>> = (0..batch_len)
                    .into_par_iter()
                    .map_init(
                        || scratch.clone(),
                        |worker_scratch, index| {
                            strategy.evaluate(&input.block(index), worker_scratch)
                        },
                    )
                    .collect();
                for (index, outcome) in outcomes.into_iter().enumerate() {
                    self.record(index, outcome, &mut values, &mut singular_indices)?;
                }
            }
        }

        Ok(DeterminantArray::new(
            input.batch_shape().to_vec(),
            values,
            singular_indices,
        ))
    }

    fn record(
        &self,
        batch_index: usize,
        outcome: Result<f64, LuError>,
        values: &mut Vec<f64>,
        singular_indices: &mut Vec<usize>,
    ) -> Result<(), BatchError> {
        match outcome {
            Ok(value) => values.push(value),
            Err(LuError::SingularMatrix { row }) => match self.config.singular_policy {
                SingularMatrixPolicy::Abort => {
                    return Err(BatchError::SingularMatrix { batch_index, row });
                }
                SingularMatrixPolicy::RecordNan => {
                    tracing::debug!(batch_index, row, "singular matrix recorded as NaN");
                    values.push(f64::NAN);
                    singular_indices.push(batch_index);
                }
            },
            Err(source) => return Err(BatchError::Kernel { batch_index, source }),
        }
        Ok(())
    }
}

impl BatchDeterminantApi for BatchDeterminant {
    fn determinants(&self, input: &BatchArray<'_>) -> DetnResult<DeterminantArray> {
        self.compute(input).map_err(DetnError::from)
    }
}

/// Validates `data`/`shape` with the configured element order and computes the batch.
pub fn batch_determinants(
    data: &[f64],
    shape: Vec<usize>,
    config: DeterminantConfig,
) -> DetnResult<DeterminantArray> {
    let input = BatchArray::new(data, shape, config.element_order)?;
    BatchDeterminant::new(config).determinants(&input)
}
