use super::BatchError;
use crate::domain::ElementOrder;
use crate::numerics::MatrixView;

/// A validated, borrowed batch of equally sized square matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchArray<'a> {
    data: &'a [f64],
    shape: Vec<usize>,
    order: ElementOrder,
    dimension: usize,
    block_len: usize,
    batch_len: usize,
}

impl<'a> BatchArray<'a> {
    /// Checks rank, matrix axes and data length before any computation.
    ///
    /// For [`ElementOrder::ColumnMajor`] the matrix axes are the first two
    /// entries of `shape`; for [`ElementOrder::RowMajor`] they are the last two.
    pub fn new(
        data: &'a [f64],
        shape: Vec<usize>,
        order: ElementOrder,
    ) -> Result<Self, BatchError> {
        let rank = shape.len();
        if rank < 2 {
            return Err(BatchError::RankTooSmall { rank });
        }

        let (rows, cols) = match order {
            ElementOrder::ColumnMajor => (shape[0], shape[1]),
            ElementOrder::RowMajor => (shape[rank - 2], shape[rank - 1]),
        };
        if rows != cols {
            return Err(BatchError::UnequalMatrixAxes { rows, cols });
        }

        let block_len = rows
            .checked_mul(cols)
            .ok_or_else(|| BatchError::ShapeOverflow {
                shape: shape.clone(),
            })?;
        let batch_len = batch_axes(&shape, order)
            .iter()
            .try_fold(1usize, |product, &extent| product.checked_mul(extent))
            .ok_or_else(|| BatchError::ShapeOverflow {
                shape: shape.clone(),
            })?;
        let expected = block_len
            .checked_mul(batch_len)
            .ok_or_else(|| BatchError::ShapeOverflow {
                shape: shape.clone(),
            })?;
        if data.len() != expected {
            return Err(BatchError::DataLengthMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            data,
            shape,
            order,
            dimension: rows,
            block_len,
            batch_len,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn order(&self) -> ElementOrder {
        self.order
    }

    /// Side length `n` shared by every matrix in the batch.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of matrices, the product of the batch-axis extents.
    pub fn batch_len(&self) -> usize {
        self.batch_len
    }

    /// Shape of the output: the input shape without its two matrix axes.
    pub fn batch_shape(&self) -> &[usize] {
        batch_axes(&self.shape, self.order)
    }

    /// Matrix at `index` in batch order, or `None` past the end of the batch.
    pub fn matrix(&self, index: usize) -> Option<MatrixView<'a>> {
        (index < self.batch_len).then(|| self.block(index))
    }

    /// Caller guarantees `index < batch_len`.
    pub(crate) fn block(&self, index: usize) -> MatrixView<'a> {
        let start = index * self.block_len;
        let block = &self.data[start..start + self.block_len];
        MatrixView::from_block(block, self.dimension, self.order)
    }
}

fn batch_axes(shape: &[usize], order: ElementOrder) -> &[usize] {
    match order {
        ElementOrder::ColumnMajor => &shape[2..],
        ElementOrder::RowMajor => &shape[..shape.len() - 2],
    }
}

/// One determinant per input matrix, in input batch order.
#[derive(Debug, Clone, PartialEq)]
pub struct DeterminantArray {
    shape: Vec<usize>,
    values: Vec<f64>,
    singular_indices: Vec<usize>,
}

impl DeterminantArray {
    pub fn new(shape: Vec<usize>, values: Vec<f64>, singular_indices: Vec<usize>) -> Self {
        Self {
            shape,
            values,
            singular_indices,
        }
    }

    /// Batch axes of the input; empty when the input was a single matrix.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Batch indices stored as `NaN` under [`crate::domain::SingularMatrixPolicy::RecordNan`].
    pub fn singular_indices(&self) -> &[usize] {
        &self.singular_indices
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    pub fn scalar(&self) -> Option<f64> {
        if self.is_scalar() {
            self.values.first().copied()
        } else {
            None
        }
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}
