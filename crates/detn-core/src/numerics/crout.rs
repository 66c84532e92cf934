//! In-place Crout LU factorization with partial pivoting and implicit row scaling.
//!
//! The factorization overwrites a scratch copy of the input. After
//! [`CroutScratch::factorize`] the diagonal of the scratch matrix holds the
//! pivots of `U`, and the returned sign is the parity of the row swaps, so the
//! determinant is `sign * prod(diag)`.

use super::MatrixView;
use faer::Mat;

/// Substituted for an exactly-zero pivot so downstream products stay finite.
/// This is not a singularity test; only an all-zero row is reported as singular.
pub const TINY_PIVOT: f64 = 1.0e-20;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LuError {
    #[error("singular matrix: row {row} is all zeros")]
    SingularMatrix { row: usize },
    #[error("scratch holds a {scratch}x{scratch} matrix but the view is {view}x{view}")]
    DimensionMismatch { scratch: usize, view: usize },
    #[error("cannot allocate LU scratch for a {dimension}x{dimension} matrix")]
    ScratchAllocation { dimension: usize },
}

/// Working storage for one factorization: the matrix copy and the per-row
/// scale factors. Reusable across calls of the same dimension.
#[derive(Debug, Clone)]
pub struct CroutScratch {
    matrix: Mat<f64>,
    scale: Vec<f64>,
}

impl CroutScratch {
    pub fn new(dimension: usize) -> Self {
        Self {
            matrix: Mat::<f64>::zeros(dimension, dimension),
            scale: vec![0.0; dimension],
        }
    }

    /// Like [`CroutScratch::new`] but reports an oversized or unobtainable
    /// scale vector instead of aborting. The matrix itself comes from faer's
    /// allocator once its byte size is known to be representable.
    pub fn try_new(dimension: usize) -> Result<Self, LuError> {
        let too_large = LuError::ScratchAllocation { dimension };
        let max_elements = isize::MAX as usize / std::mem::size_of::<f64>();
        dimension
            .checked_mul(dimension)
            .filter(|&elements| elements <= max_elements)
            .ok_or_else(|| too_large.clone())?;

        let mut scale = Vec::new();
        scale
            .try_reserve_exact(dimension)
            .map_err(|_| too_large)?;
        scale.resize(dimension, 0.0);

        Ok(Self {
            matrix: Mat::<f64>::zeros(dimension, dimension),
            scale,
        })
    }

    pub fn dimension(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn matrix(&self) -> &Mat<f64> {
        &self.matrix
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Copies `view` into the scratch matrix. The view is never written.
    pub fn load(&mut self, view: &MatrixView<'_>) -> Result<(), LuError> {
        let dimension = self.dimension();
        if view.dimension() != dimension {
            return Err(LuError::DimensionMismatch {
                scratch: dimension,
                view: view.dimension(),
            });
        }

        for row in 0..dimension {
            for col in 0..dimension {
                self.matrix[(row, col)] = view.at(row, col);
            }
        }
        Ok(())
    }

    /// Factors the loaded matrix in place and returns the permutation sign.
    pub fn factorize(&mut self) -> Result<f64, LuError> {
        let dimension = self.dimension();
        let a = &mut self.matrix;
        let scale = &mut self.scale;
        let mut sign = 1.0;

        for row in 0..dimension {
            let mut big = 0.0;
            for col in 0..dimension {
                let magnitude = a[(row, col)].abs();
                if magnitude > big {
                    big = magnitude;
                }
            }
            if big == 0.0 {
                return Err(LuError::SingularMatrix { row });
            }
            scale[row] = 1.0 / big;
        }

        for col in 0..dimension {
            for row in 0..col {
                let mut sum = a[(row, col)];
                for k in 0..row {
                    sum -= a[(row, k)] * a[(k, col)];
                }
                a[(row, col)] = sum;
            }

            let mut big = 0.0;
            let mut pivot_row = col;
            for row in col..dimension {
                let mut sum = a[(row, col)];
                for k in 0..col {
                    sum -= a[(row, k)] * a[(k, col)];
                }
                a[(row, col)] = sum;

                // `>=` lets the last of several equal candidates win.
                let candidate = scale[row] * sum.abs();
                if candidate >= big {
                    big = candidate;
                    pivot_row = row;
                }
            }

            if pivot_row != col {
                swap_rows(a, pivot_row, col);
                sign = -sign;
                // Copy, not exchange: row `col`'s old contents now live at `pivot_row`.
                scale[pivot_row] = scale[col];
            }

            if a[(col, col)] == 0.0 {
                a[(col, col)] = TINY_PIVOT;
            }

            if col + 1 != dimension {
                let inverse_pivot = 1.0 / a[(col, col)];
                for row in (col + 1)..dimension {
                    a[(row, col)] *= inverse_pivot;
                }
            }
        }

        Ok(sign)
    }

    /// `sign * prod(diag)`, multiplied left to right starting from the sign.
    pub fn signed_diagonal_product(&self, sign: f64) -> f64 {
        let mut determinant = sign;
        for index in 0..self.dimension() {
            determinant *= self.matrix[(index, index)];
        }
        determinant
    }

    /// Loads, factors and reduces `view` to its determinant.
    pub fn determinant(&mut self, view: &MatrixView<'_>) -> Result<f64, LuError> {
        self.load(view)?;
        let sign = self.factorize()?;
        Ok(self.signed_diagonal_product(sign))
    }
}

fn swap_rows(matrix: &mut Mat<f64>, lhs: usize, rhs: usize) {
    if lhs == rhs {
        return;
    }

    for col in 0..matrix.ncols() {
        let value = matrix[(lhs, col)];
        matrix[(lhs, col)] = matrix[(rhs, col)];
        matrix[(rhs, col)] = value;
    }
}
