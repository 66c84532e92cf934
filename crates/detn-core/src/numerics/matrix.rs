use crate::domain::ElementOrder;

/// Borrowed `n x n` window over caller-owned storage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixView<'a> {
    data: &'a [f64],
    dimension: usize,
    order: ElementOrder,
}

impl<'a> MatrixView<'a> {
    /// Returns `None` when `data` does not hold exactly `dimension * dimension` values.
    pub fn new(data: &'a [f64], dimension: usize, order: ElementOrder) -> Option<Self> {
        let expected = dimension.checked_mul(dimension)?;
        (data.len() == expected).then_some(Self {
            data,
            dimension,
            order,
        })
    }

    /// Caller guarantees `data.len() == dimension * dimension`.
    pub(crate) const fn from_block(data: &'a [f64], dimension: usize, order: ElementOrder) -> Self {
        Self {
            data,
            dimension,
            order,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn order(&self) -> ElementOrder {
        self.order
    }

    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[self.order.offset(self.dimension, row, col)]
    }
}
