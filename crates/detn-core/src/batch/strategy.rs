use crate::numerics::{CroutScratch, LuError, MatrixView, determinant_2x2, determinant_3x3};

/// How a matrix of a given size is reduced to its determinant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeterminantStrategy {
    /// `0 x 0`: the empty product.
    Empty,
    TwoByTwo,
    ThreeByThree,
    /// `1 x 1` and `4 x 4` and up.
    Crout,
}

impl DeterminantStrategy {
    pub const fn for_dimension(dimension: usize) -> Self {
        match dimension {
            0 => Self::Empty,
            2 => Self::TwoByTwo,
            3 => Self::ThreeByThree,
            _ => Self::Crout,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TwoByTwo => "closed-form-2x2",
            Self::ThreeByThree => "closed-form-3x3",
            Self::Crout => "crout-lu",
        }
    }

    /// Side length of the scratch matrix this strategy needs; zero means none.
    pub const fn scratch_dimension(self, dimension: usize) -> usize {
        match self {
            Self::Crout => dimension,
            Self::Empty | Self::TwoByTwo | Self::ThreeByThree => 0,
        }
    }

    pub fn evaluate(
        self,
        view: &MatrixView<'_>,
        scratch: &mut CroutScratch,
    ) -> Result<f64, LuError> {
        match self {
            Self::Empty => Ok(1.0),
            Self::TwoByTwo => Ok(determinant_2x2(view)),
            Self::ThreeByThree => Ok(determinant_3x3(view)),
            Self::Crout => scratch.determinant(view),
        }
    }
}

/// Determinant of a single matrix, choosing the strategy from its size.
///
/// `scratch` is only touched on the Crout path and must then match the view's dimension.
pub fn determinant(view: &MatrixView<'_>, scratch: &mut CroutScratch) -> Result<f64, LuError> {
    DeterminantStrategy::for_dimension(view.dimension()).evaluate(view, scratch)
}

/// Determinant of a single matrix through the LU path regardless of its size.
pub fn crout_determinant(
    view: &MatrixView<'_>,
    scratch: &mut CroutScratch,
) -> Result<f64, LuError> {
    scratch.determinant(view)
}
