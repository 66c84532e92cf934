//! Cofactor expansions for the two sizes that never touch scratch storage.
//!
//! Factor and term order are fixed to the column-major formulas
//! (`x[0]*x[3] - x[2]*x[1]` and its 3x3 counterpart), so rounding is the
//! same for every storage order.

use super::MatrixView;

pub fn determinant_2x2(view: &MatrixView<'_>) -> f64 {
    debug_assert_eq!(view.dimension(), 2);
    view.at(0, 0) * view.at(1, 1) - view.at(0, 1) * view.at(1, 0)
}

pub fn determinant_3x3(view: &MatrixView<'_>) -> f64 {
    debug_assert_eq!(view.dimension(), 3);
    let a = |row, col| view.at(row, col);

    a(0, 0) * a(1, 1) * a(2, 2)
        + a(2, 0) * a(0, 1) * a(1, 2)
        + a(1, 0) * a(2, 1) * a(0, 2)
        - a(2, 0) * a(1, 1) * a(0, 2)
        - a(1, 0) * a(0, 1) * a(2, 2)
        - a(0, 0) * a(2, 1) * a(1, 2)
}
