//! Batched determinants of real square matrices.
//!
//! A batch is one flat `f64` array holding equally sized `n x n` matrices
//! back to back. Sizes 2 and 3 use closed-form expansions; every other size
//! goes through an in-place Crout LU factorization with implicit scaling.

pub mod batch;
pub mod config;
pub mod domain;
pub mod numerics;
pub mod serialization;

pub use batch::{
    BatchArray, BatchDeterminant, BatchDeterminantApi, BatchError, DeterminantArray,
    batch_determinants,
};
pub use config::{DeterminantConfig, load_determinant_config};
pub use domain::{
    DetnError, DetnErrorCategory, DetnResult, ElementOrder, ExecutionMode, SingularMatrixPolicy,
};
