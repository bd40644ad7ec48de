use std::error::Error;
use std::fmt;

use faer::Mat;
use faer::linalg::solvers::Solve;
use faer_ext::{IntoFaer, IntoNdarray};
use ndarray::{Array1, Array2};

/// Residual above which a solution of `A x = b` is rejected, scaled by `max(1, max |b_i|)`.
const RESIDUAL_TOLERANCE: f64 = 1e-8;

#[derive(Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// `A` is singular or too ill conditioned to trust the solution.
    SingularMatrix,
    DimensionMismatch { rows: usize, cols: usize, rhs: usize },
}

impl fmt::Display for LinalgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinalgError::SingularMatrix => write!(f, "matrix is singular or near singular"),
            LinalgError::DimensionMismatch { rows, cols, rhs } => write!(
                f,
                "cannot solve a {}x{} system with a right hand side of length {}",
                rows, cols, rhs
            ),
        }
    }
}

impl Error for LinalgError {}

/// Solves the dense square system `A x = b` with an LU decomposition with partial pivoting.
///
/// faer does not report singularity itself: a zero pivot shows up as non finite entries in
/// the solution. Those, and solutions that do not reproduce `b`, are reported as
/// `LinalgError::SingularMatrix`.
pub fn solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, LinalgError> {
    let (rows, cols) = a.dim();
    if rows != cols || rows != b.len() {
        return Err(LinalgError::DimensionMismatch {
            rows,
            cols,
            rhs: b.len(),
        });
    }
    let a_faer = a.view().into_faer();
    let rhs = Mat::<f64>::from_fn(rows, 1, |i, _| b[i]);
    let plu = a_faer.partial_piv_lu();
    let solution = plu.solve(&rhs);
    // faer answers with a (n x 1) matrix
    let solution = solution.as_ref().into_ndarray().column(0).to_owned();

    if solution.iter().any(|x| !x.is_finite()) {
        return Err(LinalgError::SingularMatrix);
    }
    let residual = a.dot(&solution) - b;
    let scale = b.iter().fold(1.0_f64, |acc, &v| acc.max(v.abs()));
    if residual.iter().any(|r| r.abs() > RESIDUAL_TOLERANCE * scale) {
        return Err(LinalgError::SingularMatrix);
    }
    Ok(solution)
}
