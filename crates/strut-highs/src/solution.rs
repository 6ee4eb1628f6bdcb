//! Solution extraction from engine-owned state.

use crate::error::SolverError;
use crate::ffi::HighsHandle;

/// Primal and dual vectors for one solved model.
///
/// All four vectors are owned; nothing aliases engine memory once a
/// Solution has been returned, and the vectors are never mutated after
/// construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    pub(crate) col_primal: Vec<f64>,
    pub(crate) col_dual: Vec<f64>,
    pub(crate) row_primal: Vec<f64>,
    pub(crate) row_dual: Vec<f64>,
}

impl Solution {
    /// Primal values for columns (variables).
    pub fn col_primal(&self) -> &[f64] {
        &self.col_primal
    }

    /// Dual values for columns (reduced costs).
    pub fn col_dual(&self) -> &[f64] {
        &self.col_dual
    }

    /// Primal values for rows (constraint activity).
    pub fn row_primal(&self) -> &[f64] {
        &self.row_primal
    }

    /// Dual values for rows (shadow prices).
    pub fn row_dual(&self) -> &[f64] {
        &self.row_dual
    }

    /// Primal value of the column at `index`.
    pub fn get_col_primal(&self, index: usize) -> Option<f64> {
        self.col_primal.get(index).copied()
    }

    /// Dual value of the column at `index`.
    pub fn get_col_dual(&self, index: usize) -> Option<f64> {
        self.col_dual.get(index).copied()
    }

    /// Dual value of the row at `index`.
    pub fn get_row_dual(&self, index: usize) -> Option<f64> {
        self.row_dual.get(index).copied()
    }

    pub fn num_cols(&self) -> usize {
        self.col_primal.len()
    }

    pub fn num_rows(&self) -> usize {
        self.row_primal.len()
    }

    /// Take ownership of the four vectors:
    /// `(col_primal, col_dual, row_primal, row_dual)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        (
            self.col_primal,
            self.col_dual,
            self.row_primal,
            self.row_dual,
        )
    }
}

/// Copy the engine's solution vectors into an owned [`Solution`].
///
/// The scratch vectors are extraction-local: the engine fills them and
/// they become the result, so nothing is registered in the long-lived
/// arena and nothing needs a separate copy-out. Zero rows or columns
/// produce empty vectors.
pub fn extract(
    handle: &HighsHandle,
    num_col: usize,
    num_row: usize,
) -> Result<Solution, SolverError> {
    let mut col_primal = vec![0.0; num_col];
    let mut col_dual = vec![0.0; num_col];
    let mut row_primal = vec![0.0; num_row];
    let mut row_dual = vec![0.0; num_row];

    let status = handle.solution_into(
        &mut col_primal,
        &mut col_dual,
        &mut row_primal,
        &mut row_dual,
    );
    if !status.is_success() {
        return Err(SolverError::EngineCall {
            operation: "get_solution",
            code: status.raw(),
        });
    }

    Ok(Solution {
        col_primal,
        col_dual,
        row_primal,
        row_dual,
    })
}
