//! Model validation error types.

/// Errors detected while checking a model's shape, before any solver
/// resources are committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Cost and bound vectors cover a different number of columns.
    CostBoundMismatch { costs: usize, bounds: usize },
    /// Integrality was supplied but does not cover every column.
    IntegralityMismatch { columns: usize, integrality: usize },
    /// A row's coefficient count does not equal the column count.
    RowLengthMismatch {
        row: usize,
        coefficients: usize,
        columns: usize,
    },
    /// Row bound vectors do not match the number of rows.
    RowBoundMismatch {
        rows: usize,
        lower: usize,
        upper: usize,
    },
    /// No rows to encode row-dependent buffers from.
    EmptyRows,
    /// Bound-carrying rows were empty, leaving no column count to recover.
    EmptyBoundedRows,
    /// A bound-carrying row is too short to hold both of its bounds.
    BoundedRowTooShort { row: usize, len: usize },
}

impl ValidationError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::CostBoundMismatch { .. } => "MODEL_COST_BOUND_MISMATCH",
            ValidationError::IntegralityMismatch { .. } => "MODEL_INTEGRALITY_MISMATCH",
            ValidationError::RowLengthMismatch { .. } => "MODEL_ROW_LENGTH_MISMATCH",
            ValidationError::RowBoundMismatch { .. } => "MODEL_ROW_BOUND_MISMATCH",
            ValidationError::EmptyRows => "MODEL_ROWS_EMPTY",
            ValidationError::EmptyBoundedRows => "MODEL_BOUNDED_ROWS_EMPTY",
            ValidationError::BoundedRowTooShort { .. } => "MODEL_BOUNDED_ROW_TOO_SHORT",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::CostBoundMismatch { costs, bounds } => write!(
                f,
                "[{}] Cost vector covers {} columns but bounds cover {}",
                self.code(),
                costs,
                bounds
            ),
            ValidationError::IntegralityMismatch {
                columns,
                integrality,
            } => write!(
                f,
                "[{}] Integrality covers {} columns but the model has {}",
                self.code(),
                integrality,
                columns
            ),
            ValidationError::RowLengthMismatch {
                row,
                coefficients,
                columns,
            } => write!(
                f,
                "[{}] Row {} has {} coefficients but the model has {} columns",
                self.code(),
                row,
                coefficients,
                columns
            ),
            ValidationError::RowBoundMismatch { rows, lower, upper } => write!(
                f,
                "[{}] {} rows but {} lower and {} upper row bounds",
                self.code(),
                rows,
                lower,
                upper
            ),
            ValidationError::EmptyRows => {
                write!(f, "[{}] Model has no rows to encode", self.code())
            }
            ValidationError::EmptyBoundedRows => write!(
                f,
                "[{}] Bound-carrying rows are empty; at least one row is required",
                self.code()
            ),
            ValidationError::BoundedRowTooShort { row, len } => write!(
                f,
                "[{}] Bound-carrying row {} has length {}; at least 2 is required",
                self.code(),
                row,
                len
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
