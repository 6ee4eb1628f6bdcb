//! Boundary-layer error types.

use crate::ffi::ModelStatus;
use strut_model::ValidationError;

/// Error type for solver boundary operations.
///
/// `SolveFailure` is an expected outcome, not an exceptional one: any
/// terminal status other than optimal comes back through it so callers
/// can branch on the status label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// The model failed shape validation before the engine was touched.
    InvalidModel(ValidationError),
    /// The engine failed to allocate an instance.
    EngineUnavailable,
    /// An engine entry point reported a non-success return code.
    EngineCall {
        operation: &'static str,
        code: i32,
    },
    /// The run completed with a terminal status other than optimal.
    SolveFailure { status: ModelStatus },
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::InvalidModel(_) => "SOLVER_INVALID_MODEL",
            SolverError::EngineUnavailable => "SOLVER_ENGINE_UNAVAILABLE",
            SolverError::EngineCall { .. } => "SOLVER_ENGINE_CALL_FAILED",
            SolverError::SolveFailure { .. } => "SOLVER_SOLVE_FAILURE",
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::InvalidModel(err) => write!(f, "[{}] {}", self.code(), err),
            SolverError::EngineUnavailable => {
                write!(f, "[{}] Engine instance could not be created", self.code())
            }
            SolverError::EngineCall { operation, code } => write!(
                f,
                "[{}] Engine call {} returned status {}",
                self.code(),
                operation,
                code
            ),
            SolverError::SolveFailure { status } => write!(
                f,
                "[{}] Solver finished without an optimal solution: {}",
                self.code(),
                status
            ),
        }
    }
}

impl std::error::Error for SolverError {}

impl From<ValidationError> for SolverError {
    fn from(err: ValidationError) -> Self {
        SolverError::InvalidModel(err)
    }
}
