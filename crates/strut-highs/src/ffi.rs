//! FFI call surface over the HiGHS C API.
//!
//! This module holds the unsafe engine boundary; apart from the buffer
//! arena, nothing outside it touches a raw pointer. Status enumerations
//! mirror the engine's wire values ordinal-for-ordinal and must not be
//! reordered.
#![allow(unsafe_code)]

use crate::encode::EncodedProblem;
use highs_sys::{
    HighsInt, Highs_addCols, Highs_addRows, Highs_changeObjectiveSense, Highs_create,
    Highs_destroy, Highs_getBoolOptionValue, Highs_getIntInfoValue, Highs_getModelStatus,
    Highs_getObjectiveSense, Highs_getSolution, Highs_getStringOptionValue, Highs_passLp,
    Highs_passMip, Highs_run, Highs_setBoolOptionValue, Highs_setStringOptionValue,
    Highs_version, STATUS_OK,
};
use std::ffi::{c_char, c_void, CStr, CString};
use std::fmt;
use std::ptr;
use strut_model::{Integrality, PackedMatrix};
use tracing::{debug, trace, warn};

/// Row-wise (CSR) matrix format marker in the engine wire protocol.
const MATRIX_FORMAT_ROW_WISE: HighsInt = 2;

/// Objective offset passed with every load; the model form carries none.
const OBJECTIVE_OFFSET: f64 = 0.0;

/// Engine option values are bounded C strings; HiGHS caps them below this.
const STRING_OPTION_CAPACITY: usize = 512;

/// Return code of a single engine entry point call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Ok,
    Warning,
    Error,
}

impl CallStatus {
    pub(crate) fn from_raw(raw: HighsInt) -> Self {
        match raw {
            0 => CallStatus::Ok,
            1 => CallStatus::Warning,
            _ => CallStatus::Error,
        }
    }

    /// Warnings still carry a usable result; only a hard error fails.
    pub fn is_success(self) -> bool {
        !matches!(self, CallStatus::Error)
    }

    pub fn raw(self) -> i32 {
        match self {
            CallStatus::Ok => 0,
            CallStatus::Warning => 1,
            CallStatus::Error => -1,
        }
    }
}

/// Terminal model status reported by the engine after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ModelStatus {
    NotSet = 0,
    LoadError = 1,
    Error = 2,
    PresolveError = 3,
    SolveError = 4,
    PostsolveError = 5,
    Empty = 6,
    Optimal = 7,
    Infeasible = 8,
    UnboundedOrInfeasible = 9,
    Unbounded = 10,
    ObjectiveBound = 11,
    ObjectiveTarget = 12,
    TimeLimit = 13,
    IterationLimit = 14,
    Unknown = 15,
}

impl ModelStatus {
    pub(crate) fn from_raw(raw: HighsInt) -> Self {
        match raw {
            0 => ModelStatus::NotSet,
            1 => ModelStatus::LoadError,
            2 => ModelStatus::Error,
            3 => ModelStatus::PresolveError,
            4 => ModelStatus::SolveError,
            5 => ModelStatus::PostsolveError,
            6 => ModelStatus::Empty,
            7 => ModelStatus::Optimal,
            8 => ModelStatus::Infeasible,
            9 => ModelStatus::UnboundedOrInfeasible,
            10 => ModelStatus::Unbounded,
            11 => ModelStatus::ObjectiveBound,
            12 => ModelStatus::ObjectiveTarget,
            13 => ModelStatus::TimeLimit,
            14 => ModelStatus::IterationLimit,
            _ => ModelStatus::Unknown,
        }
    }

    pub fn is_optimal(self) -> bool {
        matches!(self, ModelStatus::Optimal)
    }

    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelStatus::NotSet => "not_set",
            ModelStatus::LoadError => "load_error",
            ModelStatus::Error => "error",
            ModelStatus::PresolveError => "presolve_error",
            ModelStatus::SolveError => "solve_error",
            ModelStatus::PostsolveError => "postsolve_error",
            ModelStatus::Empty => "empty",
            ModelStatus::Optimal => "optimal",
            ModelStatus::Infeasible => "infeasible",
            ModelStatus::UnboundedOrInfeasible => "unbounded_or_infeasible",
            ModelStatus::Unbounded => "unbounded",
            ModelStatus::ObjectiveBound => "objective_bound",
            ModelStatus::ObjectiveTarget => "objective_target",
            ModelStatus::TimeLimit => "time_limit",
            ModelStatus::IterationLimit => "iteration_limit",
            ModelStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quality of the primal solution vector from the latest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SolutionStatus {
    None = 0,
    Infeasible = 1,
    Feasible = 2,
}

impl SolutionStatus {
    pub(crate) fn from_raw(raw: HighsInt) -> Self {
        match raw {
            1 => SolutionStatus::Infeasible,
            2 => SolutionStatus::Feasible,
            _ => SolutionStatus::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolutionStatus::None => "none",
            SolutionStatus::Infeasible => "infeasible",
            SolutionStatus::Feasible => "feasible",
        }
    }
}

/// Objective sense, in the engine's own encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Sense {
    Minimize = 1,
    Maximize = -1,
}

impl Sense {
    pub(crate) fn raw(self) -> HighsInt {
        self as HighsInt
    }

    pub(crate) fn from_raw(raw: HighsInt) -> Option<Self> {
        match raw {
            1 => Some(Sense::Minimize),
            -1 => Some(Sense::Maximize),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "minimize",
            Sense::Maximize => "maximize",
        }
    }
}

/// Integrality markers in the engine's wire encoding.
pub(crate) fn integrality_raw(kind: Integrality) -> HighsInt {
    match kind {
        Integrality::Continuous => 0,
        Integrality::Integer => 1,
        Integrality::ImplicitInteger => 2,
    }
}

/// Owning handle to one engine instance.
///
/// The instance is exclusively owned: every mutating call takes
/// `&mut self`. The handle is `Send` but not `Sync` — one handle per
/// thread, and independent handles share nothing.
pub struct HighsHandle {
    ptr: *mut c_void,
}

// The engine instance is owned by exactly one handle, so moving it
// across threads is sound. The raw pointer keeps `Sync` out, which is
// the intended contract: HiGHS instances have no internal locking.
unsafe impl Send for HighsHandle {}

impl HighsHandle {
    /// Create a fresh engine instance; `None` when the engine cannot
    /// allocate one.
    pub fn create() -> Option<Self> {
        let ptr = unsafe { Highs_create() };
        if ptr.is_null() {
            warn!(
                component = "ffi",
                operation = "create",
                status = "error",
                "Engine instance allocation failed"
            );
            return None;
        }
        debug!(
            component = "ffi",
            operation = "create",
            status = "success",
            "Created engine instance"
        );
        Some(HighsHandle { ptr })
    }

    /// Append columns with their costs and bounds, no coefficients yet.
    pub fn add_cols(&mut self, costs: &[f64], lower: &[f64], upper: &[f64]) -> CallStatus {
        if costs.len() != lower.len() || costs.len() != upper.len() {
            warn!(
                component = "ffi",
                operation = "add_cols",
                status = "error",
                costs = costs.len(),
                lower = lower.len(),
                upper = upper.len(),
                "Column slice lengths differ"
            );
            return CallStatus::Error;
        }
        trace!(
            component = "ffi",
            operation = "add_cols",
            status = "success",
            num_cols = costs.len(),
            "Adding columns"
        );
        let status = unsafe {
            Highs_addCols(
                self.ptr,
                costs.len() as HighsInt,
                costs.as_ptr(),
                lower.as_ptr(),
                upper.as_ptr(),
                0,
                ptr::null(),
                ptr::null(),
                ptr::null(),
            )
        };
        CallStatus::from_raw(status)
    }

    /// Append rows given their bounds and packed coefficients.
    pub fn add_rows(&mut self, lower: &[f64], upper: &[f64], matrix: &PackedMatrix) -> CallStatus {
        if lower.len() != matrix.num_rows() || upper.len() != matrix.num_rows() {
            warn!(
                component = "ffi",
                operation = "add_rows",
                status = "error",
                rows = matrix.num_rows(),
                lower = lower.len(),
                upper = upper.len(),
                "Row bound lengths differ from packed row count"
            );
            return CallStatus::Error;
        }
        let start: Vec<HighsInt> = matrix.start.iter().map(|&v| v as HighsInt).collect();
        let index: Vec<HighsInt> = matrix.index.iter().map(|&v| v as HighsInt).collect();
        trace!(
            component = "ffi",
            operation = "add_rows",
            status = "success",
            num_rows = matrix.num_rows(),
            num_nz = matrix.num_nonzeros(),
            "Adding rows"
        );
        let status = unsafe {
            Highs_addRows(
                self.ptr,
                lower.len() as HighsInt,
                lower.as_ptr(),
                upper.as_ptr(),
                matrix.num_nonzeros() as HighsInt,
                start.as_ptr(),
                index.as_ptr(),
                matrix.values.as_ptr(),
            )
        };
        CallStatus::from_raw(status)
    }

    /// Load a continuous problem through the LP entry point.
    pub(crate) fn pass_lp(&mut self, problem: &EncodedProblem, sense: Sense) -> CallStatus {
        debug!(
            component = "ffi",
            operation = "pass_lp",
            status = "success",
            num_cols = problem.num_col,
            num_rows = problem.num_row,
            num_nz = problem.num_nz,
            sense = sense.as_str(),
            "Loading LP"
        );
        let status = unsafe {
            Highs_passLp(
                self.ptr,
                problem.num_col,
                problem.num_row,
                problem.num_nz,
                MATRIX_FORMAT_ROW_WISE,
                sense.raw(),
                OBJECTIVE_OFFSET,
                problem.col_cost,
                problem.col_lower,
                problem.col_upper,
                problem.row_lower,
                problem.row_upper,
                problem.row_start,
                problem.row_index,
                problem.row_value,
            )
        };
        CallStatus::from_raw(status)
    }

    /// Load an integrality-carrying problem through the MIP entry point.
    pub(crate) fn pass_mip(&mut self, problem: &EncodedProblem, sense: Sense) -> CallStatus {
        let Some(integrality) = problem.integrality else {
            warn!(
                component = "ffi",
                operation = "pass_mip",
                status = "error",
                "MIP load without an integrality buffer"
            );
            return CallStatus::Error;
        };
        debug!(
            component = "ffi",
            operation = "pass_mip",
            status = "success",
            num_cols = problem.num_col,
            num_rows = problem.num_row,
            num_nz = problem.num_nz,
            sense = sense.as_str(),
            "Loading MIP"
        );
        let status = unsafe {
            Highs_passMip(
                self.ptr,
                problem.num_col,
                problem.num_row,
                problem.num_nz,
                MATRIX_FORMAT_ROW_WISE,
                sense.raw(),
                OBJECTIVE_OFFSET,
                problem.col_cost,
                problem.col_lower,
                problem.col_upper,
                problem.row_lower,
                problem.row_upper,
                problem.row_start,
                problem.row_index,
                problem.row_value,
                integrality,
            )
        };
        CallStatus::from_raw(status)
    }

    /// Run the engine on the loaded problem.
    pub fn run(&mut self) -> CallStatus {
        debug!(
            component = "ffi",
            operation = "run",
            status = "success",
            "Running solve"
        );
        CallStatus::from_raw(unsafe { Highs_run(self.ptr) })
    }

    /// Terminal status of the loaded model.
    pub fn model_status(&self) -> ModelStatus {
        ModelStatus::from_raw(unsafe { Highs_getModelStatus(self.ptr) })
    }

    /// Copy the engine's solution vectors into the provided slices.
    pub(crate) fn solution_into(
        &self,
        col_value: &mut [f64],
        col_dual: &mut [f64],
        row_value: &mut [f64],
        row_dual: &mut [f64],
    ) -> CallStatus {
        CallStatus::from_raw(unsafe {
            Highs_getSolution(
                self.ptr,
                col_value.as_mut_ptr(),
                col_dual.as_mut_ptr(),
                row_value.as_mut_ptr(),
                row_dual.as_mut_ptr(),
            )
        })
    }

    /// Set the objective sense on the engine's current model.
    pub fn change_objective_sense(&mut self, sense: Sense) -> CallStatus {
        debug!(
            component = "ffi",
            operation = "change_objective_sense",
            status = "success",
            sense = sense.as_str(),
            "Setting objective sense"
        );
        CallStatus::from_raw(unsafe { Highs_changeObjectiveSense(self.ptr, sense.raw()) })
    }

    /// Objective sense as the engine reports it.
    pub fn objective_sense(&self) -> Option<Sense> {
        let mut raw: HighsInt = 0;
        let status = unsafe { Highs_getObjectiveSense(self.ptr, &mut raw) };
        if !CallStatus::from_raw(status).is_success() {
            return None;
        }
        Sense::from_raw(raw)
    }

    pub fn set_string_option(&mut self, option: &str, value: &str) -> CallStatus {
        let (Ok(c_option), Ok(c_value)) = (CString::new(option), CString::new(value)) else {
            warn!(
                component = "ffi",
                operation = "set_string_option",
                status = "error",
                option,
                "Option name or value contains a NUL byte"
            );
            return CallStatus::Error;
        };
        CallStatus::from_raw(unsafe {
            Highs_setStringOptionValue(self.ptr, c_option.as_ptr(), c_value.as_ptr())
        })
    }

    pub fn string_option(&self, option: &str) -> Option<String> {
        let c_option = CString::new(option).ok()?;
        let mut buffer = vec![0u8; STRING_OPTION_CAPACITY];
        let status = unsafe {
            Highs_getStringOptionValue(
                self.ptr,
                c_option.as_ptr(),
                buffer.as_mut_ptr().cast::<c_char>(),
            )
        };
        if !CallStatus::from_raw(status).is_success() {
            return None;
        }
        let value = CStr::from_bytes_until_nul(&buffer).ok()?;
        value.to_str().ok().map(|s| s.to_string())
    }

    pub fn set_bool_option(&mut self, option: &str, value: bool) -> CallStatus {
        let Ok(c_option) = CString::new(option) else {
            warn!(
                component = "ffi",
                operation = "set_bool_option",
                status = "error",
                option,
                "Option name contains a NUL byte"
            );
            return CallStatus::Error;
        };
        CallStatus::from_raw(unsafe {
            Highs_setBoolOptionValue(self.ptr, c_option.as_ptr(), HighsInt::from(value))
        })
    }

    pub fn bool_option(&self, option: &str) -> Option<bool> {
        let c_option = CString::new(option).ok()?;
        let mut raw: HighsInt = 0;
        let status = unsafe { Highs_getBoolOptionValue(self.ptr, c_option.as_ptr(), &mut raw) };
        if !CallStatus::from_raw(status).is_success() {
            return None;
        }
        Some(raw != 0)
    }

    /// Read an integer info value for the latest run.
    pub fn int_info(&self, name: &str) -> Option<i64> {
        let c_name = CString::new(name).ok()?;
        let mut value: HighsInt = 0;
        let status = unsafe { Highs_getIntInfoValue(self.ptr, c_name.as_ptr(), &mut value) };
        if status != STATUS_OK {
            debug!(
                component = "ffi",
                operation = "int_info",
                info = name,
                status_code = status,
                "Info value not available"
            );
            return None;
        }
        Some(i64::from(value))
    }

    /// Solution status of the primal vector from the latest run.
    pub fn primal_solution_status(&self) -> SolutionStatus {
        match self.int_info("primal_solution_status") {
            Some(raw) => SolutionStatus::from_raw(raw as HighsInt),
            None => SolutionStatus::None,
        }
    }
}

impl Drop for HighsHandle {
    fn drop(&mut self) {
        unsafe { Highs_destroy(self.ptr) };
        trace!(
            component = "ffi",
            operation = "destroy",
            status = "success",
            "Destroyed engine instance"
        );
    }
}

impl fmt::Debug for HighsHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighsHandle").finish_non_exhaustive()
    }
}

/// Return the engine version string, if available.
pub fn highs_version() -> Option<String> {
    unsafe {
        let ptr = Highs_version();
        if ptr.is_null() {
            None
        } else {
            CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
        }
    }
}
