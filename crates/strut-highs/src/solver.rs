//! Solve dispatch: entry-point choice, status interpretation, teardown.

use crate::arena::ForeignArena;
use crate::encode::encode;
use crate::error::SolverError;
use crate::ffi::{HighsHandle, ModelStatus, Sense, SolutionStatus};
use crate::solution::{extract, Solution};
use std::fmt;
use strut_model::Model;
use tracing::{debug, warn};

/// Dispatcher owning one model, one engine instance and the buffer
/// arena that feeds it.
///
/// A `Solver` is single-owner state: every state-changing operation
/// takes `&mut self`, and the type is `Send` but not `Sync`. Run one
/// solver per thread; independent solvers share nothing, so any number
/// of them may run concurrently.
pub struct Solver {
    model: Model,
    handle: HighsHandle,
    arena: ForeignArena,
    sense: Sense,
}

impl Solver {
    /// Create a solver for `model` with a fresh engine instance.
    ///
    /// Engine console output starts disabled; see
    /// [`set_log_to_console`](Self::set_log_to_console).
    pub fn new(model: Model) -> Result<Self, SolverError> {
        let mut handle = HighsHandle::create().ok_or(SolverError::EngineUnavailable)?;
        handle.set_bool_option("output_flag", false);
        debug!(
            component = "solver",
            operation = "init",
            status = "success",
            variables = model.num_cols(),
            constraints = model.num_rows(),
            "Created solver"
        );
        Ok(Solver {
            model,
            handle,
            arena: ForeignArena::new(),
            sense: Sense::Minimize,
        })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Mutable access for incremental model construction between
    /// solves. The next [`solve`](Self::solve) re-encodes the model and
    /// replaces every engine buffer.
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Set the objective sense for subsequent runs.
    ///
    /// Any Solution returned before this call describes the old sense;
    /// the engine's copy of it goes stale here.
    pub fn set_objective_sense(&mut self, sense: Sense) {
        self.sense = sense;
        self.handle.change_objective_sense(sense);
    }

    /// Objective sense as the engine currently reports it.
    pub fn objective_sense(&self) -> Sense {
        self.handle.objective_sense().unwrap_or(self.sense)
    }

    /// Enable or disable engine console logging.
    pub fn set_log_to_console(&mut self, enabled: bool) {
        self.handle.set_bool_option("output_flag", enabled);
    }

    pub fn set_string_option(&mut self, option: &str, value: &str) -> Result<(), SolverError> {
        let status = self.handle.set_string_option(option, value);
        if !status.is_success() {
            return Err(SolverError::EngineCall {
                operation: "set_string_option",
                code: status.raw(),
            });
        }
        Ok(())
    }

    pub fn string_option(&self, option: &str) -> Option<String> {
        self.handle.string_option(option)
    }

    pub fn set_bool_option(&mut self, option: &str, value: bool) -> Result<(), SolverError> {
        let status = self.handle.set_bool_option(option, value);
        if !status.is_success() {
            return Err(SolverError::EngineCall {
                operation: "set_bool_option",
                code: status.raw(),
            });
        }
        Ok(())
    }

    pub fn bool_option(&self, option: &str) -> Option<bool> {
        self.handle.bool_option(option)
    }

    /// Solution status of the primal vector from the latest run.
    pub fn primal_solution_status(&self) -> SolutionStatus {
        self.handle.primal_solution_status()
    }

    /// Encode the model, load it through the LP or MIP entry point, run
    /// the engine and interpret the terminal status.
    ///
    /// Only an `Optimal` status yields a Solution; every other terminal
    /// status comes back as [`SolverError::SolveFailure`] carrying the
    /// status label.
    pub fn solve(&mut self) -> Result<Solution, SolverError> {
        let encoded = encode(&self.model, &mut self.arena)?;
        let mip = self.model.is_mip();

        let operation = if mip { "pass_mip" } else { "pass_lp" };
        let load = if mip {
            self.handle.pass_mip(&encoded, self.sense)
        } else {
            self.handle.pass_lp(&encoded, self.sense)
        };
        if !load.is_success() {
            warn!(
                component = "solver",
                operation,
                status = "error",
                code = load.raw(),
                "Engine rejected problem load"
            );
            return Err(SolverError::EngineCall {
                operation,
                code: load.raw(),
            });
        }

        let run = self.handle.run();
        if !run.is_success() {
            warn!(
                component = "solver",
                operation = "run",
                status = "error",
                code = run.raw(),
                "Engine run failed"
            );
            return Err(SolverError::EngineCall {
                operation: "run",
                code: run.raw(),
            });
        }

        let status = self.handle.model_status();
        debug!(
            component = "solver",
            operation = "solve",
            status = "success",
            model_status = status.as_str(),
            mip,
            "Run finished"
        );
        if status != ModelStatus::Optimal {
            return Err(SolverError::SolveFailure { status });
        }

        extract(&self.handle, self.model.num_cols(), self.model.num_rows())
    }

    /// Deterministic teardown of the engine-facing buffers.
    ///
    /// Dropping the solver performs the same release as a backstop, but
    /// callers that keep a solver alive after its last solve should
    /// release explicitly.
    pub fn release_native(&mut self) {
        self.arena.release_all();
    }

    /// Number of live foreign buffers backing the loaded problem.
    pub fn live_allocations(&self) -> usize {
        self.arena.live()
    }
}

impl fmt::Debug for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("variables", &self.model.num_cols())
            .field("constraints", &self.model.num_rows())
            .field("sense", &self.sense)
            .field("live_allocations", &self.arena.live())
            .finish_non_exhaustive()
    }
}
