//! Boundary layer between [`strut_model::Model`] and the HiGHS engine.
//!
//! Nothing in this crate solves anything: the simplex, interior-point
//! and branch-and-bound machinery lives in the engine behind a narrow C
//! call surface. This crate owns the parts around that surface — the
//! foreign buffer arena the engine reads problems from, the encoder
//! that lowers a model into those buffers, the dispatcher that picks
//! the LP or MIP entry point and interprets the resulting status, and
//! the extractor that copies the primal/dual vectors back out.
//!
//! A [`Solver`] is single-owner state: one engine instance, one arena,
//! one model, every operation `&mut self`. Run one solver per thread.

pub mod arena;
mod encode;
pub mod error;
pub mod ffi;
pub mod solution;
pub mod solver;

pub use arena::{BufferKey, ForeignArena};
pub use error::SolverError;
pub use ffi::{highs_version, CallStatus, HighsHandle, ModelStatus, Sense, SolutionStatus};
pub use solution::{extract, Solution};
pub use solver::Solver;
