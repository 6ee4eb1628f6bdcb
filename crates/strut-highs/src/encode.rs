//! Lowering a model into arena-owned engine buffers.

use crate::arena::{BufferKey, ForeignArena};
use crate::error::SolverError;
use crate::ffi;
use highs_sys::HighsInt;
use strut_model::{pack, Model};
use tracing::debug;

/// Dimensions and buffer pointers for one loaded problem. Every pointer
/// is owned by the arena that produced it and stays valid until that
/// arena rebinds or releases the key behind it.
pub(crate) struct EncodedProblem {
    pub num_col: HighsInt,
    pub num_row: HighsInt,
    pub num_nz: HighsInt,
    pub col_cost: *const f64,
    pub col_lower: *const f64,
    pub col_upper: *const f64,
    pub row_lower: *const f64,
    pub row_upper: *const f64,
    pub row_start: *const HighsInt,
    pub row_index: *const HighsInt,
    pub row_value: *const f64,
    pub integrality: Option<*const HighsInt>,
}

/// Validate `model` and bind every buffer the engine load call needs.
///
/// Validation runs before the first bind, so a shape error leaves the
/// arena untouched. Re-encoding rebinds every key, freeing the previous
/// generation of buffers through the arena's replace path; a model that
/// dropped its integrality also drops the stale integrality buffer.
pub(crate) fn encode(
    model: &Model,
    arena: &mut ForeignArena,
) -> Result<EncodedProblem, SolverError> {
    model.validate()?;

    let packed = pack(model.rows());
    let start: Vec<HighsInt> = packed.start.iter().map(|&v| v as HighsInt).collect();
    let index: Vec<HighsInt> = packed.index.iter().map(|&v| v as HighsInt).collect();

    let col_cost = arena.bind_doubles(BufferKey::ColCost, model.costs());
    let col_lower = arena.bind_doubles(BufferKey::ColLower, &model.lower_bounds());
    let col_upper = arena.bind_doubles(BufferKey::ColUpper, &model.upper_bounds());
    let row_start = arena.bind_ints(BufferKey::RowStart, &start);
    let row_index = arena.bind_ints(BufferKey::RowIndex, &index);
    let row_value = arena.bind_doubles(BufferKey::RowValue, &packed.values);
    let row_lower = arena.bind_doubles(BufferKey::RowLower, model.row_lower());
    let row_upper = arena.bind_doubles(BufferKey::RowUpper, model.row_upper());

    let integrality = if model.is_mip() {
        let raw: Vec<HighsInt> = model
            .integrality()
            .iter()
            .map(|&kind| ffi::integrality_raw(kind))
            .collect();
        Some(arena.bind_ints(BufferKey::Integrality, &raw))
    } else {
        arena.release(BufferKey::Integrality);
        None
    };

    debug!(
        component = "encoder",
        operation = "encode",
        status = "success",
        num_cols = model.num_cols(),
        num_rows = model.num_rows(),
        num_nz = packed.num_nonzeros(),
        mip = model.is_mip(),
        "Encoded model into engine buffers"
    );

    Ok(EncodedProblem {
        num_col: model.num_cols() as HighsInt,
        num_row: model.num_rows() as HighsInt,
        num_nz: packed.num_nonzeros() as HighsInt,
        col_cost,
        col_lower,
        col_upper,
        row_lower,
        row_upper,
        row_start,
        row_index,
        row_value,
        integrality,
    })
}
