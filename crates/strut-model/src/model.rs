//! The model store: costs, bounds, rows, integrality.

use crate::bounds::separate_bounds;
use crate::error::ValidationError;

/// Per-column integrality marker.
///
/// An empty integrality vector on a [`Model`] means every column is
/// continuous and the problem takes the LP solve path; any non-empty
/// vector must cover every column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integrality {
    #[default]
    Continuous,
    Integer,
    ImplicitInteger,
}

impl Integrality {
    pub fn as_str(self) -> &'static str {
        match self {
            Integrality::Continuous => "continuous",
            Integrality::Integer => "integer",
            Integrality::ImplicitInteger => "implicit_integer",
        }
    }
}

/// In-memory description of a linear or mixed-integer problem.
///
/// Rows are stored dense; lowering to the engine's sparse wire format
/// happens at encode time. Column bounds are `(lower, upper)` pairs.
/// `lower <= upper` is expected but not enforced here — bound-infeasible
/// problems surface through the engine's own status codes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    costs: Vec<f64>,
    bounds: Vec<(f64, f64)>,
    rows: Vec<Vec<f64>>,
    row_lower: Vec<f64>,
    row_upper: Vec<f64>,
    integrality: Vec<Integrality>,
}

impl Model {
    /// Create an empty model for incremental construction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from parallel-array parts, validating shape.
    pub fn from_parts(
        costs: Vec<f64>,
        bounds: Vec<(f64, f64)>,
        rows: Vec<Vec<f64>>,
        row_lower: Vec<f64>,
        row_upper: Vec<f64>,
        integrality: Vec<Integrality>,
    ) -> Result<Self, ValidationError> {
        let model = Model {
            costs,
            bounds,
            rows,
            row_lower,
            row_upper,
            integrality,
        };
        model.validate()?;
        Ok(model)
    }

    /// Build a model from rows in the augmented `[lb, coeffs.., ub]`
    /// form. Converges on the same internal shape as [`Model::from_parts`].
    pub fn from_bounded_rows(
        costs: Vec<f64>,
        bounds: Vec<(f64, f64)>,
        bounded_rows: &[Vec<f64>],
        integrality: Vec<Integrality>,
    ) -> Result<Self, ValidationError> {
        let (rows, row_lower, row_upper) = separate_bounds(bounded_rows)?;
        Self::from_parts(costs, bounds, rows, row_lower, row_upper, integrality)
    }

    pub fn set_costs(&mut self, costs: Vec<f64>) {
        self.costs = costs;
    }

    pub fn set_bounds(&mut self, bounds: Vec<(f64, f64)>) {
        self.bounds = bounds;
    }

    /// Replace the constraint rows and their bound vectors.
    pub fn set_rows(&mut self, rows: Vec<Vec<f64>>, lower: Vec<f64>, upper: Vec<f64>) {
        self.rows = rows;
        self.row_lower = lower;
        self.row_upper = upper;
    }

    /// Replace the constraint rows from the augmented bound-carrying form.
    pub fn set_bounded_rows(&mut self, bounded_rows: &[Vec<f64>]) -> Result<(), ValidationError> {
        let (rows, lower, upper) = separate_bounds(bounded_rows)?;
        self.set_rows(rows, lower, upper);
        Ok(())
    }

    pub fn set_integrality(&mut self, integrality: Vec<Integrality>) {
        self.integrality = integrality;
    }

    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row_lower(&self) -> &[f64] {
        &self.row_lower
    }

    pub fn row_upper(&self) -> &[f64] {
        &self.row_upper
    }

    pub fn integrality(&self) -> &[Integrality] {
        &self.integrality
    }

    pub fn num_cols(&self) -> usize {
        self.costs.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// True when integrality is supplied, selecting the MIP solve path.
    pub fn is_mip(&self) -> bool {
        !self.integrality.is_empty()
    }

    /// Column lower bounds, split out of the pair representation.
    pub fn lower_bounds(&self) -> Vec<f64> {
        self.bounds.iter().map(|b| b.0).collect()
    }

    /// Column upper bounds, split out of the pair representation.
    pub fn upper_bounds(&self) -> Vec<f64> {
        self.bounds.iter().map(|b| b.1).collect()
    }

    /// Check shape consistency ahead of encoding.
    ///
    /// Numeric feasibility (for example `lower > upper`) is deliberately
    /// not checked; the engine reports those through its own statuses.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.costs.len() != self.bounds.len() {
            return Err(ValidationError::CostBoundMismatch {
                costs: self.costs.len(),
                bounds: self.bounds.len(),
            });
        }
        if !self.integrality.is_empty() && self.integrality.len() != self.costs.len() {
            return Err(ValidationError::IntegralityMismatch {
                columns: self.costs.len(),
                integrality: self.integrality.len(),
            });
        }
        if self.rows.is_empty() {
            return Err(ValidationError::EmptyRows);
        }
        if self.rows.len() != self.row_lower.len() || self.rows.len() != self.row_upper.len() {
            return Err(ValidationError::RowBoundMismatch {
                rows: self.rows.len(),
                lower: self.row_lower.len(),
                upper: self.row_upper.len(),
            });
        }
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.costs.len() {
                return Err(ValidationError::RowLengthMismatch {
                    row: i,
                    coefficients: row.len(),
                    columns: self.costs.len(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn example_parts() -> (Vec<f64>, Vec<(f64, f64)>, Vec<Vec<f64>>, Vec<f64>, Vec<f64>) {
        (
            vec![2.0, 3.0],
            vec![(0.0, 3.0), (1.0, f64::INFINITY)],
            vec![vec![0.0, 1.0], vec![1.0, 2.0], vec![2.0, 1.0]],
            vec![f64::NEG_INFINITY, 10.0, 8.0],
            vec![6.0, 14.0, f64::INFINITY],
        )
    }

    #[test]
    fn builds_from_parts() {
        let (costs, bounds, rows, lower, upper) = example_parts();
        let model = Model::from_parts(costs, bounds, rows, lower, upper, vec![]).unwrap();

        assert_eq!(model.num_cols(), 2);
        assert_eq!(model.num_rows(), 3);
        assert!(!model.is_mip());
        assert_eq!(model.costs(), &[2.0, 3.0]);
        assert_eq!(model.bounds(), &[(0.0, 3.0), (1.0, f64::INFINITY)]);
        assert_eq!(model.lower_bounds(), vec![0.0, 1.0]);
        assert_eq!(model.upper_bounds(), vec![3.0, f64::INFINITY]);
    }

    #[test]
    fn bounded_row_constructor_converges_on_the_same_shape() {
        let (costs, bounds, rows, lower, upper) = example_parts();
        let from_parts = Model::from_parts(
            costs.clone(),
            bounds.clone(),
            rows,
            lower,
            upper,
            vec![],
        )
        .unwrap();

        let bounded = vec![
            vec![f64::NEG_INFINITY, 0.0, 1.0, 6.0],
            vec![10.0, 1.0, 2.0, 14.0],
            vec![8.0, 2.0, 1.0, f64::INFINITY],
        ];
        let from_bounded = Model::from_bounded_rows(costs, bounds, &bounded, vec![]).unwrap();

        assert_eq!(from_parts, from_bounded);
    }

    #[test]
    fn incremental_construction_validates_at_the_end() {
        let (costs, bounds, rows, lower, upper) = example_parts();
        let mut model = Model::new();
        model.set_costs(costs);
        model.set_bounds(bounds);
        model.set_rows(rows, lower, upper);
        assert!(model.validate().is_ok());

        model.set_integrality(vec![Integrality::Integer, Integrality::Integer]);
        assert!(model.validate().is_ok());
        assert!(model.is_mip());
    }

    #[test]
    fn bounded_row_setter_matches_the_parallel_setter() {
        let (costs, bounds, rows, lower, upper) = example_parts();
        let mut parallel = Model::new();
        parallel.set_costs(costs.clone());
        parallel.set_bounds(bounds.clone());
        parallel.set_rows(rows, lower, upper);

        let mut augmented = Model::new();
        augmented.set_costs(costs);
        augmented.set_bounds(bounds);
        augmented
            .set_bounded_rows(&[
                vec![f64::NEG_INFINITY, 0.0, 1.0, 6.0],
                vec![10.0, 1.0, 2.0, 14.0],
                vec![8.0, 2.0, 1.0, f64::INFINITY],
            ])
            .unwrap();

        assert_eq!(parallel, augmented);
    }

    #[test]
    fn rejects_cost_bound_mismatch() {
        let (costs, _, rows, lower, upper) = example_parts();
        let result = Model::from_parts(costs, vec![(0.0, 3.0)], rows, lower, upper, vec![]);
        assert_eq!(
            result,
            Err(ValidationError::CostBoundMismatch { costs: 2, bounds: 1 })
        );
    }

    #[test]
    fn rejects_partial_integrality() {
        let (costs, bounds, rows, lower, upper) = example_parts();
        let result = Model::from_parts(
            costs,
            bounds,
            rows,
            lower,
            upper,
            vec![Integrality::Integer],
        );
        assert_eq!(
            result,
            Err(ValidationError::IntegralityMismatch {
                columns: 2,
                integrality: 1,
            })
        );
    }

    #[test]
    fn rejects_short_row() {
        let (costs, bounds, mut rows, lower, upper) = example_parts();
        rows[1] = vec![1.0];
        let result = Model::from_parts(costs, bounds, rows, lower, upper, vec![]);
        assert_eq!(
            result,
            Err(ValidationError::RowLengthMismatch {
                row: 1,
                coefficients: 1,
                columns: 2,
            })
        );
    }

    #[test]
    fn rejects_missing_row_bounds() {
        let (costs, bounds, rows, lower, _) = example_parts();
        let result = Model::from_parts(costs, bounds, rows, lower, vec![6.0], vec![]);
        assert_eq!(
            result,
            Err(ValidationError::RowBoundMismatch {
                rows: 3,
                lower: 3,
                upper: 1,
            })
        );
    }

    #[test]
    fn rejects_empty_rows() {
        let result = Model::from_parts(
            vec![1.0],
            vec![(0.0, 1.0)],
            vec![],
            vec![],
            vec![],
            vec![],
        );
        assert_eq!(result, Err(ValidationError::EmptyRows));
    }

    #[test]
    fn integrality_labels() {
        assert_eq!(Integrality::Continuous.as_str(), "continuous");
        assert_eq!(Integrality::Integer.as_str(), "integer");
        assert_eq!(Integrality::ImplicitInteger.as_str(), "implicit_integer");
    }
}
