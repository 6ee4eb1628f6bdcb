//! Splitting augmented bound-carrying rows.

use crate::error::ValidationError;

/// Split rows of the augmented form `[lb, coeff_0.., ub]` into plain
/// coefficient rows plus parallel lower/upper bound vectors.
///
/// Every input row must carry at least its two bounds; a row of exactly
/// length 2 yields an empty coefficient row. The input itself may not be
/// empty — with no rows there is no column count to recover, so callers
/// using this form must supply at least one row.
pub fn separate_bounds(
    bounded_rows: &[Vec<f64>],
) -> Result<(Vec<Vec<f64>>, Vec<f64>, Vec<f64>), ValidationError> {
    if bounded_rows.is_empty() {
        return Err(ValidationError::EmptyBoundedRows);
    }

    let mut rows = Vec::with_capacity(bounded_rows.len());
    let mut lower = Vec::with_capacity(bounded_rows.len());
    let mut upper = Vec::with_capacity(bounded_rows.len());
    for (i, row) in bounded_rows.iter().enumerate() {
        if row.len() < 2 {
            return Err(ValidationError::BoundedRowTooShort {
                row: i,
                len: row.len(),
            });
        }
        lower.push(row[0]);
        upper.push(row[row.len() - 1]);
        rows.push(row[1..row.len() - 1].to_vec());
    }

    Ok((rows, lower, upper))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn separates_example_rows() {
        let bounded = vec![
            vec![-1.0, 0.0, 1.0, 2.0],
            vec![10.0, 1.0, 2.0, 14.0],
            vec![8.0, 2.0, 1.0, 20.0],
        ];

        let (rows, lower, upper) = separate_bounds(&bounded).unwrap();

        assert_eq!(lower, vec![-1.0, 10.0, 8.0]);
        assert_eq!(upper, vec![2.0, 14.0, 20.0]);
        assert_eq!(
            rows,
            vec![vec![0.0, 1.0], vec![1.0, 2.0], vec![2.0, 1.0]]
        );
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(
            separate_bounds(&[]),
            Err(ValidationError::EmptyBoundedRows)
        );
    }

    #[test]
    fn rejects_rows_missing_a_bound() {
        let bounded = vec![vec![1.0, 2.0], vec![3.0]];
        assert_eq!(
            separate_bounds(&bounded),
            Err(ValidationError::BoundedRowTooShort { row: 1, len: 1 })
        );
    }

    #[test]
    fn two_element_row_yields_no_coefficients() {
        let (rows, lower, upper) = separate_bounds(&[vec![-5.0, 5.0]]).unwrap();
        assert_eq!(lower, vec![-5.0]);
        assert_eq!(upper, vec![5.0]);
        assert_eq!(rows, vec![Vec::<f64>::new()]);
    }

    proptest! {
        #[test]
        fn reconcatenation_restores_the_input(
            bounded in proptest::collection::vec(
                proptest::collection::vec(-100.0f64..100.0, 2..8),
                1..6,
            )
        ) {
            let (rows, lower, upper) = separate_bounds(&bounded).unwrap();
            for i in 0..bounded.len() {
                let mut rebuilt = vec![lower[i]];
                rebuilt.extend_from_slice(&rows[i]);
                rebuilt.push(upper[i]);
                prop_assert_eq!(&rebuilt, &bounded[i]);
            }
        }
    }
}
