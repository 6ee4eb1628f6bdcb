//! Dense-to-sparse row packing.

/// A sparse row matrix in the compressed (CSR) triplet form solver
/// engines consume.
///
/// `start[i]` is the offset into `index`/`values` at which row `i`
/// begins; the final row ends at `index.len()`. `start` is monotonically
/// non-decreasing and begins at 0. Consecutive empty rows share a start
/// offset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackedMatrix {
    pub start: Vec<usize>,
    pub index: Vec<usize>,
    pub values: Vec<f64>,
}

impl PackedMatrix {
    /// Total number of stored nonzeros.
    pub fn num_nonzeros(&self) -> usize {
        self.values.len()
    }

    /// Number of rows represented.
    pub fn num_rows(&self) -> usize {
        self.start.len()
    }

    /// Expand back to dense rows with `num_cols` columns each.
    ///
    /// Inverse of [`pack`] up to zero elision: elided entries come back
    /// as `0.0`.
    pub fn unpack(&self, num_cols: usize) -> Vec<Vec<f64>> {
        let mut rows = Vec::with_capacity(self.start.len());
        for i in 0..self.start.len() {
            let begin = self.start[i];
            let end = if i + 1 < self.start.len() {
                self.start[i + 1]
            } else {
                self.index.len()
            };
            let mut row = vec![0.0; num_cols];
            for k in begin..end {
                row[self.index[k]] = self.values[k];
            }
            rows.push(row);
        }
        rows
    }
}

/// Pack dense rows into the compressed sparse row triplet.
///
/// Entries exactly equal to `0.0` are elided; a caller supplying an
/// explicit zero cannot distinguish it from an absent entry afterwards.
/// Rows of length zero are legal and contribute an empty segment.
pub fn pack(rows: &[Vec<f64>]) -> PackedMatrix {
    let mut start = Vec::with_capacity(rows.len());
    let mut index = Vec::new();
    let mut values = Vec::new();

    for row in rows {
        start.push(index.len());
        for (i, &v) in row.iter().enumerate() {
            if v != 0.0 {
                index.push(i);
                values.push(v);
            }
        }
    }

    PackedMatrix {
        start,
        index,
        values,
    }
}
