use super::Batch;

/// Derived quantities computed for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedBatch {
    pub batch: Batch,
    pub n_points: usize,
    pub width: usize,
    /// Row-major values, `width` per point.
    pub data: Vec<f64>,
}

impl DerivedBatch {
    /// Returns the derived quantities at point `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_points`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.n_points, "point index {i} out of range");
        &self.data[i * self.width..(i + 1) * self.width]
    }

    /// Returns an iterator over the rows, in point order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        (0..self.n_points).map(|i| self.row(i))
    }
}

/// The result of an export pass, ready to be handed to a writer.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedData {
    /// Names of the derived quantities, one per column.
    pub names: Vec<String>,
    /// Batches in the order they were requested.
    pub batches: Vec<DerivedBatch>,
}

impl DerivedData {
    /// Returns the total number of points across all batches.
    #[must_use]
    pub fn n_points(&self) -> usize {
        self.batches.iter().map(|batch| batch.n_points).sum()
    }

    /// Returns the values of the named quantity at every point, batch by batch.
    ///
    /// Returns `None` if no quantity has that name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let index = self.names.iter().position(|n| n == name)?;
        Some(
            self.batches
                .iter()
                .flat_map(|batch| batch.rows())
                .map(|row| row[index])
                .collect(),
        )
    }
}
