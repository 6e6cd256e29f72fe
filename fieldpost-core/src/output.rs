use crate::{Error, Result};

/// A caller-owned output buffer viewed as one fixed-width row per point.
///
/// The driver allocates `n_points * width` scalars, where `width` is the
/// postprocessor's [`n_output_variables`](crate::Postprocessor::n_output_variables),
/// and lends the buffer to the transform. The transform can write any slot but
/// cannot change the shape.
#[derive(Debug)]
pub struct OutputBatch<'a> {
    data: &'a mut [f64],
    n_points: usize,
    width: usize,
}

impl<'a> OutputBatch<'a> {
    /// Views `data` as `n_points` rows of `width` scalars.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputShape`] if `data.len() != n_points * width`.
    pub fn new(data: &'a mut [f64], n_points: usize, width: usize) -> Result<Self> {
        if n_points.checked_mul(width) != Some(data.len()) {
            return Err(Error::OutputShape {
                len: data.len(),
                n_points,
                width,
            });
        }
        Ok(Self {
            data,
            n_points,
            width,
        })
    }

    /// Returns the number of points (rows).
    #[must_use]
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Returns the number of output variables per point.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the row of output variables for point `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_points()`.
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        assert!(i < self.n_points, "point index {i} out of range");
        let start = i * self.width;
        &mut self.data[start..start + self.width]
    }

    /// Returns an iterator over all rows, in point order.
    ///
    /// Yields exactly `n_points()` rows, including when `width()` is zero.
    pub fn rows_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [f64]> + '_ {
        let width = self.width;
        let mut rest: &mut [f64] = self.data;
        (0..self.n_points).map(move |_| {
            let (row, tail) = std::mem::take(&mut rest).split_at_mut(width);
            rest = tail;
            row
        })
    }

    /// Sets every slot of every row to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Returns the flat row-major contents.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        self.data
    }
}
