use fieldpost_core::{OutputBatch, Postprocessor, Result, ScalarSamples, UpdateFlags, VectorSamples};

use crate::expect_components;

/// Writes the raw field components out under the given names.
///
/// The number of names fixes the number of components the field must have.
/// Works for scalar fields (a single name) and vector fields alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    names: Vec<String>,
}

impl Components {
    /// Creates a postprocessor naming each field component in order.
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl<const DIM: usize> Postprocessor<DIM> for Components {
    fn update_flags(&self) -> UpdateFlags {
        UpdateFlags::VALUES
    }

    fn names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn n_output_variables(&self) -> usize {
        self.names.len()
    }

    fn compute_scalar(
        &self,
        samples: &ScalarSamples<DIM>,
        computed: &mut OutputBatch<'_>,
    ) -> Result<()> {
        expect_components(self.names.len(), 1)?;
        for (row, &value) in computed.rows_mut().zip(&samples.values) {
            row[0] = value;
        }
        Ok(())
    }

    fn compute_vector(
        &self,
        samples: &VectorSamples<DIM>,
        computed: &mut OutputBatch<'_>,
    ) -> Result<()> {
        expect_components(self.names.len(), samples.n_components)?;
        for (row, value) in computed.rows_mut().zip(&samples.values) {
            row.copy_from_slice(value.as_slice());
        }
        Ok(())
    }
}
