use std::sync::Arc;

use crate::{Error, OutputBatch, Result, ScalarSamples, UpdateFlags, Variant, VectorSamples};

/// Computes derived quantities from finite element field samples.
///
/// A postprocessor is built once per export pass and then applied to many
/// batches (one cell or one face each). Its declared flags, names and output
/// count are fixed at construction. The transforms are pure functions of
/// their inputs, so a postprocessor holding no interior mutability can be
/// shared across worker threads that process disjoint batches.
///
/// Implementors provide [`update_flags`], [`names`] and
/// [`n_output_variables`], plus whichever of [`compute_scalar`] and
/// [`compute_vector`] matches the fields they are meant for. The other
/// transform keeps its default, which fails with [`Error::NotImplemented`].
///
/// The sample arrays not covered by [`update_flags`] are in an unspecified
/// state and must not be read. On cell batches the normals are always empty.
///
/// [`update_flags`]: Postprocessor::update_flags
/// [`names`]: Postprocessor::names
/// [`n_output_variables`]: Postprocessor::n_output_variables
/// [`compute_scalar`]: Postprocessor::compute_scalar
/// [`compute_vector`]: Postprocessor::compute_vector
pub trait Postprocessor<const DIM: usize> {
    /// Returns the sample data the transforms read.
    fn update_flags(&self) -> UpdateFlags;

    /// Returns the names of the computed quantities, in output order.
    ///
    /// The length must equal [`n_output_variables`](Postprocessor::n_output_variables).
    fn names(&self) -> Vec<String>;

    /// Returns the number of scalars computed per point.
    fn n_output_variables(&self) -> usize;

    /// Computes the derived quantities of a single-component field.
    ///
    /// `computed` has one row of [`n_output_variables`] slots per point, and
    /// every slot of every row must be written.
    ///
    /// [`n_output_variables`]: Postprocessor::n_output_variables
    ///
    /// # Errors
    ///
    /// The default implementation returns [`Error::NotImplemented`].
    fn compute_scalar(
        &self,
        _samples: &ScalarSamples<DIM>,
        _computed: &mut OutputBatch<'_>,
    ) -> Result<()> {
        Err(Error::NotImplemented {
            variant: Variant::Scalar,
        })
    }

    /// Computes the derived quantities of a multi-component field.
    ///
    /// Same contract as [`compute_scalar`](Postprocessor::compute_scalar), with
    /// per-component values and derivatives at each point.
    ///
    /// # Errors
    ///
    /// The default implementation returns [`Error::NotImplemented`].
    fn compute_vector(
        &self,
        _samples: &VectorSamples<DIM>,
        _computed: &mut OutputBatch<'_>,
    ) -> Result<()> {
        Err(Error::NotImplemented {
            variant: Variant::Vector,
        })
    }
}

macro_rules! forward_postprocessor {
    ($($ptr:ty),*) => {$(
        impl<const DIM: usize, P> Postprocessor<DIM> for $ptr
        where
            P: Postprocessor<DIM> + ?Sized,
        {
            fn update_flags(&self) -> UpdateFlags {
                (**self).update_flags()
            }

            fn names(&self) -> Vec<String> {
                (**self).names()
            }

            fn n_output_variables(&self) -> usize {
                (**self).n_output_variables()
            }

            fn compute_scalar(
                &self,
                samples: &ScalarSamples<DIM>,
                computed: &mut OutputBatch<'_>,
            ) -> Result<()> {
                (**self).compute_scalar(samples, computed)
            }

            fn compute_vector(
                &self,
                samples: &VectorSamples<DIM>,
                computed: &mut OutputBatch<'_>,
            ) -> Result<()> {
                (**self).compute_vector(samples, computed)
            }
        }
    )*};
}

forward_postprocessor!(&P, Box<P>, Arc<P>);
