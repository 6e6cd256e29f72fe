use nalgebra::{DVector, SMatrix, SVector};

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result, UpdateFlags};

/// Gradient of one field component, or a face normal, in `DIM` dimensions.
pub type Tensor1<const DIM: usize> = SVector<f64, DIM>;

/// Hessian of one field component in `DIM` dimensions.
pub type Tensor2<const DIM: usize> = SMatrix<f64, DIM, DIM>;

/// Whether a batch of points lies inside a cell or on a face.
///
/// Normals exist only for face batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub enum BatchOrigin {
    Cell,
    Face,
}

/// Samples of a single-component field at the points of one batch.
///
/// Only the arrays covered by the postprocessor's [`UpdateFlags`] hold
/// meaningful data. The others may be empty or stale and must not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSamples<const DIM: usize> {
    pub n_points: usize,
    pub values: Vec<f64>,
    pub gradients: Vec<Tensor1<DIM>>,
    pub hessians: Vec<Tensor2<DIM>>,
    /// Empty for cell batches, even when normals were requested.
    pub normals: Vec<Tensor1<DIM>>,
}

impl<const DIM: usize> ScalarSamples<DIM> {
    /// Creates a batch of `n_points` points with no sample data attached.
    #[must_use]
    pub fn new(n_points: usize) -> Self {
        Self {
            n_points,
            values: Vec::new(),
            gradients: Vec::new(),
            hessians: Vec::new(),
            normals: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_values(mut self, values: Vec<f64>) -> Self {
        self.values = values;
        self
    }

    #[must_use]
    pub fn with_gradients(mut self, gradients: Vec<Tensor1<DIM>>) -> Self {
        self.gradients = gradients;
        self
    }

    #[must_use]
    pub fn with_hessians(mut self, hessians: Vec<Tensor2<DIM>>) -> Self {
        self.hessians = hessians;
        self
    }

    #[must_use]
    pub fn with_normals(mut self, normals: Vec<Tensor1<DIM>>) -> Self {
        self.normals = normals;
        self
    }

    /// Checks that every array declared in `flags` has one entry per point.
    ///
    /// Arrays not covered by `flags` are not inspected, except that normals
    /// must always be empty on cell batches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SampleShape`] for the first array with the wrong length.
    pub fn check_shape(&self, flags: UpdateFlags, origin: BatchOrigin) -> Result<()> {
        let n = self.n_points;
        if flags.contains(UpdateFlags::VALUES) {
            expect_len("values", n, self.values.len())?;
        }
        if flags.contains(UpdateFlags::GRADIENTS) {
            expect_len("gradients", n, self.gradients.len())?;
        }
        if flags.contains(UpdateFlags::HESSIANS) {
            expect_len("hessians", n, self.hessians.len())?;
        }
        check_normals(self.normals.len(), n, flags, origin)
    }
}

/// Samples of a multi-component field at the points of one batch.
///
/// Outer indices run over points, inner indices over components. The number
/// of components is the same for every point of the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSamples<const DIM: usize> {
    pub n_points: usize,
    pub n_components: usize,
    pub values: Vec<DVector<f64>>,
    pub gradients: Vec<Vec<Tensor1<DIM>>>,
    pub hessians: Vec<Vec<Tensor2<DIM>>>,
    /// Empty for cell batches, even when normals were requested.
    pub normals: Vec<Tensor1<DIM>>,
}

impl<const DIM: usize> VectorSamples<DIM> {
    /// Creates a batch of `n_points` points of an `n_components` field with no
    /// sample data attached.
    #[must_use]
    pub fn new(n_points: usize, n_components: usize) -> Self {
        Self {
            n_points,
            n_components,
            values: Vec::new(),
            gradients: Vec::new(),
            hessians: Vec::new(),
            normals: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_values(mut self, values: Vec<DVector<f64>>) -> Self {
        self.values = values;
        self
    }

    #[must_use]
    pub fn with_gradients(mut self, gradients: Vec<Vec<Tensor1<DIM>>>) -> Self {
        self.gradients = gradients;
        self
    }

    #[must_use]
    pub fn with_hessians(mut self, hessians: Vec<Vec<Tensor2<DIM>>>) -> Self {
        self.hessians = hessians;
        self
    }

    #[must_use]
    pub fn with_normals(mut self, normals: Vec<Tensor1<DIM>>) -> Self {
        self.normals = normals;
        self
    }

    /// Checks that every array declared in `flags` has one entry per point,
    /// and one entry per component at each point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SampleShape`] for the first array with the wrong length.
    pub fn check_shape(&self, flags: UpdateFlags, origin: BatchOrigin) -> Result<()> {
        let (n, c) = (self.n_points, self.n_components);
        if flags.contains(UpdateFlags::VALUES) {
            expect_len("values", n, self.values.len())?;
            for value in &self.values {
                expect_len("values[point]", c, value.len())?;
            }
        }
        if flags.contains(UpdateFlags::GRADIENTS) {
            expect_len("gradients", n, self.gradients.len())?;
            for gradient in &self.gradients {
                expect_len("gradients[point]", c, gradient.len())?;
            }
        }
        if flags.contains(UpdateFlags::HESSIANS) {
            expect_len("hessians", n, self.hessians.len())?;
            for hessian in &self.hessians {
                expect_len("hessians[point]", c, hessian.len())?;
            }
        }
        check_normals(self.normals.len(), n, flags, origin)
    }
}

/// Samples of one batch, tagged by the component structure of the field.
///
/// The variant decides which transform the driver invokes.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSamples<const DIM: usize> {
    Scalar(ScalarSamples<DIM>),
    Vector(VectorSamples<DIM>),
}

impl<const DIM: usize> FieldSamples<DIM> {
    /// Returns the number of points in the batch.
    #[must_use]
    pub fn n_points(&self) -> usize {
        match self {
            Self::Scalar(samples) => samples.n_points,
            Self::Vector(samples) => samples.n_points,
        }
    }

    /// Returns the number of field components.
    #[must_use]
    pub fn n_components(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Vector(samples) => samples.n_components,
        }
    }

    /// Checks the shape of the declared arrays.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SampleShape`] for the first array with the wrong length.
    pub fn check_shape(&self, flags: UpdateFlags, origin: BatchOrigin) -> Result<()> {
        match self {
            Self::Scalar(samples) => samples.check_shape(flags, origin),
            Self::Vector(samples) => samples.check_shape(flags, origin),
        }
    }
}

impl<const DIM: usize> From<ScalarSamples<DIM>> for FieldSamples<DIM> {
    fn from(samples: ScalarSamples<DIM>) -> Self {
        Self::Scalar(samples)
    }
}

impl<const DIM: usize> From<VectorSamples<DIM>> for FieldSamples<DIM> {
    fn from(samples: VectorSamples<DIM>) -> Self {
        Self::Vector(samples)
    }
}

fn expect_len(array: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::SampleShape {
            array,
            expected,
            found,
        })
    }
}

fn check_normals(
    found: usize,
    n_points: usize,
    flags: UpdateFlags,
    origin: BatchOrigin,
) -> Result<()> {
    match origin {
        BatchOrigin::Cell => expect_len("normals", 0, found),
        BatchOrigin::Face if flags.contains(UpdateFlags::NORMALS) => {
            expect_len("normals", n_points, found)
        }
        BatchOrigin::Face => Ok(()),
    }
}
