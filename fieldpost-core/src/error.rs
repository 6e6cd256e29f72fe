use std::{error::Error as StdError, fmt};

use thiserror::Error;

/// Result type alias using the fieldpost [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The two transform entry points of a [`Postprocessor`](crate::Postprocessor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Transform for single-component fields.
    Scalar,
    /// Transform for multi-component fields.
    Vector,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("scalar"),
            Self::Vector => f.write_str("vector"),
        }
    }
}

/// Errors that can occur while computing derived quantities.
///
/// None of these are expected in correct usage. They surface programming
/// mistakes early, and any of them aborts the current export pass.
#[derive(Debug, Error)]
pub enum Error {
    /// The invoked transform variant is not supported by the postprocessor.
    ///
    /// Indicates that the driver misjudged the component structure of the field.
    #[error("the {variant} transform is not implemented by this postprocessor")]
    NotImplemented { variant: Variant },

    /// The field has a component count the postprocessor cannot handle.
    #[error("expected a field with {expected} components, found {found}")]
    ComponentCount { expected: usize, found: usize },

    /// Samples were tagged with a variant that contradicts the field's
    /// component count: scalar samples need exactly one component and vector
    /// samples need any other count.
    #[error("{variant} samples cannot describe a field with {n_components} components")]
    FieldKind {
        variant: Variant,
        n_components: usize,
    },

    /// A face-only quantity was evaluated on a batch without normals.
    #[error("normal vectors are only available on face batches")]
    MissingNormals,

    /// A declared sample array does not have one entry per point or component.
    #[error("sample array `{array}` has {found} entries, expected {expected}")]
    SampleShape {
        array: &'static str,
        expected: usize,
        found: usize,
    },

    /// An output buffer cannot be viewed as `n_points` rows of `width`.
    #[error("output buffer of length {len} cannot hold {n_points} rows of width {width}")]
    OutputShape {
        len: usize,
        n_points: usize,
        width: usize,
    },

    /// A computed quantity is NaN or infinite.
    #[error("non-finite value for `{variable}` at point {point} of batch {batch}")]
    NonFinite {
        batch: usize,
        point: usize,
        variable: String,
    },

    /// The field evaluator failed to produce samples.
    #[error("field evaluation failed")]
    Evaluator(#[source] Box<dyn StdError + Send + Sync>),
}
