//! Derived-quantity postprocessing for finite element field samples.
//!
//! This crate defines the seam between what a solver computed at a set of
//! evaluation points and what gets written out for visualization:
//!
//! - [`Postprocessor`]: declares the sample data it needs, the names of the
//!   quantities it produces, and transforms per-point samples into output rows
//! - [`UpdateFlags`]: the declarative set of values, gradients, Hessians and
//!   normals a postprocessor requires from the field evaluator
//! - [`ScalarSamples`], [`VectorSamples`]: the raw samples for one batch
//! - [`OutputBatch`]: the caller-owned, fixed-shape output buffer
//! - [`export`]: a reference driver that evaluates batches and runs a
//!   postprocessor over them

mod error;
mod flags;
mod output;
mod postprocessor;
mod samples;

pub mod export;

pub use error::{Error, Result, Variant};
pub use flags::UpdateFlags;
pub use output::OutputBatch;
pub use postprocessor::Postprocessor;
pub use samples::{BatchOrigin, FieldSamples, ScalarSamples, Tensor1, Tensor2, VectorSamples};
