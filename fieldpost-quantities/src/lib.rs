//! A collection of derived-quantity postprocessors for fieldpost.
//!
//! Every postprocessor here is immutable once built and can be shared across
//! the worker threads of an export pass.

mod components;
mod error;
mod flow;
mod norms;
mod solid;

pub use components::Components;
pub use error::ParameterError;
pub use flow::{Divergence, Vorticity};
pub use norms::{GradientMagnitude, Laplacian, Magnitude, NormalFlux};
pub use solid::StressInvariants;

use fieldpost_core::{Error, Result};

/// Checks that a field has the component count a quantity is defined for.
fn expect_components(expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::ComponentCount { expected, found })
    }
}
