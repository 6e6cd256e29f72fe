use thiserror::Error;

/// Errors raised when a postprocessor is built with invalid parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ParameterError {
    #[error("Young's modulus must be positive and finite, got {0}")]
    YoungsModulus(f64),

    #[error("Poisson's ratio must lie in (-1, 0.5), got {0}")]
    PoissonsRatio(f64),
}
