//! Error types for the simulation core

use thiserror::Error;

/// Result type for simulation operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while building or advancing a scene
#[derive(Error, Debug)]
pub enum SimError {
    /// Mass must be strictly positive (and finite) for any body that can be
    /// integrated or take part in a gravitational pair
    #[error("body `{name}` has invalid mass {mass}; mass must be positive")]
    InvalidMass { name: String, mass: f64 },

    /// Two siblings share a position, so the pair force is undefined
    #[error("bodies `{first}` and `{second}` are at the same position; force is undefined")]
    DegenerateSeparation { first: String, second: String },

    /// The body already has a parent container
    #[error("body `{name}` is already owned by another container")]
    Ownership { name: String },

    /// A body can be driven by one clock only
    #[error("body `{name}` is already driven by a clock")]
    ClockAlreadySet { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("scenario error: {0}")]
    Config(#[from] serde_yaml::Error),
}
