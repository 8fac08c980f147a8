//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds the runtime settings an `Engine` is built with:
//! - clock period in milliseconds (also the value handed to tick callbacks),
//! - the factor turning that period into the physical step `dt`,
//! - the gravitational constant used by containers that don't override it

/// Gravitational constant, in whatever units the caller keeps consistent
pub const G: f64 = 6.67408e-11;

/// Clock period used when none (or a non-positive one) is given
pub const DEFAULT_INTERVAL_MS: f64 = 1000.0;

/// Milliseconds to seconds
pub const DEFAULT_TIME_SCALE: f64 = 1.0e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub interval_ms: f64, // clock period
    pub time_scale: f64, // dt = interval_ms * time_scale
    pub gravitational_constant: f64, // default G for the scene
}

impl Parameters {
    /// Physical step applied on every firing
    pub fn dt(&self) -> f64 {
        self.interval_ms * self.time_scale
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            time_scale: DEFAULT_TIME_SCALE,
            gravitational_constant: G,
        }
    }
}
