//! Configuration types for loading scene scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scene. A scenario consists of:
//!
//! - [`ClockConfig`]      – firing interval and clock name
//! - [`SimulationConfig`] – time scale and the scene-wide gravitational constant
//! - [`BodyConfig`]       – the root of the body tree; every body may own children
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! Every field is optional. Missing vectors are zero, mass and friction are
//! zero, and the clock falls back to 1000 ms.
//!
//! # YAML format
//! Two solar systems orbiting each other inside a galaxy:
//!
//! ```yaml
//! clock:
//!   interval_ms: 10.0       # firing period, also handed to every callback
//!   name: "main"
//!
//! simulation:
//!   time_scale: 0.001       # dt = interval_ms * time_scale
//!   gravitational_constant: 1.0
//!
//! root:
//!   name: "galaxy"
//!   children:
//!     - name: "alpha"
//!       position: [ -50.0, 0.0 ]
//!       velocity: [ 0.0, -0.5 ]
//!       mass: 100.0
//!       children:
//!         - { name: "alpha-star",   position: [ 0.0, 0.0 ], mass: 10.0 }
//!         - { name: "alpha-planet", position: [ 5.0, 0.0 ], velocity: [ 0.0, 1.4 ], mass: 0.1 }
//!     - name: "beta"
//!       position: [ 50.0, 0.0 ]
//!       velocity: [ 0.0, 0.5 ]
//!       mass: 100.0
//! ```
//!
//! `Engine::from_scenario` maps this onto a `Container` tree, a `Clock` and
//! runtime `Parameters`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::simulation::error::SimResult;
use crate::simulation::params::{Parameters, DEFAULT_INTERVAL_MS, DEFAULT_TIME_SCALE, G};

/// Clock settings
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClockConfig {
    pub interval_ms: f64, // time between firings, in milliseconds
    pub name: String, // diagnostic only
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            name: "unnamed".to_owned(),
        }
    }
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub time_scale: f64, // multiplies the interval to get the physical step
    pub gravitational_constant: f64, // used by every container that doesn't set its own
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_scale: DEFAULT_TIME_SCALE,
            gravitational_constant: G,
        }
    }
}

/// Initial state of one body, and the bodies it owns
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    pub name: String,
    pub position: [f64; 2],
    pub velocity: [f64; 2],
    pub acceleration: [f64; 2],
    pub force_in: [f64; 2], // initial content of the force accumulator
    pub mass: f64, // must be positive for every body except the root
    pub friction: f64,
    pub gravitational_constant: Option<f64>, // overrides the inherited value for this body's children
    pub children: Vec<BodyConfig>,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    pub clock: ClockConfig,
    pub simulation: SimulationConfig,
    pub root: BodyConfig,
}

impl ScenarioConfig {
    pub fn from_reader<R: Read>(reader: R) -> SimResult<Self> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    pub fn from_yaml_str(yaml: &str) -> SimResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Runtime parameters resolved from the clock and simulation sections.
    /// The root's own `gravitational_constant`, if set, wins over the scene-wide one.
    pub fn parameters(&self) -> Parameters {
        Parameters {
            interval_ms: self.clock.interval_ms,
            time_scale: self.simulation.time_scale,
            gravitational_constant: self
                .root
                .gravitational_constant
                .unwrap_or(self.simulation.gravitational_constant),
        }
    }
}
