//! Core state types for the hierarchical n-body simulation.
//!
//! Defines:
//! - `NVec2`       the 2D value type every vector quantity uses
//! - `BodyState`   the physical state any `Body` carries
//! - `ContainerId` the identity a child's back reference points at
//! - `Links`       a body's owning container and driving clock
//!
//! Positions, velocities, accelerations and forces are `NVec2`; mass,
//! friction and time steps are plain `f64`.

use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::Vector2;

use crate::configuration::config::BodyConfig;
use crate::simulation::clock::ClockId;
use crate::simulation::error::{SimError, SimResult};

pub type NVec2 = Vector2<f64>;

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a `Container`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(u64);

impl ContainerId {
    pub(crate) fn next() -> Self {
        Self(NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Physical state of a point mass.
///
/// `force_in` is the per-tick accumulator: pair interactions add into it and
/// integration consumes it and resets it to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub name: String,
    pub position: NVec2,
    pub velocity: NVec2,
    pub acceleration: NVec2,
    pub friction: f64, // stored, not part of the force model yet
    pub(crate) mass: f64,
    pub(crate) force_in: NVec2,
}

impl BodyState {
    /// Zero vectors and zero mass
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: NVec2::zeros(),
            velocity: NVec2::zeros(),
            acceleration: NVec2::zeros(),
            friction: 0.0,
            mass: 0.0,
            force_in: NVec2::zeros(),
        }
    }

    /// Map a `BodyConfig` onto a detached state (children are ignored here)
    pub fn from_config(cfg: &BodyConfig) -> Self {
        Self {
            name: cfg.name.clone(),
            position: NVec2::from(cfg.position),
            velocity: NVec2::from(cfg.velocity),
            acceleration: NVec2::from(cfg.acceleration),
            friction: cfg.friction,
            mass: cfg.mass,
            force_in: NVec2::from(cfg.force_in),
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Rejects non-positive and non-finite masses, leaving the old one in place
    pub fn set_mass(&mut self, mass: f64) -> SimResult<()> {
        check_mass(&self.name, mass)?;
        self.mass = mass;
        Ok(())
    }

    pub fn force_in(&self) -> NVec2 {
        self.force_in
    }

    /// Add one contribution to this tick's net force
    pub fn add_force_in(&mut self, force: NVec2) {
        self.force_in += force;
    }

    pub fn momentum(&self) -> NVec2 {
        self.velocity * self.mass
    }

    pub(crate) fn validate_mass(&self) -> SimResult<()> {
        check_mass(&self.name, self.mass)
    }

    pub(crate) fn clear_force_in(&mut self) {
        self.force_in = NVec2::zeros();
    }
}

/// Where a body sits: the container holding it and the clock driving it.
///
/// Outside this crate a `Links` can only be created empty and read. Writes go
/// through [`Body::links_mut`](crate::Body::links_mut), which needs a
/// [`LinkAccess`] only containers and engines can produce.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Links {
    parent: Option<ContainerId>,
    clock: Option<ClockId>,
}

impl Links {
    /// Container currently owning the body, if any
    pub fn parent(&self) -> Option<ContainerId> {
        self.parent
    }

    /// Clock currently driving the body, if any
    pub fn clock(&self) -> Option<ClockId> {
        self.clock
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ContainerId>) {
        self.parent = parent;
    }

    pub(crate) fn set_clock(&mut self, clock: Option<ClockId>) {
        self.clock = clock;
    }
}

/// Proof of write access to a body's [`Links`]; cannot be built outside this crate
#[derive(Debug)]
pub struct LinkAccess(());

impl LinkAccess {
    pub(crate) fn grant() -> Self {
        Self(())
    }
}

fn check_mass(name: &str, mass: f64) -> SimResult<()> {
    if mass > 0.0 && mass.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidMass {
            name: name.to_owned(),
            mass,
        })
    }
}
