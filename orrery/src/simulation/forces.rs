//! Pairwise force contributors for sibling bodies
//!
//! Defines the `PairForce` trait and Newtonian gravity: the magnitude
//! `G m_i m_j / r^2` is split into x and y components along the line joining
//! the two bodies, always pointing from one body toward the other.

use super::error::{SimError, SimResult};
use super::params::G;
use super::states::{BodyState, NVec2};

/// A force law acting between two bodies.
/// Implementations return the force on `second`; the force on `first` is
/// its exact negation.
pub trait PairForce {
    fn force_on_second(&self, first: &BodyState, second: &BodyState) -> SimResult<NVec2>;
}

/// Squared distance between two points: sum of the squared component differences
pub fn squared_separation(a: &NVec2, b: &NVec2) -> f64 {
    (a - b).map(|c| c.powi(2)).sum()
}

/// Newtonian gravity without softening.
/// Coincident bodies and non-finite separations are an error, not a clamped force.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonianGravity {
    pub g: f64, // gravitational constant
}

impl Default for NewtonianGravity {
    fn default() -> Self {
        Self { g: G }
    }
}

impl NewtonianGravity {
    pub fn new(g: f64) -> Self {
        Self { g }
    }
}

impl PairForce for NewtonianGravity {
    fn force_on_second(&self, first: &BodyState, second: &BodyState) -> SimResult<NVec2> {
        // diff points from second toward first, so the pull on second is along +diff
        let diff = first.position - second.position;
        let r2 = squared_separation(&first.position, &second.position);

        let degenerate = || SimError::DegenerateSeparation {
            first: first.name.clone(),
            second: second.name.clone(),
        };

        let magnitude = self.g * first.mass * second.mass / r2;
        if r2 == 0.0 || !r2.is_finite() || !magnitude.is_finite() {
            return Err(degenerate());
        }

        // Purely vertical separation: the slope is undefined
        let force = if diff.x == 0.0 {
            NVec2::new(0.0, diff.y.signum() * magnitude)
        } else {
            // The slope construction (x = |F| / sqrt(slope^2 + 1), y = slope * x,
            // x signed like diff.x) reduces to |F| along the unit separation.
            // Scaling diff directly avoids slope^2 overflowing when diff.x is tiny
            diff * (magnitude / r2.sqrt())
        };

        if !(force.x.is_finite() && force.y.is_finite()) {
            return Err(degenerate());
        }
        Ok(force)
    }
}

/// Compute net forces among `bodies` for every unordered pair (i, j), i < j
/// - `out[k]` is overwritten with the sum of contributions on body `k`
/// - on error `out` may be partially filled and must be discarded
pub fn accumulate_pair_forces<F: PairForce + ?Sized>(law: &F, bodies: &[&BodyState], out: &mut [NVec2]) -> SimResult<()> {
    // Zero buffer
    for f in out.iter_mut() {
        *f = NVec2::zeros();
    }

    let n = bodies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let on_j = law.force_on_second(bodies[i], bodies[j])?;
            out[i] -= on_j;
            out[j] += on_j;
        }
    }
    Ok(())
}
