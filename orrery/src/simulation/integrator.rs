//! Fixed-step time integration for a single body
//!
//! Semi-implicit (symplectic) Euler driven by the body's force accumulator.
//! The update order is part of the contract and must not be rearranged:
//! velocity uses the acceleration from *before* this step, acceleration then
//! absorbs this tick's net force, and position uses the *new* velocity.

use super::error::SimResult;
use super::states::BodyState;

/// Advance `state` by `dt`, consuming its accumulated force
///
/// v_n+1 = v_n + dt * a_n
/// a_n+1 = a_n + F / m
/// x_n+1 = x_n + dt * v_n+1
///
/// Fails with `InvalidMass` before touching the state if the mass is not
/// strictly positive.
pub fn semi_implicit_euler(state: &mut BodyState, dt: f64) -> SimResult<()> {
    state.validate_mass()?;
    let inv_m = state.mass.recip();

    state.velocity += state.acceleration * dt;
    state.acceleration += state.force_in * inv_m;
    state.position += state.velocity * dt;

    // each tick starts from an empty accumulator
    state.clear_force_in();
    Ok(())
}
