//! The `Body` capability shared by everything a container can own.
//!
//! A body exposes its physical state, accepts force contributions, integrates
//! them, and must say what one tick means for it. There is no default `tick`,
//! so a type that forgets to supply one does not compile.
//!
//! The parent and clock links live apart from `BodyState`, so handing out
//! `state_mut` never lets a caller rewrite who owns the body.

use super::clock::ClockId;
use super::container::Container;
use super::error::SimResult;
use super::integrator::semi_implicit_euler;
use super::states::{BodyState, ContainerId, LinkAccess, Links, NVec2};

pub trait Body: Send {
    fn state(&self) -> &BodyState;

    fn state_mut(&mut self) -> &mut BodyState;

    fn links(&self) -> &Links;

    /// Only callable with a `LinkAccess`, i.e. by the owning container or engine
    fn links_mut(&mut self, access: LinkAccess) -> &mut Links;

    /// Advance this body (and whatever it owns) by `dt`
    fn tick(&mut self, dt: f64) -> SimResult<()>;

    /// Bodies owned by this one, in tick order
    fn children(&self) -> &[Box<dyn Body>] {
        &[]
    }

    /// Downcast for the one concrete composite
    fn as_container(&self) -> Option<&Container> {
        None
    }

    fn add_force_in(&mut self, force: NVec2) {
        self.state_mut().add_force_in(force);
    }

    fn integrate(&mut self, dt: f64) -> SimResult<()> {
        semi_implicit_euler(self.state_mut(), dt)
    }

    fn name(&self) -> &str {
        &self.state().name
    }

    fn position(&self) -> NVec2 {
        self.state().position
    }

    /// Container currently owning this body, if any
    fn parent(&self) -> Option<ContainerId> {
        self.links().parent()
    }

    /// Clock currently driving this body, if any
    fn clock(&self) -> Option<ClockId> {
        self.links().clock()
    }
}

/// Depth-first search by name over a list of siblings and their subtrees
pub fn find_in<'a>(bodies: &'a [Box<dyn Body>], name: &str) -> Option<&'a dyn Body> {
    for body in bodies {
        if body.name() == name {
            return Some(&**body);
        }
        if let Some(found) = find_in(body.children(), name) {
            return Some(found);
        }
    }
    None
}

/// Number of bodies in the subtrees of `bodies`, the bodies themselves included
pub fn count_bodies(bodies: &[Box<dyn Body>]) -> usize {
    bodies.iter().map(|b| 1 + count_bodies(b.children())).sum()
}
