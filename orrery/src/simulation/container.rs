//! Composite body: a point mass that owns an ordered list of child bodies.
//!
//! One `Container::tick` does, in order:
//! 1. gravity among *direct* children only, every unordered pair once,
//!    computed against the children's positions as they were at the start;
//! 2. self integration, unless this container is a tree root;
//! 3. `tick` on every child in list order (nested containers repeat the
//!    whole procedure for their own children);
//! 4. a geometry notification to the attached render handle, if any.
//!
//! Gravity is never computed across levels. A planet inside one solar-system
//! container does not feel the planets of another solar system; only the two
//! solar-system containers attract each other, as single bodies.
//!
//! A degenerate pair aborts the tick. The failing level applies nothing, and
//! every container the error passes through on its way up clears the forces
//! it handed to children that never got to integrate them. Bodies ticked
//! before the failure keep their new state, so a resumed tick starts from
//! empty accumulators everywhere.

use std::fmt;

use log::trace;

use crate::configuration::config::BodyConfig;
use crate::visualization::render_handle::RenderHandle;

use super::body::{count_bodies, find_in, Body};
use super::error::{SimError, SimResult};
use super::forces::{accumulate_pair_forces, NewtonianGravity};
use super::params::G;
use super::states::{BodyState, ContainerId, LinkAccess, Links, NVec2};

pub struct Container {
    id: ContainerId,
    state: BodyState,
    links: Links,
    gravity: NewtonianGravity,
    children: Vec<Box<dyn Body>>,
    render_handle: Option<Box<dyn RenderHandle>>,
}

impl Container {
    /// Empty, massless container at the origin (suitable as a tree root)
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_state(BodyState::new(name))
    }

    /// Unowned, undriven container carrying `state`
    pub fn with_state(state: BodyState) -> Self {
        Self {
            id: ContainerId::next(),
            state,
            links: Links::default(),
            gravity: NewtonianGravity::new(G),
            children: Vec::new(),
            render_handle: None,
        }
    }

    /// Build a whole subtree from configuration, bottom-up.
    /// Containers without their own `gravitational_constant` inherit the
    /// nearest ancestor's, and the root falls back to [`G`].
    pub fn from_config(cfg: &BodyConfig) -> SimResult<Self> {
        Self::build(cfg, G)
    }

    /// Same as [`Container::from_config`] with a scene-wide default constant
    pub fn from_config_with_gravity(cfg: &BodyConfig, g: f64) -> SimResult<Self> {
        Self::build(cfg, g)
    }

    fn build(cfg: &BodyConfig, inherited_g: f64) -> SimResult<Self> {
        let g = cfg.gravitational_constant.unwrap_or(inherited_g);
        let mut container = Self::with_state(BodyState::from_config(cfg));
        container.gravity = NewtonianGravity::new(g);

        for child_cfg in &cfg.children {
            container.add_child(Self::build(child_cfg, g)?)?;
        }
        Ok(container)
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// A container without a parent is the root of its tree and never integrates
    pub fn is_root(&self) -> bool {
        self.links.parent().is_none()
    }

    pub fn gravitational_constant(&self) -> f64 {
        self.gravity.g
    }

    /// Applies to this container's direct children only
    pub fn set_gravitational_constant(&mut self, g: f64) {
        self.gravity = NewtonianGravity::new(g);
    }

    /// Take ownership of `child` and point its back reference at this container
    pub fn add_child<B: Body + 'static>(&mut self, child: B) -> SimResult<()> {
        self.add_boxed_child(Box::new(child))
    }

    pub fn add_boxed_child(&mut self, mut child: Box<dyn Body>) -> SimResult<()> {
        check_attachable(&*child)?;
        child.links_mut(LinkAccess::grant()).set_parent(Some(self.id));
        self.children.push(child);
        Ok(())
    }

    /// Replace every child at once.
    ///
    /// The new list is checked as a whole before anything changes. On success
    /// the previous children are returned with their back references cleared.
    pub fn set_children(&mut self, mut children: Vec<Box<dyn Body>>) -> SimResult<Vec<Box<dyn Body>>> {
        for child in &children {
            check_attachable(&**child)?;
        }
        for child in children.iter_mut() {
            child.links_mut(LinkAccess::grant()).set_parent(Some(self.id));
        }

        let mut previous = std::mem::replace(&mut self.children, children);
        for child in previous.iter_mut() {
            child.links_mut(LinkAccess::grant()).set_parent(None);
        }
        Ok(previous)
    }

    /// Detach the child at `index`, clearing its back reference
    pub fn remove_child(&mut self, index: usize) -> Option<Box<dyn Body>> {
        if index >= self.children.len() {
            return None;
        }
        let mut child = self.children.remove(index);
        child.links_mut(LinkAccess::grant()).set_parent(None);
        Some(child)
    }

    /// Depth-first search by name over this container and its subtree
    pub fn find(&self, name: &str) -> Option<&dyn Body> {
        if self.state.name == name {
            return Some(self);
        }
        find_in(&self.children, name)
    }

    /// Bodies in the subtree, this container excluded
    pub fn body_count(&self) -> usize {
        count_bodies(&self.children)
    }

    pub fn set_render_handle(&mut self, handle: impl RenderHandle + 'static) {
        self.render_handle = Some(Box::new(handle));
    }

    pub fn take_render_handle(&mut self) -> Option<Box<dyn RenderHandle>> {
        self.render_handle.take()
    }

    pub fn has_render_handle(&self) -> bool {
        self.render_handle.is_some()
    }

    /// Net force on every direct child from its siblings, or the first
    /// degenerate pair. Nothing is applied here.
    fn sibling_forces(&self) -> SimResult<Vec<NVec2>> {
        // snapshot of the children as they are before anyone moves
        let snapshot: Vec<&BodyState> = self.children.iter().map(|c| c.state()).collect();
        let mut out = vec![NVec2::zeros(); snapshot.len()];
        accumulate_pair_forces(&self.gravity, &snapshot, &mut out)?;
        Ok(out)
    }

    /// Drop forces this level handed to `children[from..]` that were never integrated
    fn discard_pending_forces(&mut self, from: usize) {
        for child in &mut self.children[from..] {
            child.state_mut().clear_force_in();
        }
    }
}

impl Body for Container {
    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }

    fn links(&self) -> &Links {
        &self.links
    }

    fn links_mut(&mut self, _access: LinkAccess) -> &mut Links {
        &mut self.links
    }

    fn children(&self) -> &[Box<dyn Body>] {
        &self.children
    }

    fn as_container(&self) -> Option<&Container> {
        Some(self)
    }

    fn tick(&mut self, dt: f64) -> SimResult<()> {
        // A degenerate pair aborts before any force is applied at this level
        let forces = self.sibling_forces()?;
        for (child, force) in self.children.iter_mut().zip(forces) {
            child.add_force_in(force);
        }

        // Only a nested container is subject to forces from outside its subtree
        if !self.is_root() {
            if let Err(err) = self.integrate(dt) {
                self.discard_pending_forces(0);
                return Err(err);
            }
        }

        for index in 0..self.children.len() {
            if let Err(err) = self.children[index].tick(dt) {
                self.discard_pending_forces(index);
                return Err(err);
            }
        }

        if let Some(handle) = self.render_handle.as_mut() {
            handle.geometry_changed(&self.state.name, self.state.position);
        }
        trace!("tick `{}`: {} children, dt = {dt}", self.state.name, self.children.len());
        Ok(())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("links", &self.links)
            .field("g", &self.gravity.g)
            .field("children", &self.children.iter().map(|c| c.name()).collect::<Vec<_>>())
            .field("render_handle", &self.render_handle.is_some())
            .finish()
    }
}

/// A child must be unowned and massive before a container takes it
fn check_attachable(child: &dyn Body) -> SimResult<()> {
    if child.parent().is_some() {
        return Err(SimError::Ownership {
            name: child.name().to_owned(),
        });
    }
    child.state().validate_mass()
}
