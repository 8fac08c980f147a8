//! Association between a container and whatever draws it.
//!
//! The simulation never knows how drawing happens; after a container has
//! finished its tick it tells its handle that the geometry changed and passes
//! the new position along. Nothing flows back into the physics.

use log::trace;

use crate::simulation::states::NVec2;

pub trait RenderHandle: Send {
    /// Called once per tick, after the owning container (and its subtree) moved
    fn geometry_changed(&mut self, name: &str, position: NVec2);
}

impl<F> RenderHandle for F
where
    F: FnMut(&str, NVec2) + Send,
{
    fn geometry_changed(&mut self, name: &str, position: NVec2) {
        self(name, position)
    }
}

/// Handle that only logs the updates it receives (headless runs)
#[derive(Debug, Default)]
pub struct LoggingHandle {
    updates: u64,
}

impl LoggingHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notifications received so far
    pub fn updates(&self) -> u64 {
        self.updates
    }
}

impl RenderHandle for LoggingHandle {
    fn geometry_changed(&mut self, name: &str, position: NVec2) {
        self.updates += 1;
        trace!("render: `{name}` moved to ({:.6e}, {:.6e})", position.x, position.y);
    }
}
