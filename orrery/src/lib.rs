pub mod simulation;
pub mod configuration;
pub mod visualization;

pub use simulation::states::{BodyState, ContainerId, LinkAccess, Links, NVec2};
pub use simulation::body::Body;
pub use simulation::container::Container;
pub use simulation::forces::{NewtonianGravity, PairForce};
pub use simulation::integrator::semi_implicit_euler;
pub use simulation::clock::{CallbackId, Clock, ClockDriver, ClockId, TickCallback};
pub use simulation::engine::{Engine, SharedContainer};
pub use simulation::error::{SimError, SimResult};
pub use simulation::params::{Parameters, G};

pub use configuration::config::{BodyConfig, ClockConfig, ScenarioConfig, SimulationConfig};

pub use visualization::render_handle::{LoggingHandle, RenderHandle};
