pub mod states;
pub mod params;
pub mod error;
pub mod body;
pub mod container;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod clock;
