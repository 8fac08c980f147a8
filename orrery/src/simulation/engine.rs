//! Runtime binding of a scene to the clock that drives it
//!
//! An `Engine` owns the root container (shared behind a mutex so the clock
//! can reach it from its worker thread), the clock, and the resolved
//! `Parameters`. Building one registers the root's tick with the clock;
//! dropping it (or calling [`Engine::detach`]) deregisters it again.
//!
//! A tick that fails is logged, remembered, and halts the scene: later
//! firings become no-ops until the error is taken with [`Engine::take_error`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use log::{error, info};

use crate::configuration::config::ScenarioConfig;

use super::body::Body;
use super::clock::{lock, CallbackId, Clock, ClockDriver};
use super::container::Container;
use super::error::{SimError, SimResult};
use super::params::Parameters;
use super::states::LinkAccess;

pub type SharedContainer = Arc<Mutex<Container>>;

pub struct Engine {
    root: SharedContainer,
    clock: Clock,
    parameters: Parameters,
    callback: Option<CallbackId>,
    fault: Arc<Mutex<Option<SimError>>>,
    ticks: Arc<AtomicU64>,
}

impl Engine {
    /// Register `root` with `clock`.
    /// Fails with `ClockAlreadySet` if the root is already driven by a clock.
    pub fn new(root: Container, mut clock: Clock, parameters: Parameters) -> SimResult<Self> {
        let root = Arc::new(Mutex::new(root));
        {
            let mut guard = lock(&root);
            if guard.clock().is_some() {
                return Err(SimError::ClockAlreadySet {
                    name: guard.name().to_owned(),
                });
            }
            guard.links_mut(LinkAccess::grant()).set_clock(Some(clock.id()));
        }

        let fault = Arc::new(Mutex::new(None));
        let ticks = Arc::new(AtomicU64::new(0));
        let callback = clock.add_callback(tick_callback(
            Arc::downgrade(&root),
            parameters.time_scale,
            Arc::clone(&fault),
            Arc::clone(&ticks),
        ));

        Ok(Self {
            root,
            clock,
            parameters,
            callback: Some(callback),
            fault,
            ticks,
        })
    }

    /// Build the scene tree, the clock and the parameters from a loaded scenario
    pub fn from_scenario(cfg: &ScenarioConfig, driver: ClockDriver) -> SimResult<Self> {
        let mut parameters = cfg.parameters();
        let root = Container::from_config_with_gravity(&cfg.root, parameters.gravitational_constant)?;
        let clock = Clock::with_driver(parameters.interval_ms, cfg.clock.name.clone(), driver);
        // the clock may have replaced an unusable interval with its default
        parameters.interval_ms = clock.interval();
        info!(
            "scenario `{}`: {} bodies, interval {} ms, dt {}",
            root.name(),
            root.body_count(),
            clock.interval(),
            parameters.dt()
        );
        Self::new(root, clock, parameters)
    }

    pub fn start(&mut self) -> SimResult<()> {
        self.clock.start()
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    /// One firing of the clock, for hosts that pump it themselves.
    /// Returns whether the clock fired, or the error the tick raised.
    pub fn step(&mut self) -> SimResult<bool> {
        let fired = self.clock.fire();
        match self.take_error() {
            Some(err) => Err(err),
            None => Ok(fired),
        }
    }

    /// Stop the clock and deregister the root's tick. Idempotent.
    pub fn detach(&mut self) {
        self.clock.stop();
        if let Some(id) = self.callback.take() {
            self.clock.remove_callback(id);
            lock(&self.root).links_mut(LinkAccess::grant()).set_clock(None);
        }
    }

    /// Shared handle to the root, e.g. for a renderer on another thread
    pub fn root(&self) -> SharedContainer {
        Arc::clone(&self.root)
    }

    /// Lock the root for inspection. Firings wait while the guard is held.
    pub fn lock_root(&self) -> MutexGuard<'_, Container> {
        lock(&self.root)
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Extra callbacks (frame counters, samplers) go through here
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Completed ticks of the root
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Take the error that halted the scene, resuming it
    pub fn take_error(&self) -> Option<SimError> {
        lock(&self.fault).take()
    }

    pub fn is_halted(&self) -> bool {
        lock(&self.fault).is_some()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.detach();
    }
}

// the root is left out: formatting must not wait on a running tick
impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("clock", &self.clock)
            .field("parameters", &self.parameters)
            .field("ticks", &self.ticks())
            .field("halted", &self.is_halted())
            .finish()
    }
}

/// The root's tick entry point as a clock callback.
/// Holds the root weakly, so a dropped scene turns the callback into a no-op.
fn tick_callback(
    root: Weak<Mutex<Container>>,
    time_scale: f64,
    fault: Arc<Mutex<Option<SimError>>>,
    ticks: Arc<AtomicU64>,
) -> impl FnMut(f64) + Send + 'static {
    move |interval_ms| {
        let Some(root) = root.upgrade() else {
            return;
        };
        if lock(&fault).is_some() {
            return;
        }

        let dt = interval_ms * time_scale;
        let mut root = lock(&root);
        match root.tick(dt) {
            Ok(()) => {
                ticks.fetch_add(1, Ordering::AcqRel);
            }
            Err(err) => {
                error!("tick of `{}` failed, halting: {err}", root.name());
                *lock(&fault) = Some(err);
            }
        }
    }
}
