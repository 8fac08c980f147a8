//! Periodic ticker that fans each firing out to its registered callbacks
//!
//! A `Clock` holds an interval (milliseconds) and an ordered list of
//! callbacks. Every firing calls each callback once, in registration order,
//! with the interval value. Two drivers produce firings:
//! - `ClockDriver::Thread`: a worker thread fires every interval while running
//! - `ClockDriver::Manual`: nothing fires on its own; the host calls
//!   [`Clock::fire`] from its own loop (a frame update, a test, a CLI)
//!
//! Firings never overlap. The callback list sits behind one mutex held for a
//! whole firing, and the worker only waits for the next interval after the
//! current firing returns, so a slow firing pushes the schedule back instead
//! of running twice at once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error};

use super::error::SimResult;
use super::params::DEFAULT_INTERVAL_MS;

pub type TickCallback = Box<dyn FnMut(f64) + Send + 'static>;

static NEXT_CLOCK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a `Clock`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockId(u64);

/// Handle returned on registration, used to deregister one callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(u64);

/// What produces the firings of a clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockDriver {
    #[default]
    Thread,
    Manual,
}

struct Registered {
    id: CallbackId,
    callback: TickCallback,
}

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

pub struct Clock {
    id: ClockId,
    name: String,
    interval_ms: f64,
    driver: ClockDriver,
    callbacks: Arc<Mutex<Vec<Registered>>>,
    next_callback: u64,
    running: bool,
    worker: Option<Worker>,
}

impl Clock {
    /// Thread-driven clock. A non-positive or non-finite interval falls back
    /// to [`DEFAULT_INTERVAL_MS`].
    pub fn new(interval_ms: f64, name: impl Into<String>) -> Self {
        Self::with_driver(interval_ms, name, ClockDriver::Thread)
    }

    /// Clock that only fires through [`Clock::fire`]
    pub fn manual(interval_ms: f64, name: impl Into<String>) -> Self {
        Self::with_driver(interval_ms, name, ClockDriver::Manual)
    }

    pub fn with_driver(interval_ms: f64, name: impl Into<String>, driver: ClockDriver) -> Self {
        let interval_ms = if interval_ms > 0.0 && interval_ms.is_finite() {
            interval_ms
        } else {
            DEFAULT_INTERVAL_MS
        };
        Self {
            id: ClockId(NEXT_CLOCK_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            interval_ms,
            driver,
            callbacks: Arc::new(Mutex::new(Vec::new())),
            next_callback: 0,
            running: false,
            worker: None,
        }
    }

    pub fn id(&self) -> ClockId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interval in milliseconds; also the value every callback receives
    pub fn interval(&self) -> f64 {
        self.interval_ms
    }

    pub fn driver(&self) -> ClockDriver {
        self.driver
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn callback_count(&self) -> usize {
        lock(&self.callbacks).len()
    }

    /// Append one callback. Registering the same closure twice makes it fire twice.
    ///
    /// Must not be called from inside a callback of this clock: the list is
    /// locked for the duration of a firing.
    pub fn add_callback<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(f64) + Send + 'static,
    {
        self.push(Box::new(callback))
    }

    /// Append a batch of callbacks, keeping their order
    pub fn add_callbacks<I>(&mut self, callbacks: I) -> Vec<CallbackId>
    where
        I: IntoIterator<Item = TickCallback>,
    {
        callbacks.into_iter().map(|cb| self.push(cb)).collect()
    }

    /// Deregister one callback; returns false if it was not registered
    pub fn remove_callback(&mut self, id: CallbackId) -> bool {
        let mut callbacks = lock(&self.callbacks);
        let before = callbacks.len();
        callbacks.retain(|entry| entry.id != id);
        callbacks.len() != before
    }

    fn push(&mut self, callback: TickCallback) -> CallbackId {
        let id = CallbackId(self.next_callback);
        self.next_callback += 1;
        lock(&self.callbacks).push(Registered { id, callback });
        id
    }

    /// Begin firing every interval. No-op if already running.
    pub fn start(&mut self) -> SimResult<()> {
        if self.running {
            debug!("clock `{}`: already started", self.name);
            return Ok(());
        }

        if self.driver == ClockDriver::Thread {
            let (stop_tx, stop_rx) = mpsc::channel::<()>();
            let callbacks = Arc::clone(&self.callbacks);
            let interval_ms = self.interval_ms;
            let period = Duration::from_secs_f64(interval_ms / 1000.0);

            let handle = thread::Builder::new()
                .name(format!("clock-{}", self.name))
                .spawn(move || loop {
                    match stop_rx.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => fire_all(&callbacks, interval_ms),
                        // stop requested, or the clock is gone
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                })?;
            self.worker = Some(Worker { stop_tx, handle });
        }

        self.running = true;
        debug!("clock `{}`: started, interval {} ms", self.name, self.interval_ms);
        Ok(())
    }

    /// Cancel future firings. No-op if not running.
    ///
    /// A firing already in progress completes first; this call waits for it.
    pub fn stop(&mut self) {
        if !self.running {
            debug!("clock `{}`: not running", self.name);
            return;
        }
        self.running = false;

        if let Some(worker) = self.worker.take() {
            // the worker may already have exited, in which case there is no receiver
            let _ = worker.stop_tx.send(());
            if worker.handle.join().is_err() {
                error!("clock `{}`: worker thread panicked", self.name);
            }
        }
        debug!("clock `{}`: stopped", self.name);
    }

    /// Perform one firing right now, if running. Returns whether it fired.
    pub fn fire(&self) -> bool {
        if !self.running {
            return false;
        }
        fire_all(&self.callbacks, self.interval_ms);
        true
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_MS, "unnamed")
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        if self.running {
            self.stop();
        }
    }
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("interval_ms", &self.interval_ms)
            .field("driver", &self.driver)
            .field("running", &self.running)
            .field("callbacks", &self.callback_count())
            .finish()
    }
}

fn fire_all(callbacks: &Mutex<Vec<Registered>>, interval_ms: f64) {
    let mut callbacks = lock(callbacks);
    for entry in callbacks.iter_mut() {
        (entry.callback)(interval_ms);
    }
}

/// Lock a mutex, carrying on with the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
