//! Timed stepping of a shared grid.
//!
//! The scheduler is a two-state machine (stopped, running). Every `start()`
//! opens a new running phase with its own id and spawns one stepping task for
//! it; the task steps, sleeps for one period, and on waking checks that its
//! phase is still the current one before touching the grid again. `stop()`
//! closes the phase and aborts the task so no armed timer outlives it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::config::{
    Callback, MAX_STEPS_PER_SECOND, MIN_STEPS_PER_SECOND, validate_steps_per_second,
};
use crate::domain::{Grid, PARALLEL_THRESHOLD};
use crate::error::Result;

/// Grid slot shared by the session (toggles, clears) and the stepping task
pub type SharedGrid = Arc<Mutex<Grid>>;

/// Lock the shared grid. A panic while holding the lock cannot leave a
/// half-written generation behind (steps swap in a complete grid), so a
/// poisoned lock is still safe to use.
pub fn lock_grid(grid: &SharedGrid) -> MutexGuard<'_, Grid> {
    grid.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Steps per second, readable from the stepping task without locking
#[derive(Debug)]
struct StepRate(AtomicU64);

impl StepRate {
    fn new(steps_per_second: f64) -> Self {
        Self(AtomicU64::new(steps_per_second.to_bits()))
    }

    fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn set(&self, steps_per_second: f64) {
        self.0.store(steps_per_second.to_bits(), Ordering::Relaxed);
    }

    /// Delay between steps, never shorter than 1ms nor longer than 100s
    fn period(&self) -> Duration {
        let steps_per_second = self.get().clamp(MIN_STEPS_PER_SECOND, MAX_STEPS_PER_SECOND);
        Duration::try_from_secs_f64(1.0 / steps_per_second)
            .unwrap_or(Duration::from_secs_f64(1.0 / MIN_STEPS_PER_SECOND))
    }
}

/// Drives repeated `Grid::step` calls at a configurable cadence
pub struct AnimationScheduler {
    grid: SharedGrid,
    rate: Arc<StepRate>,
    /// Odd while running; each start/stop moves it to the next phase
    phase: Arc<AtomicU64>,
    revision: Arc<watch::Sender<u64>>,
    on_start: Option<Callback>,
    on_stop: Option<Callback>,
    task: Option<JoinHandle<()>>,
    runtime: Handle,
}

impl AnimationScheduler {
    /// Build a stopped scheduler. `revision` is bumped after every step so a
    /// renderer knows to redraw.
    pub fn new(
        grid: SharedGrid,
        steps_per_second: f64,
        revision: Arc<watch::Sender<u64>>,
        runtime: Handle,
    ) -> Result<Self> {
        validate_steps_per_second(steps_per_second)?;
        Ok(Self {
            grid,
            rate: Arc::new(StepRate::new(steps_per_second)),
            phase: Arc::new(AtomicU64::new(0)),
            revision,
            on_start: None,
            on_stop: None,
            task: None,
            runtime,
        })
    }

    /// Attach lifecycle hooks (builder pattern)
    pub fn with_callbacks(mut self, on_start: Option<Callback>, on_stop: Option<Callback>) -> Self {
        self.on_start = on_start;
        self.on_stop = on_stop;
        self
    }

    pub fn is_running(&self) -> bool {
        self.phase.load(Ordering::SeqCst) % 2 == 1
    }

    pub fn steps_per_second(&self) -> f64 {
        self.rate.get()
    }

    /// Change the cadence. A tick that is already pending keeps its delay;
    /// the new rate applies from the next scheduled tick.
    pub fn set_steps_per_second(&self, steps_per_second: f64) -> Result<()> {
        validate_steps_per_second(steps_per_second)?;
        self.rate.set(steps_per_second);
        log::debug!("step rate set to {steps_per_second}/s");
        Ok(())
    }

    /// Enter a new running phase. No-op while already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let phase = self.phase.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("scheduler started (phase {phase}, {}/s)", self.rate.get());

        if let Some(on_start) = &self.on_start {
            on_start();
        }

        let task = run_phase(
            phase,
            Arc::clone(&self.phase),
            Arc::clone(&self.grid),
            Arc::clone(&self.rate),
            Arc::clone(&self.revision),
        );
        self.task = Some(self.runtime.spawn(task));
    }

    /// Leave the running phase and release its timer. No-op while stopped.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        let phase = self.phase.fetch_add(1, Ordering::SeqCst);
        self.release();
        log::info!("scheduler stopped (phase {phase})");

        if let Some(on_stop) = &self.on_stop {
            on_stop();
        }
    }

    fn release(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            self.phase.fetch_add(1, Ordering::SeqCst);
        }
        self.release();
    }
}

/// Step the grid only if `phase` is still the running phase.
/// The check happens under the grid lock, so a tick racing a stop and rebuild
/// can never touch the grid swapped in after it.
fn step_if_current(phase: u64, current: &AtomicU64, grid: &SharedGrid) -> Option<u64> {
    let mut grid = lock_grid(grid);
    if current.load(Ordering::SeqCst) != phase {
        return None;
    }
    grid.step();
    Some(grid.generation())
}

/// Body of one running phase
async fn run_phase(
    phase: u64,
    current: Arc<AtomicU64>,
    grid: SharedGrid,
    rate: Arc<StepRate>,
    revision: Arc<watch::Sender<u64>>,
) {
    loop {
        let (rows, cols) = lock_grid(&grid).dimensions();
        let stepped = if rows * cols >= PARALLEL_THRESHOLD {
            // Large grids step on the blocking pool so rayon never stalls a runtime worker
            let (current, grid) = (Arc::clone(&current), Arc::clone(&grid));
            tokio::task::spawn_blocking(move || step_if_current(phase, &current, &grid))
                .await
                .unwrap_or_else(|err| {
                    log::error!("phase {phase}: step task failed: {err}");
                    None
                })
        } else {
            step_if_current(phase, &current, &grid)
        };

        let Some(generation) = stepped else {
            break;
        };
        revision.send_modify(|rev| *rev += 1);
        log::trace!("phase {phase}: generation {generation}");

        tokio::time::sleep(rate.period()).await;
    }
    log::debug!("phase {phase} observed stop");
}
