use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::watch;

use super::config::Config;
use super::layout::Layout;
use super::scheduler::{AnimationScheduler, SharedGrid, lock_grid};
use crate::domain::{Grid, Pattern, Rule, Topology};
use crate::error::Result;

/// Slowest and fastest cadence reachable through `adjust_speed`
pub const SPEED_RANGE: (f64, f64) = (1.0, 60.0);

/// Session orchestrates one simulation.
/// It privately owns the grid, the viewport layout and the scheduler that
/// steps the grid; everything a front-end does goes through here.
pub struct Session {
    config: Config,
    viewport: (f32, f32),
    layout: Layout,
    grid: SharedGrid,
    scheduler: AnimationScheduler,
    revision: Arc<watch::Sender<u64>>,
}

impl Session {
    /// Build a session for a `width`x`height` pixel viewport.
    /// Stepping tasks are spawned on `runtime`.
    pub fn new(width: f32, height: f32, config: Config, runtime: Handle) -> Result<Self> {
        config.validate()?;
        let layout = Layout::new(width, height, config.cell_size)?;
        let grid = build_grid(&layout, &config)?;
        log::info!(
            "session: {}x{} px viewport, {}x{} grid, {} {}",
            width,
            height,
            layout.rows,
            layout.cols,
            config.topology.name(),
            config.rule.notation()
        );

        let grid = Arc::new(Mutex::new(grid));
        let (revision, _) = watch::channel(0);
        let revision = Arc::new(revision);
        let scheduler = AnimationScheduler::new(
            Arc::clone(&grid),
            config.steps_per_second,
            Arc::clone(&revision),
            runtime,
        )?
        .with_callbacks(config.on_start.clone(), config.on_stop.clone());

        Ok(Self {
            config,
            viewport: (width, height),
            layout,
            grid,
            scheduler,
            revision,
        })
    }

    pub fn start(&mut self) {
        self.scheduler.start();
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Kill every cell and reset the generation counter
    pub fn clear(&self) {
        lock_grid(&self.grid).clear();
        log::info!("grid cleared");
        self.notify();
    }

    /// Re-roll every cell and reset the generation counter
    pub fn randomize(&self) {
        lock_grid(&self.grid).randomize();
        self.notify();
    }

    /// Flip one cell. Allowed while running; the grid lock orders it
    /// strictly before or after any step.
    pub fn toggle(&self, row: usize, col: usize) -> Result<bool> {
        let alive = lock_grid(&self.grid).toggle(row, col)?;
        self.notify();
        Ok(alive)
    }

    /// Toggle the cell under a viewport pixel and return its position
    pub fn click(&self, x: f32, y: f32) -> Result<(usize, usize)> {
        let (row, col) = self.layout.cell_at(x, y)?;
        self.toggle(row, col)?;
        Ok((row, col))
    }

    /// Stamp a pattern with its top-left corner at `(row, col)`
    pub fn place_pattern(&self, pattern: &Pattern, row: usize, col: usize) -> Result<()> {
        pattern.place_on(&mut lock_grid(&self.grid), row, col)?;
        log::debug!("placed {} at ({row}, {col})", pattern.name);
        self.notify();
        Ok(())
    }

    /// Rebuild for a new viewport size
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        let layout = Layout::new(width, height, self.config.cell_size)?;
        self.rebuild((width, height), layout, self.config.clone())
    }

    pub fn set_cell_size(&mut self, cell_size: f32) -> Result<()> {
        let config = self.config.clone().with_cell_size(cell_size);
        config.validate()?;
        let layout = Layout::new(self.viewport.0, self.viewport.1, cell_size)?;
        self.rebuild(self.viewport, layout, config)
    }

    pub fn set_topology(&mut self, topology: Topology) -> Result<()> {
        let config = self.config.clone().with_topology(topology);
        self.rebuild(self.viewport, self.layout, config)
    }

    pub fn set_rule(&mut self, rule: Arc<dyn Rule>) -> Result<()> {
        let config = self.config.clone().with_rule(rule);
        self.rebuild(self.viewport, self.layout, config)
    }

    /// Replace the grid wholesale. The new grid is built before anything is
    /// torn down, so a failure leaves the session as it was.
    fn rebuild(&mut self, viewport: (f32, f32), layout: Layout, config: Config) -> Result<()> {
        let grid = build_grid(&layout, &config)?;

        self.scheduler.stop();
        *lock_grid(&self.grid) = grid;
        self.viewport = viewport;
        self.layout = layout;
        self.config = config;

        log::info!(
            "grid rebuilt: {}x{} cells of {}px, {} {}",
            layout.rows,
            layout.cols,
            layout.cell_size,
            self.config.topology.name(),
            self.config.rule.notation()
        );
        self.notify();
        Ok(())
    }

    /// Takes effect from the next scheduled tick
    pub fn set_steps_per_second(&mut self, steps_per_second: f64) -> Result<()> {
        self.scheduler.set_steps_per_second(steps_per_second)?;
        self.config.steps_per_second = steps_per_second;
        Ok(())
    }

    /// Nudge the cadence, clamped to [`SPEED_RANGE`]
    pub fn adjust_speed(&mut self, delta: f64) -> Result<f64> {
        let steps_per_second = (self.steps_per_second() + delta).clamp(SPEED_RANGE.0, SPEED_RANGE.1);
        self.set_steps_per_second(steps_per_second)?;
        Ok(steps_per_second)
    }

    pub fn steps_per_second(&self) -> f64 {
        self.scheduler.steps_per_second()
    }

    pub fn generation(&self) -> u64 {
        lock_grid(&self.grid).generation()
    }

    /// Consistent copy of the grid for rendering
    pub fn grid_snapshot(&self) -> Grid {
        lock_grid(&self.grid).clone()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Redraw revision; changes after every step, toggle, clear and rebuild
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn notify(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

fn build_grid(layout: &Layout, config: &Config) -> Result<Grid> {
    Ok(Grid::new(layout.rows, layout.cols, config.topology)?.with_rule(Arc::clone(&config.rule)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HighLifeRule, presets};
    use crate::error::LifeError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn session(width: f32, height: f32, config: Config) -> Session {
        Session::new(width, height, config, Handle::current()).unwrap()
    }

    #[tokio::test]
    async fn test_grid_dimensions_follow_viewport() {
        let s = session(205.0, 98.0, Config::default().with_cell_size(10.0));

        assert_eq!(s.layout().dimensions(), (9, 20));
        assert_eq!(s.grid_snapshot().dimensions(), (9, 20));
        assert_eq!(s.generation(), 0);
        assert!(!s.is_running());
    }

    #[tokio::test]
    async fn test_tiny_viewport_and_bad_config_are_rejected() {
        let err = Session::new(5.0, 500.0, Config::default(), Handle::current());
        assert!(matches!(err, Err(LifeError::InvalidDimension { .. })));

        let err = Session::new(
            500.0,
            500.0,
            Config::default().with_steps_per_second(0.0),
            Handle::current(),
        );
        assert!(matches!(err, Err(LifeError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_click_toggles_cell_under_pointer() {
        let s = session(100.0, 100.0, Config::default());
        let mut redraws = s.subscribe();
        let before = s.grid_snapshot().is_alive(2, 3);

        assert_eq!(s.click(35.0, 25.0).unwrap(), (2, 3));
        assert_eq!(s.grid_snapshot().is_alive(2, 3), !before);
        assert!(redraws.has_changed().unwrap());
        redraws.borrow_and_update();

        let snapshot = s.grid_snapshot().live_cells();
        assert!(matches!(s.click(150.0, 25.0), Err(LifeError::OutOfBounds { .. })));
        assert!(s.click(-1.0, 25.0).is_err());
        assert_eq!(s.grid_snapshot().live_cells(), snapshot);
        assert!(!redraws.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_then_step_is_all_dead() {
        let mut s = session(100.0, 100.0, Config::default());
        let mut redraws = s.subscribe();

        s.clear();
        redraws.borrow_and_update();
        s.start();
        redraws.changed().await.unwrap();
        s.stop();

        let grid = s.grid_snapshot();
        assert_eq!(grid.generation(), 1);
        assert_eq!(grid.live_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_while_running_is_kept_between_steps() {
        let mut s = session(100.0, 100.0, Config::default().with_topology(Topology::Bounded));
        let mut redraws = s.subscribe();
        s.clear();
        presets::block().place_on(&mut lock_grid(&s.grid), 4, 4).unwrap();
        redraws.borrow_and_update();

        s.start();
        redraws.changed().await.unwrap();
        assert_eq!(s.generation(), 1);

        // A lone cell far from the block dies on the next step
        assert!(s.toggle(0, 0).unwrap());
        assert_eq!(s.generation(), 1);
        assert!(s.grid_snapshot().is_alive(0, 0));

        redraws.borrow_and_update();
        redraws.changed().await.unwrap();
        let grid = s.grid_snapshot();
        assert_eq!(grid.generation(), 2);
        assert!(!grid.is_alive(0, 0));
        assert_eq!(grid.live_count(), 4);
        s.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_stops_and_rebuilds() {
        let stops = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&stops);
        let config = Config::default().on_stop(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let mut s = session(100.0, 100.0, config);
        let mut redraws = s.subscribe();

        s.start();
        redraws.changed().await.unwrap();
        s.resize(200.0, 50.0).unwrap();

        assert!(!s.is_running());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(s.grid_snapshot().dimensions(), (5, 20));
        assert_eq!(s.generation(), 0);

        // No step from the old phase lands on the new grid
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(s.generation(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_resize_leaves_session_running() {
        let mut s = session(100.0, 100.0, Config::default());
        let mut redraws = s.subscribe();
        s.start();
        redraws.changed().await.unwrap();

        assert!(s.resize(3.0, 3.0).is_err());
        assert!(s.set_cell_size(-1.0).is_err());
        assert!(s.is_running());
        assert_eq!(s.layout().dimensions(), (10, 10));
        s.stop();
    }

    #[tokio::test]
    async fn test_reconfiguration_replaces_grid_settings() {
        let mut s = session(100.0, 100.0, Config::default());

        s.set_cell_size(20.0).unwrap();
        assert_eq!(s.grid_snapshot().dimensions(), (5, 5));

        s.set_topology(Topology::Bounded).unwrap();
        assert_eq!(s.grid_snapshot().topology(), Topology::Bounded);

        s.set_rule(Arc::new(HighLifeRule)).unwrap();
        assert_eq!(s.grid_snapshot().rule().name(), "HighLife");
        assert_eq!(s.config().cell_size, 20.0);
    }

    #[tokio::test]
    async fn test_speed_is_clamped() {
        let mut s = session(100.0, 100.0, Config::default());

        assert_eq!(s.adjust_speed(1.0).unwrap(), 5.0);
        assert_eq!(s.adjust_speed(-100.0).unwrap(), 1.0);
        assert_eq!(s.adjust_speed(500.0).unwrap(), 60.0);
        assert!(s.set_steps_per_second(-3.0).is_err());
        assert_eq!(s.steps_per_second(), 60.0);
    }

    #[tokio::test]
    async fn test_place_pattern_notifies() {
        let s = session(100.0, 100.0, Config::default().with_topology(Topology::Bounded));
        s.clear();
        let mut redraws = s.subscribe();

        s.place_pattern(&presets::glider(), 0, 0).unwrap();
        assert_eq!(s.grid_snapshot().live_count(), 5);
        assert!(redraws.has_changed().unwrap());

        redraws.borrow_and_update();
        assert!(s.place_pattern(&presets::glider(), 9, 9).is_err());
        assert!(!redraws.has_changed().unwrap());
    }
}
