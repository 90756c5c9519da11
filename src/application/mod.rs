mod config;
mod layout;
mod scheduler;
mod session;

pub use config::{
    Callback, Config, DEFAULT_CELL_SIZE, DEFAULT_STEPS_PER_SECOND, MAX_STEPS_PER_SECOND,
    MIN_STEPS_PER_SECOND,
};
pub use layout::Layout;
pub use scheduler::{AnimationScheduler, SharedGrid, lock_grid};
pub use session::{SPEED_RANGE, Session};
