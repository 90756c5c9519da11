// Errors shared across layers
pub mod error;

// Domain layer - Core automaton logic
pub mod domain;

// Application layer - Configuration, scheduling and session control
pub mod application;

// Infrastructure layer - rendering, input
pub mod rendering;
pub mod input;

// Re-exports for convenience
pub use application::{AnimationScheduler, Config, Layout, Session};
pub use domain::{Cell, Grid, Pattern, Rule, Topology, presets};
pub use error::{LifeError, Result};
