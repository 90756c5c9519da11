mod cell;
mod grid;
mod neighbors;
mod patterns;
mod rules;

pub use cell::Cell;
pub use grid::{Grid, INITIAL_DENSITY, MAX_CELLS, PARALLEL_THRESHOLD};
pub(crate) use grid::check_cell_budget;
pub use neighbors::{Topology, count_live_neighbors};
pub use patterns::{Pattern, presets};
pub use rules::{ConwayRule, HighLifeRule, Rule, default_rule, rule_by_name};
