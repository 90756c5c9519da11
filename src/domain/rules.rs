use std::sync::Arc;

/// Trait for the birth/survival rule applied to every cell each generation.
/// `Send + Sync` so a grid can be stepped on rayon or tokio worker threads.
pub trait Rule: Send + Sync {
    /// Name of the rule
    fn name(&self) -> &'static str;

    /// B/S notation, e.g. "B3/S23"
    fn notation(&self) -> &'static str;

    /// Next alive state for a cell given its live neighbor count
    fn next(&self, alive: bool, neighbors: u8) -> bool;
}

/// Conway's Game of Life (B3/S23)
#[derive(Clone, Copy, Debug, Default)]
pub struct ConwayRule;

impl Rule for ConwayRule {
    fn name(&self) -> &'static str {
        "Conway"
    }

    fn notation(&self) -> &'static str {
        "B3/S23"
    }

    fn next(&self, alive: bool, neighbors: u8) -> bool {
        matches!((alive, neighbors), (true, 2 | 3) | (false, 3))
    }
}

/// HighLife (B36/S23)
/// Conway plus birth on 6 neighbors, which gives rise to replicators
#[derive(Clone, Copy, Debug, Default)]
pub struct HighLifeRule;

impl Rule for HighLifeRule {
    fn name(&self) -> &'static str {
        "HighLife"
    }

    fn notation(&self) -> &'static str {
        "B36/S23"
    }

    fn next(&self, alive: bool, neighbors: u8) -> bool {
        matches!((alive, neighbors), (true, 2 | 3) | (false, 3 | 6))
    }
}

/// Get default rule (Conway's Life)
pub fn default_rule() -> Arc<dyn Rule> {
    Arc::new(ConwayRule)
}

/// Resolve a rule from its case-insensitive name
pub fn rule_by_name(name: &str) -> Option<Arc<dyn Rule>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "conway" | "life" | "b3/s23" => Some(Arc::new(ConwayRule)),
        "highlife" | "b36/s23" => Some(Arc::new(HighLifeRule)),
        _ => None,
    }
}
