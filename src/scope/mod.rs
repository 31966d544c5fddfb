//! Consumer side of the instrument — state and per-tick analysis.

pub mod cycle;
pub mod state;

pub use cycle::{AnalysisCycle, HOP_INTERVAL, TRIGGER_SEARCH, WINDOW_SECS};
pub use state::ScopeState;
