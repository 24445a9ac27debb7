pub mod fixtures;
pub mod tracing;

pub use fixtures::{fixture, runs_dir};
pub use tracing::{CapturedEvent, capture_events};
