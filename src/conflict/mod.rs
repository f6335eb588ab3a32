//! Conflict events and per-year presence labels.

mod events;
mod labeler;

pub use events::{read_events, ConflictEvent};
pub use labeler::{label, ConflictLabeler};
