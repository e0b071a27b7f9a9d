//! Availability heatmap and goal-conflict analysis over a group roster.
//!
//! Everything here is a pure function of the roster it is handed; nothing
//! is cached between calls.

pub mod conflict;
pub mod heatmap;
pub mod report;
pub mod slots;

pub use conflict::{compute_conflict, ConflictSignal, CONFLICT_THRESHOLD};
pub use heatmap::{compute_heatmap, intensity, Heatmap};
pub use report::{analyze, AlignmentReport, SlotSuggestion};
pub use slots::{slot_label, SLOT_COUNT};
