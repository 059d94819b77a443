//! Frame profiling and the formatting of its statistics for the debug overlay.

pub mod formatting;
pub mod profiling;

pub use profiling::{StageId, StageTimings};
