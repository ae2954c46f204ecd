//! Tracker domain entities.

pub mod goal;
pub mod period;
pub mod progress;

pub use goal::TrackerGoal;
pub use period::PeriodType;
pub use progress::TrackerProgressRecord;
