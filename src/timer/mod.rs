pub mod breach;
pub mod display;
pub mod format;
pub mod ordering;
pub mod remaining;
pub mod state;
pub mod ticker;

pub use breach::{format_projected_breach, projected_breach_at};
pub use display::TimerDisplay;
pub use format::{
    format_duration, percentage_remaining, severity_tier, severity_tier_with, SeverityThresholds,
    SeverityTier,
};
pub use ordering::{compact_order, progress_order};
pub use remaining::{is_breached, raw_remaining_ms, remaining_ms};
pub use state::{SlaTarget, SlaTimer, SlaTimerStatus};
pub use ticker::TimerTicker;
