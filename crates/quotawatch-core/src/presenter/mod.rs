//! Quota presentation: pure functions from a [`StatusRecord`] to display state.
//!
//! Nothing here performs I/O; the monitor feeds records in and publishes
//! the resulting [`Indicator`] and [`DetailRow`]s.
//!
//! [`StatusRecord`]: crate::status::StatusRecord

mod details;
mod format;
mod indicator;

pub use details::{build_details, DetailIcon, DetailRow};
pub use format::{
    bar_cells, format_thousands, overall_percent, progress_bar, time_remaining, truncate_label,
    QuotaLevel, BAR_EMPTY, BAR_FILLED, CAUTION_PERCENT, CRITICAL_PERCENT,
};
pub use indicator::{build_tooltip, Indicator, IndicatorIcon, IndicatorTone};
