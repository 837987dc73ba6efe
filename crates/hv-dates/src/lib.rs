//! Date picker state machine
//!
//! A [`DateConfiguration`] describes a date filter (this month, last 6
//! quarters, an explicit range, ...). The [`reducer`] module applies user
//! actions to it, and [`range`] turns any valid configuration into concrete
//! dates for a given [`DateContext`].

pub mod model;
pub mod quick_options;
pub mod range;
pub mod reducer;
pub mod settings;

// Re-exports
pub use model::{CalendarType, DateBounds, DateConfiguration, DateModifier, DateRange, DateUnit};
pub use quick_options::{
    default_quick_options, find_matching_quick_option, QuickOption, QuickOptionChoice,
};
pub use range::{compute_date_range, DateRangeError};
pub use reducer::{DateAction, DateConfigurationReducer, DateConfigurationState, DateReducerError};
pub use settings::{DateContext, DatePickerSettings, SettingsError};
