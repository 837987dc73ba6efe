//! Date picker settings and the reducer context

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{CalendarType, DateUnit};
use crate::quick_options::{default_quick_options, QuickOption};

/// Errors found while loading or validating picker settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("fiscal start month must be between 1 and 12, got {0}")]
    InvalidFiscalStartMonth(u32),

    #[error("minimum date {min} is after maximum date {max}")]
    InvertedBounds { min: NaiveDate, max: NaiveDate },

    #[error("default quick option `{0}` is not in the quick option catalog")]
    UnknownDefaultQuickOption(String),

    #[error("failed to parse date picker settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Deployment-level configuration of the date picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatePickerSettings {
    /// First month of the fiscal year (1 = January)
    pub fiscal_start_month: u32,

    /// Earliest date with data; lower bound of `ALL_TIME`
    pub min_date: NaiveDate,

    /// Latest date with data; upper bound of `ALL_TIME` and `SINCE`
    pub max_date: NaiveDate,

    /// First day of a week
    pub week_start: Weekday,

    /// Granularities the picker offers, in display order
    pub enabled_date_units: Vec<DateUnit>,

    /// Calendar used when a configuration does not carry one
    pub default_calendar_type: CalendarType,

    /// Quick option catalog, in display order
    pub quick_options: Vec<QuickOption>,

    /// Quick option selected when the picker opens without a value
    pub default_quick_option_id: Option<String>,
}

impl Default for DatePickerSettings {
    fn default() -> Self {
        Self {
            fiscal_start_month: 1,
            min_date: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default(),
            max_date: NaiveDate::from_ymd_opt(2099, 12, 31).unwrap_or_default(),
            week_start: Weekday::Mon,
            enabled_date_units: vec![
                DateUnit::Day,
                DateUnit::Week,
                DateUnit::Month,
                DateUnit::Quarter,
                DateUnit::Year,
            ],
            default_calendar_type: CalendarType::Gregorian,
            quick_options: default_quick_options(),
            default_quick_option_id: Some("last_6_months".to_string()),
        }
    }
}

impl DatePickerSettings {
    /// Parse settings from JSON; missing keys take their default values
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the settings are internally consistent
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=12).contains(&self.fiscal_start_month) {
            return Err(SettingsError::InvalidFiscalStartMonth(self.fiscal_start_month));
        }

        if self.min_date > self.max_date {
            return Err(SettingsError::InvertedBounds {
                min: self.min_date,
                max: self.max_date,
            });
        }

        if let Some(id) = &self.default_quick_option_id {
            if self.quick_option(id).is_none() {
                return Err(SettingsError::UnknownDefaultQuickOption(id.clone()));
            }
        }

        Ok(())
    }

    /// Look up a quick option by id
    pub fn quick_option(&self, id: &str) -> Option<&QuickOption> {
        self.quick_options.iter().find(|option| option.id == id)
    }

    /// The quick option selected when the picker opens without a value
    pub fn default_quick_option(&self) -> Option<&QuickOption> {
        self.default_quick_option_id
            .as_deref()
            .and_then(|id| self.quick_option(id))
    }
}

/// Everything the date reducer needs besides state and action
///
/// `today` is the reference date every relative configuration is resolved
/// against; the reducer never reads the system clock.
#[derive(Debug, Clone, PartialEq)]
pub struct DateContext {
    settings: DatePickerSettings,
    today: NaiveDate,
}

impl DateContext {
    /// Create a context from validated settings
    pub fn new(settings: DatePickerSettings, today: NaiveDate) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self { settings, today })
    }

    pub fn settings(&self) -> &DatePickerSettings {
        &self.settings
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }
}
