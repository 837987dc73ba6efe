//! Quick options: named, one-click date configurations

use serde::{Deserialize, Serialize};

use crate::model::{CalendarType, DateConfiguration, DateUnit};

/// A predefined date configuration offered by the picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickOption {
    pub id: String,
    pub label: String,
    pub config: DateConfiguration,
}

impl QuickOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, config: DateConfiguration) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            config,
        }
    }
}

/// What the quick option dropdown currently shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuickOptionChoice {
    /// The user is editing the configuration by hand
    Custom,

    /// A catalog entry
    Preset(QuickOption),
}

impl QuickOptionChoice {
    pub fn is_custom(&self) -> bool {
        matches!(self, QuickOptionChoice::Custom)
    }
}

/// Find the catalog entry whose configuration equals `config`
pub fn find_matching_quick_option<'a>(
    config: &DateConfiguration,
    options: &'a [QuickOption],
) -> Option<&'a QuickOption> {
    options.iter().find(|option| option.config == *config)
}

/// The dropdown choice that represents `config`
pub fn quick_option_choice_for(
    config: &DateConfiguration,
    options: &[QuickOption],
) -> QuickOptionChoice {
    find_matching_quick_option(config, options)
        .cloned()
        .map(QuickOptionChoice::Preset)
        .unwrap_or(QuickOptionChoice::Custom)
}

/// The catalog shipped with default settings
pub fn default_quick_options() -> Vec<QuickOption> {
    let this = |date_unit| DateConfiguration::This { date_unit };
    let last = |date_unit, num_intervals| DateConfiguration::Last {
        date_unit,
        num_intervals,
        include_current_interval: false,
    };

    vec![
        QuickOption::new("this_week", "This week", this(DateUnit::Week)),
        QuickOption::new("this_month", "This month", this(DateUnit::Month)),
        QuickOption::new("this_quarter", "This quarter", this(DateUnit::Quarter)),
        QuickOption::new("this_year", "This year", this(DateUnit::Year)),
        QuickOption::new("last_week", "Last week", last(DateUnit::Week, 1)),
        QuickOption::new("last_month", "Last month", last(DateUnit::Month, 1)),
        QuickOption::new("last_quarter", "Last quarter", last(DateUnit::Quarter, 1)),
        QuickOption::new("last_6_months", "Last 6 months", last(DateUnit::Month, 6)),
        QuickOption::new("last_year", "Last year", last(DateUnit::Year, 1)),
        QuickOption::new(
            "year_to_date",
            "Year to date",
            DateConfiguration::YearToDate {
                calendar_type: CalendarType::Gregorian,
                use_previous_year: false,
                num_years_lookback: 0,
            },
        ),
        QuickOption::new(
            "all_time",
            "All time",
            DateConfiguration::AllTime {
                calendar_type: CalendarType::Gregorian,
            },
        ),
    ]
}
