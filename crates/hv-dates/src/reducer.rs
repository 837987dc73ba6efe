//! Date configuration reducer
//!
//! Every action either produces a new configuration, returns the state
//! unchanged when the action is redundant, or fails when the action does not
//! apply to the active modifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use hv_core::{ActionType, Reducer};

use crate::model::{CalendarType, DateConfiguration, DateModifier, DateRange, DateUnit};
use crate::quick_options::{quick_option_choice_for, QuickOptionChoice};
use crate::range::compute_date_range;
use crate::settings::{DateContext, DatePickerSettings};

/// Errors raised for transitions that cannot apply to the current state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateReducerError {
    #[error("cannot apply {action} while the date modifier is {modifier}")]
    InapplicableAction {
        action: &'static str,
        modifier: DateModifier,
    },

    #[error("the {0} modifier can only be selected through a quick option")]
    QuickOptionOnlyModifier(DateModifier),

    #[error("no date unit available: no THIS/LAST quick option and no enabled date unit")]
    NoDateUnitAvailable,

    #[error("no initial date configuration and no default quick option configured")]
    NoDefaultQuickOption,
}

/// State owned by an open date picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateConfigurationState {
    pub current_date_config: DateConfiguration,
}

impl DateConfigurationState {
    pub fn new(current_date_config: DateConfiguration) -> Self {
        Self { current_date_config }
    }

    /// State for a picker that is being opened
    ///
    /// Uses `initial` when supplied, otherwise the default quick option.
    pub fn initial(
        initial: Option<DateConfiguration>,
        settings: &DatePickerSettings,
    ) -> Result<Self, DateReducerError> {
        let config = match initial {
            Some(config) => config,
            None => settings
                .default_quick_option()
                .map(|option| option.config.clone())
                .ok_or(DateReducerError::NoDefaultQuickOption)?,
        };
        Ok(Self::new(config))
    }

    /// The quick option dropdown entry matching the current configuration
    pub fn quick_option_choice(&self, settings: &DatePickerSettings) -> QuickOptionChoice {
        quick_option_choice_for(&self.current_date_config, &settings.quick_options)
    }
}

/// Actions understood by the date reducer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum DateAction {
    QuickOptionChange {
        new_quick_option: QuickOptionChoice,
        current_quick_option: QuickOptionChoice,
    },
    DateTypeModifierChange {
        new_modifier: DateModifier,
    },
    DateUnitChange {
        new_date_unit: DateUnit,
    },
    DateNumIntervalsChange {
        num_intervals: u32,
    },
    IncludeCurrentIntervalChange {
        should_include: bool,
    },
    DateRangeChange {
        date_range: DateRange,
    },
    SinceDateChange {
        date: Option<NaiveDate>,
    },
    CalendarTypeChange {
        new_calendar_type: CalendarType,
    },
    YearToDateUsePreviousYearChange {
        use_previous_year: bool,
    },
    YearToDateYearsLookbackChange {
        num_years_lookback: u32,
    },
}

hv_core::impl_action_type!(DateAction {
    QuickOptionChange => "QUICK_OPTION_CHANGE",
    DateTypeModifierChange => "DATE_TYPE_MODIFIER_CHANGE",
    DateUnitChange => "DATE_UNIT_CHANGE",
    DateNumIntervalsChange => "DATE_NUM_INTERVALS_CHANGE",
    IncludeCurrentIntervalChange => "INCLUDE_CURRENT_INTERVAL_CHANGE",
    DateRangeChange => "DATE_RANGE_CHANGE",
    SinceDateChange => "SINCE_DATE_CHANGE",
    CalendarTypeChange => "CALENDAR_TYPE_CHANGE",
    YearToDateUsePreviousYearChange => "YEAR_TO_DATE_USE_PREVIOUS_YEAR_CHANGE",
    YearToDateYearsLookbackChange => "YEAR_TO_DATE_YEARS_LOOKBACK_CHANGE",
});

/// Date reducer bound to a context
#[derive(Debug, Clone)]
pub struct DateConfigurationReducer {
    context: DateContext,
}

impl DateConfigurationReducer {
    pub fn new(context: DateContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &DateContext {
        &self.context
    }
}

impl Reducer for DateConfigurationReducer {
    type State = DateConfigurationState;
    type Action = DateAction;
    type Error = DateReducerError;

    fn reduce(
        &self,
        state: &DateConfigurationState,
        action: DateAction,
    ) -> Result<DateConfigurationState, DateReducerError> {
        reduce(state, action, &self.context)
    }
}

/// Compute the next picker state
pub fn reduce(
    state: &DateConfigurationState,
    action: DateAction,
    ctx: &DateContext,
) -> Result<DateConfigurationState, DateReducerError> {
    let config = &state.current_date_config;
    let action_type = action.action_type();
    debug!(action = action_type, modifier = %config.modifier(), "Reducing date configuration");

    let inapplicable = || DateReducerError::InapplicableAction {
        action: action_type,
        modifier: config.modifier(),
    };

    let next = match action {
        DateAction::QuickOptionChange {
            new_quick_option,
            current_quick_option,
        } => match new_quick_option {
            QuickOptionChoice::Preset(option) => option.config,
            QuickOptionChoice::Custom if current_quick_option.is_custom() => {
                return Ok(state.clone())
            }
            QuickOptionChoice::Custom => DateConfiguration::Between {
                calendar_type: calendar_type_or_default(config, ctx),
                range: previous_range(config, ctx),
            },
        },

        DateAction::DateTypeModifierChange { new_modifier } => {
            if new_modifier == config.modifier() {
                return Ok(state.clone());
            }
            change_modifier(config, new_modifier, ctx)?
        }

        DateAction::DateUnitChange { new_date_unit } => {
            if config.date_unit() == Some(new_date_unit) {
                return Ok(state.clone());
            }
            match config {
                DateConfiguration::This { .. } => DateConfiguration::This {
                    date_unit: new_date_unit,
                },
                DateConfiguration::Last {
                    num_intervals,
                    include_current_interval,
                    ..
                } => DateConfiguration::Last {
                    date_unit: new_date_unit,
                    num_intervals: *num_intervals,
                    include_current_interval: *include_current_interval,
                },
                _ => return Err(inapplicable()),
            }
        }

        DateAction::DateNumIntervalsChange { num_intervals } => match config {
            DateConfiguration::Last {
                date_unit,
                include_current_interval,
                ..
            } => DateConfiguration::Last {
                date_unit: *date_unit,
                num_intervals,
                include_current_interval: *include_current_interval,
            },
            _ => return Err(inapplicable()),
        },

        DateAction::IncludeCurrentIntervalChange { should_include } => match config {
            DateConfiguration::Last {
                date_unit,
                num_intervals,
                ..
            } => DateConfiguration::Last {
                date_unit: *date_unit,
                num_intervals: *num_intervals,
                include_current_interval: should_include,
            },
            _ => return Err(inapplicable()),
        },

        DateAction::DateRangeChange { date_range } => match config {
            DateConfiguration::Between { calendar_type, .. }
            | DateConfiguration::AllTime { calendar_type }
            | DateConfiguration::YearToDate { calendar_type, .. } => DateConfiguration::Between {
                calendar_type: *calendar_type,
                range: date_range,
            },
            _ => return Err(inapplicable()),
        },

        DateAction::SinceDateChange { date } => match config {
            DateConfiguration::Since { calendar_type, .. } => DateConfiguration::Since {
                calendar_type: *calendar_type,
                date,
            },
            _ => return Err(inapplicable()),
        },

        DateAction::CalendarTypeChange { new_calendar_type } => {
            let mut next = config.clone();
            match &mut next {
                DateConfiguration::Since { calendar_type, .. }
                | DateConfiguration::Between { calendar_type, .. }
                | DateConfiguration::AllTime { calendar_type }
                | DateConfiguration::YearToDate { calendar_type, .. } => {
                    *calendar_type = new_calendar_type;
                }
                DateConfiguration::This { .. } | DateConfiguration::Last { .. } => {
                    return Err(inapplicable())
                }
            }
            next
        }

        DateAction::YearToDateUsePreviousYearChange { use_previous_year } => match config {
            DateConfiguration::YearToDate {
                calendar_type,
                num_years_lookback,
                ..
            } => DateConfiguration::YearToDate {
                calendar_type: *calendar_type,
                use_previous_year,
                num_years_lookback: *num_years_lookback,
            },
            _ => return Err(inapplicable()),
        },

        DateAction::YearToDateYearsLookbackChange { num_years_lookback } => match config {
            DateConfiguration::YearToDate {
                calendar_type,
                use_previous_year,
                ..
            } => DateConfiguration::YearToDate {
                calendar_type: *calendar_type,
                use_previous_year: *use_previous_year,
                num_years_lookback,
            },
            _ => return Err(inapplicable()),
        },
    };

    Ok(DateConfigurationState::new(next))
}

/// Build the configuration for `new_modifier`, seeded from `config`
fn change_modifier(
    config: &DateConfiguration,
    new_modifier: DateModifier,
    ctx: &DateContext,
) -> Result<DateConfiguration, DateReducerError> {
    let next = match new_modifier {
        DateModifier::This => DateConfiguration::This {
            date_unit: resolve_date_unit(config, ctx)?,
        },
        DateModifier::Last => DateConfiguration::Last {
            date_unit: resolve_date_unit(config, ctx)?,
            num_intervals: 1,
            include_current_interval: false,
        },
        DateModifier::Between => {
            let mut range = previous_range(config, ctx);
            if let DateConfiguration::Since { date, .. } = config {
                range.from = range.from.or(*date);
            }
            DateConfiguration::Between {
                calendar_type: calendar_type_or_default(config, ctx),
                range,
            }
        }
        DateModifier::Since => {
            let date = previous_range(config, ctx).from.or(match config {
                DateConfiguration::Between { range, .. } => range.from,
                _ => None,
            });
            DateConfiguration::Since {
                calendar_type: calendar_type_or_default(config, ctx),
                date,
            }
        }
        DateModifier::AllTime | DateModifier::YearToDate => {
            return Err(DateReducerError::QuickOptionOnlyModifier(new_modifier))
        }
    };
    Ok(next)
}

/// Best-effort range of the current configuration; empty when not computable
fn previous_range(config: &DateConfiguration, ctx: &DateContext) -> DateRange {
    match compute_date_range(config, ctx) {
        Ok(bounds) => bounds.into(),
        Err(err) => {
            debug!(error = %err, "Current configuration has no concrete range");
            DateRange::default()
        }
    }
}

fn calendar_type_or_default(config: &DateConfiguration, ctx: &DateContext) -> CalendarType {
    config
        .calendar_type()
        .unwrap_or(ctx.settings().default_calendar_type)
}

/// Unit for a new `THIS`/`LAST` configuration
///
/// Keeps the current unit if there is one, then tries the quick option
/// catalog (`THIS`/`LAST` entries whose unit is enabled), then the enabled
/// units. A quick option unit is only taken regardless of the enabled units
/// when none are enabled.
fn resolve_date_unit(
    config: &DateConfiguration,
    ctx: &DateContext,
) -> Result<DateUnit, DateReducerError> {
    let settings = ctx.settings();
    let mut quick_option_units = settings
        .quick_options
        .iter()
        .filter_map(|option| option.config.date_unit());

    config
        .date_unit()
        .or_else(|| {
            quick_option_units
                .clone()
                .find(|unit| settings.enabled_date_units.contains(unit))
        })
        .or_else(|| settings.enabled_date_units.first().copied())
        .or_else(|| quick_option_units.next())
        .ok_or(DateReducerError::NoDateUnitAvailable)
}
