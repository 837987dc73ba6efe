//! Date configuration model

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Granularity of a `THIS`/`LAST` configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateUnit {
    Day,
    Week,
    Month,
    Quarter,
    Year,
    /// Quarter aligned to the fiscal start month
    FiscalQuarter,
    /// Year aligned to the fiscal start month
    FiscalYear,
}

impl DateUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateUnit::Day => "DAY",
            DateUnit::Week => "WEEK",
            DateUnit::Month => "MONTH",
            DateUnit::Quarter => "QUARTER",
            DateUnit::Year => "YEAR",
            DateUnit::FiscalQuarter => "FISCAL_QUARTER",
            DateUnit::FiscalYear => "FISCAL_YEAR",
        }
    }

    fn noun(&self, plural: bool) -> &'static str {
        match (self, plural) {
            (DateUnit::Day, false) => "day",
            (DateUnit::Day, true) => "days",
            (DateUnit::Week, false) => "week",
            (DateUnit::Week, true) => "weeks",
            (DateUnit::Month, false) => "month",
            (DateUnit::Month, true) => "months",
            (DateUnit::Quarter, false) => "quarter",
            (DateUnit::Quarter, true) => "quarters",
            (DateUnit::Year, false) => "year",
            (DateUnit::Year, true) => "years",
            (DateUnit::FiscalQuarter, false) => "fiscal quarter",
            (DateUnit::FiscalQuarter, true) => "fiscal quarters",
            (DateUnit::FiscalYear, false) => "fiscal year",
            (DateUnit::FiscalYear, true) => "fiscal years",
        }
    }
}

impl fmt::Display for DateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar the picker displays dates in
///
/// Ranges are always computed on ISO dates; the calendar type only travels
/// with the configuration so the picker can render it back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalendarType {
    #[default]
    Gregorian,
    Ethiopian,
}

impl fmt::Display for CalendarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarType::Gregorian => f.write_str("GREGORIAN"),
            CalendarType::Ethiopian => f.write_str("ETHIOPIAN"),
        }
    }
}

/// Discriminant of a [`DateConfiguration`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateModifier {
    This,
    Last,
    Between,
    Since,
    AllTime,
    YearToDate,
}

impl fmt::Display for DateModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateModifier::This => "THIS",
            DateModifier::Last => "LAST",
            DateModifier::Between => "BETWEEN",
            DateModifier::Since => "SINCE",
            DateModifier::AllTime => "ALL_TIME",
            DateModifier::YearToDate => "YEAR_TO_DATE",
        };
        f.write_str(name)
    }
}

/// A user-entered range; either bound may still be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Both bounds, if present
    pub fn bounds(&self) -> Option<DateBounds> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some(DateBounds { from, to }),
            _ => None,
        }
    }
}

/// A concrete inclusive range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl From<DateBounds> for DateRange {
    fn from(bounds: DateBounds) -> Self {
        DateRange::new(bounds.from, bounds.to)
    }
}

/// A date filter configuration, discriminated by its modifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "modifier",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum DateConfiguration {
    /// The current period of a granularity
    This { date_unit: DateUnit },

    /// The trailing `num_intervals` periods
    Last {
        date_unit: DateUnit,
        num_intervals: u32,
        include_current_interval: bool,
    },

    /// An explicit inclusive range
    Between {
        calendar_type: CalendarType,
        range: DateRange,
    },

    /// Everything from `date` onwards
    Since {
        calendar_type: CalendarType,
        date: Option<NaiveDate>,
    },

    /// The full span of available data
    AllTime { calendar_type: CalendarType },

    /// From the start of the year up to the reference date
    YearToDate {
        calendar_type: CalendarType,
        use_previous_year: bool,
        num_years_lookback: u32,
    },
}

impl DateConfiguration {
    pub fn modifier(&self) -> DateModifier {
        match self {
            DateConfiguration::This { .. } => DateModifier::This,
            DateConfiguration::Last { .. } => DateModifier::Last,
            DateConfiguration::Between { .. } => DateModifier::Between,
            DateConfiguration::Since { .. } => DateModifier::Since,
            DateConfiguration::AllTime { .. } => DateModifier::AllTime,
            DateConfiguration::YearToDate { .. } => DateModifier::YearToDate,
        }
    }

    /// Granularity, for the variants that have one
    pub fn date_unit(&self) -> Option<DateUnit> {
        match self {
            DateConfiguration::This { date_unit } | DateConfiguration::Last { date_unit, .. } => {
                Some(*date_unit)
            }
            _ => None,
        }
    }

    /// Calendar type, for the variants that have one
    pub fn calendar_type(&self) -> Option<CalendarType> {
        match self {
            DateConfiguration::Between { calendar_type, .. }
            | DateConfiguration::Since { calendar_type, .. }
            | DateConfiguration::AllTime { calendar_type }
            | DateConfiguration::YearToDate { calendar_type, .. } => Some(*calendar_type),
            DateConfiguration::This { .. } | DateConfiguration::Last { .. } => None,
        }
    }
}

impl fmt::Display for DateConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateConfiguration::This { date_unit } => write!(f, "This {}", date_unit.noun(false)),
            DateConfiguration::Last {
                date_unit,
                num_intervals,
                include_current_interval,
            } => {
                if *num_intervals == 1 {
                    write!(f, "Last {}", date_unit.noun(false))?;
                } else {
                    write!(f, "Last {} {}", num_intervals, date_unit.noun(true))?;
                }
                if *include_current_interval {
                    write!(f, " (including current {})", date_unit.noun(false))?;
                }
                Ok(())
            }
            DateConfiguration::Between { range, .. } => match (range.from, range.to) {
                (Some(from), Some(to)) => write!(f, "{} to {}", from, to),
                (Some(from), None) => write!(f, "{} to ...", from),
                (None, Some(to)) => write!(f, "... to {}", to),
                (None, None) => f.write_str("Custom range"),
            },
            DateConfiguration::Since { date, .. } => match date {
                Some(date) => write!(f, "Since {}", date),
                None => f.write_str("Since ..."),
            },
            DateConfiguration::AllTime { .. } => f.write_str("All time"),
            DateConfiguration::YearToDate {
                use_previous_year,
                num_years_lookback,
                ..
            } => {
                f.write_str(if *use_previous_year {
                    "Previous year to date"
                } else {
                    "Year to date"
                })?;
                if *num_years_lookback > 0 {
                    write!(f, " (+{} years back)", num_years_lookback)?;
                }
                Ok(())
            }
        }
    }
}
