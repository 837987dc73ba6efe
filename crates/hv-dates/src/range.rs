//! Conversion of date configurations into concrete ranges

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use thiserror::Error;

use crate::model::{DateBounds, DateConfiguration, DateUnit};
use crate::settings::DateContext;

/// Reasons a configuration cannot be turned into a concrete range
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("range is missing its {0} date")]
    MissingBound(&'static str),

    #[error("range starts after it ends ({from} > {to})")]
    Inverted { from: NaiveDate, to: NaiveDate },

    #[error("SINCE configuration has no start date")]
    MissingSinceDate,

    #[error("LAST configuration must cover at least one interval")]
    ZeroIntervals,

    #[error("computed date falls outside the supported calendar")]
    OutOfRange,
}

/// Compute the inclusive range a configuration selects, as of `ctx.today()`
pub fn compute_date_range(
    config: &DateConfiguration,
    ctx: &DateContext,
) -> Result<DateBounds, DateRangeError> {
    let settings = ctx.settings();
    let bounds = match config {
        DateConfiguration::This { date_unit } => interval_containing(ctx.today(), *date_unit, ctx)?,
        DateConfiguration::Last {
            date_unit,
            num_intervals,
            include_current_interval,
        } => {
            if *num_intervals == 0 {
                return Err(DateRangeError::ZeroIntervals);
            }
            let current = interval_containing(ctx.today(), *date_unit, ctx)?;
            let from = shift_back(current.from, *date_unit, *num_intervals)?;
            let to = if *include_current_interval {
                current.to
            } else {
                current.from.pred_opt().ok_or(DateRangeError::OutOfRange)?
            };
            DateBounds { from, to }
        }
        DateConfiguration::Between { range, .. } => DateBounds {
            from: range.from.ok_or(DateRangeError::MissingBound("start"))?,
            to: range.to.ok_or(DateRangeError::MissingBound("end"))?,
        },
        DateConfiguration::Since { date, .. } => DateBounds {
            from: date.ok_or(DateRangeError::MissingSinceDate)?,
            to: settings.max_date,
        },
        DateConfiguration::AllTime { .. } => DateBounds {
            from: settings.min_date,
            to: settings.max_date,
        },
        DateConfiguration::YearToDate {
            use_previous_year,
            num_years_lookback,
            ..
        } => year_to_date(ctx.today(), *use_previous_year, *num_years_lookback)?,
    };

    if bounds.from > bounds.to {
        return Err(DateRangeError::Inverted {
            from: bounds.from,
            to: bounds.to,
        });
    }
    Ok(bounds)
}

/// The interval of `unit` that contains `date`
pub fn interval_containing(
    date: NaiveDate,
    unit: DateUnit,
    ctx: &DateContext,
) -> Result<DateBounds, DateRangeError> {
    match unit {
        DateUnit::Day => Ok(DateBounds { from: date, to: date }),
        DateUnit::Week => {
            let offset = days_since_week_start(date, ctx.settings().week_start);
            let from = date
                .checked_sub_days(Days::new(offset))
                .ok_or(DateRangeError::OutOfRange)?;
            let to = from
                .checked_add_days(Days::new(6))
                .ok_or(DateRangeError::OutOfRange)?;
            Ok(DateBounds { from, to })
        }
        DateUnit::Month | DateUnit::Quarter | DateUnit::Year => {
            month_aligned_interval(date, month_span(unit), 1)
        }
        DateUnit::FiscalQuarter | DateUnit::FiscalYear => {
            month_aligned_interval(date, month_span(unit), ctx.settings().fiscal_start_month)
        }
    }
}

fn days_since_week_start(date: NaiveDate, week_start: Weekday) -> u64 {
    let day = date.weekday().num_days_from_monday();
    let start = week_start.num_days_from_monday();
    u64::from((day + 7 - start) % 7)
}

fn month_span(unit: DateUnit) -> u32 {
    match unit {
        DateUnit::Quarter | DateUnit::FiscalQuarter => 3,
        DateUnit::Year | DateUnit::FiscalYear => 12,
        DateUnit::Day | DateUnit::Week | DateUnit::Month => 1,
    }
}

/// Interval of `span` months whose boundaries fall on `align_month` (1-12)
fn month_aligned_interval(
    date: NaiveDate,
    span: u32,
    align_month: u32,
) -> Result<DateBounds, DateRangeError> {
    let month_index = date.year() * 12 + date.month0() as i32;
    let offset = (month_index - (align_month as i32 - 1)).rem_euclid(span as i32);
    let start_index = month_index - offset;

    let from = NaiveDate::from_ymd_opt(
        start_index.div_euclid(12),
        start_index.rem_euclid(12) as u32 + 1,
        1,
    )
    .ok_or(DateRangeError::OutOfRange)?;
    let to = from
        .checked_add_months(Months::new(span))
        .and_then(|next| next.pred_opt())
        .ok_or(DateRangeError::OutOfRange)?;
    Ok(DateBounds { from, to })
}

/// Move an interval start back by `count` intervals
fn shift_back(start: NaiveDate, unit: DateUnit, count: u32) -> Result<NaiveDate, DateRangeError> {
    let shifted = match unit {
        DateUnit::Day => start.checked_sub_days(Days::new(u64::from(count))),
        DateUnit::Week => start.checked_sub_days(Days::new(7 * u64::from(count))),
        _ => month_span(unit)
            .checked_mul(count)
            .and_then(|months| start.checked_sub_months(Months::new(months))),
    };
    shifted.ok_or(DateRangeError::OutOfRange)
}

fn year_to_date(
    today: NaiveDate,
    use_previous_year: bool,
    num_years_lookback: u32,
) -> Result<DateBounds, DateRangeError> {
    let anchor = if use_previous_year {
        // Feb 29 has no counterpart in the previous year
        today
            .with_year(today.year() - 1)
            .or_else(|| NaiveDate::from_ymd_opt(today.year() - 1, 2, 28))
            .ok_or(DateRangeError::OutOfRange)?
    } else {
        today
    };

    let start_year = i32::try_from(num_years_lookback)
        .ok()
        .and_then(|lookback| anchor.year().checked_sub(lookback))
        .ok_or(DateRangeError::OutOfRange)?;
    let from = NaiveDate::from_ymd_opt(start_year, 1, 1).ok_or(DateRangeError::OutOfRange)?;
    Ok(DateBounds { from, to: anchor })
}
