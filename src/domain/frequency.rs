//! Standing order frequency descriptors.
//!
//! Descriptors follow the Open Banking encoding `Tag[:param[:param]]`, for
//! example `IntrvlWkDay:01:07` (every week, on Sunday) or `QtrDay:ENGLISH`.
//! The long tag names (`IntervalWeekDay:01:07`) are accepted as aliases.

use crate::error::{GatewayError, Result};
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrequencyType {
    EveryDay,
    EveryWorkingDay,
    IntervalWeekDay,
    WeekInMonthDay,
    IntervalMonthDay,
    QuarterDay,
    IntervalDay,
}

impl FrequencyType {
    pub const ALL: [FrequencyType; 7] = [
        FrequencyType::EveryDay,
        FrequencyType::EveryWorkingDay,
        FrequencyType::IntervalWeekDay,
        FrequencyType::WeekInMonthDay,
        FrequencyType::IntervalMonthDay,
        FrequencyType::QuarterDay,
        FrequencyType::IntervalDay,
    ];

    /// ISO 20022 code used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            FrequencyType::EveryDay => "EvryDay",
            FrequencyType::EveryWorkingDay => "EvryWorkgDay",
            FrequencyType::IntervalWeekDay => "IntrvlWkDay",
            FrequencyType::WeekInMonthDay => "WkInMnthDay",
            FrequencyType::IntervalMonthDay => "IntrvlMnthDay",
            FrequencyType::QuarterDay => "QtrDay",
            FrequencyType::IntervalDay => "IntrvlDay",
        }
    }

    pub fn long_name(&self) -> &'static str {
        match self {
            FrequencyType::EveryDay => "EveryDay",
            FrequencyType::EveryWorkingDay => "EveryWorkingDay",
            FrequencyType::IntervalWeekDay => "IntervalWeekDay",
            FrequencyType::WeekInMonthDay => "WeekInMonthDay",
            FrequencyType::IntervalMonthDay => "IntervalMonthDay",
            FrequencyType::QuarterDay => "QuarterDay",
            FrequencyType::IntervalDay => "IntervalDay",
        }
    }

    /// Pattern the parameter suffix must match in full. `None` for types
    /// that take no parameters.
    pub fn pattern(&self) -> Option<&'static str> {
        match self {
            FrequencyType::EveryDay | FrequencyType::EveryWorkingDay => None,
            FrequencyType::IntervalWeekDay => Some("0?([1-9]):0?([1-7])$"),
            FrequencyType::WeekInMonthDay => Some("0?([1-5]):0?([1-7])$"),
            FrequencyType::IntervalMonthDay => {
                Some("(0?[1-6]|12|24):(-0?[1-5]|0?[1-9]|[12][0-9]|3[01])$")
            }
            FrequencyType::QuarterDay => Some("(ENGLISH|SCOTTISH|RECEIVED)$"),
            FrequencyType::IntervalDay => Some("(0?[2-9]|[1-2][0-9]|3[0-1])$"),
        }
    }

    fn regex(&self) -> Option<&'static Regex> {
        match self {
            FrequencyType::EveryDay | FrequencyType::EveryWorkingDay => None,
            FrequencyType::IntervalWeekDay => Some(&*INTERVAL_WEEK_DAY),
            FrequencyType::WeekInMonthDay => Some(&*WEEK_IN_MONTH_DAY),
            FrequencyType::IntervalMonthDay => Some(&*INTERVAL_MONTH_DAY),
            FrequencyType::QuarterDay => Some(&*QUARTER_DAY),
            FrequencyType::IntervalDay => Some(&*INTERVAL_DAY),
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == tag || t.long_name() == tag)
    }
}

fn anchored(frequency_type: FrequencyType) -> Regex {
    let pattern = frequency_type.pattern().unwrap_or("$");
    Regex::new(&format!("^(?:{pattern})")).expect("frequency pattern is valid")
}

static INTERVAL_WEEK_DAY: LazyLock<Regex> = LazyLock::new(|| anchored(FrequencyType::IntervalWeekDay));
static WEEK_IN_MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| anchored(FrequencyType::WeekInMonthDay));
static INTERVAL_MONTH_DAY: LazyLock<Regex> =
    LazyLock::new(|| anchored(FrequencyType::IntervalMonthDay));
static QUARTER_DAY: LazyLock<Regex> = LazyLock::new(|| anchored(FrequencyType::QuarterDay));
static INTERVAL_DAY: LazyLock<Regex> = LazyLock::new(|| anchored(FrequencyType::IntervalDay));

/// Regional quarter-day calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuarterDayVariant {
    English,
    Scottish,
    Received,
}

impl QuarterDayVariant {
    /// (month, day) pairs in calendar order.
    pub fn dates(&self) -> [(u32, u32); 4] {
        match self {
            QuarterDayVariant::English => [(3, 25), (6, 24), (9, 29), (12, 25)],
            QuarterDayVariant::Scottish => [(2, 2), (5, 15), (8, 1), (11, 11)],
            QuarterDayVariant::Received => [(3, 20), (6, 19), (9, 24), (12, 20)],
        }
    }

    fn code(&self) -> &'static str {
        match self {
            QuarterDayVariant::English => "ENGLISH",
            QuarterDayVariant::Scottish => "SCOTTISH",
            QuarterDayVariant::Received => "RECEIVED",
        }
    }
}

/// A parsed frequency descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    EveryDay,
    EveryWorkingDay,
    IntervalWeekDay { weeks: u32, weekday: Weekday },
    /// Day of month is `week * 7 + weekday`, taken literally.
    WeekInMonthDay { week: u32, weekday: u32 },
    /// Negative `day` counts back from the end of the month, -1 being the last day.
    IntervalMonthDay { months: u32, day: i32 },
    QuarterDay(QuarterDayVariant),
    IntervalDay { days: u32 },
}

impl Frequency {
    pub fn frequency_type(&self) -> FrequencyType {
        match self {
            Frequency::EveryDay => FrequencyType::EveryDay,
            Frequency::EveryWorkingDay => FrequencyType::EveryWorkingDay,
            Frequency::IntervalWeekDay { .. } => FrequencyType::IntervalWeekDay,
            Frequency::WeekInMonthDay { .. } => FrequencyType::WeekInMonthDay,
            Frequency::IntervalMonthDay { .. } => FrequencyType::IntervalMonthDay,
            Frequency::QuarterDay(_) => FrequencyType::QuarterDay,
            Frequency::IntervalDay { .. } => FrequencyType::IntervalDay,
        }
    }

    /// Computes the first occurrence strictly after `date`.
    pub fn next_after(&self, date: NaiveDate) -> Result<NaiveDate> {
        let next = match *self {
            Frequency::EveryDay => date.checked_add_days(Days::new(1)),
            Frequency::EveryWorkingDay => {
                date.checked_add_days(Days::new(1)).and_then(|next| match next.weekday() {
                    Weekday::Sat => next.checked_add_days(Days::new(2)),
                    Weekday::Sun => next.checked_add_days(Days::new(1)),
                    _ => Some(next),
                })
            }
            Frequency::IntervalWeekDay { weeks, weekday } => {
                let offset = i64::from(weekday.num_days_from_monday())
                    - i64::from(date.weekday().num_days_from_monday());
                date.checked_add_days(Days::new(u64::from(weeks) * 7))
                    .and_then(|shifted| shift_days(shifted, offset))
            }
            Frequency::WeekInMonthDay { week, weekday } => {
                let day = week * 7 + weekday;
                let month = first_of_month(date)
                    .and_then(|first| first.checked_add_months(Months::new(1)))
                    .ok_or_else(|| self.overflow(date))?;
                return month.with_day(day).ok_or_else(|| {
                    GatewayError::FrequencyDateOutOfRange {
                        input: self.to_string(),
                        year: month.year(),
                        month: month.month(),
                        day,
                    }
                });
            }
            Frequency::IntervalMonthDay { months, day } => first_of_month(date)
                .and_then(|first| first.checked_add_months(Months::new(months)))
                .and_then(|month| {
                    let last = last_day_of_month(month);
                    let target = if day < 0 {
                        (last as i32 + day + 1).max(1) as u32
                    } else {
                        (day as u32).min(last)
                    };
                    month.with_day(target)
                }),
            Frequency::QuarterDay(variant) => next_quarter_day(variant, date),
            Frequency::IntervalDay { days } => date.checked_add_days(Days::new(u64::from(days))),
        };
        next.ok_or_else(|| self.overflow(date))
    }

    /// The next `count` occurrences after `from`, each derived from the previous one.
    pub fn schedule(&self, from: NaiveDate, count: usize) -> Result<Vec<NaiveDate>> {
        let mut dates = Vec::with_capacity(count);
        let mut current = from;
        for _ in 0..count {
            current = self.next_after(current)?;
            dates.push(current);
        }
        Ok(dates)
    }

    fn overflow(&self, date: NaiveDate) -> GatewayError {
        GatewayError::ValidationError(format!(
            "Frequency '{}' overflows the supported date range from {}",
            self, date
        ))
    }
}

/// Parses `descriptor` and computes its next occurrence after `reference`.
pub fn next_occurrence(descriptor: &str, reference: NaiveDate) -> Result<NaiveDate> {
    descriptor.parse::<Frequency>()?.next_after(reference)
}

fn shift_days(date: NaiveDate, offset: i64) -> Option<NaiveDate> {
    if offset >= 0 {
        date.checked_add_days(Days::new(offset as u64))
    } else {
        date.checked_sub_days(Days::new(offset.unsigned_abs()))
    }
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

fn last_day_of_month(first: NaiveDate) -> u32 {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

fn next_quarter_day(variant: QuarterDayVariant, date: NaiveDate) -> Option<NaiveDate> {
    [date.year(), date.year() + 1]
        .into_iter()
        .flat_map(|year| {
            variant
                .dates()
                .into_iter()
                .filter_map(move |(month, day)| NaiveDate::from_ymd_opt(year, month, day))
        })
        .find(|candidate| *candidate > date)
}

fn invalid_format(input: &str, frequency_type: FrequencyType) -> GatewayError {
    GatewayError::InvalidFrequencyFormat {
        input: input.to_string(),
        pattern: frequency_type.pattern().unwrap_or("$").to_string(),
    }
}

fn capture<T: FromStr>(captures: &regex::Captures<'_>, index: usize) -> Option<T> {
    captures.get(index).and_then(|m| m.as_str().parse().ok())
}

impl FromStr for Frequency {
    type Err = GatewayError;

    fn from_str(input: &str) -> Result<Self> {
        let (tag, params) = match input.split_once(':') {
            Some((tag, params)) => (tag, Some(params)),
            None => (input, None),
        };
        let frequency_type = FrequencyType::from_tag(tag)
            .ok_or_else(|| GatewayError::UnknownFrequencyType(tag.to_string()))?;

        let Some(regex) = frequency_type.regex() else {
            return match (params, frequency_type) {
                (None, FrequencyType::EveryDay) => Ok(Frequency::EveryDay),
                (None, _) => Ok(Frequency::EveryWorkingDay),
                (Some(_), _) => Err(invalid_format(input, frequency_type)),
            };
        };

        let captures = params
            .and_then(|params| regex.captures(params))
            .ok_or_else(|| invalid_format(input, frequency_type))?;
        let invalid = || invalid_format(input, frequency_type);

        let frequency = match frequency_type {
            FrequencyType::IntervalWeekDay => {
                let weeks: u32 = capture(&captures, 1).ok_or_else(invalid)?;
                let iso_day: u8 = capture(&captures, 2).ok_or_else(invalid)?;
                let weekday = Weekday::try_from(iso_day - 1).map_err(|_| invalid())?;
                Frequency::IntervalWeekDay { weeks, weekday }
            }
            FrequencyType::WeekInMonthDay => Frequency::WeekInMonthDay {
                week: capture(&captures, 1).ok_or_else(invalid)?,
                weekday: capture(&captures, 2).ok_or_else(invalid)?,
            },
            FrequencyType::IntervalMonthDay => Frequency::IntervalMonthDay {
                months: capture(&captures, 1).ok_or_else(invalid)?,
                day: capture(&captures, 2).ok_or_else(invalid)?,
            },
            FrequencyType::QuarterDay => {
                let variant = match captures.get(1).map(|m| m.as_str()) {
                    Some("ENGLISH") => QuarterDayVariant::English,
                    Some("SCOTTISH") => QuarterDayVariant::Scottish,
                    Some("RECEIVED") => QuarterDayVariant::Received,
                    _ => return Err(invalid()),
                };
                Frequency::QuarterDay(variant)
            }
            FrequencyType::IntervalDay => Frequency::IntervalDay {
                days: capture(&captures, 1).ok_or_else(invalid)?,
            },
            FrequencyType::EveryDay | FrequencyType::EveryWorkingDay => return Err(invalid()),
        };
        Ok(frequency)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.frequency_type().code();
        match self {
            Frequency::EveryDay | Frequency::EveryWorkingDay => f.write_str(code),
            Frequency::IntervalWeekDay { weeks, weekday } => {
                write!(f, "{code}:{weeks:02}:{:02}", weekday.number_from_monday())
            }
            Frequency::WeekInMonthDay { week, weekday } => {
                write!(f, "{code}:{week:02}:{weekday:02}")
            }
            Frequency::IntervalMonthDay { months, day } => {
                write!(f, "{code}:{months:02}:{day:02}")
            }
            Frequency::QuarterDay(variant) => write!(f, "{code}:{}", variant.code()),
            Frequency::IntervalDay { days } => write!(f, "{code}:{days:02}"),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = GatewayError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        frequency.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Saturday 6th Feb 2021
    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 2, 6).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_every_day() {
        assert_eq!(next_occurrence("EvryDay", saturday()).unwrap(), date(2021, 2, 7));
        assert_eq!(next_occurrence("EveryDay", saturday()).unwrap(), date(2021, 2, 7));
    }

    #[test]
    fn test_every_day_with_suffix_is_unknown() {
        let err = next_occurrence("EvryDayx", saturday()).unwrap_err();
        assert_eq!(err.to_string(), "Frequency type value not found: EvryDayx");
    }

    #[test]
    fn test_every_day_rejects_parameters() {
        assert!(matches!(
            next_occurrence("EvryDay:01", saturday()),
            Err(GatewayError::InvalidFrequencyFormat { .. })
        ));
    }

    #[test]
    fn test_every_working_day_skips_weekend() {
        assert_eq!(
            next_occurrence("EvryWorkgDay", saturday()).unwrap(),
            date(2021, 2, 8)
        );
        // Friday -> Monday
        assert_eq!(
            next_occurrence("EvryWorkgDay", date(2021, 2, 5)).unwrap(),
            date(2021, 2, 8)
        );
        // Tuesday -> Wednesday
        assert_eq!(
            next_occurrence("EvryWorkgDay", date(2021, 2, 9)).unwrap(),
            date(2021, 2, 10)
        );
    }

    #[test]
    fn test_interval_week_day() {
        assert_eq!(
            next_occurrence("IntrvlWkDay:01:07", saturday()).unwrap(),
            date(2021, 2, 14)
        );
        // two weeks on, Monday
        assert_eq!(
            next_occurrence("IntrvlWkDay:2:1", saturday()).unwrap(),
            date(2021, 2, 15)
        );
    }

    #[test]
    fn test_interval_week_day_rejects_zero_weeks() {
        let err = next_occurrence("IntrvlWkDay:00:07", saturday()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Frequency 'IntrvlWkDay:00:07' doesn't match regex '0?([1-9]):0?([1-7])$'"
        );
    }

    #[test]
    fn test_week_in_month_day_literal_arithmetic() {
        assert_eq!(
            next_occurrence("WkInMnthDay:02:03", saturday()).unwrap(),
            date(2021, 3, 17)
        );
    }

    #[test]
    fn test_week_in_month_day_beyond_month_end() {
        assert!(matches!(
            next_occurrence("WkInMnthDay:05:07", saturday()),
            Err(GatewayError::FrequencyDateOutOfRange { day: 42, month: 3, .. })
        ));
    }

    #[test]
    fn test_week_in_month_day_rejects_week_zero() {
        assert!(matches!(
            next_occurrence("WkInMnthDay:00:03", saturday()),
            Err(GatewayError::InvalidFrequencyFormat { .. })
        ));
    }

    #[test]
    fn test_interval_month_day() {
        assert_eq!(
            next_occurrence("IntrvlMnthDay:01:30", saturday()).unwrap(),
            date(2021, 3, 30)
        );
        assert_eq!(
            next_occurrence("IntrvlMnthDay:12:01", saturday()).unwrap(),
            date(2022, 2, 1)
        );
    }

    #[test]
    fn test_interval_month_day_negative_counts_from_month_end() {
        assert_eq!(
            next_occurrence("IntrvlMnthDay:01:-01", date(2021, 1, 15)).unwrap(),
            date(2021, 2, 28)
        );
        assert_eq!(
            next_occurrence("IntrvlMnthDay:01:-5", date(2021, 1, 15)).unwrap(),
            date(2021, 2, 24)
        );
    }

    #[test]
    fn test_interval_month_day_clamps_to_short_month() {
        assert_eq!(
            next_occurrence("IntrvlMnthDay:01:31", date(2021, 1, 31)).unwrap(),
            date(2021, 2, 28)
        );
    }

    #[test]
    fn test_interval_month_day_rejects_out_of_range_negative() {
        let err = next_occurrence("IntrvlMnthDay:01:-8", saturday()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Frequency 'IntrvlMnthDay:01:-8' doesn't match regex '(0?[1-6]|12|24):(-0?[1-5]|0?[1-9]|[12][0-9]|3[01])$'"
        );
    }

    #[test]
    fn test_quarter_day() {
        assert_eq!(
            next_occurrence("QtrDay:ENGLISH", saturday()).unwrap(),
            date(2021, 3, 25)
        );
        assert_eq!(
            next_occurrence("QtrDay:SCOTTISH", saturday()).unwrap(),
            date(2021, 5, 15)
        );
        assert_eq!(
            next_occurrence("QtrDay:RECEIVED", date(2021, 12, 20)).unwrap(),
            date(2022, 3, 20)
        );
    }

    #[test]
    fn test_quarter_day_is_strictly_after_reference() {
        assert_eq!(
            next_occurrence("QtrDay:ENGLISH", date(2021, 3, 25)).unwrap(),
            date(2021, 6, 24)
        );
    }

    #[test]
    fn test_quarter_day_rejects_unknown_variant() {
        assert!(matches!(
            next_occurrence("QtrDay:SENT", saturday()),
            Err(GatewayError::InvalidFrequencyFormat { .. })
        ));
    }

    #[test]
    fn test_interval_day() {
        assert_eq!(
            next_occurrence("IntrvlDay:02", saturday()).unwrap(),
            date(2021, 2, 8)
        );
        assert_eq!(
            next_occurrence("IntrvlDay:31", saturday()).unwrap(),
            date(2021, 3, 9)
        );
    }

    #[test]
    fn test_interval_day_rejects_one() {
        let err = next_occurrence("IntrvlDay:1", saturday()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Frequency 'IntrvlDay:1' doesn't match regex '(0?[2-9]|[1-2][0-9]|3[0-1])$'"
        );
        assert!(matches!(
            next_occurrence("IntrvlDay:32", saturday()),
            Err(GatewayError::InvalidFrequencyFormat { .. })
        ));
    }

    #[test]
    fn test_missing_parameters() {
        assert!(matches!(
            next_occurrence("IntrvlDay", saturday()),
            Err(GatewayError::InvalidFrequencyFormat { .. })
        ));
    }

    #[test]
    fn test_display_uses_canonical_codes() {
        let frequency: Frequency = "IntervalWeekDay:1:7".parse().unwrap();
        assert_eq!(frequency.to_string(), "IntrvlWkDay:01:07");
        let frequency: Frequency = "IntrvlMnthDay:01:-1".parse().unwrap();
        assert_eq!(frequency.to_string(), "IntrvlMnthDay:01:-1");
    }

    #[test]
    fn test_schedule_chains_occurrences() {
        let frequency: Frequency = "IntrvlDay:10".parse().unwrap();
        let dates = frequency.schedule(saturday(), 3).unwrap();
        assert_eq!(dates, vec![date(2021, 2, 16), date(2021, 2, 26), date(2021, 3, 8)]);
    }

    #[test]
    fn test_serde_as_string() {
        let frequency: Frequency = serde_json::from_str("\"QtrDay:ENGLISH\"").unwrap();
        assert_eq!(frequency, Frequency::QuarterDay(QuarterDayVariant::English));
        assert_eq!(serde_json::to_string(&frequency).unwrap(), "\"QtrDay:ENGLISH\"");
        assert!(serde_json::from_str::<Frequency>("\"Weekly\"").is_err());
    }
}
