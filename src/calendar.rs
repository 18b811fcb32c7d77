use crate::model::Period;
use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// One period date tagged with its weekday identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Day {
    pub date: NaiveDate,
    /// 0=Monday..6=Sunday.
    pub weekday: u8,
}

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            weekday: date.weekday().num_days_from_monday() as u8,
        }
    }

    pub fn is_saturday(&self) -> bool {
        self.weekday == 5
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid calendar month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("period contains no dates")]
    EmptyPeriod,
}

/// Expand a period into its ordered day sequence. Invalid periods are a
/// configuration error, never recovered.
pub fn expand(period: &Period) -> Result<Vec<Day>, CalendarError> {
    match period {
        Period::Month { year, month } => {
            let first = NaiveDate::from_ymd_opt(*year, *month, 1).ok_or(
                CalendarError::InvalidMonth {
                    year: *year,
                    month: *month,
                },
            )?;
            Ok(first
                .iter_days()
                .take_while(|d| d.month() == *month)
                .map(Day::new)
                .collect())
        }
        Period::Dates { dates } => {
            if dates.is_empty() {
                return Err(CalendarError::EmptyPeriod);
            }
            Ok(dates.iter().copied().map(Day::new).collect())
        }
    }
}
