use chrono::{Datelike, Months, NaiveDate};

use crate::errors::{Result, SimulationError};

/// calendar-month difference between two dates, day of month ignored
///
/// negative when `end` falls in an earlier month than `start`
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
}

/// add whole months, clamping to the last day of shorter months (jan 31 + 1 = feb 28/29)
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// due date of the last installment, the first one falls on the start date itself
pub fn final_installment_date(start: NaiveDate, total_installments: u32) -> Option<NaiveDate> {
    add_months(start, total_installments.saturating_sub(1))
}

/// parse a YYYY-MM-DD date as entered in the simulation form
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| SimulationError::InvalidDate {
        value: value.to_string(),
    })
}
