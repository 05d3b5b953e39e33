// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar "today" in the institution's timezone.
//!
//! Event dates are wall-clock calendar dates, so deciding whether an event
//! is upcoming depends on the timezone the calendar is kept in, not UTC.

use crate::error::DomainError;
use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use time::{Date, Month};

/// Resolves an IANA timezone name.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` if the name is unknown.
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse::<Tz>()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

/// Returns the calendar date of `now` in `tz`.
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` if the date cannot be represented.
pub fn calendar_date_in(tz: Tz, now: DateTime<Utc>) -> Result<Date, DomainError> {
    let local = now.with_timezone(&tz);

    let month: Month = u8::try_from(local.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| DomainError::InvalidDate {
            value: local.to_rfc3339(),
            reason: String::from("month out of range"),
        })?;
    let day: u8 = u8::try_from(local.day()).map_err(|_| DomainError::InvalidDate {
        value: local.to_rfc3339(),
        reason: String::from("day out of range"),
    })?;

    Date::from_calendar_date(local.year(), month, day).map_err(|e| DomainError::InvalidDate {
        value: local.to_rfc3339(),
        reason: e.to_string(),
    })
}

/// Returns today's calendar date in `tz`.
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` if the date cannot be represented.
pub fn today_in(tz: Tz) -> Result<Date, DomainError> {
    calendar_date_in(tz, Utc::now())
}
