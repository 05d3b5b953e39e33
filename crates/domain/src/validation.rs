// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Time};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT_SHORT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");
const TIME_FORMAT_LONG: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");

const MAX_TITLE_LEN: usize = 255;
const MAX_SECTION_CODE_LEN: usize = 32;

/// Parses a calendar date in strict `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` if the shape is wrong or the date does not exist.
pub fn parse_event_date(value: &str) -> Result<Date, DomainError> {
    let bytes: &[u8] = value.as_bytes();
    let shape_ok: bool = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(DomainError::InvalidDate {
            value: value.to_string(),
            reason: String::from("expected YYYY-MM-DD"),
        });
    }

    Date::parse(value, DATE_FORMAT).map_err(|e| DomainError::InvalidDate {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_event_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Parses a time of day in `HH:MM` or `HH:MM:SS` form.
///
/// # Errors
///
/// Returns `DomainError::InvalidTime` if neither form matches.
pub fn parse_event_time(value: &str) -> Result<Time, DomainError> {
    Time::parse(value, TIME_FORMAT_SHORT)
        .or_else(|_| Time::parse(value, TIME_FORMAT_LONG))
        .map_err(|_| DomainError::InvalidTime(value.to_string()))
}

/// Formats a time of day as `HH:MM:SS`.
#[must_use]
pub fn format_event_time(time: Time) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}

/// Trims and validates an event title.
///
/// # Errors
///
/// Returns `DomainError::EmptyTitle` if nothing remains after trimming,
/// or `DomainError::TitleTooLong` if the title is too long.
pub fn normalize_title(title: &str) -> Result<String, DomainError> {
    let trimmed: &str = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyTitle);
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::TitleTooLong { max: MAX_TITLE_LEN });
    }
    Ok(trimmed.to_string())
}

/// Validates a `#RRGGBB` color.
///
/// # Errors
///
/// Returns `DomainError::InvalidColor` if the value is not a six-digit hex color.
pub fn validate_color(color: &str) -> Result<String, DomainError> {
    let valid: bool = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(color.to_string())
    } else {
        Err(DomainError::InvalidColor(color.to_string()))
    }
}

/// Trims and validates a section join code.
///
/// # Errors
///
/// Returns `DomainError::InvalidSectionCode` if the code is empty, too long,
/// or contains characters other than ASCII letters, digits, `-` and `_`.
pub fn normalize_section_code(code: &str) -> Result<String, DomainError> {
    let trimmed: &str = code.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidSectionCode(String::from(
            "Code cannot be empty",
        )));
    }
    if trimmed.len() > MAX_SECTION_CODE_LEN {
        return Err(DomainError::InvalidSectionCode(format!(
            "Code cannot exceed {MAX_SECTION_CODE_LEN} characters"
        )));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DomainError::InvalidSectionCode(format!(
            "Code '{trimmed}' may only contain letters, digits, '-' and '_'"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims and validates a display name for a user or section.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is empty after trimming.
pub fn normalize_name(name: &str) -> Result<String, DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims, lowercases and minimally validates an email address.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` unless the address has a non-empty
/// local part and a dotted domain.
pub fn normalize_email(email: &str) -> Result<String, DomainError> {
    let normalized: String = email.trim().to_lowercase();
    let valid: bool = normalized
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        });
    if valid {
        Ok(normalized)
    } else {
        Err(DomainError::InvalidEmail(email.trim().to_string()))
    }
}
