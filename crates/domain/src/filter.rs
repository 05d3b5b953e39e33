// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! List filters applied on top of the visible event set.

use crate::error::DomainError;
use crate::moderation::EventStatus;
use crate::types::{Event, EventType};
use std::str::FromStr;
use time::Date;

/// A named list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    /// Every visible event.
    #[default]
    All,
    /// Events dated today or later.
    Upcoming,
    /// Events marked completed.
    Completed,
    /// The viewer's own events still awaiting review.
    PendingOwn,
    /// Events of a single type.
    ByType(EventType),
}

impl EventFilter {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
            Self::PendingOwn => "pending",
            Self::ByType(event_type) => event_type.as_str(),
        }
    }

    /// Returns true if `event` passes this filter.
    ///
    /// # Arguments
    ///
    /// * `event` - A visible event
    /// * `viewer_id` - The viewer, for `PendingOwn`
    /// * `today` - The current calendar date, for `Upcoming`
    #[must_use]
    pub fn matches(&self, event: &Event, viewer_id: i64, today: Date) -> bool {
        match self {
            Self::All => true,
            Self::Upcoming => event.date >= today,
            Self::Completed => event.completed,
            Self::PendingOwn => {
                event.status == EventStatus::Pending && event.creator_id == viewer_id
            }
            Self::ByType(event_type) => event.event_type == *event_type,
        }
    }
}

impl FromStr for EventFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Self::All),
            "upcoming" => Ok(Self::Upcoming),
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::PendingOwn),
            other => other
                .parse::<EventType>()
                .map(Self::ByType)
                .map_err(|_| DomainError::InvalidFilter(other.to_string())),
        }
    }
}

/// A filter plus optional free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub filter: EventFilter,
    /// Case-insensitive substring matched against title and details.
    pub search: Option<String>,
}

impl EventQuery {
    /// Creates a query. Blank search text is treated as no search.
    #[must_use]
    pub fn new(filter: EventFilter, search: Option<&str>) -> Self {
        let search: Option<String> = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self { filter, search }
    }

    /// Returns true if `event` passes the filter and the search.
    #[must_use]
    pub fn matches(&self, event: &Event, viewer_id: i64, today: Date) -> bool {
        if !self.filter.matches(event, viewer_id, today) {
            return false;
        }
        self.search.as_deref().is_none_or(|needle| {
            event.title.to_lowercase().contains(needle)
                || event.details.to_lowercase().contains(needle)
        })
    }

    /// Keeps the events in `visible` that pass the query, preserving order.
    #[must_use]
    pub fn apply(&self, visible: Vec<Event>, viewer_id: i64, today: Date) -> Vec<Event> {
        visible
            .into_iter()
            .filter(|event| self.matches(event, viewer_id, today))
            .collect()
    }
}
