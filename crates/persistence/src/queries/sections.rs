// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Section and membership queries.

use std::collections::HashMap;

use diesel::SqliteConnection;
use diesel::dsl::count_star;
use diesel::prelude::*;
use studytrack_domain::{MembershipStatus, Section};
use tracing::debug;

use crate::data_models::{SectionRow, SectionSummary, parse_membership_status};
use crate::diesel_schema::{section_members, sections, users};
use crate::error::PersistenceError;

/// Retrieves a section by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is invalid.
/// Returns `Ok(None)` if the section does not exist.
pub fn find_section(
    conn: &mut SqliteConnection,
    section_id: i64,
) -> Result<Option<Section>, PersistenceError> {
    let row: Option<SectionRow> = sections::table
        .filter(sections::section_id.eq(section_id))
        .select(SectionRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Section::try_from).transpose()
}

/// Lists every section, newest first, with creator name and active member count.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn list_sections(
    conn: &mut SqliteConnection,
) -> Result<Vec<SectionSummary>, PersistenceError> {
    let rows: Vec<(SectionRow, String)> = sections::table
        .inner_join(users::table)
        .select((SectionRow::as_select(), users::name))
        .order((sections::created_at.desc(), sections::section_id.desc()))
        .load(conn)?;

    let counts: HashMap<i64, i64> = section_members::table
        .filter(section_members::status.eq(MembershipStatus::Active.as_str()))
        .group_by(section_members::section_id)
        .select((section_members::section_id, count_star()))
        .load::<(i64, i64)>(conn)?
        .into_iter()
        .collect();

    debug!(section_count = rows.len(), "Loaded sections");

    rows.into_iter()
        .map(|(row, creator_name)| {
            let section: Section = Section::try_from(row)?;
            let member_count: i64 = counts.get(&section.section_id).copied().unwrap_or(0);
            Ok(SectionSummary {
                section,
                creator_name,
                member_count,
            })
        })
        .collect()
}

/// Returns the stored membership status of `user_id` in `section_id`.
///
/// # Errors
///
/// Returns an error if the query fails or the stored status is invalid.
/// Returns `Ok(None)` if the user never joined the section.
pub fn membership_status(
    conn: &mut SqliteConnection,
    section_id: i64,
    user_id: i64,
) -> Result<Option<MembershipStatus>, PersistenceError> {
    let status: Option<String> = section_members::table
        .filter(section_members::section_id.eq(section_id))
        .filter(section_members::user_id.eq(user_id))
        .select(section_members::status)
        .first(conn)
        .optional()?;

    status.as_deref().map(parse_membership_status).transpose()
}

/// Returns the ids of sections where `user_id` is an active member, ascending.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn active_section_ids(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    let ids: Vec<i64> = section_members::table
        .filter(section_members::user_id.eq(user_id))
        .filter(section_members::status.eq(MembershipStatus::Active.as_str()))
        .select(section_members::section_id)
        .order(section_members::section_id.asc())
        .load(conn)?;

    Ok(ids)
}

/// Maps section ids to `(name, code)` for display.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn section_labels(
    conn: &mut SqliteConnection,
    section_ids: &[i64],
) -> Result<HashMap<i64, (String, String)>, PersistenceError> {
    if section_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i64, String, String)> = sections::table
        .filter(sections::section_id.eq_any(section_ids))
        .select((sections::section_id, sections::name, sections::code))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(id, name, code)| (id, (name, code)))
        .collect())
}
