// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;

use diesel::SqliteConnection;
use diesel::prelude::*;
use studytrack_domain::User;
use tracing::debug;

use crate::data_models::UserRow;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Retrieves a user by id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user to look up
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is invalid.
/// Returns `Ok(None)` if the user does not exist.
pub fn find_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<User>, PersistenceError> {
    debug!(user_id, "Looking up user");

    let row: Option<UserRow> = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(User::try_from).transpose()
}

/// Retrieves a user by (normalized) email.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is invalid.
pub fn find_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<User>, PersistenceError> {
    let row: Option<UserRow> = users::table
        .filter(users::email.eq(email))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(User::try_from).transpose()
}

/// Maps user ids to display names.
///
/// Ids with no matching user are absent from the result.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn user_names(
    conn: &mut SqliteConnection,
    user_ids: &[i64],
) -> Result<HashMap<i64, String>, PersistenceError> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i64, String)> = users::table
        .filter(users::user_id.eq_any(user_ids))
        .select((users::user_id, users::name))
        .load(conn)?;

    Ok(rows.into_iter().collect())
}
