// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use studytrack_domain::{DomainError, Role};
use time::OffsetDateTime;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewUserRow, format_timestamp};
use crate::diesel_schema::users;
use crate::error::{PersistenceError, is_unique_violation};

/// Creates a user directory record.
///
/// Inputs must already be normalized.
///
/// # Returns
///
/// The id assigned to the user.
///
/// # Errors
///
/// Returns `DuplicateEmail` if the email is taken, or an error if the
/// insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    role: Role,
    student_id: Option<&str>,
) -> Result<i64, PersistenceError> {
    let row: NewUserRow<'_> = NewUserRow {
        name,
        email,
        role: role.as_str(),
        student_id,
        created_at: format_timestamp(OffsetDateTime::now_utc())?,
    };

    diesel::insert_into(users::table)
        .values(&row)
        .execute(conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                PersistenceError::DomainViolation(DomainError::DuplicateEmail(email.to_string()))
            } else {
                PersistenceError::QueryFailed(format!("Failed to create user: {e}"))
            }
        })?;

    let user_id: i64 = get_last_insert_rowid(conn)?;
    info!(user_id, role = role.as_str(), "Created user");
    Ok(user_id)
}
