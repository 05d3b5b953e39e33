// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{register, setup};
use crate::PersistenceError;
use studytrack_domain::{DomainError, Role};

#[test]
fn test_create_and_find_user() {
    let mut persistence = setup();

    let created = persistence
        .create_user("Ada Lovelace", "ada@example.edu", Role::Student, Some("S-001"))
        .unwrap();
    let found = persistence.find_user(created.user_id).unwrap().unwrap();

    assert_eq!(found, created);
    assert_eq!(found.student_id.as_deref(), Some("S-001"));
}

#[test]
fn test_find_user_by_email() {
    let mut persistence = setup();
    let user = register(&mut persistence, "Ada", Role::Teacher);

    let found = persistence.find_user_by_email("ada@example.edu").unwrap();
    assert_eq!(found.map(|u| u.user_id), Some(user.user_id));
    assert!(persistence.find_user_by_email("nobody@example.edu").unwrap().is_none());
}

#[test]
fn test_duplicate_email_is_rejected() {
    let mut persistence = setup();
    register(&mut persistence, "Ada", Role::Teacher);

    let err = persistence
        .create_user("Another Ada", "ada@example.edu", Role::Student, None)
        .unwrap_err();

    assert_eq!(
        err,
        PersistenceError::DomainViolation(DomainError::DuplicateEmail(String::from(
            "ada@example.edu"
        )))
    );
}

#[test]
fn test_missing_user_is_none() {
    let mut persistence = setup();
    assert!(persistence.find_user(404).unwrap().is_none());
}
