// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApiError, RegisterUserRequest, register_user, whoami};

use super::helpers::{register, setup_test_persistence};

fn request(name: &str, email: &str, role: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        name: String::from(name),
        email: String::from(email),
        role: String::from(role),
        student_id: None,
    }
}

#[test]
fn test_register_user_normalizes_input() {
    let mut persistence = setup_test_persistence();

    let response = register_user(
        &mut persistence,
        RegisterUserRequest {
            student_id: Some(String::from("  S-0042 ")),
            ..request("  Ada Lovelace ", " Ada@Example.EDU ", "Student")
        },
    )
    .unwrap();

    assert_eq!(response.user.name, "Ada Lovelace");
    assert_eq!(response.user.email, "ada@example.edu");
    assert_eq!(response.user.role, "student");
    assert_eq!(response.user.student_id.as_deref(), Some("S-0042"));
}

#[test]
fn test_register_user_rejects_bad_fields() {
    let mut persistence = setup_test_persistence();

    let cases: [(RegisterUserRequest, &str); 3] = [
        (request("   ", "a@example.edu", "student"), "name"),
        (request("Ada", "not-an-email", "student"), "email"),
        (request("Ada", "a@example.edu", "admin"), "role"),
    ];

    for (req, expected_field) in cases {
        let err = register_user(&mut persistence, req).unwrap_err();
        assert!(
            matches!(err, ApiError::InvalidInput { ref field, .. } if field == expected_field),
            "expected {expected_field}, got {err}"
        );
    }
}

#[test]
fn test_duplicate_email_is_conflict() {
    let mut persistence = setup_test_persistence();
    register_user(
        &mut persistence,
        request("Ada", "ada@example.edu", "student"),
    )
    .unwrap();

    let err = register_user(
        &mut persistence,
        request("Other Ada", "ADA@example.edu", "teacher"),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_whoami_reports_role_capabilities() {
    let mut persistence = setup_test_persistence();
    let teacher = register(&mut persistence, "Turing", "teacher");
    let solo = register(&mut persistence, "Babbage", "personal");

    let response = whoami(&mut persistence, &teacher).unwrap();
    assert_eq!(response.user.user_id, teacher.user_id);
    assert_eq!(response.user.email, "turing@example.edu");
    assert!(response.capabilities.can_create_section.is_allowed());
    assert!(response.capabilities.can_moderate.is_allowed());
    assert!(response.active_sections.is_empty());

    let response = whoami(&mut persistence, &solo).unwrap();
    assert!(!response.capabilities.can_create_section.is_allowed());
    assert!(!response.capabilities.can_join_sections.is_allowed());
    assert!(!response.capabilities.can_moderate.is_allowed());
}
