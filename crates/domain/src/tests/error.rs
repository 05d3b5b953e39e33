// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::EmptyTitle;
    assert_eq!(format!("{err}"), "Event title cannot be empty");

    let err: DomainError = DomainError::NoFieldsToUpdate;
    assert_eq!(format!("{err}"), "No fields to update");

    let err: DomainError = DomainError::EventNotFound(42);
    assert_eq!(format!("{err}"), "Event 42 not found");

    let err: DomainError = DomainError::InvalidStatusTransition {
        from: String::from("approved"),
        to: String::from("rejected"),
    };
    assert_eq!(
        format!("{err}"),
        "Cannot change event status from 'approved' to 'rejected'"
    );

    let err: DomainError = DomainError::SectionLimitExceeded {
        active_section_id: 3,
    };
    assert_eq!(
        format!("{err}"),
        "Students can only be in one section at a time (currently in section 3)"
    );

    let err: DomainError = DomainError::CreatorCannotLeave { section_id: 9 };
    assert_eq!(
        format!("{err}"),
        "Section creators cannot leave their own sections (section 9)"
    );
}

#[test]
fn test_domain_error_is_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(DomainError::NotMember { section_id: 1 });
    assert_eq!(err.to_string(), "Not a member of section 1");
}
