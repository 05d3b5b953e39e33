// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{SECTION_A, personal_event, section_event, viewer};
use crate::{Event, EventStatus, Role, UserStats, compute_user_stats};
use time::macros::date;

fn candidates() -> Vec<Event> {
    let mut done = section_event(1, 3, SECTION_A, EventStatus::Approved);
    done.completed = true;
    done.date = date!(2026 - 05 - 01);
    vec![
        done,
        section_event(2, 3, SECTION_A, EventStatus::Pending),
        section_event(3, 4, SECTION_A, EventStatus::Pending),
        section_event(4, 4, SECTION_A, EventStatus::Approved),
        personal_event(5, 3, EventStatus::Approved),
    ]
}

#[test]
fn test_student_stats_count_only_visible_events() {
    let student = viewer(3, Role::Student, &[SECTION_A]);
    let stats: UserStats = compute_user_stats(&student, &candidates(), 0, date!(2026 - 06 - 01));

    assert_eq!(stats.total_events, 4);
    assert_eq!(stats.upcoming_events, 3);
    assert_eq!(stats.completed_events, 1);
    assert_eq!(stats.pending_events, 1);
    assert_eq!(stats.my_sections, 1);
    assert_eq!(stats.pending_moderation, None);
}

#[test]
fn test_teacher_stats_include_moderation_queue() {
    let teacher = viewer(1, Role::Teacher, &[SECTION_A]);
    let stats: UserStats = compute_user_stats(&teacher, &candidates(), 2, date!(2026 - 06 - 01));

    assert_eq!(stats.total_events, 4);
    assert_eq!(stats.pending_events, 0);
    assert_eq!(stats.pending_moderation, Some(2));
}
