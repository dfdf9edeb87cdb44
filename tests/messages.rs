#![forbid(unsafe_code)]
use swapsched::errors::BackendError;
use swapsched::messages::{MessageRenderer, PlainMessages};
use swapsched::model::ScheduleId;
use swapsched::validator::{Conflict, DurationError, FieldError, ValidationError};

#[test]
fn field_errors_render_one_per_line() {
    let err = ValidationError::InvalidFields(vec![
        FieldError::new("staff_id", "required"),
        FieldError::new("shift_start", "expected HH:MM, got \"9h\""),
    ]);
    insta::assert_snapshot!(PlainMessages.validation(&err), @r###"
    Staff is required.
    Start time: expected HH:MM, got "9h".
    "###);
}

#[test]
fn duration_message_names_the_policy() {
    let err = DurationError::TooLong {
        minutes: 1440,
        max_hours: 16,
    };
    insta::assert_snapshot!(
        PlainMessages.duration(&err),
        @"A shift cannot last more than 16 hours (requested 24h00)."
    );
    insta::assert_snapshot!(
        PlainMessages.duration(&DurationError::NonPositive),
        @"End time must be after start time."
    );
}

#[test]
fn conflict_warning_lists_existing_ranges() {
    let conflicts = vec![
        Conflict {
            schedule_id: ScheduleId::new("sch1"),
            existing_minutes: (540, 1020),
            proposed_minutes: (960, 1200),
        },
        Conflict {
            schedule_id: ScheduleId::new("sch2"),
            existing_minutes: (1320, 360),
            proposed_minutes: (960, 1200),
        },
    ];
    insta::assert_snapshot!(
        PlainMessages.conflict_warning(&conflicts),
        @"This staff member already has a shift overlapping this time: 09:00-17:00 (#sch1), 22:00-06:00 (#sch2)."
    );
}

#[test]
fn backend_errors_fall_back_to_generic_text() {
    let overlap = BackendError::from_response(400, "Shift overlapping this time");
    insta::assert_snapshot!(
        PlainMessages.backend(&overlap),
        @"This staff member already has a shift overlapping this time."
    );
    let unknown = BackendError::from_response(500, "segfault");
    insta::assert_snapshot!(PlainMessages.backend(&unknown), @"Saving the schedule failed.");
    let network = BackendError::network("connection refused");
    insta::assert_snapshot!(
        PlainMessages.backend(&network),
        @"Cannot reach the server, please retry later."
    );
}
