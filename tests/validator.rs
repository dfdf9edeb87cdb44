#![forbid(unsafe_code)]
use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use swapsched::model::{ExistingShift, ScheduleId, ShiftStatus, StaffId};
use swapsched::validator::{
    detect_conflict, find_conflicts, normalize_raw, normalize_shift, validate_duration,
    DurationError, ShiftScheduleValidator, ValidationPolicy,
};

fn offset() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

fn existing(id: &str, staff: &str, day: &str, start: &str, end: &str) -> ExistingShift {
    let shift = normalize_shift(date(day), time(start), time(end), offset()).unwrap();
    ExistingShift {
        schedule_id: ScheduleId::new(id),
        staff_id: StaffId::new(staff),
        station_id: None,
        shift_date: date(day),
        shift_start: shift.absolute_start,
        shift_end: shift.absolute_end,
        status: ShiftStatus::Scheduled,
        notes: None,
    }
}

fn conflicts_with(
    staff: &str,
    day: &str,
    start: &str,
    end: &str,
    shifts: &[ExistingShift],
    exclude: Option<&str>,
) -> bool {
    let shift = normalize_shift(date(day), time(start), time(end), offset()).unwrap();
    let exclude = exclude.map(ScheduleId::new);
    detect_conflict(
        &StaffId::new(staff),
        date(day),
        shift.absolute_start,
        shift.absolute_end,
        shifts,
        exclude.as_ref(),
        offset(),
    )
}

#[test]
fn same_day_shift_keeps_its_length() {
    let cases = [("09:00", "17:00", 480), ("00:00", "23:59", 1439), ("06:30", "06:45", 15)];
    for (start, end, minutes) in cases {
        let shift = normalize_shift(date("2024-01-10"), time(start), time(end), offset()).unwrap();
        assert!(!shift.is_overnight, "{start}-{end}");
        assert_eq!(shift.duration_minutes(), minutes);
        assert_eq!(shift.absolute_start.date_naive(), date("2024-01-10"));
        assert_eq!(shift.absolute_end.date_naive(), date("2024-01-10"));
    }
}

#[test]
fn end_before_or_equal_start_crosses_midnight() {
    for (start, end) in [("22:00", "06:00"), ("09:00", "09:00"), ("23:59", "00:00")] {
        let shift = normalize_shift(date("2024-01-10"), time(start), time(end), offset()).unwrap();
        assert!(shift.is_overnight, "{start}-{end}");
        assert_eq!(shift.absolute_end.date_naive(), date("2024-01-11"));
        assert!(shift.absolute_end > shift.absolute_start);
    }
}

#[test]
fn overnight_instants_use_local_offset() {
    let shift = normalize_shift(date("2024-01-10"), time("22:00"), time("06:00"), offset()).unwrap();
    assert_eq!(
        shift.absolute_start,
        offset().with_ymd_and_hms(2024, 1, 10, 22, 0, 0).unwrap()
    );
    assert_eq!(
        shift.absolute_end,
        offset().with_ymd_and_hms(2024, 1, 11, 6, 0, 0).unwrap()
    );
    assert_eq!(shift.absolute_start.to_rfc3339(), "2024-01-10T22:00:00+07:00");
}

#[test]
fn normalization_is_idempotent() {
    let a = normalize_raw("2024-02-28", "20:00", "04:00", offset()).unwrap();
    let b = normalize_raw("2024-02-28", "20:00", "04:00", offset()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.absolute_end.date_naive(), date("2024-02-29"));
}

#[test]
fn raw_normalization_reports_every_bad_field() {
    let errors = normalize_raw("10/01/2024", "9h", "", offset()).unwrap_err();
    let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
    assert_eq!(fields, vec!["shift_date", "shift_start", "shift_end"]);
    assert_eq!(errors[2].message, "required");
}

#[test]
fn seconds_are_accepted_in_times() {
    let shift = normalize_raw("2024-01-10", "08:00:00", "12:30:00", offset()).unwrap();
    assert_eq!(shift.duration_minutes(), 270);
}

#[test]
fn duration_bounds() {
    let policy = ValidationPolicy::default();
    let start = offset().with_ymd_and_hms(2024, 1, 10, 6, 0, 0).unwrap();

    assert_eq!(
        validate_duration(start, start, &policy),
        Err(DurationError::NonPositive)
    );
    assert_eq!(
        validate_duration(start, start - Duration::minutes(5), &policy),
        Err(DurationError::NonPositive)
    );
    assert!(validate_duration(start, start + Duration::minutes(1), &policy).is_ok());
    assert!(validate_duration(start, start + Duration::hours(16), &policy).is_ok());
    assert_eq!(
        validate_duration(start, start + Duration::hours(16) + Duration::minutes(1), &policy),
        Err(DurationError::TooLong {
            minutes: 961,
            max_hours: 16
        })
    );
}

#[test]
fn duration_limit_follows_policy() {
    let policy = ValidationPolicy {
        max_shift_hours: 8,
        ..ValidationPolicy::default()
    };
    let start = offset().with_ymd_and_hms(2024, 1, 10, 6, 0, 0).unwrap();
    assert!(validate_duration(start, start + Duration::hours(8), &policy).is_ok());
    assert!(validate_duration(start, start + Duration::hours(9), &policy).is_err());
}

#[test]
fn scenario_a_same_day_overlap() {
    let shifts = vec![existing("sch1", "s1", "2024-01-10", "09:00", "17:00")];
    assert!(conflicts_with("s1", "2024-01-10", "16:00", "20:00", &shifts, None));
}

#[test]
fn scenario_b_previous_night_is_not_compared() {
    let shifts = vec![existing("sch1", "s1", "2024-01-10", "22:00", "06:00")];
    assert!(!conflicts_with("s1", "2024-01-11", "05:00", "09:00", &shifts, None));
}

#[test]
fn scenario_c_equal_times_are_a_24h_shift_and_rejected() {
    let shift = normalize_raw("2024-01-10", "09:00", "09:00", offset()).unwrap();
    assert!(shift.is_overnight);
    assert_eq!(shift.duration_minutes(), 24 * 60);
    let err = validate_duration(
        shift.absolute_start,
        shift.absolute_end,
        &ValidationPolicy::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DurationError::TooLong { minutes: 1440, .. }));
}

#[test]
fn scenario_d_edited_shift_does_not_conflict_with_itself() {
    let shifts = vec![existing("sch1", "s1", "2024-01-10", "09:00", "17:00")];
    assert!(!conflicts_with("s1", "2024-01-10", "10:00", "18:00", &shifts, Some("sch1")));
    assert!(conflicts_with("s1", "2024-01-10", "10:00", "18:00", &shifts, None));
}

#[test]
fn exclusion_only_skips_the_edited_shift() {
    let shifts = vec![
        existing("sch1", "s1", "2024-01-10", "09:00", "12:00"),
        existing("sch2", "s1", "2024-01-10", "13:00", "17:00"),
    ];
    assert!(conflicts_with("s1", "2024-01-10", "10:00", "14:00", &shifts, Some("sch1")));
}

#[test]
fn other_staff_and_other_dates_are_ignored() {
    let shifts = vec![
        existing("a", "s2", "2024-01-10", "09:00", "17:00"),
        existing("b", "s1", "2024-01-09", "09:00", "17:00"),
    ];
    assert!(!conflicts_with("s1", "2024-01-10", "10:00", "12:00", &shifts, None));
}

#[test]
fn touching_shifts_do_not_overlap() {
    let shifts = vec![existing("sch1", "s1", "2024-01-10", "09:00", "17:00")];
    assert!(!conflicts_with("s1", "2024-01-10", "17:00", "21:00", &shifts, None));
    assert!(!conflicts_with("s1", "2024-01-10", "05:00", "09:00", &shifts, None));
}

#[test]
fn overnight_ranges_compare_on_plain_minutes_of_day() {
    // 22:00-06:00 reste (1320, 360) : aucun report au lendemain.
    let shifts = vec![existing("night", "s1", "2024-01-10", "22:00", "06:00")];
    assert!(!conflicts_with("s1", "2024-01-10", "23:00", "23:30", &shifts, None));
    assert!(!conflicts_with("s1", "2024-01-10", "20:00", "02:00", &shifts, None));
    assert!(!conflicts_with("s1", "2024-01-10", "14:00", "22:00", &shifts, None));
    assert!(conflicts_with("s1", "2024-01-10", "04:00", "23:00", &shifts, None));

    let found = find_conflicts(
        &StaffId::new("s1"),
        date("2024-01-10"),
        offset().with_ymd_and_hms(2024, 1, 10, 4, 0, 0).unwrap(),
        offset().with_ymd_and_hms(2024, 1, 10, 23, 0, 0).unwrap(),
        &shifts,
        None,
        offset(),
    );
    assert_eq!(found[0].existing_minutes, (1320, 360));
}

#[test]
fn overlap_is_symmetric() {
    let pairs = [
        (("09:00", "17:00"), ("16:00", "20:00")),
        (("09:00", "17:00"), ("17:00", "20:00")),
        (("22:00", "06:00"), ("21:00", "23:00")),
        (("08:00", "09:00"), ("12:00", "13:00")),
    ];
    for ((a_start, a_end), (b_start, b_end)) in pairs {
        let a = vec![existing("a", "s1", "2024-01-10", a_start, a_end)];
        let b = vec![existing("b", "s1", "2024-01-10", b_start, b_end)];
        assert_eq!(
            conflicts_with("s1", "2024-01-10", b_start, b_end, &a, None),
            conflicts_with("s1", "2024-01-10", a_start, a_end, &b, None),
            "{a_start}-{a_end} vs {b_start}-{b_end}"
        );
    }
}

#[test]
fn find_conflicts_reports_ranges() {
    let shifts = vec![
        existing("sch1", "s1", "2024-01-10", "09:00", "17:00"),
        existing("sch2", "s1", "2024-01-10", "18:00", "20:00"),
    ];
    let proposed = normalize_raw("2024-01-10", "16:00", "19:00", offset()).unwrap();
    let found = find_conflicts(
        &StaffId::new("s1"),
        date("2024-01-10"),
        proposed.absolute_start,
        proposed.absolute_end,
        &shifts,
        None,
        offset(),
    );
    let ids: Vec<_> = found.iter().map(|c| c.schedule_id.as_str()).collect();
    assert_eq!(ids, vec!["sch1", "sch2"]);
    assert_eq!(found[0].existing_minutes, (540, 1020));
    assert_eq!(found[0].proposed_minutes, (960, 1140));
}

#[test]
fn stored_utc_timestamps_are_read_back_in_local_time() {
    let utc = FixedOffset::east_opt(0).unwrap();
    let mut shift = existing("sch1", "s1", "2024-01-10", "09:00", "17:00");
    shift.shift_start = shift.shift_start.with_timezone(&utc);
    shift.shift_end = shift.shift_end.with_timezone(&utc);
    assert_eq!(shift.shift_start.to_rfc3339(), "2024-01-10T02:00:00+00:00");

    assert!(conflicts_with("s1", "2024-01-10", "16:00", "20:00", &[shift], None));
}

#[test]
fn validator_wraps_policy() {
    let validator = ShiftScheduleValidator::new(ValidationPolicy::default());
    let shift = validator
        .normalize_shift(date("2024-01-10"), time("16:00"), time("20:00"))
        .unwrap();
    assert!(validator
        .validate_duration(shift.absolute_start, shift.absolute_end)
        .is_ok());
    let shifts = vec![existing("sch1", "s1", "2024-01-10", "09:00", "17:00")];
    assert!(validator.detect_conflict(
        &StaffId::new("s1"),
        date("2024-01-10"),
        &shift,
        &shifts,
        None
    ));
}
