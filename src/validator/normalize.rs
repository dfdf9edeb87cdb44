use super::types::{DurationError, FieldError, NormalizedShift, ValidationPolicy};
use super::util;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

/// Construit les instants absolus d'un shift.
///
/// Une heure de fin `<=` à l'heure de début désigne un shift de nuit qui se
/// termine le lendemain ; l'égalité donne donc un shift de 24 h, rejeté ensuite
/// par [`validate_duration`].
pub fn normalize_shift(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    offset: FixedOffset,
) -> Result<NormalizedShift, FieldError> {
    let is_overnight = util::minute_of_day(&end) <= util::minute_of_day(&start);
    let end_date = if is_overnight {
        date.succ_opt()
            .ok_or_else(|| FieldError::new("shift_date", "date out of range"))?
    } else {
        date
    };

    let absolute_start = util::at_local(date, start, offset)
        .ok_or_else(|| FieldError::new("shift_start", "not representable in local time"))?;
    let absolute_end = util::at_local(end_date, end, offset)
        .ok_or_else(|| FieldError::new("shift_end", "not representable in local time"))?;

    Ok(NormalizedShift {
        absolute_start,
        absolute_end,
        is_overnight,
    })
}

/// Variante sur chaînes brutes (`YYYY-MM-DD`, `HH:MM`) ; cumule les erreurs.
pub fn normalize_raw(
    date: &str,
    start: &str,
    end: &str,
    offset: FixedOffset,
) -> Result<NormalizedShift, Vec<FieldError>> {
    let date = util::parse_date("shift_date", date);
    let start = util::parse_time_of_day("shift_start", start);
    let end = util::parse_time_of_day("shift_end", end);

    match (date, start, end) {
        (Ok(d), Ok(s), Ok(e)) => normalize_shift(d, s, e, offset).map_err(|err| vec![err]),
        (d, s, e) => Err([d.err(), s.err(), e.err()].into_iter().flatten().collect()),
    }
}

/// Durée dans `(0, max_shift_hours]`.
pub fn validate_duration(
    absolute_start: DateTime<FixedOffset>,
    absolute_end: DateTime<FixedOffset>,
    policy: &ValidationPolicy,
) -> Result<(), DurationError> {
    let seconds = (absolute_end - absolute_start).num_seconds();
    if seconds <= 0 {
        return Err(DurationError::NonPositive);
    }
    if seconds > i64::from(policy.max_shift_hours) * 3600 {
        return Err(DurationError::TooLong {
            minutes: seconds / 60,
            max_hours: policy.max_shift_hours,
        });
    }
    Ok(())
}
