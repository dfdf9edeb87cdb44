use super::types::Conflict;
use super::util;
use crate::model::{ExistingShift, ScheduleId, StaffId};
use chrono::{DateTime, FixedOffset, NaiveDate};

/// Shifts existants qui chevauchent la proposition.
///
/// Seuls les shifts du même membre, rattachés à la même date de début, sont
/// comparés, sur des plages « minutes depuis minuit » en heure locale, sans
/// report au lendemain. Un shift de nuit rattaché à la veille n'est donc jamais
/// comparé, et une plage de nuit (fin < début) ne chevauche que rarement.
pub fn find_conflicts(
    staff_id: &StaffId,
    date: NaiveDate,
    absolute_start: DateTime<FixedOffset>,
    absolute_end: DateTime<FixedOffset>,
    existing: &[ExistingShift],
    exclude: Option<&ScheduleId>,
    offset: FixedOffset,
) -> Vec<Conflict> {
    let proposed = local_range(absolute_start, absolute_end, offset);

    existing
        .iter()
        .filter(|s| &s.staff_id == staff_id && s.shift_date == date)
        .filter(|s| exclude != Some(&s.schedule_id))
        .filter_map(|s| {
            let range = local_range(s.shift_start, s.shift_end, offset);
            util::overlaps(proposed, range).then(|| Conflict {
                schedule_id: s.schedule_id.clone(),
                existing_minutes: range,
                proposed_minutes: proposed,
            })
        })
        .collect()
}

pub fn detect_conflict(
    staff_id: &StaffId,
    date: NaiveDate,
    absolute_start: DateTime<FixedOffset>,
    absolute_end: DateTime<FixedOffset>,
    existing: &[ExistingShift],
    exclude: Option<&ScheduleId>,
    offset: FixedOffset,
) -> bool {
    !find_conflicts(
        staff_id,
        date,
        absolute_start,
        absolute_end,
        existing,
        exclude,
        offset,
    )
    .is_empty()
}

fn local_range(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    offset: FixedOffset,
) -> (u32, u32) {
    (
        util::minute_of_day(&start.with_timezone(&offset)),
        util::minute_of_day(&end.with_timezone(&offset)),
    )
}
