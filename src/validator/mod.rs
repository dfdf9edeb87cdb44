mod conflicts;
mod form;
mod normalize;
mod types;
mod util;

pub use conflicts::{detect_conflict, find_conflicts};
pub use form::{FetchTicket, ScheduleForm};
pub use normalize::{normalize_raw, normalize_shift, validate_duration};
pub use types::{
    Conflict, DurationError, FieldError, NormalizedShift, ValidationError, ValidationPolicy,
    DEFAULT_MAX_SHIFT_HOURS, DEFAULT_UTC_OFFSET_SECS,
};
pub use util::{parse_date, parse_time_of_day};

use crate::model::{ExistingShift, ScheduleId, StaffId};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

/// Validateur de shifts : fonctions pures paramétrées par une politique.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftScheduleValidator {
    policy: ValidationPolicy,
}

impl ShiftScheduleValidator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn normalize_shift(
        &self,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<NormalizedShift, FieldError> {
        normalize::normalize_shift(date, start, end, self.policy.utc_offset)
    }

    pub fn validate_duration(
        &self,
        absolute_start: DateTime<FixedOffset>,
        absolute_end: DateTime<FixedOffset>,
    ) -> Result<(), DurationError> {
        normalize::validate_duration(absolute_start, absolute_end, &self.policy)
    }

    pub fn detect_conflict(
        &self,
        staff_id: &StaffId,
        date: NaiveDate,
        shift: &NormalizedShift,
        existing: &[ExistingShift],
        exclude: Option<&ScheduleId>,
    ) -> bool {
        conflicts::detect_conflict(
            staff_id,
            date,
            shift.absolute_start,
            shift.absolute_end,
            existing,
            exclude,
            self.policy.utc_offset,
        )
    }

    /// Ouvre un formulaire vierge avec la politique du validateur.
    pub fn form(&self) -> ScheduleForm {
        ScheduleForm::new(self.policy)
    }
}
