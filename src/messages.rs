use crate::errors::{BackendError, BackendErrorKind};
use crate::validator::{Conflict, DurationError, FieldError, ValidationError};

/// Permet de customiser le rendu des messages affichés à l'utilisateur.
pub trait MessageRenderer {
    fn field(&self, error: &FieldError) -> String;
    fn duration(&self, error: &DurationError) -> String;
    fn conflict_warning(&self, conflicts: &[Conflict]) -> String;
    fn backend(&self, error: &BackendError) -> String;

    fn validation(&self, error: &ValidationError) -> String {
        match error {
            ValidationError::InvalidFields(errors) => errors
                .iter()
                .map(|e| self.field(e))
                .collect::<Vec<_>>()
                .join("\n"),
            ValidationError::Duration(err) => self.duration(err),
            ValidationError::Conflict(conflicts) => self.conflict_warning(conflicts),
        }
    }
}

/// Textes en anglais simple.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainMessages;

impl MessageRenderer for PlainMessages {
    fn field(&self, error: &FieldError) -> String {
        let label = match error.field {
            "staff_id" => "Staff",
            "shift_date" => "Shift date",
            "shift_start" => "Start time",
            "shift_end" => "End time",
            "station_id" => "Station",
            "status" => "Status",
            other => other,
        };
        if error.message == "required" {
            format!("{label} is required.")
        } else {
            format!("{label}: {}.", error.message)
        }
    }

    fn duration(&self, error: &DurationError) -> String {
        match error {
            DurationError::NonPositive => "End time must be after start time.".to_string(),
            DurationError::TooLong { minutes, max_hours } => format!(
                "A shift cannot last more than {max_hours} hours (requested {}h{:02}).",
                minutes / 60,
                minutes % 60
            ),
        }
    }

    fn conflict_warning(&self, conflicts: &[Conflict]) -> String {
        let ranges = conflicts
            .iter()
            .map(|c| {
                format!(
                    "{}-{} (#{})",
                    clock(c.existing_minutes.0),
                    clock(c.existing_minutes.1),
                    c.schedule_id.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("This staff member already has a shift overlapping this time: {ranges}.")
    }

    fn backend(&self, error: &BackendError) -> String {
        match error.kind {
            BackendErrorKind::InvalidTimeRange => "End time must be after start time.".to_string(),
            BackendErrorKind::Overlap => {
                "This staff member already has a shift overlapping this time.".to_string()
            }
            BackendErrorKind::DurationExceeded => {
                "The shift exceeds the maximum allowed duration.".to_string()
            }
            BackendErrorKind::NotFound => "The schedule no longer exists.".to_string(),
            BackendErrorKind::Unauthorized => "Your session has expired, please log in again.".to_string(),
            BackendErrorKind::Forbidden => "You are not allowed to manage schedules.".to_string(),
            BackendErrorKind::Validation => format!("The server rejected the shift: {}", error.message),
            BackendErrorKind::Network => "Cannot reach the server, please retry later.".to_string(),
            BackendErrorKind::Unknown => "Saving the schedule failed.".to_string(),
        }
    }
}

/// Minutes depuis minuit → `HH:MM` (modulo 24 h).
fn clock(minutes: u32) -> String {
    let minutes = minutes % (24 * 60);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
