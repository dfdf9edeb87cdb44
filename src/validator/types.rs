use crate::model::ScheduleId;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use thiserror::Error;

/// Plafond de durée d'un shift (politique métier).
pub const DEFAULT_MAX_SHIFT_HOURS: u32 = 16;

/// Décalage horaire par défaut des stations (UTC+7).
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// Options de validation
#[derive(Debug, Clone, Copy)]
pub struct ValidationPolicy {
    pub max_shift_hours: u32,
    /// Heure locale de l'exploitation : sert à construire et relire les instants.
    pub utc_offset: FixedOffset,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_shift_hours: DEFAULT_MAX_SHIFT_HOURS,
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or(Utc.fix()),
        }
    }
}

/// Résultat de la normalisation d'un shift (instants absolus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedShift {
    pub absolute_start: DateTime<FixedOffset>,
    pub absolute_end: DateTime<FixedOffset>,
    pub is_overnight: bool,
}

impl NormalizedShift {
    pub fn duration_minutes(&self) -> i64 {
        (self.absolute_end - self.absolute_start).num_minutes()
    }
}

/// Shift existant qui chevauche la proposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub schedule_id: ScheduleId,
    /// Plage existante en minutes depuis minuit, heure locale.
    pub existing_minutes: (u32, u32),
    pub proposed_minutes: (u32, u32),
}

/// Erreur de saisie rattachée à un champ du formulaire.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new<M: Into<String>>(field: &'static str, message: M) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("shift duration must be positive")]
    NonPositive,
    #[error("shift lasts {minutes} minutes, more than {max_hours} hours")]
    TooLong { minutes: i64, max_hours: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid fields: {}", join_fields(.0))]
    InvalidFields(Vec<FieldError>),
    #[error(transparent)]
    Duration(#[from] DurationError),
    #[error("shift overlaps {} existing shift(s)", .0.len())]
    Conflict(Vec<Conflict>),
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
