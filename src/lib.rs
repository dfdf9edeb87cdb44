#![forbid(unsafe_code)]
//! Swapsched — contrôle des plannings du personnel des stations d'échange de batteries.
//!
//! - Normalisation des shifts (shifts de nuit), plafond de durée.
//! - Détection de chevauchements pour un même membre, y compris en édition.
//! - Client REST du backend, refus classés via une table unique.
//! - Heure locale des stations : décalage fixe configurable.

pub mod client;
pub mod config;
pub mod console;
pub mod errors;
pub mod io;
pub mod messages;
pub mod model;
pub mod storage;
pub mod validator;

pub use client::{HttpBackend, ScheduleBackend};
pub use config::Settings;
pub use console::{BatchReport, ConsoleError, RejectedRow, ScheduleConsole};
pub use errors::{classify, BackendError, BackendErrorKind};
pub use messages::{MessageRenderer, PlainMessages};
pub use model::{
    ExistingShift, Pagination, ScheduleId, SchedulePage, ScheduleQuery, ShiftPayload,
    ShiftRequest, ShiftStatus, StaffId, StationId,
};
pub use storage::{JsonSessionStore, Session, SessionStore};
pub use validator::{
    Conflict, DurationError, FieldError, NormalizedShift, ScheduleForm, ShiftScheduleValidator,
    ValidationError, ValidationPolicy,
};
