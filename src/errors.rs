//! Classement des refus du backend.
//!
//! Le backend ne renvoie que des messages libres : toute la reconnaissance par
//! sous-chaîne est concentrée dans [`MESSAGE_KINDS`].

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendErrorKind {
    InvalidTimeRange,
    Overlap,
    DurationExceeded,
    NotFound,
    Unauthorized,
    Forbidden,
    Validation,
    Network,
    Unknown,
}

/// Sous-chaîne (en minuscules) → type d'erreur. Premier match gagnant.
pub const MESSAGE_KINDS: &[(&str, BackendErrorKind)] = &[
    (
        "shift_end must be greater than shift_start",
        BackendErrorKind::InvalidTimeRange,
    ),
    ("overlapping this time", BackendErrorKind::Overlap),
    ("overlap", BackendErrorKind::Overlap),
    ("cannot exceed 16 hours", BackendErrorKind::DurationExceeded),
    ("duration exceeds", BackendErrorKind::DurationExceeded),
    ("not found", BackendErrorKind::NotFound),
    ("invalid token", BackendErrorKind::Unauthorized),
    ("unauthorized", BackendErrorKind::Unauthorized),
    ("forbidden", BackendErrorKind::Forbidden),
    ("permission", BackendErrorKind::Forbidden),
    ("required", BackendErrorKind::Validation),
    ("invalid", BackendErrorKind::Validation),
];

/// Classe un message d'erreur libre.
pub fn classify(message: &str) -> BackendErrorKind {
    let lowered = message.to_lowercase();
    MESSAGE_KINDS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, kind)| *kind)
        .unwrap_or(BackendErrorKind::Unknown)
}

/// Le message prime ; le code HTTP ne sert que si le message est muet.
pub fn classify_response(status: u16, message: &str) -> BackendErrorKind {
    match classify(message) {
        BackendErrorKind::Unknown => match status {
            401 => BackendErrorKind::Unauthorized,
            403 => BackendErrorKind::Forbidden,
            404 => BackendErrorKind::NotFound,
            400 | 409 | 422 => BackendErrorKind::Validation,
            _ => BackendErrorKind::Unknown,
        },
        kind => kind,
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("backend error ({kind:?}): {message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl BackendError {
    pub fn from_response(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: classify_response(status, &message),
            status: Some(status),
            message,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: BackendErrorKind::Network,
            status: None,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: BackendErrorKind::Unknown,
            status: None,
            message: message.into(),
        }
    }
}

/// Extrait le message d'un corps d'erreur JSON (`message`, `error` ou
/// `errors[0]`), sinon le texte brut.
pub fn extract_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };
    let from_field = |key: &str| value.get(key).and_then(|v| v.as_str()).map(str::to_string);
    from_field("message")
        .or_else(|| from_field("error"))
        .or_else(|| {
            value
                .get("errors")
                .and_then(|v| v.as_array())
                .and_then(|arr| arr.first())
                .and_then(|first| {
                    first
                        .as_str()
                        .map(str::to_string)
                        .or_else(|| first.get("msg").and_then(|m| m.as_str()).map(str::to_string))
                })
        })
        .unwrap_or_else(|| body.trim().to_string())
}
