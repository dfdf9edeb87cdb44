use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifiant fort pour un membre du personnel
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour un planning (un shift côté backend)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(String);

impl ScheduleId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Statut d'un shift
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    #[default]
    Scheduled,
    Completed,
    Absent,
    Cancelled,
}

impl ShiftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::Scheduled => "scheduled",
            ShiftStatus::Completed => "completed",
            ShiftStatus::Absent => "absent",
            ShiftStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShiftStatus {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(ShiftStatus::Scheduled),
            "completed" => Ok(ShiftStatus::Completed),
            "absent" => Ok(ShiftStatus::Absent),
            "cancelled" | "canceled" => Ok(ShiftStatus::Cancelled),
            other => Err(DecodeError::InvalidValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Valeurs brutes saisies dans le formulaire, non encore parsées.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRequest {
    pub staff_id: String,
    pub shift_date: String,
    pub shift_start: String,
    pub shift_end: String,
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub status: ShiftStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ShiftRequest {
    pub fn new<S, D, A, B>(staff_id: S, shift_date: D, shift_start: A, shift_end: B) -> Self
    where
        S: Into<String>,
        D: Into<String>,
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            staff_id: staff_id.into(),
            shift_date: shift_date.into(),
            shift_start: shift_start.into(),
            shift_end: shift_end.into(),
            ..Self::default()
        }
    }
}

/// Shift déjà planifié, tel que renvoyé par le backend après décodage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingShift {
    pub schedule_id: ScheduleId,
    pub staff_id: StaffId,
    #[serde(default)]
    pub station_id: Option<StationId>,
    pub shift_date: NaiveDate,
    pub shift_start: DateTime<FixedOffset>,
    pub shift_end: DateTime<FixedOffset>,
    #[serde(default)]
    pub status: ShiftStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Forme « fil » d'un planning : champs optionnels, tout en chaînes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleRecord {
    #[serde(default)]
    pub schedule_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub staff_id: Option<String>,
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub shift_date: Option<String>,
    #[serde(default)]
    pub shift_start: Option<String>,
    #[serde(default)]
    pub shift_end: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ScheduleRecord {
    /// Valide l'enregistrement ; une date horodatée est ramenée à l'heure
    /// locale `offset` avant d'en garder le jour.
    pub fn decode(self, offset: FixedOffset) -> Result<ExistingShift, DecodeError> {
        let schedule_id = required(self.schedule_id.or(self.id), "schedule_id")?;
        let staff_id = required(self.staff_id, "staff_id")?;
        let raw_date = required(self.shift_date, "shift_date")?;
        let raw_start = required(self.shift_start, "shift_start")?;
        let raw_end = required(self.shift_end, "shift_end")?;

        let shift_date = parse_calendar_date(&raw_date, offset).ok_or(DecodeError::InvalidValue {
            field: "shift_date",
            value: raw_date.clone(),
        })?;
        let shift_start = DateTime::parse_from_rfc3339(&raw_start).map_err(|_| {
            DecodeError::InvalidValue {
                field: "shift_start",
                value: raw_start.clone(),
            }
        })?;
        let shift_end =
            DateTime::parse_from_rfc3339(&raw_end).map_err(|_| DecodeError::InvalidValue {
                field: "shift_end",
                value: raw_end.clone(),
            })?;
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => ShiftStatus::default(),
            Some(s) => s.parse()?,
        };

        Ok(ExistingShift {
            schedule_id: ScheduleId::new(schedule_id),
            staff_id: StaffId::new(staff_id),
            station_id: non_empty(self.station_id).map(StationId::new),
            shift_date,
            shift_start,
            shift_end,
            status,
            notes: non_empty(self.notes),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, DecodeError> {
    non_empty(value).ok_or(DecodeError::MissingField(field))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `YYYY-MM-DD`, ou un horodatage RFC3339 dont on garde le jour en heure locale.
pub fn parse_calendar_date(raw: &str, offset: FixedOffset) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&offset).date_naive())
}

/// Corps envoyé au backend (POST / PUT).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftPayload {
    pub staff_id: StaffId,
    pub station_id: Option<StationId>,
    #[serde(with = "date_format")]
    pub shift_date: NaiveDate,
    pub shift_start: DateTime<FixedOffset>,
    pub shift_end: DateTime<FixedOffset>,
    pub status: ShiftStatus,
    pub notes: Option<String>,
}

mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(serde::de::Error::custom)
    }
}

/// Filtres de la liste des plannings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub staff_id: Option<StaffId>,
    pub shift_date: Option<NaiveDate>,
    pub station_id: Option<StationId>,
    pub status: Option<ShiftStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ScheduleQuery {
    /// Les shifts d'un membre pour une date donnée.
    pub fn for_staff_on(staff_id: &StaffId, date: NaiveDate) -> Self {
        Self {
            staff_id: Some(staff_id.clone()),
            shift_date: Some(date),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default, alias = "totalPages")]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulePage {
    pub schedules: Vec<ExistingShift>,
    pub pagination: Pagination,
}
