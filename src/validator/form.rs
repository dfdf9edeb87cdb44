use super::types::{Conflict, FieldError, NormalizedShift, ValidationError, ValidationPolicy};
use super::{conflicts, normalize, util};
use crate::model::{
    ExistingShift, ScheduleId, ShiftPayload, ShiftRequest, ShiftStatus, StaffId, StationId,
};
use chrono::NaiveDate;

/// Jeton de chargement : seule la réponse du dernier chargement est appliquée.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Formulaire de planification : état possédé par une session d'édition.
#[derive(Debug, Clone)]
pub struct ScheduleForm {
    request: ShiftRequest,
    editing: Option<ScheduleId>,
    existing: Vec<ExistingShift>,
    policy: ValidationPolicy,
    generation: u64,
    closed: bool,
}

/// Champs parsés, prêts à être normalisés.
struct ParsedFields {
    staff_id: StaffId,
    date: NaiveDate,
    shift: NormalizedShift,
}

impl ScheduleForm {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            request: ShiftRequest::default(),
            editing: None,
            existing: Vec::new(),
            policy,
            generation: 0,
            closed: false,
        }
    }

    pub fn with_request(request: ShiftRequest, policy: ValidationPolicy) -> Self {
        Self {
            request,
            ..Self::new(policy)
        }
    }

    /// Charge un shift existant pour modification ; il sera exclu des conflits.
    pub fn edit(existing: &ExistingShift, policy: ValidationPolicy) -> Self {
        let start = existing.shift_start.with_timezone(&policy.utc_offset);
        let end = existing.shift_end.with_timezone(&policy.utc_offset);
        let request = ShiftRequest {
            staff_id: existing.staff_id.as_str().to_string(),
            shift_date: existing.shift_date.format("%Y-%m-%d").to_string(),
            shift_start: start.format("%H:%M").to_string(),
            shift_end: end.format("%H:%M").to_string(),
            station_id: existing.station_id.as_ref().map(|s| s.as_str().to_string()),
            status: existing.status,
            notes: existing.notes.clone(),
        };
        Self {
            request,
            editing: Some(existing.schedule_id.clone()),
            ..Self::new(policy)
        }
    }

    /// Marque le formulaire comme édition du planning `id` (ou création si `None`).
    pub fn set_editing(&mut self, id: Option<ScheduleId>) {
        self.editing = id;
    }

    pub fn request(&self) -> &ShiftRequest {
        &self.request
    }
    pub fn editing(&self) -> Option<&ScheduleId> {
        self.editing.as_ref()
    }
    pub fn existing(&self) -> &[ExistingShift] {
        &self.existing
    }
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn set_staff<S: Into<String>>(&mut self, staff_id: S) {
        self.request.staff_id = staff_id.into();
    }
    pub fn set_date<S: Into<String>>(&mut self, date: S) {
        self.request.shift_date = date.into();
    }
    pub fn set_start<S: Into<String>>(&mut self, start: S) {
        self.request.shift_start = start.into();
    }
    pub fn set_end<S: Into<String>>(&mut self, end: S) {
        self.request.shift_end = end.into();
    }
    pub fn set_station(&mut self, station_id: Option<String>) {
        self.request.station_id = station_id;
    }
    pub fn set_status(&mut self, status: ShiftStatus) {
        self.request.status = status;
    }
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.request.notes = notes;
    }

    /// Démarre un chargement des shifts existants.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    /// Applique une réponse ; ignorée si périmée ou si le formulaire est fermé.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, shifts: Vec<ExistingShift>) -> bool {
        if self.closed || ticket.0 != self.generation {
            return false;
        }
        self.existing = shifts;
        true
    }

    pub fn close(&mut self) {
        self.closed = true;
    }
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Avertissement non bloquant, recalculé à chaque saisie.
    /// `None` tant que les champs ne sont pas complets et valides.
    pub fn conflict_warning(&self) -> Option<Vec<Conflict>> {
        let fields = self.parse().ok()?;
        let found = self.conflicts_for(&fields);
        (!found.is_empty()).then_some(found)
    }

    /// Le bouton d'envoi est désactivé tant qu'un conflit est présent.
    pub fn can_submit(&self) -> bool {
        self.conflict_warning().is_none()
    }

    /// Contrôle complet avant envoi : champs, durée, puis conflits.
    pub fn submit(&self) -> Result<ShiftPayload, ValidationError> {
        let fields = self.parse().map_err(ValidationError::InvalidFields)?;
        normalize::validate_duration(
            fields.shift.absolute_start,
            fields.shift.absolute_end,
            &self.policy,
        )?;

        let found = self.conflicts_for(&fields);
        if !found.is_empty() {
            return Err(ValidationError::Conflict(found));
        }

        Ok(ShiftPayload {
            staff_id: fields.staff_id,
            station_id: non_blank(self.request.station_id.as_deref()).map(StationId::new),
            shift_date: fields.date,
            shift_start: fields.shift.absolute_start,
            shift_end: fields.shift.absolute_end,
            status: self.request.status,
            notes: non_blank(self.request.notes.as_deref()).map(str::to_string),
        })
    }

    fn conflicts_for(&self, fields: &ParsedFields) -> Vec<Conflict> {
        conflicts::find_conflicts(
            &fields.staff_id,
            fields.date,
            fields.shift.absolute_start,
            fields.shift.absolute_end,
            &self.existing,
            self.editing.as_ref(),
            self.policy.utc_offset,
        )
    }

    fn parse(&self) -> Result<ParsedFields, Vec<FieldError>> {
        let mut errors = Vec::new();

        let staff = self.request.staff_id.trim();
        if staff.is_empty() {
            errors.push(FieldError::new("staff_id", "required"));
        }
        let date = util::parse_date("shift_date", &self.request.shift_date)
            .map_err(|e| errors.push(e))
            .ok();
        let start = util::parse_time_of_day("shift_start", &self.request.shift_start)
            .map_err(|e| errors.push(e))
            .ok();
        let end = util::parse_time_of_day("shift_end", &self.request.shift_end)
            .map_err(|e| errors.push(e))
            .ok();

        let (Some(date), Some(start), Some(end)) = (date, start, end) else {
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        let shift = normalize::normalize_shift(date, start, end, self.policy.utc_offset)
            .map_err(|e| vec![e])?;
        Ok(ParsedFields {
            staff_id: StaffId::new(staff),
            date,
            shift,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
