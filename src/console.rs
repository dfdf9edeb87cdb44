use crate::client::ScheduleBackend;
use crate::errors::BackendError;
use crate::model::{
    ExistingShift, ScheduleId, SchedulePage, ScheduleQuery, ShiftRequest, StaffId,
};
use crate::validator::{parse_date, ScheduleForm, ValidationError, ValidationPolicy};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("form is closed")]
    Closed,
}

/// Ligne refusée lors d'un import groupé (numéro de ligne CSV, en-tête = 1).
#[derive(Debug)]
pub struct RejectedRow {
    pub row: usize,
    pub error: ConsoleError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub created: Vec<ExistingShift>,
    pub rejected: Vec<RejectedRow>,
}

/// Enchaîne contrôle local et appels au backend.
pub struct ScheduleConsole<B: ScheduleBackend> {
    backend: B,
    policy: ValidationPolicy,
}

impl<B: ScheduleBackend> ScheduleConsole<B> {
    pub fn new(backend: B, policy: ValidationPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn list(&self, query: &ScheduleQuery) -> Result<SchedulePage, BackendError> {
        self.backend.list_schedules(query)
    }

    /// Nouveau formulaire pré-rempli, avec les shifts existants du membre
    /// pour la date saisie.
    pub fn open_form(&self, request: ShiftRequest) -> Result<ScheduleForm, ConsoleError> {
        let mut form = ScheduleForm::with_request(request, self.policy);
        self.refresh(&mut form)?;
        Ok(form)
    }

    pub fn open_edit(&self, existing: &ExistingShift) -> Result<ScheduleForm, ConsoleError> {
        let mut form = ScheduleForm::edit(existing, self.policy);
        self.refresh(&mut form)?;
        Ok(form)
    }

    /// Recharge les shifts existants ; sans membre ou date valide, la liste est vidée.
    pub fn refresh(&self, form: &mut ScheduleForm) -> Result<(), ConsoleError> {
        if form.is_closed() {
            return Err(ConsoleError::Closed);
        }
        let staff = form.request().staff_id.trim().to_string();
        let date = parse_date("shift_date", &form.request().shift_date).ok();
        let ticket = form.begin_fetch();
        let shifts = match (staff.is_empty(), date) {
            (false, Some(date)) => {
                let query = ScheduleQuery::for_staff_on(&StaffId::new(&staff), date);
                self.fetch_all(query)?
            }
            _ => Vec::new(),
        };
        debug!(staff = %staff, count = shifts.len(), "existing shifts loaded");
        form.apply_fetch(ticket, shifts);
        Ok(())
    }

    fn fetch_all(&self, mut query: ScheduleQuery) -> Result<Vec<ExistingShift>, BackendError> {
        let mut out = Vec::new();
        let mut page = 1;
        loop {
            query.page = Some(page);
            let result = self.backend.list_schedules(&query)?;
            let count = result.schedules.len();
            out.extend(result.schedules);
            if count == 0 || page >= result.pagination.total_pages {
                break;
            }
            page += 1;
        }
        Ok(out)
    }

    /// Contrôle local puis création (ou mise à jour si le formulaire édite un shift).
    /// Aucun nouvel essai : en cas de refus le formulaire reste intact.
    pub fn submit(&self, form: &ScheduleForm) -> Result<ExistingShift, ConsoleError> {
        if form.is_closed() {
            return Err(ConsoleError::Closed);
        }
        let payload = form.submit()?;
        let saved = match form.editing() {
            Some(id) => self.backend.update_schedule(id, &payload),
            None => self.backend.create_schedule(&payload),
        }
        .map_err(|err| {
            warn!(kind = ?err.kind, "schedule rejected by backend");
            err
        })?;
        info!(schedule = saved.schedule_id.as_str(), "schedule saved");
        Ok(saved)
    }

    pub fn delete(&self, id: &ScheduleId) -> Result<(), BackendError> {
        self.backend.delete_schedule(id)?;
        info!(schedule = id.as_str(), "schedule deleted");
        Ok(())
    }

    /// Import groupé : chaque ligne est contrôlée contre le backend et contre
    /// les lignes déjà acceptées du même lot.
    pub fn import_batch(&self, requests: Vec<ShiftRequest>) -> BatchReport {
        let mut report = BatchReport::default();
        for (idx, request) in requests.into_iter().enumerate() {
            let row = idx + 2;
            match self.import_one(request, &report.created) {
                Ok(saved) => report.created.push(saved),
                Err(error) => {
                    warn!(row, error = %error, "row rejected");
                    report.rejected.push(RejectedRow { row, error });
                }
            }
        }
        report
    }

    fn import_one(
        &self,
        request: ShiftRequest,
        accepted: &[ExistingShift],
    ) -> Result<ExistingShift, ConsoleError> {
        let mut form = ScheduleForm::with_request(request, self.policy);
        self.refresh(&mut form)?;
        let mut known = form.existing().to_vec();
        for shift in accepted {
            if !known.iter().any(|k| k.schedule_id == shift.schedule_id) {
                known.push(shift.clone());
            }
        }
        let ticket = form.begin_fetch();
        form.apply_fetch(ticket, known);
        self.submit(&form)
    }
}
