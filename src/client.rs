use crate::config::Settings;
use crate::errors::{extract_message, BackendError};
use crate::model::{
    ExistingShift, Pagination, ScheduleId, SchedulePage, ScheduleQuery, ScheduleRecord,
    ShiftPayload,
};
use chrono::FixedOffset;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Collaborateur REST : lecture et écriture des plannings.
pub trait ScheduleBackend {
    fn list_schedules(&self, query: &ScheduleQuery) -> Result<SchedulePage, BackendError>;
    fn create_schedule(&self, payload: &ShiftPayload) -> Result<ExistingShift, BackendError>;
    fn update_schedule(
        &self,
        id: &ScheduleId,
        payload: &ShiftPayload,
    ) -> Result<ExistingShift, BackendError>;
    fn delete_schedule(&self, id: &ScheduleId) -> Result<(), BackendError>;
}

/// Client HTTP bloquant vers l'API des plannings.
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
    offset: FixedOffset,
}

impl HttpBackend {
    pub fn new(settings: &Settings, token: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            token,
            offset: settings.offset()?,
        })
    }

    fn schedules_url(&self) -> String {
        format!("{}/schedules", self.base_url)
    }

    fn schedule_url(&self, id: &ScheduleId) -> String {
        format!("{}/schedules/{}", self.base_url, id.as_str())
    }

    fn send(&self, req: RequestBuilder) -> Result<String, BackendError> {
        let request_id = Uuid::new_v4().to_string();
        let mut req = req.header("X-Request-Id", request_id.as_str());
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().map_err(|e| {
            warn!(%request_id, error = %e, "request failed");
            BackendError::network(e.to_string())
        })?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| BackendError::network(e.to_string()))?;
        debug!(%request_id, status = status.as_u16(), "response received");
        if !status.is_success() {
            let err = BackendError::from_response(status.as_u16(), extract_message(&body));
            warn!(%request_id, kind = ?err.kind, message = %err.message, "backend rejected request");
            return Err(err);
        }
        Ok(body)
    }
}

impl ScheduleBackend for HttpBackend {
    fn list_schedules(&self, query: &ScheduleQuery) -> Result<SchedulePage, BackendError> {
        let pairs = list_query_pairs(query);
        debug!(?pairs, "listing schedules");
        let body = self.send(self.client.get(self.schedules_url()).query(&pairs))?;
        decode_page(&body, self.offset)
    }

    fn create_schedule(&self, payload: &ShiftPayload) -> Result<ExistingShift, BackendError> {
        debug!(staff = payload.staff_id.as_str(), "creating schedule");
        let body = self.send(self.client.post(self.schedules_url()).json(payload))?;
        decode_schedule(&body, self.offset)
    }

    fn update_schedule(
        &self,
        id: &ScheduleId,
        payload: &ShiftPayload,
    ) -> Result<ExistingShift, BackendError> {
        debug!(schedule = id.as_str(), "updating schedule");
        let body = self.send(self.client.put(self.schedule_url(id)).json(payload))?;
        decode_schedule(&body, self.offset)
    }

    fn delete_schedule(&self, id: &ScheduleId) -> Result<(), BackendError> {
        debug!(schedule = id.as_str(), "deleting schedule");
        self.send(self.client.delete(self.schedule_url(id)))?;
        Ok(())
    }
}

/// Paramètres de requête de la liste, dans un ordre stable.
pub fn list_query_pairs(query: &ScheduleQuery) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(staff) = &query.staff_id {
        pairs.push(("staff_id", staff.as_str().to_string()));
    }
    if let Some(date) = query.shift_date {
        pairs.push(("shift_date", date.format("%Y-%m-%d").to_string()));
    }
    if let Some(station) = &query.station_id {
        pairs.push(("station_id", station.as_str().to_string()));
    }
    if let Some(status) = query.status {
        pairs.push(("status", status.as_str().to_string()));
    }
    if let Some(page) = query.page {
        pairs.push(("page", page.to_string()));
    }
    if let Some(limit) = query.limit {
        pairs.push(("limit", limit.to_string()));
    }
    pairs
}

#[derive(Debug, Deserialize)]
struct PageEnvelope {
    #[serde(default, alias = "data")]
    schedules: Vec<ScheduleRecord>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

/// Décode `{schedules, pagination}` ; un enregistrement invalide fait échouer
/// toute la page.
pub fn decode_page(body: &str, offset: FixedOffset) -> Result<SchedulePage, BackendError> {
    let envelope: PageEnvelope = serde_json::from_str(body)
        .map_err(|e| BackendError::decode(format!("invalid schedule list: {e}")))?;
    let schedules = envelope
        .schedules
        .into_iter()
        .map(|rec| rec.decode(offset).map_err(|e| BackendError::decode(e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    let pagination = envelope.pagination.unwrap_or_else(|| Pagination {
        page: 1,
        limit: schedules.len() as u32,
        total: schedules.len() as u64,
        total_pages: 1,
    });
    Ok(SchedulePage {
        schedules,
        pagination,
    })
}

/// Décode un planning, éventuellement enveloppé dans `schedule` ou `data`.
pub fn decode_schedule(body: &str, offset: FixedOffset) -> Result<ExistingShift, BackendError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| BackendError::decode(format!("invalid schedule: {e}")))?;
    let inner = ["schedule", "data"]
        .iter()
        .find_map(|key| value.get(*key).filter(|v| v.is_object()).cloned())
        .unwrap_or(value);
    let record: ScheduleRecord = serde_json::from_value(inner)
        .map_err(|e| BackendError::decode(format!("invalid schedule: {e}")))?;
    record
        .decode(offset)
        .map_err(|e| BackendError::decode(e.to_string()))
}
