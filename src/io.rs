use crate::model::{ExistingShift, ShiftRequest, ShiftStatus};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de demandes depuis CSV:
/// header `staff_id,shift_date,shift_start,shift_end[,station_id][,status][,notes]`
pub fn import_requests_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ShiftRequest>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;
    let mut out = Vec::new();
    for (idx, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let row = idx + 2;
        let field = |i: usize, name: &str| -> anyhow::Result<String> {
            rec.get(i)
                .map(str::to_string)
                .with_context(|| format!("row {row}: missing {name}"))
        };
        let mut request = ShiftRequest::new(
            field(0, "staff_id")?,
            field(1, "shift_date")?,
            field(2, "shift_start")?,
            field(3, "shift_end")?,
        );
        request.station_id = optional(rec.get(4));
        if let Some(status) = optional(rec.get(5)) {
            request.status = status
                .parse::<ShiftStatus>()
                .with_context(|| format!("row {row}: invalid status"))?;
        }
        request.notes = optional(rec.get(6));
        out.push(request);
    }
    if out.is_empty() {
        bail!("no shift rows found");
    }
    Ok(out)
}

fn optional(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Lecture d'une liste de shifts existants (JSON), pour un contrôle hors ligne.
pub fn load_shifts_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ExistingShift>> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let shifts: Vec<ExistingShift> =
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(shifts)
}

/// Export JSON (jolie mise en forme)
pub fn export_shifts_json<P: AsRef<Path>>(path: P, shifts: &[ExistingShift]) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(shifts)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV: header `schedule_id,staff_id,station_id,shift_date,shift_start,shift_end,status`
pub fn export_shifts_csv<P: AsRef<Path>>(path: P, shifts: &[ExistingShift]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "schedule_id",
        "staff_id",
        "station_id",
        "shift_date",
        "shift_start",
        "shift_end",
        "status",
    ])?;
    for s in shifts {
        let date = s.shift_date.format("%Y-%m-%d").to_string();
        let start = s.shift_start.to_rfc3339();
        let end = s.shift_end.to_rfc3339();
        w.write_record([
            s.schedule_id.as_str(),
            s.staff_id.as_str(),
            s.station_id.as_ref().map(|id| id.as_str()).unwrap_or(""),
            date.as_str(),
            start.as_str(),
            end.as_str(),
            s.status.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
