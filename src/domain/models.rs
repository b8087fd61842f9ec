use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Department {
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

pub type Category = Department;
pub type Place = Department;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Employee {
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "correo", default)]
    pub email: Option<String>,
    #[serde(rename = "departamentoId", default)]
    pub department_id: Option<u64>,
    #[serde(rename = "rol", default)]
    pub role: Option<String>,
    #[serde(rename = "activo", default = "default_true")]
    pub active: bool,
    #[serde(rename = "tagRfid", default)]
    pub tag: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Shift {
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "horaInicio")]
    pub start: String,
    #[serde(rename = "horaFin")]
    pub end: String,
    #[serde(rename = "almuerzoInicio", default)]
    pub lunch_start: Option<String>,
    #[serde(rename = "almuerzoFin", default)]
    pub lunch_end: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EventRecord {
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AttendanceRecord {
    pub id: u64,
    #[serde(rename = "empleadoId")]
    pub employee_id: u64,
    #[serde(rename = "empleado", default)]
    pub employee_name: Option<String>,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "hora")]
    pub time: NaiveTime,
    /// "entrada" or "salida"; the backend decides which one a scan is.
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "eventoId", default)]
    pub event_id: Option<u64>,
}

/// Temporary-exit status reported by the backend for one employee.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct ExitStatus {
    #[serde(rename = "pendiente", default)]
    pub pending: bool,
    #[serde(rename = "limiteAlcanzado", default)]
    pub limit_reached: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Asset {
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoriaId", default)]
    pub category_id: Option<u64>,
    #[serde(rename = "lugarId", default)]
    pub place_id: Option<u64>,
    #[serde(rename = "responsableId", default)]
    pub custodian_id: Option<u64>,
    #[serde(rename = "tagRfid", default)]
    pub tag: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CountAck {
    #[serde(rename = "bien", default)]
    pub asset_name: Option<String>,
    #[serde(rename = "contados", default)]
    pub counted: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceInventoryStatus {
    #[serde(rename = "lugarId")]
    pub place_id: u64,
    #[serde(rename = "contados")]
    pub counted: u64,
    pub total: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CustodyDocument {
    pub id: u64,
    #[serde(rename = "folio", default)]
    pub folio: Option<String>,
    #[serde(rename = "origenId")]
    pub from_employee: u64,
    #[serde(rename = "destinoId")]
    pub to_employee: u64,
    #[serde(rename = "bienes", default)]
    pub assets: Vec<u64>,
    #[serde(rename = "observaciones", default)]
    pub notes: Option<String>,
    #[serde(rename = "fecha", default)]
    pub date: Option<NaiveDate>,
}

/// Backend activity log row.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub id: u64,
    #[serde(rename = "fecha", default)]
    pub date: Option<String>,
    #[serde(rename = "accion")]
    pub action: String,
    #[serde(rename = "usuario", default)]
    pub user: Option<String>,
    #[serde(rename = "detalle", default)]
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Decoded JWT payload. The token is never verified client-side; these
/// claims gate navigation only, the backend re-checks every call.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: serde_json::Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "rol", default)]
    pub role: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// One page of an already-fetched list, computed client-side.
#[derive(Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize, Clone)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

#[derive(Serialize)]
pub struct ShiftCheckReport {
    pub valid: bool,
    pub issues: Vec<FieldIssue>,
}

#[derive(Debug, Serialize, Default)]
pub struct KioskSummary {
    pub registered: usize,
    pub unknown_tags: usize,
    pub recovered_failures: usize,
}

#[derive(Debug, Serialize, Default)]
pub struct ExitSummary {
    pub exits_registered: usize,
    pub returns_registered: usize,
    pub blocked: usize,
    pub unknown_tags: usize,
    pub skipped_no_reason: usize,
}

#[derive(Debug, Serialize, Default)]
pub struct CountSummary {
    pub counted: usize,
    pub unknown_tags: usize,
    pub recovered_failures: usize,
    pub last_status: Option<PlaceInventoryStatus>,
}

#[derive(Debug, Serialize, Default)]
pub struct ReplayReport {
    pub keys: usize,
    pub emitted: Vec<String>,
    pub rejected_short: usize,
    pub stale_discards: usize,
}
