//! REST client for the attendance/inventory backend.
//!
//! JSON over HTTP, bearer-token authenticated, base path `<server>/api`.
//! Status codes map onto the client's error taxonomy here, in one place;
//! directory GETs go through a small on-disk cache so listings survive a
//! flaky link (write-through on success, fallback on network failure).

use crate::cli::ReportFormat;
use crate::domain::models::*;
use crate::services::storage::cache_dir;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 5000;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("not signed in (run `pase login`)")]
    AuthRequired,
    #[error("session expired (run `pase login` again)")]
    SessionExpired,
    #[error("{0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("could not reach server: {0}")]
    Network(String),
    #[error("unexpected server response (status {0})")]
    Unexpected(u16),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::AuthRequired | ApiError::SessionExpired => "AUTH_REQUIRED",
            ApiError::Validation(_) => "VALIDATION",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Network(_) => "NETWORK",
            ApiError::Unexpected(_) => "API",
        }
    }
}

#[derive(Debug, serde::Deserialize, Default)]
struct ApiMessage {
    #[serde(alias = "mensaje")]
    message: Option<String>,
}

/// Pure status→taxonomy mapping; the backend's own message is preferred when
/// the payload is structured, otherwise a generic fallback per class.
pub fn classify_status(status: u16, message: Option<String>, resource: &str) -> ApiError {
    match status {
        400 | 422 => ApiError::Validation(message.unwrap_or_else(|| "invalid request".into())),
        401 => ApiError::SessionExpired,
        403 => ApiError::AuthRequired,
        404 => ApiError::NotFound(message.unwrap_or_else(|| resource.to_string())),
        409 => ApiError::Conflict(message.unwrap_or_else(|| "duplicate record".into())),
        s => ApiError::Unexpected(s),
    }
}

/// Taxonomy code for any error that may wrap an [`ApiError`]; everything
/// else reports as a generic API failure.
pub fn error_code(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<ApiError>()
        .map(ApiError::code)
        .unwrap_or("API")
}

fn into_network(err: reqwest::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

pub struct Api {
    base: String,
    token: Option<String>,
    http: reqwest::blocking::Client,
}

impl Api {
    pub fn new(server: &str, token: Option<String>, timeout_ms: Option<u64>) -> anyhow::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)))
            .build()?;
        Ok(Self {
            base: format!("{}/api", server.trim_end_matches('/')),
            token,
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::blocking::RequestBuilder {
        let mut rb = self.http.request(method, self.url(path));
        if let Some(token) = &self.token {
            rb = rb.bearer_auth(token);
        }
        rb
    }

    fn check(
        resp: reqwest::blocking::Response,
        resource: &str,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp
            .json::<ApiMessage>()
            .ok()
            .and_then(|m| m.message)
            .filter(|m| !m.trim().is_empty());
        Err(classify_status(status.as_u16(), message, resource))
    }

    fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let resp = self
            .request(reqwest::Method::GET, path)
            .send()
            .map_err(into_network)?;
        Ok(Self::check(resp, path)?.json().map_err(into_network)?)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> anyhow::Result<T> {
        let resp = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .map_err(into_network)?;
        Ok(Self::check(resp, path)?.json().map_err(into_network)?)
    }

    fn put_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> anyhow::Result<T> {
        let resp = self
            .request(reqwest::Method::PUT, path)
            .json(body)
            .send()
            .map_err(into_network)?;
        Ok(Self::check(resp, path)?.json().map_err(into_network)?)
    }

    fn delete(&self, path: &str) -> anyhow::Result<()> {
        let resp = self
            .request(reqwest::Method::DELETE, path)
            .send()
            .map_err(into_network)?;
        Self::check(resp, path)?;
        Ok(())
    }

    fn cache_file(&self, path: &str) -> anyhow::Result<PathBuf> {
        let mut hasher = Sha256::new();
        hasher.update(self.base.as_bytes());
        hasher.update(path.as_bytes());
        let id = hex::encode(hasher.finalize());
        Ok(cache_dir()?.join(format!("{}.json", id)))
    }

    /// GET a listing with write-through caching. On a network failure the
    /// cached copy is served when one exists; every other error propagates.
    fn cached_list<T: DeserializeOwned + Serialize>(&self, path: &str) -> anyhow::Result<Vec<T>> {
        let cache = self.cache_file(path)?;
        match self.fetch_json::<Vec<T>>(path) {
            Ok(items) => {
                if let Some(parent) = cache.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }
                let _ = std::fs::write(&cache, serde_json::to_string(&items)?);
                Ok(items)
            }
            Err(err) if err.downcast_ref::<ApiError>().map(ApiError::code) == Some("NETWORK")
                && cache.exists() =>
            {
                log::warn!("serving cached listing for {path}: {err}");
                let raw = std::fs::read_to_string(cache)?;
                Ok(serde_json::from_str(&raw)?)
            }
            Err(err) => Err(err),
        }
    }

    // --- auth ---

    pub fn login(server: &str, user: &str, password: &str) -> anyhow::Result<LoginResponse> {
        let api = Api::new(server, None, None)?;
        api.post_json(
            "/auth/login",
            &serde_json::json!({"usuario": user, "password": password}),
        )
    }

    // --- catalogs ---

    pub fn list_departments(&self) -> anyhow::Result<Vec<Department>> {
        self.cached_list("/departamentos")
    }

    pub fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        self.cached_list("/categorias")
    }

    pub fn list_places(&self) -> anyhow::Result<Vec<Place>> {
        self.cached_list("/lugares")
    }

    pub fn create_catalog_entry(
        &self,
        resource: &str,
        name: &str,
        description: Option<&str>,
    ) -> anyhow::Result<Department> {
        self.post_json(
            &format!("/{resource}"),
            &serde_json::json!({"nombre": name, "descripcion": description}),
        )
    }

    pub fn update_catalog_entry(
        &self,
        resource: &str,
        id: u64,
        name: Option<&str>,
        description: Option<&str>,
    ) -> anyhow::Result<Department> {
        self.put_json(
            &format!("/{resource}/{id}"),
            &serde_json::json!({"nombre": name, "descripcion": description}),
        )
    }

    pub fn delete_catalog_entry(&self, resource: &str, id: u64) -> anyhow::Result<()> {
        self.delete(&format!("/{resource}/{id}"))
    }

    // --- employees ---

    pub fn list_employees(&self) -> anyhow::Result<Vec<Employee>> {
        self.cached_list("/usuarios")
    }

    pub fn get_employee(&self, id: u64) -> anyhow::Result<Employee> {
        self.fetch_json(&format!("/usuarios/{id}"))
    }

    pub fn create_employee(&self, body: &serde_json::Value) -> anyhow::Result<Employee> {
        self.post_json("/usuarios", body)
    }

    pub fn update_employee(&self, id: u64, body: &serde_json::Value) -> anyhow::Result<Employee> {
        self.put_json(&format!("/usuarios/{id}"), body)
    }

    pub fn deactivate_employee(&self, id: u64) -> anyhow::Result<Employee> {
        self.put_json(
            &format!("/usuarios/{id}"),
            &serde_json::json!({"activo": false}),
        )
    }

    pub fn assign_employee_tag(&self, id: u64, tag: &str) -> anyhow::Result<serde_json::Value> {
        self.post_json(
            "/tags-rfid",
            &serde_json::json!({"codigo": tag, "usuarioId": id}),
        )
    }

    // --- shifts & events ---

    pub fn list_shifts(&self) -> anyhow::Result<Vec<Shift>> {
        self.cached_list("/horarios-laborales")
    }

    pub fn create_shift(&self, body: &serde_json::Value) -> anyhow::Result<Shift> {
        self.post_json("/horarios-laborales", body)
    }

    pub fn update_shift(&self, id: u64, body: &serde_json::Value) -> anyhow::Result<Shift> {
        self.put_json(&format!("/horarios-laborales/{id}"), body)
    }

    pub fn delete_shift(&self, id: u64) -> anyhow::Result<()> {
        self.delete(&format!("/horarios-laborales/{id}"))
    }

    pub fn list_events(&self) -> anyhow::Result<Vec<EventRecord>> {
        self.cached_list("/eventos")
    }

    pub fn create_event(&self, name: &str, date: &str) -> anyhow::Result<EventRecord> {
        self.post_json("/eventos", &serde_json::json!({"nombre": name, "fecha": date}))
    }

    // --- attendance ---

    pub fn tag_employee(&self, code: &str) -> anyhow::Result<Employee> {
        self.fetch_json(&format!("/tags-rfid/{code}/empleado"))
    }

    pub fn register_attendance(
        &self,
        code: &str,
        event: Option<u64>,
    ) -> anyhow::Result<AttendanceRecord> {
        self.post_json(
            "/asistencias/registro",
            &serde_json::json!({"tagCode": code, "eventoId": event}),
        )
    }

    pub fn list_attendance(
        &self,
        from: &str,
        to: &str,
        employee: Option<u64>,
    ) -> anyhow::Result<Vec<AttendanceRecord>> {
        let mut path = format!("/asistencias?desde={from}&hasta={to}");
        if let Some(id) = employee {
            path.push_str(&format!("&empleadoId={id}"));
        }
        self.fetch_json(&path)
    }

    pub fn exit_status(&self, employee_id: u64) -> anyhow::Result<ExitStatus> {
        self.fetch_json(&format!("/asistencias/salidas/estado/{employee_id}"))
    }

    pub fn register_exit(&self, employee_id: u64, reason: &str) -> anyhow::Result<serde_json::Value> {
        self.post_json(
            "/asistencias/salidas",
            &serde_json::json!({"empleadoId": employee_id, "motivo": reason}),
        )
    }

    pub fn register_return(&self, employee_id: u64) -> anyhow::Result<serde_json::Value> {
        self.post_json(
            "/asistencias/salidas/retorno",
            &serde_json::json!({"empleadoId": employee_id}),
        )
    }

    // --- inventory & custody ---

    pub fn list_assets(&self, place: Option<u64>) -> anyhow::Result<Vec<Asset>> {
        match place {
            Some(id) => self.fetch_json(&format!("/bienes-inmuebles?lugarId={id}")),
            None => self.cached_list("/bienes-inmuebles"),
        }
    }

    pub fn assign_asset_tag(&self, asset: u64, tag: &str) -> anyhow::Result<serde_json::Value> {
        self.post_json(
            "/tags-rfid",
            &serde_json::json!({"codigo": tag, "bienId": asset}),
        )
    }

    pub fn post_count(&self, place: u64, code: &str) -> anyhow::Result<CountAck> {
        self.post_json(
            "/inventarios/conteo",
            &serde_json::json!({"lugarId": place, "tagCode": code}),
        )
    }

    pub fn inventory_status(&self, place: u64) -> anyhow::Result<PlaceInventoryStatus> {
        self.fetch_json(&format!("/monitoreo/inventarios/{place}"))
    }

    pub fn create_custody(
        &self,
        from_employee: u64,
        to_employee: u64,
        assets: &[u64],
        notes: Option<&str>,
    ) -> anyhow::Result<CustodyDocument> {
        self.post_json(
            "/historial-inventarios",
            &serde_json::json!({
                "origenId": from_employee,
                "destinoId": to_employee,
                "bienes": assets,
                "observaciones": notes,
            }),
        )
    }

    pub fn list_custody(&self) -> anyhow::Result<Vec<CustodyDocument>> {
        self.fetch_json("/historial-inventarios")
    }

    pub fn get_custody(&self, id: u64) -> anyhow::Result<CustodyDocument> {
        self.fetch_json(&format!("/historial-inventarios/{id}"))
    }

    /// Activity log is volatile; always fetched live, never cached.
    pub fn list_logs(&self) -> anyhow::Result<Vec<LogEntry>> {
        self.fetch_json("/logs")
    }

    // --- reports ---

    pub fn download_report(
        &self,
        kind: &str,
        from: &str,
        to: &str,
        format: ReportFormat,
    ) -> anyhow::Result<Vec<u8>> {
        let path = format!(
            "/reportes/{kind}?desde={from}&hasta={to}&formato={}",
            format.extension()
        );
        let resp = self
            .request(reqwest::Method::GET, &path)
            .send()
            .map_err(into_network)?;
        let resp = Self::check(resp, &path)?;
        Ok(resp.bytes().map_err(into_network)?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_statuses_keep_backend_message() {
        let err = classify_status(422, Some("nombre requerido".into()), "/usuarios");
        assert_eq!(err.code(), "VALIDATION");
        assert_eq!(err.to_string(), "nombre requerido");
    }

    #[test]
    fn conflict_without_payload_gets_generic_message() {
        let err = classify_status(409, None, "/departamentos");
        assert_eq!(err.code(), "CONFLICT");
        assert!(err.to_string().contains("duplicate record"));
    }

    #[test]
    fn not_found_names_the_resource() {
        let err = classify_status(404, None, "/tags-rfid/XYZ/empleado");
        assert_eq!(err.code(), "NOT_FOUND");
        assert!(err.to_string().contains("/tags-rfid/XYZ/empleado"));
    }

    #[test]
    fn auth_statuses_map_to_auth_required() {
        assert_eq!(classify_status(401, None, "/x").code(), "AUTH_REQUIRED");
        assert_eq!(classify_status(403, None, "/x").code(), "AUTH_REQUIRED");
    }

    #[test]
    fn unknown_statuses_fall_through() {
        let err = classify_status(500, None, "/x");
        assert_eq!(err.code(), "API");
        assert!(err.to_string().contains("500"));
    }
}
