//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep wire DTOs and report/output structs in one place.
//! - Avoid cyclic imports and duplicated type definitions.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! Wire fields use the backend's Spanish names via `#[serde(rename)]`; Rust
//! field names stay English. The backend owns every record — these are
//! transient, non-authoritative copies.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs and integration
//! contracts. Keep schema-impacting changes synchronized with
//! `docs/contracts/*`.

pub mod models;
