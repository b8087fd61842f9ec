//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `scan.rs` — RFID keystroke-capture state machine + trace parsing.
//! - `exits.rs` — temporary-exit overlay machine.
//! - `kiosk.rs` — scan-driven loops (attendance, exits, inventory count).
//! - `shifts.rs` — work-shift time validation.
//! - `session.rs` — auth token persistence + JWT payload decode.
//! - `listing.rs` — client-side filter/pagination over fetched lists.
//! - `reports.rs` — binary report download to derived filenames.
//! - `storage.rs` — config/cache paths, TOML config, audit log.
//! - `output.rs` — JSON/text output helpers and the error envelope.
//!
//! ## Conventions
//! - Prefer pure helpers where possible; the state machines take timestamps
//!   and statuses as values so they stay unit-testable.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod exits;
pub mod kiosk;
pub mod listing;
pub mod output;
pub mod reports;
pub mod scan;
pub mod session;
pub mod shifts;
pub mod storage;
