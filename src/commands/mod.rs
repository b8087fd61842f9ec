//! Command handlers. Each module owns one slice of the CLI tree and returns
//! `Ok(true)` when it recognized and ran the command, so `main` can try the
//! offline handlers first and only then build an authenticated context.
//!
//! ## Handler map
//! - `session.rs` — login/logout/whoami (no session required).
//! - `diagnostics.rs` — offline tools: scan trace replay, shift check.
//! - `directory.rs` — catalog, employee, shift and event administration.
//! - `attendance.rs` — kiosks, single registrations, attendance queries.
//! - `inventory.rs` — counts, asset listings, custody documents, reports.

pub mod attendance;
pub mod diagnostics;
pub mod directory;
pub mod inventory;
pub mod session;

use crate::api::Api;
use crate::cli::{Cli, ScanFeedArgs, DEFAULT_SERVER};
use crate::services::scan::{parse_trace, stdin_keys, KeyPress, ScanConfig};
use crate::services::session::require_session;
use crate::services::storage::load_config;
use anyhow::Context;
use std::io::BufReader;

/// Shared state for the authenticated command handlers.
pub struct AppContext {
    pub api: Api,
    pub json: bool,
    pub scan: ScanConfig,
}

impl AppContext {
    /// Resolve config and the stored session. Server precedence: the
    /// `--server` flag, then the config file, then the stored session's
    /// server, then the default.
    pub fn init(cli: &Cli) -> anyhow::Result<Self> {
        let config = load_config()?;
        let session = require_session()?;
        let server = cli
            .server
            .clone()
            .or(config.general.server.clone())
            .unwrap_or_else(|| session.server.clone());
        let api = Api::new(&server, Some(session.token), config.general.request_timeout_ms)?;
        let mut scan = ScanConfig::default();
        if let Some(gap) = config.general.scan_gap_ms {
            scan.gap_ms = gap;
        }
        if let Some(min) = config.general.scan_min_len {
            scan.min_len = min;
        }
        Ok(Self {
            api,
            json: cli.json,
            scan,
        })
    }
}

/// Server for unauthenticated calls (login), same precedence minus the
/// stored session.
pub fn resolve_server(cli: &Cli) -> anyhow::Result<String> {
    let config = load_config()?;
    Ok(cli
        .server
        .clone()
        .or(config.general.server)
        .unwrap_or_else(|| DEFAULT_SERVER.to_string()))
}

/// Key source for a scan loop: a recorded trace when `--replay` is given,
/// the badge reader on stdin otherwise.
pub fn key_source(feed: &ScanFeedArgs) -> anyhow::Result<Box<dyn Iterator<Item = KeyPress>>> {
    match &feed.replay {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("open trace {}", path.display()))?;
            let keys = parse_trace(BufReader::new(file))?;
            Ok(Box::new(keys.into_iter()))
        }
        None => Ok(Box::new(stdin_keys())),
    }
}
