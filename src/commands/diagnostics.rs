//! Offline diagnostics: replay a recorded scan trace through the capture
//! engine and validate a shift form without a backend.

use crate::cli::{Cli, Commands, ScanCommands, ShiftCommands, ShiftFormArgs};
use crate::domain::models::{ReplayReport, ShiftCheckReport};
use crate::services::output::print_one;
use crate::services::scan::{parse_trace, ScanConfig, ScanSession};
use crate::services::shifts::validate_shift;
use anyhow::Context;
use std::io::BufReader;
use std::path::Path;

pub fn handle(cli: &Cli) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Scan {
            command: ScanCommands::Replay {
                trace,
                min_len,
                gap_ms,
            },
        } => {
            replay(cli, trace, *min_len, *gap_ms)?;
            Ok(true)
        }
        Commands::Shift {
            command: ShiftCommands::Check { form },
        } => {
            check_shift(cli, form)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn replay(
    cli: &Cli,
    trace: &Path,
    min_len: Option<usize>,
    gap_ms: Option<u64>,
) -> anyhow::Result<()> {
    let file =
        std::fs::File::open(trace).with_context(|| format!("open trace {}", trace.display()))?;
    let keys = parse_trace(BufReader::new(file))?;

    let mut cfg = ScanConfig::default();
    if let Some(min) = min_len {
        cfg.min_len = min;
    }
    if let Some(gap) = gap_ms {
        cfg.gap_ms = gap;
    }

    let mut session = ScanSession::new(cfg);
    session.arm();
    let mut emitted = Vec::new();
    for key in keys {
        if let Some(code) = session.push(key) {
            emitted.push(code);
        }
    }
    let stats = session.stats();
    session.disarm();

    print_one(
        cli.json,
        ReplayReport {
            keys: stats.keys,
            emitted,
            rejected_short: stats.rejected_short,
            stale_discards: stats.stale_discards,
        },
        |r| {
            format!(
                "{} keys, {} tags [{}], {} short, {} stale",
                r.keys,
                r.emitted.len(),
                r.emitted.join(", "),
                r.rejected_short,
                r.stale_discards
            )
        },
    )
}

fn check_shift(cli: &Cli, form: &ShiftFormArgs) -> anyhow::Result<()> {
    let issues = validate_shift(form);
    print_one(
        cli.json,
        ShiftCheckReport {
            valid: issues.is_empty(),
            issues,
        },
        |r| {
            if r.valid {
                "valid".to_string()
            } else {
                r.issues
                    .iter()
                    .map(|i| format!("{}: {}", i.field, i.message))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        },
    )
}
