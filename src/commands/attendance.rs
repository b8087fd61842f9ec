//! Attendance surface: the check-in/out kiosk, the temporary-exit kiosk,
//! one-off registrations and attendance queries.

use crate::cli::{AttendanceCommands, Cli, Commands};
use crate::commands::{key_source, AppContext};
use crate::domain::models::AttendanceRecord;
use crate::services::kiosk::{kiosk_notice_once, run_attendance, run_exits};
use crate::services::listing::select_page;
use crate::services::output::{print_one, print_page};
use crate::services::storage::audit;

pub fn handle(cli: &Cli, ctx: &AppContext) -> anyhow::Result<bool> {
    let Commands::Attendance { command } = &cli.command else {
        return Ok(false);
    };
    match command {
        AttendanceCommands::Kiosk { feed, once, event } => {
            kiosk_notice_once();
            let keys = key_source(feed)?;
            let summary = run_attendance(&ctx.api, ctx.scan, keys, *once, *event)?;
            print_one(ctx.json, summary, |s| {
                format!(
                    "{} registered, {} unknown tags, {} recovered failures",
                    s.registered, s.unknown_tags, s.recovered_failures
                )
            })?;
        }
        AttendanceCommands::Exits { feed, once, reason } => {
            let keys = key_source(feed)?;
            let summary = run_exits(&ctx.api, ctx.scan, keys, *once, reason.as_deref())?;
            print_one(ctx.json, summary, |s| {
                format!(
                    "{} exits, {} returns, {} blocked, {} unknown, {} skipped",
                    s.exits_registered,
                    s.returns_registered,
                    s.blocked,
                    s.unknown_tags,
                    s.skipped_no_reason
                )
            })?;
        }
        AttendanceCommands::Check { tag, event } => {
            let rec = ctx.api.register_attendance(tag, *event)?;
            audit(
                "attendance_register",
                serde_json::json!({"empleadoId": rec.employee_id, "tipo": rec.kind}),
            );
            print_one(ctx.json, rec, attendance_row)?;
        }
        AttendanceCommands::Status { employee } => {
            let status = ctx.api.exit_status(*employee)?;
            print_one(ctx.json, status, |s| {
                match (s.limit_reached, s.pending) {
                    (true, _) => "exit limit reached".to_string(),
                    (false, true) => "out, return pending".to_string(),
                    (false, false) => "in".to_string(),
                }
            })?;
        }
        AttendanceCommands::List {
            from,
            to,
            employee,
            page,
        } => {
            let rows = ctx.api.list_attendance(from, to, *employee)?;
            print_page(
                ctx.json,
                select_page(rows, page, |r| {
                    r.employee_name.clone().unwrap_or_default()
                }),
                attendance_row,
            )?;
        }
    }
    Ok(true)
}

fn attendance_row(r: &AttendanceRecord) -> String {
    format!(
        "{} {}\t{}\t{}",
        r.date,
        r.time,
        r.employee_name.as_deref().unwrap_or("?"),
        r.kind
    )
}
