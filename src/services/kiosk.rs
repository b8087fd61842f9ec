//! Scan-driven terminal flows: the attendance kiosk, the temporary-exit
//! kiosk, and the inventory count.
//!
//! Lifecycle discipline: the scan session is armed on loop entry and
//! disarmed on every exit path (end of key stream, `--once` completion, and
//! fatal errors). A failed handler never wedges the loop: the kiosk
//! notifies, waits out the recovery delay, and accepts the next badge.

use crate::api::{error_code, Api};
use crate::domain::models::{CountSummary, ExitSummary, KioskSummary};
use crate::services::exits::{ExitDecision, ExitFlow};
use crate::services::output::notify;
use crate::services::scan::{Key, KeyPress, ScanConfig, ScanSession};
use crate::services::session::{load_prefs, save_prefs};
use crate::services::storage::audit;
use std::time::{Duration, Instant};

/// Pause after a handler failure before accepting the next scan.
const RECOVERY_DELAY: Duration = Duration::from_secs(3);
/// Cadence of the inventory monitor poll while the count screen is up.
const MONITOR_POLL: Duration = Duration::from_secs(1);

/// One-time kiosk notice, acknowledged once and remembered across runs.
pub fn kiosk_notice_once() {
    let mut prefs = load_prefs();
    if prefs.kiosk_notice_acknowledged {
        return;
    }
    notify("badge scans are sent to the attendance service and kept in its records");
    prefs.kiosk_notice_acknowledged = true;
    if let Err(err) = save_prefs(&prefs) {
        log::warn!("could not persist kiosk notice acknowledgement: {err}");
    }
}

fn is_fatal(err: &anyhow::Error) -> bool {
    error_code(err) == "AUTH_REQUIRED"
}

/// Check-in/out kiosk. The backend decides whether each scan is an entrada
/// or a salida; the kiosk only relays tag codes and shows the outcome.
pub fn run_attendance(
    api: &Api,
    cfg: ScanConfig,
    keys: impl Iterator<Item = KeyPress>,
    once: bool,
    event: Option<u64>,
) -> anyhow::Result<KioskSummary> {
    let mut session = ScanSession::new(cfg);
    let mut summary = KioskSummary::default();
    session.arm();

    for press in keys {
        let Some(code) = session.push(press) else {
            continue;
        };
        match api.register_attendance(&code, event) {
            Ok(rec) => {
                summary.registered += 1;
                audit(
                    "attendance_register",
                    serde_json::json!({"empleadoId": rec.employee_id, "tipo": rec.kind}),
                );
                notify(&format!(
                    "[{}] {}: {}",
                    rec.time,
                    rec.employee_name.as_deref().unwrap_or("empleado"),
                    rec.kind
                ));
                if once {
                    break;
                }
            }
            Err(err) if error_code(&err) == "NOT_FOUND" => {
                summary.unknown_tags += 1;
                notify(&format!("unknown tag {code}, scan again"));
            }
            Err(err) if is_fatal(&err) => {
                session.disarm();
                return Err(err);
            }
            Err(err) => {
                summary.recovered_failures += 1;
                notify(&format!("registration failed ({err}), retry in a moment"));
                std::thread::sleep(RECOVERY_DELAY);
            }
        }
    }

    session.disarm();
    Ok(summary)
}

/// Read free text from the key stream until Enter; this is the reason form,
/// consumed while the scan session itself is disarmed.
fn collect_line(keys: &mut impl Iterator<Item = KeyPress>) -> Option<String> {
    let mut line = String::new();
    for press in keys.by_ref() {
        match press.key {
            Key::Enter => return Some(line.trim().to_string()),
            Key::Char(c) => line.push(c),
        }
    }
    None
}

/// Temporary-exit kiosk. Each resolved badge is classified against the
/// employee's exit status before anything is registered; the scan session
/// is held open across that round-trip so a second badge cannot race it.
pub fn run_exits(
    api: &Api,
    cfg: ScanConfig,
    mut keys: impl Iterator<Item = KeyPress>,
    once: bool,
    fixed_reason: Option<&str>,
) -> anyhow::Result<ExitSummary> {
    let mut session = ScanSession::new(cfg);
    let mut flow = ExitFlow::new();
    let mut summary = ExitSummary::default();
    session.arm();

    while let Some(press) = keys.next() {
        let Some(code) = session.push(press) else {
            continue;
        };

        let employee = match api.tag_employee(&code) {
            Ok(e) => e,
            Err(err) if error_code(&err) == "NOT_FOUND" => {
                summary.unknown_tags += 1;
                notify(&format!("unknown tag {code}, scan again"));
                continue;
            }
            Err(err) if is_fatal(&err) => {
                session.disarm();
                return Err(err);
            }
            Err(err) => {
                notify(&format!("lookup failed ({err}), retry in a moment"));
                std::thread::sleep(RECOVERY_DELAY);
                continue;
            }
        };

        flow.begin();
        let status = match api.exit_status(employee.id) {
            Ok(s) => s,
            Err(err) => {
                flow.settle();
                if is_fatal(&err) {
                    session.disarm();
                    return Err(err);
                }
                notify(&format!("status query failed ({err}), retry in a moment"));
                std::thread::sleep(RECOVERY_DELAY);
                continue;
            }
        };

        match flow.on_status(status) {
            ExitDecision::RegisterReturn => {
                match api.register_return(employee.id) {
                    Ok(_) => {
                        summary.returns_registered += 1;
                        audit(
                            "exit_return",
                            serde_json::json!({"empleadoId": employee.id}),
                        );
                        notify(&format!("{} returned", employee.name));
                    }
                    Err(err) => {
                        notify(&format!("return registration failed: {err}"));
                        std::thread::sleep(RECOVERY_DELAY);
                    }
                }
                flow.settle();
            }
            ExitDecision::Blocked => {
                summary.blocked += 1;
                notify(&format!(
                    "{} has reached the temporary-exit limit; not registered",
                    employee.name
                ));
                flow.settle();
            }
            ExitDecision::AskReason => {
                // The raw scanner goes off while the reason form is up.
                session.disarm();
                let reason = match fixed_reason {
                    Some(r) => Some(r.to_string()),
                    None => {
                        notify(&format!("exit reason for {} (end with Enter):", employee.name));
                        collect_line(&mut keys)
                    }
                };
                match reason.filter(|r| !r.is_empty()) {
                    Some(reason) => match api.register_exit(employee.id, &reason) {
                        Ok(_) => {
                            summary.exits_registered += 1;
                            audit(
                                "exit_register",
                                serde_json::json!({"empleadoId": employee.id, "motivo": reason}),
                            );
                            notify(&format!("{} out: {reason}", employee.name));
                        }
                        Err(err) => {
                            notify(&format!("exit registration failed: {err}"));
                            std::thread::sleep(RECOVERY_DELAY);
                        }
                    },
                    None => {
                        summary.skipped_no_reason += 1;
                        notify("no reason given; exit not registered");
                    }
                }
                flow.settle();
            }
        }

        // Re-arm only once the flow has released its hold on the scanner.
        if !flow.hold_open() && !session.is_armed() {
            session.arm();
        }

        if once {
            break;
        }
    }

    session.disarm();
    Ok(summary)
}

/// Inventory count for one place. Every valid scan posts a count; between
/// scans the monitor endpoint is polled at a fixed cadence so the terminal
/// shows the counted/total progression, and the poll stops with the loop.
pub fn run_count(
    api: &Api,
    cfg: ScanConfig,
    keys: impl Iterator<Item = KeyPress>,
    place: u64,
) -> anyhow::Result<CountSummary> {
    let mut session = ScanSession::new(cfg);
    let mut summary = CountSummary::default();
    let mut last_poll: Option<Instant> = None;
    session.arm();

    let mut poll = |summary: &mut CountSummary, last_poll: &mut Option<Instant>, force: bool| {
        if !force && last_poll.is_some_and(|t| t.elapsed() < MONITOR_POLL) {
            return;
        }
        *last_poll = Some(Instant::now());
        match api.inventory_status(place) {
            Ok(status) => {
                notify(&format!("counted {}/{}", status.counted, status.total));
                summary.last_status = Some(status);
            }
            Err(err) => log::debug!("monitor poll failed: {err}"),
        }
    };

    poll(&mut summary, &mut last_poll, true);
    for press in keys {
        poll(&mut summary, &mut last_poll, false);
        let Some(code) = session.push(press) else {
            continue;
        };
        match api.post_count(place, &code) {
            Ok(ack) => {
                summary.counted += 1;
                audit(
                    "inventory_count",
                    serde_json::json!({"lugarId": place, "tagCode": code}),
                );
                notify(&format!(
                    "counted {}",
                    ack.asset_name.as_deref().unwrap_or(&code)
                ));
                poll(&mut summary, &mut last_poll, true);
            }
            Err(err) if error_code(&err) == "NOT_FOUND" => {
                summary.unknown_tags += 1;
                notify(&format!("unknown tag {code}, scan again"));
            }
            Err(err) if is_fatal(&err) => {
                session.disarm();
                return Err(err);
            }
            Err(err) => {
                summary.recovered_failures += 1;
                notify(&format!("count failed ({err}), retry in a moment"));
                std::thread::sleep(RECOVERY_DELAY);
            }
        }
    }

    session.disarm();
    Ok(summary)
}
