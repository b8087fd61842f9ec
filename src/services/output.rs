//! JSON/text output helpers. All command output funnels through here so the
//! `--json` envelope stays uniform.

use crate::domain::models::{ErrorBody, ErrorOut, JsonOut};
use serde::Serialize;

pub fn print_one<T: Serialize>(json: bool, data: T, row: impl Fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

/// Listing output: the whole page object under `--json`, rows plus a
/// page footer otherwise.
pub fn print_page<T: Serialize>(
    json: bool,
    page: crate::domain::models::Page<T>,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: true,
                data: page
            })?
        );
        return Ok(());
    }
    for item in &page.items {
        println!("{}", row(item));
    }
    println!(
        "page {}/{} ({} items)",
        page.page, page.total_pages, page.total_items
    );
    Ok(())
}

/// Failure envelope on stdout (so `--json` consumers always parse stdout),
/// plain message on stderr otherwise. The process still exits non-zero.
pub fn print_error(json: bool, code: &str, message: &str) {
    if json {
        let out = ErrorOut {
            ok: false,
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            },
        };
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{s}"),
            Err(_) => println!(r#"{{"ok":false,"error":{{"code":"API","message":"output error"}}}}"#),
        }
    } else {
        eprintln!("error: {message}");
    }
}

/// Transient, user-facing kiosk notification (the toast of the original UI).
/// Goes to stderr so scripted `--json` runs keep stdout clean.
pub fn notify(message: &str) {
    eprintln!("* {message}");
}
