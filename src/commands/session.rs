//! Sign-in lifecycle. Runs before any authenticated context exists.

use crate::api::Api;
use crate::cli::{Cli, Commands};
use crate::commands::resolve_server;
use crate::services::output::print_one;
use crate::services::session::{
    decode_claims, delete_session, is_expired, load_session, save_session, StoredSession,
};
use crate::services::storage::audit;
use std::io::BufRead;

pub fn handle(cli: &Cli) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Login {
            user,
            password_stdin,
        } => {
            login(cli, user, *password_stdin)?;
            Ok(true)
        }
        Commands::Logout => {
            let removed = delete_session()?;
            audit("logout", serde_json::json!({}));
            print_one(
                cli.json,
                serde_json::json!({"signed_out": removed}),
                |_| {
                    if removed {
                        "signed out".to_string()
                    } else {
                        "no active session".to_string()
                    }
                },
            )?;
            Ok(true)
        }
        Commands::Whoami => {
            whoami(cli)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn read_password(from_stdin: bool) -> anyhow::Result<String> {
    if !from_stdin {
        eprint!("password: ");
    }
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn login(cli: &Cli, user: &str, password_stdin: bool) -> anyhow::Result<()> {
    let server = resolve_server(cli)?;
    let password = read_password(password_stdin)?;
    let resp = Api::login(&server, user, &password)?;
    let claims = decode_claims(&resp.token)?;
    save_session(&StoredSession {
        token: resp.token,
        server: server.clone(),
    })?;
    audit("login", serde_json::json!({"usuario": user, "server": server}));
    print_one(
        cli.json,
        serde_json::json!({
            "user": claims.name.clone().unwrap_or_else(|| user.to_string()),
            "role": claims.role,
            "server": server,
        }),
        |d| format!("signed in as {}", d["user"].as_str().unwrap_or(user)),
    )
}

fn whoami(cli: &Cli) -> anyhow::Result<()> {
    let session = load_session()?.ok_or(crate::api::ApiError::AuthRequired)?;
    let claims =
        decode_claims(&session.token).map_err(|_| crate::api::ApiError::AuthRequired)?;
    let expired = is_expired(&claims, chrono::Utc::now().timestamp());
    print_one(
        cli.json,
        serde_json::json!({
            "user": claims.name,
            "role": claims.role,
            "server": session.server,
            "expired": expired,
        }),
        |d| {
            format!(
                "{} ({}) @ {}{}",
                d["user"].as_str().unwrap_or("?"),
                d["role"].as_str().unwrap_or("?"),
                d["server"].as_str().unwrap_or("?"),
                if expired { " [expired]" } else { "" }
            )
        },
    )
}
