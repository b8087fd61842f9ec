//! Physical-asset surface: scan-driven counts, asset listings, custody
//! documents and report downloads.

use crate::cli::{Cli, Commands, CustodyCommands, InventoryCommands, ReportCommands};
use crate::commands::{key_source, AppContext};
use crate::domain::models::{Asset, CustodyDocument};
use crate::services::kiosk::run_count;
use crate::services::listing::select_page;
use crate::services::output::{print_one, print_page};
use crate::services::reports;
use crate::services::storage::audit;

pub fn handle(cli: &Cli, ctx: &AppContext) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Inventory { command } => {
            inventory(ctx, command)?;
            Ok(true)
        }
        Commands::Custody { command } => {
            custody(ctx, command)?;
            Ok(true)
        }
        Commands::Report { command } => {
            report(ctx, command)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn asset_row(a: &Asset) -> String {
    format!(
        "{}\t{}\t{}",
        a.id,
        a.name,
        a.tag.as_deref().unwrap_or("untagged")
    )
}

fn inventory(ctx: &AppContext, command: &InventoryCommands) -> anyhow::Result<()> {
    match command {
        InventoryCommands::Count { place, feed } => {
            let keys = key_source(feed)?;
            let summary = run_count(&ctx.api, ctx.scan, keys, *place)?;
            print_one(ctx.json, summary, |s| {
                let progress = s
                    .last_status
                    .as_ref()
                    .map(|st| format!(", {}/{} counted at this place", st.counted, st.total))
                    .unwrap_or_default();
                format!(
                    "{} scans counted, {} unknown tags{}",
                    s.counted, s.unknown_tags, progress
                )
            })
        }
        InventoryCommands::List { place, page } => {
            let rows = ctx.api.list_assets(*place)?;
            print_page(ctx.json, select_page(rows, page, |a| a.name.clone()), asset_row)
        }
        InventoryCommands::Status { place } => {
            let status = ctx.api.inventory_status(*place)?;
            print_one(ctx.json, status, |s| {
                format!("place {}: {}/{} counted", s.place_id, s.counted, s.total)
            })
        }
        InventoryCommands::AssignTag { asset, tag } => {
            let out = ctx.api.assign_asset_tag(*asset, tag)?;
            audit(
                "asset_assign_tag",
                serde_json::json!({"bienId": asset, "tag": tag}),
            );
            print_one(ctx.json, out, |_| format!("tag {tag} assigned to asset {asset}"))
        }
    }
}

fn custody_row(d: &CustodyDocument) -> String {
    format!(
        "{}\t{}\t{} -> {}\t{} assets",
        d.id,
        d.folio.as_deref().unwrap_or("-"),
        d.from_employee,
        d.to_employee,
        d.assets.len()
    )
}

fn custody(ctx: &AppContext, command: &CustodyCommands) -> anyhow::Result<()> {
    match command {
        CustodyCommands::Create {
            from_employee,
            to_employee,
            assets,
            notes,
        } => {
            let doc = ctx
                .api
                .create_custody(*from_employee, *to_employee, assets, notes.as_deref())?;
            audit(
                "custody_create",
                serde_json::json!({"id": doc.id, "bienes": assets}),
            );
            print_one(ctx.json, doc, custody_row)
        }
        CustodyCommands::List { page } => {
            let rows = ctx.api.list_custody()?;
            print_page(
                ctx.json,
                select_page(rows, page, |d| d.folio.clone().unwrap_or_default()),
                custody_row,
            )
        }
        CustodyCommands::Show { id } => {
            let doc = ctx.api.get_custody(*id)?;
            print_one(ctx.json, doc, custody_row)
        }
    }
}

fn report(ctx: &AppContext, command: &ReportCommands) -> anyhow::Result<()> {
    let (kind, range) = match command {
        ReportCommands::Attendance { range } => ("asistencias", range),
        ReportCommands::Inventory { range } => ("inventarios", range),
    };
    let out = reports::download(&ctx.api, kind, range)?;
    audit(
        "report_download",
        serde_json::json!({"kind": kind, "path": out.path}),
    );
    print_one(ctx.json, out, |r| {
        format!("wrote {} ({} bytes)", r.path, r.bytes)
    })
}
