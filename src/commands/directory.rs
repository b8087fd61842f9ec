//! Directory administration: catalogs (departments, categories, places),
//! employees, work shifts and events.

use crate::api::ApiError;
use crate::cli::{
    Cli, Commands, CrudCommands, EmployeeCommands, EventCommands, ShiftCommands, ShiftFormArgs,
};
use crate::commands::AppContext;
use crate::domain::models::{Department, Employee, EventRecord, LogEntry, Shift};
use crate::services::listing::select_page;
use crate::services::output::{print_one, print_page};
use crate::services::shifts::validate_shift;
use crate::services::storage::audit;

pub fn handle(cli: &Cli, ctx: &AppContext) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Department { command } => {
            catalog(ctx, "departamentos", command)?;
            Ok(true)
        }
        Commands::Category { command } => {
            catalog(ctx, "categorias", command)?;
            Ok(true)
        }
        Commands::Place { command } => {
            catalog(ctx, "lugares", command)?;
            Ok(true)
        }
        Commands::Employee { command } => {
            employee(ctx, command)?;
            Ok(true)
        }
        Commands::Shift { command } => {
            shift(ctx, command)?;
            Ok(true)
        }
        Commands::Event { command } => {
            event(ctx, command)?;
            Ok(true)
        }
        Commands::Logs { page } => {
            let rows = ctx.api.list_logs()?;
            print_page(
                ctx.json,
                select_page(rows, page, |l| {
                    format!("{} {}", l.action, l.user.as_deref().unwrap_or(""))
                }),
                log_row,
            )?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn log_row(l: &LogEntry) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        l.date.as_deref().unwrap_or("-"),
        l.user.as_deref().unwrap_or("-"),
        l.action,
        l.detail.as_deref().unwrap_or("")
    )
}

fn catalog_row(d: &Department) -> String {
    format!(
        "{}\t{}\t{}",
        d.id,
        d.name,
        d.description.as_deref().unwrap_or("")
    )
}

fn catalog(ctx: &AppContext, resource: &str, command: &CrudCommands) -> anyhow::Result<()> {
    match command {
        CrudCommands::List { page } => {
            let rows = match resource {
                "departamentos" => ctx.api.list_departments()?,
                "categorias" => ctx.api.list_categories()?,
                _ => ctx.api.list_places()?,
            };
            print_page(ctx.json, select_page(rows, page, catalog_row), catalog_row)
        }
        CrudCommands::Create { name, description } => {
            let entry = ctx
                .api
                .create_catalog_entry(resource, name, description.as_deref())?;
            audit(
                "catalog_create",
                serde_json::json!({"resource": resource, "id": entry.id}),
            );
            print_one(ctx.json, entry, catalog_row)
        }
        CrudCommands::Update {
            id,
            name,
            description,
        } => {
            let entry = ctx.api.update_catalog_entry(
                resource,
                *id,
                name.as_deref(),
                description.as_deref(),
            )?;
            audit(
                "catalog_update",
                serde_json::json!({"resource": resource, "id": id}),
            );
            print_one(ctx.json, entry, catalog_row)
        }
        CrudCommands::Remove { id } => {
            ctx.api.delete_catalog_entry(resource, *id)?;
            audit(
                "catalog_remove",
                serde_json::json!({"resource": resource, "id": id}),
            );
            print_one(
                ctx.json,
                serde_json::json!({"id": id, "deleted": true}),
                |_| format!("removed {id}"),
            )
        }
    }
}

fn employee_row(e: &Employee) -> String {
    format!(
        "{}\t{}\t{}\t{}{}",
        e.id,
        e.name,
        e.email.as_deref().unwrap_or(""),
        e.role.as_deref().unwrap_or(""),
        if e.active { "" } else { "\t[inactive]" }
    )
}

fn employee(ctx: &AppContext, command: &EmployeeCommands) -> anyhow::Result<()> {
    match command {
        EmployeeCommands::List { page, department } => {
            let mut rows = ctx.api.list_employees()?;
            if let Some(dep) = department {
                rows.retain(|e| e.department_id == Some(*dep));
            }
            print_page(
                ctx.json,
                select_page(rows, page, |e| format!("{} {}", e.name, e.email.as_deref().unwrap_or(""))),
                employee_row,
            )
        }
        EmployeeCommands::Show { id } => {
            let e = ctx.api.get_employee(*id)?;
            print_one(ctx.json, e, employee_row)
        }
        EmployeeCommands::Create {
            name,
            email,
            department,
            role,
        } => {
            let e = ctx.api.create_employee(&serde_json::json!({
                "nombre": name,
                "correo": email,
                "departamentoId": department,
                "rol": role,
            }))?;
            audit("employee_create", serde_json::json!({"id": e.id}));
            print_one(ctx.json, e, employee_row)
        }
        EmployeeCommands::Update {
            id,
            name,
            email,
            department,
            role,
        } => {
            // Only the provided fields go on the wire.
            let mut body = serde_json::Map::new();
            if let Some(v) = name {
                body.insert("nombre".into(), v.clone().into());
            }
            if let Some(v) = email {
                body.insert("correo".into(), v.clone().into());
            }
            if let Some(v) = department {
                body.insert("departamentoId".into(), (*v).into());
            }
            if let Some(v) = role {
                body.insert("rol".into(), v.clone().into());
            }
            let e = ctx.api.update_employee(*id, &body.into())?;
            audit("employee_update", serde_json::json!({"id": id}));
            print_one(ctx.json, e, employee_row)
        }
        EmployeeCommands::Deactivate { id } => {
            let e = ctx.api.deactivate_employee(*id)?;
            audit("employee_deactivate", serde_json::json!({"id": id}));
            print_one(ctx.json, e, employee_row)
        }
        EmployeeCommands::AssignTag { id, tag } => {
            let out = ctx.api.assign_employee_tag(*id, tag)?;
            audit(
                "employee_assign_tag",
                serde_json::json!({"id": id, "tag": tag}),
            );
            print_one(ctx.json, out, |_| format!("tag {tag} assigned to {id}"))
        }
    }
}

fn shift_row(s: &Shift) -> String {
    let lunch = match (&s.lunch_start, &s.lunch_end) {
        (Some(a), Some(b)) => format!(" lunch {a}-{b}"),
        _ => String::new(),
    };
    format!("{}\t{}\t{}-{}{}", s.id, s.name, s.start, s.end, lunch)
}

fn shift_body(form: &ShiftFormArgs) -> serde_json::Value {
    serde_json::json!({
        "nombre": form.name,
        "horaInicio": form.start,
        "horaFin": form.end,
        "almuerzoInicio": form.lunch_start,
        "almuerzoFin": form.lunch_end,
    })
}

/// Refuse to send an invalid shift form; all issues go into one message.
fn validated(form: &ShiftFormArgs) -> anyhow::Result<serde_json::Value> {
    let issues = validate_shift(form);
    if issues.is_empty() {
        return Ok(shift_body(form));
    }
    let message = issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(ApiError::Validation(message).into())
}

fn shift(ctx: &AppContext, command: &ShiftCommands) -> anyhow::Result<()> {
    match command {
        ShiftCommands::List { page } => {
            let rows = ctx.api.list_shifts()?;
            print_page(ctx.json, select_page(rows, page, |s| s.name.clone()), shift_row)
        }
        ShiftCommands::Create { form } => {
            let body = validated(form)?;
            let s = ctx.api.create_shift(&body)?;
            audit("shift_create", serde_json::json!({"id": s.id}));
            print_one(ctx.json, s, shift_row)
        }
        ShiftCommands::Update { id, form } => {
            let body = validated(form)?;
            let s = ctx.api.update_shift(*id, &body)?;
            audit("shift_update", serde_json::json!({"id": id}));
            print_one(ctx.json, s, shift_row)
        }
        ShiftCommands::Remove { id } => {
            ctx.api.delete_shift(*id)?;
            audit("shift_remove", serde_json::json!({"id": id}));
            print_one(
                ctx.json,
                serde_json::json!({"id": id, "deleted": true}),
                |_| format!("removed {id}"),
            )
        }
        // Handled offline in diagnostics, before any context exists.
        ShiftCommands::Check { .. } => unreachable!("offline command"),
    }
}

fn event_row(e: &EventRecord) -> String {
    format!("{}\t{}\t{}", e.id, e.name, e.date)
}

fn event(ctx: &AppContext, command: &EventCommands) -> anyhow::Result<()> {
    match command {
        EventCommands::List { page } => {
            let rows = ctx.api.list_events()?;
            print_page(ctx.json, select_page(rows, page, |e| e.name.clone()), event_row)
        }
        EventCommands::Create { name, date } => {
            let e = ctx.api.create_event(name, date)?;
            audit("event_create", serde_json::json!({"id": e.id}));
            print_one(ctx.json, e, event_row)
        }
    }
}
