use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SERVER: &str = "http://localhost:3000";

#[derive(Parser, Debug)]
#[command(name = "pase", version, about = "Attendance & asset custody admin CLI")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Backend base URL (overrides config, default http://localhost:3000)"
    )]
    pub server: Option<String>,
    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Login {
        #[arg(long)]
        user: String,
        #[arg(long, help = "Read the password from stdin instead of prompting")]
        password_stdin: bool,
    },
    Logout,
    Whoami,
    Department {
        #[command(subcommand)]
        command: CrudCommands,
    },
    Category {
        #[command(subcommand)]
        command: CrudCommands,
    },
    Place {
        #[command(subcommand)]
        command: CrudCommands,
    },
    Employee {
        #[command(subcommand)]
        command: EmployeeCommands,
    },
    Shift {
        #[command(subcommand)]
        command: ShiftCommands,
    },
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },
    Attendance {
        #[command(subcommand)]
        command: AttendanceCommands,
    },
    Inventory {
        #[command(subcommand)]
        command: InventoryCommands,
    },
    Custody {
        #[command(subcommand)]
        command: CustodyCommands,
    },
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    Scan {
        #[command(subcommand)]
        command: ScanCommands,
    },
    /// Backend activity log.
    Logs {
        #[command(flatten)]
        page: PageArgs,
    },
}

/// Shared list/create/update/remove tree for the simple catalog resources
/// (departments, categories, places).
#[derive(Subcommand, Debug)]
pub enum CrudCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Remove {
        id: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum EmployeeCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long, help = "Restrict to one department id")]
        department: Option<u64>,
    },
    Show {
        id: u64,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        department: u64,
        #[arg(long)]
        role: Option<String>,
    },
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        department: Option<u64>,
        #[arg(long)]
        role: Option<String>,
    },
    Deactivate {
        id: u64,
    },
    AssignTag {
        id: u64,
        tag: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShiftCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Create {
        #[command(flatten)]
        form: ShiftFormArgs,
    },
    Update {
        id: u64,
        #[command(flatten)]
        form: ShiftFormArgs,
    },
    Remove {
        id: u64,
    },
    /// Validate a shift definition offline, without touching the backend.
    Check {
        #[command(flatten)]
        form: ShiftFormArgs,
    },
}

#[derive(clap::Args, Debug)]
pub struct ShiftFormArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, help = "Shift start, 24h HH:mm")]
    pub start: String,
    #[arg(long, help = "Shift end, 24h HH:mm")]
    pub end: String,
    #[arg(long, help = "Lunch start, required for shifts ending after 12:00")]
    pub lunch_start: Option<String>,
    #[arg(long)]
    pub lunch_end: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum EventCommands {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Create {
        name: String,
        #[arg(long, help = "Event date, YYYY-MM-DD")]
        date: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AttendanceCommands {
    /// Check-in/out kiosk: arms the scanner and registers every valid tag.
    Kiosk {
        #[command(flatten)]
        feed: ScanFeedArgs,
        #[arg(long, help = "Disarm after the first successful registration")]
        once: bool,
        #[arg(long, help = "Attribute registrations to an event id")]
        event: Option<u64>,
    },
    /// Temporary-exit kiosk: tracks mid-shift exits and returns.
    Exits {
        #[command(flatten)]
        feed: ScanFeedArgs,
        #[arg(long, help = "Disarm after the first resolved scan")]
        once: bool,
        #[arg(long, help = "Exit reason for non-interactive runs")]
        reason: Option<String>,
    },
    /// Register a single tag without arming a scan loop.
    Check {
        tag: String,
        #[arg(long)]
        event: Option<u64>,
    },
    /// Temporary-exit status for one employee.
    Status { employee: u64 },
    List {
        #[arg(long, help = "YYYY-MM-DD")]
        from: String,
        #[arg(long, help = "YYYY-MM-DD")]
        to: String,
        #[arg(long)]
        employee: Option<u64>,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum InventoryCommands {
    /// Scan-driven inventory count for one place.
    Count {
        #[arg(long)]
        place: u64,
        #[command(flatten)]
        feed: ScanFeedArgs,
    },
    List {
        #[arg(long)]
        place: Option<u64>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Current counted/total snapshot for one place.
    Status { place: u64 },
    AssignTag {
        asset: u64,
        tag: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CustodyCommands {
    Create {
        #[arg(long)]
        from_employee: u64,
        #[arg(long)]
        to_employee: u64,
        #[arg(long, value_delimiter = ',', help = "Asset ids, comma separated")]
        assets: Vec<u64>,
        #[arg(long)]
        notes: Option<String>,
    },
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Show { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    Attendance {
        #[command(flatten)]
        range: ReportArgs,
    },
    Inventory {
        #[command(flatten)]
        range: ReportArgs,
    },
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    #[arg(long, help = "YYYY-MM-DD")]
    pub from: String,
    #[arg(long, help = "YYYY-MM-DD")]
    pub to: String,
    #[arg(long, value_enum, default_value_t = ReportFormat::Pdf)]
    pub format: ReportFormat,
    #[arg(long, help = "Output file (default: derived from the date range)")]
    pub out: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ScanCommands {
    /// Feed a recorded key trace through the scan engine, offline.
    Replay {
        trace: PathBuf,
        #[arg(long, help = "Override the minimum tag length")]
        min_len: Option<usize>,
        #[arg(long, help = "Override the staleness gap in milliseconds")]
        gap_ms: Option<u64>,
    },
}

#[derive(clap::Args, Debug)]
pub struct ScanFeedArgs {
    #[arg(long, help = "Replay a key trace file instead of reading the badge reader")]
    pub replay: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct PageArgs {
    #[arg(long, help = "Case-insensitive substring filter")]
    pub filter: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long, default_value_t = 20)]
    pub page_size: usize,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Xlsx,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Xlsx => "xlsx",
        }
    }
}
