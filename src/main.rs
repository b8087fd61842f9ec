mod api;
mod cli;
mod commands;
mod domain;
mod services;

use clap::Parser;
use cli::Cli;
use commands::AppContext;
use services::output::print_error;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    let result = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply();
    if let Err(err) = result {
        eprintln!("logging setup failed: {err}");
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    // Offline-capable commands run before any session gating.
    if commands::session::handle(cli)? {
        return Ok(());
    }
    if commands::diagnostics::handle(cli)? {
        return Ok(());
    }

    let ctx = AppContext::init(cli)?;
    if commands::directory::handle(cli, &ctx)? {
        return Ok(());
    }
    if commands::attendance::handle(cli, &ctx)? {
        return Ok(());
    }
    if commands::inventory::handle(cli, &ctx)? {
        return Ok(());
    }
    anyhow::bail!("unhandled command")
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(err) = run(&cli) {
        print_error(cli.json, api::error_code(&err), &err.to_string());
        std::process::exit(1);
    }
}
