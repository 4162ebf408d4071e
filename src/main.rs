use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use cadence::cli::args::{Cli, Commands};
use cadence::cli::commands;
use cadence::config::{Config, Paths};
use cadence::logging;
use cadence::storage::Database;
use cadence::TaskService;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Completions need neither config nor a database
    if let Commands::Completions { shell } = cli.command {
        print!("{}", commands::completions(shell)?);
        return Ok(());
    }

    let paths = Paths::resolve(cli.data_dir)?;
    let config = Config::load_from_path(&paths.config_file)?;
    logging::init(&config.general.log_level);
    config.general.color.apply();

    let format = cli.output.unwrap_or(config.general.default_output);
    let user = cli.user.unwrap_or_else(|| config.general.default_user.clone());

    let db = Database::open(&paths)?;
    let svc = TaskService::new(&db, config.tasks.defaults());
    tracing::debug!(user = %user, db = %paths.database.display(), "opened task database");

    let output = match cli.command {
        Commands::Add(args) => commands::add(&svc, &user, args, format)?,
        Commands::List(args) => commands::list(&svc, &user, args, format)?,
        Commands::Show { id } => commands::show(&svc, &user, &id, format)?,
        Commands::Complete { id } => commands::set_completed(&svc, &user, &id, Some(true), format)?,
        Commands::Reopen { id } => commands::set_completed(&svc, &user, &id, Some(false), format)?,
        Commands::Toggle { id } => commands::set_completed(&svc, &user, &id, None, format)?,
        Commands::Edit(args) => commands::edit(&svc, &user, args, format)?,
        Commands::Delete { id } => commands::delete(&svc, &user, &id, format)?,
        Commands::ClearCompleted => commands::clear_completed(&svc, &user, format)?,
        Commands::Calendar { year, month } => commands::calendar(&svc, &user, year, month, format)?,
        Commands::Stats { days } => commands::stats(&svc, &user, usize::from(days), format)?,
        Commands::Reminders => commands::reminders(&svc, &user, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
