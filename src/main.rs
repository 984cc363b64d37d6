mod cli;
mod logging;
mod reporter;

use std::io::{self, BufRead, Write};
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, RootArgs};
use colored::*;
use dotenv::dotenv;
use logging::LogSettings;
use media_finder::engine::{self, FinderEngine};
use media_finder::storage::{Database, Store, Table};
use media_finder::{extract, AppConfig};
use reporter::CliReporter;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let loaded = media_finder::config::load_configuration();
    let defaults = AppConfig::default();
    let settings = LogSettings::from_config(loaded.as_ref().unwrap_or(&defaults));
    let _guard = logging::init_logger(&settings);

    let mut config = match loaded {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();
    if let Some(db) = args.db {
        config.db_path = db;
    }

    match args.command {
        Some(Commands::Process(roots)) => {
            apply_root_args(&mut config, roots);
            run_process(&config)?;
        }
        Some(Commands::Scan(roots)) => {
            apply_root_args(&mut config, roots);
            let engine = FinderEngine::new(config);
            let db = engine.open_database()?;
            let (found, recorded) = engine.scan(&db, &CliReporter::new())?;
            info!(
                "{} media files found, {} newly recorded",
                format!("{}", found).green(),
                format!("{}", recorded).green(),
            );
        }
        Some(Commands::ExtractSteps) => {
            let db = open_database(&config)?;
            let edges = engine::extract_steps(&db, &CliReporter::new())?;
            info!("{} directory steps recorded", format!("{}", edges).cyan());
        }
        Some(Commands::ExtractDetails) => {
            let db = open_database(&config)?;
            let rows = engine::extract_details(&db, &CliReporter::new())?;
            info!("{} file details written", format!("{}", rows).cyan());
        }
        Some(Commands::Parse { filenames }) => {
            for filename in filenames {
                print_parsed(&filename);
            }
        }
        Some(Commands::Show { limit, offset }) => {
            let db = open_database(&config)?;
            print_catalog(&db, offset, limit)?;
        }
        Some(Commands::Steps { file_id }) => {
            let db = open_database(&config)?;
            let edges = db.step_edges_for_file(file_id)?;
            if edges.is_empty() {
                println!("No steps recorded for file {}", file_id);
            }
            for edge in edges {
                println!("{} {} {}", edge.parent, "→".dimmed(), edge.child);
            }
        }
        Some(Commands::Export { out }) => {
            let db = open_database(&config)?;
            let rows = export_catalog(&db, &out)?;
            info!("Exported {} files to {}", rows, out);
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        Some(Commands::TruncateDb) => {
            let prompt = format!("Delete every row in {}?", config.db_path);
            let stdin = io::stdin();
            if confirm(stdin.lock(), io::stdout(), &prompt)? {
                let db = open_database(&config)?;
                db.truncate_all()?;
                println!("All tables truncated");
            } else {
                println!("Nothing deleted");
            }
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn apply_root_args(config: &mut AppConfig, args: RootArgs) {
    if !args.roots.is_empty() {
        config.root_paths = args.roots;
    }
    if !args.extensions.is_empty() {
        config.extensions = args.extensions;
    }
}

fn open_database(config: &AppConfig) -> anyhow::Result<Database> {
    Database::open(&config.db_path)
        .with_context(|| format!("Error opening database {}", config.db_path))
}

fn run_process(config: &AppConfig) -> anyhow::Result<()> {
    if config.root_paths.is_empty() {
        error!("No root paths configured; set root_paths in Config.toml or pass --root");
        return Ok(());
    }

    let engine = FinderEngine::new(config.clone());
    let reporter = CliReporter::new();
    let result = engine.run(&reporter)?;

    println!();
    info!(
        "Scan: {}, Steps: {}, Details: {}",
        format!("{:.2}s", result.scan_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.steps_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.details_duration.as_secs_f64()).green(),
    );
    info!(
        "{} media files found, {} newly recorded",
        format!("{}", result.files_found).cyan(),
        format!("{}", result.files_recorded).cyan(),
    );
    info!(
        "{} directory steps, {} file details",
        format!("{}", result.step_edges).cyan(),
        format!("{}", result.details_written).cyan(),
    );

    Ok(())
}

fn print_parsed(filename: &str) {
    let parsed = extract::parse(filename);
    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    println!("{}", filename.bold());
    println!("  title:      {}", parsed.title.green());
    println!("  year:       {}", or_dash(parsed.year.map(|y| y.to_string())));
    println!("  resolution: {}", or_dash(parsed.resolution));
    println!("  codec:      {}", or_dash(parsed.codec.map(|c| c.to_string())));
}

fn print_catalog(db: &Database, offset: i64, limit: i64) -> anyhow::Result<()> {
    let total = db.count(Table::FilePaths)?;
    let entries = db.catalog(offset, limit)?;
    for entry in &entries {
        println!(
            "{:>6}  {} {} {} {}",
            entry.file_id,
            entry.title.green(),
            entry.year.map(|y| format!("({})", y)).unwrap_or_default(),
            entry.resolution.as_deref().unwrap_or_default().cyan(),
            entry.codec.as_deref().unwrap_or_default().dimmed(),
        );
        println!("        {}", entry.path.dimmed());
    }
    println!(
        "{} of {} files ({} with details)",
        entries.len(),
        total,
        db.file_details()?.len()
    );
    Ok(())
}

fn export_catalog(db: &Database, out: &str) -> anyhow::Result<usize> {
    let mut writer =
        csv::Writer::from_path(out).with_context(|| format!("Error creating {}", out))?;
    let entries = db.catalog(0, i64::MAX)?;
    for entry in &entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(entries.len())
}

/// Ask a yes/no question on `output` and read one answer from `input`.
/// Only `y` or `yes` confirms; anything else, including end of input, declines.
fn confirm<R: BufRead, W: Write>(mut input: R, mut output: W, prompt: &str) -> io::Result<bool> {
    write!(output, "{} (y/N): ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
