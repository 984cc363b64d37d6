use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "media-finder")]
#[command(about = "Index media files and the directories they live in", long_about = None)]
pub struct Cli {
    /// Database file (overrides db_path in Config.toml)
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Walk, record files, then extract steps and details
    Process(RootArgs),
    /// Walk and record matching files only
    Scan(RootArgs),
    /// Rebuild directory steps for every recorded file
    ExtractSteps,
    /// Re-parse details for every recorded file
    ExtractDetails,
    /// Print what the parser makes of one or more filenames
    Parse {
        #[arg(required = true)]
        filenames: Vec<String>,
    },
    /// List recorded files with their details
    Show {
        #[arg(long, default_value_t = 50)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
    /// List the directory steps recorded for one file
    Steps { file_id: i64 },
    /// Write the catalog of recorded files to a CSV file
    Export { out: String },
    /// Print configuration values
    PrintConfig,
    /// Truncate all database tables
    TruncateDb,
}

#[derive(Debug, Args)]
pub struct RootArgs {
    /// Root directory to search (repeatable, overrides root_paths)
    #[arg(long = "root")]
    pub roots: Vec<String>,
    /// File extension to match, e.g. `.mkv` (repeatable, overrides extensions)
    #[arg(long = "ext")]
    pub extensions: Vec<String>,
}
