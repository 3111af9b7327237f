//! primdb Command-Line Interface
//!
//! An interactive shell over a primdb data directory.
//!
//! # Usage
//!
//! ```bash
//! # Start interactive REPL in the current directory
//! primdb
//!
//! # Use another data directory
//! primdb --data-dir ./db
//!
//! # Execute a single command
//! primdb -c "list_tables"
//!
//! # Execute commands from a file, answering yes to every prompt
//! primdb -y -f setup.txt
//!
//! # Output as JSON
//! primdb -o json -c "select from users"
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod formatter;
mod repl;
mod session;

use primdb_engine::JsonStore;

use config::CliConfig;
use formatter::OutputFormat;
use repl::Repl;
use session::{Reply, Session, StdinConfirm};

/// primdb command-line interface
#[derive(Parser, Debug)]
#[command(
    name = "primdb",
    version,
    about = "A small file-backed table store",
    long_about = "A small file-backed table store with typed columns.\n\n\
                  Schemas live in db_meta.json and each table's rows in data/<table>.json\n\
                  under the data directory."
)]
struct Args {
    /// Directory holding db_meta.json and data/
    #[arg(short = 'D', long, value_name = "DIR", env = "PRIMDB_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Execute a single command and exit
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Execute commands from file, one per line, and exit
    #[arg(short = 'f', long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum)]
    output: Option<OutputFormatArg>,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Suppress banner (for scripting)
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    init_config: bool,
}

/// Output format argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    /// Display results in a formatted table
    Table,
    /// Display results as JSON
    Json,
    /// Display results as CSV
    Csv,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Table => OutputFormat::Table,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Csv => OutputFormat::Csv,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose);

    if args.init_config {
        return init_config(&args);
    }

    // Load configuration
    let config = load_config(&args)?;
    let format = match args.output {
        Some(arg) => arg.into(),
        None => config.format()?,
    };

    let session = Session::open(&config, format)?;

    // Determine execution mode
    if let Some(command) = &args.command {
        execute_command(session, command);
        Ok(())
    } else if let Some(file) = &args.file {
        execute_file(session, file)
    } else {
        run_repl(&config, session, args.quiet)
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("primdb_cli=debug,primdb_engine=debug,primdb_common=debug")
    } else {
        EnvFilter::new("primdb_cli=warn,primdb_engine=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<CliConfig> {
    // Try to load from config file
    let mut config = if let Some(path) = &args.config {
        CliConfig::from_file(path)?
    } else {
        CliConfig::load_default()?
    };

    apply_args(&mut config, args);
    Ok(config)
}

/// Writes defaults plus command line overrides to `--config` or the default
/// config path.
fn init_config(args: &Args) -> Result<()> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => CliConfig::default_config_path().context("no config directory on this platform")?,
    };

    let mut config = CliConfig::default();
    if let Some(arg) = args.output {
        config.output_format = OutputFormat::from(arg).to_string();
    }
    apply_args(&mut config, args);

    config
        .save(&path)
        .with_context(|| format!("failed to write config file {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Overrides configuration with command line arguments.
fn apply_args(config: &mut CliConfig, args: &Args) {
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if args.yes {
        config.assume_yes = true;
    }
}

fn print_reply(reply: Reply) -> bool {
    match reply {
        Reply::Empty => {}
        Reply::Output(text) => println!("{}", text),
        Reply::Error(text) => eprintln!("{}", text),
        Reply::Exit => return false,
    }
    true
}

fn execute_command(mut session: Session<JsonStore>, line: &str) {
    info!("Executing command: {}", line);
    print_reply(session.handle(line, &mut StdinConfirm));
}

fn execute_file(mut session: Session<JsonStore>, path: &Path) -> Result<()> {
    info!("Executing file: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    // A failing line is reported and the run continues
    for line in content.lines() {
        if !print_reply(session.handle(line, &mut StdinConfirm)) {
            break;
        }
    }

    Ok(())
}

fn run_repl(config: &CliConfig, session: Session<JsonStore>, quiet: bool) -> Result<()> {
    let mut repl = Repl::new(config, session)?;

    if !quiet {
        repl.print_banner();
    }

    repl.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "primdb",
            "--data-dir",
            "/tmp/db",
            "-o",
            "json",
            "-y",
            "-c",
            "list_tables",
        ])
        .unwrap();

        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/db")));
        assert!(matches!(args.output, Some(OutputFormatArg::Json)));
        assert!(args.yes);
        assert_eq!(args.command.as_deref(), Some("list_tables"));
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from(["primdb", "-D", "/srv/db", "--yes"]).unwrap();

        let mut config = CliConfig::builder().data_dir("/etc/db").build();
        apply_args(&mut config, &args);

        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/db")));
        assert!(config.assume_yes);
    }

    #[test]
    fn test_init_config_writes_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("primdb").join("config.toml");
        let args = Args::try_parse_from([
            "primdb",
            "--init-config",
            "--config",
            path.to_str().unwrap(),
            "-D",
            "/srv/db",
            "-o",
            "csv",
        ])
        .unwrap();

        init_config(&args).unwrap();

        let config = CliConfig::from_file(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/db")));
        assert_eq!(config.output_format, "csv");
    }

    #[test]
    fn test_print_reply() {
        assert!(print_reply(Reply::Empty));
        assert!(print_reply(Reply::Output("ok".to_string())));
        assert!(!print_reply(Reply::Exit));
    }
}
