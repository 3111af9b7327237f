//! One CLI session over one database.
//!
//! Shared by the REPL and the `-c`/`-f` modes: decides whether a line is a
//! meta command or a statement, runs it, and renders the reply.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};

use primdb_engine::{Confirm, Database, JsonStore, Persistence};

use crate::commands::{Command, CommandResult};
use crate::config::CliConfig;
use crate::formatter::{self, OutputFormat};

/// What a line produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    /// Nothing to print.
    Empty,
    /// Print to stdout.
    Output(String),
    /// Print to stderr.
    Error(String),
    /// Leave the session.
    Exit,
}

/// Session state.
pub struct Session<P: Persistence> {
    db: Database<P>,
    format: OutputFormat,
    timing: bool,
    assume_yes: bool,
}

impl Session<JsonStore> {
    /// Opens the database described by `config`.
    pub fn open(config: &CliConfig, format: OutputFormat) -> Result<Self> {
        let db_config = config.database_config();
        let db = Database::open(db_config.clone())
            .with_context(|| format!("cannot open database in {}", db_config.data_dir().display()))?;

        Ok(Self::new(db, format)
            .with_timing(config.timing)
            .with_assume_yes(config.assume_yes))
    }
}

impl<P: Persistence> Session<P> {
    /// Creates a session over an open database.
    pub fn new(db: Database<P>, format: OutputFormat) -> Self {
        Self {
            db,
            format,
            timing: false,
            assume_yes: false,
        }
    }

    /// Sets whether elapsed time is shown after each statement.
    pub fn with_timing(mut self, enabled: bool) -> Self {
        self.timing = enabled;
        self
    }

    /// Sets whether confirmation prompts are skipped.
    pub fn with_assume_yes(mut self, enabled: bool) -> Self {
        self.assume_yes = enabled;
        self
    }

    /// Handles one input line. `confirm` answers destructive prompts unless
    /// the session assumes yes.
    pub fn handle(&mut self, line: &str, confirm: &mut dyn Confirm) -> Reply {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Reply::Empty;
        }

        if let Some(command) = Command::parse(line) {
            return self.apply(command.execute());
        }

        let start = Instant::now();
        let result = if self.assume_yes {
            self.db.run(line, &mut true)
        } else {
            self.db.run(line, confirm)
        };
        let elapsed = start.elapsed();

        match result {
            Ok(result) => {
                let mut output = formatter::format_result(&result, self.format);
                if self.timing {
                    output.push_str(&format!("\nTime: {:.3}ms", elapsed.as_secs_f64() * 1000.0));
                }
                Reply::Output(output)
            }
            Err(e) => Reply::Error(format!("Error: {}", e)),
        }
    }

    fn apply(&mut self, result: CommandResult) -> Reply {
        match result {
            CommandResult::Exit => Reply::Exit,
            CommandResult::Output(msg) => Reply::Output(msg),
            CommandResult::ToggleTiming => {
                self.timing = !self.timing;
                Reply::Output(format!("Timing is {}.", if self.timing { "on" } else { "off" }))
            }
            CommandResult::SetFormat(format) => {
                self.format = format;
                Reply::Output(format!("Output format set to {}.", format))
            }
            CommandResult::ShowStats => {
                let stats = self.db.stats();
                Reply::Output(format!(
                    "Statements: {} ok, {} failed\nQuery cache: {} entries, {}",
                    stats.statements,
                    stats.errors,
                    self.db.cache_len(),
                    self.db.cache_stats()
                ))
            }
        }
    }

    /// Returns the current output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Returns true if timing display is on.
    pub fn timing(&self) -> bool {
        self.timing
    }

    /// Returns the database.
    pub fn database(&self) -> &Database<P> {
        &self.db
    }
}

/// Returns true for a `y` answer, any case.
pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Asks on stdout and reads the answer from stdin. End of input is a no.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, action: &str) -> bool {
        print!("Are you sure you want to {}? [y/n]: ", action);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&answer),
        }
    }
}
