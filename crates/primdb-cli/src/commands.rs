//! Meta commands for the REPL.
//!
//! Provides `help`, `exit`, `timing`, `format` and `stats`. Anything else on
//! the line is a database statement.

use crate::formatter::OutputFormat;

/// Result of executing a command.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Exit the REPL.
    Exit,
    /// Output a message.
    Output(String),
    /// Toggle timing mode.
    ToggleTiming,
    /// Set output format.
    SetFormat(OutputFormat),
    /// Show cache and statement statistics.
    ShowStats,
}

/// A parsed command.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Quit the REPL.
    Quit,
    /// Show help.
    Help,
    /// Toggle timing.
    Timing,
    /// Set output format.
    Format(Option<String>),
    /// Show statistics.
    Stats,
}

/// Meta command names, for completion.
pub const META_COMMANDS: &[&str] = &["help", "exit", "quit", "timing", "format", "stats"];

impl Command {
    /// Parses a meta command. Returns `None` if the line is a statement.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();

        let (name, args) = match input.split_once(char::is_whitespace) {
            Some((name, args)) => (name, Some(args.trim())),
            None => (input, None),
        };

        match (name, args) {
            ("exit" | "quit", None) => Some(Command::Quit),
            ("help", None) => Some(Command::Help),
            ("timing", None) => Some(Command::Timing),
            ("stats", None) => Some(Command::Stats),
            ("format", args) => Some(Command::Format(args.map(str::to_string))),
            _ => None,
        }
    }

    /// Executes the command.
    pub fn execute(&self) -> CommandResult {
        match self {
            Command::Quit => CommandResult::Exit,

            Command::Help => CommandResult::Output(Self::help_text()),

            Command::Timing => CommandResult::ToggleTiming,

            Command::Stats => CommandResult::ShowStats,

            Command::Format(None) => {
                CommandResult::Output("Usage: format <table|json|csv>".to_string())
            }

            Command::Format(Some(format)) => match format.parse() {
                Ok(format) => CommandResult::SetFormat(format),
                Err(e) => CommandResult::Output(format!("{}", e)),
            },
        }
    }

    /// Returns help text.
    fn help_text() -> String {
        r#"primdb commands
===============

Tables:
  create_table <name> <col:type> ...    Create a table (types: int, str, bool)
  drop_table <name>                     Drop a table and its rows
  list_tables                           List all tables
  info <name>                           Show columns and row count

Rows:
  insert into <name> values (<v1>, <v2>, ...)
  select from <name> [where <col> = <val>]
  update <name> set <col> = <val> where <col> = <val>
  delete from <name> where <col> = <val>

Strings are quoted: "Alice" or 'Alice'. An ID column is added to every table.

Session:
  help                                  Show this help
  timing                                Toggle timing display
  format <table|json|csv>               Set output format
  stats                                 Show cache statistics
  exit, quit                            Exit the CLI
"#
        .to_string()
    }
}
