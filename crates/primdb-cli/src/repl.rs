//! Interactive REPL (Read-Eval-Print-Loop) for primdb.
//!
//! Provides an interactive shell with command history, line editing, and
//! command-name completion. Destructive statements ask for confirmation on
//! the same line editor.

use std::path::PathBuf;

use anyhow::Result;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, EditMode, Editor, Helper};
use tracing::{debug, error};

use primdb_engine::{Confirm, JsonStore, COMMANDS};

use crate::commands::META_COMMANDS;
use crate::config::CliConfig;
use crate::session::{is_yes, Reply, Session};

/// The REPL prompt shown when waiting for input.
const PROMPT: &str = "primdb> ";

/// Keywords used inside statements.
const KEYWORDS: &[&str] = &["into", "values", "from", "where", "set", "int", "str", "bool"];

/// REPL helper for rustyline.
struct ReplHelper {
    /// Words offered for completion.
    words: Vec<&'static str>,
}

impl ReplHelper {
    fn new() -> Self {
        let mut words: Vec<&'static str> = COMMANDS
            .iter()
            .chain(META_COMMANDS)
            .chain(KEYWORDS)
            .copied()
            .collect();
        words.sort_unstable();
        words.dedup();
        Self { words }
    }

    fn candidates(&self, word: &str) -> Vec<Pair> {
        self.words
            .iter()
            .filter(|candidate| candidate.starts_with(word))
            .map(|candidate| Pair {
                display: candidate.to_string(),
                replacement: candidate.to_string(),
            })
            .collect()
    }
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Find the word being typed
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace() || c == '(' || c == ',')
            .map(|i| i + 1)
            .unwrap_or(0);

        Ok((start, self.candidates(&line[start..pos])))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;
}

impl Highlighter for ReplHelper {}

impl Validator for ReplHelper {}

impl Helper for ReplHelper {}

type LineEditor = Editor<ReplHelper, DefaultHistory>;

/// Asks for confirmation on the line editor.
struct EditorConfirm<'a> {
    editor: &'a mut LineEditor,
}

impl Confirm for EditorConfirm<'_> {
    fn confirm(&mut self, action: &str) -> bool {
        let prompt = format!("Are you sure you want to {}? [y/n]: ", action);
        match self.editor.readline(&prompt) {
            Ok(answer) => is_yes(&answer),
            Err(e) => {
                debug!("confirmation aborted: {}", e);
                false
            }
        }
    }
}

/// Interactive REPL for primdb.
pub struct Repl {
    /// The session running statements.
    session: Session<JsonStore>,
    /// The rustyline editor.
    editor: LineEditor,
    /// History file path.
    history_file: Option<PathBuf>,
}

impl Repl {
    /// Creates a new REPL instance.
    pub fn new(config: &CliConfig, session: Session<JsonStore>) -> Result<Self> {
        let rl_config = Config::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .max_history_size(config.history_size)?
            .build();

        let mut editor = Editor::with_config(rl_config)?;
        editor.set_helper(Some(ReplHelper::new()));

        // Try to load history
        let history_file = config.history_path();
        if let Some(ref path) = history_file {
            if path.exists() {
                if let Err(e) = editor.load_history(path) {
                    debug!("Failed to load history: {}", e);
                }
            }
        }

        Ok(Self {
            session,
            editor,
            history_file,
        })
    }

    /// Prints the welcome banner.
    pub fn print_banner(&self) {
        println!("primdb v{}", env!("CARGO_PKG_VERSION"));
        println!("Type help for commands, exit to quit.\n");
    }

    /// Runs the main REPL loop.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    // Add to history
                    if let Err(e) = self.editor.add_history_entry(line) {
                        debug!("Failed to add history entry: {}", e);
                    }

                    let mut confirm = EditorConfirm {
                        editor: &mut self.editor,
                    };
                    match self.session.handle(line, &mut confirm) {
                        Reply::Empty => {}
                        Reply::Output(text) => println!("{}", text),
                        Reply::Error(text) => eprintln!("{}", text),
                        Reply::Exit => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    // Cancel current input but don't exit
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("exit");
                    break;
                }
                Err(e) => {
                    error!("Readline error: {}", e);
                    break;
                }
            }
        }

        // Save history
        self.save_history();

        println!("Goodbye!");
        Ok(())
    }

    /// Saves command history.
    fn save_history(&mut self) {
        if let Some(ref path) = self.history_file {
            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    debug!("Failed to create history dir: {}", e);
                    return;
                }
            }
            if let Err(e) = self.editor.save_history(path) {
                debug!("Failed to save history: {}", e);
            }
        }
    }
}
