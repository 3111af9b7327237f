//! Command line parsing.
//!
//! Turns one input line into a [`Statement`]. The parser only checks shape;
//! table, column, and value checks happen when the statement runs against the
//! catalog.
//!
//! # Grammar
//!
//! ```text
//! create_table <name> <col:type>...
//! drop_table <name>
//! list_tables
//! insert into <name> values (<v1>, <v2>, ...)
//! select from <name> [where <col> = <val>]
//! update <name> set <col> = <val> where <col> = <val>
//! delete from <name> where <col> = <val>
//! info <name>
//! ```
//!
//! Command names are case-sensitive. The keywords `into`, `values`, `from`,
//! `where` and `set` match in any case. Quoted text keeps its quotes so the
//! `str` cast can see them.

use std::fmt;
use std::str::FromStr;

use primdb_common::{DbError, DbResult};

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `create_table`.
    CreateTable {
        /// Table name.
        table: String,
        /// Raw `name:type` specs.
        columns: Vec<String>,
    },
    /// `drop_table`.
    DropTable {
        /// Table name.
        table: String,
    },
    /// `list_tables`.
    ListTables,
    /// `insert into ... values (...)`.
    Insert {
        /// Table name.
        table: String,
        /// Raw values in schema order, quotes preserved.
        values: Vec<String>,
    },
    /// `select from ... [where ...]`.
    Select {
        /// Table name.
        table: String,
        /// Optional filter.
        filter: Option<Clause>,
    },
    /// `update ... set ... where ...`.
    Update {
        /// Table name.
        table: String,
        /// Assignment.
        set: Clause,
        /// Filter.
        filter: Clause,
    },
    /// `delete from ... where ...`.
    Delete {
        /// Table name.
        table: String,
        /// Filter.
        filter: Clause,
    },
    /// `info`.
    Info {
        /// Table name.
        table: String,
    },
}

/// An unbound `column = value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// Column name.
    pub column: String,
    /// Raw value text, quotes preserved.
    pub value: String,
}

impl Clause {
    /// Creates a clause.
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.column, self.value)
    }
}

/// Command names, in the order `help` lists them.
pub const COMMANDS: &[&str] = &[
    "create_table",
    "drop_table",
    "list_tables",
    "insert",
    "select",
    "update",
    "delete",
    "info",
];

impl Statement {
    /// Parses one command line.
    pub fn parse(line: &str) -> DbResult<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Err(DbError::invalid_value("empty command"));
        }

        let (command, rest) = split_word(line);
        match command {
            "create_table" => parse_create_table(rest),
            "drop_table" => Ok(Statement::DropTable {
                table: single_name(rest, "drop_table <name>")?,
            }),
            "list_tables" => {
                if !rest.is_empty() {
                    return Err(usage("list_tables"));
                }
                Ok(Statement::ListTables)
            }
            "insert" => parse_insert(rest),
            "select" => parse_select(rest),
            "update" => parse_update(rest),
            "delete" => parse_delete(rest),
            "info" => Ok(Statement::Info {
                table: single_name(rest, "info <name>")?,
            }),
            other => Err(DbError::unknown_command(other)),
        }
    }

    /// Returns the command name.
    pub fn name(&self) -> &'static str {
        match self {
            Statement::CreateTable { .. } => "create_table",
            Statement::DropTable { .. } => "drop_table",
            Statement::ListTables => "list_tables",
            Statement::Insert { .. } => "insert",
            Statement::Select { .. } => "select",
            Statement::Update { .. } => "update",
            Statement::Delete { .. } => "delete",
            Statement::Info { .. } => "info",
        }
    }

    /// Returns the table the statement targets, if any.
    pub fn table(&self) -> Option<&str> {
        match self {
            Statement::ListTables => None,
            Statement::CreateTable { table, .. }
            | Statement::DropTable { table }
            | Statement::Insert { table, .. }
            | Statement::Select { table, .. }
            | Statement::Update { table, .. }
            | Statement::Delete { table, .. }
            | Statement::Info { table } => Some(table),
        }
    }

    /// Returns true for statements that change persisted state.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Statement::ListTables | Statement::Select { .. } | Statement::Info { .. }
        )
    }
}

impl FromStr for Statement {
    type Err = DbError;

    fn from_str(line: &str) -> DbResult<Self> {
        Self::parse(line)
    }
}

fn parse_create_table(rest: &str) -> DbResult<Statement> {
    let mut tokens = tokenize(rest)?.into_iter();
    let table = tokens
        .next()
        .ok_or_else(|| usage("create_table <name> <col:type>..."))?;

    Ok(Statement::CreateTable {
        table,
        columns: tokens.collect(),
    })
}

fn parse_insert(rest: &str) -> DbResult<Statement> {
    const USAGE: &str = "insert into <name> values (<v1>, <v2>, ...)";

    let rest = expect_keyword(rest, "into").ok_or_else(|| usage(USAGE))?;
    let (table, rest) = split_name(rest).ok_or_else(|| usage(USAGE))?;
    let rest = expect_keyword(rest, "values").ok_or_else(|| usage(USAGE))?;

    let inner = rest
        .trim_end()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| usage(USAGE))?;
    check_quotes(inner)?;

    let values = if inner.trim().is_empty() {
        Vec::new()
    } else {
        split_outside_quotes(inner, ',')
            .into_iter()
            .map(|value| value.trim().to_string())
            .collect()
    };

    Ok(Statement::Insert {
        table: table.to_string(),
        values,
    })
}

fn parse_select(rest: &str) -> DbResult<Statement> {
    const USAGE: &str = "select from <name> [where <col> = <val>]";

    let rest = expect_keyword(rest, "from").ok_or_else(|| usage(USAGE))?;
    let (table, rest) = split_name(rest).ok_or_else(|| usage(USAGE))?;

    let filter = if rest.is_empty() {
        None
    } else {
        let condition = expect_keyword(rest, "where").ok_or_else(|| usage(USAGE))?;
        Some(parse_clause(condition)?)
    };

    Ok(Statement::Select {
        table: table.to_string(),
        filter,
    })
}

fn parse_update(rest: &str) -> DbResult<Statement> {
    const USAGE: &str = "update <name> set <col> = <val> where <col> = <val>";

    let (table, rest) = split_name(rest).ok_or_else(|| usage(USAGE))?;
    let rest = expect_keyword(rest, "set").ok_or_else(|| usage(USAGE))?;

    let at = find_keyword(rest, "where").ok_or_else(|| usage(USAGE))?;
    let (assignment, condition) = rest.split_at(at);
    let condition = expect_keyword(condition, "where").ok_or_else(|| usage(USAGE))?;

    Ok(Statement::Update {
        table: table.to_string(),
        set: parse_clause(assignment)?,
        filter: parse_clause(condition)?,
    })
}

fn parse_delete(rest: &str) -> DbResult<Statement> {
    const USAGE: &str = "delete from <name> where <col> = <val>";

    let rest = expect_keyword(rest, "from").ok_or_else(|| usage(USAGE))?;
    let (table, rest) = split_name(rest).ok_or_else(|| usage(USAGE))?;
    let condition = expect_keyword(rest, "where").ok_or_else(|| usage(USAGE))?;

    Ok(Statement::Delete {
        table: table.to_string(),
        filter: parse_clause(condition)?,
    })
}

/// Parses `column = value`, splitting on the first `=` outside quotes.
fn parse_clause(raw: &str) -> DbResult<Clause> {
    check_quotes(raw)?;

    let at = outside_quotes(raw)
        .find(|&(_, c)| c == '=')
        .map(|(i, _)| i)
        .ok_or_else(|| DbError::invalid_value(format!("expected <col> = <val>, got {raw:?}")))?;

    let column = raw[..at].trim();
    let value = raw[at + 1..].trim();
    if column.is_empty() || value.is_empty() || column.contains(char::is_whitespace) {
        return Err(DbError::invalid_value(format!(
            "expected <col> = <val>, got {raw:?}"
        )));
    }

    Ok(Clause::new(column, value))
}

fn usage(form: &str) -> DbError {
    DbError::invalid_value(format!("usage: {form}"))
}

fn single_name(rest: &str, form: &str) -> DbResult<String> {
    let tokens = tokenize(rest)?;
    match tokens.as_slice() {
        [name] => Ok(name.clone()),
        _ => Err(usage(form)),
    }
}

/// Splits off the first whitespace-delimited word.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(at) => (&s[..at], s[at..].trim_start()),
        None => (s, ""),
    }
}

/// Splits off a table name, which ends at whitespace or `(`.
fn split_name(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    let end = s
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some((&s[..end], s[end..].trim_start()))
}

/// Strips a leading keyword, matched in any case. The keyword must end at
/// whitespace, `(`, or the end of input.
fn expect_keyword<'a>(s: &'a str, keyword: &str) -> Option<&'a str> {
    let s = s.trim_start();
    let head = s.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }

    let rest = &s[keyword.len()..];
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || c == '(' => Some(rest.trim_start()),
        Some(_) => None,
    }
}

/// Byte offset of `keyword` as a standalone word outside quotes.
fn find_keyword(s: &str, keyword: &str) -> Option<usize> {
    outside_quotes(s).map(|(i, _)| i).find(|&i| {
        let preceded = s[..i].chars().next_back().map_or(true, char::is_whitespace);
        let word_ends = s
            .get(i + keyword.len()..)
            .map_or(false, |rest| rest.chars().next().map_or(true, char::is_whitespace));

        preceded
            && word_ends
            && s.get(i..i + keyword.len())
                .map_or(false, |word| word.eq_ignore_ascii_case(keyword))
    })
}

/// Splits on whitespace, keeping quoted runs (and their quotes) whole.
fn tokenize(s: &str) -> DbResult<Vec<String>> {
    check_quotes(s)?;

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in s.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c == '"' || c == '\'' => {
                current.push(c);
                quote = Some(c);
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Splits on `separator` where it appears outside quotes.
fn split_outside_quotes(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in outside_quotes(s) {
        if c == separator {
            parts.push(&s[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Characters outside quoted runs, with their byte offsets. Quote characters
/// themselves are skipped.
fn outside_quotes(s: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut quote: Option<char> = None;
    s.char_indices().filter(move |&(_, c)| match quote {
        Some(q) => {
            if c == q {
                quote = None;
            }
            false
        }
        None if c == '"' || c == '\'' => {
            quote = Some(c);
            false
        }
        None => true,
    })
}

fn check_quotes(s: &str) -> DbResult<()> {
    let mut quote: Option<char> = None;
    for c in s.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None => {}
        }
    }

    match quote {
        Some(_) => Err(DbError::invalid_value(format!("unterminated quote in {s:?}"))),
        None => Ok(()),
    }
}
