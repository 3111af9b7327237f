//! Confirmation gate for destructive commands.
//!
//! Dropping a table and deleting rows run only after the caller says yes.
//! Saying no is not an error: the operation reports [`Outcome::Cancelled`]
//! and leaves every piece of state untouched.

/// A yes/no decision supplied by whoever drives the engine.
pub trait Confirm {
    /// Returns true if `action` may proceed.
    fn confirm(&mut self, action: &str) -> bool;
}

/// A fixed answer, for scripted use and tests.
impl Confirm for bool {
    fn confirm(&mut self, _action: &str) -> bool {
        *self
    }
}

/// Result of an operation guarded by a [`Confirm`] gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation ran.
    Done(T),
    /// The caller declined; nothing changed.
    Cancelled,
}

impl<T> Outcome<T> {
    /// Returns true if the caller declined.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// Maps the completed value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Done(value) => Outcome::Done(f(value)),
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }
}
