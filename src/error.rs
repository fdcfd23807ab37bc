//! Error types for the Crisp interpreter
//!
//! Semantic failures during evaluation are ordinary [`Node`](crate::parser::Node) values
//! and never show up here. This enum covers diagnostics reported by the lexer/parser
//! pipeline and failures of the surrounding infrastructure.

use thiserror::Error;

/// Crisp interpreter errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Lexical / structural diagnostics
    /// The lexer halted on a character it could not start a token with,
    /// or input ended in the middle of a list or string.
    ///
    /// **Example:** `(a {b)` (the `{` has no lexical rule)
    #[error("Lex error at line {line}, column {col}: {message}")]
    LexError {
        /// Line number where the lexer stopped (0-indexed)
        line: usize,
        /// Column number where the lexer stopped (0-indexed)
        col: usize,
        /// Diagnostic carried by the error token
        message: String,
    },

    /// A `)` arrived while no list was open
    ///
    /// **Example:** `(a b))`
    #[error("Unmatched ')' at line {line}, column {col}")]
    UnmatchedParen {
        /// Line number of the closer (0-indexed)
        line: usize,
        /// Column number of the closer (0-indexed)
        col: usize,
    },

    /// Numeric literal with trailing characters after its leading digits.
    /// The literal still evaluates to the leading digits.
    ///
    /// **Example:** `1.2.3` evaluates to `1`
    #[error("Malformed number '{lexeme}' at line {line}, column {col}: truncated to leading digits")]
    MalformedNumber {
        /// Line number of the literal (0-indexed)
        line: usize,
        /// Column number of the literal (0-indexed)
        col: usize,
        /// The full lexeme as written
        lexeme: String,
    },

    /// A `'` tick followed by a closer, an error, or end of input,
    /// so there is no node for it to quote
    ///
    /// **Example:** `(a ')`
    #[error("Dangling quote at line {line}, column {col}: nothing follows it")]
    DanglingTick {
        /// Line number of the tick (0-indexed)
        line: usize,
        /// Column number of the tick (0-indexed)
        col: usize,
    },

    // Configuration
    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be decoded
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    // Pipeline
    /// A pipeline worker panicked before it could hand back its result
    #[error("Thread join failed: {task} task panicked")]
    ThreadJoinFailed {
        /// Name of the worker task
        task: String,
    },

    /// Reading an input source failed
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Source position the diagnostic points at, if it has one
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::LexError { line, col, .. }
            | Error::UnmatchedParen { line, col }
            | Error::DanglingTick { line, col }
            | Error::MalformedNumber { line, col, .. } => Some((*line, *col)),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Result type for Crisp operations
pub type Result<T> = std::result::Result<T, Error>;
