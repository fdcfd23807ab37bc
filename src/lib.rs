//! # Crisp - A Small S-Expression Interpreter
//!
//! Crisp reads S-expressions through a character scanner and a finite-state
//! lexer, builds a tree with an incremental parser, and evaluates it with a
//! lexically scoped tree walker. Lexing and parsing run as two concurrent
//! tasks joined by a bounded channel.
//!
//! ## Features
//!
//! - **State-machine lexer** - one token at a time, positions for every token
//! - **Incremental parser** - fed token by token, always yields a tree
//! - **Closures** - `lambda` captures its defining scope
//! - **Errors as values** - undefined names and bad calls evaluate to error nodes
//! - **Backpressure** - the lexer stalls once the parser falls behind
//!
//! ## Quick Start
//!
//! ```rust
//! use crisp::{Node, Session};
//!
//! # fn main() -> crisp::Result<()> {
//! let session = Session::new();
//! let output = session.run_source(r#"
//!     (def id (lambda (a) a))
//!     (id 7)
//! "#)?;
//!
//! assert_eq!(output.last_value(), Some(&Node::num(7)));
//! # Ok(())
//! # }
//! ```
//!
//! ### Driving the stages by hand
//!
//! ```rust
//! use crisp::{Evaluator, Parser, SExprLexer, Scope};
//!
//! let lexer = SExprLexer::from_source("(quote (a b)) 'x");
//! let parsed = Parser::parse_tokens(lexer);
//! let result = Evaluator::new().eval(&parsed.root, &Scope::global());
//!
//! assert_eq!(result.to_string(), "(a b)\nx");
//! ```
//!
//! ## Language Overview
//!
//! - `(f a b)` calls `f` with the evaluated `a` and `b`
//! - `'x` is the literal `x`; `(quote x)` does the same
//! - `]` closes every open list
//! - `#` starts a comment that runs to the end of the line
//! - Builtins: `def`, `lambda`, `quote`, `not`; booleans are bound as `#t` and `#f`
//!
//! ## Architecture
//!
//! ```text
//! Scanner → Lexer ⇒ Channel ⇒ Parser → Node tree → Evaluator → Node
//! ```
//!
//! - [`CharScanner`] - character cursor with unlimited pushback
//! - [`Lexer`] - finite-state tokenizer
//! - [`Channel`] - bounded blocking queue between the lexer and parser tasks
//! - [`Parser`] - incremental tree builder
//! - [`Evaluator`] - tree walker over chained [`Scope`]s
//! - [`Session`] - configuration plus a persistent global scope

/// Version of the Crisp interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod lexer;
pub mod parallel;
pub mod parser;
pub mod runtime;
pub mod session;

// Re-export main types
pub use config::Config;
pub use error::{Error, Result};
pub use lexer::{CharScanner, Position, SExprLexer, Scanner, Token, TokenKind};
pub use parallel::{Channel, Pipeline};
pub use parser::{node_from_token, Node, NodeKind, ParseOutput, SExprParser};
pub use runtime::{Builtin, Callable, Closure, Evaluator, Scope};
pub use session::{Session, SessionOutput};

/// Type alias for the S-expression lexer.
/// Converts scanner characters into tokens.
pub type Lexer<S> = SExprLexer<S>;

/// Type alias for the S-expression parser.
/// Builds a node tree from tokens.
pub type Parser = SExprParser;
