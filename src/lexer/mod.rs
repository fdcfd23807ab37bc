//! Lexical analysis for Crisp
//!
//! A character [`Scanner`] with unlimited pushback feeds the finite-state
//! [`SExprLexer`], which turns it into a stream of [`Token`]s.

mod scanner;
mod sexpr_lexer;
mod token;

pub use scanner::{CharScanner, Scanner};
pub use sexpr_lexer::SExprLexer;
pub use token::{Position, Token, TokenKind};
