//! Crisp parser module
//!
//! Builds a [`Node`] tree from a token stream, one token at a time.

mod ast;
mod sexpr_parser;

pub use ast::{node_from_token, Node, NodeKind};
pub use sexpr_parser::{ParseOutput, SExprParser};
