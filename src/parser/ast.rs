//! Tree data model shared by the parser and the evaluator
//!
//! The same [`Node`] type describes parsed source and evaluation results:
//! evaluating a node yields another node.

use std::fmt;
use std::sync::Arc;

use crate::lexer::{Token, TokenKind};
use crate::runtime::Callable;

/// A tree node plus its quote flag
///
/// `constant` is set when the node was written after a `'` tick. Evaluating a
/// constant node strips exactly that one layer and returns the node as is.
///
/// Dropping, comparing and printing walk the tree with an explicit worklist,
/// so nesting depth is bounded by memory rather than by the native stack.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is, with its payload
    pub kind: NodeKind,
    /// True if the node evaluates to itself
    pub constant: bool,
}

/// Node variants
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Whole script: independent top-level forms in source order
    Root(Vec<Arc<Node>>),
    /// Parenthesized list, children in source order
    List(Vec<Arc<Node>>),
    /// Identifier
    Ident(String),
    /// Integer
    Num(i64),
    /// String literal contents
    String(String),
    /// Boolean (`#t` / `#f`)
    Bool(bool),
    /// Semantic error carried as an ordinary value
    Error(String),
    /// Result of evaluating an empty list
    Null,
    /// Builtin or user closure
    Callable(Callable),
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            constant: false,
        }
    }

    /// Creates a root node
    pub fn root(children: Vec<Arc<Node>>) -> Self {
        Node::new(NodeKind::Root(children))
    }

    /// Creates a list node
    pub fn list(children: Vec<Arc<Node>>) -> Self {
        Node::new(NodeKind::List(children))
    }

    /// Creates an identifier node
    pub fn ident(name: impl Into<String>) -> Self {
        Node::new(NodeKind::Ident(name.into()))
    }

    /// Creates a number node
    pub fn num(value: i64) -> Self {
        Node::new(NodeKind::Num(value))
    }

    /// Creates a string node
    pub fn string(value: impl Into<String>) -> Self {
        Node::new(NodeKind::String(value.into()))
    }

    /// Creates a boolean node
    pub fn boolean(value: bool) -> Self {
        Node::new(NodeKind::Bool(value))
    }

    /// Creates an error node
    pub fn error(message: impl Into<String>) -> Self {
        Node::new(NodeKind::Error(message.into()))
    }

    /// Creates a null node
    pub fn null() -> Self {
        Node::new(NodeKind::Null)
    }

    /// Creates a callable node
    pub fn callable(callable: Callable) -> Self {
        Node::new(NodeKind::Callable(callable))
    }

    /// Returns this node with the constant flag set to `constant`
    pub fn with_constant(mut self, constant: bool) -> Self {
        self.constant = constant;
        self
    }

    /// Returns this node marked constant
    pub fn quoted(self) -> Self {
        self.with_constant(true)
    }

    /// Returns a copy with the constant flag removed
    pub fn unquoted(&self) -> Self {
        self.clone().with_constant(false)
    }

    /// Children of a root or list
    pub fn children(&self) -> Option<&[Arc<Node>]> {
        match &self.kind {
            NodeKind::Root(children) | NodeKind::List(children) => Some(children),
            _ => None,
        }
    }

    /// Identifier name, if this is an identifier
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// True for error nodes
    pub fn is_error(&self) -> bool {
        matches!(self.kind, NodeKind::Error(_))
    }

    /// Everything except `#f` is truthy
    pub fn is_truthy(&self) -> bool {
        !matches!(self.kind, NodeKind::Bool(false))
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Root(_) => "root",
            NodeKind::List(_) => "list",
            NodeKind::Ident(_) => "ident",
            NodeKind::Num(_) => "num",
            NodeKind::String(_) => "string",
            NodeKind::Bool(_) => "bool",
            NodeKind::Error(_) => "error",
            NodeKind::Null => "null",
            NodeKind::Callable(_) => "callable",
        }
    }
}

/// Leading run of ASCII digits in a numeric lexeme
pub(crate) fn leading_digits(lexeme: &str) -> &str {
    let end = lexeme
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(lexeme.len());
    &lexeme[..end]
}

/// Builds the leaf node for an atom token
///
/// `Num` lexemes keep only their leading digits (`"1.2.3"` becomes `1`);
/// the parser reports the truncation. Non-atom tokens produce an error node.
pub fn node_from_token(token: &Token) -> Node {
    match token.kind {
        TokenKind::Ident => Node::ident(token.lexeme.as_str()),
        TokenKind::String => Node::string(token.lexeme.as_str()),
        TokenKind::Num => match leading_digits(&token.lexeme).parse::<i64>() {
            Ok(value) => Node::num(value),
            Err(_) => Node::error(format!(
                "numeric literal '{}' is out of range",
                token.lexeme
            )),
        },
        other => Node::error(format!(
            "unexpected {} token '{}'",
            other, token.lexeme
        )),
    }
}

/// Pending output while printing a tree
enum Piece<'a> {
    Node(&'a Node),
    Text(&'static str),
}

/// Queues `children` separated by `sep` so they pop off in source order
fn push_joined<'a>(pending: &mut Vec<Piece<'a>>, children: &'a [Arc<Node>], sep: &'static str) {
    for (i, child) in children.iter().enumerate().rev() {
        pending.push(Piece::Node(&**child));
        if i > 0 {
            pending.push(Piece::Text(sep));
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut pending = vec![Piece::Node(self)];
        while let Some(piece) = pending.pop() {
            let node = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Node(node) => node,
            };

            if node.constant {
                f.write_str("'")?;
            }
            match &node.kind {
                NodeKind::Root(children) => push_joined(&mut pending, children, "\n"),
                NodeKind::List(children) => {
                    f.write_str("(")?;
                    pending.push(Piece::Text(")"));
                    push_joined(&mut pending, children, " ");
                }
                NodeKind::Ident(name) => f.write_str(name)?,
                NodeKind::Num(n) => write!(f, "{}", n)?,
                NodeKind::String(s) => write!(f, "\"{}\"", s)?,
                NodeKind::Bool(true) => f.write_str("#t")?,
                NodeKind::Bool(false) => f.write_str("#f")?,
                NodeKind::Error(message) => write!(f, "error: {}", message)?,
                NodeKind::Null => f.write_str("null")?,
                NodeKind::Callable(callable) => write!(f, "{}", callable)?,
            }
        }
        Ok(())
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.constant != b.constant {
                return false;
            }
            match (&a.kind, &b.kind) {
                (NodeKind::Root(xs), NodeKind::Root(ys))
                | (NodeKind::List(xs), NodeKind::List(ys)) => {
                    if xs.len() != ys.len() {
                        return false;
                    }
                    pending.extend(xs.iter().zip(ys).map(|(x, y)| (&**x, &**y)));
                }
                (NodeKind::Root(_) | NodeKind::List(_), _)
                | (_, NodeKind::Root(_) | NodeKind::List(_)) => return false,
                (x, y) => {
                    if x != y {
                        return false;
                    }
                }
            }
        }
        true
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = match &mut self.kind {
            NodeKind::Root(children) | NodeKind::List(children) => std::mem::take(children),
            _ => return,
        };
        // Children still shared elsewhere only lose a reference here
        while let Some(child) = pending.pop() {
            if let Ok(mut node) = Arc::try_unwrap(child) {
                if let NodeKind::Root(children) | NodeKind::List(children) = &mut node.kind {
                    pending.append(children);
                }
            }
        }
    }
}
