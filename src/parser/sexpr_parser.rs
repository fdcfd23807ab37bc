use std::sync::Arc;

use super::ast::{leading_digits, node_from_token, Node};
use crate::error::Error;
use crate::lexer::{Position, Token, TokenKind};

/// Open container on the parser's path
struct Frame {
    children: Vec<Arc<Node>>,
    constant: bool,
}

impl Frame {
    fn new(constant: bool) -> Self {
        Frame {
            children: Vec::new(),
            constant,
        }
    }
}

/// Finished tree plus everything reported while building it
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// Root of the tree
    pub root: Node,
    /// Problems reported and recovered from, in order of detection
    pub diagnostics: Vec<Error>,
}

/// Incremental S-expression parser
///
/// Consumes one token per [`SExprParser::put`] call and never fails: problems
/// are recorded as diagnostics and skipped, and [`SExprParser::finish`]
/// always yields a tree.
pub struct SExprParser {
    /// Open containers; the bottom frame is the root and is never popped
    path: Vec<Frame>,
    /// Position of a tick waiting for the node it quotes
    pending_tick: Option<Position>,
    diagnostics: Vec<Error>,
}

impl SExprParser {
    /// Creates a parser holding an empty root
    pub fn new() -> Self {
        SExprParser {
            path: vec![Frame::new(false)],
            pending_tick: None,
            diagnostics: Vec::new(),
        }
    }

    /// Parses a whole token stream
    pub fn parse_tokens<I: IntoIterator<Item = Token>>(tokens: I) -> ParseOutput {
        let mut parser = SExprParser::new();
        for token in tokens {
            parser.put(token);
        }
        parser.finish()
    }

    /// Number of lists currently open
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    /// Problems reported so far
    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    /// Feeds one token into the tree
    pub fn put(&mut self, token: Token) {
        match token.kind {
            TokenKind::Comment => {}
            TokenKind::Tick => self.pending_tick = Some(token.position),
            TokenKind::BeginParen => {
                let constant = self.take_tick();
                self.path.push(Frame::new(constant));
            }
            TokenKind::EndParen => {
                self.discard_dangling_tick();
                if self.path.len() > 1 {
                    self.close_top();
                } else {
                    self.report(Error::UnmatchedParen {
                        line: token.position.line,
                        col: token.position.column,
                    });
                }
            }
            TokenKind::EndAllParen => {
                self.discard_dangling_tick();
                self.close_all();
            }
            TokenKind::Error => {
                self.discard_dangling_tick();
                self.report(Error::LexError {
                    line: token.position.line,
                    col: token.position.column,
                    message: token.lexeme,
                });
            }
            TokenKind::Num => {
                if leading_digits(&token.lexeme).len() != token.lexeme.len() {
                    self.report_malformed_number(&token.lexeme, token.position);
                }
                let constant = self.take_tick();
                self.append(node_from_token(&token).with_constant(constant));
            }
            TokenKind::Ident | TokenKind::String => {
                let constant = self.take_tick();
                self.append(node_from_token(&token).with_constant(constant));
            }
        }
    }

    /// Closes any lists still open and returns the tree
    pub fn finish(mut self) -> ParseOutput {
        if self.depth() > 0 {
            tracing::debug!(open = self.depth(), "closing lists left open at end of input");
        }
        self.discard_dangling_tick();
        self.close_all();

        let root = match self.path.pop() {
            Some(frame) => Node::root(frame.children),
            None => Node::root(Vec::new()),
        };
        ParseOutput {
            root,
            diagnostics: self.diagnostics,
        }
    }

    fn append(&mut self, node: Node) {
        if let Some(top) = self.path.last_mut() {
            top.children.push(Arc::new(node));
        }
    }

    /// Pops the innermost list and attaches it to its parent
    fn close_top(&mut self) {
        if let Some(frame) = self.path.pop() {
            let list = Node::list(frame.children).with_constant(frame.constant);
            self.append(list);
        }
    }

    fn close_all(&mut self) {
        while self.path.len() > 1 {
            self.close_top();
        }
    }

    /// Consumes a pending tick; true if the next node is quoted
    fn take_tick(&mut self) -> bool {
        self.pending_tick.take().is_some()
    }

    /// Reports a tick that was followed by something other than a node
    fn discard_dangling_tick(&mut self) {
        if let Some(position) = self.pending_tick.take() {
            self.report(Error::DanglingTick {
                line: position.line,
                col: position.column,
            });
        }
    }

    fn report_malformed_number(&mut self, lexeme: &str, position: Position) {
        self.report(Error::MalformedNumber {
            line: position.line,
            col: position.column,
            lexeme: lexeme.to_string(),
        });
    }

    fn report(&mut self, error: Error) {
        tracing::warn!(%error, "parse diagnostic");
        self.diagnostics.push(error);
    }
}

impl Default for SExprParser {
    fn default() -> Self {
        Self::new()
    }
}
