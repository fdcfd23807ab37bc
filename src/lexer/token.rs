use serde::{Deserialize, Serialize};

/// Location in the source text, both coordinates 0-indexed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number
    pub line: usize,
    /// Column within the line
    pub column: usize,
}

impl Position {
    /// Creates a position from a line and column
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Source text of the token (the diagnostic, for `Error` tokens)
    pub lexeme: String,
    /// Position of the token's first character
    pub position: Position,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }
}

/// All token categories produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Opening parenthesis `(`
    BeginParen,
    /// Closing parenthesis `)`
    EndParen,
    /// `]`, closes every open list
    EndAllParen,
    /// Identifier
    Ident,
    /// Digit-led numeric literal
    Num,
    /// Delimited string literal (lexeme excludes the delimiters)
    String,
    /// Quote tick `'`
    Tick,
    /// `#` comment (lexeme excludes the `#`)
    Comment,
    /// Lexical error; the lexer produces nothing after one of these
    Error,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            TokenKind::BeginParen => "BeginParen",
            TokenKind::EndParen => "EndParen",
            TokenKind::EndAllParen => "EndAllParen",
            TokenKind::Ident => "Ident",
            TokenKind::Num => "Num",
            TokenKind::String => "String",
            TokenKind::Tick => "Tick",
            TokenKind::Comment => "Comment",
            TokenKind::Error => "Error",
        };
        f.write_str(name)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}({:?})@{}", self.kind, self.lexeme, self.position)
    }
}
