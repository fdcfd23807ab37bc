use super::scanner::{CharScanner, Scanner};
use super::token::{Position, Token, TokenKind};

/// Characters allowed after the first character of an identifier,
/// besides alphanumerics and `_`
const IDENT_SYMBOLS: &str = "+-*/`~!@$%^&*_=|?\\;:<>,.";

/// Delimiter that opens and closes a string literal
const STRING_DELIM: char = '"';

/// Where the machine resumes after discarding whitespace or a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// Outside every list; end of input is a clean stop
    TopLevel,
    /// Inside at least one list; end of input is an error
    InList,
}

/// Lexer states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Chooses the next state from the upcoming character
    Dispatch(Context),
    Whitespace(Context),
    Comment(Context),
    Ident,
    Num,
    Tick,
    String,
    Delim,
    /// Terminal: no more tokens, ever
    Done,
}

/// Finite-state tokenizer for S-expressions
///
/// Each state consumes zero or more characters and either completes a token
/// or hands over to another state. [`SExprLexer::next_token`] steps the
/// machine until a token is ready or the terminal state is reached.
pub struct SExprLexer<S: Scanner> {
    scanner: S,
    state: State,
    paren_depth: usize,
}

impl SExprLexer<CharScanner<std::vec::IntoIter<char>>> {
    /// Creates a lexer over a copy of `source`
    pub fn from_source(source: &str) -> Self {
        SExprLexer::new(CharScanner::from_source(source))
    }
}

impl<S: Scanner> SExprLexer<S> {
    /// Creates a lexer reading from `scanner`
    pub fn new(scanner: S) -> Self {
        SExprLexer {
            scanner,
            state: State::Dispatch(Context::TopLevel),
            paren_depth: 0,
        }
    }

    /// Number of lists currently open
    pub fn paren_depth(&self) -> usize {
        self.paren_depth
    }

    /// True once the machine is terminal
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Produces the next token, or `None` when the machine is terminal
    pub fn next_token(&mut self) -> Option<Token> {
        while self.state != State::Done {
            let (token, next) = self.step(self.state);
            self.state = next;
            if let Some(token) = token {
                tracing::trace!(%token, "lexed token");
                return Some(token);
            }
        }
        None
    }

    fn step(&mut self, state: State) -> (Option<Token>, State) {
        match state {
            State::Dispatch(context) => self.dispatch(context),
            State::Whitespace(context) => self.whitespace(context),
            State::Comment(context) => self.comment(context),
            State::Ident => self.ident(),
            State::Num => self.num(),
            State::Tick => self.tick(),
            State::String => self.string(),
            State::Delim => self.delim(),
            State::Done => (None, State::Done),
        }
    }

    fn context(&self) -> Context {
        if self.paren_depth > 0 {
            Context::InList
        } else {
            Context::TopLevel
        }
    }

    fn resume(&self) -> State {
        State::Dispatch(self.context())
    }

    fn dispatch(&mut self, context: Context) -> (Option<Token>, State) {
        let position = self.scanner.position();
        match self.scanner.peek() {
            None => match context {
                Context::TopLevel => (None, State::Done),
                Context::InList => (
                    Some(Token::new(
                        TokenKind::Error,
                        format!(
                            "unexpected end of input with {} open list(s)",
                            self.paren_depth
                        ),
                        position,
                    )),
                    State::Done,
                ),
            },
            Some(c) if is_whitespace(c) => (None, State::Whitespace(context)),
            Some('#') => (None, State::Comment(context)),
            Some('(' | ')' | ']') => (None, State::Delim),
            Some('\'') => (None, State::Tick),
            Some(STRING_DELIM) => (None, State::String),
            Some(c) if c.is_alphabetic() => (None, State::Ident),
            Some(c) if c.is_ascii_digit() => (None, State::Num),
            Some(c) => {
                self.scanner.next_char();
                (
                    Some(Token::new(
                        TokenKind::Error,
                        format!("unexpected character '{}'", c),
                        position,
                    )),
                    State::Done,
                )
            }
        }
    }

    fn whitespace(&mut self, context: Context) -> (Option<Token>, State) {
        while let Some(c) = self.scanner.next_char() {
            if !is_whitespace(c) {
                self.scanner.back(c);
                break;
            }
        }
        (None, State::Dispatch(context))
    }

    fn comment(&mut self, context: Context) -> (Option<Token>, State) {
        let position = self.scanner.position();
        self.scanner.next_char(); // '#'

        let mut text = String::new();
        while let Some(c) = self.scanner.next_char() {
            if c == '\n' {
                self.scanner.back(c);
                break;
            }
            text.push(c);
        }
        (
            Some(Token::new(TokenKind::Comment, text, position)),
            State::Dispatch(context),
        )
    }

    /// Consumes the first character, then every following character
    /// accepted by `accept`
    fn take_while(&mut self, accept: fn(char) -> bool) -> (String, Position) {
        let position = self.scanner.position();
        let mut lexeme = String::new();
        if let Some(first) = self.scanner.next_char() {
            lexeme.push(first);
        }
        while let Some(c) = self.scanner.next_char() {
            if !accept(c) {
                self.scanner.back(c);
                break;
            }
            lexeme.push(c);
        }
        (lexeme, position)
    }

    fn ident(&mut self) -> (Option<Token>, State) {
        let (lexeme, position) = self.take_while(is_ident_char);
        (
            Some(Token::new(TokenKind::Ident, lexeme, position)),
            self.resume(),
        )
    }

    fn num(&mut self) -> (Option<Token>, State) {
        let (lexeme, position) = self.take_while(|c| c.is_ascii_digit() || c == '.');
        (
            Some(Token::new(TokenKind::Num, lexeme, position)),
            self.resume(),
        )
    }

    fn tick(&mut self) -> (Option<Token>, State) {
        let position = self.scanner.position();
        self.scanner.next_char();
        (
            Some(Token::new(TokenKind::Tick, "'", position)),
            self.resume(),
        )
    }

    fn string(&mut self) -> (Option<Token>, State) {
        let position = self.scanner.position();
        let delim = match self.scanner.next_char() {
            Some(c) => c,
            None => return (None, self.resume()),
        };

        let mut text = String::new();
        loop {
            match self.scanner.next_char() {
                Some(c) if c == delim => break,
                Some(c) => text.push(c),
                None => {
                    return (
                        Some(Token::new(
                            TokenKind::Error,
                            "unterminated string literal",
                            position,
                        )),
                        State::Done,
                    )
                }
            }
        }
        (
            Some(Token::new(TokenKind::String, text, position)),
            self.resume(),
        )
    }

    fn delim(&mut self) -> (Option<Token>, State) {
        let position = self.scanner.position();
        let token = match self.scanner.next_char() {
            Some('(') => {
                self.paren_depth += 1;
                Token::new(TokenKind::BeginParen, "(", position)
            }
            Some(')') => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                Token::new(TokenKind::EndParen, ")", position)
            }
            Some(']') => {
                self.paren_depth = 0;
                Token::new(TokenKind::EndAllParen, "]", position)
            }
            Some(c) => {
                self.scanner.back(c);
                return (None, self.resume());
            }
            None => return (None, self.resume()),
        };
        (Some(token), self.resume())
    }
}

impl<S: Scanner> Iterator for SExprLexer<S> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || IDENT_SYMBOLS.contains(c)
}
