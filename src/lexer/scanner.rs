use std::iter::Peekable;
use std::vec;

use super::token::Position;

/// Character cursor feeding the lexer
///
/// `None` from [`Scanner::next_char`] is the end-of-input sentinel. Pushing a
/// character back with [`Scanner::back`] exactly undoes the position update
/// of the `next_char` call that produced it, and may be repeated any number
/// of times.
pub trait Scanner {
    /// Returns the next character and advances the position
    fn next_char(&mut self) -> Option<char>;

    /// Pushes a character back onto the input
    fn back(&mut self, c: char);

    /// Current position in the text
    fn position(&self) -> Position;

    /// True once the pushback stack is empty and the source is exhausted
    fn is_empty(&mut self) -> bool;

    /// Looks at the next character without consuming it
    fn peek(&mut self) -> Option<char> {
        let c = self.next_char();
        if let Some(c) = c {
            self.back(c);
        }
        c
    }
}

/// Scanner over any character iterator
pub struct CharScanner<I: Iterator<Item = char>> {
    source: Peekable<I>,
    /// Characters pushed back, top of stack last
    pushback: Vec<char>,
    position: Position,
    /// Column at which each finished line ended, so a pushed-back
    /// newline can restore it
    line_widths: Vec<usize>,
}

impl CharScanner<vec::IntoIter<char>> {
    /// Creates a scanner that owns a copy of `source`
    pub fn from_source(source: &str) -> Self {
        CharScanner::new(source.chars().collect::<Vec<_>>().into_iter())
    }
}

impl<I: Iterator<Item = char>> CharScanner<I> {
    /// Creates a scanner over a character iterator
    pub fn new(source: I) -> Self {
        CharScanner {
            source: source.peekable(),
            pushback: Vec::new(),
            position: Position::default(),
            line_widths: Vec::new(),
        }
    }
}

impl<I: Iterator<Item = char>> Scanner for CharScanner<I> {
    fn next_char(&mut self) -> Option<char> {
        let c = match self.pushback.pop() {
            Some(c) => c,
            None => self.source.next()?,
        };

        if c == '\n' {
            self.line_widths.push(self.position.column);
            self.position.line += 1;
            self.position.column = 0;
        } else {
            self.position.column += 1;
        }
        Some(c)
    }

    fn back(&mut self, c: char) {
        if c == '\n' {
            self.position.line = self.position.line.saturating_sub(1);
            self.position.column = self.line_widths.pop().unwrap_or(0);
        } else {
            self.position.column = self.position.column.saturating_sub(1);
        }
        self.pushback.push(c);
    }

    fn position(&self) -> Position {
        self.position
    }

    fn is_empty(&mut self) -> bool {
        self.pushback.is_empty() && self.source.peek().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_reproduces_source() {
        let source = "(a\n b)";
        let mut scanner = CharScanner::from_source(source);
        let read: String = std::iter::from_fn(|| scanner.next_char()).collect();
        assert_eq!(read, source);
        assert_eq!(scanner.next_char(), None);
        assert!(scanner.is_empty());
    }

    #[test]
    fn test_position_advances() {
        let mut scanner = CharScanner::from_source("ab\nc");
        scanner.next_char();
        scanner.next_char();
        assert_eq!(scanner.position(), Position::new(0, 2));
        scanner.next_char();
        assert_eq!(scanner.position(), Position::new(1, 0));
        scanner.next_char();
        assert_eq!(scanner.position(), Position::new(1, 1));
    }

    #[test]
    fn test_back_restores_position_across_newline() {
        let mut scanner = CharScanner::from_source("abc\nd");
        for _ in 0..4 {
            scanner.next_char();
        }
        assert_eq!(scanner.position(), Position::new(1, 0));

        scanner.back('\n');
        assert_eq!(scanner.position(), Position::new(0, 3));
        assert_eq!(scanner.peek(), Some('\n'));
        assert_eq!(scanner.position(), Position::new(0, 3));
    }

    #[test]
    fn test_repeated_back() {
        let mut scanner = CharScanner::from_source("xyz");
        let x = scanner.next_char().unwrap();
        let y = scanner.next_char().unwrap();
        scanner.back(y);
        scanner.back(x);
        assert_eq!(scanner.position(), Position::default());
        assert_eq!(scanner.next_char(), Some('x'));
        assert_eq!(scanner.next_char(), Some('y'));
        assert_eq!(scanner.next_char(), Some('z'));
    }

    #[test]
    fn test_empty_on_back() {
        let mut scanner = CharScanner::from_source("q");
        let q = scanner.next_char().unwrap();
        assert!(scanner.is_empty());
        scanner.back(q);
        assert!(!scanner.is_empty());
    }

    #[test]
    fn test_peek_at_end() {
        let mut scanner = CharScanner::from_source("");
        assert_eq!(scanner.peek(), None);
        assert_eq!(scanner.position(), Position::default());
    }
}
