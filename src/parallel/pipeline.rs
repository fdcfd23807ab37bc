//! Two-task lexer/parser pipeline
//!
//! The lexer task owns the scanner and pushes tokens into a bounded
//! [`Channel`]; the parser task drains it into an [`SExprParser`]. The caller
//! joins both tasks before it sees the finished tree.

use std::sync::Arc;
use std::thread;

use super::channel::Channel;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::lexer::{CharScanner, Scanner, SExprLexer, Token};
use crate::parser::{ParseOutput, SExprParser};

/// Kills the channel when the owning task exits, even by panic
struct KillOnDrop(Arc<Channel<Token>>);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        self.0.kill();
    }
}

/// Runs lexing and parsing as two concurrent tasks
#[derive(Debug, Clone)]
pub struct Pipeline {
    capacity: usize,
}

impl Pipeline {
    /// Creates a pipeline whose channel buffers up to `capacity` tokens
    pub fn new(capacity: usize) -> Self {
        Pipeline {
            capacity: capacity.max(1),
        }
    }

    /// Creates a pipeline sized from `config`
    pub fn from_config(config: &Config) -> Self {
        Pipeline::new(config.channel_capacity)
    }

    /// Channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lexes and parses `source`
    pub fn run_source(&self, source: &str) -> Result<ParseOutput> {
        self.run(CharScanner::from_source(source))
    }

    /// Lexes and parses everything `scanner` yields
    ///
    /// Returns only after both tasks have finished.
    pub fn run<S>(&self, scanner: S) -> Result<ParseOutput>
    where
        S: Scanner + Send + 'static,
    {
        let channel = Arc::new(Channel::new(self.capacity));

        let lexer_channel = Arc::clone(&channel);
        let lexer_task = thread::Builder::new()
            .name("crisp-lexer".to_string())
            .spawn(move || {
                let channel = KillOnDrop(lexer_channel);
                tracing::debug!("lexer task started");
                let mut lexer = SExprLexer::new(scanner);
                let mut produced = 0usize;
                while let Some(token) = lexer.next_token() {
                    if !channel.0.put(token) {
                        break;
                    }
                    produced += 1;
                }
                tracing::debug!(produced, "lexer task finished");
                produced
            })?;

        let parser_channel = Arc::clone(&channel);
        let parser_task = thread::Builder::new()
            .name("crisp-parser".to_string())
            .spawn(move || {
                let channel = KillOnDrop(parser_channel);
                tracing::debug!("parser task started");
                let mut parser = SExprParser::new();
                for token in channel.0.iter() {
                    parser.put(token);
                }
                let output = parser.finish();
                tracing::debug!(
                    diagnostics = output.diagnostics.len(),
                    "parser task finished"
                );
                output
            });

        let parser_task = match parser_task {
            Ok(handle) => handle,
            Err(err) => {
                channel.kill();
                let _ = lexer_task.join();
                return Err(err.into());
            }
        };

        let lexed = lexer_task.join();
        let parsed = parser_task.join();
        lexed.map_err(|_| Error::ThreadJoinFailed {
            task: "lexer".to_string(),
        })?;
        parsed.map_err(|_| Error::ThreadJoinFailed {
            task: "parser".to_string(),
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::from_config(&Config::default())
    }
}
