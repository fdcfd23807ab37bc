//! Interpreter session: configuration, global scope, and the full
//! scan → lex → parse → evaluate path

use crate::config::Config;
use crate::error::{Error, Result};
use crate::lexer::Scanner;
use crate::parallel::Pipeline;
use crate::parser::Node;
use crate::runtime::{Evaluator, Scope};

/// Result of running one piece of source text
#[derive(Debug, Clone)]
pub struct SessionOutput {
    /// Evaluated root: one result per top-level form
    pub result: Node,
    /// Lexical/structural problems reported while parsing
    pub diagnostics: Vec<Error>,
}

impl SessionOutput {
    /// Result of the last top-level form, if there was one
    pub fn last_value(&self) -> Option<&Node> {
        self.result.children().and_then(|children| children.last()).map(|n| &**n)
    }
}

/// Long-lived interpreter state
///
/// Bindings made with `def` persist in the global scope across runs, so a
/// single session can back a REPL.
pub struct Session {
    config: Config,
    pipeline: Pipeline,
    evaluator: Evaluator,
    global: Scope,
}

impl Session {
    /// Creates a session with the default configuration
    pub fn new() -> Self {
        Self::build(Config::default())
    }

    /// Creates a session with a custom configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: Config) -> Self {
        Session {
            pipeline: Pipeline::from_config(&config),
            evaluator: Evaluator::with_max_depth(config.max_eval_depth),
            global: Scope::global(),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Global scope
    pub fn global(&self) -> &Scope {
        &self.global
    }

    /// Runs `source` through the pipeline and evaluates the resulting tree
    pub fn run_source(&self, source: &str) -> Result<SessionOutput> {
        let parsed = self.pipeline.run_source(source)?;
        Ok(self.finish(parsed.root, parsed.diagnostics))
    }

    /// Runs everything `scanner` yields through the pipeline and evaluates it
    pub fn run_scanner<S>(&self, scanner: S) -> Result<SessionOutput>
    where
        S: Scanner + Send + 'static,
    {
        let parsed = self.pipeline.run(scanner)?;
        Ok(self.finish(parsed.root, parsed.diagnostics))
    }

    /// Evaluates an already-built tree in the global scope
    pub fn eval(&self, node: &Node) -> Node {
        self.evaluator.eval(node, &self.global)
    }

    /// Rendering of the global bindings, one `name = value` per line
    pub fn render_bindings(&self) -> String {
        self.global.render()
    }

    fn finish(&self, root: Node, diagnostics: Vec<Error>) -> SessionOutput {
        SessionOutput {
            result: self.eval(&root),
            diagnostics,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
