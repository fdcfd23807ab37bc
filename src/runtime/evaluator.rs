use std::cell::Cell;
use std::sync::Arc;

use crate::config::DEFAULT_MAX_EVAL_DEPTH;
use crate::parser::{Node, NodeKind};
use crate::runtime::{Callable, Scope};

/// Tree-walking evaluator
///
/// Evaluation never fails in the Rust sense: undefined identifiers, arity
/// mismatches and non-callable list heads all come back as
/// [`NodeKind::Error`] values.
///
/// - Constant (quoted) nodes evaluate to themselves minus one quote layer
/// - Numbers, strings, booleans, callables, errors and null self-evaluate
/// - Identifiers are looked up and their binding is evaluated in turn
/// - A root evaluates each top-level form independently
/// - A list calls its evaluated head with the remaining children
pub struct Evaluator {
    /// Nesting limit before an error node is returned
    max_depth: usize,
    /// Current nesting of `eval` calls
    depth: Cell<usize>,
}

/// Decrements the depth counter when an `eval` frame unwinds
struct DepthGuard<'a>(&'a Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

impl Evaluator {
    /// Creates an evaluator with the default depth limit
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_EVAL_DEPTH)
    }

    /// Creates an evaluator with a custom depth limit
    pub fn with_max_depth(max_depth: usize) -> Self {
        Evaluator {
            max_depth,
            depth: Cell::new(0),
        }
    }

    /// Nesting limit
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Evaluates `node` in `scope`
    pub fn eval(&self, node: &Node, scope: &Scope) -> Node {
        let depth = self.depth.get() + 1;
        if depth > self.max_depth {
            tracing::debug!(max_depth = self.max_depth, "evaluation depth limit hit");
            return Node::error(format!(
                "maximum evaluation depth of {} exceeded",
                self.max_depth
            ));
        }
        self.depth.set(depth);
        let _guard = DepthGuard(&self.depth);

        if node.constant {
            return node.unquoted();
        }

        match &node.kind {
            NodeKind::Num(_)
            | NodeKind::String(_)
            | NodeKind::Bool(_)
            | NodeKind::Callable(_)
            | NodeKind::Error(_)
            | NodeKind::Null => node.clone(),

            NodeKind::Ident(name) => match scope.lookup(name) {
                Some(value) => self.eval(&value, scope),
                None => Node::error(format!("identifier '{}' not defined", name)),
            },

            NodeKind::Root(children) => Node::root(
                children
                    .iter()
                    .map(|child| Arc::new(self.eval(child, scope)))
                    .collect(),
            ),

            NodeKind::List(children) => self.eval_list(children, scope),
        }
    }

    fn eval_list(&self, children: &[Arc<Node>], scope: &Scope) -> Node {
        let (head, args) = match children.split_first() {
            Some(split) => split,
            None => return Node::null(),
        };

        let callee = self.eval(head, scope);
        match &callee.kind {
            NodeKind::Callable(Callable::Builtin(builtin)) => builtin.apply(self, args, scope),
            NodeKind::Callable(Callable::Closure(closure)) => {
                let values = args.iter().map(|arg| self.eval(arg, scope)).collect();
                closure.call(self, values)
            }
            _ => Node::error(format!(
                "first atom must be callable, not '{}'",
                callee
            )),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
