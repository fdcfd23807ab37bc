use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::parser::Node;
use crate::runtime::callable::{Builtin, Callable};

/// Lexical environment: local bindings plus a link to the enclosing scope
///
/// Cloning a `Scope` clones the handle, not the bindings. Lookups walk
/// outward through the parent chain; writes always go to the local table.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

struct ScopeInner {
    /// Variables defined in this scope
    bindings: RwLock<HashMap<String, Arc<Node>>>,
    /// Enclosing scope (None for the global scope)
    parent: Option<Scope>,
}

impl Scope {
    /// Creates an empty scope with no parent
    pub fn new() -> Self {
        Scope {
            inner: Arc::new(ScopeInner {
                bindings: RwLock::new(HashMap::new()),
                parent: None,
            }),
        }
    }

    /// Creates the session's global scope: builtins plus `#t` and `#f`
    pub fn global() -> Self {
        let scope = Scope::new();
        for builtin in Builtin::ALL {
            scope.define(
                builtin.name(),
                Arc::new(Node::callable(Callable::Builtin(builtin))),
            );
        }
        scope.define("#t", Arc::new(Node::boolean(true)));
        scope.define("#f", Arc::new(Node::boolean(false)));
        scope
    }

    /// Creates a child scope whose lookups fall back to `self`
    pub fn child(&self) -> Self {
        Scope {
            inner: Arc::new(ScopeInner {
                bindings: RwLock::new(HashMap::new()),
                parent: Some(self.clone()),
            }),
        }
    }

    /// Enclosing scope, if any
    pub fn parent(&self) -> Option<&Scope> {
        self.inner.parent.as_ref()
    }

    /// Binds `name` in this scope, replacing any local binding
    pub fn define(&self, name: impl Into<String>, value: Arc<Node>) {
        self.inner.bindings.write().insert(name.into(), value);
    }

    /// Finds the innermost binding of `name`
    pub fn lookup(&self, name: &str) -> Option<Arc<Node>> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(value) = current.inner.bindings.read().get(name) {
                return Some(Arc::clone(value));
            }
            scope = current.parent();
        }
        None
    }

    /// Checks if a binding exists in this scope or any ancestor
    pub fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Checks if a binding exists in this scope only
    pub fn contains_local(&self, name: &str) -> bool {
        self.inner.bindings.read().contains_key(name)
    }

    /// Number of scopes in the chain (1 for a scope without parent)
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut scope = self.parent();
        while let Some(current) = scope {
            depth += 1;
            scope = current.parent();
        }
        depth
    }

    /// Local binding names, sorted
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.bindings.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// True if both handles refer to the same scope
    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Textual rendering of the local bindings, one `name = value` per line
    pub fn render(&self) -> String {
        let bindings = self.inner.bindings.read();
        let mut entries: Vec<(&String, &Arc<Node>)> = bindings.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
            .into_iter()
            .map(|(name, value)| format!("{} = {}", name, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Scope")
            .field("depth", &self.depth())
            .field("names", &self.local_names())
            .finish()
    }
}
