use std::fmt;
use std::sync::Arc;

use crate::parser::{Node, NodeKind};
use crate::runtime::{Evaluator, Scope};

/// Anything that can sit at the head of an evaluated list
#[derive(Debug, Clone, PartialEq)]
pub enum Callable {
    /// Special form pre-bound in the global scope
    Builtin(Builtin),
    /// User function created by `lambda`
    Closure(Closure),
}

/// Builtin special forms
///
/// Builtins receive their argument nodes unevaluated, together with the
/// scope of the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `(def name value)`: binds `name` to the unevaluated `value`
    Def,
    /// `(lambda (params...) body)`: creates a closure
    Lambda,
    /// `(quote x)`: returns `x` unevaluated
    Quote,
    /// `(not x)`: boolean negation of `x`'s truthiness
    Not,
}

impl Builtin {
    /// Every builtin, in registration order
    pub const ALL: [Builtin; 4] = [Builtin::Def, Builtin::Lambda, Builtin::Quote, Builtin::Not];

    /// Name the builtin is bound to in the global scope
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Def => "def",
            Builtin::Lambda => "lambda",
            Builtin::Quote => "quote",
            Builtin::Not => "not",
        }
    }

    /// Applies the builtin to unevaluated `args` in the call-site `scope`
    pub fn apply(&self, evaluator: &Evaluator, args: &[Arc<Node>], scope: &Scope) -> Node {
        match self {
            Builtin::Def => self.def(args, scope),
            Builtin::Lambda => self.lambda(args, scope),
            Builtin::Quote => self.quote(args),
            Builtin::Not => self.not(evaluator, args, scope),
        }
    }

    fn arity_error(&self, expected: &str, got: usize) -> Node {
        Node::error(format!("{}: takes {}, not {}", self, expected, got))
    }

    fn def(&self, args: &[Arc<Node>], scope: &Scope) -> Node {
        if args.len() != 2 {
            return self.arity_error("two arguments", args.len());
        }
        match args[0].as_ident() {
            Some(name) => {
                scope.define(name, Arc::clone(&args[1]));
                args[0].unquoted()
            }
            None => Node::error(format!(
                "{}: first argument must be identifier, not '{}'",
                self, args[0]
            )),
        }
    }

    fn lambda(&self, args: &[Arc<Node>], scope: &Scope) -> Node {
        if args.len() != 2 {
            return self.arity_error("two arguments", args.len());
        }
        let params = match &args[0].kind {
            NodeKind::List(params) => params,
            _ => {
                return Node::error(format!(
                    "{}: first argument must be a parameter list, not '{}'",
                    self, args[0]
                ))
            }
        };

        let mut names = Vec::with_capacity(params.len());
        for param in params {
            match param.as_ident() {
                Some(name) => names.push(name.to_string()),
                None => {
                    return Node::error(format!(
                        "{}: non-identifier '{}' in parameter list",
                        self, param
                    ))
                }
            }
        }

        Node::callable(Callable::Closure(Closure {
            params: names.into(),
            body: Arc::clone(&args[1]),
            scope: scope.clone(),
        }))
    }

    fn quote(&self, args: &[Arc<Node>]) -> Node {
        if args.len() != 1 {
            return self.arity_error("one argument", args.len());
        }
        (*args[0]).clone()
    }

    fn not(&self, evaluator: &Evaluator, args: &[Arc<Node>], scope: &Scope) -> Node {
        if args.len() != 1 {
            return self.arity_error("one argument", args.len());
        }
        Node::boolean(!evaluator.eval(&args[0], scope).is_truthy())
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}}}", self.name())
    }
}

/// User function: parameter names, body, and the scope it was created in
///
/// The body is shared with the parse tree it came from and is never mutated,
/// so any number of closures may point at the same subtree.
#[derive(Debug, Clone)]
pub struct Closure {
    params: Arc<[String]>,
    body: Arc<Node>,
    scope: Scope,
}

impl Closure {
    /// Parameter names in order
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Unevaluated body
    pub fn body(&self) -> &Arc<Node> {
        &self.body
    }

    /// Scope captured at creation
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Calls the closure with already-evaluated arguments
    ///
    /// Each argument is bound constant in a fresh child of the captured
    /// scope, so looking a parameter up yields the argument itself.
    pub fn call(&self, evaluator: &Evaluator, args: Vec<Node>) -> Node {
        if args.len() != self.params.len() {
            let which = if args.len() > self.params.len() {
                "Too many"
            } else {
                "Too few"
            };
            return Node::error(format!(
                "{} arguments for function call: expected {}, got {}",
                which,
                self.params.len(),
                args.len()
            ));
        }

        let local = self.scope.child();
        for (name, arg) in self.params.iter().zip(args) {
            local.define(name.as_str(), Arc::new(arg.quoted()));
        }
        evaluator.eval(&self.body, &local)
    }
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
            && Arc::ptr_eq(&self.body, &other.body)
            && self.scope.ptr_eq(&other.scope)
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{lambda ({})}}", self.params.join(" "))
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Callable::Builtin(builtin) => write!(f, "{}", builtin),
            Callable::Closure(closure) => write!(f, "{}", closure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(node: Node) -> Arc<Node> {
        Arc::new(node)
    }

    #[test]
    fn test_builtin_names_and_display() {
        assert_eq!(Builtin::Def.name(), "def");
        assert_eq!(Builtin::Quote.to_string(), "{quote}");
    }

    #[test]
    fn test_def_binds_unevaluated_value() {
        let evaluator = Evaluator::new();
        let scope = Scope::global();
        let value = arc(Node::ident("y"));
        let result = Builtin::Def.apply(
            &evaluator,
            &[arc(Node::ident("x")), Arc::clone(&value)],
            &scope,
        );
        assert_eq!(result, Node::ident("x"));
        assert!(Arc::ptr_eq(&scope.lookup("x").unwrap(), &value));
    }

    #[test]
    fn test_def_rejects_non_ident() {
        let evaluator = Evaluator::new();
        let scope = Scope::global();
        let result = Builtin::Def.apply(&evaluator, &[arc(Node::num(1)), arc(Node::num(2))], &scope);
        assert!(result.is_error());
        let result = Builtin::Def.apply(&evaluator, &[arc(Node::ident("x"))], &scope);
        assert!(matches!(result.kind, NodeKind::Error(ref m) if m.contains("two arguments")));
    }

    #[test]
    fn test_lambda_validates_params() {
        let evaluator = Evaluator::new();
        let scope = Scope::global();
        let params = arc(Node::list(vec![arc(Node::ident("a")), arc(Node::num(1))]));
        let result = Builtin::Lambda.apply(&evaluator, &[params, arc(Node::ident("a"))], &scope);
        assert!(matches!(result.kind, NodeKind::Error(ref m) if m.contains("non-identifier")));

        let result = Builtin::Lambda.apply(
            &evaluator,
            &[arc(Node::ident("a")), arc(Node::ident("a"))],
            &scope,
        );
        assert!(result.is_error());
    }

    #[test]
    fn test_closure_shares_body() {
        let evaluator = Evaluator::new();
        let scope = Scope::global();
        let body = arc(Node::ident("a"));
        let params = arc(Node::list(vec![arc(Node::ident("a"))]));
        let made = Builtin::Lambda.apply(&evaluator, &[params, Arc::clone(&body)], &scope);
        match &made.kind {
            NodeKind::Callable(Callable::Closure(closure)) => {
                assert!(Arc::ptr_eq(closure.body(), &body));
                assert_eq!(closure.params(), ["a".to_string()]);
                assert!(closure.scope().ptr_eq(&scope));
                assert_eq!(closure.call(&evaluator, vec![Node::num(7)]), Node::num(7));
                assert!(closure.call(&evaluator, vec![]).is_error());
            }
            other => panic!("expected closure, got {:?}", other),
        }
    }

    #[test]
    fn test_quote_and_not() {
        let evaluator = Evaluator::new();
        let scope = Scope::global();
        let list = Node::list(vec![arc(Node::ident("a")), arc(Node::ident("b"))]);
        assert_eq!(
            Builtin::Quote.apply(&evaluator, &[arc(list.clone())], &scope),
            list
        );
        assert!(Builtin::Quote.apply(&evaluator, &[], &scope).is_error());

        let not_false = Builtin::Not.apply(&evaluator, &[arc(Node::ident("#f"))], &scope);
        assert_eq!(not_false, Node::boolean(true));
        let not_num = Builtin::Not.apply(&evaluator, &[arc(Node::num(3))], &scope);
        assert_eq!(not_num, Node::boolean(false));
        let not_error = Builtin::Not.apply(&evaluator, &[arc(Node::error("boom"))], &scope);
        assert_eq!(not_error, Node::boolean(false));
    }
}
