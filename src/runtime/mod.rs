//! Runtime evaluation for Crisp trees
//!
//! [`Evaluator`] walks a parsed tree against a chain of [`Scope`]s. Builtins
//! and user closures are both [`Callable`]s.

mod callable;
mod evaluator;
mod scope;

pub use callable::{Builtin, Callable, Closure};
pub use evaluator::Evaluator;
pub use scope::Scope;
