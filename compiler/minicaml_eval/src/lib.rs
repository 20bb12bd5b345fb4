//! minicaml evaluator.
//!
//! Reduces [`minicaml_ir::Expr`] trees to [`Value`]s. Evaluation is a pure
//! function of the expression, the [`Environment`] and the configuration; the
//! only state it builds is persistent (environments, call stacks), and the
//! only shared mutable state is the memo cell of a call-by-need thunk.
//!
//! ```text
//! let evaluator = Evaluator::new();
//! let value = evaluator.eval_program(expr)?;
//! ```
//!
//! # Modules
//!
//! - `value`: runtime values, closures and primitive abstractions
//! - `environment`: persistent environments, bindings and thunks
//! - `call_stack`: the diagnostic call stack and backtrace capture
//! - `errors`: `EvalError`, its kinds and categories
//! - `operators`: binary and unary operators over values
//! - `builtins`: primitive list and dictionary operations
//! - `interpreter`: the `Evaluator`
//! - `config`: `EvalConfig`
//! - `stack`: host stack growth for deep recursion

mod builtins;
mod call_stack;
mod config;
mod environment;
pub mod errors;
mod interpreter;
mod operators;
mod stack;
mod value;

pub use builtins::Builtin;
pub use call_stack::{CallFrame, CallStack, Frames};
pub use config::{parse_depth, ConfigError, EvalConfig, LazyStrategy, LAZY_VAR, MAX_DEPTH_VAR};
pub use environment::{Binding, Environment, Thunk};
pub use errors::{
    BacktraceFrame, ErrorCategory, EvalBacktrace, EvalError, EvalErrorKind, EvalResult,
};
pub use interpreter::{eval, Evaluator};
pub use operators::{evaluate_binary, evaluate_unary};
pub use stack::ensure_sufficient_stack;
pub use value::{Closure, PrimitiveValue, RecClosure, Value};

#[cfg(test)]
mod tests;
