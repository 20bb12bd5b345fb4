//! Tree-walking evaluator.
//!
//! # Architecture
//!
//! [`Evaluator::eval`] is the only recursive entry point. It pushes a frame
//! for the expression onto the diagnostic [`CallStack`], runs the per-variant
//! dispatch (`expr.rs`) under a stack-growth guard, and on failure attaches
//! the backtrace of that stack. Because the innermost frame attaches first and
//! later attachments are ignored, a propagated error reports the deepest
//! stack that saw it. The child stack is dropped when `eval` returns.
//!
//! The remaining modules are split by concern:
//!
//! - `expr` - dispatch on expression shape, operators, list and dict forms
//! - `bindings` - variable lookup, thunk forcing, `let`/`def` forms, sequences
//! - `apply` - application, currying, builtin calls, higher-order combinators
//!
//! Declarations inside a sequence are not evaluated to a value, but they
//! still get their own frame through the same `in_frame` guard.
//!
//! Environments and call stacks are persistent values passed by reference;
//! the evaluator itself holds only its configuration, so one `Evaluator` can
//! serve many threads at once (see [`Evaluator::eval_batch`]).

mod apply;
mod bindings;
mod expr;

use std::sync::Arc;

use minicaml_ir::Expr;
use rayon::prelude::*;

use crate::stack::ensure_sufficient_stack;
use crate::{CallStack, Environment, EvalConfig, EvalResult};

/// Evaluates expression trees under a fixed [`EvalConfig`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    /// Evaluator with the default configuration: no depth bound, call-by-name.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Evaluator { config }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate `expr` in `env`, with `stack` as the caller's diagnostic stack.
    pub fn eval(&self, expr: &Arc<Expr>, env: &Environment, stack: &CallStack) -> EvalResult {
        self.in_frame(expr, stack, |stack| self.eval_expr(expr, env, stack))
    }

    /// Run `step` with a frame for `expr` pushed onto `stack`.
    ///
    /// Errors leaving `step` carry the backtrace of the child stack unless
    /// they already have one.
    fn in_frame<T>(
        &self,
        expr: &Arc<Expr>,
        stack: &CallStack,
        step: impl FnOnce(&CallStack) -> EvalResult<T>,
    ) -> EvalResult<T> {
        let stack = stack.push_within(Arc::clone(expr), self.config.max_depth)?;
        ensure_sufficient_stack(|| step(&stack)).map_err(|err| stack.attach_backtrace(err))
    }

    /// Evaluate a whole program: builtins in scope, empty call stack.
    pub fn eval_program(&self, expr: impl Into<Arc<Expr>>) -> EvalResult {
        self.eval(&expr.into(), &Environment::with_builtins(), &CallStack::new())
    }

    /// Evaluate independent expressions in parallel against one environment.
    ///
    /// Results come back in input order; one failure does not affect the others.
    pub fn eval_batch(&self, exprs: &[Arc<Expr>], env: &Environment) -> Vec<EvalResult> {
        tracing::debug!(count = exprs.len(), "evaluating batch");
        exprs
            .par_iter()
            .map(|expr| self.eval(expr, env, &CallStack::new()))
            .collect()
    }
}

/// Evaluate a program with the default configuration.
pub fn eval(expr: impl Into<Arc<Expr>>) -> EvalResult {
    Evaluator::new().eval_program(expr)
}
