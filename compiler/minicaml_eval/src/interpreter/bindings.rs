//! Names: lookup, thunk forcing, binding forms and sequences.

use std::sync::Arc;

use minicaml_ir::{Expr, LetBinding, Name};

use super::Evaluator;
use crate::errors::{empty_sequence, unbound_variable, wrong_binding_list};
use crate::{Binding, CallStack, Environment, EvalResult, LazyStrategy, Thunk, Value};

impl Evaluator {
    /// Resolve `name`. Thunks are forced in their own captured environment.
    pub(super) fn lookup(&self, name: &Name, env: &Environment, stack: &CallStack) -> EvalResult {
        match env.lookup(name) {
            Some(Binding::Evaluated(value)) => Ok(value.clone()),
            Some(Binding::Thunk(thunk)) => self.force(name, thunk, stack),
            None => Err(unbound_variable(name)),
        }
    }

    fn force(&self, name: &str, thunk: &Thunk, stack: &CallStack) -> EvalResult {
        match self.config.lazy {
            LazyStrategy::ByName => self.eval(&thunk.expr, &thunk.env, stack),
            LazyStrategy::ByNeed => {
                if let Some(value) = thunk.forced() {
                    return Ok(value.clone());
                }
                tracing::debug!(name, "forcing thunk");
                let value = self.eval(&thunk.expr, &thunk.env, stack)?;
                Ok(thunk.memoize(value))
            }
        }
    }

    /// Evaluate every right-hand side in `env`, then bind them all.
    ///
    /// The bindings of one group do not see each other.
    pub(super) fn bind_eager(
        &self,
        bindings: &[LetBinding],
        env: &Environment,
        stack: &CallStack,
    ) -> EvalResult<Environment> {
        let values = bindings
            .iter()
            .map(|binding| self.eval(&binding.value, env, stack))
            .collect::<EvalResult<Vec<_>>>()?;
        Ok(bindings
            .iter()
            .zip(values)
            .fold(env.clone(), |acc, (binding, value)| {
                acc.bind(binding.name.clone(), value)
            }))
    }

    /// Bind each name to a thunk over `env`; nothing is evaluated.
    pub(super) fn bind_lazy(bindings: &[LetBinding], env: &Environment) -> Environment {
        bindings.iter().fold(env.clone(), |acc, binding| {
            let thunk = Thunk::new(Arc::clone(&binding.value), env.clone());
            acc.bind_thunk(binding.name.clone(), thunk)
        })
    }

    /// Bind the name to a recursive closure over `env`.
    pub(super) fn bind_rec(binding: &LetBinding, env: &Environment) -> EvalResult<Environment> {
        let closure = Self::rec_closure(binding, env)?;
        Ok(env.bind(binding.name.clone(), closure))
    }

    /// Bind the name to a thunk that builds the recursive closure when forced.
    ///
    /// The right-hand side must still be a lambda; that is checked here, not
    /// when the thunk is forced.
    pub(super) fn bind_rec_lazy(binding: &LetBinding, env: &Environment) -> EvalResult<Environment> {
        if !matches!(&*binding.value, Expr::Lambda { .. }) {
            return Err(wrong_binding_list(&binding.name));
        }
        let builder = Expr::Letrec {
            binding: binding.clone(),
            body: Arc::new(Expr::Symbol(binding.name.clone())),
        };
        let thunk = Thunk::new(Arc::new(builder), env.clone());
        Ok(env.bind_thunk(binding.name.clone(), thunk))
    }

    fn rec_closure(binding: &LetBinding, env: &Environment) -> EvalResult {
        match &*binding.value {
            Expr::Lambda { params, body } => {
                tracing::debug!(name = %binding.name, arity = params.len(), "recursive closure");
                Ok(Value::rec_closure(
                    binding.name.clone(),
                    params.clone(),
                    Arc::clone(body),
                    env.clone(),
                ))
            }
            _ => Err(wrong_binding_list(&binding.name)),
        }
    }

    /// Extend `env` as the declaration `expr` prescribes.
    ///
    /// Returns `None` when `expr` is not a declaration.
    pub(super) fn declare(
        &self,
        expr: &Expr,
        env: &Environment,
        stack: &CallStack,
    ) -> EvalResult<Option<Environment>> {
        let extended = match expr {
            Expr::Def(bindings) => self.bind_eager(bindings, env, stack)?,
            Expr::Deflazy(bindings) => Self::bind_lazy(bindings, env),
            Expr::Defrec(binding) => Self::bind_rec(binding, env)?,
            Expr::Defreclazy(binding) => Self::bind_rec_lazy(binding, env)?,
            _ => return Ok(None),
        };
        Ok(Some(extended))
    }

    /// Evaluate left to right; the value is that of the last element.
    ///
    /// Declarations extend the environment of the elements after them and
    /// have the value `()`.
    pub(super) fn eval_sequence(
        &self,
        exprs: &[Arc<Expr>],
        env: &Environment,
        stack: &CallStack,
    ) -> EvalResult {
        if exprs.is_empty() {
            return Err(empty_sequence());
        }
        let mut env = env.clone();
        let mut last = Value::Unit;
        for expr in exprs {
            if !expr.is_declaration() {
                last = self.eval(expr, &env, stack)?;
                continue;
            }
            let declared = self.in_frame(expr, stack, |stack| self.declare(expr, &env, stack))?;
            if let Some(extended) = declared {
                env = extended;
            }
            last = Value::Unit;
        }
        Ok(last)
    }
}
