//! Per-variant dispatch.

use std::sync::Arc;

use im::Vector;
use minicaml_ir::{Expr, ListPattern};

use super::Evaluator;
use crate::builtins::{self, insert_pair};
use crate::errors::type_mismatch;
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::{CallStack, Environment, EvalResult, Value};

impl Evaluator {
    /// Reduce one expression. Sub-expressions go back through [`Evaluator::eval`].
    pub(super) fn eval_expr(
        &self,
        expr: &Arc<Expr>,
        env: &Environment,
        stack: &CallStack,
    ) -> EvalResult {
        match &**expr {
            Expr::Unit => Ok(Value::Unit),
            Expr::Integer(n) => Ok(Value::Int(*n)),
            Expr::Boolean(b) => Ok(Value::Bool(*b)),
            Expr::String(s) => Ok(Value::string(s)),
            Expr::List(pattern) => self.eval_list(pattern, env, stack),
            Expr::Dict(pairs) => {
                let mut dict = Vector::new();
                for (key, value) in pairs {
                    let key = self.eval(key, env, stack)?;
                    let value = self.eval(value, env, stack)?;
                    dict = insert_pair(dict, key, value);
                }
                Ok(Value::Dict(dict))
            }

            Expr::Symbol(name) => self.lookup(name, env, stack),

            // List primitives
            Expr::Head(list) => builtins::head(&self.eval(list, env, stack)?),
            Expr::Tail(list) => builtins::tail(&self.eval(list, env, stack)?),
            Expr::Cons { elem, list } => {
                let elem = self.eval(elem, env, stack)?;
                let list = self.eval(list, env, stack)?;
                builtins::cons(elem, &list)
            }

            // Dictionary primitives
            Expr::DictInsert { key, value, dict } => {
                let key = self.eval(key, env, stack)?;
                let value = self.eval(value, env, stack)?;
                let dict = self.eval(dict, env, stack)?;
                builtins::insert(key, value, &dict)
            }
            Expr::DictDelete { key, dict } => {
                let key = self.eval(key, env, stack)?;
                builtins::delete(&key, &self.eval(dict, env, stack)?)
            }
            Expr::DictHasKey { key, dict } => {
                let key = self.eval(key, env, stack)?;
                builtins::has_key(&key, &self.eval(dict, env, stack)?)
            }
            Expr::DictGetKey { key, dict } => {
                let key = self.eval(key, env, stack)?;
                builtins::get_key(&key, &self.eval(dict, env, stack)?)
            }

            // Combinators: collection first, then function
            Expr::Mapv { coll, func } => {
                let coll = self.eval(coll, env, stack)?;
                let func = self.eval(func, env, stack)?;
                self.map_collection(&func, &coll, stack)
            }
            Expr::Filter { coll, func } => {
                let coll = self.eval(coll, env, stack)?;
                let func = self.eval(func, env, stack)?;
                self.filter_collection(&func, &coll, stack)
            }
            Expr::Fold { coll, func } => {
                let coll = self.eval(coll, env, stack)?;
                let func = self.eval(func, env, stack)?;
                self.fold_collection(&func, &coll, stack)
            }

            Expr::Binary { op, left, right } => {
                let left = self.eval(left, env, stack)?;
                let right = self.eval(right, env, stack)?;
                evaluate_binary(left, right, *op)
            }
            Expr::Unary { op, operand } => evaluate_unary(*op, self.eval(operand, env, stack)?),

            Expr::IfThenElse {
                cond,
                then_branch,
                else_branch,
            } => match self.eval(cond, env, stack)? {
                Value::Bool(true) => self.eval(then_branch, env, stack),
                Value::Bool(false) => self.eval(else_branch, env, stack),
                other => Err(type_mismatch("bool", other.type_name())),
            },

            // Binding forms
            Expr::Let { bindings, body } => {
                let body_env = self.bind_eager(bindings, env, stack)?;
                self.eval(body, &body_env, stack)
            }
            Expr::Letlazy { bindings, body } => {
                self.eval(body, &Self::bind_lazy(bindings, env), stack)
            }
            Expr::Letrec { binding, body } => self.eval(body, &Self::bind_rec(binding, env)?, stack),
            Expr::Letreclazy { binding, body } => {
                self.eval(body, &Self::bind_rec_lazy(binding, env)?, stack)
            }
            Expr::Def(_) | Expr::Deflazy(_) | Expr::Defrec(_) | Expr::Defreclazy(_) => {
                self.declare(expr, env, stack)?;
                Ok(Value::Unit)
            }

            Expr::Lambda { params, body } => Ok(Value::closure(
                params.clone(),
                Arc::clone(body),
                env.clone(),
            )),
            Expr::Apply { callee, args } => {
                let callee = self.eval(callee, env, stack)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, env, stack))
                    .collect::<EvalResult<Vec<_>>>()?;
                self.apply(callee, args, stack)
            }
            Expr::Pipe { func, arg } => {
                let func = self.eval(func, env, stack)?;
                let arg = self.eval(arg, env, stack)?;
                self.apply(func, vec![arg], stack)
            }
            Expr::Sequence(exprs) => self.eval_sequence(exprs, env, stack),
        }
    }

    fn eval_list(&self, pattern: &ListPattern, env: &Environment, stack: &CallStack) -> EvalResult {
        pattern
            .iter()
            .map(|elem| self.eval(elem, env, stack))
            .collect::<EvalResult<Vector<_>>>()
            .map(Value::List)
    }
}
