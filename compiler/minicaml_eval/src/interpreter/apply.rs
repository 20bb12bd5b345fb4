//! Function application and the higher-order combinators.
//!
//! Every function value is curried. Supplying fewer arguments than a function
//! takes yields a new function awaiting the rest; supplying exactly as many
//! runs it; supplying more is an arity error.

use std::sync::Arc;

use im::Vector;
use minicaml_ir::UnaryOp;

use super::Evaluator;
use crate::builtins::{self, Builtin};
use crate::errors::{arity_mismatch, empty_fold, not_callable, type_mismatch};
use crate::operators::evaluate_unary;
use crate::value::{Closure, PrimitiveValue, RecClosure};
use crate::{CallStack, EvalResult, Value};

impl Evaluator {
    /// Apply a function value to already-evaluated arguments.
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(callee = callee.type_name(), args = args.len())
    )]
    pub fn apply(&self, callee: Value, args: Vec<Value>, stack: &CallStack) -> EvalResult {
        match callee {
            Value::Closure(closure) => self.apply_closure(&closure, args, stack),
            Value::RecClosure(closure) => self.apply_rec_closure(&closure, args, stack),
            Value::Primitive(primitive) => self.apply_primitive(primitive, args, stack),
            other => Err(not_callable(other.type_name())),
        }
    }

    fn apply_closure(&self, closure: &Closure, args: Vec<Value>, stack: &CallStack) -> EvalResult {
        let arity = closure.params.len();
        if args.len() > arity {
            return Err(arity_mismatch("", arity, args.len()));
        }
        let supplied = args.len();
        let env = closure
            .params
            .iter()
            .zip(args)
            .fold(closure.env.clone(), |env, (param, arg)| {
                env.bind(param.clone(), arg)
            });
        if supplied < arity {
            return Ok(Value::closure(
                closure.params[supplied..].to_vec(),
                closure.body.clone(),
                env,
            ));
        }
        self.eval(&closure.body, &env, stack)
    }

    /// The function is bound to its own name before the parameters, so a
    /// parameter of the same name shadows it.
    fn apply_rec_closure(
        &self,
        closure: &Arc<RecClosure>,
        args: Vec<Value>,
        stack: &CallStack,
    ) -> EvalResult {
        let arity = closure.params.len();
        if args.len() > arity {
            return Err(arity_mismatch(&closure.name, arity, args.len()));
        }
        let supplied = args.len();
        let self_env = closure.env.bind(
            closure.name.clone(),
            Value::RecClosure(Arc::clone(closure)),
        );
        let env = closure
            .params
            .iter()
            .zip(args)
            .fold(self_env, |env, (param, arg)| env.bind(param.clone(), arg));
        if supplied < arity {
            return Ok(Value::closure(
                closure.params[supplied..].to_vec(),
                closure.body.clone(),
                env,
            ));
        }
        self.eval(&closure.body, &env, stack)
    }

    fn apply_primitive(
        &self,
        primitive: PrimitiveValue,
        args: Vec<Value>,
        stack: &CallStack,
    ) -> EvalResult {
        let PrimitiveValue {
            builtin,
            args: mut collected,
        } = primitive;
        collected.extend(args);
        let arity = builtin.arity();
        if collected.len() > arity {
            return Err(arity_mismatch(builtin.name(), arity, collected.len()));
        }
        if collected.len() < arity {
            return Ok(Value::Primitive(PrimitiveValue {
                builtin,
                args: collected,
            }));
        }
        self.call_builtin(builtin, &collected, stack)
    }

    /// Run a builtin whose arguments are complete.
    fn call_builtin(&self, builtin: Builtin, args: &[Value], stack: &CallStack) -> EvalResult {
        match (builtin, args) {
            (Builtin::Head, [list]) => builtins::head(list),
            (Builtin::Tail, [list]) => builtins::tail(list),
            (Builtin::Cons, [elem, list]) => builtins::cons(elem.clone(), list),
            (Builtin::Length, [coll]) => builtins::length(coll),
            (Builtin::Insert, [key, value, dict]) => {
                builtins::insert(key.clone(), value.clone(), dict)
            }
            (Builtin::Delete, [key, dict]) => builtins::delete(key, dict),
            (Builtin::HasKey, [key, dict]) => builtins::has_key(key, dict),
            (Builtin::GetKey, [key, dict]) => builtins::get_key(key, dict),
            (Builtin::Map, [func, coll]) => self.map_collection(func, coll, stack),
            (Builtin::Fold, [func, coll]) => self.fold_collection(func, coll, stack),
            (Builtin::Filter, [func, coll]) => self.filter_collection(func, coll, stack),
            (Builtin::Not, [operand]) => evaluate_unary(UnaryOp::Not, operand.clone()),
            _ => Err(arity_mismatch(builtin.name(), builtin.arity(), args.len())),
        }
    }

    // Combinators over a list, or over the values of a dictionary

    pub(super) fn map_collection(
        &self,
        func: &Value,
        coll: &Value,
        stack: &CallStack,
    ) -> EvalResult {
        ensure_callable(func)?;
        match coll {
            Value::List(items) => items
                .iter()
                .map(|item| self.apply(func.clone(), vec![item.clone()], stack))
                .collect::<EvalResult<Vector<_>>>()
                .map(Value::List),
            Value::Dict(pairs) => pairs
                .iter()
                .map(|(key, value)| {
                    let mapped = self.apply(func.clone(), vec![value.clone()], stack)?;
                    Ok((key.clone(), mapped))
                })
                .collect::<EvalResult<Vector<_>>>()
                .map(Value::Dict),
            other => Err(type_mismatch("list or dict", other.type_name())),
        }
    }

    pub(super) fn filter_collection(
        &self,
        func: &Value,
        coll: &Value,
        stack: &CallStack,
    ) -> EvalResult {
        ensure_callable(func)?;
        match coll {
            Value::List(items) => {
                let mut kept = Vector::new();
                for item in items {
                    if self.test(func, item, stack)? {
                        kept.push_back(item.clone());
                    }
                }
                Ok(Value::List(kept))
            }
            Value::Dict(pairs) => {
                let mut kept = Vector::new();
                for (key, value) in pairs {
                    if self.test(func, value, stack)? {
                        kept.push_back((key.clone(), value.clone()));
                    }
                }
                Ok(Value::Dict(kept))
            }
            other => Err(type_mismatch("list or dict", other.type_name())),
        }
    }

    /// Left fold seeded with the first element: `f (f x0 x1) x2 ...`.
    pub(super) fn fold_collection(
        &self,
        func: &Value,
        coll: &Value,
        stack: &CallStack,
    ) -> EvalResult {
        ensure_callable(func)?;
        let items: Vector<Value> = match coll {
            Value::List(items) => items.clone(),
            Value::Dict(pairs) => pairs.iter().map(|(_, value)| value.clone()).collect(),
            other => return Err(type_mismatch("list or dict", other.type_name())),
        };
        let mut items = items.into_iter();
        let seed = items.next().ok_or_else(empty_fold)?;
        items.try_fold(seed, |acc, item| self.apply(func.clone(), vec![acc, item], stack))
    }

    fn test(&self, predicate: &Value, item: &Value, stack: &CallStack) -> EvalResult<bool> {
        match self.apply(predicate.clone(), vec![item.clone()], stack)? {
            Value::Bool(keep) => Ok(keep),
            other => Err(type_mismatch("bool", other.type_name())),
        }
    }
}

fn ensure_callable(func: &Value) -> EvalResult<()> {
    if func.is_callable() {
        Ok(())
    } else {
        Err(not_callable(func.type_name()))
    }
}
