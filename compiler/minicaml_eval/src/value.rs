//! Runtime values.
//!
//! Lists and dictionaries are `im::Vector`s, so cloning a value is O(1) and
//! `cons`/`tail` share structure with their operand. Function values hold
//! their captured environment behind an `Arc`; nothing reachable from a value
//! is ever mutated after construction, which keeps `Value: Send + Sync`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use im::Vector;
use minicaml_ir::{Expr, Name};

use crate::builtins::Builtin;
use crate::Environment;

/// A user-defined function: parameters, body and the environment it closed over.
pub struct Closure {
    pub params: Vec<Name>,
    pub body: Arc<Expr>,
    pub env: Environment,
}

/// A function bound by `let rec`; applying it rebinds `name` to itself.
pub struct RecClosure {
    pub name: Name,
    pub params: Vec<Name>,
    pub body: Arc<Expr>,
    pub env: Environment,
}

/// A builtin together with the arguments it has been partially applied to.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimitiveValue {
    pub builtin: Builtin,
    pub args: Vec<Value>,
}

impl PrimitiveValue {
    /// Declared arity of the underlying builtin.
    #[inline]
    pub fn arity(&self) -> usize {
        self.builtin.arity()
    }

    /// How many more arguments complete the call.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.arity().saturating_sub(self.args.len())
    }
}

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    Unit,
    Int(i64),
    Bool(bool),
    Str(Arc<str>),
    List(Vector<Value>),
    /// Ordered association; keys are unique and keep insertion order.
    Dict(Vector<(Value, Value)>),
    Closure(Arc<Closure>),
    RecClosure(Arc<RecClosure>),
    Primitive(PrimitiveValue),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn dict(pairs: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Dict(pairs.into_iter().collect())
    }

    pub fn closure(params: Vec<Name>, body: Arc<Expr>, env: Environment) -> Self {
        Value::Closure(Arc::new(Closure { params, body, env }))
    }

    pub fn rec_closure(name: Name, params: Vec<Name>, body: Arc<Expr>, env: Environment) -> Self {
        Value::RecClosure(Arc::new(RecClosure {
            name,
            params,
            body,
            env,
        }))
    }

    pub fn primitive(builtin: Builtin) -> Self {
        Value::Primitive(PrimitiveValue {
            builtin,
            args: Vec::new(),
        })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
            Value::Closure(_) => "closure",
            Value::RecClosure(_) => "recursive closure",
            Value::Primitive(_) => "primitive",
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Closure(_) | Value::RecClosure(_) | Value::Primitive(_)
        )
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Ordering between two values of the same ordered kind.
    ///
    /// Integers, strings and booleans are ordered; every other pair is
    /// incomparable and yields `None`.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Structural equality over the whole value domain.
///
/// Values of different kinds are unequal rather than an error. Closures are
/// equal only to themselves (same allocation); primitive abstractions compare
/// by builtin and applied arguments.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Arc::ptr_eq(a, b),
            (Value::RecClosure(a), Value::RecClosure(b)) => Arc::ptr_eq(a, b),
            (Value::Primitive(a), Value::Primitive(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for RecClosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecClosure")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "Unit"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Dict(pairs) => f.debug_tuple("Dict").field(pairs).finish(),
            Value::Closure(c) => fmt::Debug::fmt(&**c, f),
            Value::RecClosure(c) => fmt::Debug::fmt(&**c, f),
            Value::Primitive(p) => fmt::Debug::fmt(p, f),
        }
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[Name]) -> fmt::Result {
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        f.write_str(param)?;
    }
    Ok(())
}

/// Human-readable rendering, as shown by front-ends.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => f.write_str("()"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{:?}", &**s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Dict(pairs) => {
                f.write_str("{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                f.write_str("}")
            }
            Value::Closure(c) => {
                f.write_str("(fun ")?;
                write_params(f, &c.params)?;
                f.write_str(" -> ...)")
            }
            Value::RecClosure(c) => {
                write!(f, "{} = (rec fun ", c.name)?;
                write_params(f, &c.params)?;
                f.write_str(" -> ...)")
            }
            Value::Primitive(p) => write!(f, "<builtin {}>", p.builtin.name()),
        }
    }
}
