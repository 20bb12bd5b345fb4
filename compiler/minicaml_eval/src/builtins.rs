//! Builtin primitives.
//!
//! `Builtin` enumerates the primitive abstractions pre-bound in
//! `Environment::with_builtins`. The first-order list and dictionary
//! operations live here as plain functions over values, shared by the
//! dedicated expression forms (`Head`, `DictInsert`, ...) and by the curried
//! primitives. Higher-order builtins (`map`, `fold`, `filter`) need to apply
//! functions and are implemented on the interpreter.

use im::Vector;

use crate::errors::{empty_list, key_not_found, type_mismatch, EvalResult};
use crate::Value;

/// A builtin primitive with a fixed arity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Head,
    Tail,
    Cons,
    Length,
    Insert,
    Delete,
    HasKey,
    GetKey,
    Map,
    Fold,
    Filter,
    Not,
}

impl Builtin {
    /// Every builtin, in the order they are bound.
    pub const ALL: &'static [Builtin] = &[
        Builtin::Head,
        Builtin::Tail,
        Builtin::Cons,
        Builtin::Length,
        Builtin::Insert,
        Builtin::Delete,
        Builtin::HasKey,
        Builtin::GetKey,
        Builtin::Map,
        Builtin::Fold,
        Builtin::Filter,
        Builtin::Not,
    ];

    /// Name the builtin is bound under.
    pub const fn name(self) -> &'static str {
        match self {
            Builtin::Head => "head",
            Builtin::Tail => "tail",
            Builtin::Cons => "cons",
            Builtin::Length => "length",
            Builtin::Insert => "insert",
            Builtin::Delete => "delete",
            Builtin::HasKey => "haskey",
            Builtin::GetKey => "getkey",
            Builtin::Map => "map",
            Builtin::Fold => "fold",
            Builtin::Filter => "filter",
            Builtin::Not => "not",
        }
    }

    /// Number of arguments a call needs before the builtin runs.
    pub const fn arity(self) -> usize {
        match self {
            Builtin::Head | Builtin::Tail | Builtin::Length | Builtin::Not => 1,
            Builtin::Cons
            | Builtin::Delete
            | Builtin::HasKey
            | Builtin::GetKey
            | Builtin::Map
            | Builtin::Fold
            | Builtin::Filter => 2,
            Builtin::Insert => 3,
        }
    }

    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.iter().copied().find(|b| b.name() == name)
    }
}

fn expect_list<'a>(value: &'a Value) -> EvalResult<&'a Vector<Value>> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(type_mismatch("list", other.type_name())),
    }
}

fn expect_dict<'a>(value: &'a Value) -> EvalResult<&'a Vector<(Value, Value)>> {
    match value {
        Value::Dict(pairs) => Ok(pairs),
        other => Err(type_mismatch("dict", other.type_name())),
    }
}

// List operations

pub fn head(list: &Value) -> EvalResult {
    expect_list(list)?
        .front()
        .cloned()
        .ok_or_else(|| empty_list("head"))
}

pub fn tail(list: &Value) -> EvalResult {
    let items = expect_list(list)?;
    if items.is_empty() {
        return Err(empty_list("tail"));
    }
    Ok(Value::List(items.skip(1)))
}

pub fn cons(elem: Value, list: &Value) -> EvalResult {
    let mut items = expect_list(list)?.clone();
    items.push_front(elem);
    Ok(Value::List(items))
}

/// Length of a list, dictionary or string.
pub fn length(value: &Value) -> EvalResult {
    let len = match value {
        Value::List(items) => items.len(),
        Value::Dict(pairs) => pairs.len(),
        Value::Str(s) => s.chars().count(),
        other => return Err(type_mismatch("list, dict or string", other.type_name())),
    };
    i64::try_from(len)
        .map(Value::Int)
        .map_err(|_| crate::errors::integer_overflow("length"))
}

// Dictionary operations

fn key_position(pairs: &Vector<(Value, Value)>, key: &Value) -> Option<usize> {
    pairs.iter().position(|(k, _)| k == key)
}

/// Insert into an association: an existing key keeps its position and gets
/// the new value; a new key is appended.
pub fn insert_pair(
    mut pairs: Vector<(Value, Value)>,
    key: Value,
    value: Value,
) -> Vector<(Value, Value)> {
    match key_position(&pairs, &key) {
        Some(index) => {
            pairs.set(index, (key, value));
        }
        None => pairs.push_back((key, value)),
    }
    pairs
}

pub fn insert(key: Value, value: Value, dict: &Value) -> EvalResult {
    let pairs = expect_dict(dict)?.clone();
    Ok(Value::Dict(insert_pair(pairs, key, value)))
}

/// Remove `key`; an absent key leaves the dictionary unchanged.
pub fn delete(key: &Value, dict: &Value) -> EvalResult {
    let pairs = expect_dict(dict)?;
    match key_position(pairs, key) {
        Some(index) => {
            let mut pairs = pairs.clone();
            pairs.remove(index);
            Ok(Value::Dict(pairs))
        }
        None => Ok(dict.clone()),
    }
}

pub fn has_key(key: &Value, dict: &Value) -> EvalResult {
    let pairs = expect_dict(dict)?;
    Ok(Value::Bool(key_position(pairs, key).is_some()))
}

/// Value stored under `key`; a missing key is a dictionary error.
pub fn get_key(key: &Value, dict: &Value) -> EvalResult {
    let pairs = expect_dict(dict)?;
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .ok_or_else(|| key_not_found(key))
}
