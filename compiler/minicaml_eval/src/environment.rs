//! Lexical environments.
//!
//! `Environment` is a persistent map (`im::HashMap`): binding a name returns a
//! new environment and leaves the receiver untouched, with the two sharing
//! structure. Closures and thunks store an environment by value, so extending
//! the defining scope later can never change what they see.

use std::fmt;
use std::sync::{Arc, OnceLock};

use im::HashMap;
use minicaml_ir::{Expr, Name};

use crate::builtins::Builtin;
use crate::Value;

/// A deferred computation: an expression and the environment to evaluate it in.
///
/// The memo cell is shared between every copy of the thunk. It is only
/// written under call-by-need evaluation; under call-by-name it stays empty
/// and the expression is re-evaluated on every lookup.
#[derive(Clone)]
pub struct Thunk {
    pub expr: Arc<Expr>,
    pub env: Environment,
    memo: Arc<OnceLock<Value>>,
}

impl Thunk {
    pub fn new(expr: Arc<Expr>, env: Environment) -> Self {
        Thunk {
            expr,
            env,
            memo: Arc::new(OnceLock::new()),
        }
    }

    /// The memoized value, if this thunk has been forced by need.
    pub fn forced(&self) -> Option<&Value> {
        self.memo.get()
    }

    /// Record the forced value. The first recorded value wins.
    pub(crate) fn memoize(&self, value: Value) -> Value {
        self.memo.get_or_init(|| value).clone()
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thunk")
            .field("expr", &self.expr)
            .field("forced", &self.memo.get().is_some())
            .finish_non_exhaustive()
    }
}

/// What a name is bound to.
#[derive(Clone, Debug)]
pub enum Binding {
    Evaluated(Value),
    Thunk(Thunk),
}

/// Persistent name → binding map.
#[derive(Clone, Default)]
pub struct Environment {
    bindings: HashMap<Name, Binding>,
}

impl Environment {
    /// Create an empty environment (no builtins).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment holding every builtin primitive under its name.
    pub fn with_builtins() -> Self {
        Builtin::ALL.iter().fold(Self::new(), |env, &builtin| {
            env.bind(Name::from(builtin.name()), Value::primitive(builtin))
        })
    }

    /// Look up the nearest binding for `name`.
    ///
    /// The empty name is never bound.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        if name.is_empty() {
            return None;
        }
        self.bindings.get(name)
    }

    /// Return a new environment with `name` bound to an evaluated value.
    #[must_use]
    pub fn bind(&self, name: Name, value: Value) -> Self {
        self.extend(name, Binding::Evaluated(value))
    }

    /// Return a new environment with `name` bound to a deferred computation.
    #[must_use]
    pub fn bind_thunk(&self, name: Name, thunk: Thunk) -> Self {
        self.extend(name, Binding::Thunk(thunk))
    }

    /// Return a new environment with `name` bound to `binding`, shadowing any
    /// earlier binding of the same name.
    #[must_use]
    pub fn extend(&self, name: Name, binding: Binding) -> Self {
        Environment {
            bindings: self.bindings.update(name, binding),
        }
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.bindings.keys()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.bindings.keys().map(|n| &**n).collect();
        names.sort_unstable();
        f.debug_struct("Environment").field("names", &names).finish()
    }
}
