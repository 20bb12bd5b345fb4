//! Expression tree.
//!
//! Trees are built once by a front-end and never mutated. Every child is held
//! behind an [`Arc`] so that closures, thunks and diagnostic stack frames can
//! keep a subtree alive without copying it.

use std::sync::Arc;

use crate::{BinaryOp, Name, UnaryOp};

/// A single `name = value` pair of a binding form.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LetBinding {
    pub name: Name,
    pub value: Arc<Expr>,
}

impl LetBinding {
    pub fn new(name: impl Into<Name>, value: impl Into<Arc<Expr>>) -> Self {
        LetBinding {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// List literal as a chain of cons cells.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListPattern {
    Empty,
    Cons(Arc<Expr>, Box<ListPattern>),
}

impl ListPattern {
    /// Build the cons chain for the given elements, first element outermost.
    pub fn from_exprs<I>(exprs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arc<Expr>>,
        I::IntoIter: DoubleEndedIterator,
    {
        exprs
            .into_iter()
            .rev()
            .fold(ListPattern::Empty, |tail, head| {
                ListPattern::Cons(head.into(), Box::new(tail))
            })
    }

    /// Iterate the element expressions from head to tail.
    pub fn iter(&self) -> ListPatternIter<'_> {
        ListPatternIter { cursor: self }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ListPattern::Empty)
    }
}

/// Iterator over the elements of a [`ListPattern`].
pub struct ListPatternIter<'a> {
    cursor: &'a ListPattern,
}

impl<'a> Iterator for ListPatternIter<'a> {
    type Item = &'a Arc<Expr>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.cursor {
            ListPattern::Empty => None,
            ListPattern::Cons(head, tail) => {
                self.cursor = tail;
                Some(head)
            }
        }
    }
}

/// A minicaml expression.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    // Literals
    Unit,
    Integer(i64),
    Boolean(bool),
    String(String),
    List(ListPattern),
    /// Dictionary literal; a repeated key replaces the earlier value in place.
    Dict(Vec<(Arc<Expr>, Arc<Expr>)>),

    Symbol(Name),

    // List primitives
    Head(Arc<Expr>),
    Tail(Arc<Expr>),
    Cons {
        elem: Arc<Expr>,
        list: Arc<Expr>,
    },

    // Dictionary primitives
    DictInsert {
        key: Arc<Expr>,
        value: Arc<Expr>,
        dict: Arc<Expr>,
    },
    DictDelete {
        key: Arc<Expr>,
        dict: Arc<Expr>,
    },
    DictHasKey {
        key: Arc<Expr>,
        dict: Arc<Expr>,
    },
    DictGetKey {
        key: Arc<Expr>,
        dict: Arc<Expr>,
    },

    // Higher-order combinators
    Mapv {
        coll: Arc<Expr>,
        func: Arc<Expr>,
    },
    Fold {
        coll: Arc<Expr>,
        func: Arc<Expr>,
    },
    Filter {
        coll: Arc<Expr>,
        func: Arc<Expr>,
    },

    // Operators
    Binary {
        op: BinaryOp,
        left: Arc<Expr>,
        right: Arc<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Arc<Expr>,
    },

    IfThenElse {
        cond: Arc<Expr>,
        then_branch: Arc<Expr>,
        else_branch: Arc<Expr>,
    },

    // Binding forms
    Let {
        bindings: Vec<LetBinding>,
        body: Arc<Expr>,
    },
    Letlazy {
        bindings: Vec<LetBinding>,
        body: Arc<Expr>,
    },
    Letrec {
        binding: LetBinding,
        body: Arc<Expr>,
    },
    Letreclazy {
        binding: LetBinding,
        body: Arc<Expr>,
    },

    // Declarations: binding forms without a body. Inside a `Sequence` they
    // extend the environment of the elements that follow.
    Def(Vec<LetBinding>),
    Deflazy(Vec<LetBinding>),
    Defrec(LetBinding),
    Defreclazy(LetBinding),

    Lambda {
        params: Vec<Name>,
        body: Arc<Expr>,
    },
    Apply {
        callee: Arc<Expr>,
        args: Vec<Arc<Expr>>,
    },
    Sequence(Vec<Arc<Expr>>),
    /// `arg |> func`: apply `func` to `arg`.
    Pipe {
        func: Arc<Expr>,
        arg: Arc<Expr>,
    },
}

// Constructors. They accept either owned expressions or shared `Arc`s.

impl Expr {
    pub fn int(n: i64) -> Self {
        Expr::Integer(n)
    }

    pub fn bool(b: bool) -> Self {
        Expr::Boolean(b)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Expr::String(s.into())
    }

    pub fn symbol(name: impl Into<Name>) -> Self {
        Expr::Symbol(name.into())
    }

    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arc<Expr>>,
        I::IntoIter: DoubleEndedIterator,
    {
        Expr::List(ListPattern::from_exprs(items))
    }

    pub fn dict<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Arc<Expr>>,
        V: Into<Arc<Expr>>,
    {
        Expr::Dict(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn head(list: impl Into<Arc<Expr>>) -> Self {
        Expr::Head(list.into())
    }

    pub fn tail(list: impl Into<Arc<Expr>>) -> Self {
        Expr::Tail(list.into())
    }

    pub fn cons(elem: impl Into<Arc<Expr>>, list: impl Into<Arc<Expr>>) -> Self {
        Expr::Cons {
            elem: elem.into(),
            list: list.into(),
        }
    }

    pub fn insert(
        key: impl Into<Arc<Expr>>,
        value: impl Into<Arc<Expr>>,
        dict: impl Into<Arc<Expr>>,
    ) -> Self {
        Expr::DictInsert {
            key: key.into(),
            value: value.into(),
            dict: dict.into(),
        }
    }

    pub fn delete(key: impl Into<Arc<Expr>>, dict: impl Into<Arc<Expr>>) -> Self {
        Expr::DictDelete {
            key: key.into(),
            dict: dict.into(),
        }
    }

    pub fn has_key(key: impl Into<Arc<Expr>>, dict: impl Into<Arc<Expr>>) -> Self {
        Expr::DictHasKey {
            key: key.into(),
            dict: dict.into(),
        }
    }

    pub fn get_key(key: impl Into<Arc<Expr>>, dict: impl Into<Arc<Expr>>) -> Self {
        Expr::DictGetKey {
            key: key.into(),
            dict: dict.into(),
        }
    }

    pub fn map(coll: impl Into<Arc<Expr>>, func: impl Into<Arc<Expr>>) -> Self {
        Expr::Mapv {
            coll: coll.into(),
            func: func.into(),
        }
    }

    pub fn fold(coll: impl Into<Arc<Expr>>, func: impl Into<Arc<Expr>>) -> Self {
        Expr::Fold {
            coll: coll.into(),
            func: func.into(),
        }
    }

    pub fn filter(coll: impl Into<Arc<Expr>>, func: impl Into<Arc<Expr>>) -> Self {
        Expr::Filter {
            coll: coll.into(),
            func: func.into(),
        }
    }

    pub fn binary(op: BinaryOp, left: impl Into<Arc<Expr>>, right: impl Into<Arc<Expr>>) -> Self {
        Expr::Binary {
            op,
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn add(left: impl Into<Arc<Expr>>, right: impl Into<Arc<Expr>>) -> Self {
        Expr::binary(BinaryOp::Add, left, right)
    }

    pub fn sub(left: impl Into<Arc<Expr>>, right: impl Into<Arc<Expr>>) -> Self {
        Expr::binary(BinaryOp::Sub, left, right)
    }

    pub fn mul(left: impl Into<Arc<Expr>>, right: impl Into<Arc<Expr>>) -> Self {
        Expr::binary(BinaryOp::Mul, left, right)
    }

    pub fn equals(left: impl Into<Arc<Expr>>, right: impl Into<Arc<Expr>>) -> Self {
        Expr::binary(BinaryOp::Eq, left, right)
    }

    pub fn lt(left: impl Into<Arc<Expr>>, right: impl Into<Arc<Expr>>) -> Self {
        Expr::binary(BinaryOp::Lt, left, right)
    }

    pub fn bool_not(operand: impl Into<Arc<Expr>>) -> Self {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: operand.into(),
        }
    }

    pub fn int_neg(operand: impl Into<Arc<Expr>>) -> Self {
        Expr::Unary {
            op: UnaryOp::Neg,
            operand: operand.into(),
        }
    }

    pub fn if_(
        cond: impl Into<Arc<Expr>>,
        then_branch: impl Into<Arc<Expr>>,
        else_branch: impl Into<Arc<Expr>>,
    ) -> Self {
        Expr::IfThenElse {
            cond: cond.into(),
            then_branch: then_branch.into(),
            else_branch: else_branch.into(),
        }
    }

    pub fn let_(bindings: Vec<LetBinding>, body: impl Into<Arc<Expr>>) -> Self {
        Expr::Let {
            bindings,
            body: body.into(),
        }
    }

    pub fn let_lazy(bindings: Vec<LetBinding>, body: impl Into<Arc<Expr>>) -> Self {
        Expr::Letlazy {
            bindings,
            body: body.into(),
        }
    }

    pub fn let_rec(
        name: impl Into<Name>,
        value: impl Into<Arc<Expr>>,
        body: impl Into<Arc<Expr>>,
    ) -> Self {
        Expr::Letrec {
            binding: LetBinding::new(name, value),
            body: body.into(),
        }
    }

    pub fn let_rec_lazy(
        name: impl Into<Name>,
        value: impl Into<Arc<Expr>>,
        body: impl Into<Arc<Expr>>,
    ) -> Self {
        Expr::Letreclazy {
            binding: LetBinding::new(name, value),
            body: body.into(),
        }
    }

    pub fn lambda<P: Into<Name>>(
        params: impl IntoIterator<Item = P>,
        body: impl Into<Arc<Expr>>,
    ) -> Self {
        Expr::Lambda {
            params: params.into_iter().map(Into::into).collect(),
            body: body.into(),
        }
    }

    pub fn apply<A: Into<Arc<Expr>>>(
        callee: impl Into<Arc<Expr>>,
        args: impl IntoIterator<Item = A>,
    ) -> Self {
        Expr::Apply {
            callee: callee.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn sequence<E: Into<Arc<Expr>>>(exprs: impl IntoIterator<Item = E>) -> Self {
        Expr::Sequence(exprs.into_iter().map(Into::into).collect())
    }

    pub fn pipe(func: impl Into<Arc<Expr>>, arg: impl Into<Arc<Expr>>) -> Self {
        Expr::Pipe {
            func: func.into(),
            arg: arg.into(),
        }
    }

    /// Short variant name, for tracing output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Unit => "Unit",
            Expr::Integer(_) => "Integer",
            Expr::Boolean(_) => "Boolean",
            Expr::String(_) => "String",
            Expr::List(_) => "List",
            Expr::Dict(_) => "Dict",
            Expr::Symbol(_) => "Symbol",
            Expr::Head(_) => "Head",
            Expr::Tail(_) => "Tail",
            Expr::Cons { .. } => "Cons",
            Expr::DictInsert { .. } => "DictInsert",
            Expr::DictDelete { .. } => "DictDelete",
            Expr::DictHasKey { .. } => "DictHasKey",
            Expr::DictGetKey { .. } => "DictGetKey",
            Expr::Mapv { .. } => "Mapv",
            Expr::Fold { .. } => "Fold",
            Expr::Filter { .. } => "Filter",
            Expr::Binary { .. } => "Binary",
            Expr::Unary { .. } => "Unary",
            Expr::IfThenElse { .. } => "IfThenElse",
            Expr::Let { .. } => "Let",
            Expr::Letlazy { .. } => "Letlazy",
            Expr::Letrec { .. } => "Letrec",
            Expr::Letreclazy { .. } => "Letreclazy",
            Expr::Def(_) => "Def",
            Expr::Deflazy(_) => "Deflazy",
            Expr::Defrec(_) => "Defrec",
            Expr::Defreclazy(_) => "Defreclazy",
            Expr::Lambda { .. } => "Lambda",
            Expr::Apply { .. } => "Apply",
            Expr::Sequence(_) => "Sequence",
            Expr::Pipe { .. } => "Pipe",
        }
    }

    /// Whether this is a `def` form, which extends the scope of the
    /// expressions after it in a sequence.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            Expr::Def(_) | Expr::Deflazy(_) | Expr::Defrec(_) | Expr::Defreclazy(_)
        )
    }

    /// Whether this expression renders without surrounding parentheses.
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            Expr::Unit
                | Expr::Integer(_)
                | Expr::Boolean(_)
                | Expr::String(_)
                | Expr::List(_)
                | Expr::Dict(_)
                | Expr::Symbol(_)
        )
    }
}
