//! minicaml IR - expression tree shared by front-ends and the evaluator.
//!
//! Front-ends (parsers, JSON loaders, tests) build [`Expr`] trees; the
//! evaluator in `minicaml_eval` reduces them to values. Nothing in this crate
//! evaluates anything.
//!
//! # Modules
//!
//! - `expr`: the `Expr` sum type, `ListPattern`, `LetBinding`
//! - `operators`: `BinaryOp`, `UnaryOp`
//! - `pretty`: `Display` for expressions (OCaml-like concrete syntax)

mod expr;
mod operators;
mod pretty;

use std::sync::Arc;

pub use expr::{Expr, LetBinding, ListPattern, ListPatternIter};
pub use operators::{BinaryOp, UnaryOp};

/// Identifier for bound names and lambda parameters.
///
/// Shared so that environments, closures and expression trees can hold the
/// same name without reallocating it.
pub type Name = Arc<str>;
