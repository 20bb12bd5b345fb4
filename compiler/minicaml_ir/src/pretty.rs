//! Expression rendering.
//!
//! Produces an OCaml-like surface form. Used for backtraces and by the CLI's
//! `print` command, so it favors readability over round-tripping: any
//! non-atomic operand is parenthesized instead of consulting a precedence
//! table.

use std::fmt;

use crate::{Expr, LetBinding, Name};

/// Writes `expr`, parenthesized unless it is atomic.
struct Operand<'a>(&'a Expr);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_atomic() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "({})", self.0)
        }
    }
}

fn write_separated<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
    sep: &str,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_bindings(f: &mut fmt::Formatter<'_>, bindings: &[LetBinding]) -> fmt::Result {
    for (i, binding) in bindings.iter().enumerate() {
        if i > 0 {
            f.write_str(" and ")?;
        }
        write!(f, "{} = {}", binding.name, binding.value)?;
    }
    Ok(())
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[Name]) -> fmt::Result {
    write_separated(f, params.iter(), " ")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Unit => f.write_str("()"),
            Expr::Integer(n) => write!(f, "{n}"),
            Expr::Boolean(b) => write!(f, "{b}"),
            Expr::String(s) => write!(f, "{s:?}"),
            Expr::List(items) => {
                f.write_str("[")?;
                write_separated(f, items.iter(), "; ")?;
                f.write_str("]")
            }
            Expr::Dict(pairs) => {
                f.write_str("{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                f.write_str("}")
            }
            Expr::Symbol(name) => f.write_str(name),

            Expr::Head(list) => write!(f, "head {}", Operand(list)),
            Expr::Tail(list) => write!(f, "tail {}", Operand(list)),
            Expr::Cons { elem, list } => write!(f, "{} :: {}", Operand(elem), Operand(list)),

            Expr::DictInsert { key, value, dict } => write!(
                f,
                "insert {} {} {}",
                Operand(key),
                Operand(value),
                Operand(dict)
            ),
            Expr::DictDelete { key, dict } => {
                write!(f, "delete {} {}", Operand(key), Operand(dict))
            }
            Expr::DictHasKey { key, dict } => {
                write!(f, "haskey {} {}", Operand(key), Operand(dict))
            }
            Expr::DictGetKey { key, dict } => {
                write!(f, "getkey {} {}", Operand(key), Operand(dict))
            }

            Expr::Mapv { coll, func } => write!(f, "map {} {}", Operand(func), Operand(coll)),
            Expr::Fold { coll, func } => write!(f, "fold {} {}", Operand(func), Operand(coll)),
            Expr::Filter { coll, func } => {
                write!(f, "filter {} {}", Operand(func), Operand(coll))
            }

            Expr::Binary { op, left, right } => write!(
                f,
                "{} {} {}",
                Operand(left),
                op.as_symbol(),
                Operand(right)
            ),
            Expr::Unary { op, operand } => match op {
                crate::UnaryOp::Not => write!(f, "not {}", Operand(operand)),
                crate::UnaryOp::Neg => write!(f, "-{}", Operand(operand)),
            },

            Expr::IfThenElse {
                cond,
                then_branch,
                else_branch,
            } => write!(f, "if {cond} then {then_branch} else {else_branch}"),

            Expr::Let { bindings, body } => {
                f.write_str("let ")?;
                write_bindings(f, bindings)?;
                write!(f, " in {body}")
            }
            Expr::Letlazy { bindings, body } => {
                f.write_str("let lazy ")?;
                write_bindings(f, bindings)?;
                write!(f, " in {body}")
            }
            Expr::Letrec { binding, body } => {
                write!(f, "let rec {} = {} in {body}", binding.name, binding.value)
            }
            Expr::Letreclazy { binding, body } => write!(
                f,
                "let lazy rec {} = {} in {body}",
                binding.name, binding.value
            ),

            Expr::Def(bindings) => {
                f.write_str("let ")?;
                write_bindings(f, bindings)
            }
            Expr::Deflazy(bindings) => {
                f.write_str("let lazy ")?;
                write_bindings(f, bindings)
            }
            Expr::Defrec(binding) => write!(f, "let rec {} = {}", binding.name, binding.value),
            Expr::Defreclazy(binding) => {
                write!(f, "let lazy rec {} = {}", binding.name, binding.value)
            }

            Expr::Lambda { params, body } => {
                f.write_str("fun ")?;
                write_params(f, params)?;
                write!(f, " -> {body}")
            }
            Expr::Apply { callee, args } => {
                write!(f, "{}", Operand(callee))?;
                if args.is_empty() {
                    return f.write_str(" ()");
                }
                for arg in args {
                    write!(f, " {}", Operand(arg))?;
                }
                Ok(())
            }
            Expr::Sequence(exprs) => write_separated(f, exprs.iter().map(|e| Operand(e)), "; "),
            Expr::Pipe { func, arg } => write!(f, "{} |> {}", Operand(arg), Operand(func)),
        }
    }
}
