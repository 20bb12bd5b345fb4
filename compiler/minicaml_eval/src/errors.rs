//! Evaluation errors.
//!
//! `EvalErrorKind` carries the structured data of each failure; `EvalError`
//! wraps it together with the backtrace captured from the diagnostic call
//! stack. The factory functions at the bottom are the constructors the
//! evaluator uses; they keep message wording in one place.
//!
//! Every kind belongs to an [`ErrorCategory`]. `ErrorCategory::Fatal` marks
//! violations of the evaluator's own invariants (or exhaustion of its
//! resources) as opposed to errors in the evaluated program, so front-ends
//! can report them differently.

use std::fmt;

use minicaml_ir::BinaryOp;

use crate::Value;

/// Result of evaluation.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Coarse classification of an evaluation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    UnboundVariable,
    WrongBindingList,
    Type,
    List,
    Dict,
    /// Wrong number of arguments, empty sequences.
    Syntax,
    Arithmetic,
    /// Internal invariant violation or resource exhaustion, never a program error.
    Fatal,
}

impl ErrorCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnboundVariable => "unbound-variable",
            Self::WrongBindingList => "wrong-binding-list",
            Self::Type => "type",
            Self::List => "list",
            Self::Dict => "dict",
            Self::Syntax => "syntax",
            Self::Arithmetic => "arithmetic",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("unbound variable: {name}")]
    UnboundVariable { name: String },

    #[error("wrong binding list: `{name}` must be bound to a lambda in a recursive binding")]
    WrongBindingList { name: String },

    // Type
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },
    #[error("operator `{}` cannot be applied to `{left}` and `{right}`", .op.as_symbol())]
    BinaryTypeMismatch {
        op: BinaryOp,
        left: String,
        right: String,
    },
    #[error("{type_name} is not callable")]
    NotCallable { type_name: String },

    // List
    #[error("{operation} of an empty list")]
    EmptyList { operation: String },
    #[error("fold of an empty collection")]
    EmptyFold,

    // Dict
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    // Syntax
    #[error("{}", arity_message(.name, .expected, .got))]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("empty sequence has no value")]
    EmptySequence,

    // Arithmetic
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: String },

    // Fatal
    #[error("stack underflow: pop of an empty call stack")]
    StackUnderflow,
    #[error("maximum recursion depth exceeded (limit: {depth})")]
    RecursionLimit { depth: usize },
}

// thiserror hands fields over by reference
#[allow(clippy::trivially_copy_pass_by_ref)]
fn arity_message(name: &str, expected: &usize, got: &usize) -> String {
    let arg_word = if *expected == 1 {
        "argument"
    } else {
        "arguments"
    };
    if name.is_empty() {
        format!("expected {expected} {arg_word}, got {got}")
    } else {
        format!("{name} expects {expected} {arg_word}, got {got}")
    }
}

impl EvalErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnboundVariable { .. } => ErrorCategory::UnboundVariable,
            Self::WrongBindingList { .. } => ErrorCategory::WrongBindingList,
            Self::TypeMismatch { .. }
            | Self::BinaryTypeMismatch { .. }
            | Self::NotCallable { .. } => ErrorCategory::Type,
            Self::EmptyList { .. } | Self::EmptyFold => ErrorCategory::List,
            Self::KeyNotFound { .. } => ErrorCategory::Dict,
            Self::ArityMismatch { .. } | Self::EmptySequence => ErrorCategory::Syntax,
            Self::DivisionByZero | Self::ModuloByZero | Self::IntegerOverflow { .. } => {
                ErrorCategory::Arithmetic
            }
            Self::StackUnderflow | Self::RecursionLimit { .. } => ErrorCategory::Fatal,
        }
    }
}

/// One frame of a captured backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Stack depth of the frame (the outermost frame has depth 1).
    pub depth: usize,
    /// Rendering of the expression under evaluation, shortened.
    pub expr: String,
}

/// Snapshot of the diagnostic call stack at the point of failure.
///
/// Frames are ordered innermost first. Very deep stacks keep only the
/// innermost frames; `omitted` counts the rest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
    omitted: usize,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>, omitted: usize) -> Self {
        Self { frames, omitted }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn omitted(&self) -> usize {
        self.omitted
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for frame in &self.frames {
            writeln!(f, "  {}: {}", frame.depth, frame.expr)?;
        }
        if self.omitted > 0 {
            writeln!(f, "  ... {} outer frames omitted", self.omitted)?;
        }
        Ok(())
    }
}

/// Evaluation error: a structured kind plus the backtrace at the error site.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Filled in by the evaluator with the innermost call stack that saw
    /// the error.
    pub backtrace: Option<EvalBacktrace>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        Self {
            kind,
            backtrace: None,
        }
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }

    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Whether this error signals an evaluator fault rather than a program error.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.category() == ErrorCategory::Fatal
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::new(kind)
    }
}

// Binding errors

#[cold]
pub fn unbound_variable(name: &str) -> EvalError {
    EvalErrorKind::UnboundVariable {
        name: name.to_string(),
    }
    .into()
}

#[cold]
pub fn wrong_binding_list(name: &str) -> EvalError {
    EvalErrorKind::WrongBindingList {
        name: name.to_string(),
    }
    .into()
}

// Type errors

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    }
    .into()
}

#[cold]
pub fn binary_type_mismatch(op: BinaryOp, left: &str, right: &str) -> EvalError {
    EvalErrorKind::BinaryTypeMismatch {
        op,
        left: left.to_string(),
        right: right.to_string(),
    }
    .into()
}

#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    }
    .into()
}

// List and dict errors

#[cold]
pub fn empty_list(operation: &str) -> EvalError {
    EvalErrorKind::EmptyList {
        operation: operation.to_string(),
    }
    .into()
}

#[cold]
pub fn empty_fold() -> EvalError {
    EvalErrorKind::EmptyFold.into()
}

#[cold]
pub fn key_not_found(key: &Value) -> EvalError {
    EvalErrorKind::KeyNotFound {
        key: key.to_string(),
    }
    .into()
}

// Syntax errors

#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    }
    .into()
}

#[cold]
pub fn empty_sequence() -> EvalError {
    EvalErrorKind::EmptySequence.into()
}

// Arithmetic errors

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalErrorKind::DivisionByZero.into()
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalErrorKind::ModuloByZero.into()
}

#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    }
    .into()
}

// Fatal errors

#[cold]
pub fn stack_underflow() -> EvalError {
    EvalErrorKind::StackUnderflow.into()
}

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalErrorKind::RecursionLimit { depth }.into()
}
