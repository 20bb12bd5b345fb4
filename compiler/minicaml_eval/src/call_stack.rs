//! Diagnostic call stack.
//!
//! `CallStack` records the chain of expressions under evaluation so that an
//! error can report how evaluation reached it. It is an immutable linked list:
//! `push` returns a new stack sharing every frame of its parent, so a stack
//! snapshot stays valid however evaluation continues. Dropping a child stack
//! is the persistent equivalent of popping it.
//!
//! The stack is used only for diagnostics. Its depth never decides how far
//! evaluation may recurse, except when the evaluator is configured with an
//! explicit `max_depth` (see [`CallStack::push_within`]).

use std::sync::Arc;

use minicaml_ir::Expr;

use crate::errors::{
    recursion_limit_exceeded, stack_underflow, BacktraceFrame, EvalBacktrace, EvalError,
    EvalResult,
};

/// Innermost frames kept when capturing a backtrace.
const MAX_BACKTRACE_FRAMES: usize = 32;

/// Longest expression rendering kept per backtrace frame, in characters.
const MAX_FRAME_WIDTH: usize = 80;

/// One frame: the expression under evaluation and its depth.
#[derive(Debug)]
pub struct CallFrame {
    pub depth: usize,
    pub expr: Arc<Expr>,
    parent: CallStack,
}

/// Immutable singly-linked stack of [`CallFrame`]s.
#[derive(Clone, Debug, Default)]
pub struct CallStack {
    top: Option<Arc<CallFrame>>,
}

impl CallStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new stack with `expr` as its innermost frame.
    #[must_use]
    pub fn push(&self, expr: Arc<Expr>) -> CallStack {
        CallStack {
            top: Some(Arc::new(CallFrame {
                depth: self.depth() + 1,
                expr,
                parent: self.clone(),
            })),
        }
    }

    /// Like [`push`](Self::push), but refuses to exceed `max_depth` frames.
    ///
    /// Exceeding the limit is a fatal error, not a program error.
    pub fn push_within(&self, expr: Arc<Expr>, max_depth: Option<usize>) -> EvalResult<CallStack> {
        if let Some(max) = max_depth {
            if self.depth() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        Ok(self.push(expr))
    }

    /// Return the parent stack.
    ///
    /// Popping the empty stack is an evaluator bug and yields a fatal
    /// `StackUnderflow` error.
    pub fn pop(&self) -> EvalResult<CallStack> {
        match &self.top {
            Some(frame) => Ok(frame.parent.clone()),
            None => Err(stack_underflow()),
        }
    }

    /// Number of frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.top.as_ref().map_or(0, |frame| frame.depth)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    /// The innermost frame, if any.
    #[inline]
    pub fn current_frame(&self) -> Option<&CallFrame> {
        self.top.as_deref()
    }

    /// Frames from innermost to outermost.
    pub fn frames(&self) -> Frames<'_> {
        Frames {
            cursor: self.top.as_deref(),
        }
    }

    /// Snapshot the innermost frames as a backtrace.
    pub fn capture(&self) -> EvalBacktrace {
        let frames: Vec<BacktraceFrame> = self
            .frames()
            .take(MAX_BACKTRACE_FRAMES)
            .map(|frame| BacktraceFrame {
                depth: frame.depth,
                expr: shorten(&frame.expr.to_string()),
            })
            .collect();
        let omitted = self.depth().saturating_sub(frames.len());
        EvalBacktrace::new(frames, omitted)
    }

    /// Attach this stack's backtrace to `err` unless it already carries one.
    ///
    /// Errors travel outward through every enclosing frame; keeping the first
    /// backtrace keeps the innermost, most precise one.
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        if err.backtrace.is_some() || self.is_empty() {
            return err;
        }
        let backtrace = self.capture();
        err.with_backtrace(backtrace)
    }
}

/// Iterator over the frames of a [`CallStack`], innermost first.
pub struct Frames<'a> {
    cursor: Option<&'a CallFrame>,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a CallFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.cursor?;
        self.cursor = frame.parent.top.as_deref();
        Some(frame)
    }
}

fn shorten(rendered: &str) -> String {
    if rendered.chars().count() <= MAX_FRAME_WIDTH {
        return rendered.to_string();
    }
    let mut short: String = rendered.chars().take(MAX_FRAME_WIDTH - 3).collect();
    short.push_str("...");
    short
}
