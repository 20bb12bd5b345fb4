//! Host stack growth for deeply recursive evaluation.
//!
//! `Evaluator::in_frame` wraps every evaluation step in
//! [`ensure_sufficient_stack`], so a program recursing twenty thousand calls
//! deep grows the native stack on demand rather than overflowing it.
//!
//! The guard sits once per frame, but the native work between two guarded
//! frames is not small: an application passes through `eval_expr`, `apply`
//! (with its tracing span), the closure binder and, for `map`/`filter`/`fold`,
//! the combinator loop before reaching the next `eval`. The red zone must
//! cover that whole path, hence 128KB. Segments are 2MB so that a deep
//! recursion allocates a few large segments rather than many small ones.
//!
//! On wasm32 `stacker` is unavailable and the step runs as is.

/// Remaining stack below which a new segment is allocated.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run one evaluation step, growing the stack first if it is nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(step: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, step)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(step: impl FnOnce() -> R) -> R {
    step()
}
