//! Evaluator tests, grouped by language feature.

mod bindings_tests;
mod eval_tests;
