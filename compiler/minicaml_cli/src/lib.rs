//! minicaml command-line front-end.
//!
//! The binary loads an expression tree serialized as JSON (the serde form of
//! [`minicaml_ir::Expr`]), evaluates or prints it, and reports failures with
//! their category and backtrace. Parsing concrete syntax is left to whatever
//! tool produced the JSON.

pub mod commands;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber, once, and only when `RUST_LOG` is set.
///
/// Spans are rendered as an indented tree on stderr so that nested
/// applications read like a call graph.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .with(filter)
                .init();
        }
    });
}
