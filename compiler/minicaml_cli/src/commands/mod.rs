//! CLI commands and the helpers they share.

mod print;
mod run;

pub use print::print_file;
pub use run::{parse_run_options, render_failure, run_file, RunOptions};

use std::path::PathBuf;

use minicaml_ir::Expr;
use serde::Deserialize;

/// Failure before evaluation starts.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("'{}' is not a valid expression tree: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Config(#[from] minicaml_eval::ConfigError),
    #[error("{0}")]
    Usage(String),
}

/// Decode an expression tree from its JSON form.
///
/// Every list element adds two levels of JSON nesting, so serde_json's
/// recursion limit is lifted and the stack grows on demand instead.
pub fn parse_expr(path: &str, json: &str) -> Result<Expr, CliError> {
    decode_unbounded(json).map_err(|source| CliError::Decode {
        path: PathBuf::from(path),
        source,
    })
}

fn decode_unbounded(json: &str) -> Result<Expr, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let expr = Expr::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(expr)
}

/// Read and decode the expression tree stored at `path`.
pub fn load_expr(path: &str) -> Result<Expr, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: PathBuf::from(path),
        source,
    })?;
    parse_expr(path, &json)
}
