//! The `print` command: render an expression tree in concrete syntax.

use super::{load_expr, CliError};

pub fn print_file(path: &str) -> Result<String, CliError> {
    let expr = load_expr(path)?;
    Ok(expr.to_string())
}
