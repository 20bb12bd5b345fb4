//! The `run` command: evaluate an expression tree with builtins in scope.

use std::fmt::Write as _;

use minicaml_eval::{parse_depth, EvalConfig, EvalError, EvalResult, Evaluator, LazyStrategy};

use super::{load_expr, CliError};

/// Parsed `run` arguments. Flags override `MINICAML_*` variables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub path: String,
    pub max_depth: Option<usize>,
    pub by_need: bool,
}

impl RunOptions {
    /// Layer the flags over `base`.
    pub fn apply_to(&self, base: EvalConfig) -> EvalConfig {
        let mut config = base;
        if let Some(depth) = self.max_depth {
            config = config.with_max_depth(depth);
        }
        if self.by_need {
            config = config.with_lazy(LazyStrategy::ByNeed);
        }
        config
    }
}

/// Parse the arguments following `run`.
pub fn parse_run_options(args: &[String]) -> Result<RunOptions, CliError> {
    let mut options = RunOptions::default();
    let mut path = None;

    for arg in args {
        if let Some(depth) = arg.strip_prefix("--max-depth=") {
            let depth = parse_depth(depth).ok_or_else(|| {
                CliError::Usage(format!("invalid --max-depth value `{depth}`"))
            })?;
            options.max_depth = Some(depth);
        } else if arg == "--by-need" {
            options.by_need = true;
        } else if arg.starts_with('-') {
            return Err(CliError::Usage(format!("unknown option `{arg}`")));
        } else if path.is_none() {
            path = Some(arg.clone());
        } else {
            return Err(CliError::Usage(format!("unexpected argument `{arg}`")));
        }
    }

    options.path = path.ok_or_else(|| CliError::Usage("missing file path".to_string()))?;
    Ok(options)
}

/// Load and evaluate the file named by `options`.
///
/// The outer `Result` reports problems before evaluation; the inner one is
/// the evaluation outcome.
pub fn run_file(options: &RunOptions) -> Result<EvalResult, CliError> {
    let config = options.apply_to(EvalConfig::from_env()?);
    let expr = load_expr(&options.path)?;
    tracing::debug!(path = %options.path, ?config, "running");
    Ok(Evaluator::with_config(config).eval_program(expr))
}

/// `error[<category>]: <message>` followed by the backtrace, if any.
pub fn render_failure(err: &EvalError) -> String {
    let mut out = format!("error[{}]: {}\n", err.category(), err.kind);
    if let Some(backtrace) = &err.backtrace {
        let _ = write!(out, "{backtrace}");
    }
    out
}
