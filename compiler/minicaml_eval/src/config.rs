//! Evaluator configuration.

use std::fmt;

/// Environment variable bounding the diagnostic call-stack depth.
pub const MAX_DEPTH_VAR: &str = "MINICAML_MAX_DEPTH";

/// Environment variable selecting the lazy-binding strategy (`name` or `need`).
pub const LAZY_VAR: &str = "MINICAML_LAZY";

/// How thunks bound by `letlazy`/`letreclazy` are forced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LazyStrategy {
    /// Re-evaluate the thunk on every lookup.
    #[default]
    ByName,
    /// Evaluate on first lookup and reuse the result afterwards.
    ByNeed,
}

impl LazyStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            LazyStrategy::ByName => "name",
            LazyStrategy::ByNeed => "need",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "by-name" => Some(LazyStrategy::ByName),
            "need" | "by-need" => Some(LazyStrategy::ByNeed),
            _ => None,
        }
    }
}

impl fmt::Display for LazyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invalid configuration value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: `{value}` is not a positive integer")]
    InvalidDepth { var: String, value: String },
    #[error("invalid value for {var}: `{value}` (expected `name` or `need`)")]
    InvalidLazy { var: String, value: String },
}

/// Evaluator settings.
///
/// The default places no bound on the call-stack depth and forces lazy
/// bindings by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalConfig {
    /// Deepest diagnostic call stack allowed before a fatal `RecursionLimit`.
    pub max_depth: Option<usize>,
    pub lazy: LazyStrategy,
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    #[must_use]
    pub fn with_lazy(mut self, lazy: LazyStrategy) -> Self {
        self.lazy = lazy;
        self
    }

    /// Read `MINICAML_MAX_DEPTH` and `MINICAML_LAZY` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = EvalConfig::default();

        if let Some(value) = lookup(MAX_DEPTH_VAR).filter(|v| !v.trim().is_empty()) {
            let depth = parse_depth(&value).ok_or_else(|| ConfigError::InvalidDepth {
                var: MAX_DEPTH_VAR.to_string(),
                value: value.clone(),
            })?;
            config = config.with_max_depth(depth);
        }

        if let Some(value) = lookup(LAZY_VAR).filter(|v| !v.trim().is_empty()) {
            let lazy = LazyStrategy::parse(&value).ok_or_else(|| ConfigError::InvalidLazy {
                var: LAZY_VAR.to_string(),
                value: value.clone(),
            })?;
            config = config.with_lazy(lazy);
        }

        Ok(config)
    }
}

/// Parse a positive depth limit.
pub fn parse_depth(s: &str) -> Option<usize> {
    s.trim().parse::<usize>().ok().filter(|&n| n > 0)
}
