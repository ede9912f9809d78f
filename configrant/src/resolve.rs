//! Source resolution: argument, then environment, then default

use std::env;
use std::fmt;

use crate::args::Args;

/// Where a field may take its value from.
///
/// Empty names mean "no such source". Built from a field tag by
/// [`Tag::parse`](crate::Tag::parse).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources {
    /// Key looked up in the argument table
    pub arg: String,
    /// Environment variable name
    pub env: String,
    /// Literal used when neither the argument nor the variable is set
    pub default: String,
}

/// The source a resolved literal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Argument,
    Environment,
    Default,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Argument => "argument",
            Self::Environment => "environment",
            Self::Default => "default",
        })
    }
}

/// A literal picked by [`Sources::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub source: Source,
}

impl Sources {
    /// True when no source is configured at all.
    pub fn is_empty(&self) -> bool {
        self.arg.is_empty() && self.env.is_empty() && self.default.is_empty()
    }

    /// Pick the literal to bind.
    ///
    /// Priority order:
    /// 1. Argument `arg`, if present in `args` with a non-empty value
    /// 2. Environment variable `env`, if set to a non-empty string
    /// 3. The non-empty `default` literal
    ///
    /// Returns `None` when every level is absent or empty. The environment is
    /// read on every call.
    pub fn resolve(&self, args: &Args) -> Option<Resolved> {
        if !self.arg.is_empty() {
            if let Some(value) = args.get(&self.arg).filter(|value| !value.is_empty()) {
                return Some(Resolved {
                    value: value.to_string(),
                    source: Source::Argument,
                });
            }
        }

        if !self.env.is_empty() {
            if let Some(value) = env::var(&self.env).ok().filter(|value| !value.is_empty()) {
                return Some(Resolved {
                    value,
                    source: Source::Environment,
                });
            }
        }

        (!self.default.is_empty()).then(|| Resolved {
            value: self.default.clone(),
            source: Source::Default,
        })
    }
}
