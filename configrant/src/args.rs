//! Command-line argument lookup table

use std::collections::HashMap;

/// Immutable lookup table built from an argument vector.
///
/// Each argument is either `key=value`, split at the first `=`, or a bare
/// `key`, which is recorded as `"true"` so boolean switches can be passed
/// without a value. Later occurrences of a key replace earlier ones.
///
/// ```rust
/// use configrant::Args;
///
/// let args = Args::parse(["--timeout=7s", "--verbose", "--url=http://host/?a=b"]);
/// assert_eq!(args.get("--timeout"), Some("7s"));
/// assert_eq!(args.get("--verbose"), Some("true"));
/// assert_eq!(args.get("--url"), Some("http://host/?a=b"));
/// assert_eq!(args.get("--missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    values: HashMap<String, String>,
}

impl Args {
    /// Build the table from an argument vector (program name excluded).
    pub fn parse<I, S>(arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values = arguments
            .into_iter()
            .map(|argument| split_argument(argument.as_ref()))
            .collect();
        Self { values }
    }

    /// Build the table from the arguments of the current process.
    ///
    /// The program name is skipped; arguments that are not valid unicode are
    /// converted lossily.
    pub fn from_env() -> Self {
        Self::parse(
            std::env::args_os()
                .skip(1)
                .map(|argument| argument.to_string_lossy().into_owned()),
        )
    }

    /// Look up the value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no argument was given.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Args {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::parse(iter)
    }
}

fn split_argument(argument: &str) -> (String, String) {
    match argument.split_once('=') {
        Some((key, value)) => (key.to_string(), value.to_string()),
        None => (argument.to_string(), "true".to_string()),
    }
}
