//! Field tag grammar
//!
//! A tag is either the exclusion sentinel `-` or a comma-separated list of
//! `key:value` options. Recognized keys are `arg`, `env` and `default`; other
//! keys are ignored. Only the first `:` of an option separates key from value,
//! so values may contain colons (URLs, map literals). Neither `,` nor `:` can
//! be escaped.

use crate::resolve::Sources;

/// Tag that excludes a field from binding.
pub const EXCLUDE: &str = "-";

/// Parsed form of a field tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// The field is never written.
    Exclude,
    /// The field is bound from these sources.
    Bind(Sources),
}

/// An option without the `key:value` shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed tag option '{option}', expected key:value")]
pub struct TagError {
    pub option: String,
}

impl Tag {
    /// Parse a tag string.
    ///
    /// The empty tag binds nothing: the field is visited but keeps its value.
    ///
    /// ```rust
    /// use configrant::{Sources, Tag};
    ///
    /// let tag = Tag::parse("arg:--url,env:API_URL,default:http://localhost:8080").unwrap();
    /// assert_eq!(
    ///     tag,
    ///     Tag::Bind(Sources {
    ///         arg: "--url".into(),
    ///         env: "API_URL".into(),
    ///         default: "http://localhost:8080".into(),
    ///     })
    /// );
    /// assert_eq!(Tag::parse("-").unwrap(), Tag::Exclude);
    /// ```
    pub fn parse(tag: &str) -> Result<Self, TagError> {
        if tag == EXCLUDE {
            return Ok(Self::Exclude);
        }

        let mut sources = Sources::default();
        if tag.is_empty() {
            return Ok(Self::Bind(sources));
        }

        for option in tag.split(',') {
            let (key, value) = option.split_once(':').ok_or_else(|| TagError {
                option: option.to_string(),
            })?;
            let value = value.trim().to_string();
            match key.trim() {
                "arg" => sources.arg = value,
                "env" => sources.env = value,
                "default" => sources.default = value,
                _ => {}
            }
        }

        Ok(Self::Bind(sources))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(tag: &str) -> Sources {
        match Tag::parse(tag).unwrap() {
            Tag::Bind(sources) => sources,
            Tag::Exclude => panic!("Expected sources for '{tag}'"),
        }
    }

    #[test]
    fn test_parse_all_keys() {
        let sources = bind("default:5s,arg:--timeout,env:TIMEOUT");
        assert_eq!(sources.arg, "--timeout");
        assert_eq!(sources.env, "TIMEOUT");
        assert_eq!(sources.default, "5s");
    }

    #[test]
    fn test_parse_exclude() {
        assert_eq!(Tag::parse("-").unwrap(), Tag::Exclude);
    }

    #[test]
    fn test_parse_empty_tag() {
        assert!(bind("").is_empty());
    }

    #[test]
    fn test_value_splits_on_first_colon() {
        assert_eq!(bind("default:http://localhost:3000").default, "http://localhost:3000");
        assert_eq!(bind("default:second:2;third:3").default, "second:2;third:3");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let sources = bind("env:RETRIES,option:value");
        assert_eq!(sources.env, "RETRIES");
        assert!(sources.arg.is_empty());
        assert!(sources.default.is_empty());
    }

    #[test]
    fn test_whitespace_around_options_trimmed() {
        let sources = bind("env:NAME, default: James ");
        assert_eq!(sources.env, "NAME");
        assert_eq!(sources.default, "James");
    }

    #[test]
    fn test_option_without_colon_is_rejected() {
        let err = Tag::parse("env:ASYNC,default").unwrap_err();
        assert_eq!(err.option, "default");

        // `;` is not an option separator, so this stays a single env option
        assert_eq!(bind("env:ASYNC;default:true").env, "ASYNC;default:true");

        let err = Tag::parse("env:NAME,").unwrap_err();
        assert_eq!(err.option, "");
    }

    #[test]
    fn test_later_option_overrides_earlier() {
        assert_eq!(bind("default:a,default:b").default, "b");
    }
}
