//! Error types for configuration binding

use crate::resolve::Source;

/// Errors that can occur while binding sources onto a record.
///
/// Structural errors (`NotRecord`, `UnsupportedType`, `TagFormat`) are detected
/// before any field is written. Conversion errors (`Parse`, `MapFormat`) abort
/// the pass at the first offending field and name both the field and the source
/// that produced the rejected literal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The binding target is not a record.
    ///
    /// Occurs when `process` is handed a scalar, a collection, or an optional
    /// scalar instead of a type deriving `Configrant`.
    #[error("Configuration target must be a record, got {type_name}")]
    NotRecord {
        /// Type name of the rejected target
        type_name: &'static str,
    },

    /// A field's type has no setter.
    ///
    /// Sequences and maps only hold scalar kinds, so composites nested inside
    /// composites (e.g. `Vec<Vec<u8>>`) end up here.
    #[error("Field '{field}' has type {type_name} which is not supported for configuration")]
    UnsupportedType {
        /// Dotted path of the field
        field: String,
        /// Type name of the field
        type_name: String,
    },

    /// A tag option does not follow the `key:value` form.
    #[error("Field '{field}' has malformed tag option '{option}', expected key:value")]
    TagFormat {
        /// Dotted path of the field
        field: String,
        /// The offending option, as written in the tag
        option: String,
    },

    /// A source literal could not be converted to the field's type.
    #[error("Failed to parse {origin} value '{value}' for field '{field}' as {kind}: {message}")]
    Parse {
        /// Dotted path of the field
        field: String,
        /// Source the literal was taken from
        origin: Source,
        /// Target kind, e.g. `u16` or `duration`
        kind: String,
        /// The rejected literal
        value: String,
        /// Error message from the parser
        message: String,
    },

    /// A map entry does not split into exactly one key and one value.
    #[error("Invalid map entry '{entry}' in {origin} value for field '{field}', use key:value format")]
    MapFormat {
        /// Dotted path of the field
        field: String,
        /// Source the literal was taken from
        origin: Source,
        /// The offending entry
        entry: String,
    },
}

/// Field-independent conversion failure reported by setters and slots.
///
/// The application pass attaches the field path and source with [`ConvertError::at`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// The literal is not valid for the target kind.
    #[error("failed to parse '{value}' as {kind}: {message}")]
    Parse {
        /// Target kind, e.g. `i8` or `duration`
        kind: String,
        /// The rejected literal
        value: String,
        /// Error message from the parser
        message: String,
    },

    /// A map entry is not of the `key:value` form.
    #[error("invalid map entry '{entry}', use key:value format")]
    MapFormat {
        /// The offending entry
        entry: String,
    },

    /// No setter exists for the kind.
    #[error("{kind} is not supported for configuration")]
    Unsupported {
        /// Display form of the kind, e.g. `sequence of sequence of u8`
        kind: String,
    },

    /// A slot was handed a value of another kind.
    #[error("{type_name} cannot hold a {found} value")]
    Mismatch {
        /// Type name of the slot
        type_name: &'static str,
        /// Kind name of the value, see [`Value::kind_name`](crate::Value::kind_name)
        found: &'static str,
    },
}

impl ConvertError {
    pub(crate) fn parse(
        kind: impl ToString,
        value: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::Parse {
            kind: kind.to_string(),
            value: value.into(),
            message: message.to_string(),
        }
    }

    /// Attach the field path and the source of the rejected literal.
    pub fn at(self, field: &str, origin: Source) -> Error {
        match self {
            Self::Parse {
                kind,
                value,
                message,
            } => Error::Parse {
                field: field.to_string(),
                origin,
                kind,
                value,
                message,
            },
            Self::MapFormat { entry } => Error::MapFormat {
                field: field.to_string(),
                origin,
                entry,
            },
            Self::Unsupported { kind } => Error::UnsupportedType {
                field: field.to_string(),
                type_name: kind,
            },
            Self::Mismatch { type_name, .. } => Error::UnsupportedType {
                field: field.to_string(),
                type_name: type_name.to_string(),
            },
        }
    }
}
