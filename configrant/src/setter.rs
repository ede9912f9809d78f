//! Type setter registry
//!
//! [`setter_for`] maps the [`Kind`] of a field to a [`Setter`] that turns a
//! source literal into a [`Value`]. Sequence and map setters obtain their
//! element setters from the same registry. Literal grammar:
//!
//! - sequence: `item;item;...`
//! - map: `key:value;key:value;...`

use std::fmt;
use std::time::Duration;

use crate::duration::parse_duration;
use crate::error::ConvertError;

const ITEM_SEPARATOR: char = ';';
const ENTRY_SEPARATOR: char = ':';

/// Shape of a leaf field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// `String`
    Str,
    /// `bool`
    Bool,
    /// Signed integer of the given width
    Int { bits: u32 },
    /// Unsigned integer of the given width
    Uint { bits: u32 },
    /// `f32` or `f64`
    Float { bits: u32 },
    /// `std::time::Duration`
    Duration,
    /// Sequence of the element kind
    Seq(Box<Kind>),
    /// Map from the key kind to the value kind
    Map(Box<Kind>, Box<Kind>),
}

impl Kind {
    /// True for sequences and maps.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Seq(_) | Self::Map(..))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => f.write_str("string"),
            Self::Bool => f.write_str("bool"),
            Self::Int { bits } => write!(f, "i{bits}"),
            Self::Uint { bits } => write!(f, "u{bits}"),
            Self::Float { bits } => write!(f, "f{bits}"),
            Self::Duration => f.write_str("duration"),
            Self::Seq(item) => write!(f, "sequence of {item}"),
            Self::Map(key, value) => write!(f, "map of {key} to {value}"),
        }
    }
}

/// A parsed literal, ready to be stored into a [`Slot`](crate::Slot).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    /// Range checked against the field width, stored widened
    Int(i64),
    /// Range checked against the field width, stored widened
    Uint(u64),
    /// `f32` literals are rounded to `f32` precision before widening
    Float(f64),
    Duration(Duration),
    /// Items in literal order
    Seq(Vec<Value>),
    /// Entries in literal order; storing them lets later keys win.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Short name of the variant, used in mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Bool(_) => "bool",
            Self::Int(_) => "signed integer",
            Self::Uint(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::Duration(_) => "duration",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "map",
        }
    }
}

/// Converts a literal into a [`Value`] of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setter {
    /// Takes the literal as is
    Str,
    /// `1 t T TRUE true True` / `0 f F FALSE false False`
    Bool,
    /// Decimal or `0x`/`0o`/`0b`/leading-`0` prefixed, range checked
    Int { bits: u32 },
    /// Same grammar as `Int`, without a sign
    Uint { bits: u32 },
    /// Decimal, scientific, hexadecimal (`0x1p-2`) or `inf`/`nan`
    Float { bits: u32 },
    /// Go duration notation, non-negative
    Duration,
    /// `;`-separated items, each parsed by the element setter
    Seq(Box<Setter>),
    /// `;`-separated `key:value` entries
    Map { key: Box<Setter>, value: Box<Setter> },
}

/// Select the setter for `kind`.
///
/// Sequences and maps only accept scalar element, key and value kinds: the
/// literal grammar has a single level of separators, so nested composites are
/// reported as unsupported.
pub fn setter_for(kind: &Kind) -> Result<Setter, ConvertError> {
    Ok(match kind {
        Kind::Str => Setter::Str,
        Kind::Bool => Setter::Bool,
        Kind::Int { bits } => Setter::Int { bits: *bits },
        Kind::Uint { bits } => Setter::Uint { bits: *bits },
        Kind::Float { bits } => Setter::Float { bits: *bits },
        Kind::Duration => Setter::Duration,
        Kind::Seq(item) => {
            if item.is_composite() {
                return Err(unsupported(kind));
            }
            Setter::Seq(Box::new(setter_for(item)?))
        }
        Kind::Map(key, value) => {
            if key.is_composite() || value.is_composite() {
                return Err(unsupported(kind));
            }
            Setter::Map {
                key: Box::new(setter_for(key)?),
                value: Box::new(setter_for(value)?),
            }
        }
    })
}

fn unsupported(kind: &Kind) -> ConvertError {
    ConvertError::Unsupported {
        kind: kind.to_string(),
    }
}

impl Setter {
    /// Parse `input` into a value of this setter's kind.
    pub fn parse(&self, input: &str) -> Result<Value, ConvertError> {
        match self {
            Self::Str => Ok(Value::Str(input.to_string())),
            Self::Bool => parse_bool(input).map(Value::Bool),
            Self::Int { bits } => parse_int(input, *bits).map(Value::Int),
            Self::Uint { bits } => parse_uint(input, *bits).map(Value::Uint),
            Self::Float { bits } => parse_float(input, *bits).map(Value::Float),
            Self::Duration => {
                let nanos =
                    parse_duration(input).map_err(|e| ConvertError::parse("duration", input, e))?;
                let nanos = u64::try_from(nanos).map_err(|_| {
                    ConvertError::parse("duration", input, "negative durations are not supported")
                })?;
                Ok(Value::Duration(Duration::from_nanos(nanos)))
            }
            Self::Seq(item) => {
                let input = input.trim();
                if input.is_empty() {
                    return Ok(Value::Seq(Vec::new()));
                }
                input
                    .split(ITEM_SEPARATOR)
                    .map(|literal| item.parse(literal))
                    .collect::<Result<_, _>>()
                    .map(Value::Seq)
            }
            Self::Map { key, value } => {
                let input = input.trim();
                if input.is_empty() {
                    return Ok(Value::Map(Vec::new()));
                }
                input
                    .split(ITEM_SEPARATOR)
                    .map(|entry| {
                        let (key_literal, value_literal) = split_entry(entry)?;
                        Ok((key.parse(key_literal)?, value.parse(value_literal)?))
                    })
                    .collect::<Result<_, _>>()
                    .map(Value::Map)
            }
        }
    }
}

fn split_entry(entry: &str) -> Result<(&str, &str), ConvertError> {
    let mut parts = entry.split(ENTRY_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => Ok((key, value)),
        _ => Err(ConvertError::MapFormat {
            entry: entry.to_string(),
        }),
    }
}

/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
fn parse_bool(input: &str) -> Result<bool, ConvertError> {
    match input {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ConvertError::parse("bool", input, "invalid syntax")),
    }
}

fn parse_int(input: &str, bits: u32) -> Result<i64, ConvertError> {
    let kind = Kind::Int { bits };
    let (negative, digits) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    let magnitude = parse_magnitude(digits).map_err(|e| ConvertError::parse(&kind, input, e))?;

    let limit = 1u64 << (bits - 1);
    if negative {
        if magnitude > limit {
            return Err(ConvertError::parse(&kind, input, OUT_OF_RANGE));
        }
        // `magnitude` may be exactly 2^63, which only fits once negated
        Ok(0i64.wrapping_sub(magnitude as i64))
    } else {
        if magnitude >= limit {
            return Err(ConvertError::parse(&kind, input, OUT_OF_RANGE));
        }
        Ok(magnitude as i64)
    }
}

fn parse_uint(input: &str, bits: u32) -> Result<u64, ConvertError> {
    let kind = Kind::Uint { bits };
    let value = parse_magnitude(input).map_err(|e| ConvertError::parse(&kind, input, e))?;
    let max = u64::MAX >> (64 - bits);
    if value > max {
        return Err(ConvertError::parse(&kind, input, OUT_OF_RANGE));
    }
    Ok(value)
}

const INVALID_SYNTAX: &str = "invalid syntax";
const OUT_OF_RANGE: &str = "value out of range";

/// Parse an unsigned integer literal with an optional base prefix.
///
/// `0x`, `0o` and `0b` select hexadecimal, octal and binary; a plain leading
/// `0` selects octal. `_` separators are only allowed after a prefix, between
/// digits.
fn parse_magnitude(literal: &str) -> Result<u64, &'static str> {
    let bytes = literal.as_bytes();
    let (radix, body) = match bytes {
        [b'0', b'x' | b'X', ..] => (16, &literal[2..]),
        [b'0', b'o' | b'O', ..] => (8, &literal[2..]),
        [b'0', b'b' | b'B', ..] => (2, &literal[2..]),
        [b'0', _, ..] => (8, &literal[1..]),
        _ => (10, literal),
    };
    let prefixed = body.len() != literal.len();

    if body.is_empty() || body.ends_with('_') || body.contains("__") {
        return Err(INVALID_SYNTAX);
    }
    if !prefixed && body.contains('_') {
        return Err(INVALID_SYNTAX);
    }

    let mut value: u64 = 0;
    for c in body.chars().filter(|c| *c != '_') {
        let digit = c.to_digit(radix).ok_or(INVALID_SYNTAX)?;
        value = value
            .checked_mul(u64::from(radix))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or(OUT_OF_RANGE)?;
    }
    Ok(value)
}

fn parse_float(input: &str, bits: u32) -> Result<f64, ConvertError> {
    let kind = Kind::Float { bits };
    let value = if is_hex_literal(input) {
        let value = parse_hex_float(input).map_err(|e| ConvertError::parse(&kind, input, e))?;
        if bits == 32 {
            f64::from(value as f32)
        } else {
            value
        }
    } else if bits == 32 {
        input
            .parse::<f32>()
            .map(f64::from)
            .map_err(|e| ConvertError::parse(&kind, input, e))?
    } else {
        input
            .parse::<f64>()
            .map_err(|e| ConvertError::parse(&kind, input, e))?
    };

    if value.is_infinite() && !is_infinity_literal(input) {
        return Err(ConvertError::parse(&kind, input, OUT_OF_RANGE));
    }
    Ok(value)
}

fn is_hex_literal(input: &str) -> bool {
    let unsigned = input.strip_prefix(['+', '-']).unwrap_or(input);
    unsigned.starts_with("0x") || unsigned.starts_with("0X")
}

/// Parse a hexadecimal float such as `0x1p-2` or `-0x1.8P+3`.
///
/// The binary exponent is mandatory. `_` may separate mantissa digits. Digits
/// beyond 64 bits of mantissa are truncated.
fn parse_hex_float(input: &str) -> Result<f64, &'static str> {
    let (negative, unsigned) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    let body = unsigned.get(2..).ok_or(INVALID_SYNTAX)?;
    let (mantissa, exponent) = body.split_once(['p', 'P']).ok_or(INVALID_SYNTAX)?;

    if mantissa.ends_with('_')
        || mantissa.contains("__")
        || mantissa.contains("_.")
        || mantissa.contains("._")
    {
        return Err(INVALID_SYNTAX);
    }

    let mut value: u64 = 0;
    let mut shift: i64 = 0;
    let mut digits = 0;
    let mut fraction = false;
    for c in mantissa.chars().filter(|c| *c != '_') {
        if c == '.' {
            if fraction {
                return Err(INVALID_SYNTAX);
            }
            fraction = true;
            continue;
        }
        let digit = c.to_digit(16).ok_or(INVALID_SYNTAX)?;
        digits += 1;
        if value >> 60 == 0 {
            value = (value << 4) | u64::from(digit);
            if fraction {
                shift -= 4;
            }
        } else if !fraction {
            shift += 4;
        }
    }
    if digits == 0 {
        return Err(INVALID_SYNTAX);
    }

    let exponent = exponent.parse::<i64>().map_err(|_| INVALID_SYNTAX)?;
    let magnitude = if value == 0 {
        0.0
    } else {
        // Scale in two steps so the intermediate power of two stays finite
        let exponent = exponent.saturating_add(shift).clamp(-4096, 4096) as i32;
        let half = exponent / 2;
        value as f64 * 2f64.powi(half) * 2f64.powi(exponent - half)
    };

    Ok(if negative { -magnitude } else { magnitude })
}

fn is_infinity_literal(input: &str) -> bool {
    let unsigned = input.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(kind: Kind, input: &str) -> Result<Value, ConvertError> {
        setter_for(&kind).unwrap().parse(input)
    }

    #[test]
    fn test_string_is_identity() {
        assert_eq!(
            parse(Kind::Str, " padded "),
            Ok(Value::Str(" padded ".to_string()))
        );
    }

    #[test]
    fn test_bool_literals() {
        for literal in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse(Kind::Bool, literal), Ok(Value::Bool(true)));
        }
        for literal in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse(Kind::Bool, literal), Ok(Value::Bool(false)));
        }
        assert!(matches!(
            parse(Kind::Bool, "yes"),
            Err(ConvertError::Parse { .. })
        ));
        assert!(parse(Kind::Bool, "tRUE").is_err());
        assert!(parse(Kind::Bool, "").is_err());
    }

    #[test]
    fn test_int_bases() {
        let i32_kind = || Kind::Int { bits: 32 };
        assert_eq!(parse(i32_kind(), "42"), Ok(Value::Int(42)));
        assert_eq!(parse(i32_kind(), "-42"), Ok(Value::Int(-42)));
        assert_eq!(parse(i32_kind(), "+7"), Ok(Value::Int(7)));
        assert_eq!(parse(i32_kind(), "0x1F"), Ok(Value::Int(31)));
        assert_eq!(parse(i32_kind(), "0o17"), Ok(Value::Int(15)));
        assert_eq!(parse(i32_kind(), "0b101"), Ok(Value::Int(5)));
        assert_eq!(parse(i32_kind(), "017"), Ok(Value::Int(15)));
        assert_eq!(parse(i32_kind(), "0"), Ok(Value::Int(0)));
        assert_eq!(parse(i32_kind(), "0x_ff_ff"), Ok(Value::Int(0xffff)));
    }

    #[test]
    fn test_int_invalid_syntax() {
        let i64_kind = || Kind::Int { bits: 64 };
        assert!(parse(i64_kind(), "").is_err());
        assert!(parse(i64_kind(), "-").is_err());
        assert!(parse(i64_kind(), "0x").is_err());
        assert!(parse(i64_kind(), "1_000").is_err());
        assert!(parse(i64_kind(), "12a").is_err());
        assert!(parse(i64_kind(), "019").is_err());
        assert!(parse(i64_kind(), " 1").is_err());
    }

    #[test]
    fn test_int_range_by_bits() {
        assert_eq!(parse(Kind::Int { bits: 8 }, "127"), Ok(Value::Int(127)));
        assert_eq!(parse(Kind::Int { bits: 8 }, "-128"), Ok(Value::Int(-128)));
        assert!(parse(Kind::Int { bits: 8 }, "128").is_err());
        assert!(parse(Kind::Int { bits: 8 }, "-129").is_err());
        assert_eq!(
            parse(Kind::Int { bits: 64 }, "-9223372036854775808"),
            Ok(Value::Int(i64::MIN))
        );
        assert!(parse(Kind::Int { bits: 64 }, "9223372036854775808").is_err());
    }

    #[test]
    fn test_uint_range_and_sign() {
        assert_eq!(parse(Kind::Uint { bits: 8 }, "255"), Ok(Value::Uint(255)));
        assert!(parse(Kind::Uint { bits: 8 }, "256").is_err());
        assert!(parse(Kind::Uint { bits: 8 }, "-1").is_err());
        assert!(parse(Kind::Uint { bits: 8 }, "+1").is_err());
        assert_eq!(
            parse(Kind::Uint { bits: 64 }, "18446744073709551615"),
            Ok(Value::Uint(u64::MAX))
        );
        assert!(parse(Kind::Uint { bits: 64 }, "18446744073709551616").is_err());
    }

    #[test]
    fn test_float_by_bits() {
        assert_eq!(
            parse(Kind::Float { bits: 32 }, "3.32"),
            Ok(Value::Float(f64::from(3.32f32)))
        );
        assert_eq!(
            parse(Kind::Float { bits: 64 }, "1.5e3"),
            Ok(Value::Float(1500.0))
        );
        assert!(parse(Kind::Float { bits: 32 }, "1e39").is_err());
        assert!(parse(Kind::Float { bits: 64 }, "1e39").is_ok());
        assert_eq!(
            parse(Kind::Float { bits: 64 }, "-Inf"),
            Ok(Value::Float(f64::NEG_INFINITY))
        );
        assert!(parse(Kind::Float { bits: 64 }, "abc").is_err());
    }

    #[test]
    fn test_hex_float_literals() {
        assert_eq!(
            parse(Kind::Float { bits: 64 }, "0x1p-2"),
            Ok(Value::Float(0.25))
        );
        assert_eq!(
            parse(Kind::Float { bits: 64 }, "-0x1.8P+3"),
            Ok(Value::Float(-12.0))
        );
        assert_eq!(
            parse(Kind::Float { bits: 64 }, "0xA_0p0"),
            Ok(Value::Float(160.0))
        );
        assert_eq!(
            parse(Kind::Float { bits: 32 }, "0x1.fffffep+127"),
            Ok(Value::Float(f64::from(f32::MAX)))
        );
        assert_eq!(parse(Kind::Float { bits: 64 }, "0x0p9999"), Ok(Value::Float(0.0)));

        // Exponent is mandatory
        assert!(parse(Kind::Float { bits: 64 }, "0x1.8").is_err());
        assert!(parse(Kind::Float { bits: 64 }, "0xp1").is_err());
        assert!(parse(Kind::Float { bits: 64 }, "0x1g p1").is_err());
        assert!(parse(Kind::Float { bits: 64 }, "0x1__0p0").is_err());

        // Out of range for the field width
        assert!(parse(Kind::Float { bits: 32 }, "0x1p128").is_err());
        assert!(parse(Kind::Float { bits: 64 }, "0x1p1024").is_err());
    }

    #[test]
    fn test_duration() {
        assert_eq!(
            parse(Kind::Duration, "1h30m"),
            Ok(Value::Duration(Duration::from_secs(5400)))
        );
        assert!(matches!(
            parse(Kind::Duration, "-5s"),
            Err(ConvertError::Parse { ref message, .. }) if message.contains("negative")
        ));
        assert!(parse(Kind::Duration, "5 parsecs").is_err());
    }

    #[test]
    fn test_sequence_in_order() {
        let kind = Kind::Seq(Box::new(Kind::Uint { bits: 8 }));
        assert_eq!(
            parse(kind.clone(), "1;2;3;4;5"),
            Ok(Value::Seq((1..=5).map(Value::Uint).collect()))
        );
        assert_eq!(parse(kind.clone(), ""), Ok(Value::Seq(Vec::new())));
        assert!(parse(kind, "1;x;3").is_err());
    }

    #[test]
    fn test_map_entries() {
        let kind = Kind::Map(Box::new(Kind::Str), Box::new(Kind::Int { bits: 64 }));
        assert_eq!(
            parse(kind.clone(), "second:2;third:3;first:1"),
            Ok(Value::Map(vec![
                (Value::Str("second".into()), Value::Int(2)),
                (Value::Str("third".into()), Value::Int(3)),
                (Value::Str("first".into()), Value::Int(1)),
            ]))
        );
        assert_eq!(parse(kind.clone(), "  "), Ok(Value::Map(Vec::new())));
        assert_eq!(
            parse(kind.clone(), "a-1;b-2"),
            Err(ConvertError::MapFormat {
                entry: "a-1".to_string()
            })
        );
        assert_eq!(
            parse(kind.clone(), "a:1:2"),
            Err(ConvertError::MapFormat {
                entry: "a:1:2".to_string()
            })
        );
        assert!(matches!(
            parse(kind, "a:x"),
            Err(ConvertError::Parse { .. })
        ));
    }

    #[test]
    fn test_nested_composites_unsupported() {
        let nested = Kind::Seq(Box::new(Kind::Seq(Box::new(Kind::Str))));
        assert_eq!(
            setter_for(&nested),
            Err(ConvertError::Unsupported {
                kind: "sequence of sequence of string".to_string()
            })
        );

        let map_of_seq = Kind::Map(
            Box::new(Kind::Str),
            Box::new(Kind::Seq(Box::new(Kind::Str))),
        );
        assert!(setter_for(&map_of_seq).is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(Kind::Int { bits: 16 }.to_string(), "i16");
        assert_eq!(
            Kind::Map(Box::new(Kind::Str), Box::new(Kind::Duration)).to_string(),
            "map of string to duration"
        );
    }
}
