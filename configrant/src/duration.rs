//! Duration literals such as `300ms`, `-1.5h` or `1h30m`
//!
//! A literal is an optional sign followed by one or more `<number><unit>`
//! pairs. Numbers may carry a decimal fraction. Units are `ns`, `us` (or `µs`,
//! `μs`), `ms`, `s`, `m` and `h`. A bare `0` is accepted without a unit.

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

/// Largest magnitude representable by a signed 64-bit nanosecond count.
const LIMIT: u64 = 1 << 63;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("invalid duration")]
    Invalid,
    #[error("missing unit")]
    MissingUnit,
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),
    #[error("duration out of range")]
    Overflow,
}

fn unit_nanos(unit: &str) -> Option<u64> {
    Some(match unit {
        "ns" => NANOSECOND,
        "us" | "\u{00b5}s" | "\u{03bc}s" => MICROSECOND,
        "ms" => MILLISECOND,
        "s" => SECOND,
        "m" => MINUTE,
        "h" => HOUR,
        _ => return None,
    })
}

/// Parse a duration literal into a signed count of nanoseconds.
///
/// ```rust
/// use configrant::parse_duration;
///
/// assert_eq!(parse_duration("1h30m").unwrap(), 5_400_000_000_000);
/// assert_eq!(parse_duration("-250ms").unwrap(), -250_000_000);
/// assert_eq!(parse_duration("1.5s").unwrap(), 1_500_000_000);
/// assert!(parse_duration("5 s").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<i64, DurationError> {
    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err(DurationError::Invalid);
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        let first = rest.as_bytes()[0];
        if first != b'.' && !first.is_ascii_digit() {
            return Err(DurationError::Invalid);
        }

        let (whole, after_whole) = leading_int(rest)?;
        let has_whole = after_whole.len() != rest.len();
        rest = after_whole;

        let mut fraction = 0;
        let mut scale = 1.0;
        let mut has_fraction = false;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (digits, digits_scale, after_fraction) = leading_fraction(after_dot);
            has_fraction = after_fraction.len() != after_dot.len();
            fraction = digits;
            scale = digits_scale;
            rest = after_fraction;
        }
        if !has_whole && !has_fraction {
            return Err(DurationError::Invalid);
        }

        let unit_len = rest
            .bytes()
            .position(|b| b == b'.' || b.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(DurationError::MissingUnit);
        }
        let (unit, after_unit) = rest.split_at(unit_len);
        rest = after_unit;
        let unit = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit(unit.to_string()))?;

        if whole > LIMIT / unit {
            return Err(DurationError::Overflow);
        }
        let mut value = whole * unit;
        if fraction > 0 {
            value += (fraction as f64 * (unit as f64 / scale)) as u64;
            if value > LIMIT {
                return Err(DurationError::Overflow);
            }
        }

        total = total.checked_add(value).ok_or(DurationError::Overflow)?;
        if total > LIMIT {
            return Err(DurationError::Overflow);
        }
    }

    if negative {
        // `total` may be exactly 2^63, which only fits once negated
        return Ok(0i64.wrapping_sub(total as i64));
    }
    i64::try_from(total).map_err(|_| DurationError::Overflow)
}

/// Consume leading decimal digits.
fn leading_int(input: &str) -> Result<(u64, &str), DurationError> {
    let end = input
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(input.len());
    let mut value: u64 = 0;
    for digit in input[..end].bytes() {
        if value > LIMIT / 10 {
            return Err(DurationError::Overflow);
        }
        value = value * 10 + u64::from(digit - b'0');
        if value > LIMIT {
            return Err(DurationError::Overflow);
        }
    }
    Ok((value, &input[end..]))
}

/// Consume leading fraction digits, dropping precision that would overflow.
fn leading_fraction(input: &str) -> (u64, f64, &str) {
    let end = input
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(input.len());
    let mut value: u64 = 0;
    let mut scale = 1.0;
    let mut overflow = false;
    for digit in input[..end].bytes() {
        if overflow {
            continue;
        }
        if value > (LIMIT - 1) / 10 {
            overflow = true;
            continue;
        }
        let next = value * 10 + u64::from(digit - b'0');
        if next > LIMIT {
            overflow = true;
            continue;
        }
        value = next;
        scale *= 10.0;
    }
    (value, scale, &input[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_units() {
        assert_eq!(parse_duration("5s").unwrap(), 5 * SECOND as i64);
        assert_eq!(parse_duration("250ms").unwrap(), 250 * MILLISECOND as i64);
        assert_eq!(parse_duration("7ns").unwrap(), 7);
        assert_eq!(parse_duration("3us").unwrap(), 3_000);
        assert_eq!(parse_duration("3µs").unwrap(), 3_000);
        assert_eq!(parse_duration("3μs").unwrap(), 3_000);
        assert_eq!(parse_duration("2m").unwrap(), 2 * MINUTE as i64);
        assert_eq!(parse_duration("2h").unwrap(), 2 * HOUR as i64);
    }

    #[test]
    fn test_compound_literal() {
        assert_eq!(
            parse_duration("1h30m").unwrap(),
            (HOUR + 30 * MINUTE) as i64
        );
        assert_eq!(
            parse_duration("1h2m3s4ms").unwrap(),
            (HOUR + 2 * MINUTE + 3 * SECOND + 4 * MILLISECOND) as i64
        );
    }

    #[test]
    fn test_fractions() {
        assert_eq!(parse_duration("1.5h").unwrap(), (90 * MINUTE) as i64);
        assert_eq!(parse_duration(".5s").unwrap(), 500_000_000);
        assert_eq!(parse_duration("1.s").unwrap(), SECOND as i64);
    }

    #[test]
    fn test_sign() {
        assert_eq!(parse_duration("-5s").unwrap(), -5 * SECOND as i64);
        assert_eq!(parse_duration("+5s").unwrap(), 5 * SECOND as i64);
        assert_eq!(parse_duration("-0").unwrap(), 0);
    }

    #[test]
    fn test_bare_zero() {
        assert_eq!(parse_duration("0").unwrap(), 0);
    }

    #[test]
    fn test_invalid_literals() {
        assert_eq!(parse_duration(""), Err(DurationError::Invalid));
        assert_eq!(parse_duration("-"), Err(DurationError::Invalid));
        assert_eq!(parse_duration("s"), Err(DurationError::Invalid));
        assert_eq!(parse_duration(".s"), Err(DurationError::Invalid));
        assert_eq!(parse_duration("5"), Err(DurationError::MissingUnit));
        assert_eq!(parse_duration("1h5"), Err(DurationError::MissingUnit));
        assert_eq!(
            parse_duration("5d"),
            Err(DurationError::UnknownUnit("d".to_string()))
        );
        assert_eq!(
            parse_duration("5 s"),
            Err(DurationError::UnknownUnit(" s".to_string()))
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(parse_duration("9223372036854775807ns").unwrap(), i64::MAX);
        assert_eq!(parse_duration("-9223372036854775808ns").unwrap(), i64::MIN);
        assert_eq!(
            parse_duration("9223372036854775808ns"),
            Err(DurationError::Overflow)
        );
        assert_eq!(parse_duration("3000000h"), Err(DurationError::Overflow));
    }
}
