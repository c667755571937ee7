//! Payment amount as bound from a request parameter.
//!
//! Parsing accepts the floating-point literal forms clients of the legacy
//! endpoint already send (`100`, `100.0`, `.5`, `1e3`, `2.5d`, `0x1.8p1`,
//! `NaN`, `-Infinity`). Display renders the value the way it has always appeared in
//! confirmation messages: shortest round-trip digits, always with a fractional
//! part, switching to `E` notation outside `[1e-3, 1e7)`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A numeric payment amount. No sign or range constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount(f64);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a number")]
pub struct AmountParseError(pub String);

impl Amount {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || AmountParseError(raw.to_string());

        let (negative, body) = match raw.as_bytes().first() {
            Some(b'+') => (false, &raw[1..]),
            Some(b'-') => (true, &raw[1..]),
            _ => (false, raw),
        };
        let signed = |v: f64| if negative { -v } else { v };

        match body {
            "NaN" => return Ok(Self(f64::NAN)),
            "Infinity" => return Ok(Self(signed(f64::INFINITY))),
            _ => {}
        }

        let literal = body.strip_suffix(['d', 'D', 'f', 'F']).unwrap_or(body);
        if let Some(hex) = literal
            .strip_prefix("0x")
            .or_else(|| literal.strip_prefix("0X"))
        {
            return parse_hex_literal(hex)
                .map(|v| Self(signed(v)))
                .ok_or_else(invalid);
        }

        if !is_decimal_literal(literal) {
            return Err(invalid());
        }

        literal
            .parse::<f64>()
            .map(|v| Self(signed(v)))
            .map_err(|_| invalid())
    }
}

/// `digits [ '.' digits ] [ ('e'|'E') [sign] digits ]`, with at least one
/// mantissa digit on either side of the point.
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }

    if mantissa_digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// Hexadecimal float after the `0x` prefix:
/// `hexdigits [ '.' hexdigits ] ('p'|'P') [sign] digits`, value `mantissa * 2^exp`.
fn parse_hex_literal(s: &str) -> Option<f64> {
    let (mantissa_part, exponent_part) = s.split_once(['p', 'P'])?;
    let (int_digits, frac_digits) = mantissa_part
        .split_once('.')
        .unwrap_or((mantissa_part, ""));
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    // Keep at most 60 significant bits; dropped non-zero digits set a sticky
    // low bit so the final conversion still rounds correctly.
    let mut mantissa: u64 = 0;
    let mut scale: i64 = 0;
    let mut sticky = false;
    for (digit, fractional) in int_digits
        .chars()
        .map(|c| (c, false))
        .chain(frac_digits.chars().map(|c| (c, true)))
    {
        let value = digit.to_digit(16)?;
        if mantissa < 1 << 56 {
            mantissa = mantissa * 16 + u64::from(value);
            if fractional {
                scale -= 4;
            }
        } else {
            if !fractional {
                scale += 4;
            }
            sticky |= value != 0;
        }
    }
    if sticky {
        mantissa |= 1;
    }

    let (exp_negative, exp_digits) = match exponent_part.as_bytes().first() {
        Some(b'+') => (false, &exponent_part[1..]),
        Some(b'-') => (true, &exponent_part[1..]),
        _ => (false, exponent_part),
    };
    if exp_digits.is_empty() || !exp_digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let exponent = exp_digits.bytes().fold(0i64, |acc, b| {
        (acc * 10 + i64::from(b - b'0')).min(100_000)
    });
    let exponent = if exp_negative { -exponent } else { exponent };

    Some(scale_by_power_of_two(mantissa as f64, exponent + scale))
}

fn scale_by_power_of_two(mut value: f64, mut exponent: i64) -> f64 {
    const STEP: i64 = 1000;
    while exponent > STEP && value.is_finite() && value != 0.0 {
        value *= 2f64.powi(STEP as i32);
        exponent -= STEP;
    }
    while exponent < -STEP && value != 0.0 {
        value *= 2f64.powi(-STEP as i32);
        exponent += STEP;
    }
    value * 2f64.powi(exponent as i32)
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;

        if value.is_nan() {
            return f.write_str("NaN");
        }
        if value.is_infinite() {
            return f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" });
        }

        let magnitude = value.abs();
        if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
            let plain = value.to_string();
            if plain.contains('.') {
                f.write_str(&plain)
            } else {
                write!(f, "{plain}.0")
            }
        } else {
            let scientific = format!("{value:e}");
            let (mantissa, exponent) = scientific
                .split_once('e')
                .unwrap_or((scientific.as_str(), "0"));
            if mantissa.contains('.') {
                write!(f, "{mantissa}E{exponent}")
            } else {
                write!(f, "{mantissa}.0E{exponent}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Amount {
        raw.parse().unwrap()
    }

    #[test]
    fn parses_plain_and_fractional_literals() {
        assert_eq!(parse("100").value(), 100.0);
        assert_eq!(parse("100.0").value(), 100.0);
        assert_eq!(parse("12.75").value(), 12.75);
        assert_eq!(parse(".5").value(), 0.5);
        assert_eq!(parse("5.").value(), 5.0);
        assert_eq!(parse("+3").value(), 3.0);
        assert_eq!(parse("-42.5").value(), -42.5);
    }

    #[test]
    fn parses_exponents_and_type_suffixes() {
        assert_eq!(parse("1e3").value(), 1000.0);
        assert_eq!(parse("2.5E-2").value(), 0.025);
        assert_eq!(parse("1E+2").value(), 100.0);
        assert_eq!(parse("7d").value(), 7.0);
        assert_eq!(parse("7.5F").value(), 7.5);
    }

    #[test]
    fn parses_hexadecimal_literals() {
        assert_eq!(parse("0x1p4").value(), 16.0);
        assert_eq!(parse("0x1.8p1").value(), 3.0);
        assert_eq!(parse("0X10P0d").value(), 16.0);
        assert_eq!(parse("0xAp0").value(), 10.0);
        assert_eq!(parse("0x.8p1").value(), 1.0);
        assert_eq!(parse("0x1.p3").value(), 8.0);
        assert_eq!(parse("-0x1p-2").value(), -0.25);
        assert_eq!(parse("+0x1P+10f").value(), 1024.0);
        assert_eq!(parse("0x1.fffffffffffffp1023").value(), f64::MAX);
        assert_eq!(parse("0x1p-1074").value(), 5e-324);
        assert_eq!(parse("0x1p2000").value(), f64::INFINITY);
        assert_eq!(parse("0x1p4").to_string(), "16.0");
    }

    #[test]
    fn rejects_malformed_hexadecimal_literals() {
        for raw in ["0x1", "0xp1", "0x.p1", "0x1p", "0x1.8", "0xgp1", "0x1p1.5", "0x1p+", "0x"] {
            assert_eq!(
                raw.parse::<Amount>(),
                Err(AmountParseError(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn parses_non_finite_keywords() {
        assert!(parse("NaN").value().is_nan());
        assert_eq!(parse("Infinity").value(), f64::INFINITY);
        assert_eq!(parse("-Infinity").value(), f64::NEG_INFINITY);
    }

    #[test]
    fn rejects_non_numeric_input() {
        for raw in [
            "", "abc", "1,5", "1e", "e5", ".", "-", "1.2.3", "inf", "nan", "infinity", "10$",
            "d", "1dd",
        ] {
            assert_eq!(
                raw.parse::<Amount>(),
                Err(AmountParseError(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn displays_whole_numbers_with_fraction_digit() {
        assert_eq!(Amount::new(100.0).to_string(), "100.0");
        assert_eq!(Amount::new(0.0).to_string(), "0.0");
        assert_eq!(Amount::new(-0.0).to_string(), "-0.0");
        assert_eq!(Amount::new(-250.0).to_string(), "-250.0");
        assert_eq!(Amount::new(9_999_999.0).to_string(), "9999999.0");
    }

    #[test]
    fn displays_fractions_unrounded() {
        assert_eq!(Amount::new(12.5).to_string(), "12.5");
        assert_eq!(Amount::new(0.1 + 0.2).to_string(), "0.30000000000000004");
        assert_eq!(Amount::new(0.001).to_string(), "0.001");
        assert_eq!(Amount::new(1234567.5).to_string(), "1234567.5");
    }

    #[test]
    fn displays_large_and_small_magnitudes_in_e_notation() {
        assert_eq!(Amount::new(1e7).to_string(), "1.0E7");
        assert_eq!(Amount::new(12_345_678.0).to_string(), "1.2345678E7");
        assert_eq!(Amount::new(-2.5e10).to_string(), "-2.5E10");
        assert_eq!(Amount::new(0.0001).to_string(), "1.0E-4");
        assert_eq!(Amount::new(1.5e-4).to_string(), "1.5E-4");
    }

    #[test]
    fn displays_non_finite_values() {
        assert_eq!(Amount::new(f64::NAN).to_string(), "NaN");
        assert_eq!(Amount::new(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Amount::new(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn parsed_value_displays_normalised() {
        assert_eq!(parse("100").to_string(), "100.0");
        assert_eq!(parse("0").to_string(), "0.0");
        assert_eq!(parse("00012.50").to_string(), "12.5");
        assert_eq!(parse("-0").to_string(), "-0.0");
        assert_eq!(parse("1e7").to_string(), "1.0E7");
    }
}
