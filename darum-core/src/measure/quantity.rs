//! Resource counts are large; they are read and shown with SI magnitudes
//! (`10M`, `1.5k`).

use std::borrow::Borrow;
use thiserror::Error;

const MAGNITUDES: &[(char, f64)] = &[('T', 1e12), ('G', 1e9), ('M', 1e6), ('k', 1e3)];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid quantity '{0}': expected a number with an optional k/M/G/T suffix")]
pub struct ParseQuantityError(pub String);

pub fn parse_quantity(input: &str) -> Result<u64, ParseQuantityError> {
    let trimmed = input.trim();
    let err = || ParseQuantityError(input.to_string());

    let (number, factor) = match trimmed.chars().last() {
        Some('K') => (&trimmed[..trimmed.len() - 1], 1e3),
        Some(c) if c.is_ascii_alphabetic() => {
            let (_, factor) = MAGNITUDES.iter().find(|(m, _)| *m == c).ok_or_else(err)?;
            (&trimmed[..trimmed.len() - c.len_utf8()], *factor)
        }
        Some(_) => (trimmed, 1.0),
        None => return Err(err()),
    };

    let value: f64 = number.trim().parse().map_err(|_| err())?;
    let scaled = value * factor;
    if !scaled.is_finite() || scaled < 0.0 || scaled > u64::MAX as f64 {
        return Err(err());
    }

    Ok(scaled.round() as u64)
}

/// Short magnitude form of a count, e.g. `1234567` → `1.235M`.
pub fn smag(value: impl Borrow<u64>) -> String {
    smag_f64(*value.borrow() as f64)
}

pub fn smag_f64(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    for (suffix, factor) in MAGNITUDES {
        if value.abs() >= *factor {
            return format!("{}{suffix}", trim_decimals(value / factor));
        }
    }
    trim_decimals(value)
}

fn trim_decimals(value: f64) -> String {
    let s = format!("{value:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_plain_and_suffixed_quantities() {
        assert_eq!(parse_quantity("1200"), Ok(1200));
        assert_eq!(parse_quantity("10M"), Ok(10_000_000));
        assert_eq!(parse_quantity("1.5k"), Ok(1500));
        assert_eq!(parse_quantity("2K"), Ok(2000));
        assert_eq!(parse_quantity(" 3G "), Ok(3_000_000_000));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_quantity("").is_err());
        assert!(parse_quantity("ten").is_err());
        assert!(parse_quantity("10X").is_err());
        assert!(parse_quantity("-5").is_err());
    }

    #[test]
    fn formats_with_magnitudes() {
        assert_eq!(smag(950u64), "950");
        assert_eq!(smag(1200u64), "1.2k");
        assert_eq!(smag(1_234_567u64), "1.235M");
        assert_eq!(smag(&10_000_000u64), "10M");
        assert_eq!(smag(0u64), "0");
    }
}
