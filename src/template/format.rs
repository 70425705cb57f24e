//! Format specifiers (`{0:F2}`)
//!
//! Only numbers honour a specifier; every other value prints its default
//! text. Numbers follow the invariant-culture standard numeric formats:
//!
//! | Spec | Meaning | `1234.5` |
//! |------|---------|----------|
//! | `F2` | fixed point | `1234.50` |
//! | `N1` | fixed point with grouping | `1,234.5` |
//! | `D6` | zero-padded integer (integral only) | - |
//! | `P0` | percent | `123,450 %` |
//! | `E2` | scientific | `1.23E+003` |
//! | `X`  | hexadecimal (non-negative integral only) | - |
//! | `G3` | general, significant digits | `1.23E+03` |

use crate::value::{self, Value};

const MAX_PRECISION: usize = 99;

/// Render `value` with `spec`. The error is a human-readable reason.
pub(crate) fn format_value(value: &Value<'_>, spec: &str, is_source: bool) -> Result<String, String> {
    match value {
        Value::Number(n) => format_number(*n, spec),
        other => Ok(other.to_text(is_source)),
    }
}

pub(crate) fn format_number(n: f64, spec: &str) -> Result<String, String> {
    let mut chars = spec.chars();
    let Some(letter) = chars.next() else {
        return Ok(value::format_number(n));
    };

    let digits = chars.as_str();
    let precision = if digits.is_empty() {
        None
    } else {
        let p: usize = digits
            .parse()
            .map_err(|_| format!("precision '{}' is not a number", digits))?;
        if p > MAX_PRECISION {
            return Err(format!("precision {} exceeds {}", p, MAX_PRECISION));
        }
        Some(p)
    };

    if !n.is_finite() {
        return Ok(value::format_number(n));
    }

    match letter {
        'F' | 'f' => Ok(fixed(n, precision.unwrap_or(2))),
        'N' | 'n' => Ok(group_thousands(&fixed(n, precision.unwrap_or(2)))),
        'P' | 'p' => Ok(format!(
            "{} %",
            group_thousands(&fixed(n * 100.0, precision.unwrap_or(2)))
        )),
        'D' | 'd' => {
            let int = integral(n, letter)?;
            let width = precision.unwrap_or(0);
            let sign = if int < 0 { "-" } else { "" };
            Ok(format!("{}{:0width$}", sign, int.unsigned_abs(), width = width))
        }
        'X' | 'x' => {
            let int = integral(n, letter)?;
            if int < 0 {
                return Err("hexadecimal format needs a non-negative value".to_string());
            }
            let width = precision.unwrap_or(0);
            if letter == 'X' {
                Ok(format!("{:0width$X}", int, width = width))
            } else {
                Ok(format!("{:0width$x}", int, width = width))
            }
        }
        'E' | 'e' => Ok(scientific(n, precision.unwrap_or(6), letter, 3)),
        'G' | 'g' => Ok(general(n, precision.unwrap_or(0), letter)),
        other => Err(format!("unsupported format specifier '{}'", other)),
    }
}

fn fixed(n: f64, precision: usize) -> String {
    let mut digits = Digits::new(n);
    digits.round_at(digits.point + precision as i32);
    let text = digits.fixed(precision);
    digits.signed(n, text)
}

fn integral(n: f64, letter: char) -> Result<i64, String> {
    if n.fract() != 0.0 || n >= i64::MAX as f64 || n < i64::MIN as f64 {
        return Err(format!("'{}' format needs an integral value, got {}", letter, n));
    }
    Ok(n as i64)
}

/// Insert `,` between groups of three integer digits
fn group_thousands(fixed: &str) -> String {
    let (sign, rest) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (int, frac) = match rest.find('.') {
        Some(dot) => rest.split_at(dot),
        None => (rest, ""),
    };

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}{}", sign, grouped, frac)
}

/// Significant digits taken from a double before any rounding to the
/// requested precision
const SIGNIFICANT_DIGITS: usize = 15;

/// Decimal digits of `|n|` and the position of the decimal point.
///
/// Rounding happens on the digit string with ties going away from zero, so
/// `2.5` at `F0` is `3` and `0.125` at `F2` is `0.13`.
struct Digits {
    digits: Vec<u8>,
    /// Number of digits before the point; zero or negative below `0.1`
    point: i32,
}

impl Digits {
    fn new(n: f64) -> Self {
        let formatted = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, n.abs());
        let (mantissa, exp) = formatted
            .split_once('e')
            .unwrap_or((formatted.as_str(), "0"));
        let digits = mantissa
            .bytes()
            .filter(u8::is_ascii_digit)
            .map(|b| b - b'0')
            .collect();
        let exp: i32 = exp.parse().unwrap_or(0);
        Self {
            digits,
            point: exp + 1,
        }
    }

    /// Keep the first `keep` digits, rounding half away from zero
    fn round_at(&mut self, keep: i32) {
        if keep < 0 {
            self.digits.iter_mut().for_each(|d| *d = 0);
            return;
        }
        let keep = keep as usize;
        let Some(&next) = self.digits.get(keep) else {
            return;
        };
        self.digits.truncate(keep);
        if next < 5 {
            return;
        }
        for d in self.digits.iter_mut().rev() {
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                return;
            }
        }
        // Carry out of the leading digit: 9.99 -> 10.0
        self.digits.insert(0, 1);
        self.point += 1;
    }

    fn digit(&self, index: i32) -> char {
        let d = usize::try_from(index)
            .ok()
            .and_then(|i| self.digits.get(i).copied())
            .unwrap_or(0);
        char::from(b'0' + d)
    }

    fn is_zero(&self) -> bool {
        self.digits.iter().all(|&d| d == 0)
    }

    /// Exponent of the leading digit in scientific form
    fn exponent(&self) -> i32 {
        if self.is_zero() {
            0
        } else {
            self.point - 1
        }
    }

    fn fixed(&self, precision: usize) -> String {
        let mut out = String::new();
        if self.point <= 0 || self.is_zero() {
            out.push('0');
        } else {
            out.extend((0..self.point).map(|i| self.digit(i)));
        }
        if precision > 0 {
            out.push('.');
            out.extend((0..precision as i32).map(|i| self.digit(self.point + i)));
        }
        out
    }

    /// `d.ddd` with `precision` fractional digits
    fn mantissa(&self, precision: usize) -> String {
        let mut out = String::new();
        out.push(self.digit(0));
        if precision > 0 {
            out.push('.');
            out.extend((1..=precision as i32).map(|i| self.digit(i)));
        }
        out
    }

    /// Prefix `-` for negative input, unless everything rounded away
    fn signed(&self, n: f64, text: String) -> String {
        if n < 0.0 && !self.is_zero() {
            format!("-{}", text)
        } else {
            text
        }
    }
}

fn scientific(n: f64, precision: usize, letter: char, min_exp_digits: usize) -> String {
    let mut digits = Digits::new(n);
    digits.round_at(precision as i32 + 1);
    let mantissa = digits.signed(n, digits.mantissa(precision));
    exponent_form(&mantissa, digits.exponent(), letter, min_exp_digits)
}

fn exponent_form(mantissa: &str, exp: i32, letter: char, min_exp_digits: usize) -> String {
    let e = if letter.is_ascii_uppercase() { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!(
        "{}{}{}{:0width$}",
        mantissa,
        e,
        sign,
        exp.unsigned_abs(),
        width = min_exp_digits
    )
}

fn general(n: f64, precision: usize, letter: char) -> String {
    if precision == 0 {
        return value::format_number(n);
    }
    let mut digits = Digits::new(n);
    digits.round_at(precision as i32);
    let exp = digits.exponent();
    if exp < -5 || exp >= precision as i32 {
        let mantissa = digits.mantissa(precision - 1);
        let mantissa = digits.signed(n, trim_fraction(&mantissa).to_string());
        return exponent_form(&mantissa, exp, letter, 2);
    }
    let decimals = (precision as i32 - 1 - exp).max(0) as usize;
    let text = digits.fixed(decimals);
    digits.signed(n, trim_fraction(&text).to_string())
}

/// Drop trailing fractional zeros and a dangling point
fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_spec_is_default_text() {
        assert_eq!(format_number(3.0, "").unwrap(), "3");
    }

    #[test]
    fn test_fixed() {
        assert_eq!(format_number(3.0, "F2").unwrap(), "3.00");
        assert_eq!(format_number(2.345, "f1").unwrap(), "2.3");
        assert_eq!(format_number(7.0, "F").unwrap(), "7.00");
        assert_eq!(format_number(7.6, "F0").unwrap(), "8");
    }

    #[test]
    fn test_midpoints_round_away_from_zero() {
        assert_eq!(format_number(2.5, "F0").unwrap(), "3");
        assert_eq!(format_number(0.5, "F0").unwrap(), "1");
        assert_eq!(format_number(-2.5, "F0").unwrap(), "-3");
        assert_eq!(format_number(0.125, "F2").unwrap(), "0.13");
        assert_eq!(format_number(1234.5, "N0").unwrap(), "1,235");
        assert_eq!(format_number(0.005, "F2").unwrap(), "0.01");
        assert_eq!(format_number(9.995, "F2").unwrap(), "10.00");
        assert_eq!(format_number(0.125, "P1").unwrap(), "12.5 %");
        assert_eq!(format_number(2.5, "E0").unwrap(), "3E+000");
    }

    #[test]
    fn test_small_values_round_to_zero() {
        assert_eq!(format_number(0.0004, "F2").unwrap(), "0.00");
        assert_eq!(format_number(-0.0004, "F2").unwrap(), "0.00");
        assert_eq!(format_number(0.0, "E1").unwrap(), "0.0E+000");
    }

    #[test]
    fn test_large_fixed() {
        assert_eq!(format_number(1e20, "F1").unwrap(), "100000000000000000000.0");
    }

    #[test]
    fn test_grouped() {
        assert_eq!(format_number(1234567.891, "N2").unwrap(), "1,234,567.89");
        assert_eq!(format_number(-1234.0, "N0").unwrap(), "-1,234");
        assert_eq!(format_number(999.0, "N0").unwrap(), "999");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_number(0.256, "P1").unwrap(), "25.6 %");
        assert_eq!(format_number(12.0, "P0").unwrap(), "1,200 %");
    }

    #[test]
    fn test_decimal_padding() {
        assert_eq!(format_number(42.0, "D4").unwrap(), "0042");
        assert_eq!(format_number(-42.0, "D4").unwrap(), "-0042");
        assert_eq!(format_number(42.0, "D").unwrap(), "42");
        assert!(format_number(4.5, "D").is_err());
    }

    #[test]
    fn test_decimal_bounds() {
        assert!(format_number(9223372036854775808.0, "D").is_err());
        assert_eq!(
            format_number(-9223372036854775808.0, "D").unwrap(),
            "-9223372036854775808"
        );
        assert!(format_number(9223372036854775808.0, "X").is_err());
    }

    #[test]
    fn test_hex() {
        assert_eq!(format_number(255.0, "X").unwrap(), "FF");
        assert_eq!(format_number(255.0, "x4").unwrap(), "00ff");
        assert!(format_number(-1.0, "X").is_err());
    }

    #[test]
    fn test_scientific() {
        assert_eq!(format_number(1234.5, "E2").unwrap(), "1.23E+003");
        assert_eq!(format_number(0.00012, "e1").unwrap(), "1.2e-004");
        assert_eq!(format_number(1.0, "E").unwrap(), "1.000000E+000");
    }

    #[test]
    fn test_general() {
        assert_eq!(format_number(1234.5, "G").unwrap(), "1234.5");
        assert_eq!(format_number(1234.5, "G3").unwrap(), "1.23E+03");
        assert_eq!(format_number(3.14159, "G3").unwrap(), "3.14");
        assert_eq!(format_number(2.5, "G5").unwrap(), "2.5");
        assert_eq!(format_number(0.0000012, "g2").unwrap(), "1.2e-06");
    }

    #[test]
    fn test_unsupported_spec() {
        let err = format_number(1.0, "Q").unwrap_err();
        assert!(err.contains("unsupported"));
        assert!(format_number(1.0, "Fx").is_err());
    }

    #[test]
    fn test_non_numbers_ignore_spec() {
        assert_eq!(
            format_value(&Value::Text("abc".into()), "F2", false).unwrap(),
            "abc"
        );
        assert_eq!(format_value(&Value::Bool(true), "F2", false).unwrap(), "true");
    }
}
