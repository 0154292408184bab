//! printf-style formatting of a single floating point value.
//!
//! Supports the subset of the usual `%[index$][flags][width][.precision]conversion`
//! grammar that makes sense for one `f32` argument: `f`, `e`, `E`, `s`, `S`,
//! plus the `%%` and `%n` escapes.

use thiserror::Error;

/// Format used when no pattern (or an empty one) is supplied.
pub const DEFAULT_FORMAT: &str = "%1$.0f";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("format specifier starting at byte {0} is incomplete")]
    Incomplete(usize),
    #[error("unknown conversion '{conversion}' at byte {offset}")]
    UnknownConversion { conversion: char, offset: usize },
    #[error("format references argument {0} but only one value is supplied")]
    MissingArgument(usize),
    #[error("flag '{flag}' is not valid for conversion '{conversion}'")]
    IllegalFlag { flag: char, conversion: char },
}

#[derive(Debug, Default, Clone, Copy)]
struct Flags {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    group: bool,
}

#[derive(Debug, Clone, Copy)]
struct Specifier {
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

/// Formats `value` according to `pattern`.
pub fn format_value(pattern: &str, value: f32) -> Result<String, FormatError> {
    let chars: Vec<(usize, char)> = pattern.char_indices().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        i += 1;
        if c != '%' {
            out.push(c);
            continue;
        }

        let Some(&(_, next)) = chars.get(i) else {
            return Err(FormatError::Incomplete(offset));
        };
        match next {
            '%' => {
                out.push('%');
                i += 1;
                continue;
            }
            'n' => {
                out.push('\n');
                i += 1;
                continue;
            }
            _ => {}
        }

        let (spec, consumed) = parse_specifier(&chars[i..], offset)?;
        i += consumed;
        out.push_str(&render(spec, value)?);
    }

    Ok(out)
}

fn parse_specifier(chars: &[(usize, char)], offset: usize) -> Result<(Specifier, usize), FormatError> {
    let mut i = 0;

    // An argument index is a digit run terminated by '$'.
    let digits = read_digits(chars, i);
    if digits.1 > 0 && matches!(chars.get(i + digits.1), Some((_, '$'))) {
        let index = digits.0.unwrap_or(0);
        if index != 1 {
            return Err(FormatError::MissingArgument(index));
        }
        i += digits.1 + 1;
    }

    let mut flags = Flags::default();
    while let Some(&(_, c)) = chars.get(i) {
        match c {
            '-' => flags.left = true,
            '+' => flags.plus = true,
            ' ' => flags.space = true,
            '0' => flags.zero = true,
            ',' => flags.group = true,
            _ => break,
        }
        i += 1;
    }

    let (width, used) = read_digits(chars, i);
    i += used;

    let mut precision = None;
    if matches!(chars.get(i), Some((_, '.'))) {
        let (p, used) = read_digits(chars, i + 1);
        if used == 0 {
            return Err(FormatError::Incomplete(offset));
        }
        precision = p;
        i += used + 1;
    }

    let Some(&(conv_offset, conversion)) = chars.get(i) else {
        return Err(FormatError::Incomplete(offset));
    };
    if !matches!(conversion, 'f' | 'e' | 'E' | 's' | 'S') {
        return Err(FormatError::UnknownConversion {
            conversion,
            offset: conv_offset,
        });
    }

    Ok((
        Specifier {
            flags,
            width,
            precision,
            conversion,
        },
        i + 1,
    ))
}

fn read_digits(chars: &[(usize, char)], start: usize) -> (Option<usize>, usize) {
    let run: String = chars[start.min(chars.len())..]
        .iter()
        .map(|(_, c)| *c)
        .take_while(char::is_ascii_digit)
        .collect();
    (run.parse().ok(), run.len())
}

fn render(spec: Specifier, value: f32) -> Result<String, FormatError> {
    match spec.conversion {
        's' | 'S' => render_string(spec, value),
        _ => Ok(render_numeric(spec, value)),
    }
}

fn render_string(spec: Specifier, value: f32) -> Result<String, FormatError> {
    let illegal = [
        (spec.flags.plus, '+'),
        (spec.flags.space, ' '),
        (spec.flags.zero, '0'),
        (spec.flags.group, ','),
    ];
    if let Some((_, flag)) = illegal.iter().find(|(set, _)| *set) {
        return Err(FormatError::IllegalFlag {
            flag: *flag,
            conversion: spec.conversion,
        });
    }

    let mut body = float_to_string(value);
    if let Some(precision) = spec.precision {
        body = body.chars().take(precision).collect();
    }
    if spec.conversion == 'S' {
        body = body.to_uppercase();
    }
    Ok(pad(String::new(), body, spec))
}

fn render_numeric(spec: Specifier, value: f32) -> String {
    let negative = value.is_sign_negative() && !value.is_nan();
    let sign = if negative {
        "-"
    } else if spec.flags.plus {
        "+"
    } else if spec.flags.space {
        " "
    } else {
        ""
    };

    let body = if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        "Infinity".to_string()
    } else {
        let precision = spec.precision.unwrap_or(6);
        let decimal = Decimal::from_f32(value.abs());
        match spec.conversion {
            'f' => {
                let fixed = decimal.to_fixed(precision);
                if spec.flags.group {
                    group_thousands(&fixed)
                } else {
                    fixed
                }
            }
            conversion => decimal.to_scientific(precision, conversion == 'E'),
        }
    };

    pad(sign.to_string(), body, spec)
}

fn pad(sign: String, body: String, spec: Specifier) -> String {
    let len = sign.chars().count() + body.chars().count();
    let width = spec.width.unwrap_or(0);
    if len >= width {
        return sign + &body;
    }
    let fill = width - len;
    if spec.flags.left {
        sign + &body + &" ".repeat(fill)
    } else if spec.flags.zero && spec.conversion != 's' && spec.conversion != 'S' {
        sign + &"0".repeat(fill) + &body
    } else {
        " ".repeat(fill) + &sign + &body
    }
}

fn group_thousands(fixed: &str) -> String {
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, c) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    match frac_part {
        Some(frac) => format!("{grouped}.{frac}"),
        None => grouped,
    }
}

/// Shortest decimal expansion of a finite, non-negative float.
///
/// `point` is the position of the decimal point within `digits`; it may lie
/// before the first digit or after the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Decimal {
    digits: Vec<u8>,
    point: i32,
}

impl Decimal {
    fn from_f32(value: f32) -> Self {
        if value == 0.0 {
            return Self {
                digits: vec![0],
                point: 1,
            };
        }
        // `{:e}` yields the shortest round-tripping digits, e.g. "9.65e1".
        let raw = format!("{value:e}");
        let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let digits = mantissa
            .bytes()
            .filter(u8::is_ascii_digit)
            .map(|b| b - b'0')
            .collect();
        Self {
            digits,
            point: exponent + 1,
        }
    }

    /// Keeps `significant` leading digits, rounding ties away from zero.
    fn round_half_up(mut self, significant: i32) -> Self {
        if significant < 0 {
            // The rounding digit is an implied leading zero.
            return Self {
                digits: Vec::new(),
                point: self.point,
            };
        }
        let keep = significant as usize;
        if keep >= self.digits.len() {
            return self;
        }
        let round_up = self.digits[keep] >= 5;
        self.digits.truncate(keep);
        if round_up {
            let mut i = keep;
            loop {
                if i == 0 {
                    self.digits.insert(0, 1);
                    self.point += 1;
                    break;
                }
                i -= 1;
                if self.digits[i] == 9 {
                    self.digits[i] = 0;
                } else {
                    self.digits[i] += 1;
                    break;
                }
            }
        }
        self
    }

    fn digit_at(&self, index: i32) -> char {
        let digit = usize::try_from(index)
            .ok()
            .and_then(|i| self.digits.get(i))
            .copied()
            .unwrap_or(0);
        char::from(b'0' + digit)
    }

    fn to_fixed(&self, precision: usize) -> String {
        let precision = precision as i32;
        let rounded = self.clone().round_half_up(self.point + precision);
        let mut out = String::new();
        if rounded.point <= 0 {
            out.push('0');
        } else {
            out.extend((0..rounded.point).map(|i| rounded.digit_at(i)));
        }
        if precision > 0 {
            out.push('.');
            out.extend((0..precision).map(|k| rounded.digit_at(rounded.point + k)));
        }
        out
    }

    fn to_scientific(&self, precision: usize, upper: bool) -> String {
        let precision = precision as i32;
        let rounded = self.clone().round_half_up(precision + 1);
        let exponent = if rounded.digits.iter().all(|d| *d == 0) {
            0
        } else {
            rounded.point - 1
        };
        let mut out = String::new();
        out.push(rounded.digit_at(0));
        if precision > 0 {
            out.push('.');
            out.extend((1..=precision).map(|i| rounded.digit_at(i)));
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        let marker = if upper { 'E' } else { 'e' };
        format!("{out}{marker}{sign}{:02}", exponent.abs())
    }
}

/// Plain string form of a float, always carrying a fractional part.
fn float_to_string(value: f32) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{value:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_rounds_to_integer() {
        assert_eq!(format_value(DEFAULT_FORMAT, 98.0).unwrap(), "98");
        assert_eq!(format_value(DEFAULT_FORMAT, 97.6).unwrap(), "98");
        assert_eq!(format_value(DEFAULT_FORMAT, 0.0).unwrap(), "0");
    }

    #[test]
    fn ties_round_away_from_zero() {
        assert_eq!(format_value(DEFAULT_FORMAT, 96.5).unwrap(), "97");
        assert_eq!(format_value(DEFAULT_FORMAT, 0.5).unwrap(), "1");
        assert_eq!(format_value(DEFAULT_FORMAT, 2.5).unwrap(), "3");
        assert_eq!(format_value(DEFAULT_FORMAT, 99.5).unwrap(), "100");
        assert_eq!(format_value(DEFAULT_FORMAT, -2.5).unwrap(), "-3");
        assert_eq!(format_value("%.1f", 0.25).unwrap(), "0.3");
        assert_eq!(format_value("%.1f", 0.04).unwrap(), "0.0");
        assert_eq!(format_value("%.2f", 0.005).unwrap(), "0.01");
        assert_eq!(format_value("%.1e", 2.25).unwrap(), "2.3e+00");
        assert_eq!(format_value("%.0E", 9.5).unwrap(), "1E+01");
        assert_eq!(format_value("%e", 0.0).unwrap(), "0.000000e+00");
    }

    #[test]
    fn precision_and_literal_text() {
        assert_eq!(format_value("%.2f", 3.14159).unwrap(), "3.14");
        assert_eq!(format_value("Score: %1$.1f pts", 42.3).unwrap(), "Score: 42.3 pts");
        assert_eq!(format_value("%.0f%%", 75.0).unwrap(), "75%");
        assert_eq!(format_value("%f", 1.5).unwrap(), "1.500000");
    }

    #[test]
    fn width_and_flags() {
        assert_eq!(format_value("%05.1f", 3.5).unwrap(), "003.5");
        assert_eq!(format_value("%-6.0f|", 98.0).unwrap(), "98    |");
        assert_eq!(format_value("%6.0f", 98.0).unwrap(), "    98");
        assert_eq!(format_value("%+.0f", 98.0).unwrap(), "+98");
        assert_eq!(format_value("%+.0f", -98.0).unwrap(), "-98");
        assert_eq!(format_value("%,.0f", 1234567.0).unwrap(), "1,234,567");
    }

    #[test]
    fn scientific_and_string_conversions() {
        assert_eq!(format_value("%e", 1234.5).unwrap(), "1.234500e+03");
        assert_eq!(format_value("%.2E", 0.015).unwrap(), "1.50E-02");
        assert_eq!(format_value("%s", 98.0).unwrap(), "98.0");
        assert_eq!(format_value("%.2s", 98.0).unwrap(), "98");
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        assert_eq!(format_value("%2$f", 1.0), Err(FormatError::MissingArgument(2)));
        assert_eq!(
            format_value("%q", 1.0),
            Err(FormatError::UnknownConversion {
                conversion: 'q',
                offset: 1
            })
        );
        assert_eq!(format_value("value %", 1.0), Err(FormatError::Incomplete(6)));
        assert_eq!(format_value("%.f", 1.0), Err(FormatError::Incomplete(0)));
        assert_eq!(
            format_value("%+s", 1.0),
            Err(FormatError::IllegalFlag {
                flag: '+',
                conversion: 's'
            })
        );
    }
}
