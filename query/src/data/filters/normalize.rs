//! Value normalization
//!
//! Filter values arrive as numbers or strings. They are unified to strings
//! here, and read back with permissive parsers: anything that is not a
//! number coerces to zero instead of failing.

/// A filter value before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Int(i64::from(v))
    }
}

impl From<u32> for RawValue {
    fn from(v: u32) -> Self {
        RawValue::Int(i64::from(v))
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

impl From<&String> for RawValue {
    fn from(v: &String) -> Self {
        RawValue::Text(v.clone())
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

/// Canonical string form of a filter value
pub fn normalize(raw: impl Into<RawValue>) -> String {
    match raw.into() {
        RawValue::Int(v) => v.to_string(),
        RawValue::Float(v) => float_literal(v),
        RawValue::Text(v) => v,
    }
}

/// Render a float so it always reads back as the same number
///
/// Integral values keep a `.0` suffix; non-finite values become `0.0`.
pub fn float_literal(v: f64) -> String {
    if v.is_finite() {
        format!("{:?}", v)
    } else {
        "0.0".to_string()
    }
}

/// Permissive integer parse: leading sign and digits, otherwise 0
///
/// `"7days"` reads as 7, `"abc"` as 0. Out-of-range values saturate.
pub fn to_i(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        value = value.saturating_mul(10);
        value = if negative {
            value.saturating_sub(digit)
        } else {
            value.saturating_add(digit)
        };
    }
    value
}

/// Permissive float parse: longest numeric prefix, otherwise 0.0
///
/// Accepts `"10"`, `"2.5kg"`, `".5"`, `"1e3"`; `"abc"` and `""` read as 0.0.
pub fn to_f(s: &str) -> f64 {
    let s = s.trim_start();
    let end = numeric_prefix_len(s.as_bytes());
    if end == 0 {
        return 0.0;
    }
    match s[..end].parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Length of the leading `[+-]?digits[.digits][e[+-]digits]` run
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let count_digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let int_digits = count_digits(pos);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        frac_digits = count_digits(pos + 1);
        if frac_digits > 0 {
            pos += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(exp);
        if exp_digits > 0 {
            pos = exp + exp_digits;
        }
    }

    pos
}
