//! Input coercion helpers for DTOs.

use crate::dto::admin::PointsInput;

/// Turn a raw admin-entered points value into a weekly score between `0` and `max_points`.
///
/// Text is read like a form field: leading whitespace and an optional sign, then the longest
/// run of digits. Anything without leading digits counts as zero, as do missing values.
///
/// # Examples
///
/// ```ignore
/// coerce_points(Some(&PointsInput::Text("12abc".into())), 999) // 12
/// coerce_points(Some(&PointsInput::Text("abc".into())), 999)   // 0
/// coerce_points(Some(&PointsInput::Integer(-4)), 999)          // 0
/// coerce_points(Some(&PointsInput::Integer(5000)), 999)        // 999
/// ```
pub fn coerce_points(raw: Option<&PointsInput>, max_points: i32) -> i32 {
    let value = match raw {
        None => 0,
        Some(PointsInput::Integer(value)) => *value,
        // `as` saturates on out-of-range floats.
        Some(PointsInput::Decimal(value)) => value.trunc() as i64,
        Some(PointsInput::Text(text)) => parse_leading_integer(text),
    };

    let clamped = value.clamp(0, i64::from(max_points.max(0)));
    i32::try_from(clamped).unwrap_or(0)
}

fn parse_leading_integer(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0_i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
        });

    if negative { -magnitude } else { magnitude }
}
