//! Histogram interval math and bucket labels
//!
//! Numeric specification facets are shown as roughly six ranges. When every
//! value of the field is integral the width is snapped to a round number
//! (8, 80, 800, ...); otherwise it keeps one decimal place.

/// Number of ranges a numeric facet aims for
pub const TARGET_BUCKETS: f64 = 6.0;

/// Bucket width for a numeric field with the given statistics
///
/// `sum` decides whether the field holds only whole numbers. The result is
/// zero when `min == max`; callers treat that as a degenerate facet.
pub fn calculate_interval(min: f64, max: f64, sum: f64) -> f64 {
    let raw = (max - min) / TARGET_BUCKETS;

    if is_integral(sum) {
        let factor = 10f64.powi(integer_digits(raw) as i32 - 1);
        (raw / factor).round() * factor
    } else {
        round_to(raw, 1)
    }
}

/// Digits in the integer part of `value`; zero counts as one digit
fn integer_digits(value: f64) -> u32 {
    let integer_part = value.trunc().abs() as u64;
    integer_part.to_string().len() as u32
}

/// Whether `value` has no fractional part
pub fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// Round half away from zero to the given number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Label of the histogram bucket starting at `begin`, e.g. `"5-10"`
///
/// Whole-number bounds are rendered without decimals; anything else is
/// rounded to two places on both ends, e.g. `"0.8-1.6"` or `"2.0-2.8"`.
pub fn range_label(begin: f64, interval: f64) -> String {
    let end = begin + interval;
    if is_integral(begin) && is_integral(end) {
        format!("{}-{}", begin as i64, end as i64)
    } else {
        format!("{}-{}", decimal_bound(begin), decimal_bound(end))
    }
}

/// Label of a facet whose values are all equal
pub fn single_value_label(value: f64) -> String {
    if is_integral(value) {
        format!("{}", value as i64)
    } else {
        decimal_bound(value)
    }
}

fn decimal_bound(value: f64) -> String {
    let rounded = round_to(value, 2);
    if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        format!("{}", rounded)
    }
}
