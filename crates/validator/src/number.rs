//! Ordering for JSON numbers.
//!
//! `serde_json::Number` keeps integers and floats apart. Integer pairs are
//! compared exactly; anything involving a float goes through `f64`.

use std::cmp::Ordering;

use serde_json::Number;

/// Compares two JSON numbers.
///
/// Returns `None` only when a float comparison is undefined, which cannot
/// happen for numbers produced by `serde_json` (it rejects NaN).
#[must_use]
pub fn compare(a: &Number, b: &Number) -> Option<Ordering> {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => return Some(x.cmp(&y)),
        // A u64 that does not fit in i64 is above every i64.
        (Some(_), None) if b.is_u64() => return Some(Ordering::Less),
        (None, Some(_)) if a.is_u64() => return Some(Ordering::Greater),
        _ => {}
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

/// Builds a JSON number from a float, rejecting NaN and infinities.
#[must_use]
pub fn from_f64(value: f64) -> Option<Number> {
    Number::from_f64(value)
}
