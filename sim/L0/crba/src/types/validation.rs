//! Numeric validation utilities for configuration vectors.
//!
//! Detection primitives for NaN, infinity and divergence (values exceeding
//! `MAX_VAL`).

/// Maximum allowed magnitude of a configuration entry.
pub const MAX_VAL: f64 = 1e10;

/// Returns true if value is NaN, +inf, -inf, or exceeds `MAX_VAL`.
#[inline]
#[must_use]
pub fn is_bad(x: f64) -> bool {
    // NaN fails range checks silently, so the explicit is_nan() is required.
    #[allow(clippy::manual_range_contains)]
    {
        x.is_nan() || x > MAX_VAL || x < -MAX_VAL
    }
}

/// Index and value of the first bad entry of `values`, if any.
#[must_use]
pub fn first_bad(values: &[f64]) -> Option<(usize, f64)> {
    values
        .iter()
        .copied()
        .enumerate()
        .find(|&(_, x)| is_bad(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_bad() {
        assert!(is_bad(f64::NAN));
        assert!(is_bad(f64::INFINITY));
        assert!(is_bad(f64::NEG_INFINITY));
        assert!(is_bad(1.1e10));
        assert!(is_bad(-1.1e10));
        assert!(!is_bad(0.0));
        assert!(!is_bad(-1.0));
        assert!(!is_bad(1e10)); // exactly MAX_VAL is not bad
    }

    #[test]
    fn test_first_bad() {
        assert_eq!(first_bad(&[0.0, 1.0, 2.0]), None);
        let (index, value) = first_bad(&[0.0, f64::INFINITY, f64::NAN]).unwrap_or((99, 0.0));
        assert_eq!(index, 1);
        assert!(value.is_infinite());
    }
}
