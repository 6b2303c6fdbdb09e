//! Numeric coercion for free-text journal fields.
//!
//! The points column is kept as typed, so every consumer that needs a
//! number funnels through [`safe_parse_float`]. Blank and unparseable
//! entries are both "absent"; the caller decides whether that warrants a
//! warning.

/// Trim, treat blank as absent, and refuse non-finite values.
pub fn safe_parse_float(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Round to cents. Derived dollar figures are stored already rounded so
/// the database matches what the reports print.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_signed_numbers() {
        assert_eq!(safe_parse_float(Some("10.5")), Some(10.5));
        assert_eq!(safe_parse_float(Some("-3")), Some(-3.0));
        assert_eq!(safe_parse_float(Some("  7.25  ")), Some(7.25));
        assert_eq!(safe_parse_float(Some("0")), Some(0.0));
    }

    #[test]
    fn blank_and_garbage_are_absent() {
        assert_eq!(safe_parse_float(None), None);
        assert_eq!(safe_parse_float(Some("")), None);
        assert_eq!(safe_parse_float(Some("   ")), None);
        assert_eq!(safe_parse_float(Some("ten points")), None);
        assert_eq!(safe_parse_float(Some("10.5.3")), None);
    }

    #[test]
    fn non_finite_is_absent() {
        assert_eq!(safe_parse_float(Some("inf")), None);
        assert_eq!(safe_parse_float(Some("NaN")), None);
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round2(250.004), 250.0);
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(-12.346), -12.35);
        assert_eq!(round2(550.0), 550.0);
    }
}
