//! Division and formatting helpers shared by every ratio in the report.

/// `a / b`, or `0.0` when `b` is zero. Never yields NaN or infinity.
pub fn safe_div(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        0.0
    } else {
        a / b
    }
}

/// Format with two decimals. Negative zero prints as `0.00`.
pub(crate) fn fixed2(v: f64) -> String {
    format!("{:.2}", v + 0.0)
}

/// Round to two decimals for numeric output fields.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0 + 0.0
}

/// Parse a formatted report value, ignoring a trailing `%`.
pub(crate) fn parse_display_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed);
    trimmed.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_div_by_zero_is_zero() {
        assert_eq!(safe_div(0.0, 0.0), 0.0);
        assert_eq!(safe_div(42.0, 0.0), 0.0);
        assert_eq!(safe_div(-7.0, 0.0), 0.0);
        assert_eq!(safe_div(10.0, 4.0), 2.5);
    }

    #[test]
    fn fixed2_formats_and_normalizes_zero() {
        assert_eq!(fixed2(5.714285), "5.71");
        assert_eq!(fixed2(50.0), "50.00");
        assert_eq!(fixed2(-0.0), "0.00");
        assert_eq!(fixed2(-12.5), "-12.50");
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(-0.001), 0.0);
    }

    #[test]
    fn parse_display_number_strips_percent() {
        assert_eq!(parse_display_number("40.00%"), Some(40.0));
        assert_eq!(parse_display_number("5.71"), Some(5.71));
        assert_eq!(parse_display_number("-3.00"), Some(-3.0));
        assert_eq!(parse_display_number("n/a"), None);
    }
}
