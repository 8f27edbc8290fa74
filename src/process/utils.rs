/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse an integer, accepting `"2.0"` style floats with no fractional part.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = clean_str(raw);
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    let f = s.parse::<f64>().ok()?;
    (f.fract() == 0.0 && f.is_finite()).then_some(f as i64)
}

/// Parse a float, accepting a comma as decimal separator.
pub fn parse_float(raw: &str) -> Option<f64> {
    let s = clean_str(raw).replace(',', ".");
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        // -0.0 becomes 0.0 so equal coordinates stay equal bit for bit
        .map(|f| if f == 0.0 { 0.0 } else { f })
}

/// Map a yes/no token to a boolean.
pub fn parse_yes_no(raw: &str) -> Option<bool> {
    match clean_str(raw).to_lowercase().as_str() {
        "oui" | "yes" | "true" | "vrai" | "1" => Some(true),
        "non" | "no" | "false" | "faux" | "0" => Some(false),
        _ => None,
    }
}

/// Keep only ASCII digits.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_str_strips_quotes() {
        assert_eq!(clean_str("  \"abc\" "), "abc");
        assert_eq!(clean_str("\""), "\"");
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_int("0"), Some(0));
        assert_eq!(parse_int("2.0"), Some(2));
        assert_eq!(parse_int("2.5"), None);
        assert_eq!(parse_int("rdc"), None);
        assert_eq!(parse_float("43,61"), Some(43.61));
        assert_eq!(parse_float("NaN"), None);
        assert_eq!(parse_float("-0,0").map(f64::to_bits), Some(0.0f64.to_bits()));
        assert_eq!(parse_float("abc"), None);
    }

    #[test]
    fn yes_no_tokens() {
        assert_eq!(parse_yes_no("Oui"), Some(true));
        assert_eq!(parse_yes_no(" non "), Some(false));
        assert_eq!(parse_yes_no("peut-être"), None);
    }

    #[test]
    fn digits() {
        assert_eq!(digits_only("+33 6 12-34.56 78"), "33612345678");
    }
}
