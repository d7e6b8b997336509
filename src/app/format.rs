//! Money and date formatting.
//!
//! Amounts travel as integer centavos everywhere; rendering to "R$ 1.234,56"
//! and parsing operator input back happen only here, with no floating point
//! in between.

/// Render centavos as Brazilian reais.
pub fn format_brl(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}R$ {},{:02}", sign, group_thousands(abs / 100), abs % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Parse user-typed money into centavos.
///
/// Accepts Brazilian notation ("1.234,56"), bare integers ("1234"), and a
/// dot decimal with up to two digits ("12.50") since number inputs emit
/// those. Negative or otherwise malformed input yields `None`.
pub fn parse_brl(input: &str) -> Option<i64> {
    let cleaned = input.trim().trim_start_matches("R$").trim();
    if cleaned.is_empty() || cleaned.contains('-') {
        return None;
    }

    let (whole, frac) = if let Some((w, f)) = cleaned.rsplit_once(',') {
        (w.replace('.', ""), f.to_string())
    } else if let Some((w, f)) = cleaned.rsplit_once('.') {
        if !f.is_empty() && f.len() <= 2 {
            (w.replace('.', ""), f.to_string())
        } else {
            // Dots in groups of three are thousands separators.
            (cleaned.replace('.', ""), String::new())
        }
    } else {
        (cleaned.to_string(), String::new())
    };

    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if frac.len() > 2
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !frac.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let reais: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let cents: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };
    reais.checked_mul(100)?.checked_add(cents)
}

/// Render a backend timestamp for tables. Unparseable input is shown as-is
/// rather than hidden.
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d/%m/%Y %H:%M").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.format("%d/%m/%Y %H:%M").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_grouped_amounts() {
        assert_eq!(format_brl(0), "R$ 0,00");
        assert_eq!(format_brl(5), "R$ 0,05");
        assert_eq!(format_brl(123_456), "R$ 1.234,56");
        assert_eq!(format_brl(1_234_567_890), "R$ 12.345.678,90");
        assert_eq!(format_brl(-1200), "-R$ 12,00");
    }

    #[test]
    fn parses_brazilian_notation() {
        assert_eq!(parse_brl("1.234,56"), Some(123_456));
        assert_eq!(parse_brl("R$ 10,00"), Some(1000));
        assert_eq!(parse_brl("0,05"), Some(5));
        assert_eq!(parse_brl(",50"), Some(50));
        assert_eq!(parse_brl("12,5"), Some(1250));
    }

    #[test]
    fn parses_plain_and_dot_notation() {
        assert_eq!(parse_brl("1234"), Some(123_400));
        assert_eq!(parse_brl("12.50"), Some(1250));
        assert_eq!(parse_brl("12.5"), Some(1250));
        assert_eq!(parse_brl("1.234"), Some(123_400));
        assert_eq!(parse_brl("1.234.567"), Some(123_456_700));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_brl(""), None);
        assert_eq!(parse_brl("  "), None);
        assert_eq!(parse_brl("-10"), None);
        assert_eq!(parse_brl("12,345"), None);
        assert_eq!(parse_brl("abc"), None);
        assert_eq!(parse_brl("12,3x"), None);
    }

    #[test]
    fn renders_timestamps() {
        assert_eq!(format_date("2026-03-01T14:30:00Z"), "01/03/2026 14:30");
        assert_eq!(format_date("2026-03-01 14:30:00"), "01/03/2026 14:30");
        assert_eq!(format_date("soon"), "soon");
    }
}
