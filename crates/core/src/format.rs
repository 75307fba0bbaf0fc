//! Live input formatters for the cédula and phone fields.
//!
//! Applied on every input event; they rewrite the field's value rather than
//! rejecting it, so the user can only ever produce a well-shaped string.

/// Strips non-digits and caps the cédula input at 10 digits.
pub fn format_cedula_input(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).take(10).collect()
}

/// Sanitizes a phone input: digits, `+` and spaces only. When the value
/// starts with `+593`, the remaining digits are regrouped as
/// `+593 99 999 9999` (2-3-4 grouping).
pub fn format_phone_input(raw: &str) -> String {
    let value: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+' || *c == ' ')
        .collect();

    let rest = match value.strip_prefix("+593") {
        Some(rest) if !rest.trim().is_empty() => rest,
        _ => return value,
    };

    let digits: Vec<char> = rest.chars().filter(char::is_ascii_digit).collect();
    let mut formatted = String::from("+593");
    for (chunk_len, start) in [(2usize, 0usize), (3, 2), (4, 5)] {
        if start >= digits.len() {
            break;
        }
        let end = (start + chunk_len).min(digits.len());
        formatted.push(' ');
        formatted.extend(&digits[start..end]);
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cedula_input_strips_and_caps() {
        assert_eq!(format_cedula_input("17a10-0340"), "17100340");
        assert_eq!(format_cedula_input("171003406512345"), "1710034065");
        assert_eq!(format_cedula_input(""), "");
    }

    #[test]
    fn test_phone_input_keeps_only_dial_characters() {
        assert_eq!(format_phone_input("09x9 93-36"), "099 9336");
    }

    #[test]
    fn test_phone_input_regroups_international_prefix() {
        assert_eq!(format_phone_input("+593995336523"), "+593 99 533 6523");
        assert_eq!(format_phone_input("+59399"), "+593 99");
        assert_eq!(format_phone_input("+5939953"), "+593 99 53");
        // Bare prefix is left as typed.
        assert_eq!(format_phone_input("+593"), "+593");
    }
}
