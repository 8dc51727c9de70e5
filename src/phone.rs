//! Phone normalization and validation for the WhatsApp delivery pipeline.
//!
//! Numbers are kept as digit-only strings in international form without the
//! leading `+`: country code `55` followed by a 10 or 11 digit local number
//! (11 when the mobile ninth digit is present).

use lazy_static::lazy_static;
use regex::Regex;

/// Brazilian country calling code, without the `+`.
pub const COUNTRY_PREFIX: &str = "55";

lazy_static! {
    static ref INTERNATIONAL_PHONE: Regex = Regex::new(r"^55\d{10,11}$").unwrap();
}

/// Strip every non-digit character and prepend the country code when missing.
pub fn normalize(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.starts_with(COUNTRY_PREFIX) {
        digits
    } else {
        format!("{COUNTRY_PREFIX}{digits}")
    }
}

/// Whether a normalized number is deliverable: `55` plus 10 or 11 digits.
pub fn is_valid(phone: &str) -> bool {
    INTERNATIONAL_PHONE.is_match(phone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_formatting() {
        assert_eq!(normalize("+55 (11) 98765-4321"), "5511987654321");
    }

    #[test]
    fn normalize_prepends_country_code() {
        assert_eq!(normalize("11987654321"), "5511987654321");
        assert_eq!(normalize("(11) 3456-7890"), "551134567890");
    }

    #[test]
    fn valid_numbers_have_country_code_and_local_digits() {
        assert!(is_valid("5511987654321"));
        assert!(is_valid("551134567890"));
        assert!(!is_valid("11987654321"));
        assert!(!is_valid("551198765432100"));
        assert!(!is_valid("55abc11987654321"));
    }
}
