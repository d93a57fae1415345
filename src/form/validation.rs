//! Contact-form field rules.

use regex::Regex;
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"))
}

fn phone_regex() -> &'static Regex {
    // Optional leading plus, then at least ten digits with space, dash or
    // parenthesis separators anywhere
    PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^[+]?[\s\-()]*([0-9][\s\-()]*){10,}$").expect("valid regex")
    })
}

/// `local@domain.tld` shape, no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    phone_regex().is_match(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    InvalidEmail,
    InvalidPhone,
}

impl FieldError {
    pub fn message(&self) -> &'static str {
        match self {
            FieldError::Required => "This field is required",
            FieldError::InvalidEmail => "Please enter a valid email address",
            FieldError::InvalidPhone => "Please enter a valid phone number",
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Check a raw field value against the rules for its input type.
///
/// The value is trimmed first; format rules only apply to non-empty values.
pub fn check_value(input_type: &str, required: bool, raw: &str) -> Result<(), FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        return if required {
            Err(FieldError::Required)
        } else {
            Ok(())
        };
    }
    match input_type {
        "email" if !is_valid_email(value) => Err(FieldError::InvalidEmail),
        "tel" if !is_valid_phone(value) => Err(FieldError::InvalidPhone),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== Email Tests ====================

    #[test]
    fn test_email_accepts_simple_address() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("yuki.tanaka@salon.example.ca"));
    }

    #[test]
    fn test_email_rejects_missing_tld() {
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@b.co"));
    }

    #[test]
    fn test_required_empty_is_rejected() {
        assert_eq!(check_value("email", true, ""), Err(FieldError::Required));
        assert_eq!(check_value("text", true, "   "), Err(FieldError::Required));
    }

    #[test]
    fn test_optional_empty_is_accepted() {
        assert_eq!(check_value("email", false, ""), Ok(()));
        assert_eq!(check_value("tel", false, "  "), Ok(()));
    }

    #[test]
    fn test_email_value_is_trimmed() {
        assert_eq!(check_value("email", true, "  a@b.co  "), Ok(()));
        assert_eq!(check_value("email", true, "a@b"), Err(FieldError::InvalidEmail));
    }

    // ==================== Phone Tests ====================

    #[test]
    fn test_phone_accepts_common_formats() {
        assert!(is_valid_phone("604-555-1234"));
        assert!(is_valid_phone("(604) 555-1234"));
        assert!(is_valid_phone("+1 604 555 1234"));
        assert!(is_valid_phone("6045551234"));
    }

    #[test]
    fn test_phone_rejects_short_or_lettered() {
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("604-555-CALL"));
        assert!(!is_valid_phone("++16045551234"));
    }

    #[test]
    fn test_check_value_phone() {
        assert_eq!(check_value("tel", true, "12345"), Err(FieldError::InvalidPhone));
        assert_eq!(check_value("tel", true, "604-555-1234"), Ok(()));
    }

    #[test]
    fn test_other_types_only_check_required() {
        assert_eq!(check_value("text", true, "anything at all"), Ok(()));
        assert_eq!(check_value("", true, "select value"), Ok(()));
    }

    #[test]
    fn test_messages() {
        assert_eq!(FieldError::Required.to_string(), "This field is required");
        assert_eq!(
            FieldError::InvalidPhone.message(),
            "Please enter a valid phone number"
        );
    }

    proptest! {
        #[test]
        fn prop_ten_digit_numbers_are_valid(digits in "[0-9]{10,15}") {
            prop_assert!(is_valid_phone(&digits));
        }

        #[test]
        fn prop_short_numbers_are_invalid(digits in "[0-9]{1,9}") {
            prop_assert!(!is_valid_phone(&digits));
        }

        #[test]
        fn prop_whitespace_never_valid_email(local in "[a-z]{1,8}", domain in "[a-z]{1,8}") {
            let address = format!("{} x@{}.com", local, domain);
            prop_assert!(!is_valid_email(&address));
        }
    }
}
