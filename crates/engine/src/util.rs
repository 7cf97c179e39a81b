//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every registry enforces the same rules.

use chrono_tz::Tz;
use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

const MIN_NAME_CHARS: usize = 3;
const MIN_PASSWORD_CHARS: usize = 8;

/// Trim a display name and require at least three characters.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let display: String = value.nfkc().collect::<String>().trim().to_string();
    if display.chars().count() < MIN_NAME_CHARS {
        return Err(EngineError::Validation(format!(
            "{label} name must be at least {MIN_NAME_CHARS} characters"
        )));
    }
    Ok(display)
}

/// Case-insensitive comparison key for a name already normalized for display.
pub(crate) fn name_key(display: &str) -> String {
    display.to_lowercase()
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Lowercase and shape-check an email address (`local@domain.tld`).
pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = value.trim().to_lowercase();
    let invalid = || EngineError::Validation("invalid email address".to_string());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || tld.is_empty() {
        return Err(invalid());
    }
    Ok(email)
}

pub(crate) fn validate_password(value: &str) -> ResultEngine<()> {
    if value.chars().count() < MIN_PASSWORD_CHARS {
        return Err(EngineError::Validation(format!(
            "password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}

/// Accept only IANA timezone names (e.g. `Asia/Jakarta`).
pub(crate) fn normalize_timezone(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    trimmed
        .parse::<Tz>()
        .map(|tz| tz.name().to_string())
        .map_err(|_| EngineError::Validation(format!("unknown timezone: {trimmed}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_nfkc_normalized() {
        assert_eq!(
            normalize_required_name("  Groceries ", "category").unwrap(),
            "Groceries"
        );
        // Fullwidth letters fold to ASCII.
        assert_eq!(normalize_required_name("ＢＣＡ", "wallet").unwrap(), "BCA");
        assert!(normalize_required_name(" ab ", "wallet").is_err());
    }

    #[test]
    fn email_shape_is_checked() {
        assert_eq!(
            normalize_email(" Budi@Example.COM ").unwrap(),
            "budi@example.com"
        );
        assert!(normalize_email("budi").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("budi@example").is_err());
        assert!(normalize_email("bu di@example.com").is_err());
        assert!(normalize_email("a@b@example.com").is_err());
    }

    #[test]
    fn password_length_is_enforced() {
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn timezone_must_be_iana() {
        assert_eq!(normalize_timezone("Asia/Jakarta").unwrap(), "Asia/Jakarta");
        assert!(normalize_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(
            normalize_optional_text(Some(" lunch ")),
            Some("lunch".to_string())
        );
        assert_eq!(normalize_optional_text(None), None);
    }
}
