//! Input validation and derived values for the signup, login and
//! registration forms.
//!
//! Everything here is a total function: no input makes these panic or fail.

use super::errors::ValidationError;
use super::models::Season;
use chrono::Datelike;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

static MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("Invalid regex pattern"));

/// Minimum password length accepted for login and signup.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Smallest land size, in acres, the registration form accepts.
pub const MIN_LAND_SIZE: f64 = 0.1;

/// Largest land size, in acres, the registration form accepts.
pub const MAX_LAND_SIZE: f64 = 1000.0;

/// Punctuation that counts as a symbol for password strength.
const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Returns true for a ten digit Indian mobile number starting with 6-9.
///
/// Surrounding whitespace is not tolerated.
///
/// # Examples
///
/// ```
/// use agrismart::domain::validate_mobile;
///
/// assert!(validate_mobile("9876543210"));
/// assert!(!validate_mobile("5123456789"));
/// ```
pub fn validate_mobile(mobile: &str) -> bool {
    MOBILE_PATTERN.is_match(mobile)
}

pub fn password_valid(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Exact, case-sensitive comparison.
pub fn passwords_match(password: &str, confirmation: &str) -> bool {
    password == confirmation
}

/// Scores a password from 0 to 5.
///
/// One point each for: at least 6 characters, at least 8 characters, an
/// uppercase ASCII letter, an ASCII digit, and a symbol from a fixed
/// punctuation set.
///
/// # Examples
///
/// ```
/// use agrismart::domain::password_strength;
///
/// assert_eq!(password_strength("abcdef"), 1);
/// assert_eq!(password_strength("Abcdefg1!"), 5);
/// ```
pub fn password_strength(password: &str) -> u8 {
    let len = password.chars().count();
    let checks = [
        len >= 6,
        len >= 8,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| SYMBOLS.contains(c)),
    ];
    checks.iter().filter(|passed| **passed).count() as u8
}

/// Hex-encoded SHA-256 digest of the password.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Maps a calendar month (1-12) to its season.
///
/// December through February is winter, June through September is the
/// monsoon, every other month is summer.
pub fn season_for_month(month: u32) -> Season {
    match month {
        12 | 1 | 2 => Season::Winter,
        6..=9 => Season::Monsoon,
        _ => Season::Summer,
    }
}

pub fn detect_season<D: Datelike>(date: &D) -> Season {
    season_for_month(date.month())
}

/// Login form checks, run before any backend call.
pub fn check_login(mobile: &str, password: &str) -> Result<(), ValidationError> {
    if !validate_mobile(mobile) {
        return Err(ValidationError::InvalidMobile);
    }
    if !password_valid(password) {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Signup form checks, run before any backend call.
pub fn check_signup(mobile: &str, password: &str, confirmation: &str) -> Result<(), ValidationError> {
    check_login(mobile, password)?;
    if !passwords_match(password, confirmation) {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Registration form checks. Returns the trimmed farmer name.
pub fn check_profile(name: &str, land_size: f64) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() || !(land_size > 0.0) {
        return Err(ValidationError::MissingRequiredFields);
    }
    if !(MIN_LAND_SIZE..=MAX_LAND_SIZE).contains(&land_size) {
        return Err(ValidationError::LandSizeOutOfRange(land_size));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_validate_mobile() {
        assert!(validate_mobile("9876543210"));
        assert!(validate_mobile("6000000000"));
        assert!(!validate_mobile("5123456789"));
        assert!(!validate_mobile("12345"));
        assert!(!validate_mobile("98765432100"));
    }

    #[test]
    fn test_validate_mobile_rejects_whitespace_and_non_ascii() {
        assert!(!validate_mobile(" 9876543210"));
        assert!(!validate_mobile("9876543210\n"));
        assert!(!validate_mobile("98765432१0"));
        assert!(!validate_mobile(""));
    }

    #[test]
    fn test_password_valid() {
        assert!(!password_valid("abcde"));
        assert!(password_valid("abcdef"));
        assert!(password_valid("പാസ്‌വേഡ്"));
    }

    #[test]
    fn test_passwords_match_is_case_sensitive() {
        assert!(passwords_match("Secret1", "Secret1"));
        assert!(!passwords_match("Secret1", "secret1"));
    }

    #[test]
    fn test_password_strength_ladder() {
        assert_eq!(password_strength(""), 0);
        assert_eq!(password_strength("abcdef"), 1);
        assert_eq!(password_strength("abcdefgh"), 2);
        assert_eq!(password_strength("Abcdefgh"), 3);
        assert_eq!(password_strength("Abcdefg1"), 4);
        assert_eq!(password_strength("Abcdefg1!"), 5);
    }

    #[test]
    fn test_password_strength_counts_classes_on_short_input() {
        // Character classes score even below the length thresholds.
        assert_eq!(password_strength("A1!"), 3);
        assert_eq!(password_strength("a-b_c~"), 1);
    }

    #[test]
    fn test_hash_password() {
        assert_eq!(
            hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
        assert_ne!(hash_password("password"), hash_password("Password"));
    }

    #[test]
    fn test_season_for_month() {
        assert_eq!(season_for_month(1), Season::Winter);
        assert_eq!(season_for_month(7), Season::Monsoon);
        assert_eq!(season_for_month(4), Season::Summer);
        assert_eq!(season_for_month(11), Season::Summer);
        assert_eq!(season_for_month(12), Season::Winter);
    }

    #[test]
    fn test_season_covers_every_month() {
        let winter = (1..=12).filter(|m| season_for_month(*m) == Season::Winter).count();
        let monsoon = (1..=12).filter(|m| season_for_month(*m) == Season::Monsoon).count();
        let summer = (1..=12).filter(|m| season_for_month(*m) == Season::Summer).count();
        assert_eq!((winter, monsoon, summer), (3, 4, 5));
    }

    #[test]
    fn test_detect_season_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();
        assert_eq!(detect_season(&date), Season::Monsoon);
    }

    #[test]
    fn test_check_signup_order() {
        assert_eq!(check_signup("123", "short", "x"), Err(ValidationError::InvalidMobile));
        assert_eq!(
            check_signup("9876543210", "short", "x"),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            check_signup("9876543210", "secret1", "secret2"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(check_signup("9876543210", "secret1", "secret1"), Ok(()));
    }

    #[test]
    fn test_check_profile() {
        assert_eq!(check_profile("  Asha ", 2.5), Ok("Asha"));
        assert_eq!(check_profile("", 2.5), Err(ValidationError::MissingRequiredFields));
        assert_eq!(check_profile("   ", 2.5), Err(ValidationError::MissingRequiredFields));
        assert_eq!(check_profile("Asha", 0.0), Err(ValidationError::MissingRequiredFields));
        assert_eq!(check_profile("Asha", f64::NAN), Err(ValidationError::MissingRequiredFields));
        assert_eq!(
            check_profile("Asha", 1000.5),
            Err(ValidationError::LandSizeOutOfRange(1000.5))
        );
        assert_eq!(
            check_profile("Asha", 0.05),
            Err(ValidationError::LandSizeOutOfRange(0.05))
        );
        assert_eq!(check_profile("Asha", 0.1), Ok("Asha"));
        assert_eq!(check_profile("Asha", 1000.0), Ok("Asha"));
    }
}
