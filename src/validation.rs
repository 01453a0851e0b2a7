// Validation utilities module
// Input-shape and business-rule checks for signup and login payloads

use lazy_static::lazy_static;
use regex::Regex;
use validator::{Validate, ValidationErrors};

use crate::auth::error::AuthError;
use crate::auth::models::{LoginRequest, SignupRequest};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 32;

pub const ERR_REQUIRED_FIELDS_EMPTY: &str = "Required fields cannot be empty";
pub const ERR_LOGIN_FIELDS_EMPTY: &str = "Email and password are required";
pub const ERR_INVALID_EMAIL_FORMAT: &str = "Invalid email format";
pub const ERR_INVALID_PHONE_NUMBER: &str = "Invalid phone number format";
pub const ERR_PASSWORD_COMPLEXITY: &str = "Password must contain at least one uppercase letter, one lowercase letter, one number, and one special character";

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[1-9]\d{1,14}$").unwrap();
}

/// Runs every signup check in a fixed order and stops at the first failure:
/// required fields, email, phone number, password, then username shape.
pub fn validate_signup(request: &SignupRequest) -> Result<(), AuthError> {
    let required = [
        ("username", request.user_name.as_str()),
        ("email", request.email.as_str()),
        ("phone_number", request.phone_number.as_str()),
        ("password", request.password.as_str()),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(AuthError::validation(*field, ERR_REQUIRED_FIELDS_EMPTY));
    }

    validate_email(&request.email)?;
    validate_phone_number(&request.phone_number)?;
    validate_password(&request.password)?;

    request.validate().map_err(AuthError::from)
}

/// Login only needs both credentials present; everything else is decided
/// by the credential check so that no format hint leaks to the caller.
pub fn validate_login(request: &LoginRequest) -> Result<(), AuthError> {
    if request.email.trim().is_empty() {
        return Err(AuthError::validation("email", ERR_LOGIN_FIELDS_EMPTY));
    }
    if request.password.trim().is_empty() {
        return Err(AuthError::validation("password", ERR_LOGIN_FIELDS_EMPTY));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(AuthError::validation("email", ERR_INVALID_EMAIL_FORMAT))
    }
}

pub fn validate_phone_number(phone_number: &str) -> Result<(), AuthError> {
    if PHONE_RE.is_match(phone_number.trim()) {
        Ok(())
    } else {
        Err(AuthError::validation("phone_number", ERR_INVALID_PHONE_NUMBER))
    }
}

/// Length is counted in characters, not bytes.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    let length = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return Err(AuthError::validation(
            "password",
            format!(
                "Password must be between {} and {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            ),
        ));
    }

    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());

    if has_lower && has_upper && has_digit && has_special {
        Ok(())
    } else {
        Err(AuthError::validation("password", ERR_PASSWORD_COMPLEXITY))
    }
}

/// Validates that a username contains only ASCII letters and digits
pub fn validate_alphanumeric(value: &str) -> Result<(), validator::ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("alphanumeric");
        error.message = Some("Username must contain only letters and digits".into());
        Err(error)
    }
}

/// Picks a deterministic (field, reason) pair out of a validator error set
pub(crate) fn first_field_error(errors: &ValidationErrors) -> (String, String) {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().copied().collect();
    fields.sort_unstable();

    fields
        .first()
        .and_then(|field| {
            field_errors.get(field).and_then(|list| list.first()).map(|error| {
                let reason = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                (field.to_string(), reason)
            })
        })
        .unwrap_or_else(|| ("request".to_string(), "Request validation failed".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_request() -> SignupRequest {
        SignupRequest {
            user_name: "JohnDoe".to_string(),
            email: "johndoe@gmail.com".to_string(),
            phone_number: "1234567890".to_string(),
            password: "Johndoe123!".to_string(),
        }
    }

    fn reason_of(result: Result<(), AuthError>) -> (String, String) {
        match result {
            Err(AuthError::Validation { field, reason }) => (field, reason),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_signup_passes() {
        assert!(validate_signup(&valid_request()).is_ok());
    }

    #[test]
    fn test_blank_field_is_rejected_first() {
        let mut request = valid_request();
        request.phone_number = "   ".to_string();
        // Also break the email; required-field check must win
        request.email = "not-an-email".to_string();

        let (field, reason) = reason_of(validate_signup(&request));
        assert_eq!(field, "phone_number");
        assert_eq!(reason, ERR_REQUIRED_FIELDS_EMPTY);
    }

    #[test]
    fn test_email_checked_before_phone_and_password() {
        let mut request = valid_request();
        request.email = "johndoe@gmail".to_string();
        request.phone_number = "0123".to_string();
        request.password = "short".to_string();

        let (field, reason) = reason_of(validate_signup(&request));
        assert_eq!(field, "email");
        assert_eq!(reason, ERR_INVALID_EMAIL_FORMAT);
    }

    #[test]
    fn test_phone_checked_before_password() {
        let mut request = valid_request();
        request.phone_number = "0123456789".to_string();
        request.password = "short".to_string();

        let (field, reason) = reason_of(validate_signup(&request));
        assert_eq!(field, "phone_number");
        assert_eq!(reason, ERR_INVALID_PHONE_NUMBER);
    }

    #[test]
    fn test_phone_number_formats() {
        assert!(validate_phone_number("1234567890").is_ok());
        assert!(validate_phone_number("+14155552671").is_ok());
        assert!(validate_phone_number("12").is_ok());
        assert!(validate_phone_number("1").is_err());
        assert!(validate_phone_number("0123456789").is_err());
        assert!(validate_phone_number("+1234567890123456").is_err());
        assert!(validate_phone_number("123-456-7890").is_err());
    }

    #[test]
    fn test_email_formats() {
        assert!(validate_email("johndoe@gmail.com").is_ok());
        assert!(validate_email("first.last+tag@mail.example.org").is_ok());
        assert!(validate_email("JOHN@EXAMPLE.COM").is_ok());
        assert!(validate_email("johndoe@localhost").is_err());
        assert!(validate_email("@gmail.com").is_err());
        assert!(validate_email("john doe@gmail.com").is_err());
        assert!(validate_email("johndoe@gmail.c").is_err());
    }

    #[test]
    fn test_password_of_length_seven_fails_length_check() {
        let (_, reason) = reason_of(validate_password("Abcde1!"));
        assert_eq!(reason, "Password must be between 8 and 32 characters");
    }

    #[test]
    fn test_password_too_long_fails_length_check() {
        let password = format!("Aa1!{}", "x".repeat(29));
        assert_eq!(password.chars().count(), 33);
        let (_, reason) = reason_of(validate_password(&password));
        assert_eq!(reason, "Password must be between 8 and 32 characters");
    }

    #[test]
    fn test_lowercase_only_password_fails_complexity_check() {
        let (_, reason) = reason_of(validate_password("abcdefgh"));
        assert_eq!(reason, ERR_PASSWORD_COMPLEXITY);
    }

    #[test]
    fn test_password_missing_each_class_fails() {
        assert!(validate_password("ABCDEFG1!").is_err());
        assert!(validate_password("abcdefg1!").is_err());
        assert!(validate_password("Abcdefgh!").is_err());
        assert!(validate_password("Abcdefgh1").is_err());
        assert!(validate_password("Abcdefg1!").is_ok());
    }

    #[test]
    fn test_username_shape_is_checked_last() {
        let mut request = valid_request();
        request.user_name = "jo".to_string();
        let (field, reason) = reason_of(validate_signup(&request));
        assert_eq!(field, "username");
        assert_eq!(reason, "Username must be between 3 and 16 characters");

        request.user_name = "john_doe".to_string();
        let (_, reason) = reason_of(validate_signup(&request));
        assert_eq!(reason, "Username must contain only letters and digits");
    }

    #[test]
    fn test_login_requires_both_fields() {
        let request = LoginRequest {
            email: " ".to_string(),
            password: "Johndoe123!".to_string(),
        };
        let (field, reason) = reason_of(validate_login(&request));
        assert_eq!(field, "email");
        assert_eq!(reason, ERR_LOGIN_FIELDS_EMPTY);

        let request = LoginRequest {
            email: "johndoe@gmail.com".to_string(),
            password: String::new(),
        };
        let (field, _) = reason_of(validate_login(&request));
        assert_eq!(field, "password");
    }

    proptest! {
        #[test]
        fn prop_passwords_with_all_classes_are_accepted(
            lower in "[a-z]{2,7}",
            upper in "[A-Z]{2,7}",
            digits in "[0-9]{2,7}",
            special in "[!@#$%^&*]{2,7}"
        ) {
            let password = format!("{}{}{}{}", lower, upper, digits, special);
            prop_assert!(validate_password(&password).is_ok());
        }

        #[test]
        fn prop_short_passwords_are_rejected(password in "[a-zA-Z0-9!@#]{0,7}") {
            prop_assert!(validate_password(&password).is_err());
        }

        #[test]
        fn prop_phone_numbers_with_leading_zero_are_rejected(rest in "[0-9]{1,14}") {
            let phone = format!("0{}", rest);
            prop_assert!(validate_phone_number(&phone).is_err());
        }
    }
}
