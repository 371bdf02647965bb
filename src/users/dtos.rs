use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub static ACTIVATION_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("activation code regex is valid"));

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(email(message = "value is not a valid email address"))]
    #[schema(example = "test@gmail.com")]
    pub email: String,
    #[validate(length(min = 8, message = "String should have at least 8 characters"))]
    #[schema(example = "testtest", min_length = 8)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ActivateUser {
    #[validate(regex(
        path = *ACTIVATION_CODE,
        message = "Activation code must be exactly 4 digits"
    ))]
    #[schema(example = "0420", pattern = "^[0-9]{4}$")]
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(errors: validator::ValidationErrors, field: &str) -> Vec<String> {
        errors.field_errors()[field]
            .iter()
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_registration() {
        let input = RegisterUser {
            email: "test@gmail.com".into(),
            password: "testtest".into(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_short_password() {
        let input = RegisterUser {
            email: "test1@gmail.com".into(),
            password: "test".into(),
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(
            messages(errors, "password"),
            vec!["String should have at least 8 characters"]
        );
    }

    #[test]
    fn test_email_without_at_sign() {
        let input = RegisterUser {
            email: "test1gmail.com".into(),
            password: "testtest".into(),
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(
            messages(errors, "email"),
            vec!["value is not a valid email address"]
        );
    }

    #[test]
    fn test_activation_code_shape() {
        assert!(ActivateUser { code: "0000".into() }.validate().is_ok());
        for bad in ["", "123", "12345", "abcd", " 123"] {
            assert!(
                ActivateUser { code: bad.into() }.validate().is_err(),
                "{bad:?} should be rejected"
            );
        }
    }
}
