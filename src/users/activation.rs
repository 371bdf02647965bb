use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{DateTime, Duration, Utc};

use super::models::NewActivationCode;

pub const CODE_LENGTH: usize = 4;

const CODE_SPACE: u32 = 10_u32.pow(CODE_LENGTH as u32);

/// A freshly drawn code that has not been tied to a user yet.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl GeneratedCode {
    pub fn generate(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            code: generate_code(),
            expires_at: now + ttl,
        }
    }

    pub fn assign_to(self, user_id: i64) -> NewActivationCode {
        NewActivationCode {
            user_id,
            code: self.code,
            expires_at: self.expires_at,
        }
    }
}

pub fn generate_code() -> String {
    // Rejection sampling keeps every code equally likely.
    let limit = u32::MAX - u32::MAX % CODE_SPACE;
    let value = loop {
        let candidate = OsRng.next_u32();
        if candidate < limit {
            break candidate % CODE_SPACE;
        }
    };
    format!("{:0width$}", value, width = CODE_LENGTH)
}

pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generated_codes_are_four_ascii_digits() {
        for _ in 0..1000 {
            let code = generate_code();
            assert!(is_valid_code(&code), "bad code {code}");
        }
    }

    #[test]
    fn test_expiry_is_now_plus_ttl() {
        let now = Utc.with_ymd_and_hms(2024, 10, 20, 12, 0, 0).unwrap();
        let generated = GeneratedCode::generate(now, Duration::minutes(1));
        assert_eq!(
            generated.expires_at,
            Utc.with_ymd_and_hms(2024, 10, 20, 12, 1, 0).unwrap()
        );
    }

    #[test]
    fn test_assign_to_keeps_code_and_expiry() {
        let now = Utc::now();
        let generated = GeneratedCode::generate(now, Duration::seconds(60));
        let code = generated.code.clone();
        let new = generated.assign_to(7);
        assert_eq!(new.user_id, 7);
        assert_eq!(new.code, code);
        assert_eq!(new.expires_at, now + Duration::seconds(60));
    }

    #[test]
    fn test_is_valid_code() {
        assert!(is_valid_code("0000"));
        assert!(!is_valid_code("000"));
        assert!(!is_valid_code("00000"));
        assert!(!is_valid_code("12a4"));
        assert!(!is_valid_code("١٢٣٤"));
    }
}
