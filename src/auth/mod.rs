mod api_key;
mod basic;

pub use api_key::{ApiKey, API_KEY_HEADER};
pub use basic::{hash_password, verify_password, BasicCredentials};
