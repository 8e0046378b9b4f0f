use serde::{Deserialize, Serialize};

/// Set the password for an account whose OTP has been verified.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Req {
    /// The email address the account was created with.
    pub email: String,

    /// Plaintext password to use for future logins.
    pub password: String,
}

/// Where the set-password endpoint lives.
pub const PATH: &str = "/api/auth/set-password";
