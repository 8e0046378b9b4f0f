use serde::{Deserialize, Serialize};

/// The request to log into the server.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Req {
    /// Email to use for contact and login.
    pub email: String,

    /// Plaintext password to use for login.
    pub password: String,
}

/// Result of logging in.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resp {
    /// JWT to use for future requests.
    pub access_token: String,

    /// Token to exchange for a new access token.
    pub refresh_token: String,

    /// Whatever the server tells us about the user. We don't look inside.
    pub user: serde_json::Value,
}

/// Where the login endpoint lives.
pub const PATH: &str = "/api/auth/login";
