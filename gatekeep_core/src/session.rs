use crate::{api::login, token};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything we know after a successful login. This is created from the
/// login response and lives until logout or until the access token expires.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// JWT to send as bearer auth
    pub access_token: String,

    /// Token to exchange for a new access token
    pub refresh_token: String,

    /// The user, as the server described them
    pub user: serde_json::Value,
}

impl Session {
    /// Is the access token still good at the given time?
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        token::is_valid_at(&self.access_token, now)
    }

    /// Is the access token still good right now?
    pub fn is_valid(&self) -> bool {
        token::is_token_valid(&self.access_token)
    }

    /// A name to greet the user with, if the server gave us one.
    pub fn display_name(&self) -> Option<&str> {
        ["userName", "name", "email"]
            .into_iter()
            .find_map(|key| self.user.get(key).and_then(serde_json::Value::as_str))
    }
}

impl From<login::Resp> for Session {
    fn from(resp: login::Resp) -> Self {
        Self {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
            user: resp.user,
        }
    }
}
