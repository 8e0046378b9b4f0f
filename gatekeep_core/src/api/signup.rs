use crate::SignupForm;
use serde::{Deserialize, Serialize};

/// The request to create a new account.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Req {
    /// Email to use for contact, OTP delivery, and login.
    pub email: String,

    /// Display name for the account.
    pub user_name: String,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Phone number, as entered.
    pub phone_number: String,
}

impl From<&SignupForm> for Req {
    fn from(form: &SignupForm) -> Self {
        Self {
            email: form.email.clone(),
            user_name: form.composed_user_name(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            phone_number: form.phone_number.clone(),
        }
    }
}

/// Where the signup endpoint lives.
pub const PATH: &str = "/api/auth/signup/";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_composed_user_name() {
        let form = SignupForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            user_name: "ignored".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: "5551234".to_string(),
        };

        assert_eq!(
            serde_json::to_value(Req::from(&form)).unwrap(),
            json!({
                "email": "ada@example.com",
                "userName": "AdaLovelace",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "phoneNumber": "5551234",
            })
        );
    }
}
