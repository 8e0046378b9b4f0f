use crate::api::{login, signup};
use crate::validation::{self, validate, Rule};
use serde::{Deserialize, Serialize};

/// How long the codes we send out are.
pub const OTP_LENGTH: usize = 6;

/// What the user has typed into the login form so far.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email address
    pub email: String,

    /// Plaintext password
    pub password: String,
}

impl LoginForm {
    /// Turn the form into a login request, if everything is filled in.
    ///
    /// ## Errors
    ///
    /// The first missing field.
    pub fn validate(&self) -> Result<login::Req, validation::Error> {
        validate(&[
            ("email", self.email.as_str(), &[Rule::Required]),
            ("password", self.password.as_str(), &[Rule::Required]),
        ])?;

        Ok(login::Req {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

/// What the user has typed into the signup form so far. The email address
/// carries through to OTP verification and setting a password.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Display name. The server derives this from the first and last names,
    /// so what's typed here is not sent.
    pub user_name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone_number: String,
}

impl SignupForm {
    /// The user name we send at signup.
    pub fn composed_user_name(&self) -> String {
        format!("{}{}", self.first_name, self.last_name)
    }

    /// Turn the form into a signup request, if everything is filled in.
    ///
    /// ## Errors
    ///
    /// The first field that is missing or malformed.
    pub fn validate(&self) -> Result<signup::Req, validation::Error> {
        validate(&[
            ("first name", self.first_name.as_str(), &[Rule::Required]),
            ("last name", self.last_name.as_str(), &[Rule::Required]),
            ("email", self.email.as_str(), &[Rule::Required, Rule::Email]),
            ("phone number", self.phone_number.as_str(), &[Rule::Required]),
        ])?;

        Ok(signup::Req::from(self))
    }
}

/// Check that an entered OTP is long enough to be worth sending.
///
/// ## Errors
///
/// If the code is missing or shorter than `OTP_LENGTH`.
pub fn check_otp(otp: &str) -> Result<(), validation::Error> {
    validate(&[("otp", otp, &[Rule::Required, Rule::MinLength(OTP_LENGTH)])])
}
