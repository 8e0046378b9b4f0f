use crate::flow::Contact;
use serde::{Deserialize, Serialize};

/// Ask for an OTP to be sent to an email address or phone number.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RequestReq {
    /// Where to send the code.
    #[serde(flatten)]
    pub contact: Contact,
}

/// Check an OTP sent to an email address or phone number.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VerifyReq {
    /// The code the user entered.
    pub otp: String,

    /// Where the code was sent.
    #[serde(flatten)]
    pub contact: Contact,
}

/// Ask for a fresh OTP for the email address used at signup.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EmailRequestReq {
    /// The email address used at signup.
    pub email: String,
}

/// Check an OTP sent to the email address used at signup.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EmailVerifyReq {
    /// The email address used at signup.
    pub email: String,

    /// The code the user entered.
    pub otp: String,
}

/// Where the contact-aware OTP request endpoint lives.
pub const REQUEST_PATH: &str = "/api/auth/request-otp/";

/// Where the email-only OTP request endpoint lives.
pub const EMAIL_REQUEST_PATH: &str = "/api/auth/request-otp";

/// Where the OTP verification endpoint lives. Both request shapes go here.
pub const VERIFY_PATH: &str = "/api/auth/verify-otp";
