/// Things that can go wrong in the API
pub mod error;
pub use error::Error;

/// The HTTP client for the backend
pub mod client;
pub use client::Client;

/// Record and list activity entries
pub mod activity;

/// Look up the client's IP address and location
pub mod geo;

/// Log in with email and password
pub mod login;

/// Request and verify one-time passwords
pub mod otp;

/// Set a password after verifying an OTP
pub mod set_password;

/// Create a new account
pub mod signup;
