//! Common code for gatekeep clients: the backend API, sessions, and the
//! signup flow.

/// Talk to the auth and activity backend.
pub mod api;

/// Network and location context recorded for auditing.
pub mod activity;
pub use activity::ActivityEntry;

/// Where the user is in the signup/login sequence.
pub mod flow;
pub use flow::Flow;

/// Form state for login and signup.
pub mod forms;
pub use forms::{LoginForm, SignupForm};

/// An authenticated session and its tokens.
pub mod session;
pub use session::Session;

/// Client-side token expiry checks.
pub mod token;

/// Rules for checking form input before it goes over the wire.
pub mod validation;
