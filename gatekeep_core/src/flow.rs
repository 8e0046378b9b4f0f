use crate::Session;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Somewhere we can send a one-time password.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Contact {
    /// An email address
    Email {
        /// The address
        email: String,
    },

    /// A phone number that can receive texts
    Phone {
        /// The number, as entered
        phone: String,
    },
}

impl Contact {
    /// The address or number itself.
    pub fn address(&self) -> &str {
        match self {
            Self::Email { email } => email,
            Self::Phone { phone } => phone,
        }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.address())
    }
}

/// Where the user is between arriving and being logged in. Each step of
/// signup is only allowed from the state before it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Flow {
    /// Nobody is logged in and no signup is underway.
    #[default]
    Anonymous,

    /// We've asked the server to send a code.
    OtpRequested {
        /// Where the code went
        contact: Contact,
    },

    /// The user proved they own the contact. They can set a password now.
    OtpVerified {
        /// What was verified
        contact: Contact,
    },

    /// Signup is done. The user can log in with their new password.
    PasswordSet,

    /// Logged in.
    Authenticated(Session),
}

/// Things the user can try to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Log in with email and password
    LogIn,

    /// Create an account
    SignUp,

    /// Get a code sent
    RequestOtp,

    /// Get the outstanding code sent again
    ResendOtp,

    /// Check a code
    VerifyOtp,

    /// Choose a password after verifying
    SetPassword,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LogIn => "log in",
            Self::SignUp => "sign up",
            Self::RequestOtp => "request a code",
            Self::ResendOtp => "request a new code",
            Self::VerifyOtp => "verify a code",
            Self::SetPassword => "set a password",
        })
    }
}

/// A step was attempted from a state that doesn't allow it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("can't {step} while {state}")]
pub struct Error {
    /// What was attempted
    pub step: Step,

    /// Where we were, as shown to the user
    pub state: &'static str,
}

impl Flow {
    /// A short description of the state, for messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Anonymous => "logged out",
            Self::OtpRequested { .. } => "waiting for a code",
            Self::OtpVerified { .. } => "waiting for a password",
            Self::PasswordSet => "waiting to log in",
            Self::Authenticated(_) => "logged in",
        }
    }

    fn refuse<T>(&self, step: Step) -> Result<T, Error> {
        Err(Error {
            step,
            state: self.describe(),
        })
    }

    /// Check that `step` may start from here. For OTP and password steps,
    /// gives back the contact the step applies to.
    ///
    /// ## Errors
    ///
    /// If the step is out of order.
    pub fn allows(&self, step: Step) -> Result<Option<&Contact>, Error> {
        match (step, self) {
            (_, Self::Authenticated(_)) => self.refuse(step),
            (Step::LogIn | Step::SignUp | Step::RequestOtp, _) => Ok(None),
            (Step::ResendOtp | Step::VerifyOtp, Self::OtpRequested { contact })
            | (Step::SetPassword, Self::OtpVerified { contact }) => Ok(Some(contact)),
            (Step::ResendOtp | Step::VerifyOtp | Step::SetPassword, _) => self.refuse(step),
        }
    }

    /// A code was sent to `contact`.
    ///
    /// ## Errors
    ///
    /// If we're already logged in.
    pub fn otp_requested(&mut self, contact: Contact) -> Result<(), Error> {
        self.allows(Step::RequestOtp)?;
        *self = Self::OtpRequested { contact };
        Ok(())
    }

    /// The code we sent checked out.
    ///
    /// ## Errors
    ///
    /// If no code was outstanding.
    pub fn otp_verified(&mut self) -> Result<(), Error> {
        if let Self::OtpRequested { contact } = self {
            *self = Self::OtpVerified {
                contact: contact.clone(),
            };
            Ok(())
        } else {
            self.refuse(Step::VerifyOtp)
        }
    }

    /// The user chose a password.
    ///
    /// ## Errors
    ///
    /// If the contact wasn't verified first.
    pub fn password_set(&mut self) -> Result<(), Error> {
        self.allows(Step::SetPassword)?;
        *self = Self::PasswordSet;
        Ok(())
    }

    /// The user logged in.
    ///
    /// ## Errors
    ///
    /// If someone is already logged in.
    pub fn authenticated(&mut self, session: Session) -> Result<(), Error> {
        self.allows(Step::LogIn)?;
        *self = Self::Authenticated(session);
        Ok(())
    }

    /// Go back to the start, handing back the session if there was one.
    pub fn reset(&mut self) -> Option<Session> {
        match std::mem::take(self) {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// The current session, if logged in.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}
