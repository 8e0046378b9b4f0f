use super::Action;
use crate::config::Config;
use crate::storage::{self, SessionFile};
use gatekeep_core::{
    api::{activity, geo, login, otp, set_password, signup, Client},
    ActivityEntry, Session,
};

/// Connections to external services that effect use. We keep these around to
/// have some level of connection sharing for the app as a whole.
pub struct EffectContext {
    /// an HTTP client with reqwest
    http: reqwest::Client,
}

impl EffectContext {
    /// Get a new `EffectContext`
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

/// Things that can happen as a result of user input. Side effects!
#[derive(Debug, PartialEq)]
pub enum Effect {
    /// Read the stored session from disk
    LoadSession,

    /// Write the session to disk
    SaveSession(Session),

    /// Remove the session from disk
    ClearSession,

    /// Log in to an existing account
    LogIn(Client, login::Req),

    /// Create a new account
    SignUp(Client, signup::Req),

    /// Send a code to an email address or phone number
    SendOtp(Client, otp::RequestReq),

    /// Check a code sent to an email address or phone number
    ValidateOtp(Client, otp::VerifyReq),

    /// Send a fresh code to the signup email address
    RequestEmailOtp(Client, otp::EmailRequestReq),

    /// Check a code sent to the signup email address
    VerifyEmailOtp(Client, otp::EmailVerifyReq),

    /// Set the password for a verified account
    SetPassword(Client, set_password::Req),

    /// Find out where the user is connecting from
    Locate,

    /// Record an activity entry. Failures are only logged.
    CreateActivityLog(Client, ActivityEntry),

    /// Get the user's activity entries
    FetchActivityLogs(Client),
}

impl Effect {
    /// Perform the side-effectful portions of this effect, returning the next
    /// `Action` the application needs to handle
    pub async fn run(self, conn: &EffectContext, config: &Config) -> Option<Action> {
        match self.run_inner(conn, config).await {
            Ok(action) => action,
            Err(problem) => {
                tracing::error!(?problem, "problem running effect");
                Some(Action::Problem(problem.to_string()))
            }
        }
    }

    /// The actual implementation of `run`, but with a `Result` wrapper to make
    /// it more ergonomic to write. Network calls report their results in the
    /// returned `Action` instead of failing here.
    async fn run_inner(
        self,
        conn: &EffectContext,
        config: &Config,
    ) -> Result<Option<Action>, storage::Error> {
        let session_file = SessionFile::in_dir(&config.data_dir());

        match self {
            Self::LoadSession => {
                tracing::debug!("loading session");

                Ok(Some(Action::LoadedSession(session_file.load().await?)))
            }

            Self::SaveSession(session) => {
                tracing::debug!("saving session");

                session_file.save(&session).await?;

                Ok(Some(Action::SavedSession))
            }

            Self::ClearSession => {
                tracing::debug!("clearing session");

                session_file.clear().await?;

                Ok(Some(Action::ClearedSession))
            }

            Self::LogIn(client, req) => {
                tracing::info!("logging in");

                Ok(Some(Action::LoggedIn(client.login(&conn.http, &req).await)))
            }

            Self::SignUp(client, req) => {
                tracing::info!("signing up");

                Ok(Some(Action::SignedUp(client.signup(&conn.http, &req).await)))
            }

            Self::SendOtp(client, req) => {
                tracing::info!("requesting otp");

                let result = client.request_otp(&conn.http, &req).await;

                Ok(Some(Action::OtpSent(req.contact, result)))
            }

            Self::ValidateOtp(client, req) => {
                tracing::info!("validating otp");

                Ok(Some(Action::OtpValidated(
                    client.verify_otp(&conn.http, &req).await,
                )))
            }

            Self::RequestEmailOtp(client, req) => {
                tracing::info!("requesting a new email otp");

                Ok(Some(Action::OtpResent(
                    client.request_email_otp(&conn.http, &req).await,
                )))
            }

            Self::VerifyEmailOtp(client, req) => {
                tracing::info!("verifying email otp");

                Ok(Some(Action::OtpVerified(
                    client.verify_email_otp(&conn.http, &req).await,
                )))
            }

            Self::SetPassword(client, req) => {
                tracing::info!("setting password");

                Ok(Some(Action::PasswordSet(
                    client.set_password(&conn.http, &req).await,
                )))
            }

            Self::Locate => {
                tracing::info!("looking up ip and location");

                let located =
                    geo::lookup(&conn.http, &config.ipinfo_url, config.ipinfo_token.as_deref())
                        .await;

                match located {
                    Ok(resp) => Ok(Some(Action::Located(Some(resp.into())))),
                    Err(err) => {
                        tracing::warn!(?err, "failed to get ip/location");
                        Ok(Some(Action::Located(None)))
                    }
                }
            }

            Self::CreateActivityLog(client, entry) => {
                tracing::info!("creating activity log");

                let req = activity::CreateReq { activity: entry };
                if let Err(err) = client.create_activity(&conn.http, &req).await {
                    tracing::warn!(?err, "failed to create activity log");
                }

                Ok(Some(Action::ActivityLogCreated))
            }

            Self::FetchActivityLogs(client) => {
                tracing::info!("fetching activity logs");

                Ok(Some(Action::GotActivityLogs(
                    client.list_activity(&conn.http).await,
                )))
            }
        }
    }
}
