use super::error::{self, Error, ErrorResp};
use super::{activity, login, otp, set_password, signup};
use crate::Session;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

/// Client for the auth and activity API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Client {
    /// The server to connect to. Should only be the protocol and domain, e.g.
    /// `https://auth.your-domain.com`.
    pub server: String,

    /// Bearer token for calls that need a session. Set this from a `Session`
    /// after logging in.
    pub auth: Option<String>,
}

impl Client {
    /// Construct a new client
    pub fn new(server: String) -> Self {
        Self { server, auth: None }
    }

    /// Use the access token from a session for authenticated calls.
    #[must_use]
    pub fn with_session(mut self, session: &Session) -> Self {
        self.auth = Some(session.access_token.clone());
        self
    }

    fn url(&self, path: &str) -> error::Result<Url> {
        Ok(Url::parse(&self.server)?.join(path)?)
    }

    /// Log into the server.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`.
    pub async fn login(
        &self,
        client: &reqwest::Client,
        req: &login::Req,
    ) -> error::Result<login::Resp> {
        let url = self.url(login::PATH)?;

        Self::handle_response(client.post(url).json(req)).await
    }

    /// Create a new account. The server sends an OTP to the new account's
    /// email address.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`.
    pub async fn signup(&self, client: &reqwest::Client, req: &signup::Req) -> error::Result<()> {
        let url = self.url(signup::PATH)?;

        Self::handle_ack(client.post(url).json(req)).await
    }

    /// Ask for an OTP to be sent to an email address or phone number.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`.
    pub async fn request_otp(
        &self,
        client: &reqwest::Client,
        req: &otp::RequestReq,
    ) -> error::Result<()> {
        let url = self.url(otp::REQUEST_PATH)?;

        Self::handle_ack(client.post(url).json(req)).await
    }

    /// Check an OTP sent to an email address or phone number.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`.
    pub async fn verify_otp(
        &self,
        client: &reqwest::Client,
        req: &otp::VerifyReq,
    ) -> error::Result<()> {
        let url = self.url(otp::VERIFY_PATH)?;

        Self::handle_ack(client.post(url).json(req)).await
    }

    /// Ask for a new OTP for the email address used at signup.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`.
    pub async fn request_email_otp(
        &self,
        client: &reqwest::Client,
        req: &otp::EmailRequestReq,
    ) -> error::Result<()> {
        let url = self.url(otp::EMAIL_REQUEST_PATH)?;

        Self::handle_ack(client.post(url).json(req)).await
    }

    /// Check an OTP sent to the email address used at signup.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`.
    pub async fn verify_email_otp(
        &self,
        client: &reqwest::Client,
        req: &otp::EmailVerifyReq,
    ) -> error::Result<()> {
        let url = self.url(otp::VERIFY_PATH)?;

        Self::handle_ack(client.post(url).json(req)).await
    }

    /// Set the password for a verified account.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`.
    pub async fn set_password(
        &self,
        client: &reqwest::Client,
        req: &set_password::Req,
    ) -> error::Result<()> {
        let url = self.url(set_password::PATH)?;

        Self::handle_ack(client.post(url).json(req)).await
    }

    /// Record an activity entry for the logged-in user.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`, plus `Error::Unauthorized` if
    /// we have no session.
    pub async fn create_activity(
        &self,
        client: &reqwest::Client,
        req: &activity::CreateReq,
    ) -> error::Result<()> {
        let url = self.url(activity::PATH)?;
        let builder = self.authenticated(|jwt| client.post(url).bearer_auth(jwt).json(req))?;

        Self::handle_ack(builder).await
    }

    /// Get the activity entries recorded for the logged-in user.
    ///
    /// ## Errors
    ///
    /// Errors are the same as `handle_response`, plus `Error::Unauthorized` if
    /// we have no session.
    pub async fn list_activity(
        &self,
        client: &reqwest::Client,
    ) -> error::Result<activity::ListResp> {
        let url = self.url(activity::PATH)?;
        let builder = self.authenticated(|jwt| client.get(url).bearer_auth(jwt))?;

        Self::handle_response(builder).await
    }

    fn authenticated<CB>(&self, cb: CB) -> error::Result<reqwest::RequestBuilder>
    where
        CB: FnOnce(&str) -> reqwest::RequestBuilder,
    {
        match &self.auth {
            Some(auth) => Ok(cb(auth)),
            None => Err(Error::Unauthorized),
        }
    }

    /// Convert an HTTP response into a result, interpreting errors in a
    /// standard way.
    ///
    /// ## Errors
    ///
    /// - `Ok(..)` if the server returned a success (2xx)
    /// - `Error::Client` if the server returned a client error (4xx)
    /// - `Error::Server` if the server returned a server error (5xx)
    /// - `Error::Unexpected` if the server returned something else (the server is
    ///   not supposed to issue redirects or informational responses.)
    async fn handle_response<T>(req: reqwest::RequestBuilder) -> error::Result<T>
    where
        T: DeserializeOwned,
    {
        let resp = Self::check_status(req).await?;

        Ok(resp.json().await?)
    }

    /// Like `handle_response`, but for endpoints where we don't use the body.
    /// Some of these return nothing at all, so we don't try to parse it.
    async fn handle_ack(req: reqwest::RequestBuilder) -> error::Result<()> {
        let resp = Self::check_status(req).await?;

        tracing::trace!(status = %resp.status(), "request acknowledged");

        Ok(())
    }

    async fn check_status(req: reqwest::RequestBuilder) -> error::Result<reqwest::Response> {
        let resp = req.send().await?;

        let status = resp.status();

        if status.is_success() {
            Ok(resp)
        } else if status.is_client_error() {
            let message = resp
                .json::<ErrorResp>()
                .await
                .ok()
                .and_then(|err| err.message)
                .unwrap_or_else(|| status.to_string());

            Err(Error::Client(message))
        } else if status.is_server_error() {
            Err(Error::Server)
        } else {
            Err(Error::Unexpected(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::Contact;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn login_req() -> login::Req {
        login::Req {
            email: "a@b.com".to_string(),
            password: "x".to_string(),
        }
    }

    #[tokio::test]
    async fn login_returns_tokens() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "email": "a@b.com", "password": "x" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "t1",
                "refreshToken": "t2",
                "user": { "id": 1 },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = Client::new(server.uri())
            .login(&reqwest::Client::new(), &login_req())
            .await
            .unwrap();

        assert_eq!(resp.access_token, "t1");
        assert_eq!(resp.refresh_token, "t2");
        assert_eq!(resp.user, json!({ "id": 1 }));
    }

    #[tokio::test]
    async fn client_errors_carry_the_server_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "bad password" })),
            )
            .mount(&server)
            .await;

        let err = Client::new(server.uri())
            .login(&reqwest::Client::new(), &login_req())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Client(ref message) if message == "bad password"));
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn client_errors_without_a_body_use_the_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/set-password"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = Client::new(server.uri())
            .set_password(
                &reqwest::Client::new(),
                &set_password::Req {
                    email: "a@b.com".to_string(),
                    password: "hunter2".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Client(ref message) if message.contains("404")));
    }

    #[tokio::test]
    async fn server_errors_are_not_rejections() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/signup/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = Client::new(server.uri())
            .signup(
                &reqwest::Client::new(),
                &signup::Req::from(&crate::SignupForm::default()),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Server));
        assert!(!err.is_rejection());
    }

    #[tokio::test]
    async fn empty_success_bodies_are_fine() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/request-otp/"))
            .and(body_json(json!({ "type": "PHONE", "phone": "5551234" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        Client::new(server.uri())
            .request_otp(
                &reqwest::Client::new(),
                &otp::RequestReq {
                    contact: Contact::Phone {
                        phone: "5551234".to_string(),
                    },
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn activity_calls_need_a_session() {
        let server = MockServer::start().await;

        let err = Client::new(server.uri())
            .list_activity(&reqwest::Client::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Unauthorized));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn activity_calls_send_the_access_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/activity"))
            .and(header("Authorization", "Bearer t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "activities": [{ "city": "Oslo", "ipAddress": "10.0.0.1" }],
            })))
            .mount(&server)
            .await;

        let session = Session {
            access_token: "t1".to_string(),
            refresh_token: "t2".to_string(),
            user: json!({ "id": 1 }),
        };

        let resp = Client::new(server.uri())
            .with_session(&session)
            .list_activity(&reqwest::Client::new())
            .await
            .unwrap();

        assert_eq!(resp.activities.len(), 1);
        assert_eq!(resp.activities[0].city.as_deref(), Some("Oslo"));
        assert_eq!(resp.activities[0].ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn bad_server_urls_are_errors() {
        let err = Client::new("not a url".to_string())
            .url(login::PATH)
            .unwrap_err();

        assert!(matches!(err, Error::UrlParse(_)));
    }
}
