use super::ui::{Notice, Route, Ui};
use super::Effect;
use gatekeep_core::{
    api::{error, login, otp, set_password, Client},
    flow::{self, Contact, Step},
    forms, Flow, LoginForm, Session, SignupForm,
};

/// Which half of the auth view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Login,
    Signup,
}

/// Form state and progress for logging in and signing up.
///
/// Every operation follows the same shape: check the flow allows it, validate
/// the input, set `is_loading`, and hand back the effect that makes the call.
/// A second method takes the call's result, clears `is_loading`, and reacts.
/// Those return whether the step worked.
#[derive(Debug, Default)]
pub struct AuthStore {
    pub current_tab: Tab,
    pub login_form: LoginForm,
    pub signup_form: SignupForm,

    /// The code the user has typed so far
    pub otp: String,

    /// The password being chosen after verification
    pub new_password: String,

    /// Where codes are being sent with the contact-aware endpoints. `None`
    /// means the code went to the signup email by the email-only endpoints.
    pub otp_channel: Option<Contact>,

    pub flow: Flow,
    pub is_loading: bool,
    pub is_error: bool,
}

impl AuthStore {
    pub fn toggle_tab(&mut self) {
        self.current_tab = match self.current_tab {
            Tab::Login => Tab::Signup,
            Tab::Signup => Tab::Login,
        };
    }

    fn allowed<'flow>(
        flow: &'flow Flow,
        step: Step,
        ui: &mut Ui,
    ) -> Option<Option<&'flow Contact>> {
        match flow.allows(step) {
            Ok(contact) => Some(contact),
            Err(err) => {
                tracing::debug!(?err, "refusing out-of-order step");
                ui.notify(Notice::error(refusal(flow, &err)));
                None
            }
        }
    }

    pub fn handle_login(&mut self, client: &Client, ui: &mut Ui) -> Vec<Effect> {
        if Self::allowed(&self.flow, Step::LogIn, ui).is_none() {
            return vec![];
        }

        match self.login_form.validate() {
            Ok(req) => {
                self.is_loading = true;
                vec![Effect::LogIn(client.clone(), req)]
            }
            Err(err) => {
                ui.notify(Notice::error(err.to_string()));
                vec![]
            }
        }
    }

    pub fn logged_in(&mut self, result: error::Result<login::Resp>, ui: &mut Ui) -> Vec<Effect> {
        self.is_loading = false;

        let resp = match result {
            Ok(resp) => resp,
            Err(err) => {
                tracing::info!(?err, "login failed");
                ui.notify(Notice::error("Invalid email or password"));
                return vec![];
            }
        };

        let session = Session::from(resp);
        if let Err(err) = self.flow.authenticated(session.clone()) {
            tracing::warn!(?err, "login finished after the flow moved on");
            return vec![];
        }

        self.login_form.password.clear();
        ui.notify(Notice::success("Login successful"));
        ui.navigate(Route::Dashboard);

        vec![Effect::SaveSession(session), self.get_user_ip_and_location()]
    }

    /// Find out where the user is logging in from, so it can be recorded.
    /// Failures are swallowed by the effect.
    #[expect(clippy::unused_self)]
    pub fn get_user_ip_and_location(&self) -> Effect {
        Effect::Locate
    }

    /// A session was read from disk at startup. Keep it if its token is still
    /// good, otherwise throw it away.
    pub fn session_loaded(&mut self, session: Option<Session>, ui: &mut Ui) -> Vec<Effect> {
        match session {
            Some(session) if session.is_valid() => {
                if let Err(err) = self.flow.authenticated(session) {
                    tracing::warn!(?err, "already logged in");
                    return vec![];
                }
                ui.navigate(Route::Dashboard);
                vec![]
            }
            Some(_) => {
                tracing::info!("stored session has expired");
                ui.notify(Notice::info("Your session has expired. Please log in again."));
                vec![Effect::ClearSession]
            }
            None => vec![],
        }
    }

    /// Drop the session and go back to the login view.
    pub fn logout(&mut self, ui: &mut Ui) -> Vec<Effect> {
        if self.flow.reset().is_none() {
            return vec![];
        }

        self.current_tab = Tab::Login;
        ui.navigate(Route::Auth);

        vec![Effect::ClearSession]
    }

    /// Log out if the session's token has run out.
    pub fn check_expiry(&mut self, ui: &mut Ui) -> Vec<Effect> {
        let expired = self
            .flow
            .session()
            .is_some_and(|session| !session.is_valid());
        if !expired {
            return vec![];
        }

        let effects = self.logout(ui);
        ui.notify(Notice::info("Your session has expired. Please log in again."));
        effects
    }

    pub fn handle_new_sign_up(&mut self, client: &Client, ui: &mut Ui) -> Vec<Effect> {
        if Self::allowed(&self.flow, Step::SignUp, ui).is_none() {
            return vec![];
        }

        match self.signup_form.validate() {
            Ok(req) => {
                self.is_loading = true;
                vec![Effect::SignUp(client.clone(), req)]
            }
            Err(err) => {
                ui.notify(Notice::error(err.to_string()));
                vec![]
            }
        }
    }

    /// The server sends a code to the new account's email when signup works.
    pub fn signed_up(&mut self, result: error::Result<()>, ui: &mut Ui) -> bool {
        self.is_loading = false;

        if let Err(err) = result {
            tracing::info!(?err, "signup failed");
            ui.notify(Notice::error("Unable to Sign Up"));
            return false;
        }

        let contact = Contact::Email {
            email: self.signup_form.email.clone(),
        };
        ui.notify(Notice::success(format!("Account created. Check {contact} for a code.")));

        self.otp_sent_to(contact, None, ui)
    }

    fn otp_sent_to(&mut self, contact: Contact, channel: Option<Contact>, ui: &mut Ui) -> bool {
        if let Err(err) = self.flow.otp_requested(contact) {
            tracing::warn!(?err, "code sent after the flow moved on");
            return false;
        }

        self.otp.clear();
        self.is_error = false;
        self.otp_channel = channel;
        ui.navigate(Route::VerifyOtp);
        true
    }

    pub fn verify_otp(&mut self, otp: &str, client: &Client, ui: &mut Ui) -> Vec<Effect> {
        if Self::allowed(&self.flow, Step::VerifyOtp, ui).is_none() {
            return vec![];
        }

        if let Err(err) = forms::check_otp(otp) {
            ui.notify(Notice::error(err.to_string()));
            return vec![];
        }

        self.is_loading = true;
        vec![Effect::VerifyEmailOtp(
            client.clone(),
            otp::EmailVerifyReq {
                email: self.signup_form.email.clone(),
                otp: otp.to_string(),
            },
        )]
    }

    pub fn otp_verified(&mut self, result: error::Result<()>, ui: &mut Ui) -> bool {
        self.is_loading = false;

        if let Err(err) = result {
            tracing::info!(?err, "otp verification failed");
            self.is_error = true;
            ui.notify(Notice::error("OTP Verification Failed"));
            return false;
        }

        self.otp_confirmed(ui)
    }

    pub fn request_new_otp(&mut self, client: &Client, ui: &mut Ui) -> Vec<Effect> {
        if Self::allowed(&self.flow, Step::ResendOtp, ui).is_none() {
            return vec![];
        }

        self.is_loading = true;
        vec![Effect::RequestEmailOtp(
            client.clone(),
            otp::EmailRequestReq {
                email: self.signup_form.email.clone(),
            },
        )]
    }

    pub fn otp_resent(&mut self, result: error::Result<()>, ui: &mut Ui) -> bool {
        self.is_loading = false;
        self.is_error = false;

        match result {
            Ok(()) => {
                ui.notify(Notice::success("OTP send to registered email address"));
                true
            }
            Err(err) => {
                tracing::info!(?err, "requesting a new otp failed");
                self.otp.clear();
                self.flow.reset();
                self.current_tab = Tab::Login;
                ui.notify(Notice::error("Unable to send OTP"));
                ui.navigate(Route::Auth);
                false
            }
        }
    }

    pub fn send_otp(&mut self, contact: Contact, client: &Client, ui: &mut Ui) -> Vec<Effect> {
        if Self::allowed(&self.flow, Step::RequestOtp, ui).is_none() {
            return vec![];
        }

        self.is_loading = true;
        vec![Effect::SendOtp(client.clone(), otp::RequestReq { contact })]
    }

    pub fn otp_sent(&mut self, contact: Contact, result: error::Result<()>, ui: &mut Ui) -> bool {
        self.is_loading = false;

        if let Err(err) = result {
            tracing::info!(?err, "sending otp failed");
            ui.notify(Notice::error("Failed to send OTP. Please try again."));
            return false;
        }

        ui.notify(Notice::success(format!("OTP sent successfully to {contact}")));

        self.otp_sent_to(contact.clone(), Some(contact), ui)
    }

    pub fn validate_otp(
        &mut self,
        otp: &str,
        contact: Contact,
        client: &Client,
        ui: &mut Ui,
    ) -> Vec<Effect> {
        if Self::allowed(&self.flow, Step::VerifyOtp, ui).is_none() {
            return vec![];
        }

        self.is_loading = true;
        vec![Effect::ValidateOtp(
            client.clone(),
            otp::VerifyReq {
                otp: otp.to_string(),
                contact,
            },
        )]
    }

    pub fn otp_validated(&mut self, result: error::Result<()>, ui: &mut Ui) -> bool {
        self.is_loading = false;

        if let Err(err) = result {
            tracing::info!(?err, "otp validation failed");
            ui.notify(Notice::error("OTP verification failed. Please try again."));
            return false;
        }

        ui.notify(Notice::success("OTP verified successfully"));

        self.otp_confirmed(ui)
    }

    fn otp_confirmed(&mut self, ui: &mut Ui) -> bool {
        if let Err(err) = self.flow.otp_verified() {
            tracing::warn!(?err, "otp confirmed after the flow moved on");
            return false;
        }

        self.is_error = false;
        self.otp.clear();
        ui.navigate(Route::SetPassword);
        true
    }

    pub fn set_new_password(&mut self, password: &str, client: &Client, ui: &mut Ui) -> Vec<Effect> {
        if Self::allowed(&self.flow, Step::SetPassword, ui).is_none() {
            return vec![];
        }

        if password.is_empty() {
            ui.notify(Notice::error("password is required"));
            return vec![];
        }

        self.is_loading = true;
        vec![Effect::SetPassword(
            client.clone(),
            set_password::Req {
                email: self.signup_form.email.clone(),
                password: password.to_string(),
            },
        )]
    }

    pub fn password_set(&mut self, result: error::Result<()>, ui: &mut Ui) -> bool {
        self.is_loading = false;

        if let Err(err) = result {
            tracing::info!(?err, "setting password failed");
            ui.notify(Notice::error("Unable to set Password"));
            return false;
        }

        if let Err(err) = self.flow.password_set() {
            tracing::warn!(?err, "password set after the flow moved on");
            return false;
        }

        self.new_password.clear();
        self.current_tab = Tab::Login;
        self.login_form.email.clone_from(&self.signup_form.email);
        ui.notify(Notice::success("Password set. Log in to continue."));
        ui.navigate(Route::Auth);
        true
    }
}

/// What to tell the user when they try something out of order.
fn refusal(flow: &Flow, err: &flow::Error) -> String {
    if flow.session().is_some() {
        return format!("Can't {}: already logged in", err.step);
    }

    match err.step {
        Step::VerifyOtp | Step::ResendOtp => "Request a code first".to_string(),
        Step::SetPassword => "Verify your code before setting a password".to_string(),
        Step::LogIn | Step::SignUp | Step::RequestOtp => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ui::Level;
    use gatekeep_core::api::Error;
    use serde_json::json;

    fn client() -> Client {
        Client::new("http://localhost:3000".to_string())
    }

    fn email() -> Contact {
        Contact::Email {
            email: "a@b.com".to_string(),
        }
    }

    fn login_resp() -> login::Resp {
        login::Resp {
            access_token: "t1".to_string(),
            refresh_token: "t2".to_string(),
            user: json!({ "id": 1 }),
        }
    }

    fn notice(ui: &Ui) -> (Level, &str) {
        let notice = ui.notice.as_ref().expect("a notice");
        (notice.level, notice.message.as_str())
    }

    fn awaiting_code() -> AuthStore {
        let mut store = AuthStore::default();
        store.signup_form.email = "a@b.com".to_string();
        store.flow.otp_requested(email()).unwrap();
        store
    }

    #[test]
    fn login_with_missing_fields_makes_no_request() {
        for (email, password) in [("", "x"), ("a@b.com", ""), ("", "")] {
            let mut store = AuthStore::default();
            let mut ui = Ui::new();
            store.login_form = LoginForm {
                email: email.to_string(),
                password: password.to_string(),
            };

            let effects = store.handle_login(&client(), &mut ui);

            assert_eq!(effects, vec![]);
            assert!(!store.is_loading);
            assert_eq!(notice(&ui).0, Level::Error);
            assert!(notice(&ui).1.ends_with("is required"));
        }
    }

    #[test]
    fn login_with_both_fields_makes_a_request() {
        let mut store = AuthStore::default();
        let mut ui = Ui::new();
        store.login_form = LoginForm {
            email: "a@b.com".to_string(),
            password: "x".to_string(),
        };

        let effects = store.handle_login(&client(), &mut ui);

        assert!(store.is_loading);
        assert_eq!(
            effects,
            vec![Effect::LogIn(
                client(),
                login::Req {
                    email: "a@b.com".to_string(),
                    password: "x".to_string(),
                }
            )]
        );
    }

    #[test]
    fn successful_login_saves_the_session_once() {
        let mut store = AuthStore {
            is_loading: true,
            ..AuthStore::default()
        };
        let mut ui = Ui::new();

        let effects = store.logged_in(Ok(login_resp()), &mut ui);

        let session = Session::from(login_resp());
        assert_eq!(
            effects,
            vec![Effect::SaveSession(session.clone()), Effect::Locate]
        );
        assert_eq!(store.flow.session(), Some(&session));
        assert!(!store.is_loading);
        assert_eq!(ui.route, Route::Dashboard);
        assert_eq!(notice(&ui), (Level::Success, "Login successful"));
    }

    #[test]
    fn failed_login_stores_nothing() {
        let mut store = AuthStore {
            is_loading: true,
            ..AuthStore::default()
        };
        let mut ui = Ui::new();

        let effects = store.logged_in(Err(Error::Client("nope".to_string())), &mut ui);

        assert_eq!(effects, vec![]);
        assert!(!store.is_loading);
        assert_eq!(store.flow, Flow::Anonymous);
        assert_eq!(ui.route, Route::Auth);
        assert_eq!(notice(&ui), (Level::Error, "Invalid email or password"));
    }

    #[test]
    fn short_otp_makes_no_request() {
        let mut store = awaiting_code();
        let mut ui = Ui::new();

        let effects = store.verify_otp("12345", &client(), &mut ui);

        assert_eq!(effects, vec![]);
        assert!(!store.is_loading);
        assert_eq!(notice(&ui), (Level::Error, "otp must be at least 6 characters"));
    }

    #[test]
    fn six_digit_otp_is_verified_against_the_signup_email() {
        let mut store = awaiting_code();
        let mut ui = Ui::new();

        let effects = store.verify_otp("123456", &client(), &mut ui);

        assert!(store.is_loading);
        assert_eq!(
            effects,
            vec![Effect::VerifyEmailOtp(
                client(),
                otp::EmailVerifyReq {
                    email: "a@b.com".to_string(),
                    otp: "123456".to_string(),
                }
            )]
        );
    }

    #[test]
    fn verified_otp_moves_to_set_password() {
        let mut store = awaiting_code();
        let mut ui = Ui::new();

        assert!(store.otp_verified(Ok(()), &mut ui));

        assert_eq!(ui.route, Route::SetPassword);
        assert_eq!(store.flow, Flow::OtpVerified { contact: email() });
    }

    #[test]
    fn failed_otp_sets_the_error_flag() {
        let mut store = awaiting_code();
        let mut ui = Ui::new();

        assert!(!store.otp_verified(Err(Error::Server), &mut ui));

        assert!(store.is_error);
        assert!(!store.is_loading);
        assert_eq!(notice(&ui), (Level::Error, "OTP Verification Failed"));
        assert_eq!(store.flow, Flow::OtpRequested { contact: email() });
    }

    #[test]
    fn setting_a_password_before_verifying_is_refused() {
        let mut store = awaiting_code();
        let mut ui = Ui::new();

        let effects = store.set_new_password("hunter2", &client(), &mut ui);

        assert_eq!(effects, vec![]);
        assert_eq!(
            notice(&ui),
            (Level::Error, "Verify your code before setting a password")
        );
    }

    #[test]
    fn setting_a_password_returns_to_login() {
        let mut store = awaiting_code();
        let mut ui = Ui::new();
        store.otp_verified(Ok(()), &mut ui);
        store.current_tab = Tab::Signup;

        let effects = store.set_new_password("hunter2", &client(), &mut ui);
        assert_eq!(
            effects,
            vec![Effect::SetPassword(
                client(),
                set_password::Req {
                    email: "a@b.com".to_string(),
                    password: "hunter2".to_string(),
                }
            )]
        );

        assert!(store.password_set(Ok(()), &mut ui));
        assert_eq!(store.current_tab, Tab::Login);
        assert_eq!(ui.route, Route::Auth);
        assert_eq!(store.flow, Flow::PasswordSet);
        assert_eq!(store.login_form.email, "a@b.com");
    }

    #[test]
    fn failed_resend_starts_over() {
        let mut store = awaiting_code();
        let mut ui = Ui::new();
        store.otp = "123".to_string();
        store.is_error = true;

        let effects = store.request_new_otp(&client(), &mut ui);
        assert_eq!(
            effects,
            vec![Effect::RequestEmailOtp(
                client(),
                otp::EmailRequestReq {
                    email: "a@b.com".to_string(),
                }
            )]
        );

        assert!(!store.otp_resent(Err(Error::Server), &mut ui));
        assert_eq!(store.otp, "");
        assert!(!store.is_error);
        assert_eq!(store.flow, Flow::Anonymous);
        assert_eq!(ui.route, Route::Auth);
        assert_eq!(notice(&ui), (Level::Error, "Unable to send OTP"));
    }

    #[test]
    fn sending_to_a_phone_switches_the_channel() {
        let mut store = AuthStore::default();
        let mut ui = Ui::new();
        let phone = Contact::Phone {
            phone: "5551234".to_string(),
        };

        let effects = store.send_otp(phone.clone(), &client(), &mut ui);
        assert_eq!(
            effects,
            vec![Effect::SendOtp(
                client(),
                otp::RequestReq {
                    contact: phone.clone()
                }
            )]
        );

        assert!(store.otp_sent(phone.clone(), Ok(()), &mut ui));
        assert_eq!(store.otp_channel, Some(phone.clone()));
        assert_eq!(ui.route, Route::VerifyOtp);
        assert_eq!(
            notice(&ui),
            (Level::Success, "OTP sent successfully to 5551234")
        );

        let effects = store.validate_otp("999999", phone.clone(), &client(), &mut ui);
        assert_eq!(
            effects,
            vec![Effect::ValidateOtp(
                client(),
                otp::VerifyReq {
                    otp: "999999".to_string(),
                    contact: phone.clone(),
                }
            )]
        );

        assert!(store.otp_validated(Ok(()), &mut ui));
        assert_eq!(store.flow, Flow::OtpVerified { contact: phone });
    }

    #[test]
    fn failed_send_stays_put() {
        let mut store = AuthStore::default();
        let mut ui = Ui::new();

        assert!(!store.otp_sent(email(), Err(Error::Server), &mut ui));

        assert_eq!(store.flow, Flow::Anonymous);
        assert_eq!(ui.route, Route::Auth);
        assert_eq!(
            notice(&ui),
            (Level::Error, "Failed to send OTP. Please try again.")
        );
    }

    #[test]
    fn signup_validates_then_requests() {
        let mut store = AuthStore::default();
        let mut ui = Ui::new();

        assert_eq!(store.handle_new_sign_up(&client(), &mut ui), vec![]);
        assert_eq!(notice(&ui), (Level::Error, "first name is required"));

        store.signup_form = SignupForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            user_name: String::new(),
            email: "a@b.com".to_string(),
            phone_number: "5551234".to_string(),
        };

        let effects = store.handle_new_sign_up(&client(), &mut ui);
        assert!(matches!(effects.as_slice(), [Effect::SignUp(_, req)] if req.user_name == "AdaLovelace"));

        assert!(store.signed_up(Ok(()), &mut ui));
        assert_eq!(store.flow, Flow::OtpRequested { contact: email() });
        assert_eq!(store.otp_channel, None);
        assert_eq!(ui.route, Route::VerifyOtp);
    }

    #[test]
    fn failed_signup_reports() {
        let mut store = AuthStore {
            is_loading: true,
            ..AuthStore::default()
        };
        let mut ui = Ui::new();

        assert!(!store.signed_up(Err(Error::Server), &mut ui));
        assert!(!store.is_loading);
        assert_eq!(notice(&ui), (Level::Error, "Unable to Sign Up"));
    }

    #[test]
    fn expired_stored_sessions_are_cleared() {
        let mut store = AuthStore::default();
        let mut ui = Ui::new();
        let session = Session::from(login_resp());

        let effects = store.session_loaded(Some(session), &mut ui);

        assert_eq!(effects, vec![Effect::ClearSession]);
        assert_eq!(store.flow, Flow::Anonymous);
        assert_eq!(ui.route, Route::Auth);
    }

    #[test]
    fn logout_clears_the_session() {
        let mut store = AuthStore::default();
        let mut ui = Ui::new();
        store.logged_in(Ok(login_resp()), &mut ui);

        assert_eq!(store.logout(&mut ui), vec![Effect::ClearSession]);
        assert_eq!(store.flow, Flow::Anonymous);
        assert_eq!(ui.route, Route::Auth);

        assert_eq!(store.logout(&mut ui), vec![]);
    }

    #[test]
    fn logging_in_twice_is_refused() {
        let mut store = AuthStore::default();
        let mut ui = Ui::new();
        store.logged_in(Ok(login_resp()), &mut ui);
        store.login_form = LoginForm {
            email: "a@b.com".to_string(),
            password: "x".to_string(),
        };

        assert_eq!(store.handle_login(&client(), &mut ui), vec![]);
        assert_eq!(
            notice(&ui),
            (Level::Error, "Can't log in: already logged in")
        );
    }

    #[test]
    fn code_steps_while_logged_in_say_so() {
        let mut store = AuthStore::default();
        let mut ui = Ui::new();
        store.logged_in(Ok(login_resp()), &mut ui);

        assert_eq!(store.request_new_otp(&client(), &mut ui), vec![]);
        assert_eq!(
            notice(&ui),
            (Level::Error, "Can't request a new code: already logged in")
        );

        assert_eq!(store.verify_otp("123456", &client(), &mut ui), vec![]);
        assert_eq!(
            notice(&ui),
            (Level::Error, "Can't verify a code: already logged in")
        );
    }
}
