/// Things that can happen to the app
mod action;
pub use action::Action;

/// Activity entries for the logged-in user
mod activity_logs;
use activity_logs::ActivityLogs;

/// Text inputs for the auth views
mod auth_form;
use auth_form::AuthInputs;

/// Login, signup, and verification state
mod auth_store;
use auth_store::{AuthStore, Tab};

/// Side effects and how to run them
mod effect;
pub use effect::{Effect, EffectContext};

/// Routing and notices
mod ui;
use ui::{Level, Notice, Route, Ui};

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use gatekeep_core::{api::Client, flow::Contact};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};
use std::process::ExitCode;

/// The "functional core" of the app.
pub struct App {
    /// Client for the backend, without auth. The session's token is added
    /// per call.
    client: Client,

    /// Which view is showing, and the latest notice
    ui: Ui,

    /// Login and signup state
    auth: AuthStore,

    /// The user's activity entries
    logs: ActivityLogs,

    /// Cursors and contents of the text inputs
    inputs: AuthInputs,

    /// Set when we're done and want this exit code after final effects
    exit: Option<ExitCode>,
}

impl App {
    /// Create a new instance of the app
    pub fn new(server: String) -> Self {
        Self {
            client: Client::new(server),
            ui: Ui::new(),
            auth: AuthStore::default(),
            logs: ActivityLogs::default(),
            inputs: AuthInputs::new(),
            exit: None,
        }
    }

    /// The client to use for the next call, carrying the session if there
    /// is one.
    fn client(&self) -> Client {
        match self.auth.flow.session() {
            Some(session) => self.client.clone().with_session(session),
            None => self.client.clone(),
        }
    }

    /// Produce any side effects as needed to initialize the app.
    #[expect(clippy::unused_self)]
    pub fn init(&self) -> Effect {
        Effect::LoadSession
    }

    /// Handle an `Action`, updating the app's state and producing some side effect(s)
    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        let effects = self.handle_inner(action);

        // The stores may have cleared fields (e.g. a rejected OTP), so the
        // inputs need to catch up.
        self.inputs.login.show(&self.auth.login_form);
        self.inputs.signup.show(&self.auth.signup_form);
        self.inputs
            .otp
            .set(auth_form::OtpField::Code, &self.auth.otp);
        self.inputs
            .password
            .set(auth_form::PasswordField::Password, &self.auth.new_password);

        effects
    }

    fn handle_inner(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Key(key) => self.handle_key(key),
            Action::Problem(problem) => {
                self.ui.notify(Notice::error(problem));

                vec![]
            }
            Action::TimePassed => {
                let effects = self.auth.check_expiry(&mut self.ui);
                if self.auth.flow.session().is_none() {
                    self.logs.clear();
                }

                effects
            }
            Action::LoadedSession(session) => {
                let mut effects = self.auth.session_loaded(session, &mut self.ui);
                if self.auth.flow.session().is_some() {
                    let client = self.client();
                    effects.push(self.logs.get_activity_logs(&client));
                }

                effects
            }
            Action::SavedSession => {
                tracing::debug!("saved session");

                vec![]
            }
            Action::ClearedSession => {
                tracing::debug!("cleared session");

                vec![]
            }
            Action::LoggedIn(result) => self.auth.logged_in(result, &mut self.ui),
            Action::SignedUp(result) => {
                self.auth.signed_up(result, &mut self.ui);

                vec![]
            }
            Action::OtpSent(contact, result) => {
                self.auth.otp_sent(contact, result, &mut self.ui);

                vec![]
            }
            Action::OtpValidated(result) => {
                self.auth.otp_validated(result, &mut self.ui);

                vec![]
            }
            Action::OtpVerified(result) => {
                self.auth.otp_verified(result, &mut self.ui);

                vec![]
            }
            Action::OtpResent(result) => {
                self.auth.otp_resent(result, &mut self.ui);

                vec![]
            }
            Action::PasswordSet(result) => {
                self.auth.password_set(result, &mut self.ui);

                vec![]
            }
            Action::Located(located) => {
                let client = self.client();

                match located {
                    Some(entry) => vec![self.logs.create_activity_log(&client, entry)],
                    None => vec![self.logs.get_activity_logs(&client)],
                }
            }
            Action::ActivityLogCreated => {
                if self.auth.flow.session().is_none() {
                    return vec![];
                }

                let client = self.client();
                vec![self.logs.get_activity_logs(&client)]
            }
            Action::GotActivityLogs(result) => {
                // A fetch can finish after logging out; its entries belong
                // to the old session.
                if self.auth.flow.session().is_none() {
                    tracing::debug!("dropping activity fetched without a session");
                    self.logs.clear();
                    return vec![];
                }

                self.logs.got_activity_logs(result);

                vec![]
            }
        }
    }

    #[expect(clippy::too_many_lines)]
    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.kind != KeyEventKind::Press {
            return vec![];
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.exit = Some(ExitCode::SUCCESS);
            return vec![];
        }

        let client = self.client();

        match self.ui.route {
            Route::Auth => match key.code {
                KeyCode::Esc => {
                    self.exit = Some(ExitCode::SUCCESS);
                    vec![]
                }
                KeyCode::Char('t') if ctrl => {
                    self.auth.toggle_tab();
                    vec![]
                }
                KeyCode::Enter => match self.auth.current_tab {
                    Tab::Login => self.auth.handle_login(&client, &mut self.ui),
                    Tab::Signup => self.auth.handle_new_sign_up(&client, &mut self.ui),
                },
                _ => {
                    match self.auth.current_tab {
                        Tab::Login => {
                            self.inputs.login.handle_event(key);
                            self.auth.login_form = self.inputs.login.login_form();
                        }
                        Tab::Signup => {
                            self.inputs.signup.handle_event(key);
                            self.auth.signup_form = self.inputs.signup.signup_form();
                        }
                    }
                    vec![]
                }
            },

            Route::VerifyOtp => match key.code {
                KeyCode::Esc => {
                    self.ui.navigate(Route::Auth);
                    vec![]
                }
                KeyCode::Char('r') if ctrl => self.auth.request_new_otp(&client, &mut self.ui),
                KeyCode::Char('e') if ctrl => {
                    let contact = Contact::Email {
                        email: self.auth.signup_form.email.clone(),
                    };
                    self.auth.send_otp(contact, &client, &mut self.ui)
                }
                KeyCode::Char('p') if ctrl => {
                    let contact = Contact::Phone {
                        phone: self.auth.signup_form.phone_number.clone(),
                    };
                    self.auth.send_otp(contact, &client, &mut self.ui)
                }
                KeyCode::Enter => {
                    let otp = self.auth.otp.clone();
                    match self.auth.otp_channel.clone() {
                        None => self.auth.verify_otp(&otp, &client, &mut self.ui),
                        Some(contact) => {
                            self.auth
                                .validate_otp(&otp, contact, &client, &mut self.ui)
                        }
                    }
                }
                _ => {
                    self.inputs.otp.handle_event(key);
                    self.auth.otp = self.inputs.otp.value(auth_form::OtpField::Code).to_string();
                    vec![]
                }
            },

            Route::SetPassword => match key.code {
                KeyCode::Esc => {
                    self.ui.navigate(Route::Auth);
                    vec![]
                }
                KeyCode::Enter => {
                    let password = self.auth.new_password.clone();
                    self.auth.set_new_password(&password, &client, &mut self.ui)
                }
                _ => {
                    self.inputs.password.handle_event(key);
                    self.auth.new_password = self
                        .inputs
                        .password
                        .value(auth_form::PasswordField::Password)
                        .to_string();
                    vec![]
                }
            },

            Route::Dashboard => match key.code {
                KeyCode::Char('q') => {
                    self.exit = Some(ExitCode::SUCCESS);
                    vec![]
                }
                KeyCode::Char('r') => vec![self.logs.get_activity_logs(&client)],
                KeyCode::Char('l') => {
                    self.logs.clear();
                    self.auth.logout(&mut self.ui)
                }
                _ => {
                    self.ui.notify(Notice::info(format!("Unknown key {:?}", key.code)));
                    vec![]
                }
            },
        }
    }

    /// Render the app's UI to the screen
    pub fn render(&mut self, frame: &mut Frame) {
        let vertical = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ]);
        let [title_area, body_area, status_area] = vertical.areas(frame.area());

        let title = match self.auth.flow.session() {
            Some(session) => format!(
                "gatekeep · {} · {}",
                self.client.server,
                session.display_name().unwrap_or("logged in")
            ),
            None => format!("gatekeep · {}", self.client.server),
        };
        frame.render_widget(
            Paragraph::new(title).bg(Color::DarkGray).fg(Color::White),
            title_area,
        );

        match self.ui.route {
            Route::Auth => {
                let [tabs_area, form_area] =
                    Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(body_area);

                let selected = match self.auth.current_tab {
                    Tab::Login => 0,
                    Tab::Signup => 1,
                };
                frame.render_widget(
                    Tabs::new(["Login", "Sign Up"])
                        .select(selected)
                        .highlight_style(Style::new().fg(Color::Yellow).bold()),
                    tabs_area,
                );

                match self.auth.current_tab {
                    Tab::Login => self.inputs.login.render(frame, form_area, "Login"),
                    Tab::Signup => self.inputs.signup.render(frame, form_area, "Sign Up"),
                }
            }
            Route::VerifyOtp => {
                let sent_to = match self.auth.flow.allows(gatekeep_core::flow::Step::VerifyOtp) {
                    Ok(Some(contact)) => format!("Code sent to {contact}"),
                    _ => "Enter your code".to_string(),
                };
                let border = if self.auth.is_error {
                    Color::Red
                } else {
                    Color::Blue
                };
                self.inputs
                    .otp
                    .render_with_border(frame, body_area, &sent_to, border);
            }
            Route::SetPassword => {
                self.inputs
                    .password
                    .render(frame, body_area, "Choose a password");
            }
            Route::Dashboard => self.render_dashboard(frame, body_area),
        }

        let status = if self.auth.is_loading || self.logs.loading {
            Paragraph::new("Working…")
        } else {
            match &self.ui.notice {
                Some(Notice { level, message }) => Paragraph::new(message.as_str()).fg(match level {
                    Level::Info => Color::Reset,
                    Level::Success => Color::Green,
                    Level::Error => Color::Red,
                }),
                None => Paragraph::new(self.hints()).fg(Color::DarkGray),
            }
        };

        frame.render_widget(status, status_area);
    }

    fn render_dashboard(&self, frame: &mut Frame, body_area: Rect) {
        let rows: Vec<Row> = self
            .logs
            .user_logs
            .iter()
            .map(|entry| {
                Row::new(vec![
                    entry.place(),
                    entry.ip_address.clone().unwrap_or_default(),
                    entry.org.clone().unwrap_or_default(),
                    entry.timezone.clone().unwrap_or_default(),
                ])
            })
            .collect();

        let title = match self.logs.fetched_at {
            Some(at) => format!(
                "Recent activity (as of {})",
                at.with_timezone(&Local).format("%H:%M:%S")
            ),
            None => "Recent activity".to_string(),
        };

        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new(if self.logs.loading {
                    "Loading…"
                } else {
                    "No activity recorded yet."
                })
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(title)),
                body_area,
            );
            return;
        }

        let table = Table::new(
            rows,
            [
                Constraint::Fill(2),
                Constraint::Min(15),
                Constraint::Fill(2),
                Constraint::Fill(1),
            ],
        )
        .header(
            Row::new(["Place", "IP address", "Network", "Time zone"])
                .bg(Color::DarkGray)
                .fg(Color::White),
        )
        .column_spacing(2)
        .block(Block::default().borders(Borders::ALL).title(title));

        frame.render_widget(table, body_area);
    }

    fn hints(&self) -> &'static str {
        match self.ui.route {
            Route::Auth => "enter: submit · tab: next field · ctrl-t: login/sign up · esc: quit",
            Route::VerifyOtp => {
                "enter: verify · ctrl-r: resend · ctrl-e: send by email · ctrl-p: send by text · esc: back"
            }
            Route::SetPassword => "enter: save · esc: back",
            Route::Dashboard => "r: refresh · l: log out · q: quit",
        }
    }

    /// Let the TUI manager know whether we're all wrapped up and can exit.
    pub fn should_exit(&self) -> Option<ExitCode> {
        self.exit
    }
}
