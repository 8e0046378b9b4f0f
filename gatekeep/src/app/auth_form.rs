use crate::form_fields;
use crate::form_fields::Fields;
use crossterm::event::{Event, KeyCode, KeyEvent};
use gatekeep_core::{LoginForm, SignupForm};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

form_fields!(LoginField { Email => "Email", Password => "Password" }, masked: [Password]);

form_fields!(SignupField {
    FirstName => "First name",
    LastName => "Last name",
    UserName => "User name",
    Email => "Email",
    PhoneNumber => "Phone number",
});

form_fields!(OtpField { Code => "Code" });

form_fields!(PasswordField { Password => "New password" }, masked: [Password]);

/// Text inputs for every field of a form, one of which has focus.
#[derive(Debug)]
pub struct Inputs<F> {
    /// Which field we're editing
    active: F,

    /// One input per field, in `F::FIELDS` order
    values: Vec<Input>,
}

impl<F: Fields> Inputs<F> {
    pub fn new() -> Self {
        Self {
            active: F::FIELDS[0],
            values: F::FIELDS.iter().map(|_| Input::default()).collect(),
        }
    }

    pub fn value(&self, field: F) -> &str {
        self.values[field.index()].value()
    }

    /// Replace a field's contents, unless it already says that. (Replacing
    /// resets the cursor, which we don't want on every keystroke.)
    pub fn set(&mut self, field: F, value: &str) {
        let input = &mut self.values[field.index()];
        if input.value() != value {
            *input = Input::new(value.to_string());
        }
    }

    pub fn handle_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.active = self.active.next();
            }
            KeyCode::BackTab => {
                self.active = self.active.prev();
            }
            _ => {
                self.values[self.active.index()].handle_event(&Event::Key(key));
            }
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, body_area: Rect, title: &str) {
        self.render_with_border(frame, body_area, title, Color::Blue);
    }

    /// Like `render`, with the popup's border in the given color (e.g. red
    /// after a rejected code.)
    #[expect(clippy::cast_possible_truncation)]
    pub fn render_with_border(
        &self,
        frame: &mut Frame<'_>,
        body_area: Rect,
        title: &str,
        border: Color,
    ) {
        let height = 3 * F::FIELDS.len() as u16 + 2; // +2 for the border
        let popup_vert = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
        let popup_horiz = Layout::horizontal([Constraint::Percentage(50)]).flex(Flex::Center);

        let [popup_area] = popup_vert.areas(body_area);
        let [popup_area] = popup_horiz.areas(popup_area);
        frame.render_widget(Clear, popup_area);

        let outer = Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(Style::default().fg(border));
        let inner = outer.inner(popup_area);
        frame.render_widget(outer, popup_area);

        let rows = Layout::vertical(F::FIELDS.iter().map(|_| Constraint::Length(3))).split(inner);
        let width = inner.width.saturating_sub(2 + 1) as usize; // -2 for the border, -1 for the cursor

        for (field, area) in F::FIELDS.iter().zip(rows.iter()) {
            let input = &self.values[field.index()];
            let scroll = input.visual_scroll(width);
            let active = *field == self.active;

            let text = if field.masked() {
                "*".repeat(input.value().chars().count())
            } else {
                input.value().to_string()
            };

            let widget = Paragraph::new(text).scroll((0, scroll as u16)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(field.label())
                    .border_style(if active {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default()
                    }),
            );

            frame.render_widget(widget, *area);

            if active {
                frame.set_cursor_position((
                    area.x
                        + (input.visual_cursor().max(scroll) - scroll) as u16 // current end of text
                        + 1, // just past the end of the text
                    area.y + 1, // +1 row for the border/title
                ));
            }
        }
    }
}

impl Inputs<LoginField> {
    pub fn login_form(&self) -> LoginForm {
        LoginForm {
            email: self.value(LoginField::Email).to_string(),
            password: self.value(LoginField::Password).to_string(),
        }
    }

    pub fn show(&mut self, form: &LoginForm) {
        self.set(LoginField::Email, &form.email);
        self.set(LoginField::Password, &form.password);
    }
}

impl Inputs<SignupField> {
    pub fn signup_form(&self) -> SignupForm {
        SignupForm {
            first_name: self.value(SignupField::FirstName).to_string(),
            last_name: self.value(SignupField::LastName).to_string(),
            user_name: self.value(SignupField::UserName).to_string(),
            email: self.value(SignupField::Email).to_string(),
            phone_number: self.value(SignupField::PhoneNumber).to_string(),
        }
    }

    pub fn show(&mut self, form: &SignupForm) {
        self.set(SignupField::FirstName, &form.first_name);
        self.set(SignupField::LastName, &form.last_name);
        self.set(SignupField::UserName, &form.user_name);
        self.set(SignupField::Email, &form.email);
        self.set(SignupField::PhoneNumber, &form.phone_number);
    }
}

/// All the inputs the auth views use. The auth store owns the values; these
/// own the cursors.
#[derive(Debug)]
pub struct AuthInputs {
    pub login: Inputs<LoginField>,
    pub signup: Inputs<SignupField>,
    pub otp: Inputs<OtpField>,
    pub password: Inputs<PasswordField>,
}

impl AuthInputs {
    pub fn new() -> Self {
        Self {
            login: Inputs::new(),
            signup: Inputs::new(),
            otp: Inputs::new(),
            password: Inputs::new(),
        }
    }
}
