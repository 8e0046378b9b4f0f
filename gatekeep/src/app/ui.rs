/// The views the user can be looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Login and signup, switched with a tab
    Auth,

    /// Enter a code we sent
    VerifyOtp,

    /// Choose a password after verifying
    SetPassword,

    /// Logged in; shows recent activity
    Dashboard,
}

/// How a notice should look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Neutral information
    Info,

    /// Something worked
    Success,

    /// Something didn't
    Error,
}

/// A message for the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// How to style it
    pub level: Level,

    /// What to say
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// The parts of the screen the stores are allowed to change: which view is
/// showing, and the latest notice.
#[derive(Debug)]
pub struct Ui {
    /// The current view
    pub route: Route,

    /// The latest notice, if any
    pub notice: Option<Notice>,
}

impl Ui {
    pub fn new() -> Self {
        Self {
            route: Route::Auth,
            notice: None,
        }
    }

    pub fn navigate(&mut self, route: Route) {
        tracing::debug!(from = ?self.route, to = ?route, "navigating");
        self.route = route;
    }

    pub fn notify(&mut self, notice: Notice) {
        tracing::debug!(?notice, "notifying");
        self.notice = Some(notice);
    }
}
