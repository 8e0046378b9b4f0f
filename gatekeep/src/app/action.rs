use crossterm::event::KeyEvent;
use gatekeep_core::{
    api::{activity, error, login},
    flow::Contact,
    ActivityEntry, Session,
};

/// Things that can happen to this app
#[derive(Debug)]
pub enum Action {
    /// The user did something on the keyboard
    Key(KeyEvent),

    /// Something bad happened; display it to the user
    Problem(String),

    /// Some amount of time passed and we should check the session
    TimePassed,

    /// We read the stored session (if there was one) from disk
    LoadedSession(Option<Session>),

    /// We wrote the session to disk
    SavedSession,

    /// We removed the session from disk
    ClearedSession,

    /// The server answered our login attempt
    LoggedIn(error::Result<login::Resp>),

    /// The server answered our signup attempt
    SignedUp(error::Result<()>),

    /// The server answered our request to send a code to this contact
    OtpSent(Contact, error::Result<()>),

    /// The server checked a code sent to a specific contact
    OtpValidated(error::Result<()>),

    /// The server checked a code sent to the signup email address
    OtpVerified(error::Result<()>),

    /// The server answered our request for a fresh code by email
    OtpResent(error::Result<()>),

    /// The server answered our attempt to set a password
    PasswordSet(error::Result<()>),

    /// We looked up where the user is. `None` if the lookup failed.
    Located(Option<ActivityEntry>),

    /// We tried to record an activity entry (whether or not it worked)
    ActivityLogCreated,

    /// The server sent the user's activity entries
    GotActivityLogs(error::Result<activity::ListResp>),
}
