use super::Effect;
use chrono::{DateTime, Utc};
use gatekeep_core::{
    api::{activity, error, Client},
    ActivityEntry,
};

/// The user's activity entries, as last fetched from the server.
#[derive(Debug, Default)]
pub struct ActivityLogs {
    /// What the server sent last time
    pub user_logs: Vec<ActivityEntry>,

    /// Is a fetch in flight?
    pub loading: bool,

    /// When the last successful fetch finished
    pub fetched_at: Option<DateTime<Utc>>,
}

impl ActivityLogs {
    /// Record an entry. This is fire-and-forget: nothing here changes, and
    /// failures only show up in the logs.
    #[expect(clippy::unused_self)]
    pub fn create_activity_log(&self, client: &Client, entry: ActivityEntry) -> Effect {
        Effect::CreateActivityLog(client.clone(), entry)
    }

    /// Start fetching the user's entries.
    pub fn get_activity_logs(&mut self, client: &Client) -> Effect {
        self.loading = true;

        Effect::FetchActivityLogs(client.clone())
    }

    /// The fetch finished. Loading is over whether or not it worked.
    pub fn got_activity_logs(&mut self, result: error::Result<activity::ListResp>) {
        self.loading = false;

        match result {
            Ok(resp) => {
                self.user_logs = resp.activities;
                self.fetched_at = Some(Utc::now());
            }
            Err(err) => tracing::warn!(?err, "failed to fetch activity logs"),
        }
    }

    /// Forget everything, e.g. on logout.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
