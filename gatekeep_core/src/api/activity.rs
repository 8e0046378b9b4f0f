use crate::ActivityEntry;
use serde::{Deserialize, Serialize};

/// Record one activity entry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CreateReq {
    /// What to record.
    pub activity: ActivityEntry,
}

/// The activity entries recorded for the logged-in user.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ListResp {
    /// Entries, in whatever order the server keeps them.
    pub activities: Vec<ActivityEntry>,
}

/// Where the activity endpoint lives. We POST to create and GET to list.
pub const PATH: &str = "/api/activity";
