use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub experience: i64,
    pub bio: String,
    pub submitted_at: DateTime<Utc>,
}

/// A validated submission, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub experience: i64,
    pub bio: String,
}
