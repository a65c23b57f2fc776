use chrono::{DateTime, Utc};

#[derive(Debug, sqlx::FromRow)]
pub struct Conversation {
    pub id: u64,
    pub subject: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
