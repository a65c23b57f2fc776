use chrono::{DateTime, Utc};

#[derive(Debug, sqlx::FromRow)]
pub struct Participant {
    pub id: u64,
    pub conversation_id: u64,
    pub participant_id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}
