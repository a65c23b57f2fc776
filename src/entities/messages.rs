use chrono::{DateTime, Utc};

#[derive(Debug, sqlx::FromRow)]
pub struct Message {
    pub id: u64,
    pub conversation_id: u64,
    pub participant_id: i64,
    pub sender_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
