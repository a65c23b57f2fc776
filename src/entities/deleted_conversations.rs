use chrono::{DateTime, Utc};

/// Per-participant hide marker. `archived = false` is the reversible archive,
/// `archived = true` is a force-remove.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeletedConversation {
    pub id: u64,
    pub conversation_id: u64,
    pub participant_id: i64,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
