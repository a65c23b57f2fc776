use crate::entities::participants::Participant as ParticipantEntity;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Participant {
    // The user-like identity, stable across conversations
    pub participant_id: i64,
    pub conversation_id: u64,
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

impl From<ParticipantEntity> for Participant {
    fn from(value: ParticipantEntity) -> Self {
        Self {
            participant_id: value.participant_id,
            conversation_id: value.conversation_id,
            username: value.username,
            joined_at: value.created_at,
        }
    }
}
