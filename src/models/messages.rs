use crate::entities::messages::Message as MessageEntity;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message_id: u64,
    pub conversation_id: u64,
    pub sender_id: i64,
    pub sender_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<MessageEntity> for Message {
    fn from(value: MessageEntity) -> Self {
        Self {
            message_id: value.id,
            conversation_id: value.conversation_id,
            sender_id: value.participant_id,
            sender_name: value.sender_name,
            body: value.body,
            created_at: value.created_at,
        }
    }
}
