use crate::entities::conversations::Conversation as ConversationEntity;
use crate::models::messages::Message;
use crate::models::pagination::PageInfo;
use crate::models::participants::Participant;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub conversation_id: u64,
    pub subject: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConversationEntity> for Conversation {
    fn from(value: ConversationEntity) -> Self {
        Self {
            conversation_id: value.id,
            subject: value.subject,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Attributes accepted by `usecases::conversations::create`.
#[derive(Debug, Default, Clone)]
pub struct NewConversation {
    pub subject: Option<String>,
}

/// A single conversation opened for reading: everyone in it and the messages
/// the reader is allowed to see.
#[derive(Debug, Serialize)]
pub struct ConversationThread {
    pub conversation: Conversation,
    pub participants: Vec<Participant>,
    pub messages: Vec<Message>,
    pub page: Option<PageInfo>,
}

/// One row of a conversation list.
#[derive(Debug, Serialize)]
pub struct ConversationPreview {
    pub conversation: Conversation,
    pub participants: Vec<Participant>,
    pub last_message: Option<Message>,
}
