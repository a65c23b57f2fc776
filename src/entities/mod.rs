pub mod conversations;
pub mod deleted_conversations;
pub mod messages;
pub mod participants;
