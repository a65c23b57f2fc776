pub mod conversations;
pub mod deleted_conversations;
pub mod deleted_messages;
pub mod filters;
pub mod messages;
pub mod participants;
pub mod visibility;
