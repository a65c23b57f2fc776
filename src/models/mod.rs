pub mod conversations;
pub mod filters;
pub mod messages;
pub mod pagination;
pub mod participants;
pub mod visibility;
