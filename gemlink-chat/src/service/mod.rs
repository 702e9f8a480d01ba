pub mod membership;
pub mod messages;
pub mod moderation;
pub mod rooms;
pub mod status;
