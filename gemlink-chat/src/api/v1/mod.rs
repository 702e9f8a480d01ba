pub mod chat;
pub mod group;
pub mod health;
pub mod message;
pub mod moderation;
pub mod status;
