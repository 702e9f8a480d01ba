pub mod event;
pub mod invite;
pub mod message;
pub mod participant;
pub mod room;
pub mod status;

pub use event::*;
pub use invite::*;
pub use message::*;
pub use participant::*;
pub use room::*;
pub use status::*;
