pub mod delete;
pub mod edit;
pub mod react;
pub mod reply;
pub mod send;
