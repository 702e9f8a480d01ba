pub mod block;
pub mod report;
pub mod unblock;
