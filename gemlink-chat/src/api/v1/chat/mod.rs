pub mod attachment;
pub mod clear;
pub mod create_dealer;
pub mod create_direct;
pub mod create_group;
pub mod delivered;
pub mod detail;
pub mod history;
pub mod list;
pub mod read;
