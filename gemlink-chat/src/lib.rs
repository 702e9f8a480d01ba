pub mod api;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod router;
pub mod server;
pub mod service;
pub mod store;
pub mod tasks;
pub mod ws;

pub use server::ChatServer;
