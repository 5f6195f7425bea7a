pub mod auth;
pub mod config;
pub mod extract;
pub mod gmail;
pub mod headers;
pub mod resolve;
pub mod transcript;
