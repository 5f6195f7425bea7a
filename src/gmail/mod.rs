pub mod client;
pub mod types;

pub use client::{ApiError, GmailApi, GmailClient};
pub use types::{Header, Message, MessagePart, PartBody, Thread};
