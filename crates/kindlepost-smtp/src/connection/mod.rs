//! SMTP connection management with type-state client.

mod client;
mod stream;

pub use client::{Client, Connected, Data, MailTransaction, RecipientAdded};
pub use stream::{CONNECT_TIMEOUT, SmtpStream, Transport, connect};

/// Server details taken from the greeting line.
#[derive(Debug, Clone, Default)]
pub struct ServerInfo {
    /// Server hostname announced in the greeting.
    pub hostname: String,
}
