//! # kindlepost-smtp
//!
//! One-shot SMTP delivery client: resolves the recipient domain's mail
//! exchanger and transmits a prepared message over a raw TCP session,
//! without a local mail transfer agent.
//!
//! ## Quick Start
//!
//! ```ignore
//! use kindlepost_smtp::{DeliveryConfig, deliver};
//!
//! #[tokio::main]
//! async fn main() -> kindlepost_smtp::Result<()> {
//!     let message = b"Subject: Test\r\n\r\nHello, World!\r\n";
//!     deliver("user@example.com", message, &DeliveryConfig::default()).await
//! }
//! ```
//!
//! ## Session States
//!
//! The client uses the type-state pattern to enforce the strictly
//! sequential SMTP exchange:
//!
//! ```text
//! Connected ── mail_from() ──→ MailTransaction ── rcpt_to() ──→
//! RecipientAdded ── data() ──→ Data ── send_message() ──→ Connected
//! ```
//!
//! Every failure is terminal: the session is dropped, the connection
//! closed, and the error surfaced to the caller. There is no retrying,
//! queueing, TLS negotiation, or authentication.
//!
//! ## Modules
//!
//! - [`command`]: SMTP command builders
//! - [`connection`]: Stream handling and type-state client
//! - [`parser`]: Response parser
//! - [`resolver`]: Mail exchanger lookup
//! - [`types`]: Core SMTP types (addresses, replies)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod delivery;
mod error;
pub mod parser;
pub mod resolver;
pub mod types;

pub use connection::{
    CONNECT_TIMEOUT, Client, Connected, Data, MailTransaction, RecipientAdded, ServerInfo,
    SmtpStream, Transport, connect,
};
pub use delivery::{DeliveryConfig, SMTP_PORT, deliver, deliver_via};
pub use error::{Error, Result};
pub use resolver::MxResolver;
pub use types::{Address, Reply, ReplyCode};
