//! # kindlepost-mime
//!
//! Builds the MIME message carrying a single file attachment.
//!
//! The builder produces a complete RFC 822 message as bytes: fixed headers,
//! a `multipart/mixed` body with exactly one `application/octet-stream`
//! part, and the attachment content encoded as base64. CRLF line endings
//! are used throughout, as required by the SMTP DATA phase.
//!
//! ## Quick Start
//!
//! ```ignore
//! use kindlepost_mime::{Attachment, MessageBuilder};
//!
//! let attachment = Attachment::new("book.mobi", std::fs::read("book.mobi")?);
//! let message = MessageBuilder::new().build("user@example.com", &attachment);
//! ```
//!
//! Message construction is a pure, total transformation: it never fails and
//! has no side effects beyond drawing fresh boundary and Message-ID tokens.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod message;

pub mod encoding;

pub use error::{Error, Result};
pub use message::{Attachment, MessageBuilder};
