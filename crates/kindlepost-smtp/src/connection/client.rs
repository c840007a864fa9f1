//! Type-state SMTP client.
//!
//! The type parameter tracks the protocol phase, so the compiler enforces
//! the HELO → MAIL FROM → RCPT TO → DATA ordering of a delivery session.

use super::{ServerInfo, SmtpStream};
use crate::command::Command;
use crate::error::{Error, Result};
use crate::parser::{is_last_reply_line, parse_reply};
use crate::types::{Address, Reply, ReplyCode};
use std::marker::PhantomData;
use tracing::debug;

/// Type-state marker for connected state.
#[derive(Debug)]
pub struct Connected;

/// Type-state marker for mail transaction started.
#[derive(Debug)]
pub struct MailTransaction;

/// Type-state marker for recipient added.
#[derive(Debug)]
pub struct RecipientAdded;

/// Type-state marker for data mode.
#[derive(Debug)]
pub struct Data;

/// SMTP client with type-state pattern.
///
/// The client owns the stream for the duration of one delivery; dropping
/// it in any state releases the connection.
#[derive(Debug)]
pub struct Client<State> {
    stream: SmtpStream,
    server_info: ServerInfo,
    _state: PhantomData<State>,
}

impl Client<Connected> {
    /// Creates a client from a stream and reads the server greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the greeting fails or the server does
    /// not greet with a 2xx reply.
    pub async fn from_stream(mut stream: SmtpStream) -> Result<Self> {
        let greeting = Self::read_reply(&mut stream).await?;
        if !greeting.is_success() {
            return Err(Error::rejected(
                greeting.code.as_u16(),
                greeting.message_text(),
            ));
        }

        // First word of the greeting is the server's hostname.
        let hostname = greeting
            .message
            .first()
            .and_then(|msg| msg.split_whitespace().next())
            .unwrap_or("unknown")
            .to_string();
        debug!("Server greeting from {hostname}");

        Ok(Self {
            stream,
            server_info: ServerInfo { hostname },
            _state: PhantomData,
        })
    }

    /// Identifies the client to the server.
    ///
    /// Sends EHLO and falls back to HELO when the server rejects the
    /// extended greeting, matching common client behavior against old
    /// servers.
    ///
    /// # Errors
    ///
    /// Returns an error if both greetings are rejected.
    pub async fn hello(mut self, client_hostname: &str) -> Result<Self> {
        let reply = self
            .send_command(Command::Ehlo {
                hostname: client_hostname.to_string(),
            })
            .await?;
        if reply.is_success() {
            return Ok(self);
        }

        debug!("EHLO rejected ({}), retrying with HELO", reply.code);
        let reply = self
            .send_command(Command::Helo {
                hostname: client_hostname.to_string(),
            })
            .await?;
        if !reply.is_success() {
            return Err(Error::rejected(reply.code.as_u16(), reply.message_text()));
        }

        Ok(self)
    }

    /// Starts a mail transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects MAIL FROM.
    pub async fn mail_from(mut self, from: Address) -> Result<Client<MailTransaction>> {
        let reply = self.send_command(Command::MailFrom { from }).await?;
        if !reply.is_success() {
            return Err(Error::rejected(reply.code.as_u16(), reply.message_text()));
        }

        Ok(Client {
            stream: self.stream,
            server_info: self.server_info,
            _state: PhantomData,
        })
    }
}

impl Client<MailTransaction> {
    /// Declares the recipient of the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects RCPT TO (unknown recipient,
    /// policy rejection).
    pub async fn rcpt_to(mut self, to: Address) -> Result<Client<RecipientAdded>> {
        let reply = self.send_command(Command::RcptTo { to }).await?;
        if !reply.is_success() {
            return Err(Error::rejected(reply.code.as_u16(), reply.message_text()));
        }

        Ok(Client {
            stream: self.stream,
            server_info: self.server_info,
            _state: PhantomData,
        })
    }
}

impl Client<RecipientAdded> {
    /// Begins the DATA phase.
    ///
    /// # Errors
    ///
    /// Returns an error unless the server answers 354.
    pub async fn data(mut self) -> Result<Client<Data>> {
        let reply = self.send_command(Command::Data).await?;
        if reply.code != ReplyCode::START_DATA {
            return Err(Error::rejected(reply.code.as_u16(), reply.message_text()));
        }

        Ok(Client {
            stream: self.stream,
            server_info: self.server_info,
            _state: PhantomData,
        })
    }
}

impl Client<Data> {
    /// Sends the message content and completes the transaction.
    ///
    /// The message must already use CRLF line endings. Lines starting with
    /// `.` are byte-stuffed and the terminating `.` line is appended
    /// automatically. The transport must accept every message byte;
    /// anything less is a [`Error::ShortWrite`], distinct from a transport
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails, fewer bytes are accepted than
    /// sent, or the server rejects the message.
    pub async fn send_message(mut self, message: &[u8]) -> Result<Client<Connected>> {
        let mut accepted = 0;
        for line in message.split_inclusive(|&b| b == b'\n') {
            if line.first() == Some(&b'.') {
                // The stuffing byte is transport framing, not message content.
                self.stream.write_all(b".").await?;
            }
            accepted += self.stream.write_counted(line).await?;
        }

        if accepted != message.len() {
            return Err(Error::ShortWrite {
                written: accepted,
                expected: message.len(),
            });
        }

        if !message.ends_with(b"\r\n") {
            self.stream.write_all(b"\r\n").await?;
        }
        self.stream.write_all(b".\r\n").await?;

        let reply = Self::read_reply(&mut self.stream).await?;
        if !reply.is_success() {
            return Err(Error::rejected(reply.code.as_u16(), reply.message_text()));
        }

        Ok(Client {
            stream: self.stream,
            server_info: self.server_info,
            _state: PhantomData,
        })
    }
}

// Common implementation for all states
impl<S> Client<S> {
    /// Returns the server information gathered from the greeting.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    async fn send_command(&mut self, cmd: Command) -> Result<Reply> {
        self.stream.write_all(&cmd.serialize()).await?;
        Self::read_reply(&mut self.stream).await
    }

    async fn read_reply(stream: &mut SmtpStream) -> Result<Reply> {
        let mut lines = Vec::new();
        loop {
            let line = stream.read_line().await?;
            if line.is_empty() {
                continue;
            }

            let is_last = is_last_reply_line(&line);
            lines.push(line);

            if is_last {
                break;
            }
        }

        parse_reply(&lines)
    }

    /// Sends QUIT and closes the connection (available in any state).
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects QUIT.
    pub async fn quit(mut self) -> Result<()> {
        let reply = self.send_command(Command::Quit).await?;
        if !reply.is_success() {
            return Err(Error::rejected(reply.code.as_u16(), reply.message_text()));
        }

        Ok(())
    }
}
