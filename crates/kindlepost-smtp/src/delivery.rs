//! One-shot delivery pipeline.
//!
//! Resolves the recipient domain's mail exchanger, opens a TCP session,
//! and walks the SMTP command sequence to completion. Every step failure
//! is fatal to the attempt; the connection is released on every exit path
//! by drop semantics.

use crate::connection::{CONNECT_TIMEOUT, Client, connect};
use crate::error::Result;
use crate::resolver::MxResolver;
use crate::types::Address;
use std::time::Duration;
use tracing::info;

/// Default SMTP port for server-to-server delivery.
pub const SMTP_PORT: u16 = 25;

/// Parameters of a delivery attempt.
///
/// Constructed once by the caller and passed in explicitly; the pipeline
/// reads no ambient global state.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Envelope sender address (MAIL FROM).
    pub sender: String,
    /// Hostname the client announces in EHLO/HELO.
    pub client_hostname: String,
    /// Destination port on the exchanger.
    pub port: u16,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            sender: "kindlepost@localhost".to_string(),
            client_hostname: "localhost".to_string(),
            port: SMTP_PORT,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

/// Delivers a built message to the recipient's mail exchanger.
///
/// Parses the recipient address, resolves the domain's first MX record,
/// and hands off to [`deliver_via`]. No network activity happens before
/// the address parses.
///
/// # Errors
///
/// Returns the first error of any pipeline step; see [`crate::Error`] for
/// the taxonomy. Nothing is retried.
pub async fn deliver(recipient: &str, message: &[u8], config: &DeliveryConfig) -> Result<()> {
    let to = Address::new(recipient)?;
    let resolver = MxResolver::new()?;
    let host = resolver.resolve(to.domain()).await?;
    deliver_via(&host, config.port, &to, message, config).await
}

/// Delivers a built message to a specific SMTP host and port.
///
/// Runs the full session: connect, greeting, EHLO/HELO, MAIL FROM,
/// RCPT TO, DATA, message body, QUIT. A MAIL FROM rejection aborts the
/// session before RCPT TO is issued.
///
/// # Errors
///
/// Returns the first error of any session step.
pub async fn deliver_via(
    host: &str,
    port: u16,
    to: &Address,
    message: &[u8],
    config: &DeliveryConfig,
) -> Result<()> {
    let sender = Address::new(&config.sender)?;

    info!(
        "Delivering {} bytes for {to} via {host}:{port}",
        message.len()
    );

    let stream = connect(host, port, config.connect_timeout).await?;
    let client = Client::from_stream(stream).await?;
    let client = client.hello(&config.client_hostname).await?;
    let client = client.mail_from(sender).await?;
    let client = client.rcpt_to(to.clone()).await?;
    let client = client.data().await?;
    let client = client.send_message(message).await?;
    client.quit().await?;

    info!("Delivered message for {to}");
    Ok(())
}
