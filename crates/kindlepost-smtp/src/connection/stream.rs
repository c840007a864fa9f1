//! Low-level SMTP stream handling.

use crate::error::{Error, Result};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpStream, lookup_host};
use tokio::time::timeout;
use tracing::debug;

/// Transport a delivery session runs over.
///
/// Production code always uses TCP; tests may inject any in-memory
/// transport through [`SmtpStream::new`].
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

/// Buffered SMTP stream.
pub struct SmtpStream {
    inner: BufReader<Box<dyn Transport>>,
}

impl std::fmt::Debug for SmtpStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpStream").finish_non_exhaustive()
    }
}

impl SmtpStream {
    /// Wraps a transport in a buffered SMTP stream.
    #[must_use]
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            inner: BufReader::new(Box::new(transport)),
        }
    }

    /// Reads one CRLF-terminated line, with the terminator trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the server closed the
    /// connection.
    pub async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = self.inner.read_line(&mut line).await?;
        if n == 0 {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed by server",
            )));
        }
        Ok(line.trim_end().to_string())
    }

    /// Writes all data to the stream and flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.inner.get_mut().write_all(data).await?;
        self.inner.get_mut().flush().await?;
        Ok(())
    }

    /// Writes data and returns how many bytes the transport accepted.
    ///
    /// Unlike [`write_all`](Self::write_all), a transport that stops
    /// accepting bytes yields a short count instead of an error, so the
    /// caller can distinguish a short write from a transport failure.
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying write fails.
    pub async fn write_counted(&mut self, data: &[u8]) -> Result<usize> {
        let mut written = 0;
        while written < data.len() {
            let n = self.inner.get_mut().write(&data[written..]).await?;
            if n == 0 {
                break;
            }
            written += n;
        }
        self.inner.get_mut().flush().await?;
        Ok(written)
    }
}

/// Default timeout for establishing the TCP connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connects to an SMTP server over IPv4 TCP, bounded by a timeout.
///
/// # Errors
///
/// Returns [`Error::Connect`] if the host has no IPv4 address or the
/// connection fails, and [`Error::ConnectTimeout`] if the attempt exceeds
/// the timeout.
pub async fn connect(host: &str, port: u16, connect_timeout: Duration) -> Result<SmtpStream> {
    let addr = resolve_ipv4(host, port).await?;
    debug!("Connecting to {host} at {addr}");

    match timeout(connect_timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => Ok(SmtpStream::new(stream)),
        Ok(Err(source)) => Err(Error::Connect {
            host: host.to_string(),
            source,
        }),
        Err(_) => Err(Error::ConnectTimeout {
            host: host.to_string(),
        }),
    }
}

/// Picks the first IPv4 address the system resolver returns for the host.
async fn resolve_ipv4(host: &str, port: u16) -> Result<SocketAddr> {
    let mut addrs = lookup_host((host, port))
        .await
        .map_err(|source| Error::Connect {
            host: host.to_string(),
            source,
        })?;

    addrs.find(SocketAddr::is_ipv4).ok_or_else(|| Error::Connect {
        host: host.to_string(),
        source: io::Error::new(io::ErrorKind::AddrNotAvailable, "no IPv4 address"),
    })
}
