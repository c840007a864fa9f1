//! Message construction for single-attachment emails.

use crate::encoding::encode_base64_mime;
use chrono::Utc;
use rand::Rng;
use std::fmt::Write as _;

/// Default From header when none is configured.
const DEFAULT_FROM: &str = "kindlepost <kindlepost@localhost>";

/// Default Subject header when none is configured.
const DEFAULT_SUBJECT: &str = "For kindle";

/// A file to be sent as an email attachment.
///
/// Holds the base name (directory prefixes must already be stripped by the
/// caller) and the raw content, immutable once constructed. Empty content
/// is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Base name of the file, used for both the MIME `name` and
    /// `filename` parameters.
    pub file_name: String,
    /// Raw file content.
    pub content: Vec<u8>,
}

impl Attachment {
    /// Creates a new attachment from a base name and raw content.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }
}

/// Builds a complete MIME message carrying one attachment.
///
/// The output is a `multipart/mixed` message with exactly one
/// `application/octet-stream` part, base64 transfer encoding, and CRLF
/// line terminators throughout. The multipart boundary and Message-ID are
/// generated fresh for every build, and the Date header carries the
/// current time.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    from: String,
    subject: String,
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self {
            from: DEFAULT_FROM.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
        }
    }
}

impl MessageBuilder {
    /// Creates a builder with default From and Subject headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the From header.
    #[must_use]
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    /// Sets the Subject header.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Builds the message for the given recipient.
    ///
    /// This is a pure, total transformation: it cannot fail and has no
    /// side effects beyond drawing random boundary and Message-ID tokens.
    #[must_use]
    pub fn build(&self, to: &str, attachment: &Attachment) -> Vec<u8> {
        let boundary = hex_token(28);
        let attachment_id = hex_token(20);
        let message_id = format!("{}@{}", hex_token(26), self.from_domain());
        let date = Utc::now().to_rfc2822();
        let payload = encode_base64_mime(&attachment.content);
        let name = &attachment.file_name;

        let mut msg = String::with_capacity(payload.len() + 512);
        let _ = write!(msg, "MIME-Version: 1.0\r\n");
        let _ = write!(msg, "Message-ID: <{message_id}>\r\n");
        let _ = write!(msg, "Date: {date}\r\n");
        let _ = write!(msg, "Subject: {}\r\n", self.subject);
        let _ = write!(msg, "From: {}\r\n", self.from);
        let _ = write!(msg, "To: {to}\r\n");
        let _ = write!(
            msg,
            "Content-Type: multipart/mixed; boundary=\"{boundary}\"\r\n"
        );
        let _ = write!(msg, "\r\n");
        let _ = write!(msg, "--{boundary}\r\n");
        let _ = write!(
            msg,
            "Content-Type: application/octet-stream; name=\"{name}\"\r\n"
        );
        let _ = write!(
            msg,
            "Content-Disposition: attachment; filename=\"{name}\"\r\n"
        );
        let _ = write!(msg, "Content-Transfer-Encoding: base64\r\n");
        let _ = write!(msg, "X-Attachment-Id: {attachment_id}\r\n");
        let _ = write!(msg, "Content-ID: <{attachment_id}>\r\n");
        let _ = write!(msg, "\r\n");
        let _ = write!(msg, "{payload}\r\n");
        let _ = write!(msg, "--{boundary}--\r\n");

        msg.into_bytes()
    }

    /// Domain part of the configured From address, for the Message-ID.
    fn from_domain(&self) -> &str {
        let addr = self.from.trim_end_matches('>');
        addr.rsplit_once('@')
            .map_or("localhost", |(_, domain)| domain)
    }
}

/// Generates a random lowercase hex token of the given length.
fn hex_token(len: usize) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut rng = rand::rng();
    (0..len)
        .map(|_| HEX[rng.random_range(0..HEX.len())] as char)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::encoding::decode_base64;
    use proptest::prelude::*;

    fn build_str(to: &str, name: &str, content: &[u8]) -> String {
        let attachment = Attachment::new(name, content.to_vec());
        let bytes = MessageBuilder::new().build(to, &attachment);
        String::from_utf8(bytes).unwrap()
    }

    fn boundary_of(msg: &str) -> String {
        let start = msg.find("boundary=\"").unwrap() + "boundary=\"".len();
        let end = msg[start..].find('"').unwrap();
        msg[start..start + end].to_string()
    }

    #[test]
    fn headers_carry_recipient_and_file_name() {
        let msg = build_str("user@example.com", "book.mobi", b"content");
        assert!(msg.contains("To: user@example.com\r\n"));
        assert!(msg.contains("name=\"book.mobi\""));
        assert!(msg.contains("filename=\"book.mobi\""));
        assert!(msg.contains("Content-Transfer-Encoding: base64\r\n"));
        assert!(msg.contains("MIME-Version: 1.0\r\n"));
    }

    #[test]
    fn exactly_one_part_between_boundaries() {
        let msg = build_str("user@example.com", "book.mobi", b"some bytes here");
        let boundary = boundary_of(&msg);
        let open = format!("--{boundary}\r\n");
        let close = format!("--{boundary}--\r\n");

        assert_eq!(msg.matches(&open).count(), 1);
        assert_eq!(msg.matches(&close).count(), 1);

        let open_at = msg.find(&open).unwrap();
        let close_at = msg.find(&close).unwrap();
        let payload_at = msg.find("c29tZSBieXRlcyBoZXJl").unwrap();
        assert!(open_at < payload_at);
        assert!(payload_at < close_at);
        assert!(msg.ends_with(&close));
    }

    #[test]
    fn payload_decodes_to_original_content() {
        let content: Vec<u8> = (0..=255).collect();
        let msg = build_str("user@example.com", "data.bin", &content);
        let boundary = boundary_of(&msg);

        // Body sits between the blank line after the part headers and the
        // closing boundary marker.
        let body_start = msg.find("Content-ID:").unwrap();
        let body_start = body_start + msg[body_start..].find("\r\n\r\n").unwrap() + 4;
        let body_end = msg.find(&format!("\r\n--{boundary}--")).unwrap();
        let decoded = decode_base64(&msg[body_start..body_end]).unwrap();
        assert_eq!(decoded, content);
    }

    #[test]
    fn empty_content_still_frames_correctly() {
        let msg = build_str("user@example.com", "empty.bin", b"");
        let boundary = boundary_of(&msg);
        assert_eq!(msg.matches(&format!("--{boundary}--\r\n")).count(), 1);
    }

    #[test]
    fn every_line_ends_with_crlf() {
        let msg = build_str("user@example.com", "book.mobi", &[0xFF_u8; 300]);
        for (i, b) in msg.bytes().enumerate() {
            if b == b'\n' {
                assert_eq!(msg.as_bytes()[i - 1], b'\r', "bare LF at offset {i}");
            }
        }
    }

    #[test]
    fn boundary_and_message_id_are_fresh_per_build() {
        let attachment = Attachment::new("book.mobi", b"x".to_vec());
        let builder = MessageBuilder::new();
        let first = String::from_utf8(builder.build("a@b.com", &attachment)).unwrap();
        let second = String::from_utf8(builder.build("a@b.com", &attachment)).unwrap();
        assert_ne!(boundary_of(&first), boundary_of(&second));

        let id = |m: &str| {
            let at = m.find("Message-ID: <").unwrap();
            m[at..at + m[at..].find('\n').unwrap()].to_string()
        };
        assert_ne!(id(&first), id(&second));
    }

    #[test]
    fn custom_from_and_subject() {
        let attachment = Attachment::new("a.txt", b"hi".to_vec());
        let msg = MessageBuilder::new()
            .from("sender@books.example.org")
            .subject("convert")
            .build("kindle@kindle.com", &attachment);
        let msg = String::from_utf8(msg).unwrap();
        assert!(msg.contains("From: sender@books.example.org\r\n"));
        assert!(msg.contains("Subject: convert\r\n"));
        assert!(msg.contains("@books.example.org>\r\n"));
    }

    proptest! {
        #[test]
        fn base64_round_trip(content in proptest::collection::vec(any::<u8>(), 1..2048)) {
            let encoded = encode_base64_mime(&content);
            let decoded = decode_base64(&encoded).unwrap();
            prop_assert_eq!(decoded, content);
        }
    }
}
