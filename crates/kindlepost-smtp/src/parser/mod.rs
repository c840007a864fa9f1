//! SMTP response parser.

use crate::error::{Error, Result};
use crate::types::{Reply, ReplyCode};

/// Parses an SMTP reply from its raw response lines.
///
/// Replies are single-line (`250 OK`) or multi-line, where continuation
/// lines carry `-` after the code and the final line a space:
/// `250-first`, `250 last`.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if any line is malformed.
pub fn parse_reply(lines: &[String]) -> Result<Reply> {
    let Some(first) = lines.first() else {
        return Err(Error::Protocol("empty reply".into()));
    };

    if first.len() < 3 {
        return Err(Error::Protocol(format!("reply too short: {first}")));
    }

    let code = first[0..3]
        .parse::<u16>()
        .map_err(|_| Error::Protocol(format!("invalid reply code: {first}")))?;

    let mut message = Vec::with_capacity(lines.len());
    for line in lines {
        if line.len() > 4 {
            // Strip the code and separator ("250-" or "250 ").
            message.push(line[4..].to_string());
        } else if line.len() == 3 || line.len() == 4 {
            message.push(String::new());
        } else {
            return Err(Error::Protocol(format!("malformed reply line: {line}")));
        }
    }

    Ok(Reply::new(ReplyCode::new(code), message))
}

/// Returns true for the final line of a reply (space separator after the
/// code), false for `-` continuation lines.
#[must_use]
pub fn is_last_reply_line(line: &str) -> bool {
    // A bare "250" line is also terminal.
    line.len() == 3 || (line.len() >= 4 && line.as_bytes()[3] == b' ')
}
