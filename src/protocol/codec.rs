//! Protocol codec
//!
//! Encoding of commands and decoding of replies for the text protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! <verb> [<arg> ...]\r\n
//! put <pri> <delay> <ttr> <bytes>\r\n<body>\r\n
//! ```
//!
//! ### Response Format
//! ```text
//! <STATUS> [<arg> ...]\r\n
//! <STATUS> [<arg> ...] <bytes>\r\n<body>\r\n     (body-bearing replies)
//! ```
//!
//! The two bytes after a body are consumed as a trailer without being
//! inspected; framing fixes their position, not their content.

use std::io::{BufRead, ErrorKind, Read, Write};

use super::{Command, Reply};
use crate::error::{BeanError, Result};

/// Trailer length after every body
pub const TRAILER_SIZE: usize = 2;

/// Largest body the server can be configured to hold (1 GiB)
pub const MAX_BODY_SIZE: usize = 1024 * 1024 * 1024;

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command to bytes, including its CRLF terminator
pub fn encode_command(command: &Command<'_>) -> Vec<u8> {
    let verb = command.verb();

    let line = match command {
        Command::Put {
            priority,
            delay,
            ttr,
            body,
        } => {
            let header = format!("{} {} {} {} {}\r\n", verb, priority, delay, ttr, body.len());
            let mut message = Vec::with_capacity(header.len() + body.len() + TRAILER_SIZE);
            message.extend_from_slice(header.as_bytes());
            message.extend_from_slice(body);
            message.extend_from_slice(b"\r\n");
            return message;
        }
        Command::ReserveWithTimeout { seconds } => format!("{} {}", verb, seconds),
        Command::Delete { id }
        | Command::Touch { id }
        | Command::KickJob { id }
        | Command::Peek { id }
        | Command::StatsJob { id } => format!("{} {}", verb, id),
        Command::Release {
            id,
            priority,
            delay,
        } => format!("{} {} {} {}", verb, id, priority, delay),
        Command::Bury { id, priority } => format!("{} {} {}", verb, id, priority),
        Command::Kick { bound } => format!("{} {}", verb, bound),
        Command::Use { tube }
        | Command::Watch { tube }
        | Command::Ignore { tube }
        | Command::StatsTube { tube } => format!("{} {}", verb, tube),
        Command::PauseTube { tube, delay } => format!("{} {} {}", verb, tube, delay),
        Command::Reserve
        | Command::PeekReady
        | Command::PeekDelayed
        | Command::PeekBuried
        | Command::ListTubeUsed
        | Command::ListTubes
        | Command::ListTubesWatched
        | Command::Stats
        | Command::Quit => verb.to_string(),
    };

    let mut message = line.into_bytes();
    message.extend_from_slice(b"\r\n");
    message
}

/// Write a command to a stream and flush it
pub fn write_command<W: Write>(writer: &mut W, command: &Command<'_>) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Reply Decoding
// =============================================================================

/// Parse one status line (with or without its line terminator)
pub fn parse_reply(line: &[u8]) -> Result<Reply> {
    let mut tokens = line
        .split(|b| b.is_ascii_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| String::from_utf8_lossy(t).into_owned());

    let token = tokens
        .next()
        .ok_or_else(|| BeanError::Protocol("Empty status line".to_string()))?;

    Ok(Reply {
        token,
        args: tokens.collect(),
    })
}

/// Read exactly one status line from a stream
///
/// EOF before a complete line is a transport failure.
pub fn read_reply<R: BufRead>(reader: &mut R) -> Result<Reply> {
    let mut line = Vec::new();
    let read = reader.read_until(b'\n', &mut line)?;

    if read == 0 || line.last() != Some(&b'\n') {
        return Err(BeanError::ConnectionClosed);
    }

    parse_reply(&line)
}

/// Read a body of `size` bytes followed by its 2-byte trailer
pub fn read_body<R: Read>(reader: &mut R, size: usize) -> Result<Vec<u8>> {
    if size > MAX_BODY_SIZE {
        return Err(BeanError::Protocol(format!(
            "Body too large: {} bytes (max {})",
            size, MAX_BODY_SIZE
        )));
    }

    let mut body = vec![0u8; size];
    read_exact_or_closed(reader, &mut body)?;

    let mut trailer = [0u8; TRAILER_SIZE];
    read_exact_or_closed(reader, &mut trailer)?;

    Ok(body)
}

fn read_exact_or_closed<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(BeanError::ConnectionClosed),
        Err(e) => Err(BeanError::Io(e)),
    }
}
