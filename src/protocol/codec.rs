//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - GET:       key_len (4 bytes) + key
//! - SET:       key_len (4 bytes) + key + value
//! - PRINT:     empty
//! - PRINT_REV: empty
//! - PING:      empty
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

use std::io::{Read, Write};

use crate::error::{KvError, Result};

use super::{Command, CommandType, Response, Status};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload
///
/// Fails with `KvError::Protocol` if the payload would exceed
/// `MAX_PAYLOAD_SIZE`; nothing is allocated for it in that case.
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    let payload = match command {
        Command::Get { key } => {
            checked_len(4 + key.len(), "GET command")?;
            let mut payload = Vec::with_capacity(4 + key.len());
            payload.extend_from_slice(&(key.len() as u32).to_be_bytes());
            payload.extend_from_slice(key);
            payload
        }
        Command::Set { key, value } => {
            checked_len(4 + key.len() + value.len(), "SET command")?;
            let mut payload = Vec::with_capacity(4 + key.len() + value.len());
            payload.extend_from_slice(&(key.len() as u32).to_be_bytes());
            payload.extend_from_slice(key);
            payload.extend_from_slice(value);
            payload
        }
        Command::Print | Command::PrintReverse | Command::Ping => Vec::new(),
    };

    frame(command.command_type() as u8, &payload, "command")
}

/// Decode a command from bytes
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (cmd_byte, payload) = split_frame(bytes, "command")?;

    let cmd_type = CommandType::try_from(cmd_byte).map_err(|byte| {
        KvError::Protocol(format!("Unknown command type: 0x{:02x}", byte))
    })?;

    match cmd_type {
        CommandType::Get => {
            let (key, rest) = split_key(payload, "GET")?;
            if !rest.is_empty() {
                return Err(KvError::Protocol(format!(
                    "GET command: {} trailing bytes after key",
                    rest.len()
                )));
            }
            Ok(Command::Get { key: key.to_vec() })
        }
        CommandType::Set => {
            let (key, value) = split_key(payload, "SET")?;
            Ok(Command::Set {
                key: key.to_vec(),
                value: value.to_vec(),
            })
        }
        CommandType::Print => expect_empty(payload, "PRINT").map(|_| Command::Print),
        CommandType::PrintReverse => {
            expect_empty(payload, "PRINT_REV").map(|_| Command::PrintReverse)
        }
        CommandType::Ping => expect_empty(payload, "PING").map(|_| Command::Ping),
    }
}

/// Split `key_len (4) + key + rest`
fn split_key<'a>(payload: &'a [u8], name: &str) -> Result<(&'a [u8], &'a [u8])> {
    if payload.len() < 4 {
        return Err(KvError::Protocol(format!(
            "{} command: missing key length",
            name
        )));
    }

    let key_len = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;

    if payload.len() - 4 < key_len {
        return Err(KvError::Protocol(format!(
            "{} command: incomplete key (expected {}, got {})",
            name,
            key_len,
            payload.len() - 4
        )));
    }

    Ok(payload[4..].split_at(key_len))
}

fn expect_empty(payload: &[u8], name: &str) -> Result<()> {
    if !payload.is_empty() {
        return Err(KvError::Protocol(format!(
            "{} command: unexpected payload of {} bytes",
            name,
            payload.len()
        )));
    }
    Ok(())
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
///
/// Fails with `KvError::Protocol` if the payload exceeds `MAX_PAYLOAD_SIZE`.
pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    let payload = response.payload.as_deref().unwrap_or(&[]);
    frame(response.status as u8, payload, "response")
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (status_byte, payload) = split_frame(bytes, "response")?;

    let status = match status_byte {
        0x00 => Status::Ok,
        0x01 => Status::NotFound,
        0x02 => Status::Error,
        _ => {
            return Err(KvError::Protocol(format!(
                "Unknown response status: 0x{:02x}",
                status_byte
            )))
        }
    };

    let payload = if payload.is_empty() {
        None
    } else {
        Some(payload.to_vec())
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Framing
// =============================================================================

fn frame(tag: u8, payload: &[u8], what: &str) -> Result<Vec<u8>> {
    let len = checked_len(payload.len(), what)?;
    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(tag);
    message.extend_from_slice(&len.to_be_bytes());
    message.extend_from_slice(payload);
    Ok(message)
}

/// Length of an outgoing payload as it goes on the wire
fn checked_len(len: usize, what: &str) -> Result<u32> {
    match u32::try_from(len) {
        Ok(len) if len <= MAX_PAYLOAD_SIZE => Ok(len),
        _ => Err(KvError::Protocol(format!(
            "{} payload too large: {} bytes (max {})",
            what, len, MAX_PAYLOAD_SIZE
        ))),
    }
}

/// Validate a header and return `(tag, payload)`
fn split_frame<'a>(bytes: &'a [u8], what: &str) -> Result<(u8, &'a [u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(KvError::Protocol(format!(
            "Incomplete {} header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let payload_len = payload_len(&bytes[..HEADER_SIZE], what)?;
    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(KvError::Protocol(format!(
            "Incomplete {} payload: expected {} bytes, got {}",
            what,
            total_len,
            bytes.len()
        )));
    }

    Ok((bytes[0], &bytes[HEADER_SIZE..total_len]))
}

fn payload_len(header: &[u8], what: &str) -> Result<usize> {
    let len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]);
    if len > MAX_PAYLOAD_SIZE {
        return Err(KvError::Protocol(format!(
            "{} payload too large: {} bytes (max {})",
            what, len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(len as usize)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one frame (header + payload) from a stream
fn read_frame<R: Read>(reader: &mut R, what: &str) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = payload_len(&header, what)?;

    let mut message = vec![0u8; HEADER_SIZE + payload_len];
    message[..HEADER_SIZE].copy_from_slice(&header);
    reader.read_exact(&mut message[HEADER_SIZE..])?;
    Ok(message)
}

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let message = read_frame(reader, "command")?;
    decode_command(&message)
}

/// Write a command to a stream
///
/// An oversized command is rejected before anything is written.
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    writer.write_all(&encode_command(command)?)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let message = read_frame(reader, "response")?;
    decode_response(&message)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(&encode_response(response)?)?;
    writer.flush()?;
    Ok(())
}
