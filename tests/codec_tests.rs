//! Codec Tests
//!
//! Tests for command and response encoding/decoding.

use std::io::Cursor;

use sortedkv::protocol::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, Command, Response, Status, HEADER_SIZE,
    MAX_PAYLOAD_SIZE,
};
use sortedkv::KvError;

// =============================================================================
// Command Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_get() {
    let cmd = Command::Get { key: b"hello".to_vec() };
    let decoded = decode_command(&encode_command(&cmd).unwrap()).unwrap();
    assert_eq!(decoded, cmd);
}

#[test]
fn test_encode_decode_set() {
    let cmd = Command::Set {
        key: b"mykey".to_vec(),
        value: b"myvalue".to_vec(),
    };
    let decoded = decode_command(&encode_command(&cmd).unwrap()).unwrap();
    assert_eq!(decoded, cmd);
}

#[test]
fn test_set_with_empty_value() {
    let cmd = Command::Set {
        key: b"k".to_vec(),
        value: Vec::new(),
    };
    let decoded = decode_command(&encode_command(&cmd).unwrap()).unwrap();
    assert_eq!(decoded, cmd);
}

#[test]
fn test_encode_empty_payload_commands() {
    for (cmd, tag) in [
        (Command::Print, 0x03u8),
        (Command::PrintReverse, 0x04),
        (Command::Ping, 0x05),
    ] {
        let encoded = encode_command(&cmd).unwrap();
        assert_eq!(encoded, vec![tag, 0, 0, 0, 0]);
        assert_eq!(decode_command(&encoded).unwrap(), cmd);
    }
}

#[test]
fn test_get_wire_layout() {
    let encoded = encode_command(&Command::Get { key: b"ab".to_vec() }).unwrap();
    assert_eq!(encoded, vec![0x01, 0, 0, 0, 6, 0, 0, 0, 2, b'a', b'b']);
}

// =============================================================================
// Malformed Command Tests
// =============================================================================

#[test]
fn test_decode_incomplete_header() {
    let result = decode_command(&[0x01, 0x00]);
    assert!(matches!(result, Err(KvError::Protocol(_))));
}

#[test]
fn test_decode_incomplete_payload() {
    let result = decode_command(&[0x01, 0, 0, 0, 10, 0, 0]);
    assert!(matches!(result, Err(KvError::Protocol(_))));
}

#[test]
fn test_decode_unknown_command() {
    let result = decode_command(&[0x7f, 0, 0, 0, 0]);
    assert!(matches!(result, Err(KvError::Protocol(_))));
}

#[test]
fn test_decode_key_length_past_payload() {
    // key_len says 9 but only 1 key byte follows
    let result = decode_command(&[0x02, 0, 0, 0, 5, 0, 0, 0, 9, b'k']);
    assert!(matches!(result, Err(KvError::Protocol(_))));
}

#[test]
fn test_decode_ping_with_payload() {
    let result = decode_command(&[0x05, 0, 0, 0, 1, 0xaa]);
    assert!(matches!(result, Err(KvError::Protocol(_))));
}

#[test]
fn test_decode_get_with_trailing_bytes() {
    let result = decode_command(&[0x01, 0, 0, 0, 6, 0, 0, 0, 1, b'k', b'x']);
    assert!(matches!(result, Err(KvError::Protocol(_))));
}

#[test]
fn test_decode_oversized_payload() {
    let len = (MAX_PAYLOAD_SIZE + 1).to_be_bytes();
    let bytes = [0x03, len[0], len[1], len[2], len[3]];
    assert!(matches!(decode_command(&bytes), Err(KvError::Protocol(_))));
}

#[test]
fn test_encode_oversized_set_fails() {
    let cmd = Command::Set {
        key: b"k".to_vec(),
        value: vec![0u8; MAX_PAYLOAD_SIZE as usize],
    };
    assert!(matches!(encode_command(&cmd), Err(KvError::Protocol(_))));
}

#[test]
fn test_encode_set_at_payload_limit() {
    // key_len (4) + key (1) + value fills the payload exactly
    let cmd = Command::Set {
        key: b"k".to_vec(),
        value: vec![0u8; MAX_PAYLOAD_SIZE as usize - 5],
    };
    let encoded = encode_command(&cmd).unwrap();
    assert_eq!(encoded.len(), HEADER_SIZE + MAX_PAYLOAD_SIZE as usize);
    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_write_oversized_command_writes_nothing() {
    let mut buffer = Vec::new();
    let cmd = Command::Get {
        key: vec![b'x'; MAX_PAYLOAD_SIZE as usize],
    };
    assert!(matches!(write_command(&mut buffer, &cmd), Err(KvError::Protocol(_))));
    assert!(buffer.is_empty());
}

#[test]
fn test_encode_oversized_response_fails() {
    let response = Response::ok(Some(vec![0u8; MAX_PAYLOAD_SIZE as usize + 1]));
    assert!(matches!(encode_response(&response), Err(KvError::Protocol(_))));
}

// =============================================================================
// Response Tests
// =============================================================================

#[test]
fn test_encode_decode_responses() {
    for response in [
        Response::ok(Some(b"value".to_vec())),
        Response::ok(None),
        Response::not_found(),
        Response::error("boom"),
    ] {
        let decoded = decode_response(&encode_response(&response).unwrap()).unwrap();
        assert_eq!(decoded, response);
    }
}

#[test]
fn test_response_header_size() {
    let encoded = encode_response(&Response::not_found()).unwrap();
    assert_eq!(encoded.len(), HEADER_SIZE);
    assert_eq!(encoded[0], Status::NotFound as u8);
}

#[test]
fn test_decode_unknown_status() {
    let result = decode_response(&[0x09, 0, 0, 0, 0]);
    assert!(matches!(result, Err(KvError::Protocol(_))));
}

#[test]
fn test_payload_text() {
    assert_eq!(Response::error("bad").payload_text(), "bad");
    assert_eq!(Response::ok(None).payload_text(), "");
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_multiple_commands() {
    let mut buffer = Vec::new();
    write_command(&mut buffer, &Command::Set { key: b"a".to_vec(), value: b"1".to_vec() }).unwrap();
    write_command(&mut buffer, &Command::Print).unwrap();
    write_command(&mut buffer, &Command::Get { key: b"a".to_vec() }).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert!(matches!(read_command(&mut cursor).unwrap(), Command::Set { .. }));
    assert_eq!(read_command(&mut cursor).unwrap(), Command::Print);
    assert_eq!(read_command(&mut cursor).unwrap(), Command::Get { key: b"a".to_vec() });

    match read_command(&mut cursor) {
        Err(KvError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("expected EOF, got {:?}", other),
    }
}

#[test]
fn test_stream_response() {
    let mut buffer = Vec::new();
    write_response(&mut buffer, &Response::ok(Some(b"{}".to_vec()))).unwrap();

    let mut cursor = Cursor::new(buffer);
    let response = read_response(&mut cursor).unwrap();
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.payload_text(), "{}");
}

#[test]
fn test_stream_truncated_payload() {
    let mut bytes = encode_command(&Command::Get { key: b"hello".to_vec() }).unwrap();
    bytes.truncate(bytes.len() - 2);

    let mut cursor = Cursor::new(bytes);
    assert!(matches!(read_command(&mut cursor), Err(KvError::Io(_))));
}
