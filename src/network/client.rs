//! TCP Client
//!
//! Blocking request/response client for a SortedKV server.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{KvError, Result};
use crate::protocol::{read_response, write_command, Command, Response, Status};

/// A connection to a SortedKV server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| KvError::Network(format!("connect failed: {}", e)))?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Send one command and wait for its response
    pub fn request(&mut self, command: &Command) -> Result<Response> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader)
    }

    /// `None` when the server has no such key
    pub fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let response = self.request(&Command::Get { key: key.to_vec() })?;
        match response.status {
            Status::Ok => Ok(Some(response.payload.unwrap_or_default())),
            Status::NotFound => Ok(None),
            Status::Error => Err(server_error(&response)),
        }
    }

    pub fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let response = self.request(&Command::Set {
            key: key.to_vec(),
            value: value.to_vec(),
        })?;
        expect_ok(response).map(|_| ())
    }

    /// Ascending rendering, e.g. `{'a': '1', 'b': '2'}`
    pub fn print(&mut self) -> Result<String> {
        let response = self.request(&Command::Print)?;
        expect_ok(response).map(|r| r.payload_text())
    }

    /// Descending rendering
    pub fn print_reverse(&mut self) -> Result<String> {
        let response = self.request(&Command::PrintReverse)?;
        expect_ok(response).map(|r| r.payload_text())
    }

    pub fn ping(&mut self) -> Result<()> {
        let response = self.request(&Command::Ping)?;
        expect_ok(response).map(|_| ())
    }
}

fn expect_ok(response: Response) -> Result<Response> {
    match response.status {
        Status::Ok => Ok(response),
        Status::NotFound => Err(KvError::KeyNotFound),
        Status::Error => Err(server_error(&response)),
    }
}

fn server_error(response: &Response) -> KvError {
    KvError::Network(format!("server error: {}", response.payload_text()))
}
