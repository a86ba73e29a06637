//! Shared test helpers
//!
//! A scripted in-memory transport: replies are queued up front and every
//! byte the client writes is recorded.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io::{self, Cursor, Read, Write};
use std::rc::Rc;

use beanwire::{Config, Connection, Decoder, Transport};

/// Handle on what the client sent
#[derive(Clone, Default)]
pub struct Wire {
    written: Rc<RefCell<Vec<u8>>>,
    shut_down: Rc<Cell<bool>>,
}

impl Wire {
    pub fn sent(&self) -> Vec<u8> {
        self.written.borrow().clone()
    }

    pub fn sent_str(&self) -> String {
        String::from_utf8_lossy(&self.written.borrow()).into_owned()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.get()
    }
}

pub struct MockStream {
    input: Cursor<Vec<u8>>,
    wire: Wire,
    fail_writes: bool,
}

impl MockStream {
    pub fn new(replies: &[u8]) -> (Self, Wire) {
        let wire = Wire::default();
        let stream = Self {
            input: Cursor::new(replies.to_vec()),
            wire: wire.clone(),
            fail_writes: false,
        };
        (stream, wire)
    }

    /// A stream whose writes fail with a broken pipe
    pub fn broken() -> Self {
        Self {
            input: Cursor::new(Vec::new()),
            wire: Wire::default(),
            fail_writes: true,
        }
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
        }
        self.wire.written.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for MockStream {
    fn shutdown(&mut self) -> io::Result<()> {
        self.wire.shut_down.set(true);
        Ok(())
    }
}

/// Connection over scripted replies, with raw (identity) documents
pub fn connection(replies: &[u8]) -> (Connection<MockStream>, Wire) {
    connection_with(replies, Decoder::Identity)
}

pub fn connection_with(replies: &[u8], decoder: Decoder) -> (Connection<MockStream>, Wire) {
    let (stream, wire) = MockStream::new(replies);
    let config = Config::builder().decoder(decoder).build();
    (Connection::with_stream(stream, config), wire)
}

/// Frame a body-bearing reply
pub fn framed(status_line: &str, body: &[u8]) -> Vec<u8> {
    let mut reply = format!("{}\r\n", status_line).into_bytes();
    reply.extend_from_slice(body);
    reply.extend_from_slice(b"\r\n");
    reply
}
