//! Transport
//!
//! The byte stream a connection talks over.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

/// A bidirectional byte stream owned by one connection
pub trait Transport: Read + Write {
    /// Best-effort teardown of the underlying stream
    fn shutdown(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for TcpStream {
    fn shutdown(&mut self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}
