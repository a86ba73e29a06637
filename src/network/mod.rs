//! Network Module
//!
//! Transport and the client connection.
//!
//! ## Architecture
//! - One blocking TCP stream per connection
//! - One command in flight at a time; callers sharing a connection
//!   across threads must serialize access themselves
//! - Every verb routed through the protocol engine

mod transport;
mod connection;

pub use transport::Transport;
pub use connection::{Connection, PutOptions};
