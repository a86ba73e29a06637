//! # beanwire
//!
//! A synchronous client for the beanstalkd work-queue protocol:
//! - One blocking TCP stream per connection, one command in flight
//! - Typed calls for every protocol verb
//! - Job handles with a reserve/release/bury/delete lifecycle
//! - Pluggable decoding of structured-document (YAML) replies
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Code                          │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//!                ▼                              ▼
//!   ┌────────────────────────┐      ┌───────────────────────┐
//!   │       Connection       │◄─────│          Job          │
//!   │   (one call per verb)  │      │ (delete/release/bury) │
//!   └────────────┬───────────┘      └───────────────────────┘
//!                │
//! ┌──────────────▼──────────────────────────────────────────────┐
//! │                   Protocol Engine                            │
//! │     (status dispatch, body + trailer, document decoding)     │
//! └──────────────┬──────────────────────────────────────────────┘
//!                │
//!                ▼
//!         ┌─────────────┐
//!         │  Transport  │
//!         │ (TcpStream) │
//!         └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use beanwire::Connection;
//!
//! let mut conn = Connection::open("localhost", 11300)?;
//! conn.use_tube("jobs")?;
//! conn.watch("jobs")?;
//! let id = conn.put(b"hello")?;
//!
//! if let Some(mut job) = conn.reserve(None)? {
//!     assert_eq!(job.id(), id);
//!     job.delete(&mut conn)?;
//! }
//! # Ok::<(), beanwire::BeanError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod document;
pub mod engine;
pub mod network;
pub mod job;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BeanError, Result};
pub use config::Config;
pub use document::{Decoder, Document, JobStats};
pub use engine::{Engine, Outcome};
pub use network::{Connection, PutOptions, Transport};
pub use job::Job;

// =============================================================================
// Protocol Defaults
// =============================================================================

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 11300;

/// Midpoint of the 32-bit priority range
pub const DEFAULT_PRIORITY: u32 = 1 << 31;

/// Default time-to-run, in seconds
pub const DEFAULT_TTR: u32 = 120;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of beanwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
