//! Protocol Module
//!
//! Defines the line-oriented text protocol spoken with the queue daemon.
//!
//! ## Protocol Format
//!
//! Commands are a verb plus space-separated arguments, terminated by CRLF.
//! `put` is followed by the job body and a second CRLF.
//!
//! Replies are a status token plus arguments. Replies carrying a job or a
//! structured document end with a byte count and are followed by that many
//! bytes and a 2-byte trailer.
//!
//! ### Verbs
//! - put, reserve, reserve-with-timeout, delete, release, bury, touch
//! - kick, kick-job, peek, peek-ready, peek-delayed, peek-buried
//! - use, watch, ignore, list-tube-used, list-tubes, list-tubes-watched
//! - stats, stats-tube, stats-job, pause-tube, quit

mod command;
mod response;
mod codec;

pub use command::{Command, TubeName, MAX_TUBE_NAME_LEN};
pub use response::{Reply, Status};
pub use codec::{
    encode_command, parse_reply, read_body, read_reply, write_command, MAX_BODY_SIZE,
    TRAILER_SIZE,
};
