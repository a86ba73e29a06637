//! Response definitions
//!
//! Represents status lines sent back by the server.

use std::fmt;

/// Response status tokens
///
/// The closed alphabet of status words the server may answer with. Tokens
/// outside this set are kept verbatim in [`Reply::token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Inserted,
    Buried,
    JobTooBig,
    Draining,
    ExpectedCrlf,
    Reserved,
    DeadlineSoon,
    TimedOut,
    Deleted,
    NotFound,
    Released,
    Touched,
    Kicked,
    Found,
    Using,
    Watching,
    NotIgnored,
    Ok,
    Paused,
    OutOfMemory,
    InternalError,
    BadFormat,
    UnknownCommand,
}

impl Status {
    /// Wire token for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Inserted => "INSERTED",
            Status::Buried => "BURIED",
            Status::JobTooBig => "JOB_TOO_BIG",
            Status::Draining => "DRAINING",
            Status::ExpectedCrlf => "EXPECTED_CRLF",
            Status::Reserved => "RESERVED",
            Status::DeadlineSoon => "DEADLINE_SOON",
            Status::TimedOut => "TIMED_OUT",
            Status::Deleted => "DELETED",
            Status::NotFound => "NOT_FOUND",
            Status::Released => "RELEASED",
            Status::Touched => "TOUCHED",
            Status::Kicked => "KICKED",
            Status::Found => "FOUND",
            Status::Using => "USING",
            Status::Watching => "WATCHING",
            Status::NotIgnored => "NOT_IGNORED",
            Status::Ok => "OK",
            Status::Paused => "PAUSED",
            Status::OutOfMemory => "OUT_OF_MEMORY",
            Status::InternalError => "INTERNAL_ERROR",
            Status::BadFormat => "BAD_FORMAT",
            Status::UnknownCommand => "UNKNOWN_COMMAND",
        }
    }

    /// Look up a status from its wire token
    pub fn from_token(token: &str) -> Option<Status> {
        let status = match token {
            "INSERTED" => Status::Inserted,
            "BURIED" => Status::Buried,
            "JOB_TOO_BIG" => Status::JobTooBig,
            "DRAINING" => Status::Draining,
            "EXPECTED_CRLF" => Status::ExpectedCrlf,
            "RESERVED" => Status::Reserved,
            "DEADLINE_SOON" => Status::DeadlineSoon,
            "TIMED_OUT" => Status::TimedOut,
            "DELETED" => Status::Deleted,
            "NOT_FOUND" => Status::NotFound,
            "RELEASED" => Status::Released,
            "TOUCHED" => Status::Touched,
            "KICKED" => Status::Kicked,
            "FOUND" => Status::Found,
            "USING" => Status::Using,
            "WATCHING" => Status::Watching,
            "NOT_IGNORED" => Status::NotIgnored,
            "OK" => Status::Ok,
            "PAUSED" => Status::Paused,
            "OUT_OF_MEMORY" => Status::OutOfMemory,
            "INTERNAL_ERROR" => Status::InternalError,
            "BAD_FORMAT" => Status::BadFormat,
            "UNKNOWN_COMMAND" => Status::UnknownCommand,
            _ => return None,
        };
        Some(status)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Status token exactly as received
    pub token: String,

    /// Whitespace-separated arguments following the status token
    pub args: Vec<String>,
}

impl Reply {
    /// The recognised status, or `None` for a token outside the alphabet
    pub fn status(&self) -> Option<Status> {
        Status::from_token(&self.token)
    }
}
