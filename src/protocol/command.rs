//! Command definitions
//!
//! Represents requests sent to the server.

use std::fmt;

use crate::error::{BeanError, Result};

/// Longest tube name the server accepts
pub const MAX_TUBE_NAME_LEN: usize = 200;

/// A validated tube name
///
/// Tube names travel inside a whitespace-delimited command line, so they
/// are checked against the server's name alphabet before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TubeName(String);

impl TubeName {
    pub fn new(name: impl AsRef<[u8]>) -> Result<Self> {
        let bytes = name.as_ref();

        if bytes.is_empty() {
            return Err(BeanError::Validation("Tube name must not be empty".to_string()));
        }
        if bytes.len() > MAX_TUBE_NAME_LEN {
            return Err(BeanError::Validation(format!(
                "Tube name too long: {} bytes (max {})",
                bytes.len(),
                MAX_TUBE_NAME_LEN
            )));
        }
        if bytes[0] == b'-' {
            return Err(BeanError::Validation(
                "Tube name must not start with '-'".to_string(),
            ));
        }
        if let Some(&bad) = bytes.iter().find(|&&b| !is_name_byte(b)) {
            return Err(BeanError::Validation(format!(
                "Tube name contains invalid byte 0x{:02x}",
                bad
            )));
        }

        // Alphabet is pure ASCII
        Ok(Self(bytes.iter().map(|&b| b as char).collect()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TubeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"-+/;.$_()".contains(&b)
}

/// A request to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// Enqueue a job into the used tube
    Put {
        priority: u32,
        delay: u32,
        ttr: u32,
        body: &'a [u8],
    },

    /// Reserve a job, blocking indefinitely
    Reserve,

    /// Reserve a job, waiting at most `seconds`
    ReserveWithTimeout { seconds: u64 },

    Delete { id: u64 },

    Release { id: u64, priority: u32, delay: u32 },

    Bury { id: u64, priority: u32 },

    Touch { id: u64 },

    /// Kick at most `bound` buried or delayed jobs
    Kick { bound: u64 },

    KickJob { id: u64 },

    Peek { id: u64 },
    PeekReady,
    PeekDelayed,
    PeekBuried,

    Use { tube: &'a TubeName },
    Watch { tube: &'a TubeName },
    Ignore { tube: &'a TubeName },
    ListTubeUsed,
    ListTubes,
    ListTubesWatched,

    Stats,
    StatsTube { tube: &'a TubeName },
    StatsJob { id: u64 },

    PauseTube { tube: &'a TubeName, delay: u32 },

    /// Close the connection
    Quit,
}

impl Command<'_> {
    /// The verb as it appears on the wire
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Put { .. } => "put",
            Command::Reserve => "reserve",
            Command::ReserveWithTimeout { .. } => "reserve-with-timeout",
            Command::Delete { .. } => "delete",
            Command::Release { .. } => "release",
            Command::Bury { .. } => "bury",
            Command::Touch { .. } => "touch",
            Command::Kick { .. } => "kick",
            Command::KickJob { .. } => "kick-job",
            Command::Peek { .. } => "peek",
            Command::PeekReady => "peek-ready",
            Command::PeekDelayed => "peek-delayed",
            Command::PeekBuried => "peek-buried",
            Command::Use { .. } => "use",
            Command::Watch { .. } => "watch",
            Command::Ignore { .. } => "ignore",
            Command::ListTubeUsed => "list-tube-used",
            Command::ListTubes => "list-tubes",
            Command::ListTubesWatched => "list-tubes-watched",
            Command::Stats => "stats",
            Command::StatsTube { .. } => "stats-tube",
            Command::StatsJob { .. } => "stats-job",
            Command::PauseTube { .. } => "pause-tube",
            Command::Quit => "quit",
        }
    }
}
