//! Job Module
//!
//! A handle on one unit of work returned by `reserve` or a peek.
//!
//! ## Lifecycle
//! - Jobs from `reserve` start reserved; peeked jobs do not
//! - `delete`, `release` and `bury` end the reservation; afterwards
//!   `release`, `bury` and `touch` do nothing
//! - `delete` and `kick` always reach the server, but tolerate the job
//!   already being gone
//!
//! A job does not own its connection. Lifecycle calls borrow the connection
//! that produced the job for the duration of the call.

use bytes::Bytes;

use crate::document::Document;
use crate::error::{BeanError, Result};
use crate::network::{Connection, Transport};
use crate::protocol::Status;
use crate::DEFAULT_PRIORITY;

/// A job fetched from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Server-assigned id
    id: u64,

    /// Opaque body bytes
    body: Bytes,

    /// Whether this client currently holds the reservation
    reserved: bool,
}

impl Job {
    pub fn new(id: u64, body: impl Into<Bytes>, reserved: bool) -> Self {
        Self {
            id,
            body: body.into(),
            reserved,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    pub fn is_reserved(&self) -> bool {
        self.reserved
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Delete this job
    pub fn delete<S: Transport>(&mut self, conn: &mut Connection<S>) -> Result<()> {
        let result = conn.delete(self.id);
        self.reserved = false;
        tolerate_not_found(result, self.id)
    }

    /// Release this job back into the ready queue
    ///
    /// Without an explicit priority the job keeps its current one.
    pub fn release<S: Transport>(
        &mut self,
        conn: &mut Connection<S>,
        priority: Option<u32>,
        delay: u32,
    ) -> Result<()> {
        if !self.reserved {
            return Ok(());
        }

        let priority = match priority {
            Some(priority) => priority,
            None => self.priority(conn)?,
        };
        conn.release(self.id, priority, delay)?;
        self.reserved = false;
        Ok(())
    }

    /// Bury this job
    pub fn bury<S: Transport>(
        &mut self,
        conn: &mut Connection<S>,
        priority: Option<u32>,
    ) -> Result<()> {
        if !self.reserved {
            return Ok(());
        }

        let priority = match priority {
            Some(priority) => priority,
            None => self.priority(conn)?,
        };
        conn.bury(self.id, priority)?;
        self.reserved = false;
        Ok(())
    }

    /// Extend the reservation; the job stays reserved
    pub fn touch<S: Transport>(&mut self, conn: &mut Connection<S>) -> Result<()> {
        if self.reserved {
            conn.touch(self.id)?;
        }
        Ok(())
    }

    /// Move this job from buried or delayed to ready
    pub fn kick<S: Transport>(&self, conn: &mut Connection<S>) -> Result<()> {
        tolerate_not_found(conn.kick_job(self.id), self.id)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Server statistics for this job
    pub fn stats<S: Transport>(&self, conn: &mut Connection<S>) -> Result<Document> {
        conn.stats_job(self.id)
    }

    /// Current priority, or the default when stats are not decoded
    pub fn priority<S: Transport>(&self, conn: &mut Connection<S>) -> Result<u32> {
        let stats = self.stats(conn)?;
        Ok(stats
            .get_u64("pri")
            .and_then(|pri| u32::try_from(pri).ok())
            .unwrap_or(DEFAULT_PRIORITY))
    }
}

fn tolerate_not_found(result: Result<()>, id: u64) -> Result<()> {
    match result {
        Err(BeanError::CommandFailed {
            status: Status::NotFound,
            ..
        }) => {
            tracing::debug!(id = id, "job already gone");
            Ok(())
        }
        other => other,
    }
}
