//! Engine Module
//!
//! The protocol interaction engine that every verb goes through.
//!
//! ## Responsibilities
//! - Send one command and read exactly one status line
//! - Classify the status against the caller's success and failure sets
//! - Consume a declared-length body and its trailer so the stream stays framed
//! - Apply the configured decoder to structured-document bodies

use std::io::BufReader;

use crate::document::{Decoder, Document};
use crate::error::{BeanError, Result};
use crate::job::Job;
use crate::network::Transport;
use crate::protocol::{encode_command, read_body, read_reply, Command, Status};

/// Classified reply to one command
///
/// `Failed` carries a status from the caller's declared failure set. Call
/// sites that expect such an outcome match on it; the rest turn it into
/// [`BeanError::CommandFailed`] with [`Outcome::into_result`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Done(T),
    Failed { status: Status, args: Vec<String> },
}

impl<T> Outcome<T> {
    pub fn into_result(self, verb: &str) -> Result<T> {
        match self {
            Outcome::Done(value) => Ok(value),
            Outcome::Failed { status, args } => Err(BeanError::CommandFailed {
                verb: verb.to_string(),
                status,
                args,
            }),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Done(value) => Outcome::Done(f(value)),
            Outcome::Failed { status, args } => Outcome::Failed { status, args },
        }
    }
}

/// The protocol interaction engine
///
/// ## Framing Model
///
/// Exactly one command is in flight at a time. Every call sends its command,
/// then drains the whole reply (status line, and body plus trailer when the
/// status declares one) before returning. A short body read would leave the
/// next command reading stale bytes, so body length and trailer consumption
/// are exact.
pub struct Engine<S: Transport> {
    /// Buffered transport; writes go straight through `get_mut`
    reader: BufReader<S>,

    /// Decoder for structured-document bodies
    decoder: Decoder,
}

impl<S: Transport> Engine<S> {
    pub fn new(stream: S, decoder: Decoder) -> Self {
        Self {
            reader: BufReader::new(stream),
            decoder: decoder.resolve(),
        }
    }

    pub fn get_ref(&self) -> &S {
        self.reader.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut S {
        self.reader.get_mut()
    }

    /// Tear down, discarding any buffered unread bytes
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Write a command without waiting for a reply
    pub fn send(&mut self, command: &Command<'_>) -> Result<()> {
        tracing::trace!(verb = command.verb(), "send");
        let bytes = encode_command(command);
        let stream = self.reader.get_mut();
        stream.write_all(&bytes)?;
        stream.flush()?;
        Ok(())
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Send a command and classify the reply's status
    pub fn dispatch(
        &mut self,
        command: &Command<'_>,
        ok: &[Status],
        err: &[Status],
    ) -> Result<Outcome<Vec<String>>> {
        self.send(command)?;
        let reply = read_reply(&mut self.reader)?;
        tracing::trace!(verb = command.verb(), status = %reply.token, "reply");

        match reply.status() {
            Some(status) if ok.contains(&status) => Ok(Outcome::Done(reply.args)),
            Some(status) if err.contains(&status) => Ok(Outcome::Failed {
                status,
                args: reply.args,
            }),
            _ => Err(BeanError::UnexpectedResponse {
                verb: command.verb().to_string(),
                status: reply.token,
                args: reply.args,
            }),
        }
    }

    /// Like [`dispatch`](Self::dispatch), reading `<id> <bytes>` and a job body on success
    pub fn dispatch_job(
        &mut self,
        command: &Command<'_>,
        ok: &[Status],
        err: &[Status],
        reserved: bool,
    ) -> Result<Outcome<Job>> {
        let args = match self.dispatch(command, ok, err)? {
            Outcome::Done(args) => args,
            Outcome::Failed { status, args } => return Ok(Outcome::Failed { status, args }),
        };

        let (id, size) = match args.as_slice() {
            [id, size] => (id, parse_arg::<usize>(command, size)?),
            _ => {
                return Err(BeanError::Protocol(format!(
                    "{} reply: expected job id and size, got {:?}",
                    command.verb(),
                    args
                )))
            }
        };

        // Body is drained before the id is checked so a bad id keeps the stream framed
        let body = read_body(&mut self.reader, size)?;
        let id = parse_arg::<u64>(command, id)?;
        Ok(Outcome::Done(Job::new(id, body, reserved)))
    }

    // =========================================================================
    // Interaction Helpers
    // =========================================================================

    /// Send a command; a declared failure becomes `CommandFailed`
    pub fn interact(
        &mut self,
        command: &Command<'_>,
        ok: &[Status],
        err: &[Status],
    ) -> Result<Vec<String>> {
        self.dispatch(command, ok, err)?.into_result(command.verb())
    }

    /// Send a command and return the first argument of the reply
    pub fn interact_value(
        &mut self,
        command: &Command<'_>,
        ok: &[Status],
        err: &[Status],
    ) -> Result<String> {
        self.interact(command, ok, err)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                BeanError::Protocol(format!("{} reply: missing value", command.verb()))
            })
    }

    /// Send a command whose success reply carries a job
    pub fn interact_job(
        &mut self,
        command: &Command<'_>,
        ok: &[Status],
        err: &[Status],
        reserved: bool,
    ) -> Result<Job> {
        self.dispatch_job(command, ok, err, reserved)?
            .into_result(command.verb())
    }

    /// Send a command whose success reply carries a structured document
    pub fn interact_document(
        &mut self,
        command: &Command<'_>,
        ok: &[Status],
        err: &[Status],
    ) -> Result<Document> {
        let args = self.interact(command, ok, err)?;

        let size = match args.as_slice() {
            [size] => parse_arg::<usize>(command, size)?,
            _ => {
                return Err(BeanError::Protocol(format!(
                    "{} reply: expected body size, got {:?}",
                    command.verb(),
                    args
                )))
            }
        };

        let body = read_body(&mut self.reader, size)?;
        self.decoder.decode(body)
    }

    /// Peek with `FOUND`/`NOT_FOUND`; a missing job is `None`
    pub fn interact_peek(&mut self, command: &Command<'_>) -> Result<Option<Job>> {
        match self.dispatch_job(command, &[Status::Found], &[Status::NotFound], false)? {
            Outcome::Done(job) => Ok(Some(job)),
            Outcome::Failed { .. } => {
                tracing::debug!(verb = command.verb(), "peek found nothing");
                Ok(None)
            }
        }
    }
}

fn parse_arg<T: std::str::FromStr>(command: &Command<'_>, arg: &str) -> Result<T> {
    arg.parse().map_err(|_| {
        BeanError::Protocol(format!(
            "{} reply: malformed numeric argument {:?}",
            command.verb(),
            arg
        ))
    })
}
