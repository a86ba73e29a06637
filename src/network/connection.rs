//! Client Connection
//!
//! One typed call per protocol verb, each a fixed set of expected statuses
//! handed to the protocol engine.
//!
//! Tube names are taken as any byte view (`&[u8]`, `&str`, `Vec<u8>`) and
//! checked against the tube-name alphabet before anything is written, so
//! both spellings produce the same command line.

use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::Transport;
use crate::config::Config;
use crate::document::Document;
use crate::engine::{Engine, Outcome};
use crate::error::{BeanError, Result};
use crate::job::Job;
use crate::protocol::{Command, Status, TubeName};
use crate::{DEFAULT_PRIORITY, DEFAULT_TTR};

/// Scheduling parameters for `put`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PutOptions {
    /// Lower is more urgent
    pub priority: u32,

    /// Seconds before the job becomes ready
    pub delay: u32,

    /// Seconds a reserver has before the job reverts to ready
    pub ttr: u32,
}

impl Default for PutOptions {
    fn default() -> Self {
        Self {
            priority: DEFAULT_PRIORITY,
            delay: 0,
            ttr: DEFAULT_TTR,
        }
    }
}

/// A client connection to a queue daemon
///
/// Connecting is eager. Dropping the connection closes it, sending a
/// best-effort `quit`.
pub struct Connection<S: Transport = TcpStream> {
    config: Config,

    /// `None` once closed
    engine: Option<Engine<S>>,
}

impl Connection<TcpStream> {
    /// Connect using the given config
    pub fn connect(config: Config) -> Result<Self> {
        let stream = open_stream(&config)?;
        Ok(Self::with_stream(stream, config))
    }

    /// Connect to `host:port` with default settings
    pub fn open(host: impl Into<String>, port: u16) -> Result<Self> {
        Self::connect(Config::builder().host(host).port(port).build())
    }

    /// Close and reopen the TCP stream
    ///
    /// Anything buffered from the old stream is discarded.
    pub fn reconnect(&mut self) -> Result<()> {
        self.close();
        let stream = open_stream(&self.config)?;
        self.engine = Some(Engine::new(stream, self.config.decoder.clone()));
        tracing::debug!("Reconnected to {}", self.config.addr());
        Ok(())
    }
}

fn open_stream(config: &Config) -> Result<TcpStream> {
    let addr = config.addr();
    let mut last_err = None;

    for socket_addr in (config.host.as_str(), config.port).to_socket_addrs()? {
        let attempt = match config.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&socket_addr, timeout),
            None => TcpStream::connect(socket_addr),
        };

        match attempt {
            Ok(stream) => {
                stream.set_nodelay(true)?;
                stream.set_read_timeout(None)?;
                stream.set_write_timeout(None)?;
                tracing::debug!("Connected to {} ({})", addr, socket_addr);
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", socket_addr, e);
                last_err = Some(e);
            }
        }
    }

    Err(BeanError::Io(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("{} resolved to no addresses", addr),
        )
    })))
}

impl<S: Transport> Connection<S> {
    /// Wrap an already-open transport
    pub fn with_stream(stream: S, config: Config) -> Self {
        let engine = Engine::new(stream, config.decoder.clone());
        Self {
            config,
            engine: Some(engine),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.engine.is_some()
    }

    /// The underlying transport, if still open
    pub fn transport(&self) -> Option<&S> {
        self.engine.as_ref().map(Engine::get_ref)
    }

    /// Send `quit` and drop the transport; failures are ignored
    pub fn close(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            if let Err(e) = engine.send(&Command::Quit) {
                tracing::debug!("quit not delivered: {}", e);
            }
            let mut stream = engine.into_inner();
            if let Err(e) = stream.shutdown() {
                tracing::debug!("shutdown failed: {}", e);
            }
            tracing::debug!("Closed connection to {}", self.config.addr());
        }
    }

    fn engine(&mut self) -> Result<&mut Engine<S>> {
        self.engine.as_mut().ok_or(BeanError::NotConnected)
    }

    // =========================================================================
    // Producer Verbs
    // =========================================================================

    /// Put a job into the used tube with default scheduling. Returns the job id.
    pub fn put(&mut self, body: &[u8]) -> Result<u64> {
        self.put_with(body, PutOptions::default())
    }

    /// Put a job into the used tube. Returns the job id.
    pub fn put_with(&mut self, body: &[u8], options: PutOptions) -> Result<u64> {
        let command = Command::Put {
            priority: options.priority,
            delay: options.delay,
            ttr: options.ttr,
            body,
        };
        let id = self.engine()?.interact_value(
            &command,
            &[Status::Inserted],
            &[Status::JobTooBig, Status::Buried, Status::Draining],
        )?;
        parse_number(&command, &id)
    }

    // =========================================================================
    // Consumer Verbs
    // =========================================================================

    /// Reserve a job from the watched tubes
    ///
    /// Without a timeout this blocks until a job is available. With one,
    /// `Ok(None)` means nothing arrived in time. A `DEADLINE_SOON` warning
    /// surfaces as [`BeanError::DeadlineSoon`].
    pub fn reserve(&mut self, timeout: Option<Duration>) -> Result<Option<Job>> {
        let command = match timeout {
            Some(timeout) => Command::ReserveWithTimeout {
                seconds: timeout.as_secs(),
            },
            None => Command::Reserve,
        };

        let outcome = self.engine()?.dispatch_job(
            &command,
            &[Status::Reserved],
            &[Status::DeadlineSoon, Status::TimedOut],
            true,
        )?;

        match outcome {
            Outcome::Done(job) => Ok(Some(job)),
            Outcome::Failed {
                status: Status::TimedOut,
                ..
            } => {
                tracing::debug!("reserve timed out");
                Ok(None)
            }
            Outcome::Failed {
                status: Status::DeadlineSoon,
                args,
            } => Err(BeanError::DeadlineSoon { args }),
            failed => failed.into_result(command.verb()).map(Some),
        }
    }

    /// Delete a job by id
    pub fn delete(&mut self, id: u64) -> Result<()> {
        self.engine()?
            .interact(&Command::Delete { id }, &[Status::Deleted], &[Status::NotFound])?;
        Ok(())
    }

    /// Release a reserved job back into the ready queue
    pub fn release(&mut self, id: u64, priority: u32, delay: u32) -> Result<()> {
        self.engine()?.interact(
            &Command::Release {
                id,
                priority,
                delay,
            },
            &[Status::Released, Status::Buried],
            &[Status::NotFound],
        )?;
        Ok(())
    }

    /// Bury a job by id
    pub fn bury(&mut self, id: u64, priority: u32) -> Result<()> {
        self.engine()?.interact(
            &Command::Bury { id, priority },
            &[Status::Buried],
            &[Status::NotFound],
        )?;
        Ok(())
    }

    /// Request more time to work on a reserved job
    pub fn touch(&mut self, id: u64) -> Result<()> {
        self.engine()?
            .interact(&Command::Touch { id }, &[Status::Touched], &[Status::NotFound])?;
        Ok(())
    }

    /// Kick at most `bound` jobs into the ready queue. Returns how many moved.
    pub fn kick(&mut self, bound: u64) -> Result<u64> {
        let command = Command::Kick { bound };
        let count = self
            .engine()?
            .interact_value(&command, &[Status::Kicked], &[])?;
        parse_number(&command, &count)
    }

    /// Kick one buried or delayed job
    pub fn kick_job(&mut self, id: u64) -> Result<()> {
        self.engine()?
            .interact(&Command::KickJob { id }, &[Status::Kicked], &[Status::NotFound])?;
        Ok(())
    }

    // =========================================================================
    // Peeks
    // =========================================================================

    /// Peek at a job by id
    pub fn peek(&mut self, id: u64) -> Result<Option<Job>> {
        self.engine()?.interact_peek(&Command::Peek { id })
    }

    /// Peek at the next ready job in the used tube
    pub fn peek_ready(&mut self) -> Result<Option<Job>> {
        self.engine()?.interact_peek(&Command::PeekReady)
    }

    /// Peek at the delayed job with the shortest delay left
    pub fn peek_delayed(&mut self) -> Result<Option<Job>> {
        self.engine()?.interact_peek(&Command::PeekDelayed)
    }

    /// Peek at the next buried job
    pub fn peek_buried(&mut self) -> Result<Option<Job>> {
        self.engine()?.interact_peek(&Command::PeekBuried)
    }

    // =========================================================================
    // Tubes
    // =========================================================================

    /// All existing tubes
    pub fn tubes(&mut self) -> Result<Document> {
        self.engine()?
            .interact_document(&Command::ListTubes, &[Status::Ok], &[])
    }

    /// The tube `put` currently targets
    pub fn using(&mut self) -> Result<String> {
        self.engine()?
            .interact_value(&Command::ListTubeUsed, &[Status::Using], &[])
    }

    /// Target a tube for subsequent `put`s. Returns the tube name.
    ///
    /// `name` is validated as a [`TubeName`] first; a bad name sends nothing.
    pub fn use_tube(&mut self, name: impl AsRef<[u8]>) -> Result<String> {
        let tube = TubeName::new(name)?;
        self.engine()?
            .interact_value(&Command::Use { tube: &tube }, &[Status::Using], &[])
    }

    /// Tubes currently watched by `reserve`
    pub fn watching(&mut self) -> Result<Document> {
        self.engine()?
            .interact_document(&Command::ListTubesWatched, &[Status::Ok], &[])
    }

    /// Add a tube to the watch list. Returns the number of watched tubes.
    pub fn watch(&mut self, name: impl AsRef<[u8]>) -> Result<u64> {
        let tube = TubeName::new(name)?;
        let command = Command::Watch { tube: &tube };
        let count = self
            .engine()?
            .interact_value(&command, &[Status::Watching], &[])?;
        parse_number(&command, &count)
    }

    /// Remove a tube from the watch list. Returns the number of watched tubes.
    ///
    /// The last watched tube cannot be ignored; that refusal is reported as
    /// one tube still watched.
    pub fn ignore(&mut self, name: impl AsRef<[u8]>) -> Result<u64> {
        let tube = TubeName::new(name)?;
        let command = Command::Ignore { tube: &tube };
        let outcome =
            self.engine()?
                .dispatch(&command, &[Status::Watching], &[Status::NotIgnored])?;

        match outcome {
            Outcome::Done(args) => {
                let count = args.first().ok_or_else(|| {
                    BeanError::Protocol(format!("{} reply: missing value", command.verb()))
                })?;
                parse_number(&command, count)
            }
            Outcome::Failed { .. } => {
                tracing::debug!(tube = %tube, "last watched tube not ignored");
                Ok(1)
            }
        }
    }

    /// Pause a tube for `delay` seconds
    pub fn pause_tube(&mut self, name: impl AsRef<[u8]>, delay: u32) -> Result<()> {
        let tube = TubeName::new(name)?;
        self.engine()?.interact(
            &Command::PauseTube { tube: &tube, delay },
            &[Status::Paused],
            &[Status::NotFound],
        )?;
        Ok(())
    }

    // =========================================================================
    // Stats
    // =========================================================================

    /// Server-wide statistics
    pub fn stats(&mut self) -> Result<Document> {
        self.engine()?
            .interact_document(&Command::Stats, &[Status::Ok], &[])
    }

    /// Statistics for one tube
    pub fn stats_tube(&mut self, name: impl AsRef<[u8]>) -> Result<Document> {
        let tube = TubeName::new(name)?;
        self.engine()?.interact_document(
            &Command::StatsTube { tube: &tube },
            &[Status::Ok],
            &[Status::NotFound],
        )
    }

    /// Statistics for one job
    pub fn stats_job(&mut self, id: u64) -> Result<Document> {
        self.engine()?.interact_document(
            &Command::StatsJob { id },
            &[Status::Ok],
            &[Status::NotFound],
        )
    }
}

impl<S: Transport> Drop for Connection<S> {
    fn drop(&mut self) {
        self.close();
    }
}

fn parse_number(command: &Command<'_>, value: &str) -> Result<u64> {
    value.parse().map_err(|_| {
        BeanError::Protocol(format!(
            "{} reply: expected a number, got {:?}",
            command.verb(),
            value
        ))
    })
}
