//! beanwire CLI Client
//!
//! Command-line interface for poking at a beanstalkd server.

use std::time::Duration;

use beanwire::{Config, Connection, Document, Job, PutOptions, DEFAULT_PRIORITY, DEFAULT_TTR};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// beanwire CLI
#[derive(Parser, Debug)]
#[command(name = "beanwire-cli")]
#[command(about = "CLI for beanstalkd work queues")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = beanwire::DEFAULT_HOST)]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = beanwire::DEFAULT_PORT)]
    port: u16,

    /// Connect timeout in seconds
    #[arg(long)]
    connect_timeout: Option<u64>,

    /// Tube to use and watch
    #[arg(short, long)]
    tube: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Put a job into the tube
    Put {
        /// Job body
        body: String,

        #[arg(long, default_value_t = DEFAULT_PRIORITY)]
        priority: u32,

        #[arg(long, default_value_t = 0)]
        delay: u32,

        #[arg(long, default_value_t = DEFAULT_TTR)]
        ttr: u32,
    },

    /// Reserve a job and print it
    Reserve {
        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Delete the job after printing it
        #[arg(long)]
        delete: bool,
    },

    /// Delete a job by id
    Delete { id: u64 },

    /// Peek at a job by id
    Peek { id: u64 },

    /// Peek at the next ready job
    PeekReady,

    /// Peek at the next delayed job
    PeekDelayed,

    /// Peek at the next buried job
    PeekBuried,

    /// Kick up to `bound` buried or delayed jobs
    Kick {
        #[arg(default_value_t = 1)]
        bound: u64,
    },

    /// Kick one job by id
    KickJob { id: u64 },

    /// Pause the tube for some seconds
    Pause { delay: u32 },

    /// List all tubes
    Tubes,

    /// Print server, tube or job statistics
    Stats {
        /// Stats for this job instead of the server
        #[arg(long, conflicts_with = "of_tube")]
        job: Option<u64>,

        /// Stats for the selected tube instead of the server
        #[arg(long = "of-tube")]
        of_tube: bool,
    },
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,beanwire=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> beanwire::Result<()> {
    let mut builder = Config::builder().host(&args.host).port(args.port);
    if let Some(secs) = args.connect_timeout {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    let config = builder.build();

    tracing::info!("Connecting to {}", config.addr());
    let mut conn = Connection::connect(config)?;

    if let Some(tube) = &args.tube {
        conn.use_tube(tube)?;
        conn.watch(tube)?;
        if tube != "default" {
            conn.ignore("default")?;
        }
    }

    match args.command {
        Commands::Put {
            body,
            priority,
            delay,
            ttr,
        } => {
            let id = conn.put_with(
                body.as_bytes(),
                PutOptions {
                    priority,
                    delay,
                    ttr,
                },
            )?;
            println!("{}", id);
        }
        Commands::Reserve { timeout, delete } => {
            match conn.reserve(timeout.map(Duration::from_secs))? {
                Some(mut job) => {
                    print_job(&job);
                    if delete {
                        job.delete(&mut conn)?;
                    }
                }
                None => println!("(timed out)"),
            }
        }
        Commands::Delete { id } => conn.delete(id)?,
        Commands::Peek { id } => print_peek(conn.peek(id)?),
        Commands::PeekReady => print_peek(conn.peek_ready()?),
        Commands::PeekDelayed => print_peek(conn.peek_delayed()?),
        Commands::PeekBuried => print_peek(conn.peek_buried()?),
        Commands::Kick { bound } => println!("{}", conn.kick(bound)?),
        Commands::KickJob { id } => conn.kick_job(id)?,
        Commands::Pause { delay } => {
            let tube = conn.using()?;
            conn.pause_tube(&tube, delay)?;
        }
        Commands::Tubes => print_document(&conn.tubes()?),
        Commands::Stats { job, of_tube } => {
            let doc = match job {
                Some(id) => conn.stats_job(id)?,
                None if of_tube => {
                    let tube = conn.using()?;
                    conn.stats_tube(&tube)?
                }
                None => conn.stats()?,
            };
            print_document(&doc);
        }
    }

    conn.close();
    Ok(())
}

fn print_job(job: &Job) {
    println!("id: {}", job.id());
    println!("{}", String::from_utf8_lossy(job.body()));
}

fn print_peek(job: Option<Job>) {
    match job {
        Some(job) => print_job(&job),
        None => println!("(not found)"),
    }
}

fn print_document(doc: &Document) {
    match doc {
        Document::Raw(bytes) => print!("{}", String::from_utf8_lossy(bytes)),
        #[cfg(feature = "yaml")]
        Document::Yaml(value) => match serde_yaml::to_string(value) {
            Ok(text) => print!("{}", text),
            Err(e) => tracing::error!("Failed to render document: {}", e),
        },
    }
}
