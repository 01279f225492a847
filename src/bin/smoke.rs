//! memcached-smoke
//!
//! Connects to one server over the binary protocol, stores a single key, then reads it back
//! twice. Exits with status 1 if the client cannot connect or the store fails.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use memcached_binary::{blocking::Client, ClientConfig, Endpoint, Value};
use tracing_subscriber::{fmt, EnvFilter};

/// Binary protocol smoke test
#[derive(Parser, Debug)]
#[command(name = "memcached-smoke")]
#[command(about = "Set a key on a memcached server and read it back twice")]
#[command(version)]
struct Args {
    /// Server address (host:port or tcp://host:port)
    #[arg(default_value = "127.0.0.1:11211")]
    dsn: String,

    /// Key to store
    #[arg(short, long, default_value = "some_key")]
    key: String,

    /// Value to store
    #[arg(short, long, default_value = "this is a value")]
    value: String,

    /// Flags stored alongside the value
    #[arg(short, long, default_value = "0")]
    flags: u32,

    /// Expiration in seconds, 0 for none
    #[arg(short, long, default_value = "0")]
    ttl: u32,

    /// Per-request deadline in milliseconds, 0 for none
    #[arg(long, default_value = "0")]
    timeout_ms: u64,
}

fn display(value: &Option<Value>) -> String {
    match value {
        Some(v) => String::from_utf8_lossy(&v.data).into_owned(),
        None => "None".to_string(),
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,memcached_binary=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let endpoint: Endpoint = match args.dsn.parse() {
        Ok(endpoint) => endpoint,
        Err(e) => {
            eprintln!("failed to create client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let io_timeout = match args.timeout_ms {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    };
    let config = ClientConfig::builder().io_timeout(io_timeout).build();

    let mut client = match Client::with_config(endpoint, config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("failed to create client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("connected to {}", client.endpoint());

    if let Err(e) = client.set(&args.key, &args.value, Some(args.flags), Some(args.ttl)) {
        eprintln!("failed to set record: {}", e);
        return ExitCode::FAILURE;
    }

    for _ in 0..2 {
        match client.get(&args.key) {
            Ok(value) => println!("{}", display(&value)),
            Err(e) => {
                eprintln!("failed to get record: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    client.close();
    ExitCode::SUCCESS
}
