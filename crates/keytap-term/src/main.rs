//! Keytap demo binary.
//!
//! Puts the terminal in raw mode and echoes every decoded keystroke.
//!
//! # Usage
//!
//! ```bash
//! # Echo keys until `q` or Ctrl-C
//! keytap
//!
//! # Stop after ten keys, with listener debug logs on stderr
//! keytap --count 10 --log-level debug
//! ```

use std::{
    io::{self, Write},
    time::Duration,
};

use clap::Parser;
use keytap_term::{KeystrokeReader, ReaderConfig, Token};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Ctrl-C arrives as a plain byte once the terminal is raw.
const CTRL_C: char = '\u{3}';

/// Keystroke echo tool
#[derive(Parser, Debug)]
#[command(name = "keytap")]
#[command(about = "Echo decoded terminal keystrokes")]
#[command(version)]
struct Args {
    /// Listener poll interval in milliseconds
    #[arg(long, default_value = "5")]
    poll_interval_ms: u64,

    /// Maximum unclaimed keystroke lifetime in milliseconds
    #[arg(long, default_value = "500")]
    max_lifetime_ms: u64,

    /// Exit after this many keystrokes
    #[arg(long)]
    count: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let config = ReaderConfig {
        poll_interval: Duration::from_millis(args.poll_interval_ms),
        max_lifetime: Duration::from_millis(args.max_lifetime_ms),
        ..ReaderConfig::default()
    };

    let mut reader = KeystrokeReader::with_config(config)?;
    tracing::info!("listening, press q or Ctrl-C to quit");

    let mut stdout = io::stdout().lock();
    let mut seen = 0usize;
    loop {
        let token = reader.read_keystroke();
        seen += 1;

        // Raw mode: no output post-processing, so carriage return explicitly
        writeln!(stdout, "{}\r", describe(&token))?;
        stdout.flush()?;

        let quit = token.as_char().is_some_and(|c| c == 'q' || c == CTRL_C);
        if quit || args.count.is_some_and(|limit| seen >= limit) {
            break;
        }
    }

    reader.stop();
    Ok(())
}

/// One echo line: the escaped token plus its key name when known.
fn describe(token: &Token) -> String {
    let escaped = token.to_string().escape_debug().to_string();
    match token.special_key() {
        Some(key) => format!("{escaped:<12} {key}"),
        None => escaped,
    }
}
