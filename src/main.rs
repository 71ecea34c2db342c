use std::io::{self, BufRead, Write};

use auditlog_core::config::Config;
use auditlog_core::{emit, parse, serialize, Extra, Severity, TracingSink};
use clap::Parser;

#[derive(Parser)]
#[command(name = "auditlog", about = "Normalize audit events into canonical JSON log lines")]
struct Cli {
    /// Severity to log at: debug, info, warning or error. Anything else logs at debug.
    #[arg(long)]
    level: Option<String>,

    /// Logger name attached to every record.
    #[arg(long)]
    logger: Option<String>,

    /// Print each canonical line to stdout instead of logging it.
    #[arg(long)]
    print: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_else(|_| Config::defaults());

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(config.logging.ansi)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.filter)),
        )
        .init();

    let severity = cli
        .level
        .as_deref()
        .map(Severity::from_name)
        .unwrap_or_else(|| config.security.severity());
    let sink = TracingSink::new(cli.logger.unwrap_or(config.security.logger));
    let extra = Extra::new();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut lines = 0usize;
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = parse(&line);
        if cli.print {
            writeln!(out, "{}", serialize(&event)?)?;
        } else {
            emit(&sink, &event, severity, &extra)?;
        }
        lines += 1;
    }

    out.flush()?;
    tracing::debug!(lines, logger = sink.logger(), "input exhausted");
    Ok(())
}
