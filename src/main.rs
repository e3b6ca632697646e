use anyhow::{Context, Result};
use clap::Parser;
use exprfind::{cli::Cli, search};
use std::io::{self, BufWriter, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to build thread pool")?;
    }
    let config = cli.to_config()?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if cli.explain {
        if let Some(name) = &config.name {
            writeln!(out, "name: {}", name.root())?;
        }
        if let Some(content) = &config.content {
            writeln!(out, "content: {}", content.root())?;
        }
        out.flush()?;
        return Ok(());
    }

    let matched = search(&config)?;
    let terminator = if cli.print0 { b'\0' } else { b'\n' };
    for record in &matched {
        out.write_all(record.as_bytes())?;
        out.write_all(&[terminator])?;
    }
    out.flush().context("Failed to write results")?;
    info!(matched = matched.len(), "done");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
