#![forbid(unsafe_code)]

//! `gridpack`: pack tab-separated rows from stdin into columns on stdout.
//!
//! ```sh
//! ls -1 | GRIDPACK_WIDTH=100 cargo run -p gridpack-harness
//! printf '4096\tsrc\n12\tCargo.toml\n' | GRIDPACK_ALIGN=right,left gridpack
//! ```
//!
//! Diagnostics go to stderr, filtered by `GRIDPACK_LOG` (default `warn`).

use std::io::{self, BufWriter};
use std::process::ExitCode;

use gridpack_harness::{HarnessConfig, run};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("GRIDPACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let config = match HarnessConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("gridpack: {err}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?config, "configuration loaded");

    let stdin = io::stdin();
    let mut out = BufWriter::new(io::stdout().lock());
    match run(stdin.lock(), &mut out, &config) {
        Ok(summary) => {
            tracing::debug!(
                groups = summary.group_count,
                lines = summary.line_count,
                compact = summary.compact,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("gridpack: {err}");
            ExitCode::FAILURE
        }
    }
}
