use std::io;
use std::process::ExitCode;

use axistb::config::{self, TbConfig};
use axistb::junit;
use axistb::models::AxisFifo;
use axistb::runner::Runner;
use axistb::TbResult;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Exit status carries the verdict.
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> TbResult<bool> {
    let cfg = TbConfig::from_env()?;
    let depth = config::env_var("AXISTB_FIFO_DEPTH")?.unwrap_or(16);
    let mut runner = Runner::new(AxisFifo::new(depth), cfg.clone())?;
    let report = runner.run()?;
    if let Some(path) = &cfg.junit_path {
        junit::write_junit(&report, env!("CARGO_PKG_NAME"), path)?;
    }
    report.write_outcome(&mut io::stdout().lock())?;
    Ok(report.passed)
}
