//! Polarization Index engine and zone-time solver
//!
//! The engine evaluates the Polarization Index of a Z1/Z2/Z3 split; the
//! solver works out how many minutes to add to each zone to reach a target
//! PI without removing anything already done.

pub mod cli;
pub mod commands;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod inverse;
pub mod models;
pub mod settings;
pub mod solver;

#[cfg(test)]
mod test_utils;

pub use engine::{evaluate, F2_EPSILON, POLARIZED_THRESHOLD};
pub use error::PiError;
pub use models::{Rationale, SolveRequest, SolveResult, Strategy, ZoneMinutes};
pub use solver::solve;

use clap::Parser;

/// Binary entry point: load `.env`, install logging, run one CLI command
pub fn run() -> Result<(), String> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = cli::Cli::parse();
  let settings = commands::get_solver_settings()
    .inspect_err(|e| tracing::error!(error = %e, "failed to load solver settings"))?;

  let output = cli::dispatch(&cli, &settings)?;
  println!("{}", output);
  Ok(())
}
