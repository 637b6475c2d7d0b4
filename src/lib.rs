pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod intensity;
pub mod lens;
pub mod library;
pub mod llm;
pub mod models;
pub mod mutate;
pub mod parse;
pub mod persist;
pub mod store;
pub mod volume;

#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

pub fn run() {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();

  let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
    Ok(runtime) => runtime,
    Err(e) => {
      eprintln!("Failed to start runtime: {}", e);
      std::process::exit(1);
    }
  };

  if let Err(e) = runtime.block_on(cli.execute()) {
    eprintln!("Error: {}", e);
    std::process::exit(1);
  }
}
