//! CLI module for mockery
//!
//! - Argument parsing (`args`)
//! - Merging arguments with the configuration file (`config_builder`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod config_builder;
pub mod setup;

pub use args::Cli;
pub use config_builder::build_run_config;
pub use setup::{configure_thread_pool, init_logging};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    use clap::Parser;
    Cli::parse()
}
