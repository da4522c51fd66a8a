//! CLI module
//!
//! Subcommands:
//! - `serve`: run the HTTP gateway (default)

pub mod serve;

use clap::{Parser, Subcommand};

/// Depaxiom API gateway - credential lifecycle and request admission
#[derive(Parser)]
#[command(name = "dpx-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP gateway server
    Serve,
}
