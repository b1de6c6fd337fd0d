//! CLI module for the User Accounts API

pub mod serve;

use clap::{Parser, Subcommand};

/// User Accounts API - CRUD and credential checks for users
#[derive(Parser)]
#[command(name = "user-accounts-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
}
