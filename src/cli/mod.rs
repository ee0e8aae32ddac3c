//! Command-line interface for the employee API.

use clap::{Parser, Subcommand};

/// Employee records service
/// JSON CRUD API for employee records
#[derive(Parser, Debug)]
#[command(name = "employee-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP API (default)
    #[command(alias = "-s", alias = "--serve")]
    Serve,

    /// Connect to the database, check it and report the record count
    #[command(alias = "-c", alias = "--check")]
    Check,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

impl Cli {
    /// The subcommand to run; no subcommand means `serve`.
    #[must_use]
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}
