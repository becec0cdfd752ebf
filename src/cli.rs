//! Command-line interface for the gamelist server.

use clap::{Parser, Subcommand};

/// Gamelist - game catalog server with ordered lists
#[derive(Parser, Debug)]
#[command(name = "gamelist")]
#[command(about = "Game catalog server with ordered, repositionable lists", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP catalog server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long, default_value = "gamelist.db")]
        db_path: String,
    },

    /// Populate the database with the sample catalog
    Seed {
        /// Path to the database file (created if it doesn't exist)
        #[arg(long, default_value = "gamelist.db")]
        db_path: String,
    },
}
