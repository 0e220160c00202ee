//! CLI module - Command-line interface for scanledger
//!
//! Administrative access to accounts, the checkpoint catalog and reports.

mod commands;

use clap::{Parser, Subcommand};

/// scanledger - accounts, checkpoints and reports for the accessibility scanner
#[derive(Parser)]
#[command(name = "scanledger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file with a fresh signing secret
    #[command(alias = "--init")]
    Init,

    /// Apply pending database migrations
    Migrate,

    /// Manage user accounts
    #[command(alias = "u")]
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage the checkpoint catalog
    #[command(alias = "cp")]
    Checkpoint {
        #[command(subcommand)]
        command: CheckpointCommands,
    },

    /// Inspect and start scan reports
    #[command(alias = "r")]
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a user (password is read from stdin)
    Create {
        /// Display name
        name: String,
        /// Login email
        email: String,
    },
    /// Show a user
    Show {
        /// Login email
        email: String,
    },
    /// Delete a user and all its reports
    #[command(alias = "rm")]
    Delete {
        /// Login email
        email: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Issue a session token
    Token {
        /// Login email
        email: String,
        /// Lifetime in seconds (defaults to security.token_ttl_seconds)
        #[arg(long)]
        expires_in: Option<i64>,
    },
    /// Forget the remembered session token
    Logout {
        /// Login email
        email: String,
    },
    /// Grant or revoke admin rights
    Admin {
        /// Login email
        email: String,
        /// Revoke instead of grant
        #[arg(long)]
        revoke: bool,
    },
}

#[derive(Subcommand)]
pub enum CheckpointCommands {
    /// Add one checkpoint
    Add {
        /// Catalog id
        id: i32,
        /// Human readable name
        name: String,
        /// WCAG level code
        wcaglevels: String,
        /// Benefit tags
        benefits: String,
        /// Detection pattern
        regex: String,
    },
    /// List all checkpoints
    #[command(alias = "ls")]
    List,
    /// Show one checkpoint as JSON
    Show {
        /// Catalog id
        id: i32,
    },
    /// Load checkpoints from a JSON array file
    Seed {
        /// Path to the JSON file
        path: String,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Start a report for a user (spends one scan of quota)
    Start {
        /// Owner's email
        email: String,
        /// URL to scan
        url: String,
        /// Optional label
        #[arg(long)]
        alias: Option<String>,
    },
    /// Show a report by hashid
    Show {
        /// Report hashid
        hashid: String,
    },
    /// List a user's reports
    #[command(alias = "ls")]
    List {
        /// Owner's email
        email: String,
    },
    /// Record scan results for a report
    Record {
        /// Report hashid
        hashid: String,
        /// Results payload as produced by the scan engine
        results: String,
        #[arg(long)]
        seo: f64,
        #[arg(long)]
        accessibility: f64,
        #[arg(long)]
        usability: f64,
    },
}

pub use commands::*;
