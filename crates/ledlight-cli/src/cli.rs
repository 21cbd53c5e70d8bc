//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ledlight - A remotely controllable LED indicator
#[derive(Debug, Parser)]
#[command(name = "ledlight")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "LEDLIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    // --- Indicator attributes ---
    /// Start with the light on
    #[arg(long)]
    pub power: bool,

    /// Initial color (any CSS color)
    #[arg(long)]
    pub color: Option<String>,

    /// Initial diameter in pixels
    #[arg(long)]
    pub diameter: Option<f64>,

    /// Subscription id for remote control
    #[arg(long, env = "LEDLIGHT_SUBSCRIPTION_ID")]
    pub subscription_id: Option<String>,

    /// Seconds to wait for the remote connection
    #[arg(long)]
    pub connect_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the indicator markup
    Render {
        /// Also print the stylesheet
        #[arg(long)]
        styles: bool,
    },

    /// Run instructions against a fresh indicator, one reply per line
    Exec {
        /// Instructions such as `on()`, `setColor("blue")` or a JSON payload
        #[arg(required = true)]
        instructions: Vec<String>,

        /// Print the final markup after the replies
        #[arg(long)]
        render: bool,
    },

    /// Accept commands on stdin and print replies and events on stdout
    Listen,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the effective configuration
    Dump,

    /// Validate the configuration
    Validate,

    /// Show the configuration file path
    Path,
}
