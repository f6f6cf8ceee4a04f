use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::planetary::Window;

/// Widest accepted `--days-before` / `--days-after`.
const MAX_WINDOW_DAYS: i64 = 366;

/// Command line and environment configuration.
#[derive(Parser, Debug)]
#[command(name = "planetary-hours", about = "Planetary hours for a location", version)]
pub struct Cli {
    /// Location directory JSON file; the bundled directory is used when absent
    #[arg(long, env = "PLANETARY_HOURS_COUNTRIES", global = true)]
    pub countries: Option<PathBuf>,

    /// Civil days before the reference date covered by the timeline
    #[arg(
        long,
        env = "PLANETARY_HOURS_DAYS_BEFORE",
        default_value_t = 3,
        value_parser = clap::value_parser!(u32).range(0..=MAX_WINDOW_DAYS),
        global = true
    )]
    pub days_before: u32,

    /// Civil days after the reference date covered by the timeline
    #[arg(
        long,
        env = "PLANETARY_HOURS_DAYS_AFTER",
        default_value_t = 7,
        value_parser = clap::value_parser!(u32).range(0..=MAX_WINDOW_DAYS),
        global = true
    )]
    pub days_after: u32,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the HTTP API
    Serve {
        /// Interface to bind
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,
        /// Port to bind
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Answer queries typed on stdin (default)
    Repl,
}

impl Cli {
    pub fn window(&self) -> Window {
        Window {
            days_before: self.days_before,
            days_after: self.days_after,
        }
    }
}
