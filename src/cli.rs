use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search movies, TV shows and people
    Search {
        /// Search text
        query: String,

        /// Result ordering (release-date, popularity)
        #[arg(short, long, default_value = "release-date")]
        sort: String,
    },

    /// Show the details and credits of a record
    Show {
        /// Record kind (movie, tv, person)
        kind: String,

        /// TMDB id
        id: u64,
    },

    /// Translate a record into Persian
    Translate {
        /// Record kind (movie, tv, person)
        kind: String,

        /// TMDB id
        id: u64,

        /// Extra style instructions for the translator
        #[arg(short, long)]
        instructions: Option<String>,

        /// Translation flow (inline, storyteller)
        #[arg(long, default_value = "storyteller")]
        flow: String,

        /// Print the translated record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    InitConfig {
        /// Output path
        #[arg(default_value = "tarjome.toml")]
        path: PathBuf,
    },
}
