// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "icon-harvester",
    version = "0.1.0",
    about = "A CLI tool to crawl game websites and download ability icon images",
    long_about = "icon-harvester crawls a fixed set of game websites (Dota 2, Heroes of the \
                  Storm, League of Legends, Smite, Heroes of Newerth), discovers ability icon \
                  images and downloads them into per-game folders."
)]
pub struct Cli {
    // The #[command(subcommand)] attribute tells clap that this field
    // will hold one of the subcommands defined in the Commands enum
    #[command(subcommand)]
    pub command: Commands,
}

// This enum defines our subcommands (all, site)
//
// Each variant represents a different subcommand the user can run
// The fields inside each variant become the arguments for that subcommand
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape every configured game site in order
    ///
    /// Example: icon-harvester all --dest-root ./data
    All {
        /// Root folder; each game gets its own subfolder under it
        #[arg(long, default_value = "data")]
        dest_root: PathBuf,

        /// Hero-name file for the Heroes of the Storm site
        #[arg(long, default_value = "misc/hots_heroes.txt")]
        heroes_file: PathBuf,

        /// Replace images that already exist under their derived name
        #[arg(long)]
        overwrite: bool,

        /// Suppress per-page and per-image progress output
        #[arg(long)]
        quiet: bool,

        /// Output the per-site summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Scrape a single game site
    ///
    /// Example: icon-harvester site lol --dest ./data/lol
    Site {
        /// Which site to scrape: dota2, hots, lol, smite or hon
        ///
        /// This is a positional argument (required, no flag needed)
        name: String,

        /// Folder to save images into
        #[arg(long)]
        dest: PathBuf,

        /// Override the site's default seed URL
        #[arg(long)]
        seed: Option<String>,

        /// Hero-name file (only used by the hots site)
        #[arg(long)]
        heroes_file: Option<PathBuf>,

        /// Force direct mode: download the endpoint list without crawling
        ///
        /// Sites that enumerate their icons up front (dota2, hon) already
        /// default to direct mode
        #[arg(long)]
        direct: bool,

        /// Don't follow links found on pages (crawl the frontier only)
        #[arg(long)]
        no_recursive: bool,

        /// Replace images that already exist under their derived name
        #[arg(long)]
        overwrite: bool,

        /// Suppress per-page and per-image progress output
        #[arg(long)]
        quiet: bool,

        /// Output the summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why use structs and enums?
//    - Structs group related data (like the CLI arguments)
//    - Enums represent choices (like "all OR site")
//    - Both are core Rust types for organizing data
//
// 2. What are derive macros?
//    - #[derive(...)] automatically generates code for common operations
//    - Parser: generates CLI parsing logic
//    - Debug: generates code to print the struct for debugging
//
// 3. Why PathBuf instead of String for folders?
//    - PathBuf is the owned filesystem-path type
//    - Joins and display work correctly on every platform
//
// 4. What does Option<String> mean for --seed?
//    - The flag is optional; None means "use the site's default"
//    - clap turns a missing flag into None automatically
// -----------------------------------------------------------------------------
