use clap::{Parser, Subcommand};
use curatorapp::attributes::ViewMode;
use curatorapp::model::ItemKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "curator",
    bin_name = "curator",
    version,
    disable_help_subcommand = true,
    about = "Curate schema-typed metadata of research data items",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (overrides CURATOR_DATA)
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List stored items
    #[command(alias = "ls")]
    Items,

    /// Show an item, or the attribute a path leads to
    Show {
        /// Item uid, index or name
        item: String,

        /// Which candidate value to show: current, original, updated or mapped
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<ViewMode>,

        /// Slash-separated path to drill into, e.g. specimen/aliquots/0
        #[arg(short, long)]
        path: Option<String>,

        /// Print the view tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check an item against its schema
    Validate {
        /// Item uid, index or name
        item: String,
    },

    /// Set a leaf value and save the item
    Set {
        /// Item uid, index or name
        item: String,

        /// Slash-separated path ending at a leaf, e.g. specimen/site
        path: String,

        /// New value; an empty string reverts to the original.
        /// Measurements are `2.5 ml`, codes `ICD-10:C34`, datetimes RFC 3339
        value: String,
    },

    /// Create an item from its shape in the schema catalog
    New {
        /// project, batch, sample, image or observation
        #[arg(value_parser = parse_kind)]
        kind: ItemKind,

        name: String,
    },
}

fn parse_mode(s: &str) -> Result<ViewMode, String> {
    s.parse()
}

fn parse_kind(s: &str) -> Result<ItemKind, String> {
    s.parse()
}
