//! # Curator CLI
//!
//! The binary is a thin client over the `curatorapp` library. All editing
//! semantics live there; this crate parses arguments, wires logging, and
//! prints results.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  main.rs      exit code on error             │
//! ├──────────────────────────────────────────────┤
//! │  cli/setup    clap argument definitions      │
//! │  cli/commands logging, init, dispatch        │
//! │  cli/render   terminal output                │
//! ├──────────────────────────────────────────────┤
//! │  curatorapp::api::CuratorApi<FileStore>      │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Commands
//!
//! - `curator items`: list stored items
//! - `curator show <item> [--mode M] [--path a/b]`: render an item, or the
//!   attribute a path drills down to
//! - `curator validate <item>`: print offending fields; exits non-zero when
//!   the item is invalid
//! - `curator set <item> <path> <value>`: edit a leaf and save the item
//! - `curator new <kind> <name>`: create an item from its shape
//!
//! Items are selected by uid, by 1-based position in `curator items`, or by
//! exact name.
//!
//! ## Logging
//!
//! Log output goes to stderr through `tracing-subscriber`. The filter comes
//! from `CURATOR_LOG` (default `warn`); `--verbose` raises it to `debug`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
