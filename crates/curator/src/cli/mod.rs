//! # CLI Layer
//!
//! This module is **one possible UI client** for curator. It is the only
//! place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs a tracing subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! Commands go through [`curatorapp::api::CuratorApi`] and never touch the
//! store directly.

mod commands;
mod render;
pub mod setup;

pub use commands::run;
