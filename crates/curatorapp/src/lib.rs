//! # Curator Architecture
//!
//! Curator is a **UI-agnostic library** for editing the structured metadata
//! attached to research data items: projects, batches, samples, images and
//! observations. The command-line client in `crates/curator` is one possible
//! UI on top of it, nothing more.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Loads items into sessions, saves sessions back           │
//! │  - Resolves item selectors, answers lookups from the store  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session Layer (session.rs, navigation.rs)                  │
//! │  - One edit session per item, drafts per navigation frame   │
//! │  - The Item-level handler every edit folds back into        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Model Layer (attributes/, dispatch/, validity.rs)          │
//! │  - Schema-typed attributes with candidate values            │
//! │  - Kind dispatch, copy-on-write edits, validity reports     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract ItemStore trait                                 │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Editing in One Picture
//!
//! ```text
//!  Item ── attributes: tag → Attribute
//!              │
//!              │ open(Field("specimen"))      Navigator frames
//!              ▼                               ┌───────────────┐
//!          specimen (OBJECT) ───────────────►  │ [0] specimen  │
//!              │ open(Field("aliquots"))       │ [1] aliquots  │
//!              ▼                               │ [2] aliquot   │ ◄─ edits land in this draft
//!          aliquots (LIST)                     └───────┬───────┘
//!              │ open(Element(uid))                    │ commit: fold drafts outward
//!              ▼                                       ▼
//!          aliquot (OBJECT)                     Item attribute map ──► ItemStore (on save)
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments and returns Rust types.
//! It never writes to stdout or stderr and never installs a tracing
//! subscriber. Lookups that a UI would fetch asynchronously (suggestions,
//! mapping records) show up as pending placeholders until fed back.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade, entry point for all operations
//! - [`session`]: one edit session per item
//! - [`navigation`]: the drill-down path and its drafts
//! - [`dispatch`]: kind pairing, rendering and copy-on-write edits
//! - [`validity`]: per-field validity and the aggregate verdict
//! - [`attributes`]: attribute values, schemas and value resolution
//! - [`catalog`]: the session-scoped schema catalog
//! - [`lookup`]: pending/ready state of collaborator lookups
//! - [`model`]: items
//! - [`store`]: storage abstraction and implementations
//! - [`config`], [`init`]: configuration and wiring
//! - [`error`]: error types

pub mod api;
pub mod attributes;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod init;
pub mod lookup;
pub mod model;
pub mod navigation;
pub mod session;
pub mod store;
pub mod validity;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
