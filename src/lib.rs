//! # jsondb
//!
//! An embedded JSON document store with:
//! - One directory per table, one pretty-printed JSON file per entry
//! - Serialized transactions (one worker, FIFO, no interleaving)
//! - Optional encryption at rest (scrypt + AES-256-CBC)
//! - Two-phase deletes (`drop()` → `confirm()` / `cancel()`)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Callers                               │
//! │              (any thread, any number)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ transact(body)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Transaction Queue                            │
//! │           (single worker, FIFO, to completion)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ body(&Database)
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Table    │─────────▶│    Entry    │
//!   │ (directory) │          │   (file)    │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Cipher    │
//!                           │ (optional)  │
//!                           └─────────────┘
//! ```
//!
//! ## On-Disk Layout
//!
//! ```text
//! {root}/.databases/db-{namespace}/{table}/{entry-id}.json
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod crypto;
pub mod pending;
pub mod table;
pub mod transaction;
pub mod database;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{JsonDbError, Result};
pub use config::Config;
pub use crypto::{Cipher, KdfParams};
pub use database::Database;
pub use pending::PendingDelete;
pub use store::Store;
pub use table::{Document, Entry, EntryCollection, SelectOptions, SetOptions, Table};
pub use transaction::TransactionHandle;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of jsondb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
