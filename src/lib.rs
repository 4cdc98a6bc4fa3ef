//! # SortedKV
//!
//! A fixed-capacity hash table that keeps its entries in key order:
//! - Chained buckets for lookup
//! - A sorted doubly-linked overlay for in-order and reverse traversal
//! - Single-writer/multi-reader engine around the table
//! - TCP-based client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                  (Multiple Clients)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │            (Single Writer / Multi Reader)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  SortedHashTable                             │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐               ┌──────────────────┐
//!   │  Bucket Chains  │               │   Order Index    │
//!   │ (owns records)  │               │ (sorted, links)  │
//!   └─────────────────┘               └──────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod hash;
pub mod table;
pub mod network;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::Config;
pub use engine::Engine;
pub use hash::{key_index, Djb2, KeyIndexer};
pub use table::SortedHashTable;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SortedKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
