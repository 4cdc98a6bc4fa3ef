//! Table Module
//!
//! Fixed-capacity hash table whose entries are also kept in key order.
//!
//! ## Responsibilities
//! - Chained buckets for lookup (collisions resolved by chaining)
//! - A sorted doubly-linked overlay for ordered traversal without sorting
//! - Update-or-insert that keeps both structures consistent
//! - Deterministic teardown through the chains only
//!
//! ## Data Structure Choice
//! Records live in an indexed slot arena owned by the chain store. Both the
//! bucket chains and the order list link records by [`RecordId`], so the two
//! topologies share records without sharing references:
//!
//! ```text
//!  buckets            records (arena)                order list
//!  ┌───┐
//!  │ 0 │──► [c] ──► [a] ──► ∅             head ──► [a] ◄──► [b] ◄──► [c] ◄── tail
//!  │ 1 │──► ∅
//!  │ 2 │──► [b] ──► ∅
//!  └───┘
//! ```
//!
//! Ordered insertion is a linear scan. A skip list or balanced tree could
//! replace the order list without changing the table's behaviour.

mod chain;
mod order;
mod record;
mod sorted;

pub use order::{OrderIndex, OrderIter};
pub use record::{Record, RecordArena, RecordId};
pub use sorted::{SortedHashTable, TableStats};
