//! Engine Module
//!
//! Owns the sorted hash table and serializes access to it.
//!
//! ## Responsibilities
//! - Create the table from configuration
//! - Route protocol commands to table operations
//! - Enforce the single-writer / multi-reader discipline
//! - Tear the table down on close

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::{KvError, Result};
use crate::protocol::Command;
use crate::table::{SortedHashTable, TableStats};

/// The table plus its lock
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes** (`set`): take the write lock, so a reader never sees a
///   record that is linked into its chain but not yet into the order list.
/// - **Reads** (`get`, `render`, `render_reverse`, `len`, `stats`): take the
///   read lock and may run alongside each other.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// The table (internal RwLock)
    table: RwLock<SortedHashTable>,
}

impl Engine {
    /// Create an empty table, then validate the rest of `config`
    ///
    /// Table construction errors come back unchanged, so zero capacity is
    /// `InvalidArgument` here just as it is for `SortedHashTable::create`.
    pub fn open(config: Config) -> Result<Self> {
        let table = SortedHashTable::create(config.capacity)?;
        config.validate()?;

        tracing::info!(capacity = config.capacity, "engine opened");

        Ok(Self {
            config,
            table: RwLock::new(table),
        })
    }

    /// Open with a bucket count (convenience method)
    ///
    /// Uses default config otherwise
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::open(Config::builder().capacity(capacity).build())
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers. A missing key on GET is
    /// reported as `KvError::KeyNotFound`.
    pub fn execute(&self, command: Command) -> Result<Option<Vec<u8>>> {
        match command {
            Command::Get { key } => self.get(&key).map(Some).ok_or(KvError::KeyNotFound),
            Command::Set { key, value } => {
                self.set(&key, &value)?;
                Ok(None)
            }
            Command::Print => Ok(Some(self.render().into_bytes())),
            Command::PrintReverse => Ok(Some(self.render_reverse().into_bytes())),
            Command::Ping => Ok(Some(b"PONG".to_vec())),
        }
    }

    /// Get a copy of the value stored for `key`
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.table.read().get(key).map(<[u8]>::to_vec)
    }

    /// Insert or update a key
    pub fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.table.write().set(key, value)
    }

    /// Ascending rendering of the whole table
    pub fn render(&self) -> String {
        self.table.read().render()
    }

    /// Descending rendering of the whole table
    pub fn render_reverse(&self) -> String {
        self.table.read().render_reverse()
    }

    /// Close the engine, releasing every record
    ///
    /// Returns how many records were released.
    pub fn close(self) -> usize {
        let released = self.table.into_inner().delete();
        tracing::info!(released, "engine closed");
        released
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bucket occupancy
    pub fn stats(&self) -> TableStats {
        self.table.read().stats()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
