//! Sorted hash table
//!
//! Composes the chain store (lookup and ownership) with the order index
//! (sorted traversal). `set` keeps both in step; `get` only reads chains;
//! rendering only reads the order list.

use std::fmt;
use std::io::{self, Write};

use crate::error::{KvError, Result};
use crate::hash::{Djb2, KeyIndexer};

use super::chain::ChainStore;
use super::order::{OrderIndex, OrderIter};
use super::record::{try_copy, Record};

/// Bucket occupancy snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    pub capacity: usize,
    pub len: usize,
    pub occupied_buckets: usize,
    pub longest_chain: usize,
}

/// Fixed-capacity hash table that also keeps its entries in key order
///
/// ## Layout
/// - Each bucket heads a singly-linked chain; new records go to the front.
/// - Every record is also spliced into one doubly-linked list sorted by key.
///
/// ## Contract
/// - `capacity` is fixed at creation; there is no rehashing.
/// - Keys are unique; setting an existing key replaces only its value.
/// - A failed `set` leaves the table exactly as it was.
pub struct SortedHashTable<H = Djb2> {
    chains: ChainStore,
    order: OrderIndex,
    indexer: H,
}

impl SortedHashTable<Djb2> {
    /// Create a table with `capacity` buckets using the djb2 indexer
    pub fn create(capacity: usize) -> Result<Self> {
        Self::with_indexer(capacity, Djb2)
    }

    /// Tear down a table that may not exist
    ///
    /// `None` is a no-op that releases nothing.
    pub fn delete_opt(table: Option<Self>) -> usize {
        table.map(Self::delete).unwrap_or(0)
    }
}

impl<H: KeyIndexer> SortedHashTable<H> {
    /// Create a table with `capacity` buckets and a custom indexer
    ///
    /// Fails with `InvalidArgument` for zero capacity and with
    /// `AllocationFailure` if the bucket array cannot be allocated.
    pub fn with_indexer(capacity: usize, indexer: H) -> Result<Self> {
        if capacity == 0 {
            return Err(KvError::InvalidArgument(
                "capacity must be positive".to_string(),
            ));
        }

        let chains = ChainStore::with_capacity(capacity)?;
        tracing::debug!(capacity, "sorted hash table created");

        Ok(Self {
            chains,
            order: OrderIndex::new(),
            indexer,
        })
    }

    /// Insert `key` or replace its value
    ///
    /// Steps:
    /// 1. Hash the key to a bucket
    /// 2. Scan that chain for the key
    /// 3. Found: swap in a copy of `value`, position unchanged
    /// 4. Not found: copy key and value into a new record, link it at the
    ///    bucket head, then splice it into the order list
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(KvError::InvalidArgument("key must not be empty".to_string()));
        }

        let index = self.bucket_for(key)?;

        if let Some(id) = self.chains.find(index, key) {
            let value = try_copy(value, "updated value")?;
            if let Some(record) = self.chains.records_mut().get_mut(id) {
                record.value = value;
            }
            tracing::trace!(bucket = index, "value updated in place");
            return Ok(());
        }

        // Every allocation happens before any link changes.
        self.chains.records_mut().reserve_one()?;
        let record = Record::try_new(key, value)?;

        let id = self.chains.push_front(index, record);
        self.order.link(self.chains.records_mut(), id);
        tracing::trace!(bucket = index, len = self.order.len(), "record inserted");

        Ok(())
    }

    /// Value stored for `key`, or `None`
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let index = self.indexer.key_index(key, self.capacity());
        if index >= self.capacity() {
            return None;
        }
        let id = self.chains.find(index, key)?;
        self.chains.records().get(id).map(|r| r.value())
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    pub fn capacity(&self) -> usize {
        self.chains.capacity()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in ascending key order; `.rev()` gives descending order
    pub fn iter(&self) -> OrderIter<'_> {
        self.order.iter(self.chains.records())
    }

    /// Keys in ascending order
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &[u8]> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Keys stored in bucket `index`, in chain order (most recent first)
    ///
    /// An out-of-range index yields nothing.
    pub fn chain(&self, index: usize) -> impl Iterator<Item = &[u8]> + '_ {
        let records = self.chains.records();
        self.chains
            .ids(index)
            .filter_map(move |id| records.get(id).map(|r| r.key()))
    }

    pub fn stats(&self) -> TableStats {
        let (occupied_buckets, longest_chain) = self
            .chains
            .chain_lengths()
            .filter(|&len| len > 0)
            .fold((0usize, 0usize), |(occupied, longest), len| {
                (occupied + 1, longest.max(len))
            });

        TableStats {
            capacity: self.capacity(),
            len: self.len(),
            occupied_buckets,
            longest_chain,
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// `{'key': 'value', ...}` in ascending key order
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// `{'key': 'value', ...}` in descending key order
    pub fn render_reverse(&self) -> String {
        Rendered(self.iter().rev()).to_string()
    }

    /// Write the ascending rendering and a newline
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", Rendered(self.iter()))
    }

    /// Write the descending rendering and a newline
    pub fn write_reverse_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", Rendered(self.iter().rev()))
    }

    /// Print the ascending rendering to stdout
    pub fn print(&self) -> io::Result<()> {
        self.write_to(&mut io::stdout().lock())
    }

    /// Print the descending rendering to stdout
    pub fn print_reverse(&self) -> io::Result<()> {
        self.write_reverse_to(&mut io::stdout().lock())
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Release every record through the bucket chains
    ///
    /// The order list is dropped without being walked. Returns the number of
    /// records released.
    pub fn delete(mut self) -> usize {
        let released = self.release();
        tracing::debug!(released, capacity = self.capacity(), "sorted hash table deleted");
        released
    }

    fn release(&mut self) -> usize {
        self.order.reset();
        self.chains.release_all()
    }

    fn bucket_for(&self, key: &[u8]) -> Result<usize> {
        let capacity = self.capacity();
        let index = self.indexer.key_index(key, capacity);
        if index >= capacity {
            return Err(KvError::InvalidArgument(format!(
                "key index {} out of range for capacity {}",
                index, capacity
            )));
        }
        Ok(index)
    }
}

impl<H> Drop for SortedHashTable<H> {
    fn drop(&mut self) {
        self.order.reset();
        self.chains.release_all();
    }
}

impl<H: KeyIndexer> fmt::Display for SortedHashTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Rendered(self.iter()))
    }
}

impl<H> fmt::Debug for SortedHashTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedHashTable")
            .field("capacity", &self.chains.capacity())
            .field("len", &self.order.len())
            .field("head", &self.order.head())
            .field("tail", &self.order.tail())
            .finish()
    }
}

/// Brace-delimited `'key': 'value'` list over any entry sequence
struct Rendered<I>(I);

impl<'a, I> fmt::Display for Rendered<I>
where
    I: Iterator<Item = (&'a [u8], &'a [u8])> + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.0.clone().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "'{}': '{}'",
                String::from_utf8_lossy(key),
                String::from_utf8_lossy(value)
            )?;
        }
        f.write_str("}")
    }
}
