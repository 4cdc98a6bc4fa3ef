//! Records and the slot arena that owns them
//!
//! Links between records are [`RecordId`] indices into a [`RecordArena`],
//! never references. A record has two independent link roles: the chain
//! link inside its bucket and the order links inside the sorted list.

use crate::error::{KvError, Result};

/// Index of a record slot in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(usize);

/// A stored key/value pair
#[derive(Debug)]
pub struct Record {
    /// Immutable once inserted
    pub(crate) key: Box<[u8]>,

    /// Replaced in place by updates
    pub(crate) value: Vec<u8>,

    /// Next record in the same bucket (chain role)
    pub(crate) chain_next: Option<RecordId>,

    /// Neighbours in ascending key order (order role)
    pub(crate) order_prev: Option<RecordId>,
    pub(crate) order_next: Option<RecordId>,
}

impl Record {
    /// Build an unlinked record, copying key and value
    ///
    /// Both copies are reserved fallibly; on failure whatever was already
    /// copied is dropped and nothing else is touched.
    pub(crate) fn try_new(key: &[u8], value: &[u8]) -> Result<Self> {
        let key = try_copy(key, "record key")?.into_boxed_slice();
        let value = try_copy(value, "record value")?;
        Ok(Self {
            key,
            value,
            chain_next: None,
            order_prev: None,
            order_next: None,
        })
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

/// Copy `bytes` into a fresh buffer, reporting allocation failure instead
/// of aborting
pub(crate) fn try_copy(bytes: &[u8], what: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes.len())
        .map_err(|e| KvError::alloc(what, e))?;
    buf.extend_from_slice(bytes);
    Ok(buf)
}

/// Slot storage for records
///
/// Slots are only ever appended while the table is live. Teardown empties
/// them one by one while walking bucket chains.
#[derive(Debug, Default)]
pub struct RecordArena {
    slots: Vec<Option<Record>>,
}

impl RecordArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make room for one more record without inserting it
    pub(crate) fn reserve_one(&mut self) -> Result<()> {
        self.slots
            .try_reserve(1)
            .map_err(|e| KvError::alloc("record slot", e))
    }

    /// Store a record, returning its id
    ///
    /// Callers reserve first so this never reallocates.
    pub(crate) fn push(&mut self, record: Record) -> RecordId {
        let id = RecordId(self.slots.len());
        self.slots.push(Some(record));
        id
    }

    pub(crate) fn get(&self, id: RecordId) -> Option<&Record> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Remove and return a record, leaving its slot empty
    pub(crate) fn take(&mut self, id: RecordId) -> Option<Record> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    /// Number of occupied slots
    pub fn live(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}
