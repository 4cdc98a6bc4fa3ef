//! Bucket Chain Store
//!
//! Fixed array of bucket heads, each the start of a singly-linked chain.
//! The chain link is the only owning relation: a record lives exactly as
//! long as it is reachable from some bucket head.

use crate::error::{KvError, Result};

use super::record::{Record, RecordArena, RecordId};

/// Per-bucket chains over an owned record arena
#[derive(Debug)]
pub struct ChainStore {
    /// Head of each bucket's chain; length never changes after creation
    buckets: Vec<Option<RecordId>>,

    /// Storage for every record reachable from `buckets`
    records: RecordArena,
}

impl ChainStore {
    /// Allocate `capacity` empty buckets
    pub(crate) fn with_capacity(capacity: usize) -> Result<Self> {
        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(capacity)
            .map_err(|e| KvError::alloc("bucket array", e))?;
        buckets.resize(capacity, None);

        Ok(Self {
            buckets,
            records: RecordArena::new(),
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn records(&self) -> &RecordArena {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut RecordArena {
        &mut self.records
    }

    /// Find the record holding `key` in bucket `index`
    pub(crate) fn find(&self, index: usize, key: &[u8]) -> Option<RecordId> {
        self.ids(index)
            .find(|&id| self.records.get(id).is_some_and(|r| r.key() == key))
    }

    /// Store `record` and link it at the head of bucket `index`
    ///
    /// `index` must already be checked against the capacity.
    pub(crate) fn push_front(&mut self, index: usize, mut record: Record) -> RecordId {
        record.chain_next = self.buckets[index];
        let id = self.records.push(record);
        self.buckets[index] = Some(id);
        id
    }

    /// Ids in bucket `index`, head first
    pub(crate) fn ids(&self, index: usize) -> ChainIds<'_> {
        ChainIds {
            records: &self.records,
            cursor: self.buckets.get(index).copied().flatten(),
        }
    }

    /// Length of every chain, in bucket order
    pub(crate) fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.buckets.len()).map(move |index| self.ids(index).count())
    }

    /// Release every record by walking the chains
    ///
    /// Each bucket is detached and its chain followed until exhausted,
    /// emptying each record's slot on the way. Returns how many records were
    /// released. Afterwards every bucket is empty and the arena holds nothing.
    pub(crate) fn release_all(&mut self) -> usize {
        let mut released = 0;
        for index in 0..self.buckets.len() {
            let mut cursor = self.buckets[index].take();
            while let Some(id) = cursor {
                match self.records.take(id) {
                    Some(record) => {
                        cursor = record.chain_next;
                        released += 1;
                    }
                    None => break,
                }
            }
        }
        debug_assert_eq!(self.records.live(), 0, "records left unreachable from chains");
        self.records.clear();
        released
    }
}

/// Iterator over record ids in one chain
pub(crate) struct ChainIds<'a> {
    records: &'a RecordArena,
    cursor: Option<RecordId>,
}

impl Iterator for ChainIds<'_> {
    type Item = RecordId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        self.cursor = self.records.get(id).and_then(|r| r.chain_next);
        Some(id)
    }
}
