//! Sorted Order Index
//!
//! A doubly-linked list threaded through every record in ascending key
//! order (plain byte-wise comparison). It never owns anything: the links
//! are positions only, and records are released through their chains.

use std::iter::FusedIterator;

use super::record::{RecordArena, RecordId};

/// Head and tail of the ordered list
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OrderIndex {
    head: Option<RecordId>,
    tail: Option<RecordId>,
    len: usize,
}

impl OrderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head(&self) -> Option<RecordId> {
        self.head
    }

    pub fn tail(&self) -> Option<RecordId> {
        self.tail
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Splice `id` into the list at its sorted position
    ///
    /// The record must be stored in `records`, must not already be linked
    /// and its key must not equal any key already in the list.
    ///
    /// Linear in the number of records ahead of the insertion point.
    pub(crate) fn link(&mut self, records: &mut RecordArena, id: RecordId) {
        let Some(head) = self.head else {
            self.head = Some(id);
            self.tail = Some(id);
            self.len = 1;
            return;
        };

        if key_of(records, id) < key_of(records, head) {
            set_links(records, id, None, Some(head));
            if let Some(old_head) = records.get_mut(head) {
                old_head.order_prev = Some(id);
            }
            self.head = Some(id);
            self.len += 1;
            return;
        }

        // The head is already known to sort before the new key.
        let mut cursor = records.get(head).and_then(|r| r.order_next);
        while let Some(current) = cursor {
            if key_of(records, current) > key_of(records, id) {
                break;
            }
            cursor = records.get(current).and_then(|r| r.order_next);
        }

        match cursor {
            None => {
                let tail = self.tail;
                set_links(records, id, tail, None);
                if let Some(old_tail) = tail.and_then(|t| records.get_mut(t)) {
                    old_tail.order_next = Some(id);
                }
                self.tail = Some(id);
            }
            Some(next) => {
                let prev = records.get(next).and_then(|r| r.order_prev);
                set_links(records, id, prev, Some(next));
                if let Some(prev_record) = prev.and_then(|p| records.get_mut(p)) {
                    prev_record.order_next = Some(id);
                }
                if let Some(next_record) = records.get_mut(next) {
                    next_record.order_prev = Some(id);
                }
            }
        }
        self.len += 1;
    }

    /// Forget every position; the records themselves are untouched
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Walk the list; `.rev()` walks it backwards via the prev links
    pub(crate) fn iter<'a>(&self, records: &'a RecordArena) -> OrderIter<'a> {
        OrderIter {
            records,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }
}

fn key_of(records: &RecordArena, id: RecordId) -> &[u8] {
    records.get(id).map(|r| r.key()).unwrap_or_default()
}

fn set_links(
    records: &mut RecordArena,
    id: RecordId,
    prev: Option<RecordId>,
    next: Option<RecordId>,
) {
    if let Some(record) = records.get_mut(id) {
        record.order_prev = prev;
        record.order_next = next;
    }
}

/// Key/value pairs in key order
#[derive(Clone)]
pub struct OrderIter<'a> {
    records: &'a RecordArena,
    front: Option<RecordId>,
    back: Option<RecordId>,
    remaining: usize,
}

impl<'a> Iterator for OrderIter<'a> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let record = self.records.get(self.front?)?;
        self.front = record.order_next;
        self.remaining -= 1;
        Some((record.key(), record.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for OrderIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let record = self.records.get(self.back?)?;
        self.back = record.order_prev;
        self.remaining -= 1;
        Some((record.key(), record.value()))
    }
}

impl ExactSizeIterator for OrderIter<'_> {}

impl FusedIterator for OrderIter<'_> {}
