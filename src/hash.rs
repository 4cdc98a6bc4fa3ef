//! Key hashing
//!
//! Maps a byte-string key to a bucket index. The table only depends on
//! [`KeyIndexer`]; [`Djb2`] is what it uses unless told otherwise.

/// Maps keys to bucket indices in `[0, capacity)`
///
/// Implementations must be deterministic and pure.
pub trait KeyIndexer {
    fn key_index(&self, key: &[u8], capacity: usize) -> usize;
}

/// The djb2 string hash
///
/// `h = h * 33 + byte`, seeded with 5381, wrapping on overflow.
pub fn hash_djb2(key: &[u8]) -> u64 {
    key.iter().fold(5381u64, |hash, &byte| {
        hash.wrapping_shl(5).wrapping_add(hash).wrapping_add(byte as u64)
    })
}

/// Bucket index for `key` in a table of `capacity` buckets
///
/// `capacity` must be non-zero.
pub fn key_index(key: &[u8], capacity: usize) -> usize {
    (hash_djb2(key) % capacity as u64) as usize
}

/// Default indexer backed by [`hash_djb2`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Djb2;

impl KeyIndexer for Djb2 {
    fn key_index(&self, key: &[u8], capacity: usize) -> usize {
        key_index(key, capacity)
    }
}

impl<F> KeyIndexer for F
where
    F: Fn(&[u8], usize) -> usize,
{
    fn key_index(&self, key: &[u8], capacity: usize) -> usize {
        self(key, capacity)
    }
}
