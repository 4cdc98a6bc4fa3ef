//! SortedHashTable Tests
//!
//! Tests verify:
//! - Construction and argument validation
//! - Insert / update / lookup
//! - Ordered and reverse rendering
//! - Independence of ordering from bucket count
//! - Chain placement and teardown

use sortedkv::table::{SortedHashTable, TableStats};
use sortedkv::{key_index, KvError};

// =============================================================================
// Helper Functions
// =============================================================================

fn table_with(capacity: usize, pairs: &[(&str, &str)]) -> SortedHashTable {
    let mut table = SortedHashTable::create(capacity).unwrap();
    for (key, value) in pairs {
        table.set(key.as_bytes(), value.as_bytes()).unwrap();
    }
    table
}

fn keys(table: &SortedHashTable) -> Vec<String> {
    table
        .keys()
        .map(|k| String::from_utf8(k.to_vec()).unwrap())
        .collect()
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_create_empty_table() {
    let table = SortedHashTable::create(5).unwrap();
    assert_eq!(table.capacity(), 5);
    assert_eq!(table.len(), 0);
    assert!(table.is_empty());
}

#[test]
fn test_create_zero_capacity_fails() {
    let result = SortedHashTable::create(0);
    assert!(matches!(result, Err(KvError::InvalidArgument(_))));
}

#[test]
fn test_create_oversized_bucket_array_fails() {
    let result = SortedHashTable::create(usize::MAX);
    assert!(matches!(result, Err(KvError::AllocationFailure(_))));
}

// =============================================================================
// Set / Get Tests
// =============================================================================

#[test]
fn test_set_and_get() {
    let table = table_with(5, &[("b", "2"), ("a", "1"), ("c", "3")]);

    assert_eq!(table.get(b"a"), Some(&b"1"[..]));
    assert_eq!(table.get(b"b"), Some(&b"2"[..]));
    assert_eq!(table.get(b"c"), Some(&b"3"[..]));
    assert_eq!(table.len(), 3);
}

#[test]
fn test_get_on_empty_table() {
    let table = SortedHashTable::create(3).unwrap();
    assert_eq!(table.get(b"anything"), None);
    assert_eq!(table.get(b""), None);
}

#[test]
fn test_get_missing_key() {
    let table = table_with(5, &[("a", "1")]);
    assert_eq!(table.get(b"b"), None);
    assert!(!table.contains_key(b"b"));
    assert!(table.contains_key(b"a"));
}

#[test]
fn test_set_empty_key_fails_without_change() {
    let mut table = table_with(5, &[("a", "1")]);

    let result = table.set(b"", b"value");

    assert!(matches!(result, Err(KvError::InvalidArgument(_))));
    assert_eq!(table.len(), 1);
    assert_eq!(table.render(), "{'a': '1'}");
}

#[test]
fn test_set_empty_value_is_allowed() {
    let mut table = SortedHashTable::create(5).unwrap();
    table.set(b"k", b"").unwrap();
    assert_eq!(table.get(b"k"), Some(&b""[..]));
    assert_eq!(table.render(), "{'k': ''}");
}

#[test]
fn test_update_replaces_value_only() {
    let mut table = table_with(5, &[("b", "2"), ("a", "1"), ("c", "3")]);

    table.set(b"b", b"20").unwrap();

    assert_eq!(table.get(b"b"), Some(&b"20"[..]));
    assert_eq!(table.len(), 3);
    assert_eq!(keys(&table), vec!["a", "b", "c"]);
}

#[test]
fn test_repeated_updates_keep_single_record() {
    let mut table = SortedHashTable::create(2).unwrap();
    for i in 0..50 {
        table.set(b"same", format!("v{}", i).as_bytes()).unwrap();
    }
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(b"same"), Some(&b"v49"[..]));
    assert_eq!(table.stats().longest_chain, 1);
}

#[test]
fn test_binary_keys_and_values() {
    let mut table = SortedHashTable::create(7).unwrap();
    table.set(&[0x00, 0xff], &[0xde, 0xad]).unwrap();
    table.set(&[0x00], &[0xbe, 0xef]).unwrap();

    assert_eq!(table.get(&[0x00, 0xff]), Some(&[0xde, 0xad][..]));
    let ordered: Vec<&[u8]> = table.keys().collect();
    assert_eq!(ordered, vec![&[0x00][..], &[0x00, 0xff][..]]);
}

// =============================================================================
// Rendering Tests
// =============================================================================

#[test]
fn test_render_ascending() {
    let table = table_with(5, &[("b", "2"), ("a", "1"), ("c", "3")]);
    assert_eq!(table.render(), "{'a': '1', 'b': '2', 'c': '3'}");
}

#[test]
fn test_render_reverse() {
    let table = table_with(5, &[("b", "2"), ("a", "1"), ("c", "3")]);
    assert_eq!(table.render_reverse(), "{'c': '3', 'b': '2', 'a': '1'}");
}

#[test]
fn test_render_empty_table() {
    let table = SortedHashTable::create(3).unwrap();
    assert_eq!(table.render(), "{}");
    assert_eq!(table.render_reverse(), "{}");
}

#[test]
fn test_render_after_update_keeps_order() {
    let mut table = table_with(5, &[("b", "2"), ("a", "1"), ("c", "3")]);
    table.set(b"b", b"20").unwrap();
    assert_eq!(table.render(), "{'a': '1', 'b': '20', 'c': '3'}");
}

#[test]
fn test_display_matches_render() {
    let table = table_with(4, &[("y", "1"), ("x", "2")]);
    assert_eq!(format!("{}", table), table.render());
}

#[test]
fn test_write_to_appends_newline() {
    let table = table_with(4, &[("y", "1"), ("x", "2")]);

    let mut forward = Vec::new();
    table.write_to(&mut forward).unwrap();
    let mut backward = Vec::new();
    table.write_reverse_to(&mut backward).unwrap();

    assert_eq!(forward, b"{'x': '2', 'y': '1'}\n");
    assert_eq!(backward, b"{'y': '1', 'x': '2'}\n");
}

// =============================================================================
// Ordering Property Tests
// =============================================================================

#[test]
fn test_order_is_sorted_for_many_keys() {
    let words = [
        "hetairas", "mentioner", "heliotropes", "neurospora", "depravement",
        "serafins", "stylist", "subgenera", "joyful", "synaphea", "redescribed",
        "urites", "dram", "vivid", "Bethel", "a", "zz", "aa",
    ];
    let mut table = SortedHashTable::create(1024).unwrap();
    for word in words {
        table.set(word.as_bytes(), b"x").unwrap();
    }

    let mut expected: Vec<String> = words.iter().map(|w| w.to_string()).collect();
    expected.sort();

    assert_eq!(keys(&table), expected);
}

#[test]
fn test_reverse_is_exact_mirror() {
    let mut table = SortedHashTable::create(3).unwrap();
    for i in (0..40).rev().step_by(3) {
        table.set(format!("key{:02}", i).as_bytes(), format!("{}", i).as_bytes()).unwrap();
    }
    for i in 0..40 {
        table.set(format!("key{:02}", i).as_bytes(), format!("{}", i * 2).as_bytes()).unwrap();
    }

    let forward: Vec<(Vec<u8>, Vec<u8>)> =
        table.iter().map(|(k, v)| (k.to_vec(), v.to_vec())).collect();
    let mut backward: Vec<(Vec<u8>, Vec<u8>)> =
        table.iter().rev().map(|(k, v)| (k.to_vec(), v.to_vec())).collect();
    backward.reverse();

    assert_eq!(forward.len(), 40);
    assert_eq!(forward, backward);
    assert!(forward.windows(2).all(|w| w[0].0 < w[1].0));
}

#[test]
fn test_ordering_independent_of_capacity() {
    let pairs = [("b", "2"), ("a", "1"), ("c", "3"), ("ab", "4"), ("", "skip")];
    let mut renders = Vec::new();

    for capacity in [1, 2, 3, 5, 64, 1024] {
        let mut table = SortedHashTable::create(capacity).unwrap();
        for (k, v) in pairs {
            let _ = table.set(k.as_bytes(), v.as_bytes());
        }
        renders.push(table.render());
    }

    assert!(renders.iter().all(|r| r == &renders[0]));
    assert_eq!(renders[0], "{'a': '1', 'ab': '4', 'b': '2', 'c': '3'}");
}

#[test]
fn test_single_bucket_matches_many_buckets() {
    let single = table_with(1, &[("b", "2"), ("a", "1"), ("c", "3")]);
    let many = table_with(5, &[("b", "2"), ("a", "1"), ("c", "3")]);

    assert_eq!(single.render(), many.render());
    assert_eq!(single.render(), "{'a': '1', 'b': '2', 'c': '3'}");
}

// =============================================================================
// Chain Placement Tests
// =============================================================================

#[test]
fn test_chain_is_most_recent_first() {
    let table = table_with(1, &[("b", "2"), ("a", "1"), ("c", "3")]);

    let chain: Vec<&[u8]> = table.chain(0).collect();
    assert_eq!(chain, vec![&b"c"[..], &b"a"[..], &b"b"[..]]);
}

#[test]
fn test_chain_out_of_range_is_empty() {
    let table = table_with(2, &[("a", "1")]);
    assert_eq!(table.chain(2).count(), 0);
}

#[test]
fn test_records_land_in_djb2_bucket() {
    let table = table_with(7, &[("hetairas", "1"), ("mentioner", "2"), ("dram", "3")]);

    for key in ["hetairas", "mentioner", "dram"] {
        let index = key_index(key.as_bytes(), 7);
        assert!(table.chain(index).any(|k| k == key.as_bytes()));
    }
}

#[test]
fn test_custom_indexer_forces_collisions() {
    let mut table = SortedHashTable::with_indexer(8, |_: &[u8], _: usize| 3usize).unwrap();
    for key in ["d", "b", "a", "c"] {
        table.set(key.as_bytes(), b"v").unwrap();
    }

    assert_eq!(table.chain(3).count(), 4);
    assert_eq!(
        table.stats(),
        TableStats { capacity: 8, len: 4, occupied_buckets: 1, longest_chain: 4 }
    );
    assert_eq!(table.render(), "{'a': 'v', 'b': 'v', 'c': 'v', 'd': 'v'}");
}

#[test]
fn test_out_of_range_indexer_is_rejected() {
    let mut table = SortedHashTable::with_indexer(4, |_: &[u8], cap: usize| cap).unwrap();

    let result = table.set(b"key", b"value");

    assert!(matches!(result, Err(KvError::InvalidArgument(_))));
    assert!(table.is_empty());
    assert_eq!(table.get(b"key"), None);
}

// =============================================================================
// Teardown Tests
// =============================================================================

#[test]
fn test_delete_releases_every_record() {
    let mut table = SortedHashTable::create(3).unwrap();
    for i in 0..25 {
        table.set(format!("k{}", i).as_bytes(), b"v").unwrap();
    }
    table.set(b"k3", b"updated").unwrap();

    assert_eq!(table.delete(), 25);
}

#[test]
fn test_delete_empty_table() {
    let table = SortedHashTable::create(3).unwrap();
    assert_eq!(table.delete(), 0);
}

#[test]
fn test_delete_absent_table_is_noop() {
    assert_eq!(SortedHashTable::delete_opt(None), 0);

    let table = table_with(2, &[("a", "1"), ("b", "2")]);
    assert_eq!(SortedHashTable::delete_opt(Some(table)), 2);
}

#[test]
fn test_stats_count_occupied_buckets() {
    let table = table_with(1, &[("a", "1"), ("b", "2")]);
    let stats = table.stats();
    assert_eq!(stats.capacity, 1);
    assert_eq!(stats.len, 2);
    assert_eq!(stats.occupied_buckets, 1);
    assert_eq!(stats.longest_chain, 2);
}
