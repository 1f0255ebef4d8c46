//! Integration tests for persistent collections
//!
//! Tests SdVec and SdMap with structural sharing and immutability.

use std::sync::Arc;

use synthdata_foundation::{ParamValue, SdMap, SdVec};

// =============================================================================
// SdVec
// =============================================================================

#[test]
fn vector_empty() {
    let v: SdVec<ParamValue> = SdVec::new();
    assert!(v.is_empty());
    assert_eq!(v.len(), 0);
    assert!(v.first().is_none());
}

#[test]
fn vector_push_back_is_persistent() {
    let v1 = SdVec::new().push_back(1);
    let v2 = v1.push_back(2);

    assert_eq!(v1.len(), 1);
    assert_eq!(v2.len(), 2);
    assert_eq!(v2.last(), Some(&2));
}

#[test]
fn vector_update_out_of_bounds() {
    let v = SdVec::from(vec![1, 2, 3]);
    assert!(v.update(3, 9).is_none());

    let updated = v.update(1, 9).unwrap();
    assert_eq!(updated.iter().copied().collect::<Vec<_>>(), vec![1, 9, 3]);
    assert_eq!(v.get(1), Some(&2));
}

#[test]
fn vector_remove() {
    let v = SdVec::from(vec!["a", "b", "c"]);
    let removed = v.remove(0).unwrap();
    assert_eq!(removed.first(), Some(&"b"));
    assert!(v.remove(5).is_none());
}

#[test]
fn vector_retain_keeps_order() {
    let v: SdVec<i32> = (1..=6).collect();
    let even = v.retain(|n| n % 2 == 0);
    assert_eq!(even.into_iter().collect::<Vec<_>>(), vec![2, 4, 6]);
}

#[test]
fn vector_retain_all_shares_elements() {
    let item = Arc::new(5);
    let v = SdVec::new().push_back(Arc::clone(&item));
    let kept = v.retain(|_| true);
    assert_eq!(kept, v);
    assert!(Arc::ptr_eq(kept.get(0).unwrap(), &item));
}

#[test]
fn vector_update_shares_untouched_elements() {
    let a = Arc::new("a");
    let b = Arc::new("b");
    let v = SdVec::from(vec![Arc::clone(&a), Arc::clone(&b)]);
    let updated = v.update(1, Arc::new("c")).unwrap();
    assert!(Arc::ptr_eq(updated.get(0).unwrap(), &a));
}

#[test]
fn vector_find_and_position() {
    let v = SdVec::from(vec![10, 20, 30]);
    assert_eq!(v.position(|n| *n == 20), Some(1));
    assert_eq!(v.find(|n| *n > 15), Some(&20));
    assert_eq!(v.position(|n| *n == 99), None);
}

// =============================================================================
// SdMap
// =============================================================================

#[test]
fn map_insert_is_persistent() {
    let m1: SdMap<String, i64> = SdMap::new().insert("a".to_string(), 1);
    let m2 = m1.insert("b".to_string(), 2);

    assert_eq!(m1.len(), 1);
    assert_eq!(m2.len(), 2);
    assert!(!m1.contains_key(&"b".to_string()));
}

#[test]
fn map_remove() {
    let m: SdMap<&str, i64> = [("a", 1), ("b", 2)].into_iter().collect();
    let removed = m.remove(&"a");
    assert_eq!(removed.len(), 1);
    assert_eq!(m.get(&"a"), Some(&1));
}

#[test]
fn map_iterates_in_key_order() {
    let m: SdMap<i64, &str> = [(3, "c"), (1, "a"), (2, "b")].into_iter().collect();
    let values: Vec<_> = m.iter().map(|(_, v)| *v).collect();
    assert_eq!(values, vec!["a", "b", "c"]);
}

#[test]
fn map_equality_is_structural() {
    let a: SdMap<&str, i64> = SdMap::new().insert("x", 1);
    let b: SdMap<&str, i64> = SdMap::new().insert("x", 1);
    assert_eq!(a, b);
    assert_ne!(a, b.insert("y", 2));
}
