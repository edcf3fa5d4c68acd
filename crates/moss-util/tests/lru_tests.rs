//! Integration tests for the bounded LRU cache.

use moss_util::LruCache;

#[test]
fn test_get_and_put() {
    let mut cache: LruCache<&str, i32> = LruCache::new(4);
    cache.put("a", 1);
    cache.put("b", 2);
    assert_eq!(cache.get(&"a"), Some(&1));
    assert_eq!(cache.get(&"b"), Some(&2));
    assert_eq!(cache.get(&"c"), None);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_put_updates_existing_key() {
    let mut cache: LruCache<&str, i32> = LruCache::new(2);
    cache.put("a", 1);
    cache.put("a", 10);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&"a"), Some(&10));
}

#[test]
fn test_count_is_min_of_inserted_and_limit() {
    let mut cache: LruCache<u32, u32> = LruCache::new(3);
    for key in 0..10 {
        cache.put(key, key * 100);
    }
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.limit(), 3);
}

#[test]
fn test_eviction_order_after_access() {
    // Insert 1, 2, 3, access 1, insert 4: 2 is the LRU entry and must be
    // the one evicted; the surviving set is {4, 1, 3} in MRU order.
    let mut cache: LruCache<u32, &str> = LruCache::new(3);
    cache.put(1, "one");
    cache.put(2, "two");
    cache.put(3, "three");
    assert_eq!(cache.get(&1), Some(&"one"));
    cache.put(4, "four");

    let keys: Vec<u32> = cache.keys().copied().collect();
    assert_eq!(keys, vec![4, 1, 3]);
    assert!(!cache.contains(&2));
    assert_eq!(cache.len(), 3);
}

#[test]
fn test_get_promotes_entry() {
    let mut cache: LruCache<u32, u32> = LruCache::new(2);
    cache.put(1, 1);
    cache.put(2, 2);
    let _ = cache.get(&1);
    cache.put(3, 3);
    // 2 was least recently used once 1 was touched.
    assert!(cache.contains(&1));
    assert!(!cache.contains(&2));
    assert!(cache.contains(&3));
}

#[test]
fn test_get_or_insert_with_hits_without_factory() {
    let mut cache: LruCache<&str, i32> = LruCache::new(2);
    cache.put("a", 1);
    let value = *cache.get_or_insert_with("a", || panic!("factory must not run on a hit"));
    assert_eq!(value, 1);
}

#[test]
fn test_get_or_insert_with_inserts_and_can_evict() {
    let mut cache: LruCache<u32, u32> = LruCache::new(2);
    cache.put(1, 1);
    cache.put(2, 2);
    let value = *cache.get_or_insert_with(3, || 3);
    assert_eq!(value, 3);
    assert_eq!(cache.len(), 2);
    assert!(!cache.contains(&1));
}

#[test]
fn test_remove() {
    let mut cache: LruCache<&str, i32> = LruCache::new(4);
    cache.put("a", 1);
    cache.put("b", 2);
    assert_eq!(cache.remove(&"a"), Some(1));
    assert_eq!(cache.remove(&"a"), None);
    assert_eq!(cache.len(), 1);
    assert!(!cache.contains(&"a"));
    assert!(cache.contains(&"b"));
}

#[test]
fn test_clear() {
    let mut cache: LruCache<u32, u32> = LruCache::new(4);
    cache.put(1, 1);
    cache.put(2, 2);
    cache.clear();
    assert!(cache.is_empty());
    assert!(!cache.contains(&1));
}

#[test]
fn test_iteration_most_recent_first() {
    let mut cache: LruCache<u32, &str> = LruCache::new(8);
    cache.put(1, "one");
    cache.put(2, "two");
    cache.put(3, "three");
    let _ = cache.get(&2);

    let order: Vec<(u32, &str)> = cache.iter().map(|(&k, &v)| (k, v)).collect();
    assert_eq!(order, vec![(2, "two"), (3, "three"), (1, "one")]);
}

#[test]
fn test_many_inserts_and_removals_keep_invariants() {
    let mut cache: LruCache<u32, u32> = LruCache::new(16);
    for round in 0..4u32 {
        for key in 0..40u32 {
            cache.put(key, key + round);
        }
        assert_eq!(cache.len(), 16);
        for key in 30..40u32 {
            let _ = cache.remove(&key);
        }
        assert_eq!(cache.len(), 6);
    }
    // The most recent surviving keys are still retrievable.
    for key in 24..30u32 {
        assert!(cache.contains(&key));
    }
}
