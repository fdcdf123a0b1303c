use mplex::store::Store;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Default, PartialEq)]
struct Wide {
    words: Vec<u64>,
}

impl Wide {
    fn filled(n: u64) -> Self {
        Self {
            words: vec![n; 256],
        }
    }

    fn is_consistent(&self) -> bool {
        self.words.windows(2).all(|w| w[0] == w[1])
    }
}

#[test]
fn test_set_then_get_returns_value() {
    let store = Store::new();
    for (i, key) in ["a", "b", "c"].iter().enumerate() {
        store.set(*key, i);
    }
    assert_eq!(store.get("a"), Some(0));
    assert_eq!(store.get("c"), Some(2));
    assert_eq!(store.get_or_default("b"), (1, true));
}

#[test]
fn test_never_set_key_is_absent() {
    let store: Store<Wide> = Store::new();
    assert_eq!(store.get("ghost"), None);
    assert_eq!(store.get_or_default("ghost"), (Wide::default(), false));
}

#[test]
fn test_existed_flag_on_overwrite() {
    let store = Store::new();
    assert!(!store.set("k", "v1"));
    assert!(store.set("k", "v2"));
    assert_eq!(store.get("k"), Some("v2"));
}

#[test]
fn test_concurrent_readers_never_see_torn_values() {
    let store = Arc::new(Store::new());
    store.set("shared", Wide::filled(0));
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut reads = 0u64;
                while !done.load(Ordering::Acquire) {
                    let value = store.get("shared").unwrap();
                    assert!(value.is_consistent(), "torn read: {:?}", &value.words[..4]);
                    reads += 1;
                }
                reads
            })
        })
        .collect();

    let writers: Vec<_> = (1..=2u64)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..500u64 {
                    assert!(store.set("shared", Wide::filled(w * 1000 + i)));
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::Release);
    for reader in readers {
        reader.join().unwrap();
    }

    let last = store.get("shared").unwrap();
    assert!(last.is_consistent());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_concurrent_distinct_keys_all_land() {
    let store = Arc::new(Store::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..100 {
                    assert!(!store.set(format!("{t}-{i}"), t * 100 + i));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(store.len(), 800);
    assert_eq!(store.get("7-99"), Some(799));
}
