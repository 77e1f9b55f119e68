//! Concurrent access to a shared store.

use figstore::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_concurrent_loads_keep_every_commit() {
    let store = Arc::new(FigStore::new());
    let threads = 8;
    let loads_per_thread = 50;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..loads_per_thread {
                    let source =
                        MemorySource::from_pairs([("shared", format!("{}-{}", t, i))]).named(format!("t{}", t));
                    store.load(&[&source]).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let history = store.history("shared");
    assert_eq!(history.len(), threads * loads_per_thread);

    // Each thread's own commits appear in the order it made them.
    for t in 0..threads {
        let label = format!("t{}", t);
        let seen: Vec<String> = history
            .iter()
            .filter(|fig| fig.source().to_string() == label)
            .map(|fig| fig.value().as_str().unwrap().to_string())
            .collect();
        let expected: Vec<String> = (0..loads_per_thread).map(|i| format!("{}-{}", t, i)).collect();
        assert_eq!(seen, expected);
    }

    assert_eq!(store.get("shared").unwrap(), history.last().unwrap().value().clone());
}

#[test]
fn test_readers_never_see_missing_loaded_key() {
    let store = Arc::new(FigStore::new());
    store.set("stable", "yes");
    let running = Arc::new(AtomicBool::new(true));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let running = Arc::clone(&running);
            thread::spawn(move || {
                let mut reads = 0usize;
                while running.load(Ordering::Relaxed) {
                    assert!(store.contains("stable"));
                    assert!(store.get_fig("stable").is_ok());
                    reads += 1;
                }
                reads
            })
        })
        .collect();

    for i in 0..200 {
        store.set("stable", i);
        let source = MemorySource::from_pairs([(format!("k{}", i), "v")]);
        store.load(&[&source]).unwrap();
    }
    running.store(false, Ordering::Relaxed);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(store.history("stable").len(), 201);
    assert_eq!(store.len(), 201);
}

#[test]
fn test_transform_may_read_store_during_load() {
    let store = Arc::new(FigStore::new());
    store.set("prefix", "app");

    let reader = Arc::clone(&store);
    let source = MemorySource::from_pairs([("port", "80")]).remap_keys(move |key| {
        // Runs during the drain phase, outside the store lock.
        let prefix = reader.get_or("prefix", "none");
        format!("{}.{}", prefix, key)
    });

    store.load(&[&source]).unwrap();
    assert_eq!(store.get("app.port").unwrap().as_str(), Some("80"));
}
