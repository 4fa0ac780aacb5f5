use super::*;
use std::sync::Arc;

#[test]
fn take_returns_staged_image() {
    let store = PendingImageStore::new();
    store.put("+15551234567", "aGVsbG8=".to_string());
    assert_eq!(store.take("+15551234567"), Some("aGVsbG8=".to_string()));
}

#[test]
fn take_consumes_the_entry() {
    let store = PendingImageStore::new();
    store.put("+15551234567", "aGVsbG8=".to_string());
    store.take("+15551234567");
    assert_eq!(store.take("+15551234567"), None);
}

#[test]
fn take_without_put_returns_none() {
    let store = PendingImageStore::new();
    assert_eq!(store.take("+15551234567"), None);
}

#[test]
fn put_overwrites_previous_entry() {
    let store = PendingImageStore::new();
    store.put("+15551234567", "first".to_string());
    store.put("+15551234567", "second".to_string());
    assert_eq!(store.take("+15551234567"), Some("second".to_string()));
    assert_eq!(store.take("+15551234567"), None);
}

#[test]
fn entries_are_per_sender() {
    let store = PendingImageStore::new();
    store.put("+15551111111", "one".to_string());
    store.put("+15552222222", "two".to_string());
    assert_eq!(store.take("+15552222222"), Some("two".to_string()));
    assert_eq!(store.take("+15551111111"), Some("one".to_string()));
}

#[test]
fn concurrent_takes_consume_at_most_once() {
    let store = Arc::new(PendingImageStore::new());
    store.put("+15551234567", "staged".to_string());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            std::thread::spawn(move || store.take("+15551234567"))
        })
        .collect();

    let hits = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(Option::is_some)
        .count();
    assert_eq!(hits, 1);
}
