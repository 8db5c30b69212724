use super::test_helpers::MemoryStore;
use super::*;

#[test]
fn load_json_missing_key_is_none() {
    let store = MemoryStore::new();
    let value: Option<Vec<String>> = load_json(&store, "nope");
    assert_eq!(value, None);
}

#[test]
fn save_then_load_round_trips() {
    let store = MemoryStore::new();
    save_json(&store, "k", &vec!["a".to_owned(), "b".to_owned()]);
    let value: Option<Vec<String>> = load_json(&store, "k");
    assert_eq!(value, Some(vec!["a".to_owned(), "b".to_owned()]));
}

#[test]
fn load_json_malformed_payload_is_none() {
    let store = MemoryStore::new();
    store.set("k", "{not json");
    let value: Option<Vec<String>> = load_json(&store, "k");
    assert_eq!(value, None);
}

#[test]
fn remove_discards_entry() {
    let store = MemoryStore::new();
    store.set("k", "\"v\"");
    store.remove("k");
    assert_eq!(store.get("k"), None);
}

#[test]
fn browser_stores_are_inert_off_browser() {
    // Without the csr feature the web-sys globals are absent; reads are None
    // and writes are swallowed.
    let store = BrowserLocalStore;
    store.set("k", "v");
    assert_eq!(store.get("k"), None);
    let session = BrowserSessionStore;
    session.set("k", "v");
    assert_eq!(session.get("k"), None);
}
