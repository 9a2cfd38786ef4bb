#![allow(missing_docs)]

use std::collections::HashSet;

use omni_stream_edit::ExtractEvent;

#[test]
fn extract_event_ids_are_non_empty_and_unique() {
    let mut seen = HashSet::new();
    for event in ExtractEvent::ALL {
        let id = event.as_str();
        assert!(!id.is_empty());
        assert!(seen.insert(id), "duplicate observability event id detected: {id}");
    }
}

#[test]
fn extract_event_ids_follow_namespace_convention() {
    for event in ExtractEvent::ALL {
        let id = event.as_str();
        assert!(id.starts_with("stream_edit."), "unexpected event namespace: {id}");
    }
}
