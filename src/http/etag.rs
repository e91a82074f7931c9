//! `ETag` generation and `If-None-Match` evaluation.
//!
//! Entities are hashed whole, which fits a server that reads files fully
//! before responding. The hasher is unkeyed, so the same bytes always
//! produce the same tag, within a process and across restarts.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Compute a strong `ETag` for an entity body.
///
/// The returned value is already quoted, e.g. `"9f86d08188"`.
pub fn compute(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Evaluate an `If-None-Match` header against the entity's `ETag`.
///
/// Handles comma-separated candidate lists and the `*` wildcard. Returns
/// true when the client's copy is current and a 304 should be sent.
pub fn matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|candidates| {
        candidates
            .split(',')
            .any(|candidate| candidate.trim() == etag || candidate.trim() == "*")
    })
}
