//! Directory emulation over flat listings.
//!
//! Flat-namespace stores only return object keys; the directories a
//! caller expects to see are implied by key segments. This pass walks
//! every entry's parent chain, synthesizes the directories no backend
//! reported, resolves same-path collisions and fixes the ordering.

use std::collections::HashSet;

use crate::entry::Entry;
use crate::path::dirname;

/// Completes a listing with the parent directories its entries imply.
///
/// Directories already present in the input are never duplicated. When
/// the same path occurs both as a file and as a directory, the directory
/// wins. The result is sorted by path, ascending and case-sensitive, and
/// contains each path exactly once, so the pass is idempotent.
pub fn emulate_directories(mut entries: Vec<Entry>) -> Vec<Entry> {
    let mut listed: HashSet<String> = HashSet::new();
    let mut inferred: Vec<String> = Vec::new();

    for entry in &entries {
        if entry.is_dir() {
            listed.insert(entry.path.clone());
        }
        let mut parent = entry.dirname.clone();
        while !parent.is_empty() && !listed.contains(&parent) {
            inferred.push(parent.clone());
            parent = dirname(&parent);
        }
    }

    inferred.sort_unstable();
    inferred.dedup();
    for dir in inferred {
        if !listed.contains(&dir) {
            entries.push(Entry::directory(&dir));
            listed.insert(dir);
        }
    }

    entries.retain(|entry| entry.is_dir() || !listed.contains(&entry.path));
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries.dedup_by(|a, b| a.path == b.path);
    entries
}
