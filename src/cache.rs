//! Per-extraction memoization.
//!
//! One [`Cache`] instance is owned by a single extraction attempt and
//! dropped with it; nothing here is shared across threads or calls.
//! Entries are keyed by fingerprint strings of the form
//! `<stable-node-id>:<operation>[:<flag>]`, where stable ids are handed
//! out on demand from a monotonically increasing counter.

use std::collections::HashMap;

use crate::dom::NodeId;

/// Fingerprint-keyed memoization for inner text and visibility lookups.
#[derive(Debug, Default)]
pub(crate) struct Cache {
    text: HashMap<String, String>,
    flags: HashMap<String, bool>,
    ids: HashMap<NodeId, u64>,
    next_id: u64,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable id for a node, assigned on first sight.
    fn stable_id(&mut self, node: NodeId) -> u64 {
        if let Some(id) = self.ids.get(&node) {
            return *id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.ids.insert(node, id);
        id
    }

    /// Build the fingerprint key for a node-scoped operation.
    pub fn fingerprint(&mut self, node: NodeId, operation: &str, flag: Option<bool>) -> String {
        let id = self.stable_id(node);
        match flag {
            Some(flag) => format!("{id}:{operation}:{flag}"),
            None => format!("{id}:{operation}"),
        }
    }

    pub fn get_text(&self, fingerprint: &str) -> Option<&String> {
        self.text.get(fingerprint)
    }

    pub fn put_text(&mut self, fingerprint: String, value: String) {
        self.text.insert(fingerprint, value);
    }

    pub fn get_flag(&self, fingerprint: &str) -> Option<bool> {
        self.flags.get(fingerprint).copied()
    }

    pub fn put_flag(&mut self, fingerprint: String, value: bool) {
        self.flags.insert(fingerprint, value);
    }

    /// Drop all entries. Called between retry attempts and after any pass
    /// that mutates cached subtrees.
    pub fn clear(&mut self) {
        self.text.clear();
        self.flags.clear();
        self.ids.clear();
    }
}
