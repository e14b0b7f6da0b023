//! Per-session result storage.
//!
//! Model replies must outlive unrelated interactions: the front-end re-reads
//! this store on every render instead of recomputing. One store per session,
//! one slot per action, last write wins, nothing persisted past the session.

use crate::models::ChatReply;
use crate::Result;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// The three result categories tracked per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Caption,
    Vqa,
    Persona,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Caption, Slot::Vqa, Slot::Persona];

    pub fn label(&self) -> &'static str {
        match self {
            Slot::Caption => "caption",
            Slot::Vqa => "vqa",
            Slot::Persona => "persona",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Holds the most recent reply for each slot.
///
/// Mutated only by the active action handler; reads have no side effects and
/// never trigger computation.
#[derive(Debug)]
pub struct SessionStore {
    id: Uuid,
    slots: HashMap<Slot, ChatReply>,
}

impl SessionStore {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        tracing::debug!("Starting session {}", id);
        Self {
            id,
            slots: HashMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Record a reply, replacing any prior value for the slot.
    pub fn set(&mut self, slot: Slot, reply: ChatReply) {
        self.slots.insert(slot, reply);
    }

    pub fn get(&self, slot: Slot) -> Option<&ChatReply> {
        self.slots.get(&slot)
    }

    /// Drop one slot's value, returning it if it was set.
    pub fn clear(&mut self, slot: Slot) -> Option<ChatReply> {
        self.slots.remove(&slot)
    }

    pub fn clear_all(&mut self) {
        self.slots.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Snapshot of all set slots, for display layers.
    pub fn to_json(&self) -> Result<String> {
        let mut map = serde_json::Map::new();
        for slot in Slot::ALL {
            if let Some(reply) = self.get(slot) {
                map.insert(slot.label().to_string(), serde_json::to_value(reply)?);
            }
        }
        Ok(serde_json::to_string_pretty(&serde_json::Value::Object(
            map,
        ))?)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let store = SessionStore::new();
        assert!(store.is_empty());
        for slot in Slot::ALL {
            assert!(store.get(slot).is_none());
        }
    }

    #[test]
    fn test_get_returns_exactly_what_was_set() {
        let mut store = SessionStore::new();
        let reply = ChatReply::new("A cat on a mat");

        store.set(Slot::Caption, reply.clone());
        assert_eq!(store.get(Slot::Caption), Some(&reply));
        // Reads are idempotent.
        assert_eq!(store.get(Slot::Caption), Some(&reply));
    }

    #[test]
    fn test_set_overwrites_prior_value() {
        let mut store = SessionStore::new();
        store.set(Slot::Vqa, ChatReply::new("black"));
        store.set(Slot::Vqa, ChatReply::new("orange"));

        assert_eq!(store.get(Slot::Vqa).unwrap().text, "orange");
    }

    #[test]
    fn test_slots_are_independent() {
        let mut store = SessionStore::new();
        store.set(Slot::Caption, ChatReply::new("a dog"));
        store.set(Slot::Persona, ChatReply::new("what a cutie"));

        store.clear(Slot::Caption);
        assert!(store.get(Slot::Caption).is_none());
        assert_eq!(store.get(Slot::Persona).unwrap().text, "what a cutie");
        assert!(store.get(Slot::Vqa).is_none());
    }

    #[test]
    fn test_clear_all() {
        let mut store = SessionStore::new();
        store.set(Slot::Caption, ChatReply::new("a dog"));
        store.set(Slot::Vqa, ChatReply::new("brown"));

        store.clear_all();
        assert!(store.is_empty());
    }

    #[test]
    fn test_to_json_lists_only_set_slots() {
        let mut store = SessionStore::new();
        store.set(Slot::Caption, ChatReply::new("a dog in the grass"));

        let json = store.to_json().unwrap();
        assert!(json.contains("\"caption\""));
        assert!(json.contains("a dog in the grass"));
        assert!(!json.contains("\"vqa\""));
    }
}
