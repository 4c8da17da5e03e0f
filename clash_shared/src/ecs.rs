//! Entity storage.
//!
//! Entities of one kind live in a `Group<T>` keyed by `EntityId`. A group
//! keeps insertion order so every pass over it (updates, collisions, draw
//! order) is deterministic for a given seed.

use serde::{Deserialize, Serialize};

/// Opaque entity id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Hands out unique ids across all groups of a world.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    pub fn next(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Insertion-ordered collection of entities of one type.
#[derive(Debug, Clone)]
pub struct Group<T> {
    members: Vec<(EntityId, T)>,
}

impl<T> Default for Group<T> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
        }
    }
}

impl<T> Group<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: EntityId, value: T) {
        self.members.push((id, value));
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.members
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.members
            .iter_mut()
            .find(|(eid, _)| *eid == id)
            .map(|(_, v)| v)
    }

    /// Removes a member, returning it if present.
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let idx = self.members.iter().position(|(eid, _)| *eid == id)?;
        Some(self.members.remove(idx).1)
    }

    /// Keeps members for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.members.retain(|(_, v)| keep(v));
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.members.iter().map(|(id, v)| (*id, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.members.iter_mut().map(|(id, v)| (*id, v))
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.members.iter().map(|(id, _)| *id).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }
}
