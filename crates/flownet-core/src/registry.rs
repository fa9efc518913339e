//! Node registry: dense ids for node names, assigned in first-seen order.

use std::collections::HashMap;

use serde::Serialize;

/// Dense node id (index into the registry arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Bidirectional name <-> id mapping.
///
/// Names live once in the `names` arena; the hash map only points back into
/// it, so the two directions cannot drift apart. There is no removal.
#[derive(Debug, Default, Clone)]
pub struct NodeRegistry {
    names: Vec<String>,
    ids: HashMap<String, NodeId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `name`, assigning the next free id on first use.
    pub fn intern(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = NodeId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Look up an existing id without inserting.
    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// First id not yet handed out. Synthetic nodes are minted from here.
    pub fn next_id(&self) -> usize {
        self.names.len()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (NodeId(i as u32), name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent_and_dense() {
        let mut reg = NodeRegistry::new();
        let a = reg.intern("a");
        let b = reg.intern("b");
        assert_eq!(reg.intern("a"), a);
        assert_eq!(a.raw(), 0);
        assert_eq!(b.raw(), 1);
        assert_eq!(reg.next_id(), 2);
        assert_eq!(reg.name(b), Some("b"));
        assert_eq!(reg.id_of("c"), None);
    }
}
