//! SelectionStore: the single source of truth for both selections.
//!
//! Pure storage. No validation, no side effects; whoever writes here is
//! responsible for recomputing anything derived from it.

use crate::catalog::{Identifier, Role};

/// A role paired with its current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub role: Role,
    pub value: Option<Identifier>,
}

/// Current source and destination selections for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    source: Option<Identifier>,
    destination: Option<Identifier>,
}

impl SelectionStore {
    /// Both slots unselected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: Role) -> Option<Identifier> {
        match role {
            Role::Source => self.source,
            Role::Destination => self.destination,
        }
    }

    pub fn set(&mut self, role: Role, value: Option<Identifier>) {
        debug_assert!(value.map_or(true, |id| id.role() == role));
        match role {
            Role::Source => self.source = value,
            Role::Destination => self.destination = value,
        }
    }

    /// Snapshot of one slot.
    pub fn selection(&self, role: Role) -> Selection {
        Selection {
            role,
            value: self.get(role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let store = SelectionStore::new();
        assert_eq!(store.get(Role::Source), None);
        assert_eq!(store.get(Role::Destination), None);
    }

    #[test]
    fn slots_are_independent() {
        let mut store = SelectionStore::new();
        store.set(Role::Source, Some(Identifier::File));
        assert_eq!(store.get(Role::Source), Some(Identifier::File));
        assert_eq!(store.get(Role::Destination), None);

        store.set(Role::Destination, Some(Identifier::Azure));
        store.set(Role::Source, None);
        assert_eq!(store.get(Role::Source), None);
        assert_eq!(store.get(Role::Destination), Some(Identifier::Azure));
    }

    #[test]
    fn set_replaces_previous_value() {
        let mut store = SelectionStore::new();
        store.set(Role::Source, Some(Identifier::Database));
        store.set(Role::Source, Some(Identifier::Api));
        assert_eq!(
            store.selection(Role::Source),
            Selection {
                role: Role::Source,
                value: Some(Identifier::Api)
            }
        );
    }
}
