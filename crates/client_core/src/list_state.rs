//! Session-scoped copy of the items and owners confirmed by the remote store.

use shared::domain::{Item, ItemId, Owner, OwnerId};

use crate::error::StateError;

#[derive(Debug, Default, Clone)]
pub struct ListState {
    items: Vec<Item>,
    owners: Vec<Owner>,
    initialized: bool,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces both collections wholesale.
    pub fn initialize(&mut self, items: Vec<Item>, owners: Vec<Owner>) {
        self.items = items;
        self.owners = owners;
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn owner_name(&self, owner_id: OwnerId) -> Result<&str, StateError> {
        self.owners
            .iter()
            .find(|owner| owner.id == owner_id)
            .map(|owner| owner.name.as_str())
            .ok_or(StateError::UnknownOwner(owner_id))
    }

    pub fn has_owner(&self, owner_id: OwnerId) -> bool {
        self.owners.iter().any(|owner| owner.id == owner_id)
    }

    /// Appends a confirmed item. If the id is already held, the held item is dropped and
    /// returned so the list keeps one entry per id.
    pub fn insert(&mut self, item: Item) -> Option<Item> {
        let replaced = self.remove(&item.id);
        self.items.push(item);
        replaced
    }

    /// Removes the item if present. Removing an absent id is a no-op.
    pub fn remove(&mut self, item_id: &ItemId) -> Option<Item> {
        let index = self.items.iter().position(|item| &item.id == item_id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, item_id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == item_id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn owners(&self) -> &[Owner] {
        &self.owners
    }
}

#[cfg(test)]
#[path = "tests/list_state_tests.rs"]
mod tests;
