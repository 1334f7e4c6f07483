//! Storage contract needed by the scheduling core.

use crate::error::{DrillError, Result};
use crate::types::{validate_text, Item, ItemId, NewItem, ProficiencyState, SheetId, MAX_TEXT_LEN};
use std::collections::{BTreeMap, BTreeSet};

/// Storage of items and their proficiency states.
///
/// Lookups of ids that do not exist fail with [`DrillError::UnknownItem`] or
/// [`DrillError::UnknownSheet`].
pub trait Store {
    fn get_state(&self, item: ItemId) -> Result<ProficiencyState>;
    fn put_state(&mut self, item: ItemId, state: &ProficiencyState) -> Result<()>;
    /// Write several states as one unit. Stores with transactions should
    /// apply all of them or none.
    fn put_states(&mut self, updates: &[(ItemId, ProficiencyState)]) -> Result<()> {
        for (item, state) in updates {
            self.put_state(*item, state)?;
        }
        Ok(())
    }
    /// Items mentioned by a sheet, joined with their states.
    fn items_in_sheet(&self, sheet: SheetId) -> Result<Vec<(ItemId, ProficiencyState)>>;
    fn all_items_with_state(&self) -> Result<Vec<(ItemId, ProficiencyState)>>;
    /// Accepted answers, displayed answer first.
    fn accepted_answers(&self, item: ItemId) -> Result<Vec<String>>;
    fn item(&self, item: ItemId) -> Result<Item>;
}

/// In-memory store keyed by item id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: BTreeMap<ItemId, Item>,
    states: BTreeMap<ItemId, ProficiencyState>,
    sheets: BTreeMap<SheetId, (String, BTreeSet<ItemId>)>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Create an empty sheet, or return the existing one with that name.
    pub fn add_sheet(&mut self, name: &str) -> Result<SheetId> {
        let name = validate_text("sheet name", name, MAX_TEXT_LEN)?;
        if let Some(id) = self.find_sheet(&name) {
            return Ok(id);
        }
        let id = SheetId(self.allocate_id());
        self.sheets.insert(id, (name, BTreeSet::new()));
        Ok(id)
    }

    pub fn find_sheet(&self, name: &str) -> Option<SheetId> {
        self.sheets
            .iter()
            .find(|(_, (sheet_name, _))| sheet_name == name)
            .map(|(id, _)| *id)
    }

    /// Add an item with a fresh state. Sheets named by the item are created on demand.
    pub fn add_item(&mut self, new_item: NewItem) -> Result<ItemId> {
        let new_item = new_item.normalized()?;
        let id = ItemId(self.allocate_id());

        for sheet in &new_item.sheets {
            let sheet_id = self.add_sheet(sheet)?;
            if let Some((_, members)) = self.sheets.get_mut(&sheet_id) {
                members.insert(id);
            }
        }

        self.items.insert(
            id,
            Item {
                id,
                question: new_item.question,
                answers: new_item.answers,
            },
        );
        self.states.insert(id, ProficiencyState::default());
        Ok(id)
    }

    /// Delete an item together with its state and sheet memberships.
    pub fn remove_item(&mut self, item: ItemId) -> Result<()> {
        self.items.remove(&item).ok_or(DrillError::UnknownItem(item))?;
        self.states.remove(&item);
        for (_, members) in self.sheets.values_mut() {
            members.remove(&item);
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn get_state(&self, item: ItemId) -> Result<ProficiencyState> {
        self.states
            .get(&item)
            .copied()
            .ok_or(DrillError::UnknownItem(item))
    }

    fn put_state(&mut self, item: ItemId, state: &ProficiencyState) -> Result<()> {
        let slot = self
            .states
            .get_mut(&item)
            .ok_or(DrillError::UnknownItem(item))?;
        *slot = *state;
        Ok(())
    }

    fn items_in_sheet(&self, sheet: SheetId) -> Result<Vec<(ItemId, ProficiencyState)>> {
        let (_, members) = self
            .sheets
            .get(&sheet)
            .ok_or(DrillError::UnknownSheet(sheet))?;
        members
            .iter()
            .map(|id| Ok((*id, self.get_state(*id)?)))
            .collect()
    }

    fn all_items_with_state(&self) -> Result<Vec<(ItemId, ProficiencyState)>> {
        Ok(self.states.iter().map(|(id, state)| (*id, *state)).collect())
    }

    fn accepted_answers(&self, item: ItemId) -> Result<Vec<String>> {
        self.item(item).map(|item| item.answers)
    }

    fn item(&self, item: ItemId) -> Result<Item> {
        self.items
            .get(&item)
            .cloned()
            .ok_or(DrillError::UnknownItem(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn new_item(question: &str, sheets: &[&str]) -> NewItem {
        NewItem {
            question: question.into(),
            answers: vec![format!("{question}-answer")],
            sheets: sheets.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn items_start_fresh() {
        let mut store = MemoryStore::new();
        let id = store.add_item(new_item("gamarjoba", &[])).unwrap();
        assert_eq!(store.get_state(id).unwrap(), ProficiencyState::default());
        assert_eq!(store.accepted_answers(id).unwrap(), vec!["gamarjoba-answer"]);
    }

    #[test]
    fn sheets_track_membership() {
        let mut store = MemoryStore::new();
        let a = store.add_item(new_item("a", &["verbs"])).unwrap();
        let b = store.add_item(new_item("b", &["verbs", "nouns"])).unwrap();
        let verbs = store.find_sheet("verbs").unwrap();
        let nouns = store.find_sheet("nouns").unwrap();

        let ids = |sheet| {
            store
                .items_in_sheet(sheet)
                .unwrap()
                .into_iter()
                .map(|(id, _)| id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(verbs), vec![a, b]);
        assert_eq!(ids(nouns), vec![b]);
    }

    #[test]
    fn removing_item_drops_state() {
        let mut store = MemoryStore::new();
        let id = store.add_item(new_item("a", &["verbs"])).unwrap();
        store.remove_item(id).unwrap();

        assert!(matches!(store.get_state(id), Err(DrillError::UnknownItem(_))));
        let verbs = store.find_sheet("verbs").unwrap();
        assert!(store.items_in_sheet(verbs).unwrap().is_empty());
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.put_state(ItemId(7), &ProficiencyState::default()),
            Err(DrillError::UnknownItem(ItemId(7)))
        ));
        assert!(matches!(
            store.items_in_sheet(SheetId(3)),
            Err(DrillError::UnknownSheet(SheetId(3)))
        ));
    }
}
