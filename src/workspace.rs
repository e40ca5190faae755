//! Items placed on a study workspace and the store that keeps notes.
//!
//! Every item is one of a closed set of kinds, each with its own payload.
//! Notes are additionally written to a `NoteStore` supplied by the caller,
//! so they can be restored independently of the rest of the workspace.

use crate::distribution::{Distribution, JointDistribution};
use crate::simulator::TraitCross;
use crate::Genotype;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotePayload {
    pub text: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// A trait picked for study, with the genotype chosen for each parent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitPayload {
    pub trait_key: String,
    pub options: Vec<Genotype>,
    pub parent1: Option<Genotype>,
    pub parent2: Option<Genotype>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrossPayload {
    pub trait_key: String,
    pub parent1: Genotype,
    pub parent2: Genotype,
    pub result: TraitCross,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointPayload {
    pub trait_keys: Vec<String>,
    pub distribution: JointDistribution,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkspaceItem {
    Note(NotePayload),
    Trait(TraitPayload),
    Cross(CrossPayload),
    Joint(JointPayload),
}

impl WorkspaceItem {
    /// The distribution the item displays, if it has one.
    pub fn distribution(&self) -> Option<&Distribution> {
        match self {
            WorkspaceItem::Note(_) | WorkspaceItem::Trait(_) => None,
            WorkspaceItem::Cross(cross) => Some(&cross.result.phenotypic_ratios),
            WorkspaceItem::Joint(joint) => Some(&joint.distribution),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub x: f64,
    pub y: f64,
    pub item: WorkspaceItem,
}

/// Local storage for note items.
pub trait NoteStore {
    fn save(&mut self, id: ItemId, note: &NotePayload);
    fn load(&self, id: ItemId) -> Option<NotePayload>;
    /// Removes the note, returning what was stored.
    fn evict(&mut self, id: ItemId) -> Option<NotePayload>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryNoteStore {
    notes: HashMap<ItemId, NotePayload>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl NoteStore for MemoryNoteStore {
    fn save(&mut self, id: ItemId, note: &NotePayload) {
        self.notes.insert(id, note.clone());
    }

    fn load(&self, id: ItemId) -> Option<NotePayload> {
        self.notes.get(&id).cloned()
    }

    fn evict(&mut self, id: ItemId) -> Option<NotePayload> {
        self.notes.remove(&id)
    }
}

pub struct Workspace<S: NoteStore> {
    items: IndexMap<ItemId, PlacedItem>,
    notes: S,
    next_id: u64,
}

impl<S: NoteStore> Workspace<S> {
    pub fn new(notes: S) -> Self {
        Self {
            items: IndexMap::new(),
            notes,
            next_id: 0,
        }
    }

    pub fn add(&mut self, x: f64, y: f64, item: WorkspaceItem) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        if let WorkspaceItem::Note(note) = &item {
            self.notes.save(id, note);
        }
        self.items.insert(id, PlacedItem { x, y, item });
        id
    }

    /// Replaces an item's content, keeping its position.
    ///
    /// Returns false when there is no such item.
    pub fn update(&mut self, id: ItemId, item: WorkspaceItem) -> bool {
        let placed = match self.items.get_mut(&id) {
            Some(placed) => placed,
            None => return false,
        };
        match (&placed.item, &item) {
            (_, WorkspaceItem::Note(note)) => self.notes.save(id, note),
            (WorkspaceItem::Note(_), _) => {
                self.notes.evict(id);
            }
            _ => {}
        }
        placed.item = item;
        true
    }

    pub fn move_to(&mut self, id: ItemId, x: f64, y: f64) -> bool {
        match self.items.get_mut(&id) {
            Some(placed) => {
                placed.x = x;
                placed.y = y;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: ItemId) -> Option<PlacedItem> {
        let placed = self.items.shift_remove(&id)?;
        if let WorkspaceItem::Note(_) = placed.item {
            self.notes.evict(id);
        }
        Some(placed)
    }

    pub fn get(&self, id: ItemId) -> Option<&PlacedItem> {
        self.items.get(&id)
    }

    /// Items in the order they were added.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &PlacedItem)> {
        self.items.iter().map(|(id, placed)| (*id, placed))
    }

    /// Reloads note content from the store, dropping notes the store has
    /// lost. Returns the number of notes dropped.
    pub fn restore_notes(&mut self) -> usize {
        let notes = &self.notes;
        let mut lost = vec![];
        for (id, placed) in self.items.iter_mut() {
            if let WorkspaceItem::Note(note) = &mut placed.item {
                match notes.load(*id) {
                    Some(stored) => *note = stored,
                    None => lost.push(*id),
                }
            }
        }
        for id in lost.iter() {
            debug!("note {:?} missing from store, dropping it", id);
            self.items.shift_remove(id);
        }
        lost.len()
    }

    pub fn note_store(&self) -> &S {
        &self.notes
    }

    pub fn note_store_mut(&mut self) -> &mut S {
        &mut self.notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn note(text: &str) -> WorkspaceItem {
        WorkspaceItem::Note(NotePayload {
            text: text.into(),
            color: None,
        })
    }

    fn joint() -> WorkspaceItem {
        let distribution: JointDistribution = vec![
            ("Brown+Curly".to_string(), 0.5625),
            ("Blue+Straight".to_string(), 0.0625),
        ]
        .into_iter()
        .collect();
        WorkspaceItem::Joint(JointPayload {
            trait_keys: vec!["eye_color".into(), "hair_texture".into()],
            distribution,
        })
    }

    #[test]
    fn test_notes_saved_and_evicted() {
        let mut workspace = Workspace::new(MemoryNoteStore::new());
        let a = workspace.add(0.0, 0.0, note("dominant first"));
        let b = workspace.add(10.0, 5.0, joint());
        assert_eq!(workspace.note_store().len(), 1);
        assert_eq!(
            workspace.note_store().load(a).map(|n| n.text),
            Some("dominant first".to_string())
        );
        assert!(workspace.remove(a).is_some());
        assert!(workspace.note_store().is_empty());
        assert!(workspace.remove(a).is_none());
        assert_eq!(workspace.items().map(|(id, _)| id).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_update_switches_kind() {
        let mut workspace = Workspace::new(MemoryNoteStore::new());
        let id = workspace.add(1.0, 2.0, joint());
        assert!(workspace.update(id, note("now a note")));
        assert_eq!(workspace.note_store().len(), 1);
        assert!(workspace.update(id, joint()));
        assert!(workspace.note_store().is_empty());
        assert!(workspace.move_to(id, 3.0, 4.0));
        let placed = workspace.get(id).map(|p| (p.x, p.y));
        assert_eq!(placed, Some((3.0, 4.0)));
        assert!(!workspace.update(ItemId(99), joint()));
    }

    #[test]
    fn test_restore_notes() {
        let mut workspace = Workspace::new(MemoryNoteStore::new());
        let kept = workspace.add(0.0, 0.0, note("old"));
        let lost = workspace.add(0.0, 0.0, note("gone"));
        workspace.note_store_mut().save(
            kept,
            &NotePayload {
                text: "edited elsewhere".into(),
                color: Some("yellow".into()),
            },
        );
        workspace.note_store_mut().evict(lost);

        assert_eq!(workspace.restore_notes(), 1);
        assert!(workspace.get(lost).is_none());
        match workspace.get(kept).map(|p| &p.item) {
            Some(WorkspaceItem::Note(n)) => assert_eq!(n.text, "edited elsewhere"),
            other => panic!("unexpected item {:?}", other),
        }
    }

    #[test]
    fn test_item_kind_tag() -> Result<(), Box<dyn Error>> {
        let value = serde_json::to_value(&joint())?;
        assert_eq!(value["kind"], "joint");
        assert_eq!(value["distribution"]["Brown+Curly"], 0.5625);
        let back: WorkspaceItem = serde_json::from_value(value)?;
        assert_eq!(back.distribution().map(|d| d.len()), Some(2));
        assert_eq!(note("x").distribution(), None);
        Ok(())
    }
}
