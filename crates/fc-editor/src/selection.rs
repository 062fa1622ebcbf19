//! Click selection with the configurable multi-select modifier.

use crate::gate::{Gesture, allows};
use crate::input::Modifiers;
use fc_core::{NodeId, PermissionSet};
use smallvec::SmallVec;

/// A selectable graph element, by its graph-model id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Node(NodeId),
    Edge(NodeId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub selected: SmallVec<[Element; 4]>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, element: Element) -> bool {
        self.selected.contains(&element)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.selected.iter().filter_map(|e| match e {
            Element::Node(id) => Some(*id),
            Element::Edge(_) => None,
        })
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Whether this click adds to / toggles the selection instead of replacing it.
    pub fn is_additive(modifiers: Modifiers, perms: &PermissionSet) -> bool {
        allows(perms, Gesture::MultiSelect) && modifiers.holds(perms.multiple_select_key)
    }

    /// Apply a click on `hit` (`None` = empty canvas). Returns `true` if the
    /// selection changed.
    pub fn click(&mut self, hit: Option<Element>, modifiers: Modifiers, perms: &PermissionSet) -> bool {
        let additive = Self::is_additive(modifiers, perms);
        match hit {
            Some(element) if additive => {
                if let Some(pos) = self.selected.iter().position(|e| *e == element) {
                    self.selected.remove(pos);
                } else {
                    self.selected.push(element);
                }
                true
            }
            // Clicking an already-selected element keeps the group (for drag).
            Some(element) if self.contains(element) => false,
            Some(element) => {
                self.selected.clear();
                self.selected.push(element);
                true
            }
            None if additive => false,
            None => self.clear(),
        }
    }
}
