//! The edit-config store: single owner of the live [`PermissionSet`].
//!
//! Updates run the pure merge from [`crate::merge`], commit the result in one
//! step, and only then notify subscribers. A subscriber therefore never sees
//! a half-applied patch: by the time any callback runs, every field touched
//! by the update already holds its final value.

use crate::config::{ConfigField, ConfigValue, PERSISTED_KEYS, PartialConfig, PermissionSet};
use crate::error::RejectedField;
use crate::merge::{ConfigPatch, SnapshotUpdate, merge_config};
use smallvec::SmallVec;

/// Handle returned by `subscribe*`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// One field that changed during an update.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigChange {
    pub field: ConfigField,
    pub old: ConfigValue,
    pub new: ConfigValue,
}

/// Fields changed by a single update, in declaration order.
pub type ChangedFields = SmallVec<[ConfigField; 8]>;

type Callback = Box<dyn FnMut(&ConfigChange, &PermissionSet)>;

struct Subscriber {
    id: SubscriptionId,
    /// `None` listens to every field.
    field: Option<ConfigField>,
    callback: Callback,
}

pub struct EditConfigStore {
    permissions: PermissionSet,
    /// Configuration captured on the last silent-mode entry.
    snapshot: Option<PartialConfig>,
    silent: bool,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

impl Default for EditConfigStore {
    fn default() -> Self {
        Self::new(&ConfigPatch::default())
    }
}

impl std::fmt::Debug for EditConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditConfigStore")
            .field("permissions", &self.permissions)
            .field("snapshot", &self.snapshot)
            .field("silent", &self.silent)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EditConfigStore {
    /// Build a store by merging `initial` over the default permissions.
    pub fn new(initial: &ConfigPatch) -> Self {
        let mut store = Self {
            permissions: PermissionSet::default(),
            snapshot: None,
            silent: false,
            subscribers: Vec::new(),
            next_subscription: 0,
        };
        store.update(initial);
        store
    }

    /// Build a store from a JSON patch, returning rejected fields.
    pub fn from_json(initial: &serde_json::Value) -> (Self, Vec<RejectedField>) {
        let (patch, rejected) = ConfigPatch::from_json(initial);
        (Self::new(&patch), rejected)
    }

    /// Apply a patch and notify subscribers of every changed field.
    pub fn update(&mut self, patch: &ConfigPatch) -> ChangedFields {
        if patch.is_silent_mode == Some(true) && self.silent {
            log::warn!("silent mode entered twice; snapshot replaced by the silenced config");
        }

        let outcome = merge_config(&self.permissions, self.snapshot.as_ref(), patch);

        let changes: SmallVec<[ConfigChange; 8]> = outcome
            .applied
            .iter()
            .filter_map(|(field, new)| {
                let old = self.permissions.get(field);
                (old != *new).then(|| ConfigChange {
                    field,
                    old,
                    new: new.clone(),
                })
            })
            .collect();

        // Commit everything before anyone is told.
        self.permissions = outcome.next;
        if let SnapshotUpdate::Replace(saved) = outcome.snapshot {
            self.snapshot = Some(saved);
        }
        match patch.is_silent_mode {
            Some(true) => self.silent = true,
            Some(false) => self.silent = false,
            None => {}
        }

        log::debug!(
            "edit config updated: {} field(s) changed, silent={}",
            changes.len(),
            self.silent
        );
        self.notify(&changes);
        changes.iter().map(|c| c.field).collect()
    }

    /// Parse and apply a JSON patch. Returns the fields that were rejected.
    pub fn update_json(&mut self, patch: &serde_json::Value) -> Vec<RejectedField> {
        let (patch, rejected) = ConfigPatch::from_json(patch);
        self.update(&patch);
        rejected
    }

    /// The persisted fields with their current values. Detached from the store.
    pub fn read(&self) -> PartialConfig {
        self.permissions.capture(PERSISTED_KEYS)
    }

    /// The full live permission set, including non-persisted fields.
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// The configuration captured on the last silent-mode entry, if any.
    pub fn snapshot(&self) -> Option<&PartialConfig> {
        self.snapshot.as_ref()
    }

    pub fn is_silent_mode(&self) -> bool {
        self.silent
    }

    // ─── Subscriptions ───────────────────────────────────────────────────

    /// Call `callback` whenever `field` changes.
    pub fn subscribe(
        &mut self,
        field: ConfigField,
        callback: impl FnMut(&ConfigChange, &PermissionSet) + 'static,
    ) -> SubscriptionId {
        self.add_subscriber(Some(field), Box::new(callback))
    }

    /// Call `callback` for every changed field.
    pub fn subscribe_all(
        &mut self,
        callback: impl FnMut(&ConfigChange, &PermissionSet) + 'static,
    ) -> SubscriptionId {
        self.add_subscriber(None, Box::new(callback))
    }

    /// Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    fn add_subscriber(&mut self, field: Option<ConfigField>, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            field,
            callback,
        });
        id
    }

    fn notify(&mut self, changes: &[ConfigChange]) {
        for change in changes {
            for sub in &mut self.subscribers {
                if sub.field.is_none_or(|f| f == change.field) {
                    (sub.callback)(change, &self.permissions);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MultiSelectKey;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn construction_merges_initial_patch() {
        let store = EditConfigStore::new(
            &ConfigPatch::new()
                .flag(ConfigField::HoverOutline, true)
                .text_edit(false),
        );
        assert!(store.permissions().hover_outline);
        assert!(!store.permissions().node_text_edit);
        assert!(!store.permissions().edge_text_edit);
        assert!(!store.is_silent_mode());
    }

    #[test]
    fn read_returns_exactly_persisted_keys() {
        let store = EditConfigStore::default();
        let read = store.read();
        let fields: Vec<ConfigField> = read.fields().collect();
        assert_eq!(fields, PERSISTED_KEYS.to_vec());
    }

    #[test]
    fn read_is_detached_from_store() {
        let store = EditConfigStore::default();
        let mut read = store.read();
        read.insert(ConfigField::AdjustEdge, false.into()).unwrap();
        assert!(store.permissions().adjust_edge);
    }

    #[test]
    fn subscribers_see_fully_applied_state() {
        let mut store = EditConfigStore::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(ConfigField::AdjustEdge, move |change, perms| {
            // hideAnchors is written by the same update and must already be set
            sink.borrow_mut()
                .push((change.new.clone(), perms.hide_anchors));
        });

        store.update(&ConfigPatch::new().silent(true));
        assert_eq!(
            *seen.borrow(),
            vec![(ConfigValue::Bool(false), true)]
        );
    }

    #[test]
    fn unchanged_fields_do_not_notify() {
        let mut store = EditConfigStore::default();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        store.subscribe_all(move |_, _| *sink.borrow_mut() += 1);

        let changed = store.update(&ConfigPatch::new().flag(ConfigField::AdjustEdge, true));
        assert!(changed.is_empty());
        assert_eq!(*count.borrow(), 0);

        let changed = store.update(
            &ConfigPatch::new()
                .try_set(ConfigField::MultipleSelectKey, MultiSelectKey::Alt)
                .unwrap(),
        );
        assert_eq!(changed.as_slice(), &[ConfigField::MultipleSelectKey]);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = EditConfigStore::default();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = store.subscribe_all(move |_, _| *sink.borrow_mut() += 1);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.update(&ConfigPatch::new().silent(true));
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn exit_keeps_snapshot() {
        let mut store = EditConfigStore::default();
        store.update(&ConfigPatch::new().silent(true));
        store.update(&ConfigPatch::new().silent(false));
        assert!(!store.is_silent_mode());
        assert!(store.snapshot().is_some());
    }
}
