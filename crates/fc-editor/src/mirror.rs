//! A subscriber-side copy of the permission set.
//!
//! Handlers that live outside the store's borrow (tool objects, render
//! passes) keep a [`PermissionMirror`]. The store refreshes it after each
//! committed update, so the mirror never holds a partially merged state.

use fc_core::{EditConfigStore, PermissionSet, SubscriptionId};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct PermissionMirror {
    current: Rc<RefCell<PermissionSet>>,
    revision: Rc<RefCell<u64>>,
}

impl PermissionMirror {
    /// Seed from the store's current permissions and subscribe to changes.
    pub fn attach(store: &mut EditConfigStore) -> (Self, SubscriptionId) {
        let mirror = Self {
            current: Rc::new(RefCell::new(store.permissions().clone())),
            revision: Rc::new(RefCell::new(0)),
        };
        let current = Rc::clone(&mirror.current);
        let revision = Rc::clone(&mirror.revision);
        let id = store.subscribe_all(move |change, perms| {
            let mut local = current.borrow_mut();
            if let Err(e) = local.set(change.field, change.new.clone()) {
                log::warn!("mirror out of sync on {}: {e}", change.field);
                *local = perms.clone();
            }
            *revision.borrow_mut() += 1;
        });
        (mirror, id)
    }

    pub fn get(&self) -> Ref<'_, PermissionSet> {
        self.current.borrow()
    }

    /// Number of field changes received so far.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }
}
