//! Partial-merge with precedence.
//!
//! [`merge_config`] turns the current permissions, the silent-mode snapshot
//! and a caller patch into the next permission set. It has no side effects:
//! the store decides when to commit the result and notify subscribers.
//!
//! Precedence, lowest to highest:
//!
//! 1. snapshot restore (`isSilentMode: false`)
//! 2. silent defaults (`isSilentMode: true`)
//! 3. `textEdit: false` → node and edge text edit off
//! 4. explicit persisted fields from the patch

use crate::config::{
    ConfigField, ConfigValue, PERSISTED_KEYS, PartialConfig, PermissionSet, silent_defaults,
    silent_fields,
};
use crate::error::PatchError;

/// A caller-supplied configuration change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    /// Per-field overrides. Only persisted fields survive the merge.
    pub fields: PartialConfig,
    /// `Some(true)` enters silent mode, `Some(false)` leaves it.
    pub is_silent_mode: Option<bool>,
    /// `Some(false)` disables both node and edge text editing.
    pub text_edit: Option<bool>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn silent(mut self, on: bool) -> Self {
        self.is_silent_mode = Some(on);
        self
    }

    pub fn text_edit(mut self, on: bool) -> Self {
        self.text_edit = Some(on);
        self
    }

    /// Set one field, rejecting a value of the wrong kind.
    pub fn try_set(
        mut self,
        field: ConfigField,
        value: impl Into<ConfigValue>,
    ) -> Result<Self, PatchError> {
        self.fields.insert(field, value.into())?;
        Ok(self)
    }

    /// Set a boolean field. Non-boolean fields are left out with a warning.
    pub fn flag(mut self, field: ConfigField, on: bool) -> Self {
        if let Err(e) = self.fields.insert(field, ConfigValue::Bool(on)) {
            log::warn!("ignoring patch field: {e}");
        }
        self
    }
}

/// What the merge decided about the silent-mode snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotUpdate {
    Keep,
    Replace(PartialConfig),
}

/// Result of [`merge_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// The permission set after the patch.
    pub next: PermissionSet,
    /// Every field written by the merge, with its final value.
    pub applied: PartialConfig,
    pub snapshot: SnapshotUpdate,
}

/// Build the merge accumulator for `patch`. Later steps override earlier ones.
pub fn accumulate(
    current: &PermissionSet,
    snapshot: Option<&PartialConfig>,
    patch: &ConfigPatch,
) -> (PartialConfig, SnapshotUpdate) {
    let mut acc = PartialConfig::new();
    let mut snapshot_update = SnapshotUpdate::Keep;

    match patch.is_silent_mode {
        Some(false) => {
            if let Some(saved) = snapshot {
                acc.merge(saved);
            }
        }
        Some(true) => {
            snapshot_update = SnapshotUpdate::Replace(current.capture(silent_fields()));
            acc.merge(&silent_defaults());
        }
        None => {}
    }

    if patch.text_edit == Some(false) {
        acc.merge(
            &[
                (ConfigField::NodeTextEdit, ConfigValue::Bool(false)),
                (ConfigField::EdgeTextEdit, ConfigValue::Bool(false)),
            ]
            .into_iter()
            .collect(),
        );
    }

    acc.merge(&patch.fields.restrict(&PERSISTED_KEYS));
    (acc, snapshot_update)
}

/// Compute the next permission set without touching `current`.
pub fn merge_config(
    current: &PermissionSet,
    snapshot: Option<&PartialConfig>,
    patch: &ConfigPatch,
) -> MergeOutcome {
    let (applied, snapshot) = accumulate(current, snapshot, patch);
    let mut next = current.clone();
    applied.apply_to(&mut next);
    MergeOutcome {
        next,
        applied,
        snapshot,
    }
}
