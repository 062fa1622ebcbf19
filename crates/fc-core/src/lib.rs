//! Edit-configuration core for the flowcanvas diagram editor.
//!
//! Owns the permission set that decides which canvas interactions are
//! allowed, the silent-mode snapshot/restore cycle, and change notification
//! to interaction handlers and renderers.

pub mod config;
pub mod error;
pub mod id;
pub mod merge;
pub mod patch;
pub mod store;

pub use config::{
    ConfigField, ConfigValue, ExtraConf, MultiSelectKey, PERSISTED_KEYS, PartialConfig,
    PermissionSet, SILENT_DEFAULTS, ValueKind,
};
pub use error::{PatchError, RejectedField};
pub use id::NodeId;
pub use merge::{ConfigPatch, MergeOutcome, SnapshotUpdate, merge_config};
pub use store::{ChangedFields, ConfigChange, EditConfigStore, SubscriptionId};
