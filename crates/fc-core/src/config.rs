//! Edit permission model.
//!
//! A [`PermissionSet`] describes which canvas interactions are currently
//! allowed. Every field is addressable through [`ConfigField`] so that
//! patches, snapshots and change notifications can be expressed as plain
//! field → value maps ([`PartialConfig`]).
//!
//! Two fixed tables drive the merge algorithm:
//!
//! - [`PERSISTED_KEYS`]: the fields accepted from a caller patch and returned
//!   by `read()`. `nodeSelectedOutline` / `edgeSelectedOutline` are not part
//!   of it and can only be observed through the live permission set.
//! - [`SILENT_DEFAULTS`]: the values imposed when silent mode is entered.

use crate::error::PatchError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Consumer-defined extension values, passed through unvalidated.
pub type ExtraConf = Map<String, Value>;

// ─── Multi-select modifier ───────────────────────────────────────────────

/// Modifier key that turns a click into an additive (multi) selection.
///
/// `ctrl` is not accepted: on macOS ctrl+click opens the native context
/// menu, so the click never reaches the canvas as a selection gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiSelectKey {
    /// Not overridden; the editor falls back to `meta`.
    #[default]
    #[serde(rename = "")]
    Unset,
    Meta,
    Shift,
    Alt,
}

impl MultiSelectKey {
    /// Parse a modifier name as sent by the host (`""`, `meta`, `shift`, `alt`).
    pub fn parse(name: &str) -> Result<Self, PatchError> {
        match name.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Unset),
            "meta" | "cmd" => Ok(Self::Meta),
            "shift" => Ok(Self::Shift),
            "alt" | "option" => Ok(Self::Alt),
            _ => Err(PatchError::UnsupportedModifier(name.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Meta => "meta",
            Self::Shift => "shift",
            Self::Alt => "alt",
        }
    }

    /// The key actually used for multi-select (`Unset` resolves to `Meta`).
    pub fn effective(self) -> Self {
        match self {
            Self::Unset => Self::Meta,
            other => other,
        }
    }
}

// ─── Fields & values ─────────────────────────────────────────────────────

/// The shape of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Key,
    Extra,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "a boolean",
            Self::Key => "a modifier key name",
            Self::Extra => "an object",
        })
    }
}

/// Every field of [`PermissionSet`], in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigField {
    StopZoomGraph,
    StopScrollGraph,
    StopMoveGraph,
    AdjustEdge,
    AdjustEdgeMiddle,
    AdjustEdgeStartAndEnd,
    AdjustNodePosition,
    HideAnchors,
    HoverOutline,
    NodeSelectedOutline,
    EdgeSelectedOutline,
    NodeTextEdit,
    EdgeTextEdit,
    NodeTextDraggable,
    EdgeTextDraggable,
    MetaKeyMultipleSelected,
    MultipleSelectKey,
    ExtraConf,
}

impl ConfigField {
    pub const ALL: [ConfigField; 18] = [
        Self::StopZoomGraph,
        Self::StopScrollGraph,
        Self::StopMoveGraph,
        Self::AdjustEdge,
        Self::AdjustEdgeMiddle,
        Self::AdjustEdgeStartAndEnd,
        Self::AdjustNodePosition,
        Self::HideAnchors,
        Self::HoverOutline,
        Self::NodeSelectedOutline,
        Self::EdgeSelectedOutline,
        Self::NodeTextEdit,
        Self::EdgeTextEdit,
        Self::NodeTextDraggable,
        Self::EdgeTextDraggable,
        Self::MetaKeyMultipleSelected,
        Self::MultipleSelectKey,
        Self::ExtraConf,
    ];

    /// The camelCase key used on the host boundary.
    pub fn key(self) -> &'static str {
        match self {
            Self::StopZoomGraph => "stopZoomGraph",
            Self::StopScrollGraph => "stopScrollGraph",
            Self::StopMoveGraph => "stopMoveGraph",
            Self::AdjustEdge => "adjustEdge",
            Self::AdjustEdgeMiddle => "adjustEdgeMiddle",
            Self::AdjustEdgeStartAndEnd => "adjustEdgeStartAndEnd",
            Self::AdjustNodePosition => "adjustNodePosition",
            Self::HideAnchors => "hideAnchors",
            Self::HoverOutline => "hoverOutline",
            Self::NodeSelectedOutline => "nodeSelectedOutline",
            Self::EdgeSelectedOutline => "edgeSelectedOutline",
            Self::NodeTextEdit => "nodeTextEdit",
            Self::EdgeTextEdit => "edgeTextEdit",
            Self::NodeTextDraggable => "nodeTextDraggable",
            Self::EdgeTextDraggable => "edgeTextDraggable",
            Self::MetaKeyMultipleSelected => "metaKeyMultipleSelected",
            Self::MultipleSelectKey => "multipleSelectKey",
            Self::ExtraConf => "extraConf",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn kind(self) -> ValueKind {
        match self {
            Self::MultipleSelectKey => ValueKind::Key,
            Self::ExtraConf => ValueKind::Extra,
            _ => ValueKind::Bool,
        }
    }

    /// Whether the field is settable by patch and returned by `read()`.
    pub fn is_persisted(self) -> bool {
        PERSISTED_KEYS.contains(&self)
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Key(MultiSelectKey),
    Extra(ExtraConf),
}

impl ConfigValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Key(_) => ValueKind::Key,
            Self::Extra(_) => ValueKind::Extra,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Key(k) => Value::String(k.as_str().to_string()),
            Self::Extra(map) => Value::Object(map.clone()),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<MultiSelectKey> for ConfigValue {
    fn from(k: MultiSelectKey) -> Self {
        Self::Key(k)
    }
}

impl From<ExtraConf> for ConfigValue {
    fn from(map: ExtraConf) -> Self {
        Self::Extra(map)
    }
}

// ─── Fixed tables ────────────────────────────────────────────────────────

/// Fields accepted from a patch and returned by a read, in wire order.
pub const PERSISTED_KEYS: [ConfigField; 16] = [
    ConfigField::StopZoomGraph,
    ConfigField::StopScrollGraph,
    ConfigField::StopMoveGraph,
    ConfigField::AdjustEdge,
    ConfigField::AdjustEdgeMiddle,
    ConfigField::AdjustEdgeStartAndEnd,
    ConfigField::AdjustNodePosition,
    ConfigField::HideAnchors,
    ConfigField::HoverOutline,
    ConfigField::NodeTextEdit,
    ConfigField::EdgeTextEdit,
    ConfigField::NodeTextDraggable,
    ConfigField::EdgeTextDraggable,
    ConfigField::MetaKeyMultipleSelected,
    ConfigField::MultipleSelectKey,
    ConfigField::ExtraConf,
];

/// Values imposed on silent-mode entry. Viewing gestures (zoom, wheel
/// scroll, canvas pan) stay enabled; everything that edits is switched off.
pub const SILENT_DEFAULTS: [(ConfigField, bool); 12] = [
    (ConfigField::StopZoomGraph, false),
    (ConfigField::StopScrollGraph, false),
    (ConfigField::StopMoveGraph, false),
    (ConfigField::AdjustEdge, false),
    (ConfigField::AdjustEdgeStartAndEnd, false),
    (ConfigField::AdjustNodePosition, false),
    (ConfigField::HideAnchors, true),
    (ConfigField::NodeTextEdit, false),
    (ConfigField::EdgeTextEdit, false),
    (ConfigField::NodeTextDraggable, false),
    (ConfigField::EdgeTextDraggable, false),
    (ConfigField::MetaKeyMultipleSelected, false),
];

/// [`SILENT_DEFAULTS`] as a mergeable partial config.
pub fn silent_defaults() -> PartialConfig {
    SILENT_DEFAULTS
        .iter()
        .map(|&(field, value)| (field, ConfigValue::Bool(value)))
        .collect()
}

/// The field set captured into the snapshot on silent-mode entry.
pub fn silent_fields() -> impl Iterator<Item = ConfigField> {
    SILENT_DEFAULTS.iter().map(|&(field, _)| field)
}

// ─── PermissionSet ───────────────────────────────────────────────────────

/// What is currently allowed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionSet {
    // Canvas gestures
    pub stop_zoom_graph: bool,
    pub stop_scroll_graph: bool,
    pub stop_move_graph: bool,
    // Edge editing
    pub adjust_edge: bool,
    pub adjust_edge_middle: bool,
    pub adjust_edge_start_and_end: bool,
    pub adjust_node_position: bool,
    // Visual affordances
    pub hide_anchors: bool,
    pub hover_outline: bool,
    pub node_selected_outline: bool,
    pub edge_selected_outline: bool,
    // Text
    pub node_text_edit: bool,
    pub edge_text_edit: bool,
    pub node_text_draggable: bool,
    pub edge_text_draggable: bool,
    // Selection
    pub meta_key_multiple_selected: bool,
    pub multiple_select_key: MultiSelectKey,
    pub extra_conf: ExtraConf,
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self {
            stop_zoom_graph: false,
            stop_scroll_graph: false,
            stop_move_graph: false,
            adjust_edge: true,
            adjust_edge_middle: false,
            adjust_edge_start_and_end: false,
            adjust_node_position: true,
            hide_anchors: false,
            hover_outline: false,
            node_selected_outline: true,
            edge_selected_outline: true,
            node_text_edit: true,
            edge_text_edit: true,
            node_text_draggable: false,
            edge_text_draggable: false,
            meta_key_multiple_selected: false,
            multiple_select_key: MultiSelectKey::Unset,
            extra_conf: ExtraConf::new(),
        }
    }
}

impl PermissionSet {
    fn flag(&self, field: ConfigField) -> Option<bool> {
        let value = match field {
            ConfigField::StopZoomGraph => self.stop_zoom_graph,
            ConfigField::StopScrollGraph => self.stop_scroll_graph,
            ConfigField::StopMoveGraph => self.stop_move_graph,
            ConfigField::AdjustEdge => self.adjust_edge,
            ConfigField::AdjustEdgeMiddle => self.adjust_edge_middle,
            ConfigField::AdjustEdgeStartAndEnd => self.adjust_edge_start_and_end,
            ConfigField::AdjustNodePosition => self.adjust_node_position,
            ConfigField::HideAnchors => self.hide_anchors,
            ConfigField::HoverOutline => self.hover_outline,
            ConfigField::NodeSelectedOutline => self.node_selected_outline,
            ConfigField::EdgeSelectedOutline => self.edge_selected_outline,
            ConfigField::NodeTextEdit => self.node_text_edit,
            ConfigField::EdgeTextEdit => self.edge_text_edit,
            ConfigField::NodeTextDraggable => self.node_text_draggable,
            ConfigField::EdgeTextDraggable => self.edge_text_draggable,
            ConfigField::MetaKeyMultipleSelected => self.meta_key_multiple_selected,
            ConfigField::MultipleSelectKey | ConfigField::ExtraConf => return None,
        };
        Some(value)
    }

    fn flag_mut(&mut self, field: ConfigField) -> Option<&mut bool> {
        let slot = match field {
            ConfigField::StopZoomGraph => &mut self.stop_zoom_graph,
            ConfigField::StopScrollGraph => &mut self.stop_scroll_graph,
            ConfigField::StopMoveGraph => &mut self.stop_move_graph,
            ConfigField::AdjustEdge => &mut self.adjust_edge,
            ConfigField::AdjustEdgeMiddle => &mut self.adjust_edge_middle,
            ConfigField::AdjustEdgeStartAndEnd => &mut self.adjust_edge_start_and_end,
            ConfigField::AdjustNodePosition => &mut self.adjust_node_position,
            ConfigField::HideAnchors => &mut self.hide_anchors,
            ConfigField::HoverOutline => &mut self.hover_outline,
            ConfigField::NodeSelectedOutline => &mut self.node_selected_outline,
            ConfigField::EdgeSelectedOutline => &mut self.edge_selected_outline,
            ConfigField::NodeTextEdit => &mut self.node_text_edit,
            ConfigField::EdgeTextEdit => &mut self.edge_text_edit,
            ConfigField::NodeTextDraggable => &mut self.node_text_draggable,
            ConfigField::EdgeTextDraggable => &mut self.edge_text_draggable,
            ConfigField::MetaKeyMultipleSelected => &mut self.meta_key_multiple_selected,
            ConfigField::MultipleSelectKey | ConfigField::ExtraConf => return None,
        };
        Some(slot)
    }

    /// Read one field.
    pub fn get(&self, field: ConfigField) -> ConfigValue {
        match field {
            ConfigField::MultipleSelectKey => ConfigValue::Key(self.multiple_select_key),
            ConfigField::ExtraConf => ConfigValue::Extra(self.extra_conf.clone()),
            flag => ConfigValue::Bool(self.flag(flag).unwrap_or_default()),
        }
    }

    /// Overwrite one field. Returns whether the stored value changed.
    pub fn set(&mut self, field: ConfigField, value: ConfigValue) -> Result<bool, PatchError> {
        match (field, value) {
            (ConfigField::MultipleSelectKey, ConfigValue::Key(key)) => {
                let changed = self.multiple_select_key != key;
                self.multiple_select_key = key;
                Ok(changed)
            }
            (ConfigField::ExtraConf, ConfigValue::Extra(map)) => {
                let changed = self.extra_conf != map;
                self.extra_conf = map;
                Ok(changed)
            }
            (field, ConfigValue::Bool(b)) => match self.flag_mut(field) {
                Some(slot) => {
                    let changed = *slot != b;
                    *slot = b;
                    Ok(changed)
                }
                None => Err(PatchError::ValueKindMismatch {
                    field: field.key(),
                    found: ValueKind::Bool,
                }),
            },
            (field, value) => Err(PatchError::ValueKindMismatch {
                field: field.key(),
                found: value.kind(),
            }),
        }
    }

    /// Capture the given fields as a partial config.
    pub fn capture(&self, fields: impl IntoIterator<Item = ConfigField>) -> PartialConfig {
        fields.into_iter().map(|f| (f, self.get(f))).collect()
    }
}

// ─── PartialConfig ───────────────────────────────────────────────────────

/// A field → value map used for patches, merge accumulators and snapshots.
///
/// Merging is last-writer-wins per field; iteration follows
/// [`ConfigField`] declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialConfig {
    values: BTreeMap<ConfigField, ConfigValue>,
}

impl PartialConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, rejecting one whose kind does not fit the field.
    pub fn insert(&mut self, field: ConfigField, value: ConfigValue) -> Result<(), PatchError> {
        if field.kind() != value.kind() {
            return Err(PatchError::ValueKindMismatch {
                field: field.key(),
                found: value.kind(),
            });
        }
        self.values.insert(field, value);
        Ok(())
    }

    pub fn get(&self, field: ConfigField) -> Option<&ConfigValue> {
        self.values.get(&field)
    }

    pub fn get_bool(&self, field: ConfigField) -> Option<bool> {
        self.get(field).and_then(ConfigValue::as_bool)
    }

    pub fn contains(&self, field: ConfigField) -> bool {
        self.values.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = ConfigField> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConfigField, &ConfigValue)> {
        self.values.iter().map(|(f, v)| (*f, v))
    }

    /// Assign every entry of `other` over `self`.
    pub fn merge(&mut self, other: &PartialConfig) {
        for (field, value) in other.iter() {
            self.values.insert(field, value.clone());
        }
    }

    /// Keep only the entries whose field is in `fields`.
    pub fn restrict(&self, fields: &[ConfigField]) -> PartialConfig {
        self.values
            .iter()
            .filter(|(f, _)| fields.contains(f))
            .map(|(f, v)| (*f, v.clone()))
            .collect()
    }

    /// Apply every entry onto `target`. Fields absent here are left untouched.
    pub fn apply_to(&self, target: &mut PermissionSet) {
        for (field, value) in self.iter() {
            if let Err(e) = target.set(field, value.clone()) {
                log::warn!("skipping {field}: {e}");
            }
        }
    }

    /// JSON object keyed by the camelCase field names.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(f, v)| (f.key().to_string(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

/// Collecting assumes each value already matches its field's kind
/// (mismatches are dropped).
impl FromIterator<(ConfigField, ConfigValue)> for PartialConfig {
    fn from_iter<I: IntoIterator<Item = (ConfigField, ConfigValue)>>(iter: I) -> Self {
        let mut out = PartialConfig::new();
        for (field, value) in iter {
            if let Err(e) = out.insert(field, value) {
                log::warn!("dropping {field}: {e}");
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_field_key_roundtrips() {
        for field in ConfigField::ALL {
            assert_eq!(ConfigField::from_key(field.key()), Some(field));
        }
        assert_eq!(ConfigField::from_key("bogus"), None);
    }

    #[test]
    fn selected_outlines_are_not_persisted() {
        assert!(!ConfigField::NodeSelectedOutline.is_persisted());
        assert!(!ConfigField::EdgeSelectedOutline.is_persisted());
        assert_eq!(
            ConfigField::ALL.iter().filter(|f| f.is_persisted()).count(),
            PERSISTED_KEYS.len()
        );
    }

    #[test]
    fn ctrl_is_rejected_as_multi_select_key() {
        assert_eq!(
            MultiSelectKey::parse("ctrl"),
            Err(PatchError::UnsupportedModifier("ctrl".into()))
        );
        assert_eq!(MultiSelectKey::parse("Shift"), Ok(MultiSelectKey::Shift));
        assert_eq!(MultiSelectKey::parse(""), Ok(MultiSelectKey::Unset));
        assert_eq!(MultiSelectKey::Unset.effective(), MultiSelectKey::Meta);
    }

    #[test]
    fn set_reports_change_and_rejects_wrong_kind() {
        let mut perms = PermissionSet::default();
        assert_eq!(perms.set(ConfigField::AdjustEdge, true.into()), Ok(false));
        assert_eq!(perms.set(ConfigField::AdjustEdge, false.into()), Ok(true));
        assert!(!perms.adjust_edge);
        assert!(
            perms
                .set(ConfigField::MultipleSelectKey, true.into())
                .is_err()
        );
        assert!(
            perms
                .set(ConfigField::HideAnchors, MultiSelectKey::Alt.into())
                .is_err()
        );
    }

    #[test]
    fn partial_insert_checks_kind() {
        let mut partial = PartialConfig::new();
        assert!(partial.insert(ConfigField::ExtraConf, true.into()).is_err());
        assert!(partial.is_empty());
        partial
            .insert(ConfigField::ExtraConf, ExtraConf::new().into())
            .unwrap();
        assert_eq!(partial.len(), 1);
    }

    #[test]
    fn merge_is_last_writer_wins() {
        let mut base: PartialConfig = [(ConfigField::AdjustEdge, ConfigValue::Bool(false))]
            .into_iter()
            .collect();
        let over: PartialConfig = [
            (ConfigField::AdjustEdge, ConfigValue::Bool(true)),
            (ConfigField::HideAnchors, ConfigValue::Bool(true)),
        ]
        .into_iter()
        .collect();
        base.merge(&over);
        assert_eq!(base.get_bool(ConfigField::AdjustEdge), Some(true));
        assert_eq!(base.get_bool(ConfigField::HideAnchors), Some(true));
    }

    #[test]
    fn permission_set_serializes_camel_case() {
        let json = serde_json::to_value(PermissionSet::default()).unwrap();
        assert_eq!(json["adjustNodePosition"], Value::Bool(true));
        assert_eq!(json["multipleSelectKey"], Value::String(String::new()));
        let back: PermissionSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, PermissionSet::default());
    }
}
