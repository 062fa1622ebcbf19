//! WASM bridge for flowcanvas: exposes the edit-config store and the
//! foreign-content node to the browser editor.
//!
//! Compiled via `wasm-pack build --target web`. Configuration crosses the
//! boundary as JSON strings; rejected patch fields come back the same way.

mod dom;
mod logger;

use dom::{DomMount, JsContent};
use fc_core::{ConfigField, ConfigPatch, EditConfigStore, NodeId, RejectedField, SubscriptionId};
use fc_render::svg::render_svg;
use fc_render::{ForeignContentNode, MountStatus, NodeAttributes};
use js_sys::Function;
use serde_json::{Value, json};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

fn rejections_to_json(rejected: &[RejectedField]) -> String {
    let list: Vec<Value> = rejected
        .iter()
        .map(|r| json!({ "field": r.field, "reason": r.error.to_string() }))
        .collect();
    json!({ "rejected": list }).to_string()
}

fn parse_data(data_json: &str) -> Value {
    if data_json.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(data_json).unwrap_or_else(|e| {
        log::warn!("node data is not valid JSON: {e}");
        Value::Null
    })
}

// ─── Edit config ─────────────────────────────────────────────────────────

/// The editor's edit configuration.
///
/// All permission changes from JS go through `update`; interaction code
/// reads `get_config` / `permissions` or subscribes to individual fields.
#[wasm_bindgen]
pub struct EditConfig {
    store: EditConfigStore,
    handles: HashMap<u32, SubscriptionId>,
    next_handle: u32,
}

#[wasm_bindgen]
impl EditConfig {
    /// Create a store from an initial JSON patch (`""` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(initial_json: &str) -> Self {
        logger::init();
        let (patch, rejected) = if initial_json.is_empty() {
            (ConfigPatch::new(), Vec::new())
        } else {
            ConfigPatch::from_json_str(initial_json)
        };
        if !rejected.is_empty() {
            log::warn!("initial edit config: {}", rejections_to_json(&rejected));
        }
        Self {
            store: EditConfigStore::new(&patch),
            handles: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Apply a JSON patch. Returns `{"rejected":[{"field":..,"reason":..}]}`.
    pub fn update(&mut self, patch_json: &str) -> String {
        let (patch, rejected) = ConfigPatch::from_json_str(patch_json);
        self.store.update(&patch);
        rejections_to_json(&rejected)
    }

    /// Persisted fields as a JSON object.
    pub fn get_config(&self) -> String {
        self.store.read().to_json().to_string()
    }

    /// The full permission set (including selection outlines) as JSON.
    pub fn permissions(&self) -> String {
        serde_json::to_string(self.store.permissions()).unwrap_or_else(|e| {
            log::error!("permission set failed to serialize: {e}");
            "{}".to_string()
        })
    }

    pub fn is_silent_mode(&self) -> bool {
        self.store.is_silent_mode()
    }

    /// Call `callback(field, valueJson)` when `field` changes (`"*"` for any).
    /// Returns a handle for `unsubscribe`, or `undefined` for an unknown field.
    pub fn subscribe(&mut self, field: &str, callback: Function) -> Option<u32> {
        let notify = move |change: &fc_core::ConfigChange, _: &fc_core::PermissionSet| {
            let key = JsValue::from_str(change.field.key());
            let value = JsValue::from_str(&change.new.to_json().to_string());
            if let Err(e) = callback.call2(&JsValue::NULL, &key, &value) {
                log::warn!("config subscriber for {} threw: {e:?}", change.field);
            }
        };
        let id = if field == "*" {
            self.store.subscribe_all(notify)
        } else {
            let Some(field) = ConfigField::from_key(field) else {
                log::warn!("cannot subscribe to unknown config field `{field}`");
                return None;
            };
            self.store.subscribe(field, notify)
        };
        let handle = self.next_handle;
        self.next_handle += 1;
        self.handles.insert(handle, id);
        Some(handle)
    }

    pub fn unsubscribe(&mut self, handle: u32) -> bool {
        match self.handles.remove(&handle) {
            Some(id) => self.store.unsubscribe(id),
            None => false,
        }
    }
}

// ─── Foreign-content node ────────────────────────────────────────────────

/// A node whose body is host-rendered HTML inside a `<foreignObject>`.
///
/// The JS component forwards its lifecycle: `set_ref` when the element
/// exists, `did_mount` / `did_update` after each render.
#[wasm_bindgen]
pub struct HtmlNode {
    inner: ForeignContentNode<DomMount, JsContent>,
}

#[wasm_bindgen]
impl HtmlNode {
    /// `set_html(rootEl, data)` fills the mount on every render.
    #[wasm_bindgen(constructor)]
    pub fn new(
        id: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        data_json: &str,
        set_html: Function,
    ) -> Self {
        logger::init();
        let attrs = NodeAttributes::new(x, y, width, height).with_data(parse_data(data_json));
        Self {
            inner: ForeignContentNode::new(NodeId::intern(id), attrs, JsContent::new(set_html)),
        }
    }

    pub fn set_ref(&mut self, element: web_sys::Element) {
        self.inner.set_mount(DomMount::new(element));
    }

    pub fn release_ref(&mut self) {
        self.inner.take_mount();
    }

    /// Returns `true` if the mount rectangle moved.
    pub fn set_attributes(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        data_json: &str,
    ) -> bool {
        let attrs = NodeAttributes::new(x, y, width, height).with_data(parse_data(data_json));
        self.inner.set_attributes(attrs)
    }

    /// Returns `false` if the mount was not attached yet (retried on update).
    pub fn did_mount(&mut self) -> bool {
        self.inner.did_mount() == MountStatus::Populated
    }

    pub fn did_update(&mut self) -> bool {
        self.inner.did_update() == MountStatus::Populated
    }

    /// `{"x":..,"y":..,"width":..,"height":..}` for the `<foreignObject>`.
    pub fn shape(&self) -> String {
        let r = self.inner.shape().rect;
        json!({ "x": r.x0, "y": r.y0, "width": r.width(), "height": r.height() }).to_string()
    }

    /// Standalone SVG containing this node with `inner` as its markup.
    pub fn to_svg(&self, inner: &str) -> String {
        let shape = self.inner.shape();
        let bounds = shape.rect;
        render_svg(&[(shape, inner.to_string())], bounds)
    }
}

// ─── Standalone functions ────────────────────────────────────────────────

/// Validate a config patch without applying it. Returns the same
/// `{"rejected":[...]}` shape as `EditConfig.update`.
#[wasm_bindgen]
pub fn validate_config(patch_json: &str) -> String {
    let (_, rejected) = ConfigPatch::from_json_str(patch_json);
    rejections_to_json(&rejected)
}

/// Set the console log level: `"off"`, `"error"`, `"warn"`, `"info"`,
/// `"debug"` or `"trace"`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    logger::set_level(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn update_reports_rejections_and_applies_rest() {
        let mut config = EditConfig::new(r#"{"hoverOutline":true}"#);
        let out = config.update(r#"{"isSilentMode":true,"multipleSelectKey":"ctrl"}"#);
        let out: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(out["rejected"][0]["field"], "multipleSelectKey");
        assert!(config.is_silent_mode());

        let read: Value = serde_json::from_str(&config.get_config()).unwrap();
        assert_eq!(read["adjustEdge"], false);
        assert_eq!(read["hoverOutline"], true);
        assert!(read.get("nodeSelectedOutline").is_none());

        let full: Value = serde_json::from_str(&config.permissions()).unwrap();
        assert_eq!(full["nodeSelectedOutline"], true);
    }

    #[test]
    fn validate_flags_bad_types() {
        let out: Value = serde_json::from_str(&validate_config(r#"{"adjustEdge":1}"#)).unwrap();
        assert_eq!(out["rejected"].as_array().map(Vec::len), Some(1));
        assert_eq!(validate_config("{}"), r#"{"rejected":[]}"#);
    }

    #[test]
    fn empty_data_is_null() {
        assert_eq!(parse_data(""), Value::Null);
        assert_eq!(parse_data(r#"{"a":1}"#), json!({ "a": 1 }));
    }
}
