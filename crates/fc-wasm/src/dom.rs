//! DOM-backed foreign-content mount.
//!
//! The mount is the `<foreignObject>` element the surface rendered for the
//! node. Content comes from a JS `setHtml(rootEl, data)` callback.

use fc_render::{ContentSource, MountTarget, NodeAttributes};
use js_sys::Function;
use kurbo::Rect;
use wasm_bindgen::JsValue;
use web_sys::Element;

pub struct DomMount {
    element: Element,
}

impl DomMount {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    fn set_attr(&self, name: &str, value: f64) {
        if let Err(e) = self.element.set_attribute(name, &value.to_string()) {
            log::warn!("foreignObject: failed to set {name}: {e:?}");
        }
    }
}

impl MountTarget for DomMount {
    fn is_attached(&self) -> bool {
        self.element.is_connected()
    }

    fn set_region(&mut self, rect: Rect) {
        self.set_attr("x", rect.x0);
        self.set_attr("y", rect.y0);
        self.set_attr("width", rect.width());
        self.set_attr("height", rect.height());
    }

    fn clear(&mut self) {
        self.element.set_inner_html("");
    }
}

/// Calls the host's `setHtml(rootEl, data)` to fill the mount.
pub struct JsContent {
    set_html: Function,
}

impl JsContent {
    pub fn new(set_html: Function) -> Self {
        Self { set_html }
    }
}

impl ContentSource<DomMount> for JsContent {
    fn populate(&mut self, mount: &mut DomMount, attrs: &NodeAttributes) {
        let data = serde_json::to_string(&attrs.data)
            .ok()
            .and_then(|s| js_sys::JSON::parse(&s).ok())
            .unwrap_or(JsValue::NULL);
        if let Err(e) = self
            .set_html
            .call2(&JsValue::NULL, mount.element.as_ref(), &data)
        {
            log::warn!("setHtml threw: {e:?}");
        }
    }
}
