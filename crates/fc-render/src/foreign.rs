//! Foreign-content nodes.
//!
//! The surface's declarative render pass does not keep non-native children
//! across diff cycles, so content is re-asserted on every mount and update
//! instead of being assumed to persist. Re-population clears the mount first,
//! which makes it idempotent.
//!
//! Node attributes use the canvas's center-anchored convention: `(x, y)` is
//! the center of the node, so the mount rectangle's top-left corner is
//! `(x - width / 2, y - height / 2)`.

use fc_core::NodeId;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Graph-space attributes of a node, as supplied by the graph model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Arbitrary payload handed to the content source.
    #[serde(default)]
    pub data: Value,
}

impl NodeAttributes {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            data: Value::Null,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Mount rectangle in graph space, centered on `(x, y)`.
    pub fn mount_rect(&self) -> Rect {
        Rect::from_center_size(self.center(), self.size())
    }

    /// Whether both describe the same rectangle; `data` is ignored.
    fn same_layout(&self, other: &NodeAttributes) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
    }
}

/// The surface element a foreign-content node renders into.
///
/// Implemented by the host (a DOM `foreignObject`, a native overlay, a test
/// double). The node only positions it and asks for its content to be
/// replaced; it never inspects what the content is.
pub trait MountTarget {
    /// `false` until the surface has attached the element.
    fn is_attached(&self) -> bool;

    /// Position the element at `rect`, in graph-space coordinates.
    fn set_region(&mut self, rect: Rect);

    /// Drop whatever content the element currently holds.
    fn clear(&mut self);
}

/// Fills a mount with foreign content.
pub trait ContentSource<M: ?Sized> {
    fn populate(&mut self, mount: &mut M, attrs: &NodeAttributes);
}

impl<M: ?Sized, F> ContentSource<M> for F
where
    F: FnMut(&mut M, &NodeAttributes),
{
    fn populate(&mut self, mount: &mut M, attrs: &NodeAttributes) {
        self(mount, attrs)
    }
}

/// Outcome of a lifecycle hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountStatus {
    /// Content was written into the mount.
    Populated,
    /// The mount is not attached yet; retried on the next update.
    Deferred,
}

/// Declarative description of the node's shape for the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignShape {
    pub id: NodeId,
    pub rect: Rect,
}

/// A node whose body is foreign content mounted in a rectangular region.
pub struct ForeignContentNode<M, C> {
    id: NodeId,
    attrs: NodeAttributes,
    mount: Option<M>,
    source: C,
    /// The last repopulate was skipped because the mount was unavailable.
    /// Reported only; the next `did_update` repopulates either way.
    pending: bool,
}

impl<M, C> ForeignContentNode<M, C>
where
    M: MountTarget,
    C: ContentSource<M>,
{
    pub fn new(id: NodeId, attrs: NodeAttributes, source: C) -> Self {
        Self {
            id,
            attrs,
            mount: None,
            source,
            pending: false,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn attributes(&self) -> &NodeAttributes {
        &self.attrs
    }

    /// The shape the surface should render for this node.
    pub fn shape(&self) -> ForeignShape {
        ForeignShape {
            id: self.id,
            rect: self.attrs.mount_rect(),
        }
    }

    /// Hand over the mounting element once the surface has created it.
    ///
    /// The handle is kept across updates. Setting a new one means the
    /// surface tore the node down and rebuilt it.
    pub fn set_mount(&mut self, mount: M) {
        if self.mount.is_some() {
            log::debug!("foreign node {} remounted", self.id);
        }
        self.mount = Some(mount);
    }

    /// Release the mount on teardown.
    pub fn take_mount(&mut self) -> Option<M> {
        self.mount.take()
    }

    pub fn mount(&self) -> Option<&M> {
        self.mount.as_ref()
    }

    pub fn mount_mut(&mut self) -> Option<&mut M> {
        self.mount.as_mut()
    }

    /// Whether the last repopulate was deferred. Diagnostic only: it does
    /// not change what the next lifecycle callback does.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Replace the node's attributes. Returns `true` if the mount rectangle moved.
    pub fn set_attributes(&mut self, attrs: NodeAttributes) -> bool {
        let moved = !self.attrs.same_layout(&attrs);
        self.attrs = attrs;
        moved
    }

    /// Surface callback after the node's first render.
    pub fn did_mount(&mut self) -> MountStatus {
        self.repopulate()
    }

    /// Surface callback after every re-render.
    pub fn did_update(&mut self) -> MountStatus {
        self.repopulate()
    }

    fn repopulate(&mut self) -> MountStatus {
        let Some(mount) = self.mount.as_mut().filter(|m| m.is_attached()) else {
            log::trace!("foreign node {}: mount unavailable, deferring", self.id);
            self.pending = true;
            return MountStatus::Deferred;
        };

        mount.set_region(self.attrs.mount_rect());
        mount.clear();
        self.source.populate(mount, &self.attrs);
        self.pending = false;
        log::trace!("foreign node {}: content populated", self.id);
        MountStatus::Populated
    }
}
