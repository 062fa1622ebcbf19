//! Integration tests: foreign-content lifecycle (fc-render).
//!
//! Drives a foreign-content node through the surface's mount → update
//! cycle the way a host canvas does, including detached mounts and
//! pan/zoom of the surrounding view.

use fc_core::NodeId;
use fc_render::{
    CoordinateMapper, ForeignContentNode, MountStatus, MountTarget, NodeAttributes, ViewTransform,
};
use kurbo::{Point, Rect, Vec2};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Records what the node did to its mount.
#[derive(Default)]
struct RecordingMount {
    attached: bool,
    region: Option<Rect>,
    html: String,
    writes: usize,
}

impl MountTarget for RecordingMount {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn set_region(&mut self, rect: Rect) {
        self.region = Some(rect);
    }

    fn clear(&mut self) {
        self.html.clear();
    }
}

fn card(mount: &mut RecordingMount, attrs: &NodeAttributes) {
    let title = attrs.data["title"].as_str().unwrap_or("untitled");
    mount.html.push_str(&format!("<div class=\"card\">{title}</div>"));
    mount.writes += 1;
}

type CardFn = fn(&mut RecordingMount, &NodeAttributes);

fn attached_node(attrs: NodeAttributes) -> ForeignContentNode<RecordingMount, CardFn> {
    let mut node = ForeignContentNode::new(NodeId::intern("card_1"), attrs, card as CardFn);
    node.set_mount(RecordingMount {
        attached: true,
        ..RecordingMount::default()
    });
    node
}

#[test]
fn mount_then_updates_keep_content_current() {
    let mut node = attached_node(
        NodeAttributes::new(100.0, 50.0, 40.0, 20.0).with_data(json!({ "title": "Start" })),
    );
    assert_eq!(node.did_mount(), MountStatus::Populated);
    assert_eq!(node.mount().unwrap().html, "<div class=\"card\">Start</div>");
    assert_eq!(
        node.mount().unwrap().region,
        Some(Rect::new(80.0, 40.0, 120.0, 60.0))
    );

    node.set_attributes(
        NodeAttributes::new(200.0, 100.0, 60.0, 30.0).with_data(json!({ "title": "Review" })),
    );
    assert_eq!(node.did_update(), MountStatus::Populated);

    let mount = node.mount().unwrap();
    assert_eq!(mount.html, "<div class=\"card\">Review</div>");
    assert_eq!(mount.region, Some(Rect::new(170.0, 85.0, 230.0, 115.0)));
    assert_eq!(mount.writes, 2);
}

#[test]
fn detached_mount_defers_until_next_update() {
    let mut node = attached_node(NodeAttributes::new(0.0, 0.0, 10.0, 10.0));
    node.mount_mut().unwrap().attached = false;

    assert_eq!(node.did_mount(), MountStatus::Deferred);
    assert_eq!(node.mount().unwrap().writes, 0);

    node.mount_mut().unwrap().attached = true;
    assert_eq!(node.did_update(), MountStatus::Populated);
    assert_eq!(node.mount().unwrap().writes, 1);
}

#[test]
fn teardown_releases_mount_and_remount_repopulates() {
    let mut node = attached_node(NodeAttributes::new(0.0, 0.0, 10.0, 10.0));
    node.did_mount();
    let old = node.take_mount().expect("mount handle");
    assert_eq!(old.writes, 1);
    assert_eq!(node.did_update(), MountStatus::Deferred);

    node.set_mount(RecordingMount {
        attached: true,
        ..RecordingMount::default()
    });
    assert_eq!(node.did_mount(), MountStatus::Populated);
    assert!(!node.is_pending());
}

#[test]
fn mount_region_stays_in_graph_space_under_zoom() {
    let mut node = attached_node(NodeAttributes::new(100.0, 50.0, 40.0, 20.0));
    let mut view = ViewTransform::identity();
    view.zoom_at(2.0, Point::ORIGIN);
    view.pan(Vec2::new(5.0, 5.0));

    node.did_mount();
    // The mount itself is never scaled by the node.
    let region = node.mount().unwrap().region.unwrap();
    assert_eq!(region, node.shape().rect);

    // The surface transform places it on screen.
    assert_eq!(
        view.rect_to_surface(region),
        Rect::new(165.0, 85.0, 245.0, 125.0)
    );
}
