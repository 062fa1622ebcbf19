//! Canvas controller: turns input events into editor actions.
//!
//! Hit-testing is done by the host; each event arrives with what was under
//! the pointer. Every gesture is checked against the current permission set
//! before it starts, so flipping a flag (or entering silent mode) takes
//! effect on the next pointer-down without any handler being reinstalled.

use crate::gate::{EdgePart, Gesture, allows};
use crate::input::InputEvent;
use crate::selection::{Element, Selection};
use fc_core::{NodeId, PermissionSet};
use fc_render::ViewTransform;
use kurbo::{Point, Vec2};

/// What the pointer is over, as reported by the host's hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Node(NodeId),
    NodeText(NodeId),
    Edge(NodeId, EdgePart),
    EdgeText(NodeId),
}

impl Hit {
    fn element(self) -> Element {
        match self {
            Hit::Node(id) | Hit::NodeText(id) => Element::Node(id),
            Hit::Edge(id, _) | Hit::EdgeText(id) => Element::Edge(id),
        }
    }
}

/// Result of handling an event. Graph deltas are in graph space.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    ViewChanged(ViewTransform),
    SelectionChanged,
    MoveNodes { ids: Vec<NodeId>, delta: Vec2 },
    AdjustEdge { id: NodeId, part: EdgePart, delta: Vec2 },
    MoveText { element: Element, delta: Vec2 },
    EditText(Element),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Idle,
    Canvas,
    Nodes,
    Edge(NodeId, EdgePart),
    Text(Element),
}

pub struct CanvasController {
    pub view: ViewTransform,
    pub selection: Selection,
    drag: Drag,
    /// Last pointer position, surface coordinates.
    last: Point,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasController {
    pub fn new() -> Self {
        Self {
            view: ViewTransform::identity(),
            selection: Selection::new(),
            drag: Drag::Idle,
            last: Point::ORIGIN,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != Drag::Idle
    }

    /// Handle one event against the current permissions.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        hit: Option<Hit>,
        perms: &PermissionSet,
    ) -> Vec<EditorAction> {
        match *event {
            InputEvent::PointerDown { x, y, modifiers } => {
                self.last = Point::new(x, y);
                let mut actions = Vec::new();
                if self
                    .selection
                    .click(hit.map(Hit::element), modifiers, perms)
                {
                    actions.push(EditorAction::SelectionChanged);
                }
                self.drag = Self::start_drag(hit, perms);
                log::trace!("pointer down at ({x}, {y}) → {:?}", self.drag);
                actions
            }
            InputEvent::PointerMove { x, y, .. } => {
                let pos = Point::new(x, y);
                let screen_delta = pos - self.last;
                self.last = pos;
                let delta = screen_delta / self.view.scale;
                match self.drag {
                    Drag::Idle => vec![],
                    Drag::Canvas => {
                        self.view.pan(screen_delta);
                        vec![EditorAction::ViewChanged(self.view)]
                    }
                    Drag::Nodes => {
                        let ids: Vec<NodeId> = self.selection.nodes().collect();
                        if ids.is_empty() {
                            return vec![];
                        }
                        vec![EditorAction::MoveNodes { ids, delta }]
                    }
                    Drag::Edge(id, part) => vec![EditorAction::AdjustEdge { id, part, delta }],
                    Drag::Text(element) => vec![EditorAction::MoveText { element, delta }],
                }
            }
            InputEvent::PointerUp { .. } => {
                self.drag = Drag::Idle;
                vec![]
            }
            InputEvent::DoubleClick { .. } => {
                let gesture = match hit {
                    Some(Hit::Node(_) | Hit::NodeText(_)) => Gesture::EditNodeText,
                    Some(Hit::Edge(..) | Hit::EdgeText(_)) => Gesture::EditEdgeText,
                    None => return vec![],
                };
                match hit {
                    Some(h) if allows(perms, gesture) => vec![EditorAction::EditText(h.element())],
                    _ => vec![],
                }
            }
            InputEvent::Scroll { x, y, dx, dy, zoom } => {
                if (zoom - 1.0).abs() > f64::EPSILON {
                    if allows(perms, Gesture::ZoomCanvas) && self.view.zoom_at(zoom, Point::new(x, y)) {
                        return vec![EditorAction::ViewChanged(self.view)];
                    }
                    return vec![];
                }
                if allows(perms, Gesture::ScrollCanvas) && (dx != 0.0 || dy != 0.0) {
                    self.view.pan(Vec2::new(-dx, -dy));
                    return vec![EditorAction::ViewChanged(self.view)];
                }
                vec![]
            }
        }
    }

    fn start_drag(hit: Option<Hit>, perms: &PermissionSet) -> Drag {
        match hit {
            None if allows(perms, Gesture::MoveCanvas) => Drag::Canvas,
            None => Drag::Idle,
            Some(Hit::NodeText(id)) if allows(perms, Gesture::DragNodeText) => {
                Drag::Text(Element::Node(id))
            }
            Some(Hit::EdgeText(id)) if allows(perms, Gesture::DragEdgeText) => {
                Drag::Text(Element::Edge(id))
            }
            // Text that cannot be dragged on its own moves with its node.
            Some(Hit::Node(_) | Hit::NodeText(_)) if allows(perms, Gesture::DragNode) => Drag::Nodes,
            Some(Hit::Edge(id, part)) if allows(perms, Gesture::AdjustEdge(part)) => {
                Drag::Edge(id, part)
            }
            Some(_) => Drag::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn id(s: &str) -> NodeId {
        NodeId::intern(s)
    }

    #[test]
    fn node_drag_moves_selection_in_graph_space() {
        let perms = PermissionSet::default();
        let mut canvas = CanvasController::new();
        canvas.view.zoom_at(2.0, Point::ORIGIN);

        canvas.handle(
            &InputEvent::pointer_down(10.0, 10.0, Modifiers::NONE),
            Some(Hit::Node(id("a"))),
            &perms,
        );
        let actions = canvas.handle(&InputEvent::pointer_move(30.0, 10.0), None, &perms);
        assert_eq!(
            actions,
            vec![EditorAction::MoveNodes {
                ids: vec![id("a")],
                delta: Vec2::new(10.0, 0.0),
            }]
        );
    }

    #[test]
    fn locked_nodes_do_not_drag() {
        let perms = PermissionSet {
            adjust_node_position: false,
            ..PermissionSet::default()
        };
        let mut canvas = CanvasController::new();
        let actions = canvas.handle(
            &InputEvent::pointer_down(0.0, 0.0, Modifiers::NONE),
            Some(Hit::Node(id("a"))),
            &perms,
        );
        // Selection still works.
        assert_eq!(actions, vec![EditorAction::SelectionChanged]);
        assert!(!canvas.is_dragging());
        assert!(canvas.handle(&InputEvent::pointer_move(5.0, 5.0), None, &perms).is_empty());
    }

    #[test]
    fn zoom_respects_stop_zoom() {
        let mut perms = PermissionSet::default();
        let mut canvas = CanvasController::new();
        assert_eq!(
            canvas.handle(&InputEvent::pinch(0.0, 0.0, 2.0), None, &perms).len(),
            1
        );
        perms.stop_zoom_graph = true;
        assert!(canvas.handle(&InputEvent::pinch(0.0, 0.0, 2.0), None, &perms).is_empty());
        assert_eq!(canvas.view.scale, 2.0);
    }

    #[test]
    fn wheel_scroll_pans_unless_stopped() {
        let mut perms = PermissionSet::default();
        let mut canvas = CanvasController::new();
        let actions = canvas.handle(&InputEvent::scroll(10.0, -4.0), None, &perms);
        assert_eq!(canvas.view.translate, Vec2::new(-10.0, 4.0));
        assert_eq!(actions, vec![EditorAction::ViewChanged(canvas.view)]);

        perms.stop_scroll_graph = true;
        assert!(canvas.handle(&InputEvent::scroll(10.0, 0.0), None, &perms).is_empty());
        assert_eq!(canvas.view.translate, Vec2::new(-10.0, 4.0));
    }

    #[test]
    fn double_click_edit_respects_text_flags() {
        let perms = PermissionSet {
            edge_text_edit: false,
            ..PermissionSet::default()
        };
        let mut canvas = CanvasController::new();
        let dbl = InputEvent::DoubleClick { x: 0.0, y: 0.0 };
        assert_eq!(
            canvas.handle(&dbl, Some(Hit::NodeText(id("a"))), &perms),
            vec![EditorAction::EditText(Element::Node(id("a")))]
        );
        assert!(canvas.handle(&dbl, Some(Hit::EdgeText(id("e"))), &perms).is_empty());
    }
}
