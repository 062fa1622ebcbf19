//! Gesture gating.
//!
//! Every interaction the canvas can start maps to the permission flags that
//! allow it. Handlers ask [`allows`] before acting; renderers read
//! [`Affordances`] to decide what chrome to draw.
//!
//! | Gesture | Allowed when |
//! |---------|--------------|
//! | zoom / wheel scroll / canvas pan | `stopZoomGraph` / `stopScrollGraph` / `stopMoveGraph` unset |
//! | node drag | `adjustNodePosition` |
//! | edge middle segment | `adjustEdge` |
//! | edge first/last segment | `adjustEdge` and not `adjustEdgeMiddle` |
//! | edge endpoint reconnect | `adjustEdge` and `adjustEdgeStartAndEnd` |
//! | text edit | `nodeTextEdit` / `edgeTextEdit` |
//! | text drag | `nodeTextDraggable` / `edgeTextDraggable` |
//! | additive selection | `metaKeyMultipleSelected` |

use fc_core::PermissionSet;

/// Which part of an edge a drag started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePart {
    /// An inner segment of a polyline edge.
    Middle,
    /// The first or last segment, attached to a node.
    EndSegment,
    /// The start or end point itself (reconnect to another anchor).
    Endpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    ZoomCanvas,
    ScrollCanvas,
    MoveCanvas,
    DragNode,
    AdjustEdge(EdgePart),
    EditNodeText,
    EditEdgeText,
    DragNodeText,
    DragEdgeText,
    MultiSelect,
}

pub fn allows(perms: &PermissionSet, gesture: Gesture) -> bool {
    let allowed = match gesture {
        Gesture::ZoomCanvas => !perms.stop_zoom_graph,
        Gesture::ScrollCanvas => !perms.stop_scroll_graph,
        Gesture::MoveCanvas => !perms.stop_move_graph,
        Gesture::DragNode => perms.adjust_node_position,
        Gesture::AdjustEdge(EdgePart::Middle) => perms.adjust_edge,
        Gesture::AdjustEdge(EdgePart::EndSegment) => {
            perms.adjust_edge && !perms.adjust_edge_middle
        }
        Gesture::AdjustEdge(EdgePart::Endpoint) => {
            perms.adjust_edge && perms.adjust_edge_start_and_end
        }
        Gesture::EditNodeText => perms.node_text_edit,
        Gesture::EditEdgeText => perms.edge_text_edit,
        Gesture::DragNodeText => perms.node_text_draggable,
        Gesture::DragEdgeText => perms.edge_text_draggable,
        Gesture::MultiSelect => perms.meta_key_multiple_selected,
    };
    if !allowed {
        log::trace!("gesture {gesture:?} blocked by edit config");
    }
    allowed
}

/// Visual chrome derived from the permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub show_anchors: bool,
    pub hover_outline: bool,
    pub node_selected_outline: bool,
    pub edge_selected_outline: bool,
}

impl From<&PermissionSet> for Affordances {
    fn from(perms: &PermissionSet) -> Self {
        Self {
            show_anchors: !perms.hide_anchors,
            hover_outline: perms.hover_outline,
            node_selected_outline: perms.node_selected_outline,
            edge_selected_outline: perms.edge_selected_outline,
        }
    }
}
