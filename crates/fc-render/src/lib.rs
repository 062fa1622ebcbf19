//! Rendering bridge for custom (foreign-content) nodes.
//!
//! A foreign-content node reserves a rectangle in graph space and lets the
//! host fill it with markup the canvas does not own. Pan and zoom come from
//! the surface's outer transform; nothing here scales content by hand.

pub mod foreign;
pub mod svg;
pub mod viewport;

pub use foreign::{
    ContentSource, ForeignContentNode, ForeignShape, MountStatus, MountTarget, NodeAttributes,
};
pub use viewport::{CoordinateMapper, ViewTransform};
