//! Graph space ↔ surface space.
//!
//! The surface applies one outer transform (pan + uniform zoom) to every
//! shape, foreign-content mounts included. Hosts that need screen positions
//! (overlays, hit testing in screen pixels) go through [`CoordinateMapper`].

use kurbo::{Affine, Point, Rect, Vec2};

pub const MIN_SCALE: f64 = 0.2;
pub const MAX_SCALE: f64 = 16.0;

/// Converts between graph-space and surface (screen) coordinates.
pub trait CoordinateMapper {
    fn to_surface(&self, p: Point) -> Point;

    fn to_graph(&self, p: Point) -> Point;

    fn rect_to_surface(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.to_surface(rect.origin()),
            self.to_surface(Point::new(rect.x1, rect.y1)),
        )
    }
}

/// Pan and zoom of the canvas: `surface = graph * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub translate: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub const fn identity() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
        }
    }

    pub fn affine(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }

    /// Zoom by `factor`, keeping `anchor` (surface coordinates) fixed.
    /// Returns `false` when the scale was already at its limit.
    pub fn zoom_at(&mut self, factor: f64, anchor: Point) -> bool {
        let next = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if (next - self.scale).abs() < f64::EPSILON {
            return false;
        }
        let ratio = next / self.scale;
        let a = anchor.to_vec2();
        self.translate = a - (a - self.translate) * ratio;
        self.scale = next;
        true
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.translate += delta;
    }
}

impl CoordinateMapper for ViewTransform {
    fn to_surface(&self, p: Point) -> Point {
        self.affine() * p
    }

    fn to_graph(&self, p: Point) -> Point {
        self.affine().inverse() * p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn identity_maps_points_unchanged() {
        let view = ViewTransform::identity();
        let p = Point::new(12.0, -4.0);
        assert_eq!(view.to_surface(p), p);
        assert_eq!(view.to_graph(p), p);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut view = ViewTransform::identity();
        view.pan(Vec2::new(30.0, 10.0));
        let anchor = Point::new(200.0, 150.0);
        let graph_under_anchor = view.to_graph(anchor);

        assert!(view.zoom_at(2.0, anchor));
        assert!(close(view.to_surface(graph_under_anchor), anchor));
        assert!(close(view.to_graph(anchor), graph_under_anchor));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = ViewTransform::identity();
        assert!(view.zoom_at(100.0, Point::ORIGIN));
        assert_eq!(view.scale, MAX_SCALE);
        assert!(!view.zoom_at(2.0, Point::ORIGIN));
    }

    #[test]
    fn rect_maps_through_pan_and_zoom() {
        let view = ViewTransform {
            scale: 2.0,
            translate: Vec2::new(10.0, 0.0),
        };
        let r = view.rect_to_surface(Rect::new(80.0, 40.0, 120.0, 60.0));
        assert_eq!(r, Rect::new(170.0, 80.0, 250.0, 120.0));
    }
}
