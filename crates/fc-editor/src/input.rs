//! Input abstraction layer.
//!
//! Normalizes mouse, touch and wheel events into a unified `InputEvent`
//! consumed by the canvas controller. Positions are in surface (screen)
//! coordinates; the controller maps them into graph space.

use fc_core::MultiSelectKey;

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Whether the configured multi-select key is held.
    pub fn holds(&self, key: MultiSelectKey) -> bool {
        match key.effective() {
            MultiSelectKey::Shift => self.shift,
            MultiSelectKey::Alt => self.alt,
            MultiSelectKey::Meta | MultiSelectKey::Unset => self.meta,
        }
    }
}

/// A normalized input event from any pointing device.
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start).
    PointerDown { x: f64, y: f64, modifiers: Modifiers },

    /// Pointer moved.
    PointerMove { x: f64, y: f64, modifiers: Modifiers },

    /// Pointer released.
    PointerUp { x: f64, y: f64, modifiers: Modifiers },

    DoubleClick { x: f64, y: f64 },

    /// Wheel / trackpad scroll or pinch.
    Scroll {
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        /// Zoom factor (1.0 = plain scroll; >1 = zoom in).
        zoom: f64,
    },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self::PointerDown { x, y, modifiers }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn scroll(dx: f64, dy: f64) -> Self {
        Self::Scroll {
            x: 0.0,
            y: 0.0,
            dx,
            dy,
            zoom: 1.0,
        }
    }

    pub fn pinch(x: f64, y: f64, zoom: f64) -> Self {
        Self::Scroll {
            x,
            y,
            dx: 0.0,
            dy: 0.0,
            zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_multi_select_key_means_meta() {
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(meta.holds(MultiSelectKey::Unset));
        assert!(!meta.holds(MultiSelectKey::Shift));
        let shift = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };
        assert!(shift.holds(MultiSelectKey::Shift));
    }
}
