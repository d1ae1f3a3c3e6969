//! Layer - one region of the screen

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// A single layer in the compositor
pub struct Layer {
    /// Z-order (higher = in front)
    pub z_index: i32,
    /// Screen position and size
    pub bounds: Rect,
    /// Whether the layer is drawn at all
    pub visible: bool,
    /// Render buffer in layer-local coordinates (origin at 0,0)
    pub buffer: Buffer,
}

impl Layer {
    pub fn new(bounds: Rect, z_index: i32) -> Self {
        Self {
            z_index,
            bounds,
            visible: true,
            buffer: Buffer::empty(Self::local_area(bounds)),
        }
    }

    /// Buffer area for screen bounds
    pub fn local_area(bounds: Rect) -> Rect {
        Rect::new(0, 0, bounds.width, bounds.height)
    }

    /// Check if a screen point is within this layer
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.bounds.x
            && x < self.bounds.x.saturating_add(self.bounds.width)
            && y >= self.bounds.y
            && y < self.bounds.y.saturating_add(self.bounds.height)
    }
}
