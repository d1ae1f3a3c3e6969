//! Layered Compositor
//!
//! The screen is split into z-ordered layers (code panel, about panel, link
//! bar, title label, status line). Each layer renders into its own buffer in
//! local coordinates; [`Compositor::composite`] stacks the visible ones back
//! to front. Blank cells are transparent so a fading panel never blanks out
//! what is underneath it.

mod layer;

use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

pub use layer::Layer;

/// Unique identifier for a layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(u32);

/// Owns every layer and the composited output
pub struct Compositor {
    layers: HashMap<LayerId, Layer>,
    /// Layer IDs sorted back to front
    render_order: Vec<LayerId>,
    next_id: u32,
    output: Buffer,
    area: Rect,
}

impl Compositor {
    pub fn new(area: Rect) -> Self {
        Self {
            layers: HashMap::new(),
            render_order: Vec::new(),
            next_id: 0,
            output: Buffer::empty(area),
            area,
        }
    }

    /// Create a new layer and return its ID
    pub fn create_layer(&mut self, bounds: Rect, z_index: i32) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;

        self.layers.insert(id, Layer::new(bounds, z_index));
        self.update_render_order();
        id
    }

    /// Clear a layer and hand out its buffer for drawing
    pub fn draw_layer(&mut self, id: LayerId) -> Option<&mut Buffer> {
        self.layers.get_mut(&id).map(|layer| {
            layer.buffer.reset();
            &mut layer.buffer
        })
    }

    /// Move and resize a layer in one go
    pub fn place_layer(&mut self, id: LayerId, bounds: Rect) {
        if let Some(layer) = self.layers.get_mut(&id) {
            if layer.bounds.width != bounds.width || layer.bounds.height != bounds.height {
                layer.buffer = Buffer::empty(Layer::local_area(bounds));
            }
            layer.bounds = bounds;
        }
    }

    pub fn set_visible(&mut self, id: LayerId, visible: bool) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.visible = visible;
        }
    }

    pub fn is_visible(&self, id: LayerId) -> bool {
        self.layers.get(&id).map_or(false, |l| l.visible)
    }

    pub fn bounds(&self, id: LayerId) -> Option<Rect> {
        self.layers.get(&id).map(|l| l.bounds)
    }

    /// Resize the output (layers are re-placed by the caller)
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        self.output = Buffer::empty(area);
    }

    /// Stack all visible layers into the output buffer
    pub fn composite(&mut self) -> &Buffer {
        self.output.reset();

        for id in &self.render_order {
            if let Some(layer) = self.layers.get(id) {
                if layer.visible {
                    Self::blit_layer(&mut self.output, self.area, layer);
                }
            }
        }

        &self.output
    }

    /// Copy a layer's non-blank cells onto the output
    fn blit_layer(output: &mut Buffer, area: Rect, layer: &Layer) {
        let bounds = layer.bounds;

        for ly in 0..bounds.height {
            for lx in 0..bounds.width {
                let dst_x = bounds.x + lx;
                let dst_y = bounds.y + ly;
                if dst_x >= area.width || dst_y >= area.height {
                    continue;
                }

                let Some(cell) = layer.buffer.cell((lx, ly)) else {
                    continue;
                };
                if cell.symbol() == " " {
                    continue;
                }

                if let Some(dst) = output.cell_mut((dst_x, dst_y)) {
                    *dst = cell.clone();
                }
            }
        }
    }

    /// Topmost visible layer at a screen position (for mouse events)
    pub fn layer_at(&self, x: u16, y: u16) -> Option<LayerId> {
        self.render_order.iter().rev().copied().find(|id| {
            self.layers
                .get(id)
                .map_or(false, |l| l.visible && l.contains(x, y))
        })
    }

    fn update_render_order(&mut self) {
        let mut order: Vec<LayerId> = self.layers.keys().copied().collect();
        order.sort_by_key(|id| (self.layers[id].z_index, id.0));
        self.render_order = order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Style;

    #[test]
    fn test_front_layer_wins_and_blanks_are_transparent() {
        let mut compositor = Compositor::new(Rect::new(0, 0, 4, 1));
        let back = compositor.create_layer(Rect::new(0, 0, 4, 1), 0);
        let front = compositor.create_layer(Rect::new(1, 0, 2, 1), 10);

        compositor
            .draw_layer(back)
            .unwrap()
            .set_string(0, 0, "abcd", Style::default());
        compositor
            .draw_layer(front)
            .unwrap()
            .set_string(0, 0, "X ", Style::default());

        let out = compositor.composite();
        let row: String = (0..4).map(|x| out[(x, 0)].symbol().to_string()).collect();
        assert_eq!(row, "aXcd");
    }

    #[test]
    fn test_hidden_layer_not_drawn_or_hit() {
        let mut compositor = Compositor::new(Rect::new(0, 0, 3, 1));
        let layer = compositor.create_layer(Rect::new(0, 0, 3, 1), 0);
        compositor
            .draw_layer(layer)
            .unwrap()
            .set_string(0, 0, "abc", Style::default());

        assert_eq!(compositor.layer_at(1, 0), Some(layer));
        compositor.set_visible(layer, false);
        assert_eq!(compositor.layer_at(1, 0), None);
        assert_eq!(compositor.composite()[(1, 0)].symbol(), " ");
    }

    #[test]
    fn test_place_layer_resizes_buffer() {
        let mut compositor = Compositor::new(Rect::new(0, 0, 10, 10));
        let layer = compositor.create_layer(Rect::new(0, 0, 2, 2), 0);
        compositor.place_layer(layer, Rect::new(3, 4, 5, 1));

        assert_eq!(compositor.bounds(layer), Some(Rect::new(3, 4, 5, 1)));
        assert_eq!(compositor.draw_layer(layer).unwrap().area, Rect::new(0, 0, 5, 1));
        assert_eq!(compositor.layer_at(7, 4), Some(layer));
        assert_eq!(compositor.layer_at(8, 4), None);
    }
}
