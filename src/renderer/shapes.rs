//! Shape generation for 2D primitives

use glam::Vec2;

use super::vertex::Vertex;
use crate::consts::{GAME_HEIGHT, GAME_WIDTH};
use crate::sim::Rect;

/// Map a playfield point (top-left origin, y down) to clip space
/// (center origin, y up, both axes in [-1, 1])
#[inline]
pub fn to_clip(p: Vec2) -> Vec2 {
    Vec2::new(p.x / GAME_WIDTH * 2.0 - 1.0, 1.0 - p.y / GAME_HEIGHT * 2.0)
}

/// Two triangles covering `rect`, in clip space
pub fn quad(rect: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    let tl = to_clip(rect.pos);
    let br = to_clip(rect.pos + rect.size);

    [
        Vertex::new(tl.x, tl.y, color),
        Vertex::new(br.x, tl.y, color),
        Vertex::new(tl.x, br.y, color),
        Vertex::new(tl.x, br.y, color),
        Vertex::new(br.x, tl.y, color),
        Vertex::new(br.x, br.y, color),
    ]
}
