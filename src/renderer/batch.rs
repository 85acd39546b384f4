//! Quad batching render sink
//!
//! Collects a frame's draw requests as solid-colored triangles, ready to be
//! uploaded into a vertex buffer.

use super::shapes::quad;
use super::vertex::Vertex;
use super::{RenderCommand, RenderSink};

/// Render sink that tessellates commands into a vertex list
#[derive(Debug, Default)]
pub struct QuadBatch {
    vertices: Vec<Vertex>,
}

impl QuadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Raw bytes for a vertex buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}

impl RenderSink for QuadBatch {
    fn begin_frame(&mut self) {
        self.clear();
    }

    fn draw(&mut self, command: &RenderCommand) {
        self.vertices
            .extend_from_slice(&quad(&command.rect, command.kind.fallback_color()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::SpriteKind;
    use crate::sim::GameState;

    #[test]
    fn test_batches_a_frame() {
        let state = GameState::new(3);
        let mut batch = QuadBatch::new();
        batch.begin_frame();
        for command in state.render_commands() {
            batch.draw(&command);
        }

        // background + player + 15 enemies
        assert_eq!(batch.vertex_count(), 17 * 6);
        assert_eq!(batch.as_bytes().len(), 17 * 6 * std::mem::size_of::<Vertex>());
        assert_eq!(batch.vertices()[0].color, SpriteKind::Background.fallback_color());

        batch.begin_frame();
        assert_eq!(batch.vertex_count(), 0);
    }

    #[test]
    fn test_draw_uses_fallback_color() {
        let mut batch = QuadBatch::new();
        batch.draw(&RenderCommand {
            kind: SpriteKind::EnemyBullet,
            rect: crate::sim::Rect::new(0.0, 0.0, 10.0, 10.0),
        });
        assert_eq!(batch.vertex_count(), 6);
        assert!(batch.vertices().iter().all(|v| v.color == SpriteKind::Enemy.fallback_color()));
    }
}
