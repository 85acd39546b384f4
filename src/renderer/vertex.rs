//! Vertex types for 2D rendering
//!
//! Layout is `position: vec2<f32>` at offset 0 and `color: vec4<f32>` at
//! offset 8, 24 bytes per vertex.

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Fallback colors for sprite kinds
pub mod colors {
    /// Player ship and player bullets (#5ff)
    pub const FRIENDLY: [f32; 4] = [1.0 / 3.0, 1.0, 1.0, 1.0];
    /// Enemies and enemy bullets (#f55)
    pub const HOSTILE: [f32; 4] = [1.0, 1.0 / 3.0, 1.0 / 3.0, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}
