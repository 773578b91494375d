//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in CSS pixel space with a straight-alpha color
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

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Scale a color's alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Colors for game elements
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.99, 0.78, 0.84, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [1.0, 0.9, 0.78, 1.0];
    pub const SKYLINE_FAR: [f32; 4] = [0.86, 0.66, 0.8, 1.0];
    pub const SKYLINE_NEAR: [f32; 4] = [0.74, 0.55, 0.75, 1.0];
    pub const GROUND: [f32; 4] = [0.42, 0.36, 0.5, 1.0];
    pub const GROUND_LINE: [f32; 4] = [0.3, 0.25, 0.38, 1.0];
    pub const RAIL: [f32; 4] = [0.75, 0.78, 0.85, 1.0];
    pub const RAIL_POST: [f32; 4] = [0.5, 0.52, 0.6, 1.0];
    pub const OBSTACLE: [f32; 4] = [0.95, 0.5, 0.2, 1.0];
    pub const OBSTACLE_STRIPE: [f32; 4] = [1.0, 0.95, 0.9, 1.0];
    pub const BALL_SHINE: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
    pub const SHIELD: [f32; 4] = [0.45, 0.85, 1.0, 0.35];
    pub const MAGNET: [f32; 4] = [0.9, 0.3, 0.35, 1.0];
    pub const DOUBLE_SCORE: [f32; 4] = [0.35, 0.55, 1.0, 1.0];
    pub const WHEEL: [f32; 4] = [0.15, 0.12, 0.2, 1.0];
    pub const EYE: [f32; 4] = [0.12, 0.1, 0.15, 1.0];
    pub const SWEAT: [f32; 4] = [0.55, 0.8, 1.0, 0.9];
}
