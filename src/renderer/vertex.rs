//! Vertex types for 2D rendering

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

/// Colors for game elements
pub mod colors {
    pub const SKY_CLEAR: [f32; 4] = [0.53, 0.81, 0.92, 1.0];
    pub const SUN: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const SKY_RAIN: [f32; 4] = [0.41, 0.41, 0.41, 1.0];
    pub const SKY_SNOW: [f32; 4] = [0.83, 0.83, 0.83, 1.0];
    pub const LIGHTNING: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const DISC: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const STICK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const WIND_SHIELD: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const STICK_FREEZE: [f32; 4] = [1.0, 0.65, 0.0, 1.0];
    pub const RAIN: [f32; 4] = [0.2, 0.4, 1.0, 0.8];
    pub const SNOW: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BURST: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    /// Dims the scene behind pause / game-over text
    pub const SHADE: [f32; 4] = [0.0, 0.0, 0.0, 0.35];
}
