//! Utilities for visualizing ropes.
//!
//! [`DebugDraw`][self::DebugDraw] is the interface a renderer implements to receive
//! debug geometry. [`DebugLines`][self::DebugLines] is a ready-made implementation
//! that collects everything into a line list vertex buffer.

use zerocopy::{AsBytes, FromBytes};

use crate::math as m;

/// RGBA color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color([r, g, b, 1.0])
    }
}

pub const SEGMENT_COLOR: Color = Color::rgb(0.4, 0.5, 0.7);
pub const PINNED_COLOR: Color = Color::rgb(0.1, 0.8, 0.1);
pub const DYNAMIC_COLOR: Color = Color::rgb(0.7, 0.2, 0.4);
pub const POINT_SIZE: f64 = 5.0;

/// Receiver of debug geometry.
pub trait DebugDraw {
    fn draw_segment(&mut self, start: m::Vec2, end: m::Vec2, color: Color);
    /// `size` is a diameter in the renderer's units.
    fn draw_point(&mut self, position: m::Vec2, size: f64, color: Color);
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, AsBytes, FromBytes)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Collects debug geometry into a vertex buffer to be drawn
/// with a line list topology. Points are drawn as small crosses.
#[derive(Clone, Debug)]
pub struct DebugLines {
    /// Scale from point size to cross arm length in world units.
    pub point_scale: f64,
    vertices: Vec<Vertex>,
}

impl Default for DebugLines {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugLines {
    pub fn new() -> Self {
        Self {
            point_scale: 0.01,
            vertices: Vec::new(),
        }
    }

    pub fn with_point_scale(mut self, scale: f64) -> Self {
        self.point_scale = scale;
        self
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Vertex data ready to be uploaded to a GPU buffer.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.vertices.as_bytes()
    }

    /// Remove all geometry, keeping the allocation for the next frame.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    fn push_line(&mut self, start: m::Vec2, end: m::Vec2, color: Color) {
        for p in [start, end] {
            self.vertices.push(Vertex {
                position: [p.x as f32, p.y as f32],
                color: color.0,
            });
        }
    }
}

impl DebugDraw for DebugLines {
    fn draw_segment(&mut self, start: m::Vec2, end: m::Vec2, color: Color) {
        self.push_line(start, end, color);
    }

    fn draw_point(&mut self, position: m::Vec2, size: f64, color: Color) {
        let arm = 0.5 * size * self.point_scale;
        for axis in [m::Vec2::unit_x(), m::Vec2::unit_y()] {
            self.push_line(position - arm * axis, position + arm * axis, color);
        }
    }
}
