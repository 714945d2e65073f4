use glam::{Vec2, Vec3};

/// Mesh vertex with position, normal, and UV coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// Vertex after the vertex stage, with world position, screen position, and normal
#[derive(Clone, Copy, Debug)]
pub struct ShadedVertex {
    pub position: Vec3,
    pub screen_position: [f32; 2],
    /// NDC depth in [-1, 1]
    pub depth: f32,
    pub normal: Vec3,
    /// Tube angle including the flow offset, unwrapped
    pub phase: f32,
}
