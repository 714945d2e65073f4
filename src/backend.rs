use crate::mesh::Mesh;
use crate::shader::FlowShader;
use glam::Mat4;

/// Opaque reference to a mesh resident in a rendering backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u64);

/// Everything the backend needs to draw one object for one frame.
pub struct DrawCall<'a> {
    pub mesh: MeshHandle,
    pub shader: &'a FlowShader,
    pub model: Mat4,
    pub view_projection: Mat4,
    pub wireframe: bool,
}

/// Abstracts triangle rasterization and mesh residency.
///
/// Backends own no application state. Releasing one mesh must leave every
/// other resident mesh valid.
pub trait RenderBackend {
    type Error: core::fmt::Debug;

    /// Make a mesh resident and return its handle.
    fn upload_mesh(&mut self, mesh: &Mesh) -> Result<MeshHandle, Self::Error>;

    /// Free a resident mesh. The handle is invalid afterwards.
    fn release_mesh(&mut self, handle: MeshHandle) -> Result<(), Self::Error>;

    /// Start a new frame: clear color and depth.
    fn begin_frame(&mut self);

    /// Rasterize one object into the current frame.
    fn draw(&mut self, call: &DrawCall<'_>) -> Result<(), Self::Error>;

    /// Width over height of the render target.
    fn aspect_ratio(&self) -> f32;
}
