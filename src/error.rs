use crate::backend::MeshHandle;

/// Errors reported by the software rendering backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The handle does not refer to a resident mesh (already released or never uploaded).
    #[error("unknown mesh handle {0:?}")]
    UnknownMesh(MeshHandle),

    /// A mesh with no vertices or no triangles was uploaded.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// Terminal or log file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
