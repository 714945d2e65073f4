//! The torus scene object: one mesh, one shader program, one transform.

use crate::backend::{DrawCall, MeshHandle, RenderBackend};
use crate::mesh::{generate_torus, Mesh};
use crate::shader::{BaseColor, FlowShader, Uniforms};
use crate::state::{Settings, ShapeSettings};
use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position and rotation of the torus
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Rotation angles around X, Y, Z in radians
    pub rotation: Vec3,
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_rotation_translation(rotation, self.position)
    }
}

/// Counts describing the resident mesh
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshStats {
    pub vertices: usize,
    pub triangles: usize,
}

impl From<&Mesh> for MeshStats {
    fn from(mesh: &Mesh) -> Self {
        MeshStats {
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
        }
    }
}

/// Owns exactly one resident mesh and the shader program that draws it.
pub struct TorusObject {
    mesh: MeshHandle,
    stats: MeshStats,
    pub shader: FlowShader,
    pub transform: Transform,
}

impl TorusObject {
    /// Builds the initial mesh and shader state from `settings` and makes
    /// the mesh resident in `backend`.
    pub fn create<B: RenderBackend>(
        settings: &Settings,
        flow_speed: f32,
        base_color: BaseColor,
        lit: bool,
        backend: &mut B,
    ) -> Result<Self, B::Error> {
        let mesh = build_mesh(&settings.shape);
        let stats = MeshStats::from(&mesh);
        let handle = backend.upload_mesh(&mesh)?;
        log::debug!(
            "created torus mesh {:?}: {} vertices, {} triangles",
            handle,
            stats.vertices,
            stats.triangles
        );

        let uniforms = Uniforms {
            elapsed_time: 0.0,
            major_radius: settings.shape.major_radius,
            minor_radius: settings.shape.minor_radius,
            flow_speed,
            rainbow_mode: settings.animation.rainbow_mode,
        };
        Ok(TorusObject {
            mesh: handle,
            stats,
            shader: FlowShader::new(uniforms, base_color, lit),
            transform: Transform::default(),
        })
    }

    /// Handle of the currently attached mesh
    pub fn mesh(&self) -> MeshHandle {
        self.mesh
    }

    pub fn mesh_stats(&self) -> MeshStats {
        self.stats
    }

    /// Regenerates the mesh from `settings.shape` and swaps it in.
    ///
    /// Shader and transform state are left untouched. If the upload fails
    /// the previous mesh stays attached. If releasing the previous mesh
    /// fails the new mesh stays attached and the release error is returned.
    pub fn apply_shape_change<B: RenderBackend>(
        &mut self,
        settings: &Settings,
        backend: &mut B,
    ) -> Result<(), B::Error> {
        let mesh = build_mesh(&settings.shape);
        self.replace_mesh(&mesh, backend)
    }

    /// Acquires `mesh` in the backend, attaches it, then releases the old one
    fn replace_mesh<B: RenderBackend>(
        &mut self,
        mesh: &Mesh,
        backend: &mut B,
    ) -> Result<(), B::Error> {
        let handle = backend.upload_mesh(mesh)?;
        let previous = std::mem::replace(&mut self.mesh, handle);
        self.stats = MeshStats::from(mesh);
        log::debug!(
            "replaced torus mesh {:?} with {:?}: {} vertices, {} triangles",
            previous,
            handle,
            self.stats.vertices,
            self.stats.triangles
        );

        backend.release_mesh(previous).map_err(|err| {
            log::error!("failed to release torus mesh {:?}: {:?}", previous, err);
            err
        })
    }

    /// Mirrors the settings radii into the shader uniforms
    pub fn sync_radii(&mut self, shape: &ShapeSettings) {
        self.shader.uniforms.major_radius = shape.major_radius;
        self.shader.uniforms.minor_radius = shape.minor_radius;
    }

    /// Zeroes rotation and moves the torus back to the origin
    pub fn reset_transform(&mut self) {
        self.transform = Transform::default();
    }

    /// Builds the draw call for this frame
    pub fn draw_call(&self, view_projection: Mat4, wireframe: bool) -> DrawCall<'_> {
        DrawCall {
            mesh: self.mesh,
            shader: &self.shader,
            model: self.transform.matrix(),
            view_projection,
            wireframe,
        }
    }

    /// Releases the attached mesh
    pub fn destroy<B: RenderBackend>(self, backend: &mut B) -> Result<(), B::Error> {
        log::debug!("destroying torus mesh {:?}", self.mesh);
        backend.release_mesh(self.mesh)
    }
}

fn build_mesh(shape: &ShapeSettings) -> Mesh {
    generate_torus(
        shape.major_radius,
        shape.minor_radius,
        shape.radial_segments,
        shape.tubular_segments,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn default_transform_is_identity() {
        assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn transform_rotates_about_x() {
        let transform = Transform {
            position: Vec3::ZERO,
            rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
        };
        let rotated = transform.matrix().transform_vector3(Vec3::Y);
        assert!((rotated - Vec3::Z).length() < 1e-6);
    }
}
