//! Shared test doubles: a recording render backend and a counting camera.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use torusflow::backend::{DrawCall, MeshHandle, RenderBackend};
use torusflow::camera::CameraControls;
use torusflow::mesh::Mesh;

/// What the mock saw for one draw call.
#[derive(Clone, Debug)]
pub struct DrawRecord {
    pub mesh: MeshHandle,
    pub wireframe: bool,
    pub model: Mat4,
    pub major_radius: f32,
    pub minor_radius: f32,
    pub rainbow_mode: bool,
    pub elapsed_time: f32,
}

#[derive(Debug, Default)]
pub struct BackendLog {
    pub uploads: Vec<MeshHandle>,
    pub releases: Vec<MeshHandle>,
    pub live: BTreeMap<MeshHandle, Mesh>,
    pub draws: Vec<DrawRecord>,
    pub frames_begun: usize,
    pub fail_next_upload: bool,
    pub fail_next_release: bool,
    next_handle: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    UploadRejected,
    ReleaseRejected,
    UnknownMesh(MeshHandle),
}

/// Render backend that records every call. Clones share one log.
#[derive(Clone, Default)]
pub struct MockBackend {
    pub log: Rc<RefCell<BackendLog>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.log.borrow().live.len()
    }

    pub fn live_handles(&self) -> Vec<MeshHandle> {
        self.log.borrow().live.keys().copied().collect()
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<Mesh> {
        self.log.borrow().live.get(&handle).cloned()
    }

    pub fn uploads(&self) -> Vec<MeshHandle> {
        self.log.borrow().uploads.clone()
    }

    pub fn releases(&self) -> Vec<MeshHandle> {
        self.log.borrow().releases.clone()
    }

    pub fn draws(&self) -> Vec<DrawRecord> {
        self.log.borrow().draws.clone()
    }

    pub fn fail_next_upload(&self) {
        self.log.borrow_mut().fail_next_upload = true;
    }

    pub fn fail_next_release(&self) {
        self.log.borrow_mut().fail_next_release = true;
    }
}

impl RenderBackend for MockBackend {
    type Error = MockError;

    fn upload_mesh(&mut self, mesh: &Mesh) -> Result<MeshHandle, MockError> {
        let mut log = self.log.borrow_mut();
        if std::mem::take(&mut log.fail_next_upload) {
            return Err(MockError::UploadRejected);
        }
        log.next_handle += 1;
        let handle = MeshHandle(log.next_handle);
        log.uploads.push(handle);
        log.live.insert(handle, mesh.clone());
        Ok(handle)
    }

    fn release_mesh(&mut self, handle: MeshHandle) -> Result<(), MockError> {
        let mut log = self.log.borrow_mut();
        if std::mem::take(&mut log.fail_next_release) {
            return Err(MockError::ReleaseRejected);
        }
        log.live
            .remove(&handle)
            .ok_or(MockError::UnknownMesh(handle))?;
        log.releases.push(handle);
        Ok(())
    }

    fn begin_frame(&mut self) {
        self.log.borrow_mut().frames_begun += 1;
    }

    fn draw(&mut self, call: &DrawCall<'_>) -> Result<(), MockError> {
        let mut log = self.log.borrow_mut();
        if !log.live.contains_key(&call.mesh) {
            return Err(MockError::UnknownMesh(call.mesh));
        }
        let uniforms = call.shader.uniforms;
        log.draws.push(DrawRecord {
            mesh: call.mesh,
            wireframe: call.wireframe,
            model: call.model,
            major_radius: uniforms.major_radius,
            minor_radius: uniforms.minor_radius,
            rainbow_mode: uniforms.rainbow_mode,
            elapsed_time: uniforms.elapsed_time,
        });
        Ok(())
    }

    fn aspect_ratio(&self) -> f32 {
        1.0
    }
}

/// Camera that counts calls and otherwise does nothing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CountingCamera {
    pub updates: usize,
    pub resets: usize,
    pub orbited: f32,
}

impl CameraControls for CountingCamera {
    fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.orbited += yaw.abs() + pitch.abs();
    }

    fn zoom(&mut self, _amount: f32) {}

    fn update(&mut self) {
        self.updates += 1;
    }

    fn reset(&mut self) {
        self.resets += 1;
        self.orbited = 0.0;
    }

    fn view_projection(&self, _aspect: f32) -> Mat4 {
        Mat4::IDENTITY
    }

    fn position(&self) -> Vec3 {
        Vec3::Z
    }
}

/// Radii encoded in a torus mesh: vertex 0 sits at u = v = 0, where
/// x = major + minor, and the seam row j = 0 has z = 0.
pub fn mesh_outer_radius(mesh: &Mesh) -> f32 {
    mesh.vertices[0].position.x
}
