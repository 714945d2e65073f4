use glam::{Mat4, Vec3};

/// Camera collaborator driven once per tick by the render loop.
pub trait CameraControls {
    /// Queue an orbit around the target by the given angles in radians.
    fn orbit(&mut self, yaw: f32, pitch: f32);

    /// Queue a change in distance; positive moves away.
    fn zoom(&mut self, amount: f32);

    /// Apply input accumulated since the previous tick.
    fn update(&mut self);

    /// Return to the default pose.
    fn reset(&mut self);

    fn view_projection(&self, aspect: f32) -> Mat4;

    /// Eye position in world space
    fn position(&self) -> Vec3;
}

const DEFAULT_DISTANCE: f32 = 5.0;
/// Vertical field of view in degrees
const DEFAULT_FOV_Y_DEGREES: f32 = 90.0;
const MIN_DISTANCE: f32 = 1.5;
const MAX_DISTANCE: f32 = 20.0;
const MAX_PITCH: f32 = 1.5;
/// Fraction of the pending input applied per update
const DAMPING: f32 = 0.35;

/// Orbits the origin at a given yaw, pitch, and distance.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitControls {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub fov_y: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        OrbitControls {
            yaw: 0.0,
            pitch: 0.0,
            distance: DEFAULT_DISTANCE,
            fov_y: DEFAULT_FOV_Y_DEGREES.to_radians(),
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,
        }
    }
}

impl OrbitControls {
    /// Whether queued input remains to be applied
    pub fn is_settling(&self) -> bool {
        self.pending_yaw.abs() > 1e-4
            || self.pending_pitch.abs() > 1e-4
            || self.pending_zoom.abs() > 1e-4
    }
}

impl CameraControls for OrbitControls {
    fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.pending_yaw += yaw;
        self.pending_pitch += pitch;
    }

    fn zoom(&mut self, amount: f32) {
        self.pending_zoom += amount;
    }

    fn update(&mut self) {
        let yaw = self.pending_yaw * DAMPING;
        let pitch = self.pending_pitch * DAMPING;
        let zoom = self.pending_zoom * DAMPING;
        self.pending_yaw -= yaw;
        self.pending_pitch -= pitch;
        self.pending_zoom -= zoom;

        self.yaw += yaw;
        self.pitch = (self.pitch + pitch).clamp(-MAX_PITCH, MAX_PITCH);
        self.distance = (self.distance + zoom).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    fn reset(&mut self) {
        *self = OrbitControls::default();
    }

    fn view_projection(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh_gl(self.fov_y, aspect.max(1e-6), 0.1, 1000.0);
        projection * view
    }

    fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(
            self.distance * cos_pitch * sin_yaw,
            self.distance * sin_pitch,
            self.distance * cos_pitch * cos_yaw,
        )
    }
}
