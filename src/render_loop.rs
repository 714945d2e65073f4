use crate::backend::RenderBackend;
use crate::binding::SceneContext;
use crate::camera::CameraControls;

/// Rotation in radians per tick for a rotation speed of 1
pub const ROTATION_STEP: f32 = 0.01;

/// Flow time added per tick while flow animation is enabled
pub const FLOW_TIME_STEP: f32 = 1.0 / 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// No frame rendered yet
    Idle,
    Running,
}

/// Per-frame driver. There is no paused state; the loop runs until the
/// process exits.
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    frames: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        RenderLoop::new()
    }
}

impl RenderLoop {
    pub fn new() -> Self {
        RenderLoop {
            state: LoopState::Idle,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames submitted so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advances animation state by one tick and submits the frame.
    pub fn tick<B: RenderBackend, C: CameraControls>(
        &mut self,
        ctx: &mut SceneContext<'_, B, C>,
    ) -> Result<(), B::Error> {
        if self.state == LoopState::Idle {
            log::debug!("render loop started");
            self.state = LoopState::Running;
        }

        let animation = &ctx.settings.animation;
        let delta = animation.rotation_speed * ROTATION_STEP;
        let rotation = &mut ctx.torus.transform.rotation;
        if animation.rotate_x {
            rotation.x += delta;
        }
        if animation.rotate_y {
            rotation.y += delta;
        }
        if animation.rotate_z {
            rotation.z += delta;
        }

        let uniforms = &mut ctx.torus.shader.uniforms;
        if animation.flow_animation {
            uniforms.elapsed_time += FLOW_TIME_STEP;
        }
        uniforms.rainbow_mode = animation.rainbow_mode;

        ctx.camera.update();

        ctx.backend.begin_frame();
        let view_projection = ctx.camera.view_projection(ctx.backend.aspect_ratio());
        let call = ctx.torus.draw_call(view_projection, animation.wireframe);
        ctx.backend.draw(&call)?;

        self.frames += 1;
        Ok(())
    }
}
