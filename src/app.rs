//! Viewer state and command dispatch between ticks.

use crate::backend::RenderBackend;
use crate::binding::{ControlPanelBinding, SceneContext, RADIUS_RANGE, SEGMENT_RANGE};
use crate::camera::CameraControls;
use crate::input::Command;
use crate::render_loop::RenderLoop;
use crate::shader::BaseColor;
use crate::state::{Settings, ShapeSettings};
use crate::torus::TorusObject;
use crate::widget::{PanelLine, WidgetEdit};
use std::time::Instant;

/// Session configuration fixed at startup
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerConfig {
    /// Initial shape; clamped into the panel ranges
    pub shape: ShapeSettings,
    pub flow_speed: f32,
    pub base_color: BaseColor,
    pub lit: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            shape: ShapeSettings::default(),
            flow_speed: 1.0,
            base_color: BaseColor::default(),
            lit: true,
        }
    }
}

/// Whether the host loop should keep running
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Frames-per-second estimate, recomputed once a second
#[derive(Debug)]
pub struct FpsCounter {
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl FpsCounter {
    pub fn new() -> Self {
        FpsCounter {
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        }
    }

    pub fn frame(&mut self) {
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        FpsCounter::new()
    }
}

/// Owns the settings, the torus, the camera, the backend, and the panel.
pub struct Viewer<B, C> {
    pub settings: Settings,
    pub torus: TorusObject,
    pub camera: C,
    pub backend: B,
    pub binding: ControlPanelBinding,
    pub render_loop: RenderLoop,
    pub debug: bool,
    fps: FpsCounter,
}

impl<B: RenderBackend, C: CameraControls> Viewer<B, C> {
    pub fn new(config: ViewerConfig, mut backend: B, camera: C) -> Result<Self, B::Error> {
        let settings = Settings {
            shape: clamp_shape(config.shape),
            ..Settings::default()
        };
        log::info!("starting with {:?}", settings);

        let torus = TorusObject::create(
            &settings,
            config.flow_speed,
            config.base_color,
            config.lit,
            &mut backend,
        )?;
        let binding = ControlPanelBinding::new(&settings);
        Ok(Viewer {
            settings,
            torus,
            camera,
            backend,
            binding,
            render_loop: RenderLoop::new(),
            debug: false,
            fps: FpsCounter::new(),
        })
    }

    /// Splits the viewer into the binding and the context its edits need
    fn split(&mut self) -> (&mut ControlPanelBinding, SceneContext<'_, B, C>) {
        let ctx = SceneContext {
            settings: &mut self.settings,
            torus: &mut self.torus,
            camera: &mut self.camera,
            backend: &mut self.backend,
        };
        (&mut self.binding, ctx)
    }

    /// Applies one user command. Never called during a tick.
    pub fn handle(&mut self, command: Command) -> Result<Flow, B::Error> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::ToggleDebug => self.debug = !self.debug,
            Command::SelectNext => self.binding.panel.select_next(),
            Command::SelectPrevious => self.binding.panel.select_previous(),
            Command::Orbit { yaw, pitch } => self.camera.orbit(yaw, pitch),
            Command::Zoom(amount) => self.camera.zoom(amount),
            Command::ResetAll => {
                let (binding, mut ctx) = self.split();
                binding.reset_all(&mut ctx)?;
            }
            Command::Adjust(steps) => {
                let (binding, mut ctx) = self.split();
                binding.edit_selected(WidgetEdit::Step(steps), &mut ctx)?;
            }
            Command::Activate => {
                let (binding, mut ctx) = self.split();
                binding.edit_selected(WidgetEdit::Press, &mut ctx)?;
            }
            Command::Resize { .. } => {}
        }
        Ok(Flow::Continue)
    }

    /// Applies one user command, logging a backend failure instead of ending
    /// the session. The torus always holds a valid mesh afterwards.
    pub fn apply(&mut self, command: Command) -> Flow {
        match self.handle(command) {
            Ok(flow) => flow,
            Err(err) => {
                log::error!("{:?} failed: {:?}", command, err);
                Flow::Continue
            }
        }
    }

    /// Runs one render-loop tick
    pub fn tick(&mut self) -> Result<(), B::Error> {
        let mut ctx = SceneContext {
            settings: &mut self.settings,
            torus: &mut self.torus,
            camera: &mut self.camera,
            backend: &mut self.backend,
        };
        self.render_loop.tick(&mut ctx)?;
        self.fps.frame();
        Ok(())
    }

    pub fn panel_lines(&self) -> Vec<PanelLine> {
        self.binding.panel.lines()
    }

    /// Debug overlay lines; empty unless debug mode is on
    pub fn hud_lines(&self) -> Vec<String> {
        if !self.debug {
            return Vec::new();
        }
        let rotation = self.torus.transform.rotation;
        let stats = self.torus.mesh_stats();
        let eye = self.camera.position();
        vec![
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("FPS: {:.2}", self.fps.fps()),
            format!(
                "Angle X: {:.2}, Y: {:.2}, Z: {:.2}",
                rotation.x, rotation.y, rotation.z
            ),
            format!("Flow time: {:.2}", self.torus.shader.uniforms.elapsed_time),
            format!("Mesh: {} vertices, {} triangles", stats.vertices, stats.triangles),
            format!("Camera: ({:.2}, {:.2}, {:.2})", eye.x, eye.y, eye.z),
        ]
    }

    /// Releases the torus mesh and hands back the backend
    pub fn shutdown(self) -> Result<B, B::Error> {
        log::info!("shutting down after {} frames", self.render_loop.frames());
        let mut backend = self.backend;
        self.torus.destroy(&mut backend)?;
        Ok(backend)
    }
}

/// Clamps shape values the way the panel sliders do
pub fn clamp_shape(shape: ShapeSettings) -> ShapeSettings {
    ShapeSettings {
        major_radius: RADIUS_RANGE.clamp(shape.major_radius as f64) as f32,
        minor_radius: RADIUS_RANGE.clamp(shape.minor_radius as f64) as f32,
        radial_segments: SEGMENT_RANGE.clamp(shape.radial_segments as f64) as u32,
        tubular_segments: SEGMENT_RANGE.clamp(shape.tubular_segments as f64) as u32,
    }
}
