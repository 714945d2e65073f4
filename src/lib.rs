//! Live parametric torus rendered in the terminal.
//!
//! A torus mesh is regenerated whenever its shape settings change, while a
//! single long-lived flow shader animates it and a software rasterizer
//! presents each frame.

/// Application entry state: settings, torus, camera, and panel together.
pub mod app;

/// Rendering backend contract.
pub mod backend;

/// Settings-to-widget wiring and the reset routine.
pub mod binding;

/// Orbit camera controls.
pub mod camera;

/// Error types.
pub mod error;

/// Software rasterizer backend.
pub mod graphics;

/// Terminal input mapping.
pub mod input;

/// Rasterization and shading helpers.
pub mod math;

/// Torus tessellation.
pub mod mesh;

/// Per-frame driver.
pub mod render_loop;

/// Flow shader program.
pub mod shader;

/// Settings record.
pub mod state;

/// Terminal presentation.
pub mod terminal;

/// Torus scene object.
pub mod torus;

/// Vertex types.
pub mod vertex;

/// Control-panel widgets.
pub mod widget;

pub use backend::{DrawCall, MeshHandle, RenderBackend};
pub use error::RenderError;
pub use mesh::{generate_torus, Mesh};
pub use state::Settings;
