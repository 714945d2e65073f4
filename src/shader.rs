//! Flow shader program: procedural torus displacement and rainbow banding.
//!
//! The vertex stage recomputes the torus parametrization from each vertex's
//! UV, offsetting the tube angle by `elapsed_time * flow_speed`. The mesh
//! only supplies the UV lattice and topology, so the uniform radii must
//! always match the radii the mesh was generated with.

use crate::math::{apply_lighting, calculate_light_intensity, smoothstep};
use crate::mesh::{torus_normal, torus_point};
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Number of hue bands in rainbow mode
pub const BAND_COUNT: usize = 6;

/// Half-width of the soft transition around each band boundary, in band widths
pub const BAND_EDGE: f32 = 0.15;

/// Light source position in world space
pub const LIGHT_POSITION: Vec3 = Vec3::new(2.0, 2.0, 5.0);

const BANDS: [Vec3; BAND_COUNT] = [
    Vec3::new(1.0, 0.0, 0.0),  // Red
    Vec3::new(1.0, 0.5, 0.0),  // Orange
    Vec3::new(1.0, 1.0, 0.0),  // Yellow
    Vec3::new(0.0, 1.0, 0.0),  // Green
    Vec3::new(0.0, 0.0, 1.0),  // Blue
    Vec3::new(0.56, 0.0, 1.0), // Violet
];

/// Fixed surface color used while rainbow mode is off
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BaseColor {
    #[default]
    Blue,
    Red,
    Green,
    White,
}

impl BaseColor {
    pub fn rgb(self) -> Vec3 {
        match self {
            BaseColor::Blue => Vec3::new(0.0, 0.0, 1.0),
            BaseColor::Red => Vec3::new(1.0, 0.0, 0.0),
            BaseColor::Green => Vec3::new(0.0, 1.0, 0.0),
            BaseColor::White => Vec3::ONE,
        }
    }
}

/// Per-draw shader inputs
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uniforms {
    /// Flow time accumulator; only advances while flow animation is enabled
    pub elapsed_time: f32,
    pub major_radius: f32,
    pub minor_radius: f32,
    /// Constant for the whole session
    pub flow_speed: f32,
    pub rainbow_mode: bool,
}

/// Output of the vertex stage, in object space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexOutput {
    pub position: Vec3,
    pub normal: Vec3,
    /// Tube angle including the flow offset, not wrapped
    pub phase: f32,
}

/// Interpolated inputs to the fragment stage
#[derive(Clone, Copy, Debug)]
pub struct FragmentInput {
    pub position: Vec3,
    pub normal: Vec3,
    pub phase: f32,
}

/// The single shader program owned by a torus. Only `uniforms` change after
/// construction.
#[derive(Clone, Debug)]
pub struct FlowShader {
    pub uniforms: Uniforms,
    base_color: BaseColor,
    lit: bool,
}

impl FlowShader {
    pub fn new(uniforms: Uniforms, base_color: BaseColor, lit: bool) -> Self {
        FlowShader {
            uniforms,
            base_color,
            lit,
        }
    }

    pub fn base_color(&self) -> BaseColor {
        self.base_color
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Tube-angle offset applied by the flow animation
    pub fn flow_offset(&self) -> f32 {
        self.uniforms.elapsed_time * self.uniforms.flow_speed
    }

    /// Vertex stage
    pub fn vertex(&self, uv: Vec2) -> VertexOutput {
        let u = uv.x * TAU;
        let v = uv.y * TAU + self.flow_offset();
        VertexOutput {
            position: torus_point(self.uniforms.major_radius, self.uniforms.minor_radius, u, v),
            normal: torus_normal(u, v),
            phase: v,
        }
    }

    /// Unlit surface color for a fragment at tube-angle `phase`
    pub fn surface_color(&self, phase: f32) -> Vec3 {
        if self.uniforms.rainbow_mode {
            rainbow_color(phase + self.uniforms.elapsed_time)
        } else {
            self.base_color.rgb()
        }
    }

    /// Fragment stage
    pub fn fragment(&self, input: &FragmentInput) -> [u8; 3] {
        let color = self.surface_color(input.phase);
        let intensity = if self.lit {
            calculate_light_intensity(input.normal, input.position, LIGHT_POSITION)
        } else {
            1.0
        };
        apply_lighting(color, intensity)
    }
}

/// Maps a phase angle onto six hue bands with smoothed boundaries.
///
/// Continuous everywhere, including across the 0 / 2π wrap where the last
/// band blends into the first.
pub fn rainbow_color(phase: f32) -> Vec3 {
    let x = phase.rem_euclid(TAU) / TAU * BAND_COUNT as f32;
    let floor = x.floor();
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    let band = (floor as usize) % BAND_COUNT;
    let f = x - floor;

    if f < BAND_EDGE {
        let prev = (band + BAND_COUNT - 1) % BAND_COUNT;
        let t = smoothstep(-BAND_EDGE, BAND_EDGE, f);
        BANDS[prev].lerp(BANDS[band], t)
    } else if f > 1.0 - BAND_EDGE {
        let next = (band + 1) % BAND_COUNT;
        let t = smoothstep(-BAND_EDGE, BAND_EDGE, f - 1.0);
        BANDS[band].lerp(BANDS[next], t)
    } else {
        BANDS[band]
    }
}
