use crate::backend::{DrawCall, MeshHandle, RenderBackend};
use crate::error::RenderError;
use crate::math::edge_function;
use crate::mesh::Mesh;
use crate::shader::{FlowShader, FragmentInput};
use crate::vertex::ShadedVertex;
use glam::{Vec3, Vec4};
use std::collections::HashMap;

/// Geometry closer than this in clip-space w is clipped away
const NEAR_W: f32 = 1e-3;

/// Background color of cleared frames
pub const CLEAR_COLOR: [u8; 3] = [0, 0, 0];

/// RGB pixel buffer with a depth buffer
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
    depth: Vec<f32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer {
            width,
            height,
            pixels: vec![CLEAR_COLOR; width * height],
            depth: vec![f32::INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            *self = Framebuffer::new(width, height);
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(CLEAR_COLOR);
        self.depth.fill(f32::INFINITY);
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels[y * self.width + x]
    }

    /// Number of pixels that differ from the clear color
    pub fn covered_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| **p != CLEAR_COLOR).count()
    }

    fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Draws a triangle with depth testing, shading each pixel with the fragment stage.
///
/// Both windings are filled; zero-area triangles are skipped.
pub fn draw_triangle(
    v0: &ShadedVertex,
    v1: &ShadedVertex,
    v2: &ShadedVertex,
    framebuffer: &mut Framebuffer,
    shader: &FlowShader,
) {
    if framebuffer.is_empty() {
        return;
    }
    let width = framebuffer.width;
    let height = framebuffer.height;

    // Compute bounding box of the triangle
    let min_x = v0.screen_position[0]
        .min(v1.screen_position[0])
        .min(v2.screen_position[0])
        .floor()
        .max(0.0) as usize;
    let max_x = v0.screen_position[0]
        .max(v1.screen_position[0])
        .max(v2.screen_position[0])
        .ceil()
        .min(width as f32 - 1.0) as usize;
    let min_y = v0.screen_position[1]
        .min(v1.screen_position[1])
        .min(v2.screen_position[1])
        .floor()
        .max(0.0) as usize;
    let max_y = v0.screen_position[1]
        .max(v1.screen_position[1])
        .max(v2.screen_position[1])
        .ceil()
        .min(height as f32 - 1.0) as usize;

    let area = edge_function(&v0.screen_position, &v1.screen_position, &v2.screen_position);
    if area.abs() < f32::EPSILON {
        return;
    }

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = [x as f32 + 0.5, y as f32 + 0.5];

            // Normalized barycentric coordinates, positive inside for either winding
            let w0 = edge_function(&v1.screen_position, &v2.screen_position, &p) / area;
            let w1 = edge_function(&v2.screen_position, &v0.screen_position, &p) / area;
            let w2 = edge_function(&v0.screen_position, &v1.screen_position, &p) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let depth = v0.depth * w0 + v1.depth * w1 + v2.depth * w2;
            let offset = y * width + x;
            if depth >= framebuffer.depth[offset] {
                continue;
            }
            framebuffer.depth[offset] = depth;

            let fragment = FragmentInput {
                position: v0.position * w0 + v1.position * w1 + v2.position * w2,
                normal: (v0.normal * w0 + v1.normal * w1 + v2.normal * w2).normalize_or_zero(),
                phase: v0.phase * w0 + v1.phase * w1 + v2.phase * w2,
            };
            framebuffer.pixels[offset] = shader.fragment(&fragment);
        }
    }
}

/// Draws a line between two points in the pixel buffer using Bresenham's algorithm.
///
/// The segment is clipped to the framebuffer first, so only visible pixels are stepped.
pub fn draw_line(
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    framebuffer: &mut Framebuffer,
    color: [u8; 3],
) {
    if framebuffer.is_empty() {
        return;
    }
    let width = framebuffer.width as isize;
    let height = framebuffer.height as isize;
    let max_x = (width - 1) as f32;
    let max_y = (height - 1) as f32;
    let Some((x0, y0, x1, y1)) = clip_segment(x0, y0, x1, y1, max_x, max_y) else {
        return;
    };
    let (mut x0, mut y0, x1, y1) = (
        x0.round() as isize,
        y0.round() as isize,
        x1.round() as isize,
        y1.round() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    loop {
        if x0 >= 0 && x0 < width && y0 >= 0 && y0 < height {
            framebuffer.pixels[(y0 * width + x0) as usize] = color;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Liang-Barsky clip of a segment to `[0, max_x] x [0, max_y]`.
///
/// Runs in f64 so far off-screen endpoints keep pixel precision.
fn clip_segment(
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    max_x: f32,
    max_y: f32,
) -> Option<(f64, f64, f64, f64)> {
    if ![x0, y0, x1, y1].iter().all(|c| c.is_finite()) {
        return None;
    }
    let (x0, y0, x1, y1) = (x0 as f64, y0 as f64, x1 as f64, y1 as f64);
    let (max_x, max_y) = (max_x as f64, max_y as f64);
    let dx = x1 - x0;
    let dy = y1 - y0;
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [(-dx, x0), (dx, max_x - x0), (-dy, y0), (dy, max_y - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((x0 + t0 * dx, y0 + t0 * dy, x0 + t1 * dx, y0 + t1 * dy))
}

/// Vertex-stage output in clip space, before the perspective divide
#[derive(Clone, Copy, Debug)]
struct ClipVertex {
    clip: Vec4,
    position: Vec3,
    normal: Vec3,
    phase: f32,
}

impl ClipVertex {
    fn in_front(&self) -> bool {
        self.clip.w > NEAR_W
    }

    /// Point where the segment towards `other` crosses the near plane
    fn near_crossing(&self, other: &ClipVertex) -> ClipVertex {
        let t = (NEAR_W - self.clip.w) / (other.clip.w - self.clip.w);
        ClipVertex {
            clip: self.clip.lerp(other.clip, t),
            position: self.position.lerp(other.position, t),
            normal: self.normal.lerp(other.normal, t),
            phase: self.phase + (other.phase - self.phase) * t,
        }
    }

    fn project(&self, width: f32, height: f32) -> ShadedVertex {
        let ndc = self.clip.truncate() / self.clip.w.max(NEAR_W);
        ShadedVertex {
            position: self.position,
            screen_position: [(ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height],
            depth: ndc.z,
            normal: self.normal.normalize_or_zero(),
            phase: self.phase,
        }
    }
}

/// Clips a triangle against the near plane.
///
/// Returns the clipped polygon in winding order and its vertex count: 0, 3 or 4.
fn clip_triangle(triangle: [ClipVertex; 3]) -> ([ClipVertex; 4], usize) {
    let mut polygon = [triangle[0]; 4];
    let mut count = 0;
    for i in 0..3 {
        let current = triangle[i];
        let next = triangle[(i + 1) % 3];
        if current.in_front() {
            polygon[count] = current;
            count += 1;
        }
        if current.in_front() != next.in_front() {
            polygon[count] = current.near_crossing(&next);
            count += 1;
        }
    }
    (polygon, count)
}

/// Clips one edge against the near plane
fn clip_edge(a: ClipVertex, b: ClipVertex) -> Option<(ClipVertex, ClipVertex)> {
    match (a.in_front(), b.in_front()) {
        (true, true) => Some((a, b)),
        (true, false) => Some((a, a.near_crossing(&b))),
        (false, true) => Some((b.near_crossing(&a), b)),
        (false, false) => None,
    }
}

/// Rendering backend that rasterizes into an in-memory framebuffer
pub struct SoftwareRenderer {
    framebuffer: Framebuffer,
    meshes: HashMap<MeshHandle, Mesh>,
    next_handle: u64,
}

impl SoftwareRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        SoftwareRenderer {
            framebuffer: Framebuffer::new(width, height),
            meshes: HashMap::new(),
            next_handle: 1,
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        log::debug!("framebuffer resized to {}x{}", width, height);
        self.framebuffer.resize(width, height);
    }

    /// Number of meshes currently resident
    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Runs the vertex stage for every vertex of `mesh`
    fn shade_vertices(mesh: &Mesh, call: &DrawCall<'_>) -> Vec<ClipVertex> {
        mesh.vertices
            .iter()
            .map(|vertex| {
                let out = call.shader.vertex(vertex.uv);
                let world = call.model.transform_point3(out.position);
                ClipVertex {
                    clip: call.view_projection * world.extend(1.0),
                    position: world,
                    normal: call.model.transform_vector3(out.normal),
                    phase: out.phase,
                }
            })
            .collect()
    }
}

impl RenderBackend for SoftwareRenderer {
    type Error = RenderError;

    fn upload_mesh(&mut self, mesh: &Mesh) -> Result<MeshHandle, RenderError> {
        if mesh.vertices.is_empty() || mesh.indices.is_empty() {
            return Err(RenderError::EmptyMesh);
        }
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        self.meshes.insert(handle, mesh.clone());
        Ok(handle)
    }

    fn release_mesh(&mut self, handle: MeshHandle) -> Result<(), RenderError> {
        self.meshes
            .remove(&handle)
            .map(|_| ())
            .ok_or(RenderError::UnknownMesh(handle))
    }

    fn begin_frame(&mut self) {
        self.framebuffer.clear();
    }

    fn draw(&mut self, call: &DrawCall<'_>) -> Result<(), RenderError> {
        let mesh = self
            .meshes
            .get(&call.mesh)
            .ok_or(RenderError::UnknownMesh(call.mesh))?;
        let width = self.framebuffer.width as f32;
        let height = self.framebuffer.height as f32;
        let shaded = Self::shade_vertices(mesh, call);

        for &[a, b, c] in &mesh.indices {
            let triangle = [shaded[a as usize], shaded[b as usize], shaded[c as usize]];

            if call.wireframe {
                for (start, end) in [
                    (triangle[0], triangle[1]),
                    (triangle[1], triangle[2]),
                    (triangle[2], triangle[0]),
                ] {
                    let Some((start, end)) = clip_edge(start, end) else {
                        continue;
                    };
                    let start = start.project(width, height);
                    let end = end.project(width, height);
                    let color = call.shader.fragment(&FragmentInput {
                        position: start.position,
                        normal: start.normal,
                        phase: start.phase,
                    });
                    draw_line(
                        start.screen_position[0],
                        start.screen_position[1],
                        end.screen_position[0],
                        end.screen_position[1],
                        &mut self.framebuffer,
                        color,
                    );
                }
            } else {
                let (polygon, count) = clip_triangle(triangle);
                if count < 3 {
                    continue;
                }
                let first = polygon[0].project(width, height);
                for pair in polygon[1..count].windows(2) {
                    draw_triangle(
                        &first,
                        &pair[0].project(width, height),
                        &pair[1].project(width, height),
                        &mut self.framebuffer,
                        call.shader,
                    );
                }
            }
        }
        Ok(())
    }

    fn aspect_ratio(&self) -> f32 {
        if self.framebuffer.height == 0 {
            1.0
        } else {
            self.framebuffer.width as f32 / self.framebuffer.height as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{BaseColor, Uniforms};
    use glam::Vec3;

    fn flat_shader() -> FlowShader {
        FlowShader::new(
            Uniforms {
                elapsed_time: 0.0,
                major_radius: 1.0,
                minor_radius: 0.5,
                flow_speed: 1.0,
                rainbow_mode: false,
            },
            BaseColor::White,
            false,
        )
    }

    fn screen_vertex(x: f32, y: f32, depth: f32) -> ShadedVertex {
        ShadedVertex {
            position: Vec3::ZERO,
            screen_position: [x, y],
            depth,
            normal: Vec3::Z,
            phase: 0.0,
        }
    }

    #[test]
    fn triangle_fills_pixels_for_both_windings() {
        let shader = flat_shader();
        let a = screen_vertex(0.0, 0.0, 0.0);
        let b = screen_vertex(8.0, 0.0, 0.0);
        let c = screen_vertex(0.0, 8.0, 0.0);

        let mut cw = Framebuffer::new(8, 8);
        draw_triangle(&a, &b, &c, &mut cw, &shader);
        let mut ccw = Framebuffer::new(8, 8);
        draw_triangle(&a, &c, &b, &mut ccw, &shader);

        assert!(cw.covered_pixels() > 20);
        assert_eq!(cw.covered_pixels(), ccw.covered_pixels());
        assert_eq!(cw.pixel(1, 1), [255, 255, 255]);
    }

    #[test]
    fn degenerate_triangle_draws_nothing() {
        let shader = flat_shader();
        let mut fb = Framebuffer::new(8, 8);
        let a = screen_vertex(0.0, 0.0, 0.0);
        let b = screen_vertex(4.0, 4.0, 0.0);
        let c = screen_vertex(8.0, 8.0, 0.0);
        draw_triangle(&a, &b, &c, &mut fb, &shader);
        assert_eq!(fb.covered_pixels(), 0);
    }

    #[test]
    fn nearer_triangle_wins_depth_test() {
        let near = flat_shader();
        let mut far = flat_shader();
        far.uniforms.rainbow_mode = true;

        let mut fb = Framebuffer::new(4, 4);
        let quad = |d| {
            (
                screen_vertex(-1.0, -1.0, d),
                screen_vertex(9.0, -1.0, d),
                screen_vertex(-1.0, 9.0, d),
            )
        };
        let (a, b, c) = quad(0.2);
        draw_triangle(&a, &b, &c, &mut fb, &near);
        let (a, b, c) = quad(0.8);
        draw_triangle(&a, &b, &c, &mut fb, &far);
        assert_eq!(fb.pixel(0, 0), [255, 255, 255]);
    }

    #[test]
    fn line_is_clipped_to_framebuffer() {
        let mut fb = Framebuffer::new(4, 4);
        draw_line(-5.0, 1.0, 10.0, 1.0, &mut fb, [9, 9, 9]);
        assert_eq!(fb.covered_pixels(), 4);
        assert_eq!(fb.pixel(3, 1), [9, 9, 9]);
    }

    #[test]
    fn far_off_screen_endpoints_only_step_visible_pixels() {
        let mut fb = Framebuffer::new(8, 8);
        draw_line(-1.0e9, 2.0, 1.0e9, 2.0, &mut fb, [9, 9, 9]);
        assert_eq!(fb.covered_pixels(), 8);

        let mut fb = Framebuffer::new(8, 8);
        draw_line(-4.0, -4.0, 12.0, 12.0, &mut fb, [9, 9, 9]);
        assert_eq!(fb.covered_pixels(), 8);
        assert_eq!(fb.pixel(0, 0), [9, 9, 9]);
        assert_eq!(fb.pixel(7, 7), [9, 9, 9]);
    }

    #[test]
    fn invisible_lines_draw_nothing() {
        let mut fb = Framebuffer::new(8, 8);
        draw_line(-10.0, -3.0, 20.0, -3.0, &mut fb, [9, 9, 9]);
        draw_line(f32::NAN, 1.0, 4.0, 1.0, &mut fb, [9, 9, 9]);
        draw_line(0.0, f32::INFINITY, 4.0, 1.0, &mut fb, [9, 9, 9]);
        assert_eq!(fb.covered_pixels(), 0);

        let mut empty = Framebuffer::new(0, 0);
        draw_line(0.0, 0.0, 5.0, 5.0, &mut empty, [9, 9, 9]);
        assert_eq!(empty.covered_pixels(), 0);
    }

    fn clip_vertex(x: f32, w: f32) -> ClipVertex {
        ClipVertex {
            clip: Vec4::new(x, 0.0, 0.0, w),
            position: Vec3::new(x, 0.0, 0.0),
            normal: Vec3::Z,
            phase: x,
        }
    }

    #[test]
    fn triangle_in_front_is_kept_unchanged() {
        let triangle = [clip_vertex(0.0, 1.0), clip_vertex(1.0, 2.0), clip_vertex(2.0, 3.0)];
        let (polygon, count) = clip_triangle(triangle);
        assert_eq!(count, 3);
        for (kept, original) in polygon[..count].iter().zip(&triangle) {
            assert_eq!(kept.clip, original.clip);
        }
    }

    #[test]
    fn triangle_crossing_near_plane_is_clipped_not_dropped() {
        // One vertex behind the eye: the remainder is a quad
        let (polygon, count) =
            clip_triangle([clip_vertex(0.0, -1.0), clip_vertex(1.0, 1.0), clip_vertex(2.0, 1.0)]);
        assert_eq!(count, 4);
        assert!(polygon[..count].iter().all(|v| v.clip.w >= NEAR_W - 1e-6));

        // Two behind: a smaller triangle
        let (polygon, count) =
            clip_triangle([clip_vertex(0.0, -1.0), clip_vertex(1.0, -2.0), clip_vertex(2.0, 1.0)]);
        assert_eq!(count, 3);
        assert!(polygon[..count].iter().all(|v| v.clip.w >= NEAR_W - 1e-6));
    }

    #[test]
    fn triangle_behind_eye_is_dropped() {
        let (_, count) =
            clip_triangle([clip_vertex(0.0, -1.0), clip_vertex(1.0, -2.0), clip_vertex(2.0, 0.0)]);
        assert_eq!(count, 0);
    }

    #[test]
    fn crossing_interpolates_attributes() {
        let front = clip_vertex(0.0, 1.0);
        let behind = clip_vertex(2.0, -1.0);
        let (start, end) = clip_edge(front, behind).unwrap();
        assert_eq!(start.clip, front.clip);
        assert!((end.clip.w - NEAR_W).abs() < 1e-6);
        // w falls from 1 to -1, so the crossing sits just under halfway
        assert!((end.phase - 2.0 * (1.0 - NEAR_W) / 2.0).abs() < 1e-5);
        assert!(clip_edge(behind, clip_vertex(1.0, -0.5)).is_none());
    }

    #[test]
    fn released_handle_is_unknown() {
        let mut renderer = SoftwareRenderer::new(4, 4);
        let mesh = crate::mesh::generate_torus(1.0, 0.5, 3, 3);
        let handle = renderer.upload_mesh(&mesh).unwrap();
        renderer.release_mesh(handle).unwrap();
        assert!(matches!(
            renderer.release_mesh(handle),
            Err(RenderError::UnknownMesh(h)) if h == handle
        ));
        assert_eq!(renderer.live_meshes(), 0);
    }

    #[test]
    fn empty_framebuffer_draws_nothing() {
        let shader = flat_shader();
        let mut fb = Framebuffer::new(0, 0);
        let a = screen_vertex(0.0, 0.0, 0.0);
        let b = screen_vertex(8.0, 0.0, 0.0);
        let c = screen_vertex(0.0, 8.0, 0.0);
        draw_triangle(&a, &b, &c, &mut fb, &shader);
        assert_eq!(fb.covered_pixels(), 0);
    }
}
