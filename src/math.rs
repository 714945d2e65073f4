use glam::Vec3;

/// Edge function used in rasterization
pub fn edge_function(a: &[f32; 2], b: &[f32; 2], c: &[f32; 2]) -> f32 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Hermite interpolation between `edge0` and `edge1`, clamped to [0, 1]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Calculates the light intensity based on the normal vector and light position
pub fn calculate_light_intensity(normal: Vec3, position: Vec3, light_pos: Vec3) -> f32 {
    let light_dir = (light_pos - position).normalize_or_zero();
    normal.dot(light_dir).max(0.1) // Ensure a minimum ambient light
}

/// Applies lighting to a linear RGB color and converts it to 8-bit channels
pub fn apply_lighting(color: Vec3, intensity: f32) -> [u8; 3] {
    let lit = (color * intensity * 255.0).clamp(Vec3::ZERO, Vec3::splat(255.0));
    [lit.x as u8, lit.y as u8, lit.z as u8]
}
