//! # Primitive Shape Generation
//!
//! Boxes with per-face normals. Each face owns its four corners so normals
//! stay flat across the face instead of being averaged at the edges.

use super::GeometryData;

/// Generate a box centered at the origin
///
/// # Arguments
/// * `width` - Extent along x
/// * `height` - Extent along y
/// * `depth` - Extent along z
///
/// Returns 24 vertices (4 per face) and 36 indices with counter-clockwise
/// winding when viewed from outside.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);

    #[rustfmt::skip]
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // +X
        ([ 1.0,  0.0,  0.0], [[ x, -y,  z], [ x, -y, -z], [ x,  y, -z], [ x,  y,  z]]),
        // -X
        ([-1.0,  0.0,  0.0], [[-x, -y, -z], [-x, -y,  z], [-x,  y,  z], [-x,  y, -z]]),
        // +Y
        ([ 0.0,  1.0,  0.0], [[-x,  y,  z], [ x,  y,  z], [ x,  y, -z], [-x,  y, -z]]),
        // -Y
        ([ 0.0, -1.0,  0.0], [[-x, -y, -z], [ x, -y, -z], [ x, -y,  z], [-x, -y,  z]]),
        // +Z
        ([ 0.0,  0.0,  1.0], [[-x, -y,  z], [ x, -y,  z], [ x,  y,  z], [-x,  y,  z]]),
        // -Z
        ([ 0.0,  0.0, -1.0], [[ x, -y, -z], [-x, -y, -z], [-x,  y, -z], [ x,  y, -z]]),
    ];

    let mut data = GeometryData::new();
    for (normal, corners) in faces {
        let base = data.vertices.len() as u32;
        data.vertices.extend_from_slice(&corners);
        data.normals.extend_from_slice(&[normal; 4]);
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a unit cube centered at the origin
pub fn generate_cube() -> GeometryData {
    generate_box(1.0, 1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    #[test]
    fn test_box_generation() {
        let sheet = generate_box(1.0, 15.0, 15.0);
        assert_eq!(sheet.vertex_count(), 24);
        assert_eq!(sheet.indices.len(), 36);
        assert_eq!(sheet.triangle_count(), 12);
        assert_eq!(sheet.normals.len(), sheet.vertices.len());
    }

    #[test]
    fn test_box_extents() {
        let (min, max) = generate_box(1.0, 15.0, 15.0).bounds();
        assert_eq!(min, [-0.5, -7.5, -7.5]);
        assert_eq!(max, [0.5, 7.5, 7.5]);
    }

    #[test]
    fn test_winding_matches_normals() {
        let data = generate_box(2.0, 3.0, 4.0);
        for triangle in data.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| data.vertices[triangle[i] as usize]);
            let face = cross(sub(b, a), sub(c, a));
            let normal = data.normals[triangle[0] as usize];
            let facing = face[0] * normal[0] + face[1] * normal[1] + face[2] * normal[2];
            assert!(facing > 0.0, "triangle {:?} winds away from its normal", triangle);
        }
    }

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.bounds(), ([-0.5; 3], [0.5; 3]));
    }
}
