//! # Primitive Shape Generation
//!
//! All shapes are centred at the origin in a Y-up coordinate system and come with
//! outward-facing normals.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a UV sphere
///
/// # Arguments
/// * `diameter` - Sphere diameter
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(diameter: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let radius = diameter * 0.5;
    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI

            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            data.vertices.push([x * radius, y * radius, z * radius]);
            data.normals.push([x, y, z]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    data
}

/// Generate a ground plane in the XZ plane with its normal pointing up (+Y)
///
/// # Arguments
/// * `width` - Extent along X
/// * `depth` - Extent along Z
/// * `subdivisions` - Number of quads along each side
pub fn generate_ground(width: f32, depth: f32, subdivisions: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = subdivisions.max(1);

    for row in 0..=segs {
        let v = row as f32 / segs as f32;
        let z = (0.5 - v) * depth;

        for col in 0..=segs {
            let u = col as f32 / segs as f32;
            let x = (u - 0.5) * width;

            data.vertices.push([x, 0.0, z]);
            data.normals.push([0.0, 1.0, 0.0]);
        }
    }

    for row in 0..segs {
        for col in 0..segs {
            let i = row * (segs + 1) + col;
            let next_row = i + segs + 1;

            // counter-clockwise seen from above
            data.indices.extend_from_slice(&[i, next_row, i + 1]);
            data.indices.extend_from_slice(&[next_row, next_row + 1, i + 1]);
        }
    }

    data
}

/// Generate an axis-aligned cube with edge length `size`
pub fn generate_box(size: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let h = size * 0.5;

    // (normal, tangent u, tangent v) per face
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];

    for (normal, u, v) in faces.iter() {
        let base = data.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            data.vertices.push([
                (normal[0] + u[0] * su + v[0] * sv) * h,
                (normal[1] + u[1] * su + v[1] * sv) * h,
                (normal[2] + u[2] * su + v[2] * sv) * h,
            ]);
            data.normals.push(*normal);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(3.0, 8, 6);
        assert_eq!(sphere.vertex_count(), 9 * 7);
        assert_eq!(sphere.triangle_count(), 8 * 6 * 2);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());

        let max_y = sphere
            .vertices
            .iter()
            .map(|v| v[1])
            .fold(f32::MIN, f32::max);
        assert!((max_y - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_ground_generation() {
        let ground = generate_ground(6.0, 6.0, 2);
        assert_eq!(ground.vertex_count(), 9); // 3x3 grid
        assert_eq!(ground.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
        assert!(ground.vertices.iter().all(|v| v[1] == 0.0));
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box(2.0);
        assert_eq!(cube.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube
            .vertices
            .iter()
            .all(|v| v.iter().all(|c| (c.abs() - 1.0).abs() < 1e-6)));
    }
}
