//! Procedural primitive meshes
//!
//! All meshes are centred on the origin and wound counter-clockwise when seen
//! from outside.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::geometry::{connect_rings, create_ring, Mesh, Vertex};

/// Tapered cylinder along y; a zero radius gives a cone
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: usize) -> Mesh {
    let segments = radial_segments.max(3);
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;

    let mut mesh = Mesh::new();
    let upper = mesh.add_vertices(create_ring(half, radius_top, segments, slope));
    let lower = mesh.add_vertices(create_ring(-half, radius_bottom, segments, slope));
    connect_rings(&mut mesh, upper, lower, segments);

    if radius_top > 0.0 {
        add_cap(&mut mesh, half, radius_top, segments, Vec3::Y);
    }
    if radius_bottom > 0.0 {
        add_cap(&mut mesh, -half, radius_bottom, segments, Vec3::NEG_Y);
    }

    mesh
}

fn add_cap(mesh: &mut Mesh, y: f32, radius: f32, segments: usize, normal: Vec3) {
    let center = mesh.add_vertices([Vertex::new(Vec3::new(0.0, y, 0.0), normal)]);
    let ring = mesh.add_vertices(
        create_ring(y, radius, segments, 0.0)
            .into_iter()
            .map(|v| Vertex::new(v.position, normal)),
    );

    for i in 0..segments as u32 {
        if normal.y > 0.0 {
            mesh.add_triangle(center, ring + i, ring + i + 1);
        } else {
            mesh.add_triangle(center, ring + i + 1, ring + i);
        }
    }
}

/// Latitude/longitude sphere
pub fn uv_sphere(radius: f32, width_segments: usize, height_segments: usize) -> Mesh {
    let width = width_segments.max(3);
    let height = height_segments.max(2);

    let mut mesh = Mesh::new();
    let mut rows = Vec::with_capacity(height + 1);

    for row in 0..=height {
        let theta = row as f32 / height as f32 * PI;
        let (sin_t, cos_t) = theta.sin_cos();

        let start = mesh.add_vertices((0..=width).map(|i| {
            let phi = i as f32 / width as f32 * TAU;
            let (sin_p, cos_p) = phi.sin_cos();
            let normal = Vec3::new(sin_t * sin_p, cos_t, sin_t * cos_p);
            Vertex::new(normal * radius, normal)
        }));
        rows.push(start);
    }

    for pair in rows.windows(2) {
        connect_rings(&mut mesh, pair[0], pair[1], width);
    }

    mesh
}

/// Flat-shaded regular octahedron with its vertices at `radius`
pub fn octahedron(radius: f32) -> Mesh {
    let mut mesh = Mesh::new();

    for sx in [1.0f32, -1.0] {
        for sy in [1.0f32, -1.0] {
            for sz in [1.0f32, -1.0] {
                let normal = Vec3::new(sx, sy, sz).normalize();
                let a = Vertex::new(Vec3::X * sx * radius, normal);
                let b = Vertex::new(Vec3::Y * sy * radius, normal);
                let c = Vertex::new(Vec3::Z * sz * radius, normal);

                // An odd number of mirrored axes flips the winding
                let start = if sx * sy * sz > 0.0 {
                    mesh.add_vertices([a, b, c])
                } else {
                    mesh.add_vertices([a, c, b])
                };
                mesh.add_triangle(start, start + 1, start + 2);
            }
        }
    }

    mesh
}

/// Torus in the xy plane
pub fn torus(radius: f32, tube: f32, radial_segments: usize, tubular_segments: usize) -> Mesh {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    let mut mesh = Mesh::new();

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        mesh.add_vertices((0..=tubular).map(|i| {
            let u = i as f32 / tubular as f32 * TAU;
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            Vertex::new(position, (position - center).normalize_or_zero())
        }));
    }

    let row = tubular as u32 + 1;
    for j in 1..=radial as u32 {
        for i in 1..=tubular as u32 {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;

            mesh.add_triangle(a, b, d);
            mesh.add_triangle(b, c, d);
        }
    }

    mesh
}

/// Rectangle in the xy plane facing +z
pub fn plane(width: f32, height: f32) -> Mesh {
    let (hw, hh) = (width * 0.5, height * 0.5);

    let mut mesh = Mesh::new();
    let start = mesh.add_vertices(
        [
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ]
        .map(|p| Vertex::new(p, Vec3::Z)),
    );
    mesh.add_quad(start, start + 1, start + 2, start + 3);

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(mesh: &Mesh, tri: usize) -> Vec3 {
        let idx = &mesh.indices[tri * 3..tri * 3 + 3];
        let [a, b, c] = [idx[0], idx[1], idx[2]].map(|i| mesh.vertices[i as usize].position);
        (b - a).cross(c - a)
    }

    fn assert_indices_valid(mesh: &Mesh) {
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn test_cylinder_shape() {
        let mesh = cylinder(0.4, 0.8, 2.5, 8);
        assert_indices_valid(&mesh);

        let ys: Vec<f32> = mesh.vertices.iter().map(|v| v.position.y).collect();
        assert!(ys.iter().all(|y| y.abs() <= 1.25 + 1e-5));
        // side + two caps
        assert_eq!(mesh.triangle_count(), 8 * 2 + 8 * 2);
    }

    #[test]
    fn test_needle_cone_faces_outward() {
        let mesh = cylinder(0.02, 0.12, 0.6, 4);
        assert_indices_valid(&mesh);

        for tri in 0..8 {
            let n = face_normal(&mesh, tri);
            let centroid = mesh.indices[tri * 3..tri * 3 + 3]
                .iter()
                .map(|&i| mesh.vertices[i as usize].position)
                .sum::<Vec3>()
                / 3.0;
            assert!(n.dot(Vec3::new(centroid.x, 0.0, centroid.z)) > 0.0);
        }
    }

    #[test]
    fn test_cone_without_top_cap() {
        let mesh = cylinder(0.0, 1.0, 1.0, 6);
        assert_eq!(mesh.triangle_count(), 6 * 2 + 6);
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let mesh = uv_sphere(1.0, 16, 16);
        assert_indices_valid(&mesh);
        assert_eq!(mesh.vertex_count(), 17 * 17);
        for v in &mesh.vertices {
            assert!((v.position.length() - 1.0).abs() < 1e-4);
            assert!((v.normal.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_octahedron_faces_outward() {
        let mesh = octahedron(0.3);
        assert_eq!(mesh.triangle_count(), 8);
        assert!((mesh.extent() - 0.3).abs() < 1e-6);

        for tri in 0..8 {
            let n = face_normal(&mesh, tri);
            let normal = mesh.vertices[mesh.indices[tri * 3] as usize].normal;
            assert!(n.dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_torus_extent() {
        let mesh = torus(0.3, 0.02, 16, 32);
        assert_indices_valid(&mesh);
        assert_eq!(mesh.triangle_count(), 16 * 32 * 2);
        assert!((mesh.extent() - 0.32).abs() < 1e-4);
        assert!(mesh.vertices.iter().all(|v| v.position.z.abs() <= 0.02 + 1e-6));
    }

    #[test]
    fn test_plane_faces_z() {
        let mesh = plane(100.0, 100.0);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(face_normal(&mesh, 0).z > 0.0);
        assert!(face_normal(&mesh, 1).z > 0.0);
    }
}
