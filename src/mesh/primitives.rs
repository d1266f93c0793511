//! Unit primitive meshes shared by every instanced draw
//!
//! Sizes match what [`Shape`] documents; per-instance scale does the rest.

use std::f32::consts::{PI, TAU};
use crate::math::Vec3;
use crate::ornaments::Shape;
use super::{Mesh, Vertex};

const SPHERE_SEGMENTS: usize = 24;
const SPHERE_RINGS: usize = 16;
const ROUND_SEGMENTS: usize = 24;
const TORUS_TUBULAR: usize = 32;
const TORUS_RADIAL: usize = 12;

/// Tube radius of [`Shape::Torus`]
pub const TORUS_TUBE: f32 = 0.3;
/// Tube radius of [`Shape::Ring`]
pub const RING_TUBE: f32 = 0.06;

pub fn primitive(shape: Shape) -> Mesh {
    match shape {
        Shape::Sphere => sphere(SPHERE_SEGMENTS, SPHERE_RINGS),
        Shape::Box => cuboid(),
        Shape::Cylinder => cylinder(ROUND_SEGMENTS, 1.0),
        Shape::Cone => cylinder(ROUND_SEGMENTS, 0.0),
        Shape::Torus => torus(TORUS_TUBE, TORUS_TUBULAR, TORUS_RADIAL),
        Shape::Ring => torus(RING_TUBE, TORUS_TUBULAR, TORUS_RADIAL / 2),
    }
}

/// Radius 1 UV sphere
pub fn sphere(segments: usize, rings: usize) -> Mesh {
    let mut mesh = Mesh::new();
    let row = segments as u32 + 1;

    for iy in 0..=rings {
        let v = iy as f32 / rings as f32;
        let phi = v * PI;
        for ix in 0..=segments {
            let u = ix as f32 / segments as f32;
            let theta = u * TAU;
            let p = Vec3::new(-theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());
            mesh.add_vertices([Vertex::new(p, p).with_uv(u, 1.0 - v)]);
        }
    }

    for iy in 0..rings as u32 {
        for ix in 0..segments as u32 {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.add_triangle(a, b, d);
            }
            if iy != rings as u32 - 1 {
                mesh.add_triangle(b, c, d);
            }
        }
    }

    mesh
}

/// Side 1 box centred on the origin
pub fn cuboid() -> Mesh {
    let x = Vec3::RIGHT;
    let y = Vec3::UP;
    let z = Vec3::FORWARD;
    // (normal, u, v) with u x v = normal
    let faces = [
        (x, -z, y),
        (-x, z, y),
        (y, x, -z),
        (-y, x, z),
        (z, x, y),
        (-z, -x, y),
    ];

    let mut mesh = Mesh::new();
    for (n, u, v) in faces {
        let c = n.scale(0.5);
        let hu = u.scale(0.5);
        let hv = v.scale(0.5);
        let start = mesh.add_vertices([
            Vertex::new(c - hu - hv, n).with_uv(0.0, 0.0),
            Vertex::new(c + hu - hv, n).with_uv(1.0, 0.0),
            Vertex::new(c + hu + hv, n).with_uv(1.0, 1.0),
            Vertex::new(c - hu + hv, n).with_uv(0.0, 1.0),
        ]);
        mesh.add_quad(start, start + 1, start + 2, start + 3);
    }
    mesh
}

/// Height 1 frustum centred on the origin with bottom radius 1.
/// A zero `top_radius` gives a cone.
pub fn cylinder(segments: usize, top_radius: f32) -> Mesh {
    let mut mesh = Mesh::new();
    let bottom_radius = 1.0;
    let slope = bottom_radius - top_radius;

    // Side wall: top row then bottom row
    let mut rows = [0u32; 2];
    for (r, (y, radius)) in [(0.5, top_radius), (-0.5, bottom_radius)].into_iter().enumerate() {
        rows[r] = mesh.vertices.len() as u32;
        for i in 0..=segments {
            let u = i as f32 / segments as f32;
            let theta = u * TAU;
            let (s, c) = theta.sin_cos();
            let normal = Vec3::new(s, slope, c).normalize();
            mesh.add_vertices([Vertex::new(Vec3::new(s * radius, y, c * radius), normal).with_uv(u, 1.0 - r as f32)]);
        }
    }
    for i in 0..segments as u32 {
        let a = rows[0] + i;
        let b = rows[1] + i;
        let c = rows[1] + i + 1;
        let d = rows[0] + i + 1;
        if top_radius > 0.0 {
            mesh.add_triangle(a, b, d);
        }
        mesh.add_triangle(b, c, d);
    }

    if top_radius > 0.0 {
        add_cap(&mut mesh, segments, 0.5, top_radius);
    }
    add_cap(&mut mesh, segments, -0.5, bottom_radius);

    mesh
}

fn add_cap(mesh: &mut Mesh, segments: usize, y: f32, radius: f32) {
    let normal = Vec3::new(0.0, y.signum(), 0.0);
    let center = mesh.add_vertices([Vertex::new(Vec3::new(0.0, y, 0.0), normal).with_uv(0.5, 0.5)]);
    let rim = mesh.add_vertices((0..=segments).map(|i| {
        let theta = i as f32 / segments as f32 * TAU;
        let (s, c) = theta.sin_cos();
        Vertex::new(Vec3::new(s * radius, y, c * radius), normal).with_uv(s * 0.5 + 0.5, c * 0.5 + 0.5)
    }));
    for i in 0..segments as u32 {
        if y > 0.0 {
            mesh.add_triangle(center, rim + i, rim + i + 1);
        } else {
            mesh.add_triangle(center, rim + i + 1, rim + i);
        }
    }
}

/// Major radius 1 torus lying in the XY plane
pub fn torus(tube: f32, tubular: usize, radial: usize) -> Mesh {
    let mut mesh = Mesh::new();
    let row = tubular as u32 + 1;

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let ring_center = Vec3::new(u.cos(), u.sin(), 0.0);
            let p = Vec3::new(
                (1.0 + tube * v.cos()) * u.cos(),
                (1.0 + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let normal = (p - ring_center).normalize();
            mesh.add_vertices([Vertex::new(p, normal).with_uv(i as f32 / tubular as f32, j as f32 / radial as f32)]);
        }
    }

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

/// 1x1 quad in the XY plane facing +Z, UV origin bottom-left
pub fn quad() -> Mesh {
    let n = Vec3::FORWARD;
    let mut mesh = Mesh::new();
    mesh.add_vertices([
        Vertex::new(Vec3::new(-0.5, -0.5, 0.0), n).with_uv(0.0, 0.0),
        Vertex::new(Vec3::new(0.5, -0.5, 0.0), n).with_uv(1.0, 0.0),
        Vertex::new(Vec3::new(0.5, 0.5, 0.0), n).with_uv(1.0, 1.0),
        Vertex::new(Vec3::new(-0.5, 0.5, 0.0), n).with_uv(0.0, 1.0),
    ]);
    mesh.add_quad(0, 1, 2, 3);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every non-degenerate triangle of a convex mesh around the origin faces outward
    fn assert_outward(mesh: &Mesh) {
        for i in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle(i);
            let n = (b - a).cross(&(c - a));
            if n.length() < 1e-6 {
                continue;
            }
            let centroid = (a + b + c).scale(1.0 / 3.0);
            assert!(n.dot(&centroid) > 0.0, "triangle {} faces inward", i);
        }
    }

    #[test]
    fn test_sphere_is_unit() {
        let mesh = sphere(12, 8);
        assert_eq!(mesh.vertex_count(), 13 * 9);
        for v in &mesh.vertices {
            assert!((v.position.length() - 1.0).abs() < 1e-5);
            assert!((v.normal.length() - 1.0).abs() < 1e-5);
        }
        assert_outward(&mesh);
    }

    #[test]
    fn test_cuboid() {
        let mesh = cuboid();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        for v in &mesh.vertices {
            assert!(v.position.x.abs() <= 0.5 + 1e-6);
            assert!(v.position.y.abs() <= 0.5 + 1e-6);
            assert!(v.position.z.abs() <= 0.5 + 1e-6);
        }
        assert_outward(&mesh);
    }

    #[test]
    fn test_cylinder_and_cone() {
        let cyl = cylinder(16, 1.0);
        assert_outward(&cyl);
        for v in &cyl.vertices {
            assert!(v.position.y.abs() <= 0.5 + 1e-6);
            assert!(v.position.horizontal().length() <= 1.0 + 1e-5);
        }

        let cone = cylinder(16, 0.0);
        assert_outward(&cone);
        // No top cap on a cone
        assert!(cone.triangle_count() < cyl.triangle_count());
    }

    #[test]
    fn test_torus_tube_radius() {
        let mesh = torus(TORUS_TUBE, 16, 8);
        for v in &mesh.vertices {
            let p = v.position;
            let ring = Vec3::new(p.x, p.y, 0.0).normalize();
            assert!((p.distance(&ring) - TORUS_TUBE).abs() < 1e-4);
        }
        assert_eq!(mesh.triangle_count(), 16 * 8 * 2);
    }

    #[test]
    fn test_every_shape_has_a_mesh() {
        for shape in Shape::ALL {
            let mesh = primitive(shape);
            assert!(mesh.triangle_count() > 0, "{:?} is empty", shape);
            assert!(mesh.index_data().iter().all(|&i| (i as usize) < mesh.vertex_count()));
        }
    }

    #[test]
    fn test_quad_faces_forward() {
        let mesh = quad();
        let [a, b, c] = mesh.triangle(0);
        assert!((b - a).cross(&(c - a)).z > 0.0);
    }
}
