//! UV sphere geometry shared by every particle instance

use bytemuck::{Pod, Zeroable};
use std::f32::consts::PI;

/// Particle sphere radius in world units
pub const SPHERE_RADIUS: f32 = 0.05;
/// Longitude and latitude segments of the particle sphere
pub const SPHERE_SEGMENTS: u32 = 8;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
}

#[derive(Clone, Debug)]
pub struct SphereMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

/// Build a UV sphere. Degenerate triangles at the poles are skipped.
pub fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> SphereMesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let mut vertices = Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * PI;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * 2.0 * PI;
            vertices.push(MeshVertex {
                position: [
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                ],
            });
        }
    }

    let row = width_segments + 1;
    let mut indices = Vec::new();
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = (iy * row + ix + 1) as u16;
            let b = (iy * row + ix) as u16;
            let c = ((iy + 1) * row + ix) as u16;
            let d = ((iy + 1) * row + ix + 1) as u16;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    SphereMesh { vertices, indices }
}

/// The sphere every particle is drawn with
pub fn particle_sphere() -> SphereMesh {
    sphere_mesh(SPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS)
}
