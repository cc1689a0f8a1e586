//! Particle field rendering
//!
//! Draws the animator's instance buffer as translucent spheres through an
//! egui paint callback, or a static gradient when the mount is static.

mod camera;
mod mesh;
#[cfg(feature = "gui")]
mod gradient;
#[cfg(feature = "gui")]
mod renderer;

pub use camera::{FieldCamera, SurfacePreferences};
pub use mesh::{particle_sphere, sphere_mesh, MeshVertex, SphereMesh, SPHERE_RADIUS, SPHERE_SEGMENTS};
#[cfg(feature = "gui")]
pub use gradient::{grid_lines, paint_bottom_fade, paint_grid, paint_static_panel, GRID_COLOR, GRID_SPACING};
#[cfg(feature = "gui")]
pub use renderer::{FieldCallback, FieldRenderer, FieldUniforms, PARTICLE_TINT};
