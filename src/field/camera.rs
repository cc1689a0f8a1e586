//! Fixed perspective camera and surface preferences for the background

use glam::{Mat4, Vec3};

/// Perspective camera looking at the origin down -Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldCamera {
    pub position: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FieldCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 20.0),
            fov_y: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl FieldCamera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    /// Combined view-projection for a viewport of the given aspect ratio
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(self.fov_y.to_radians(), aspect, self.near, self.far) * self.view()
    }
}

/// Rendering-surface preferences requested from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfacePreferences {
    pub antialias: bool,
    pub high_performance: bool,
    pub transparent: bool,
}

impl Default for SurfacePreferences {
    fn default() -> Self {
        Self {
            antialias: false,
            high_performance: true,
            transparent: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_origin_projects_to_center() {
        let camera = FieldCamera::default();
        let clip = camera.view_proj(16.0 / 9.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_points_behind_camera_are_clipped() {
        let camera = FieldCamera::default();
        let clip = camera.view_proj(1.0) * Vec4::new(0.0, 0.0, 30.0, 1.0);
        assert!(clip.w < 0.0);
    }

    #[test]
    fn test_degenerate_aspect_falls_back() {
        let camera = FieldCamera::default();
        assert_eq!(camera.view_proj(0.0), camera.view_proj(1.0));
        assert_eq!(camera.view_proj(f32::NAN), camera.view_proj(1.0));
    }
}
