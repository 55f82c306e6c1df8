//! Orbit camera and screen-space rays
//!
//! Mirrors the host renderer's perspective camera so picking can happen in
//! the simulation without asking the renderer.

use glam::{Mat4, Vec2, Vec3};

use crate::consts::*;

/// Canvas size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Pixel coordinates (origin top-left) to normalized device coordinates
    pub fn to_ndc(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            (screen.x / self.width) * 2.0 - 1.0,
            -(screen.y / self.height) * 2.0 + 1.0,
        )
    }

    /// Normalized device coordinates back to pixels
    pub fn to_screen(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// A world-space ray with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Perspective camera orbiting the arena center
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    view_proj: Mat4,
    inv_view_proj: Mat4,
}

impl Camera {
    /// Camera on its orbit at `angle` radians
    pub fn orbit(angle: f32, aspect: f32) -> Self {
        let eye = Vec3::new(
            angle.sin() * CAMERA_RADIUS,
            CAMERA_HEIGHT,
            angle.cos() * CAMERA_RADIUS,
        );
        Self::look_at(eye, Vec3::ZERO, aspect)
    }

    pub fn look_at(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh_gl(
            CAMERA_FOV_Y_DEGREES.to_radians(),
            aspect,
            CAMERA_NEAR,
            CAMERA_FAR,
        );
        let view_proj = proj * view;
        Self {
            eye,
            target,
            view_proj,
            inv_view_proj: view_proj.inverse(),
        }
    }

    /// Ray from the eye through a point in normalized device coordinates
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let on_frustum = self.inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray {
            origin: self.eye,
            dir: (on_frustum - self.eye).normalize_or_zero(),
        }
    }

    /// Project a world point to normalized device coordinates (None if behind the eye)
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_proj * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndc_corners() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.to_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
        assert_eq!(vp.to_ndc(Vec2::new(400.0, 300.0)), Vec2::ZERO);
        let back = vp.to_screen(vp.to_ndc(Vec2::new(123.0, 456.0)));
        assert!((back - Vec2::new(123.0, 456.0)).length() < 1e-3);
    }

    #[test]
    fn test_center_ray_hits_origin() {
        let cam = Camera::orbit(0.0, 16.0 / 9.0);
        assert!((cam.eye - Vec3::new(0.0, 5.0, 10.0)).length() < 1e-5);
        let ray = cam.ray_through(Vec2::ZERO);
        let to_origin = (-cam.eye).normalize();
        assert!(ray.dir.dot(to_origin) > 0.9999);
    }

    #[test]
    fn test_project_then_ray_roundtrip() {
        let cam = Camera::orbit(1.3, 4.0 / 3.0);
        let world = Vec3::new(2.0, 0.5, -3.0);
        let ndc = cam.project(world).unwrap();
        let ray = cam.ray_through(ndc);
        let t = (world - ray.origin).dot(ray.dir);
        assert!((ray.at(t) - world).length() < 1e-3);
    }

    #[test]
    fn test_behind_camera_not_projected() {
        let cam = Camera::orbit(0.0, 1.0);
        assert!(cam.project(Vec3::new(0.0, 5.0, 20.0)).is_none());
    }

    #[test]
    fn test_degenerate_viewport_clamped() {
        let vp = Viewport::new(0.0, -5.0);
        assert_eq!(vp.width, 1.0);
        assert_eq!(vp.height, 1.0);
    }
}
