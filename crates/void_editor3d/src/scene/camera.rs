//! Perspective viewport camera.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3, Vec4};

const DEFAULT_UP: Vec3 = Vec3::Y;

/// A world-space ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Perspective camera looking at a target point.
#[derive(Debug, Clone)]
pub struct Camera3d {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport size in pixels
    pub viewport: Vec2,
}

pub type SharedCamera = Rc<RefCell<Camera3d>>;

impl Camera3d {
    pub fn new(position: Vec3, target: Vec3, fov_y_radians: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target,
            up: DEFAULT_UP,
            fov_y_radians,
            near,
            far,
            viewport: Vec2::new(1280.0, 720.0),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Camera-local right axis in world space.
    pub fn right(&self) -> Vec3 {
        let right = self.forward().cross(self.up);
        if right.length_squared() < f32::EPSILON {
            // Looking straight along the up axis
            Vec3::X
        } else {
            right.normalize()
        }
    }

    /// Camera-local up axis in world space.
    pub fn up_vector(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians, self.aspect_ratio().max(0.0001), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray from the camera through a viewport pixel.
    pub fn screen_ray(&self, screen: Vec2) -> Option<Ray> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }
        let ndc_x = (2.0 * screen.x / self.viewport.x) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen.y / self.viewport.y);
        let clip = Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let world = self.view_projection().inverse() * clip;
        if world.w.abs() < f32::EPSILON {
            return None;
        }
        let direction = (world.truncate() / world.w) - self.position;
        if direction.length_squared() < f32::EPSILON {
            return None;
        }
        Some(Ray::new(self.position, direction))
    }

    /// Viewport pixel of a world point, if it is in front of the camera.
    pub fn project_point(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }
}

impl Default for Camera3d {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO, 60f32.to_radians(), 0.1, 5000.0)
    }
}
