//! Small vector helpers for viewer-frame geometry.
//!
//! All positions are expressed in the viewer frame: `+z` points forward out of
//! the participant's eyes, `+y` up and `+x` to the right. The trial plane is the
//! plane `z = depth` in that frame.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: Vec2) -> f64 {
        Vec2::new(self.x - other.x, self.y - other.y).length()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const FORWARD: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    pub fn sub(&self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(&self, k: f64) -> Vec3 {
        Vec3::new(self.x * k, self.y * k, self.z * k)
    }

    /// Returns `None` for a zero-length vector.
    pub fn normalized(&self) -> Option<Vec3> {
        let len = self.length();
        (len > f64::EPSILON).then(|| self.scale(1.0 / len))
    }

    /// Unsigned angle between two directions in degrees.
    pub fn angle_degrees(&self, other: Vec3) -> f64 {
        let denom = self.length() * other.length();
        if denom <= f64::EPSILON {
            return 0.0;
        }
        let cos = (self.dot(other) / denom).clamp(-1.0, 1.0);
        cos.acos().to_degrees()
    }
}

/// A ray in the viewer frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray from the viewer's eyes along `direction`.
    pub const fn from_eyes(direction: Vec3) -> Self {
        Self::new(Vec3::ZERO, direction)
    }

    /// Intersects the ray with the plane `z = depth` and returns the hit point
    /// in plane coordinates. Rays parallel to or pointing away from the plane
    /// miss.
    pub fn intersect_plane(&self, depth: f64) -> Option<Vec2> {
        if self.direction.z <= f64::EPSILON {
            return None;
        }
        let t = (depth - self.origin.z) / self.direction.z;
        if t < 0.0 {
            return None;
        }
        Some(Vec2::new(
            self.origin.x + t * self.direction.x,
            self.origin.y + t * self.direction.y,
        ))
    }
}

/// Position and facing of a tracked body (head or hand).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::FORWARD,
        }
    }
}

impl Pose {
    pub fn ray(&self) -> Ray {
        Ray::new(self.position, self.forward)
    }
}

/// Rotates `v` counter-clockwise by `degrees`.
pub fn rotate_2d(v: Vec2, degrees: f64) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Linear offset on a plane at `depth` subtending `degrees` of visual angle
/// from the line of sight.
pub fn visual_angle_to_distance(degrees: f64, depth: f64) -> f64 {
    degrees.to_radians().tan() * depth
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn rotate_quarter_turn() {
        let r = rotate_2d(Vec2::new(0.0, 1.0), 90.0);
        assert!((r.x + 1.0).abs() < EPS);
        assert!(r.y.abs() < EPS);
    }

    #[test]
    fn visual_angle_at_45_degrees_equals_depth() {
        assert!((visual_angle_to_distance(45.0, 2.0) - 2.0).abs() < 1e-9);
        assert_eq!(visual_angle_to_distance(0.0, 2.0), 0.0);
    }

    #[test]
    fn ray_hits_plane_in_front() {
        let ray = Ray::from_eyes(Vec3::new(0.1, 0.0, 1.0));
        let hit = ray.intersect_plane(2.0).unwrap();
        assert!((hit.x - 0.2).abs() < EPS);
        assert!(hit.y.abs() < EPS);
    }

    #[test]
    fn ray_pointing_backwards_misses() {
        let ray = Ray::from_eyes(Vec3::new(0.0, 0.0, -1.0));
        assert!(ray.intersect_plane(2.0).is_none());

        let sideways = Ray::from_eyes(Vec3::new(1.0, 0.0, 0.0));
        assert!(sideways.intersect_plane(2.0).is_none());
    }

    #[test]
    fn ray_origin_behind_plane_offsets_hit() {
        let ray = Ray::new(Vec3::new(0.2, -0.3, 0.5), Vec3::FORWARD);
        let hit = ray.intersect_plane(2.0).unwrap();
        assert!((hit.x - 0.2).abs() < EPS);
        assert!((hit.y + 0.3).abs() < EPS);
    }

    #[test]
    fn angle_between_orthogonal_vectors() {
        let a = Vec3::FORWARD.angle_degrees(Vec3::new(1.0, 0.0, 0.0));
        assert!((a - 90.0).abs() < 1e-9);
        assert_eq!(Vec3::ZERO.normalized(), None);
    }
}
