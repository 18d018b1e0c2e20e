use std::ops::{Add, Mul};

/// Vec3 is a plain three-component vector used for positions, Euler
/// rotations and bounding-volume extents.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Vec3 {
        Vec3 { x, y, z }
    }

    pub fn zero() -> Vec3 {
        Vec3::default()
    }

    /// scale returns the vector with every component multiplied by s.
    pub fn scale(self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    /// approach moves every component a fixed fraction of the way towards
    /// the target (first-order low-pass filter, not a hard snap).
    pub fn approach(&mut self, target: Vec3, factor: f64) {
        self.x += (target.x - self.x) * factor;
        self.y += (target.y - self.y) * factor;
        self.z += (target.z - self.z) * factor;
    }

    /// abs_diff_sum returns the Manhattan distance to the other vector.
    pub fn abs_diff_sum(&self, other: Vec3) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Vec3 {
        self.scale(rhs)
    }
}

/// Aabb is an axis-aligned bounding box described by a center point and
/// half extents per axis.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Aabb {
        Aabb {
            center,
            half_extents,
        }
    }

    /// intersects tests the two boxes for overlap on all three axes.
    pub fn intersects(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() <= self.half_extents.x + other.half_extents.x
            && (self.center.y - other.center.y).abs() <= self.half_extents.y + other.half_extents.y
            && (self.center.z - other.center.z).abs() <= self.half_extents.z + other.half_extents.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn approach_converges_monotonically() {
        let mut v = Vec3::new(2.0, 1.0, 5.0);
        let target = Vec3::new(0.0, 0.3, 5.0);
        let mut prev = v.abs_diff_sum(target);

        for _ in 0..200 {
            v.approach(target, 0.1);
            let cur = v.abs_diff_sum(target);
            assert!(cur <= prev);
            prev = cur;
        }

        assert!(prev < 0.01);
    }

    #[test]
    fn abs_diff_sum_is_manhattan() {
        let a = Vec3::new(1.0, -2.0, 3.0);
        let b = Vec3::new(0.0, 0.0, 0.0);
        assert_relative_eq!(a.abs_diff_sum(b), 6.0);
    }

    #[test]
    fn aabb_overlap_and_separation() {
        let a = Aabb::new(Vec3::zero(), Vec3::new(0.5, 0.5, 0.5));
        let b = Aabb::new(Vec3::new(0.9, 0.0, 0.0), Vec3::new(0.5, 0.5, 0.5));
        let c = Aabb::new(Vec3::new(2.1, 0.0, 0.0), Vec3::new(0.5, 0.5, 0.5));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
