//! Spherical coordinates around a pivot.

use glam::Vec3;

/// Camera offset from its pivot as (radius, polar angle, azimuth).
///
/// `phi` is measured from the +Y axis, `theta` around Y starting at +Z.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn new(radius: f32, phi: f32, theta: f32) -> Self {
        Self { radius, phi, theta }
    }

    /// Spherical form of a pivot-relative offset.
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return Self::default();
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    /// Pivot-relative offset.
    pub fn to_offset(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }

    /// Move each component `factor` of the way toward `target`.
    pub fn step_toward(&mut self, target: &Spherical, factor: f32) {
        self.radius += (target.radius - self.radius) * factor;
        self.phi += (target.phi - self.phi) * factor;
        self.theta += (target.theta - self.theta) * factor;
    }

    /// Clamp polar angle and radius into the given ranges. Never panics: a
    /// NaN bound is ignored and an inverted range yields its upper bound.
    pub fn clamp(&mut self, polar: (f32, f32), distance: (f32, f32)) {
        self.phi = self.phi.max(polar.0).min(polar.1);
        self.radius = self.radius.max(distance.0).min(distance.1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_offset_roundtrip() {
        let offset = Vec3::new(3.0, 4.0, -2.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert_relative_eq!(back.x, offset.x, epsilon = 1e-4);
        assert_relative_eq!(back.y, offset.y, epsilon = 1e-4);
        assert_relative_eq!(back.z, offset.z, epsilon = 1e-4);
    }

    #[test]
    fn test_on_positive_z() {
        let s = Spherical::from_offset(Vec3::new(0.0, 0.0, 10.0));
        assert_relative_eq!(s.radius, 10.0);
        assert_relative_eq!(s.phi, FRAC_PI_2);
        assert_relative_eq!(s.theta, 0.0);
    }

    #[test]
    fn test_step_toward_is_linear() {
        let mut current = Spherical::new(10.0, 1.0, 0.0);
        let target = Spherical::new(20.0, 0.5, 2.0);
        current.step_toward(&target, 0.25);
        assert_relative_eq!(current.radius, 12.5);
        assert_relative_eq!(current.phi, 0.875);
        assert_relative_eq!(current.theta, 0.5);
    }

    #[test]
    fn test_clamp_tolerates_bad_ranges() {
        let mut s = Spherical::new(5.0, 1.5, 0.0);
        s.clamp((f32::NAN, 1.0), (f32::NAN, 100.0));
        assert_relative_eq!(s.phi, 1.0);
        assert_relative_eq!(s.radius, 5.0);

        s.clamp((2.0, 1.0), (10.0, 1.0));
        assert_relative_eq!(s.phi, 1.0);
        assert_relative_eq!(s.radius, 1.0);
    }

    #[test]
    fn test_zero_offset() {
        assert_eq!(Spherical::from_offset(Vec3::ZERO), Spherical::default());
    }
}
