//! Quadrupole magnets

use crate::geometry::ThreeVector;
use super::{MagneticField, transverse_basis};

/// A quadrupole of finite length, centred on `centre` and aligned with
/// `axis`. In the magnet frame, with transverse coordinates (x', y'),
/// the field is `(G y', G x', 0)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadrupoleField {
    centre: ThreeVector,
    axis: ThreeVector,
    u: ThreeVector,
    v: ThreeVector,
    gradient: f64,
    length: f64,
}

impl QuadrupoleField {
    /// Creates a quadrupole with the given gradient (T/cm) and length
    /// (cm). The magnet frame is rotated about the axis by `rotation`
    /// (rad), so that a rotation of π/4 gives a skew quadrupole.
    pub fn new(centre: ThreeVector, axis: ThreeVector, rotation: f64, gradient: f64, length: f64) -> Self {
        let axis = axis.normalize();
        let (u, _) = transverse_basis(axis);
        let u = u.rotate_around(axis, rotation);
        let v = axis.cross(u);
        QuadrupoleField {centre, axis, u, v, gradient, length}
    }

    /// Does the magnet act at `r`?
    pub fn contains(&self, r: ThreeVector) -> bool {
        ((r - self.centre) * self.axis).abs() <= 0.5 * self.length
    }
}

impl MagneticField for QuadrupoleField {
    fn field_at(&self, r: ThreeVector, _s: f64) -> ThreeVector {
        if !self.contains(r) {
            return ThreeVector::zero();
        }
        let d = r - self.centre;
        let (x, y) = (d * self.u, d * self.v);
        self.gradient * (y * self.u + x * self.v)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts;
    use super::*;

    #[test]
    fn normal_quadrupole() {
        let quad = QuadrupoleField::new(ThreeVector::zero(), [0.0, 0.0, 1.0].into(), 0.0, 2.0, 10.0);
        let b = quad.field_at(ThreeVector::new(0.5, 0.0, 1.0), 0.0);
        println!("b = {:?}", b);
        assert!((b - ThreeVector::new(0.0, 1.0, 0.0)).norm() < 1.0e-12);
        let b = quad.field_at(ThreeVector::new(0.0, -0.25, -4.0), 0.0);
        assert!((b - ThreeVector::new(-0.5, 0.0, 0.0)).norm() < 1.0e-12);
        // outside the magnet
        assert_eq!(quad.field_at(ThreeVector::new(0.5, 0.0, 6.0), 0.0), ThreeVector::zero());
    }

    #[test]
    fn skew_quadrupole() {
        // rotating by pi/4 exchanges the normal and skew components
        let quad = QuadrupoleField::new(ThreeVector::zero(), [0.0, 0.0, 1.0].into(), consts::FRAC_PI_4, 1.0, 10.0);
        let b = quad.field_at(ThreeVector::new(1.0, 0.0, 0.0), 0.0);
        println!("b = {:?}", b);
        assert!((b - ThreeVector::new(-1.0, 0.0, 0.0)).norm() < 1.0e-12);
    }
}
