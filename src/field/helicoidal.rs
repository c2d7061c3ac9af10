//! Helical undulator

use std::f64::consts;

use crate::geometry::ThreeVector;
use super::{MagneticField, transverse_basis};

/// A transverse field of constant magnitude whose direction rotates
/// about `axis` as a function of the distance along it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HelicoidalField {
    origin: ThreeVector,
    axis: ThreeVector,
    period: f64,
    amplitude: f64,
    phase: f64,
}

impl HelicoidalField {
    /// Creates a helical field with the given period (cm) and
    /// amplitude (T). At `origin`, the field points along the first
    /// vector of [`transverse_basis`] rotated by `phase`.
    pub fn new(origin: ThreeVector, axis: ThreeVector, period: f64, amplitude: f64, phase: f64) -> Self {
        HelicoidalField {
            origin,
            axis: axis.normalize(),
            period,
            amplitude,
            phase,
        }
    }
}

impl MagneticField for HelicoidalField {
    fn field_at(&self, r: ThreeVector, _s: f64) -> ThreeVector {
        let (u, v) = transverse_basis(self.axis);
        let d = (r - self.origin) * self.axis;
        let theta = 2.0 * consts::PI * d / self.period + self.phase;
        self.amplitude * (theta.cos() * u + theta.sin() * v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_about_axis() {
        let field = HelicoidalField::new(ThreeVector::zero(), [0.0, 0.0, 2.0].into(), 8.0, 0.5, 0.0);
        let b0 = field.field_at(ThreeVector::zero(), 0.0);
        let b1 = field.field_at(ThreeVector::new(3.0, -1.0, 2.0), 0.0);
        println!("b0 = {:?}, b1 = {:?}", b0, b1);
        assert!((b0 - ThreeVector::new(0.5, 0.0, 0.0)).norm() < 1.0e-12);
        // a quarter period on, transverse coordinates irrelevant
        assert!((b1 - ThreeVector::new(0.0, 0.5, 0.0)).norm() < 1.0e-12);
        for i in 0..16 {
            let b = field.field_at(ThreeVector::new(0.0, 0.0, i as f64), 0.0);
            assert!((b.norm() - 0.5).abs() < 1.0e-12);
            assert!(b[2].abs() < 1.0e-12);
        }
    }
}
