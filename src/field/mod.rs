//! Representation of the magnetic field in a region

use enum_dispatch::enum_dispatch;
use crate::geometry::ThreeVector;

mod composite;
mod helicoidal;
mod quadrupole;

pub use self::composite::*;
pub use self::helicoidal::*;
pub use self::quadrupole::*;

/// Represents a static magnetic field.
#[enum_dispatch]
pub trait MagneticField {
    /// Returns the magnetic field, in T, at position `r` (in cm),
    /// where the particle has travelled a path length `s` (in cm)
    /// since the start of the region.
    fn field_at(&self, r: ThreeVector, s: f64) -> ThreeVector;
}

/// A field that is the same everywhere
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UniformField {
    b: ThreeVector,
}

impl UniformField {
    pub fn new(b: ThreeVector) -> Self {
        UniformField {b}
    }
}

impl MagneticField for UniformField {
    fn field_at(&self, _r: ThreeVector, _s: f64) -> ThreeVector {
        self.b
    }
}

/// The ways in which a region's magnetic field can be generated
#[enum_dispatch(MagneticField)]
#[derive(Clone, Debug)]
pub enum FieldSource {
    Uniform(UniformField),
    Composite(CompositeField),
    Helicoidal(HelicoidalField),
    Quadrupole(QuadrupoleField),
}

impl Default for FieldSource {
    fn default() -> Self {
        FieldSource::Uniform(UniformField::new(ThreeVector::zero()))
    }
}

/// Returns a pair of unit vectors that, together with `axis`, form a
/// right-handed basis. The first is horizontal (perpendicular to the
/// lab y axis) unless `axis` is itself vertical.
pub(crate) fn transverse_basis(axis: ThreeVector) -> (ThreeVector, ThreeVector) {
    let u = ThreeVector::new(0.0, 1.0, 0.0)
        .cross(axis)
        .try_normalize()
        .unwrap_or_else(|| axis.orthogonal());
    let v = axis.cross(u);
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch() {
        let fields: Vec<FieldSource> = vec![
            UniformField::new([0.0, 0.0, 1.0].into()).into(),
            FieldSource::default(),
        ];
        let r = ThreeVector::new(1.0, 2.0, 3.0);
        let b: Vec<ThreeVector> = fields.iter().map(|f| f.field_at(r, 0.0)).collect();
        println!("b = {:?}", b);
        assert_eq!(b[0], ThreeVector::new(0.0, 0.0, 1.0));
        assert_eq!(b[1].norm(), 0.0);
    }

    #[test]
    fn basis_is_right_handed() {
        for axis in [[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]].iter() {
            let axis = ThreeVector::from(*axis).normalize();
            let (u, v) = transverse_basis(axis);
            println!("axis = {:?}: u = {:?}, v = {:?}", axis, u, v);
            assert!((u.cross(v) - axis).norm() < 1.0e-12);
            assert!((u.norm() - 1.0).abs() < 1.0e-12);
        }
        let (u, v) = transverse_basis([0.0, 0.0, 1.0].into());
        assert!((u - ThreeVector::new(1.0, 0.0, 0.0)).norm() < 1.0e-12);
        assert!((v - ThreeVector::new(0.0, 1.0, 0.0)).norm() < 1.0e-12);
    }
}
