//! Fields specified component by component

use std::f64::consts;

use crate::distribution::Distribution2D;
use crate::geometry::ThreeVector;
use crate::interpolation::Edge;
use super::MagneticField;

/// How a single Cartesian component of the field varies
#[derive(Clone, Debug)]
pub enum AxisProfile {
    /// Identically zero
    Zero,
    /// The same everywhere, in T
    Constant(f64),
    /// Fourier series in the path length `s`, as for an undulator or
    /// wiggler:
    /// `offset + Σ_n [sin_n sin(n k s + phase) + cos_n cos(n k s + phase)]`,
    /// where `k = 2π / period` and `n` starts at 1.
    Periodic {
        period: f64,
        phase: f64,
        offset: f64,
        sin: Vec<f64>,
        cos: Vec<f64>,
    },
    /// Tabulated against the path length
    AlongBeam(Distribution2D),
    /// Tabulated against the distance from `origin`, projected on to
    /// the unit vector `direction`
    AlongDirection {
        origin: ThreeVector,
        direction: ThreeVector,
        table: Distribution2D,
    },
}

impl AxisProfile {
    /// Value of the field component at `r`, path length `s`.
    /// Tables are clamped at their ends.
    pub fn value(&self, r: ThreeVector, s: f64) -> f64 {
        match self {
            AxisProfile::Zero => 0.0,
            AxisProfile::Constant(b) => *b,
            AxisProfile::Periodic { period, phase, offset, sin, cos } => {
                let arg = 2.0 * consts::PI * s / period;
                let harmonics = sin.len().max(cos.len());
                (0..harmonics)
                    .map(|i| {
                        let n = (i + 1) as f64;
                        let theta = n * arg + phase;
                        sin.get(i).unwrap_or(&0.0) * theta.sin() + cos.get(i).unwrap_or(&0.0) * theta.cos()
                    })
                    .sum::<f64>() + offset
            },
            AxisProfile::AlongBeam(table) => table.value_at(s, Edge::Clamp),
            AxisProfile::AlongDirection { origin, direction, table } => {
                let d = (r - *origin) * (*direction);
                table.value_at(d, Edge::Clamp)
            },
        }
    }
}

impl Default for AxisProfile {
    fn default() -> Self {
        AxisProfile::Zero
    }
}

/// A field whose x, y and z components are generated independently
#[derive(Clone, Debug, Default)]
pub struct CompositeField {
    components: [AxisProfile; 3],
}

impl CompositeField {
    pub fn new(x: AxisProfile, y: AxisProfile, z: AxisProfile) -> Self {
        CompositeField {
            components: [x, y, z],
        }
    }

    pub fn component(&self, axis: usize) -> &AxisProfile {
        &self.components[axis]
    }
}

impl MagneticField for CompositeField {
    fn field_at(&self, r: ThreeVector, s: f64) -> ThreeVector {
        ThreeVector::new(
            self.components[0].value(r, s),
            self.components[1].value(r, s),
            self.components[2].value(r, s),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undulator_profile() {
        let profile = AxisProfile::Periodic {
            period: 4.0,
            phase: 0.0,
            offset: 0.1,
            sin: vec![1.0],
            cos: vec![0.0, 0.5],
        };
        let r = ThreeVector::zero();
        // s = 1: quarter period
        let b = profile.value(r, 1.0);
        println!("b(s = 1) = {:.6}", b);
        assert!((b - (0.1 + 1.0 - 0.5)).abs() < 1.0e-12);
        // one full period later, the same
        assert!((profile.value(r, 5.0) - b).abs() < 1.0e-12);
    }

    #[test]
    fn tabulated_profiles() {
        let table = Distribution2D::from_pairs("by", vec![0.0, 10.0, 20.0], vec![0.0, 1.0, 0.0]).unwrap();
        let along_beam = AxisProfile::AlongBeam(table.clone());
        let along_x = AxisProfile::AlongDirection {
            origin: ThreeVector::new(-5.0, 0.0, 0.0),
            direction: ThreeVector::new(1.0, 0.0, 0.0),
            table,
        };

        let field = CompositeField::new(AxisProfile::Zero, along_beam, along_x);
        let b = field.field_at(ThreeVector::new(10.0, 3.0, 0.0), 5.0);
        println!("b = {:?}", b);
        assert!((b - ThreeVector::new(0.0, 0.5, 0.5)).norm() < 1.0e-12);

        // clamped beyond the table
        let b = field.field_at(ThreeVector::new(100.0, 0.0, 0.0), -3.0);
        assert_eq!(b, ThreeVector::zero());
        assert_eq!(field.component(2).value(ThreeVector::new(2.5, 0.0, 0.0), 0.0), 0.75);
    }
}
