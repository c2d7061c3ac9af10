//! Defines a spatial 3-vector: (x, y, z)

use std::fmt;

/// A three-vector
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThreeVector {
    x: f64,
    y: f64,
    z: f64,
}

impl ThreeVector {
    /// Creates a new three-vector with the specified components.
    pub const fn new(x: f64, y: f64, z: f64) -> ThreeVector {
        ThreeVector {x, y, z}
    }

    pub const fn zero() -> ThreeVector {
        ThreeVector::new(0.0, 0.0, 0.0)
    }

    /// Returns the cross product of two three-vectors.
    pub fn cross(self, other: ThreeVector) -> ThreeVector {
        ThreeVector {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Returns the squared magnitude of the three-vector.
    pub fn norm_sqr(self) -> f64 {
        self * self
    }

    /// Returns the magnitude of the three-vector.
    pub fn norm(self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// Returns a new three-vector which has the same direction,
    /// but unit magnitude.
    ///
    /// # Panics
    /// If `self` does not have positive definite norm.
    pub fn normalize(self) -> Self {
        let mag = self.norm();
        assert!(mag > 0.0);
        self / mag
    }

    /// Like `normalize`, but returns `None` for a vector of zero
    /// (or non-finite) length.
    pub fn try_normalize(self) -> Option<Self> {
        let mag = self.norm();
        if mag > 0.0 && mag.is_finite() {
            Some(self / mag)
        } else {
            None
        }
    }

    /// Returns a unit vector that is orthogonal to `self`.
    /// The choice is arbitrary, but fixed for a given input.
    pub fn orthogonal(self) -> Self {
        let perp = if self.x.abs() > self.z.abs() {
            ThreeVector::new(-self.y, self.x, 0.0)
        } else {
            ThreeVector::new(0.0, -self.z, self.y)
        };
        perp.normalize()
    }

    /// Splits `self` into the components parallel and perpendicular
    /// to the unit vector `n`.
    pub fn decompose(self, n: ThreeVector) -> (ThreeVector, ThreeVector) {
        let parallel = (self * n) * n;
        (parallel, self - parallel)
    }

    /// Rotates `self` around the given `axis` by an angle `theta`,
    /// with positive angles corresponding to a right-handed rotation,
    /// and returns the result. The axis must be correctly normalized.
    pub fn rotate_around(self, axis: ThreeVector, theta: f64) -> Self {
        // Rodrigues: v cos + (k x v) sin + k (k.v) (1 - cos)
        let (s, c) = theta.sin_cos();
        c * self + s * axis.cross(self) + ((1.0 - c) * (axis * self)) * axis
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Index<usize> for ThreeVector {
    type Output = f64;
    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("index out of bounds: a three vector has 3 components but the index is {}", index)
        }
    }
}

impl fmt::Display for ThreeVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.9e}\t{:.9e}\t{:.9e}", self.x, self.y, self.z)
    }
}

impl std::ops::Add for ThreeVector {
    type Output = ThreeVector;
    fn add(self, other: ThreeVector) -> ThreeVector {
        ThreeVector {x: self.x + other.x, y: self.y + other.y, z: self.z + other.z}
    }
}

impl std::ops::Sub for ThreeVector {
    type Output = ThreeVector;
    fn sub(self, other: ThreeVector) -> ThreeVector {
        ThreeVector {x: self.x - other.x, y: self.y - other.y, z: self.z - other.z}
    }
}

/// Dot product
impl std::ops::Mul for ThreeVector {
    type Output = f64;
    fn mul(self, other: ThreeVector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl std::ops::Mul<f64> for ThreeVector {
    type Output = ThreeVector;
    fn mul(self, other: f64) -> ThreeVector {
        ThreeVector {x: self.x * other, y: self.y * other, z: self.z * other}
    }
}

impl std::ops::Mul<ThreeVector> for f64 {
    type Output = ThreeVector;
    fn mul(self, other: ThreeVector) -> ThreeVector {
        other * self
    }
}

impl std::ops::Neg for ThreeVector {
    type Output = ThreeVector;
    fn neg(self) -> ThreeVector {
        -1.0 * self
    }
}

impl std::ops::Div<f64> for ThreeVector {
    type Output = ThreeVector;
    fn div(self, other: f64) -> ThreeVector {
        ThreeVector {x: self.x / other, y: self.y / other, z: self.z / other}
    }
}

impl From<[f64; 3]> for ThreeVector {
    fn from(item: [f64; 3]) -> Self {
        ThreeVector::new(item[0], item[1], item[2])
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts;
    use rand::prelude::*;
    use rand_xoshiro::*;
    use super::*;

    #[test]
    fn orthogonality() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        for _i in 0..100 {
            let a = ThreeVector::new(rng.gen(), rng.gen(), rng.gen());
            let b = a.orthogonal();
            assert!((a * b).abs() < 1.0e-10);
            assert!((b.norm() - 1.0).abs() < 1.0e-12);
        }
    }

    #[test]
    fn rotation() {
        let v = ThreeVector::new(1.0, 0.0, 0.0); // along x
        let v = v.rotate_around(ThreeVector::new(0.0, 0.0, 1.0), consts::FRAC_PI_2); // along y
        let v = v.rotate_around(ThreeVector::new(1.0, 0.0, 0.0), consts::FRAC_PI_2); // along z
        println!("v = {:?}", v);
        let target = ThreeVector::new(0.0, 0.0, 1.0);
        assert!((v - target).norm() < 1.0e-10);
    }

    #[test]
    fn rotation_preserves_length() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let axis = ThreeVector::new(1.0, -2.0, 0.5).normalize();
        let mut v = ThreeVector::new(0.3, 0.4, 1.2);
        let length = v.norm();
        for _i in 0..10_000 {
            v = v.rotate_around(axis, rng.gen::<f64>() - 0.5);
        }
        let error = (v.norm() - length).abs() / length;
        println!("|v| = {:.15e}, initially {:.15e}, error = {:.3e}", v.norm(), length, error);
        assert!(error < 1.0e-12);
    }

    #[test]
    fn decomposition() {
        let b = ThreeVector::new(0.2, 1.0, -0.7);
        let n = ThreeVector::new(1.0, 1.0, 0.0).normalize();
        let (par, perp) = b.decompose(n);
        assert!((par + perp - b).norm() < 1.0e-15);
        assert!((perp * n).abs() < 1.0e-15);
        assert!(ThreeVector::zero().try_normalize().is_none());
    }
}
