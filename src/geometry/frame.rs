//! Orthonormal frame attached to a point on the trajectory

use super::ThreeVector;

/// Local basis at a trajectory point: `z` is the direction of motion,
/// `x` lies in the bending plane and points towards the centre of
/// curvature, `y = z × x` is normal to the bending plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalFrame {
    pub x: ThreeVector,
    pub y: ThreeVector,
    pub z: ThreeVector,
}

impl LocalFrame {
    /// Constructs the frame from the (unit) direction of motion and
    /// the curvature vector `rho`. For straight sections, where `rho`
    /// carries no information, `x` is an arbitrary vector orthogonal
    /// to the direction.
    pub fn new(direction: ThreeVector, rho: ThreeVector, straight: bool) -> Self {
        let z = direction;
        let x = if straight {
            z.orthogonal()
        } else {
            let (_, perp) = rho.decompose(z);
            perp.try_normalize().unwrap_or_else(|| z.orthogonal())
        };
        let y = z.cross(x);
        LocalFrame {x, y, z}
    }

    /// Transforms a vector given in local coordinates to the lab frame.
    pub fn to_lab(&self, v: ThreeVector) -> ThreeVector {
        v[0] * self.x + v[1] * self.y + v[2] * self.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_handed() {
        let dir = ThreeVector::new(0.0, 0.0, 1.0);
        let rho = ThreeVector::new(-5.0, 0.0, 0.1);
        let frame = LocalFrame::new(dir, rho, false);
        println!("frame = {:?}", frame);
        assert!((frame.x - ThreeVector::new(-1.0, 0.0, 0.0)).norm() < 1.0e-12);
        assert!((frame.x.cross(frame.y) - frame.z).norm() < 1.0e-12);
        assert!((frame.to_lab([0.0, 0.0, 2.0].into()) - 2.0 * dir).norm() < 1.0e-12);
    }

    #[test]
    fn straight_section() {
        let dir = ThreeVector::new(1.0, 2.0, 2.0) / 3.0;
        let frame = LocalFrame::new(dir, ThreeVector::new(0.0, 0.0, 1.0e30), true);
        assert!((frame.x * dir).abs() < 1.0e-12);
        assert!((frame.y * dir).abs() < 1.0e-12);
        assert!((frame.y.norm() - 1.0).abs() < 1.0e-12);
    }
}
