//! Step-by-step integration of the reference trajectory

use crate::constants::*;
use crate::field::MagneticField;
use crate::geometry::{ThreeVector, LocalFrame};
use super::{Region, BeamOptics};

/// A point on the reference trajectory, and the local quantities that
/// determine the radiation emitted there.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrajectoryPoint {
    /// Position, in cm
    pub position: ThreeVector,
    /// Unit vector along the direction of motion
    pub direction: ThreeVector,
    /// Points towards the centre of curvature, with magnitude equal to
    /// the radius of curvature (cm). Straight sections have
    /// `rho = (0, 0, STRAIGHT_RADIUS)`.
    pub rho: ThreeVector,
    /// Magnetic field, in T
    pub b: ThreeVector,
    /// Critical photon energy, in eV
    pub critical_energy: f64,
    /// Path length since the start of the region, in cm
    pub s: f64,
    pub frame: LocalFrame,
    pub optics: BeamOptics,
}

impl TrajectoryPoint {
    /// Magnitude of the radius of curvature, in cm
    pub fn radius(&self) -> f64 {
        self.rho.norm()
    }

    pub fn is_straight(&self) -> bool {
        self.radius() >= STRAIGHT_RADIUS
    }
}

/// Why the integration stopped
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The particle left the region through one of its boundary planes
    Boundary,
    /// The maximum number of steps was taken first
    StepCap,
}

/// The sequence of points produced by integrating through a region
#[derive(Clone, Debug)]
pub struct Trajectory {
    pub points: Vec<TrajectoryPoint>,
    pub termination: Termination,
    step: f64,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Integration step, in cm
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Total path length covered by the points, in cm
    pub fn length(&self) -> f64 {
        self.step * (self.points.len() as f64)
    }

    /// Total bending angle, in rad, accumulated over the trajectory
    pub fn total_bend(&self) -> f64 {
        self.points.iter()
            .filter(|pt| !pt.is_straight())
            .map(|pt| self.step / pt.radius())
            .sum()
    }

    /// The point nearest to path length `s`, if `s` lies within the
    /// trajectory.
    pub fn point_at_length(&self, s: f64) -> Option<&TrajectoryPoint> {
        if s < 0.0 || s > self.length() {
            return None;
        }
        let i = (s / self.step).round() as usize;
        self.points.get(i.min(self.points.len().saturating_sub(1)))
    }
}

impl Region {
    /// Evaluates the field, curvature, critical energy and beam optics
    /// at the given position.
    pub fn point_at(&self, position: ThreeVector, direction: ThreeVector, s: f64) -> TrajectoryPoint {
        let params = self.params();
        let beam = &params.beam;
        let gamma = beam.gamma();

        let b = params.field.field_at(position, s);
        let rho = if b.norm() < VERY_SMALL {
            None
        } else {
            let (_, b_perp) = b.decompose(direction);
            let curvature = direction.cross(b).try_normalize();
            if b_perp.norm() < VERY_SMALL {
                None
            } else {
                let radius = beam.bending_radius(b_perp.norm());
                let radius = radius.signum() * radius.abs().min(STRAIGHT_RADIUS);
                curvature.map(|n| radius * n)
            }
        };

        let straight = rho.is_none();
        let rho = rho.unwrap_or(ThreeVector::new(0.0, 0.0, STRAIGHT_RADIUS));
        let critical_energy = CRITICAL_ENERGY_COEFF * gamma.powi(3) / rho.norm();

        let optics = params.optics.twiss_at(position, s)
            .map(|twiss| BeamOptics::new(&twiss, beam))
            .unwrap_or_default();

        TrajectoryPoint {
            position,
            direction,
            rho,
            b,
            critical_energy,
            s,
            frame: LocalFrame::new(direction, rho, straight),
            optics,
        }
    }

    /// Integrates the trajectory from the start point until it leaves
    /// the region or the step cap is reached.
    ///
    /// Each step rotates the direction of motion about `direction × rho`
    /// by `step / |rho|`, and moves the particle a distance `step` along
    /// the direction it had at the start of the step.
    pub fn trajectory(&self) -> Trajectory {
        let params = self.params();
        let dl = params.step_cm;
        let mut position = params.start;
        let mut direction = params.direction;
        let mut s = 0.0;
        let mut points = Vec::new();

        let termination = loop {
            if points.len() >= params.max_steps {
                break Termination::StepCap;
            }

            if params.boundary.crossed(position) {
                break Termination::Boundary;
            }

            let pt = self.point_at(position, direction, s);
            points.push(pt);

            let next_direction = if pt.is_straight() {
                direction
            } else {
                let axis = direction.cross(pt.rho).normalize();
                direction.rotate_around(axis, dl / pt.radius())
            };

            position = position + dl * direction;
            direction = next_direction.normalize();
            s += dl;
        };

        Trajectory {points, termination, step: dl}
    }
}
