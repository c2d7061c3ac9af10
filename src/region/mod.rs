//! Magnetic regions: the beam, the field it moves through and the
//! reference trajectory that results

use crate::constants::*;
use crate::emission::Polarization;
use crate::field::FieldSource;
use crate::geometry::ThreeVector;
use crate::input::InputError;

mod optics;
mod trajectory;

pub use self::optics::*;
pub use self::trajectory::*;

/// The circulating beam. The sign of the mass encodes the sign of the
/// charge: a negative mass bends the other way.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParticleBeam {
    /// Beam energy, in GeV
    pub energy_gev: f64,
    /// Rest mass, in GeV
    pub mass_gev: f64,
    /// Beam current, in A
    pub current_a: f64,
    /// Total emittance, in cm rad
    pub emittance_cm: f64,
    /// Ratio of vertical to horizontal emittance
    pub coupling: f64,
    /// Relative rms energy spread
    pub energy_spread: f64,
}

impl ParticleBeam {
    /// An ideal beam of particles with the given energy and mass,
    /// carrying a current of 1 A.
    pub fn new(energy_gev: f64, mass_gev: f64) -> Self {
        ParticleBeam {
            energy_gev,
            mass_gev,
            current_a: 1.0,
            emittance_cm: 0.0,
            coupling: 0.0,
            energy_spread: 0.0,
        }
    }

    pub fn with_current(&self, current_a: f64) -> Self {
        ParticleBeam {current_a, ..*self}
    }

    pub fn with_emittance(&self, emittance_cm: f64, coupling: f64) -> Self {
        ParticleBeam {emittance_cm, coupling, ..*self}
    }

    pub fn with_energy_spread(&self, energy_spread: f64) -> Self {
        ParticleBeam {energy_spread, ..*self}
    }

    /// Lorentz factor
    pub fn gamma(&self) -> f64 {
        self.energy_gev / self.mass_gev.abs()
    }

    pub fn emittance_x(&self) -> f64 {
        self.emittance_cm / (1.0 + self.coupling)
    }

    pub fn emittance_y(&self) -> f64 {
        self.coupling * self.emittance_cm / (1.0 + self.coupling)
    }

    /// Bending radius, in cm, in a field of magnitude `b_perp` (T)
    /// perpendicular to the motion. Negative for negative mass.
    pub fn bending_radius(&self, b_perp: f64) -> f64 {
        self.mass_gev.signum() * self.energy_gev / BENDING_CONSTANT / b_perp
    }

    fn validate(&self) -> Result<(), InputError> {
        if !(self.energy_gev > 0.0) {
            Err(InputError::invalid("beam:energy", "must be positive"))
        } else if !(self.mass_gev != 0.0 && self.mass_gev.is_finite()) {
            Err(InputError::invalid("beam:mass", "must be finite and non-zero"))
        } else if self.gamma() < 1.0 {
            Err(InputError::invalid("beam:energy", "must be at least the rest mass"))
        } else if !(self.emittance_cm >= 0.0) {
            Err(InputError::invalid("beam:emittance", "must not be negative"))
        } else if !(self.coupling >= 0.0) {
            Err(InputError::invalid("beam:coupling", "must not be negative"))
        } else if !(self.energy_spread >= 0.0) {
            Err(InputError::invalid("beam:energy_spread", "must not be negative"))
        } else {
            Ok(())
        }
    }
}

/// The planes that bound a region, one per axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Boundary {
    limits: ThreeVector,
    approach: [f64; 3],
}

impl Boundary {
    /// Creates the boundary for a trajectory starting at `start`. The
    /// side of each plane on which the region lies is fixed by the
    /// start point; a start point lying on a plane counts as above it.
    pub fn new(start: ThreeVector, limits: ThreeVector) -> Self {
        let mut approach = [0.0; 3];
        for (i, dir) in approach.iter_mut().enumerate() {
            *dir = if limits[i] - start[i] > 0.0 {1.0} else {-1.0};
        }
        Boundary {limits, approach}
    }

    pub fn limits(&self) -> ThreeVector {
        self.limits
    }

    /// Has `r` passed through any of the planes?
    pub fn crossed(&self, r: ThreeVector) -> bool {
        (0..3).any(|i| self.approach[i] * (r[i] - self.limits[i]) > 0.0)
    }
}

/// Everything needed to integrate the trajectory through a region
#[derive(Clone, Debug)]
pub struct RegionParams {
    pub start: ThreeVector,
    pub direction: ThreeVector,
    pub step_cm: f64,
    pub boundary: Boundary,
    pub beam: ParticleBeam,
    pub field: FieldSource,
    pub optics: Optics,
    pub max_steps: usize,
    pub polarization: Polarization,
}

impl RegionParams {
    /// Checks and collects the parameters of a region. The start
    /// direction is normalized.
    pub fn new(start: ThreeVector, direction: ThreeVector, step_cm: f64, limits: ThreeVector, beam: ParticleBeam, field: FieldSource, optics: Optics) -> Result<Self, InputError> {
        if !(step_cm > 0.0 && step_cm.is_finite()) {
            return Err(InputError::invalid("region:step", "must be positive and finite"));
        }

        let direction = direction.try_normalize()
            .ok_or_else(|| InputError::invalid("region:direction", "must be a non-zero vector"))?;

        if !start.is_finite() || !limits.is_finite() {
            return Err(InputError::invalid("region:start", "start point and limits must be finite"));
        }

        beam.validate()?;

        match &optics {
            Optics::Ideal if beam.emittance_cm > 0.0 => {
                return Err(InputError::invalid("optics", "a beam with finite emittance needs lattice functions"));
            },
            Optics::Constant(twiss) if !(twiss.beta_x > 0.0 && twiss.beta_y > 0.0) => {
                return Err(InputError::invalid("optics:beta", "beta functions must be positive"));
            },
            Optics::Lattice { key: LatticeKey::Coordinate(axis), .. } if *axis > 2 => {
                return Err(InputError::invalid("optics:key", "coordinate must be x, y or z"));
            },
            _ => {},
        }

        Ok(RegionParams {
            start,
            direction,
            step_cm,
            boundary: Boundary::new(start, limits),
            beam,
            field,
            optics,
            max_steps: MAX_STEPS,
            polarization: Polarization::Full,
        })
    }

    pub fn with_max_steps(self, max_steps: usize) -> Result<Self, InputError> {
        if max_steps == 0 {
            Err(InputError::invalid("region:max_steps", "must be at least 1"))
        } else {
            Ok(RegionParams {max_steps, ..self})
        }
    }

    pub fn with_polarization(self, polarization: Polarization) -> Self {
        RegionParams {polarization, ..self}
    }
}

/// A magnetic region and its parameters.
#[derive(Clone, Debug)]
pub struct Region {
    params: RegionParams,
}

impl Region {
    pub fn new(params: RegionParams) -> Self {
        Region {params}
    }

    pub fn params(&self) -> &RegionParams {
        &self.params
    }

    pub fn beam(&self) -> &ParticleBeam {
        &self.params.beam
    }
}

#[cfg(test)]
mod tests {
    use crate::field::UniformField;
    use super::*;

    #[test]
    fn boundary_sides() {
        let start = ThreeVector::new(0.0, 0.0, 0.0);
        let boundary = Boundary::new(start, ThreeVector::new(10.0, -5.0, 0.0));
        assert!(!boundary.crossed(start));
        assert!(!boundary.crossed(ThreeVector::new(9.0, -4.0, 1.0)));
        assert!(boundary.crossed(ThreeVector::new(10.5, 0.0, 0.0)));
        assert!(boundary.crossed(ThreeVector::new(0.0, -5.5, 0.0)));
        // the start point lies on the z plane, so the region is above it
        assert!(boundary.crossed(ThreeVector::new(0.0, 0.0, -0.1)));
    }

    #[test]
    fn beam_parameters() {
        let beam = ParticleBeam::new(1.0, 0.000511).with_emittance(1.0e-7, 0.25);
        println!("gamma = {:.3}", beam.gamma());
        assert!((beam.gamma() - 1956.947162).abs() < 1.0e-5);
        assert!((beam.emittance_x() - 8.0e-8).abs() < 1.0e-20);
        assert!((beam.emittance_y() - 2.0e-8).abs() < 1.0e-20);
        let positron = ParticleBeam::new(1.0, -0.000511);
        assert_eq!(positron.gamma(), beam.gamma());
        assert_eq!(positron.bending_radius(1.0), -beam.bending_radius(1.0));
    }

    #[test]
    fn rejects_invalid_params() {
        let field: FieldSource = UniformField::new([0.0, 0.0, 1.0].into()).into();
        let beam = ParticleBeam::new(1.0, 0.000511);
        let (start, dir, limits) = (ThreeVector::zero(), ThreeVector::new(0.0, 0.0, 2.0), ThreeVector::new(1.0, 1.0, 100.0));

        let params = RegionParams::new(start, dir, 1.0, limits, beam, field.clone(), Optics::Ideal).unwrap();
        assert_eq!(params.direction, ThreeVector::new(0.0, 0.0, 1.0));
        assert_eq!(params.max_steps, MAX_STEPS);
        assert!(params.with_max_steps(0).is_err());

        let err = RegionParams::new(start, dir, 0.0, limits, beam, field.clone(), Optics::Ideal).unwrap_err();
        println!("{}", err);
        assert!(RegionParams::new(start, ThreeVector::zero(), 1.0, limits, beam, field.clone(), Optics::Ideal).is_err());
        let wide = beam.with_emittance(1.0e-7, 0.01);
        assert!(RegionParams::new(start, dir, 1.0, limits, wide, field.clone(), Optics::Ideal).is_err());
        assert!(RegionParams::new(start, dir, 1.0, limits, wide, field.clone(), Optics::Constant(Twiss::new(0.0, 1.0))).is_err());
        assert!(RegionParams::new(start, dir, 1.0, limits, wide, field, Optics::Constant(Twiss::new(100.0, 10.0))).is_ok());
    }
}
