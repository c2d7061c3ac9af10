//! Weighted photons, generated along a trajectory

use std::fmt;
use std::f64::consts;

use rand::Rng;
use rand_distr::StandardNormal;

use crate::constants::*;
use crate::geometry::ThreeVector;
use crate::input::InputError;
use crate::region::{Trajectory, TrajectoryPoint, ParticleBeam, BeamOptics};
use crate::spectrum::{SrSpectrum, GenerationMode, EnergyWindow};
use super::*;

/// A synchrotron-radiation photon and the weights it carries
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Photon {
    /// Point of emission, in cm
    pub position: ThreeVector,
    /// Unit vector along the direction of propagation
    pub direction: ThreeVector,
    /// Photon energy, in eV
    pub energy: f64,
    /// Vertical emission angle, in rad
    pub psi: f64,
    /// Horizontal emission angle, in rad
    pub chi: f64,
    /// Fraction of the emission in the selected polarization component
    pub polarization: f64,
    /// Photons/s emitted by the segment, within the energy window
    pub flux: f64,
    /// Power (W) emitted by the segment, within the energy window
    pub power: f64,
    /// Index of the trajectory point that emitted the photon
    pub index: usize,
}

impl fmt::Display for Photon {
    // "E (eV) x y z (cm) v_x v_y v_z psi chi (rad) pol flux (1/s) power (W) index"
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
            "{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.9e}\t{:.9e}\t{:.9e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}\t{}",
            self.energy,
            self.position[0], self.position[1], self.position[2],
            self.direction[0], self.direction[1], self.direction[2],
            self.psi, self.chi,
            self.polarization,
            self.flux, self.power,
            self.index,
        )
    }
}

/// Draws a point from a phase-space ellipse with semi-axes `a`, `b`,
/// tilted by `theta`, returning (offset, angle).
fn phase_space_offset<R: Rng>(a: f64, b: f64, theta: f64, rng: &mut R) -> (f64, f64) {
    let u: f64 = a * rng.sample::<f64, _>(StandardNormal);
    let v: f64 = b * rng.sample::<f64, _>(StandardNormal);
    let (s, c) = theta.sin_cos();
    (u * c - v * s, u * s + v * c)
}

/// Generates photons from the points of a trajectory, using shared,
/// read-only spectrum and angular tables. Any number of generators can
/// use the same tables, each with its own random number generator.
pub struct PhotonGenerator<'a> {
    trajectory: &'a Trajectory,
    spectrum: &'a SrSpectrum,
    psi_table: &'a PsiTable,
    pol_table: &'a PolarizationTable,
    chi_table: Option<&'a ChiTable>,
    beam: ParticleBeam,
    window: EnergyWindow,
    mode: GenerationMode,
    polarization: Polarization,
    /// Points that radiate within the energy window
    emitting: Vec<usize>,
}

impl<'a> PhotonGenerator<'a> {
    pub fn new(trajectory: &'a Trajectory, spectrum: &'a SrSpectrum, psi_table: &'a PsiTable, pol_table: &'a PolarizationTable, beam: ParticleBeam, window: EnergyWindow, mode: GenerationMode) -> Result<Self, InputError> {
        if trajectory.is_empty() {
            return Err(InputError::invalid("region", "the trajectory has no points"));
        }

        if !(window.low_ev > 0.0 && window.high_ev > window.low_ev) {
            return Err(InputError::invalid("generation:energy", "window must satisfy 0 < low < high"));
        }

        let (psi, pol) = (psi_table.matrix(), pol_table.matrix());
        if psi.rows() != pol.rows() || psi.cols() != pol.cols() {
            return Err(InputError::invalid(
                "tables:polarization",
                &format!("shape {} x {} does not match the psi table ({} x {})", pol.rows(), pol.cols(), psi.rows(), psi.cols())
            ));
        }

        let mut gen = PhotonGenerator {
            trajectory,
            spectrum,
            psi_table,
            pol_table,
            chi_table: None,
            beam,
            window,
            mode,
            polarization: Polarization::Full,
            emitting: Vec::new(),
        };

        gen.emitting = (0..trajectory.len())
            .filter(|&i| gen.is_emitting(&trajectory.points[i]))
            .collect();

        Ok(gen)
    }

    /// Straight points, and points whose spectrum lies entirely outside
    /// the window, have nothing to sample.
    fn is_emitting(&self, pt: &TrajectoryPoint) -> bool {
        let (flux, power) = self.segment_weights(pt);
        match self.mode {
            GenerationMode::Flux => flux > 0.0,
            GenerationMode::Power => power > 0.0,
        }
    }

    /// Number of trajectory points photons are drawn from
    pub fn emitting_points(&self) -> usize {
        self.emitting.len()
    }

    /// Without a chi table, photons are emitted in the plane spanned by
    /// the direction of motion and the local vertical.
    pub fn with_chi_table(self, chi_table: &'a ChiTable) -> Self {
        PhotonGenerator {chi_table: Some(chi_table), ..self}
    }

    pub fn with_polarization(self, polarization: Polarization) -> Self {
        PhotonGenerator {polarization, ..self}
    }

    /// Flux (photons/s) and power (W) radiated within the energy window
    /// by the segment that starts at `pt`.
    pub fn segment_weights(&self, pt: &TrajectoryPoint) -> (f64, f64) {
        if pt.is_straight() {
            return (0.0, 0.0);
        }
        let (log_min, log_max) = self.window.log_bounds(pt.critical_energy);
        let dn = self.spectrum.integral_fraction(GenerationMode::Flux, log_min, log_max);
        let dp = self.spectrum.integral_fraction(GenerationMode::Power, log_min, log_max);
        let prefactor = (self.trajectory.step() / pt.radius()) * 3f64.sqrt() / (2.0 * consts::PI) * ALPHA_FINE * self.beam.gamma();
        let flux = self.beam.current_a / ELEMENTARY_CHARGE * prefactor * dn;
        let power = self.beam.current_a * prefactor * pt.critical_energy * dp;
        (flux, power)
    }

    /// Total flux (photons/s) within the energy window, summed over
    /// the trajectory
    pub fn total_flux(&self) -> f64 {
        self.trajectory.points.iter().map(|pt| self.segment_weights(pt).0).sum()
    }

    /// Total power (W) within the energy window, summed over the
    /// trajectory
    pub fn total_power(&self) -> f64 {
        self.trajectory.points.iter().map(|pt| self.segment_weights(pt).1).sum()
    }

    /// Generates a photon from a point chosen uniformly among those
    /// that radiate within the energy window. Returns `None` if there
    /// are none.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Option<Photon> {
        if self.emitting.is_empty() {
            return None;
        }
        let index = self.emitting[rng.gen_range(0, self.emitting.len())];
        self.generate_at(index, rng)
    }

    /// Generates a photon from the `index`-th point of the trajectory,
    /// or returns `None` if that point does not radiate within the
    /// energy window.
    pub fn generate_at<R: Rng>(&self, index: usize, rng: &mut R) -> Option<Photon> {
        let pt = self.trajectory.points.get(index)?;
        if !self.is_emitting(pt) {
            return None;
        }
        let gamma = self.beam.gamma();

        let energy = self.spectrum.sample_energy(self.mode, &self.window, pt.critical_energy, rng);
        let ratio = energy / pt.critical_energy;

        let sample = sample_psi(self.psi_table, self.pol_table, ratio, self.polarization, rng.gen());
        let psi = if rng.gen() {sample.gamma_psi / gamma} else {-sample.gamma_psi / gamma};

        let chi = match self.chi_table {
            Some(table) => {
                let chi = sample_chi(table, psi, gamma, rng.gen(), rng.gen());
                if rng.gen() {chi} else {-chi}
            },
            None => 0.0,
        };

        let (dx, dxp, dy, dyp) = self.beam_offsets(&pt.optics, rng);

        let frame = &pt.frame;
        let position = pt.position + dx * frame.x + dy * frame.y;
        let direction = pt.direction
            .rotate_around(frame.y, chi + dxp)
            .rotate_around(frame.x, -(psi + dyp))
            .normalize();

        let (flux, power) = self.segment_weights(pt);

        Some(Photon {
            position,
            direction,
            energy,
            psi,
            chi,
            polarization: sample.polarization,
            flux: flux * sample.polarization,
            power: power * sample.polarization,
            index,
        })
    }

    /// Offset and angular deviation, horizontally and vertically, of a
    /// particle drawn from the beam.
    fn beam_offsets<R: Rng>(&self, optics: &BeamOptics, rng: &mut R) -> (f64, f64, f64, f64) {
        if optics.is_ideal() {
            return (0.0, 0.0, 0.0, 0.0);
        }
        let (dx, dxp) = phase_space_offset(optics.a_x, optics.b_x, optics.theta_x, rng);
        let (dy, dyp) = phase_space_offset(optics.a_y, optics.b_y, optics.theta_y, rng);
        (dx, dxp, dy, dyp)
    }
}
