//! Lattice functions and the phase-space ellipse of the beam

use std::path::Path;

use crate::distribution::{CdfMatrix, TableError, check_ascending};
use crate::geometry::ThreeVector;
use crate::interpolation::{self, Edge};
use super::ParticleBeam;

/// Twiss (Courant-Snyder) parameters and dispersion at a point.
/// Beta functions and dispersion are in cm.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Twiss {
    pub beta_x: f64,
    pub beta_y: f64,
    pub eta: f64,
    pub eta_prime: f64,
    pub alpha_x: f64,
    pub alpha_y: f64,
}

impl Twiss {
    pub fn new(beta_x: f64, beta_y: f64) -> Self {
        Twiss {beta_x, beta_y, ..Default::default()}
    }

    pub fn with_dispersion(&self, eta: f64, eta_prime: f64) -> Self {
        Twiss {eta, eta_prime, ..*self}
    }

    pub fn with_alpha(&self, alpha_x: f64, alpha_y: f64) -> Self {
        Twiss {alpha_x, alpha_y, ..*self}
    }
}

/// What the rows of a [`LatticeTable`] are keyed by
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LatticeKey {
    /// Path length along the trajectory
    PathLength,
    /// One Cartesian coordinate (0, 1 or 2) of the position
    Coordinate(usize),
}

/// Number of columns in a lattice table: the key, followed by
/// beta_x, beta_y, eta, eta', alpha_x, alpha_y
pub const LATTICE_COLUMNS: usize = 7;

/// Lattice functions tabulated against an ascending key, as exported
/// by optics codes.
#[derive(Clone, Debug)]
pub struct LatticeTable {
    key: Vec<f64>,
    rows: Vec<Twiss>,
}

impl LatticeTable {
    /// Builds a table from its rows, each of which is
    /// `[key, beta_x, beta_y, eta, eta', alpha_x, alpha_y]`.
    pub fn from_rows(name: &str, rows: &[[f64; LATTICE_COLUMNS]]) -> Result<Self, TableError> {
        let key: Vec<f64> = rows.iter().map(|r| r[0]).collect();
        check_ascending(name, &key)?;
        if let Some(i) = rows.iter().position(|r| !(r[1] > 0.0 && r[2] > 0.0 && r[1].is_finite() && r[2].is_finite())) {
            return Err(TableError::Invalid(name.to_owned(), format!("beta functions must be positive and finite (row {})", i + 1)));
        }
        let rows = rows.iter()
            .map(|r| Twiss {
                beta_x: r[1],
                beta_y: r[2],
                eta: r[3],
                eta_prime: r[4],
                alpha_x: r[5],
                alpha_y: r[6],
            })
            .collect();
        Ok(LatticeTable {key, rows})
    }

    /// Parses a whitespace- or comma-separated text table with seven
    /// columns, see [`LatticeTable::from_rows`].
    pub fn from_text(name: &str, text: &str) -> Result<Self, TableError> {
        let m = CdfMatrix::from_text(name, text)?;
        if m.cols() != LATTICE_COLUMNS {
            return Err(TableError::Shape(format!("{} (columns)", name), LATTICE_COLUMNS, m.cols()));
        }
        let rows: Vec<[f64; LATTICE_COLUMNS]> = (0..m.rows())
            .map(|i| {
                let mut row = [0.0; LATTICE_COLUMNS];
                row.copy_from_slice(m.row(i));
                row
            })
            .collect();
        Self::from_rows(name, &rows)
    }

    pub fn from_file<P: AsRef<Path>>(name: &str, path: P) -> Result<Self, TableError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_text(name, &text)
    }

    pub fn len(&self) -> usize {
        self.key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    /// Lattice functions at `key`, interpolated linearly and clamped
    /// at the ends of the table.
    pub fn twiss_at(&self, key: f64) -> Twiss {
        let b = interpolation::locate_in(&self.key, key, Edge::Clamp);
        let (lo, hi) = (&self.rows[b.index], &self.rows[b.index + 1]);
        Twiss {
            beta_x: b.blend(lo.beta_x, hi.beta_x),
            beta_y: b.blend(lo.beta_y, hi.beta_y),
            eta: b.blend(lo.eta, hi.eta),
            eta_prime: b.blend(lo.eta_prime, hi.eta_prime),
            alpha_x: b.blend(lo.alpha_x, hi.alpha_x),
            alpha_y: b.blend(lo.alpha_y, hi.alpha_y),
        }
    }
}

/// Where the lattice functions of a region come from
#[derive(Clone, Debug)]
pub enum Optics {
    /// No beam size: every particle follows the reference trajectory
    Ideal,
    /// The same everywhere in the region
    Constant(Twiss),
    /// Interpolated from a table
    Lattice {
        table: LatticeTable,
        key: LatticeKey,
    },
}

impl Default for Optics {
    fn default() -> Self {
        Optics::Ideal
    }
}

impl Optics {
    /// Lattice functions at position `r`, path length `s`, or `None`
    /// for an ideal beam.
    pub fn twiss_at(&self, r: ThreeVector, s: f64) -> Option<Twiss> {
        match self {
            Optics::Ideal => None,
            Optics::Constant(twiss) => Some(*twiss),
            Optics::Lattice { table, key: LatticeKey::PathLength } => Some(table.twiss_at(s)),
            Optics::Lattice { table, key: LatticeKey::Coordinate(axis) } => Some(table.twiss_at(r[*axis])),
        }
    }
}

/// Phase-space ellipse of one transverse plane
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct Ellipse {
    gamma: f64,
    theta: f64,
    a: f64,
    b: f64,
    sigma: f64,
    sigma_prime: f64,
}

impl Ellipse {
    /// Ellipse `gamma x^2 + 2 alpha x x' + beta x'^2 = emittance`,
    /// widened by the energy spread `spread` through the dispersion.
    fn new(beta: f64, alpha: f64, eta: f64, eta_prime: f64, emittance: f64, spread: f64) -> Self {
        let gamma = (1.0 + alpha * alpha) / beta;
        if emittance <= 0.0 {
            return Ellipse {gamma, ..Default::default()};
        }

        // tilt of the ellipse, before the energy-spread correction
        let theta = if alpha == 0.0 {
            0.0
        } else {
            0.5 * (2.0 * alpha / (gamma - beta)).atan()
        };

        let d_eta = spread * eta;
        let d_eta_prime = spread * eta_prime;
        let beta_c = beta + d_eta * d_eta / emittance;
        let alpha_c = alpha - d_eta * d_eta_prime / emittance;
        let gamma_c = gamma + d_eta_prime * d_eta_prime / emittance;

        let (s, c) = theta.sin_cos();
        let a = (emittance / (gamma_c * c * c + 2.0 * alpha_c * c * s + beta_c * s * s)).sqrt();
        let b = (emittance / (gamma_c * s * s - 2.0 * alpha_c * c * s + beta_c * c * c)).sqrt();

        Ellipse {
            gamma,
            theta,
            a,
            b,
            sigma: (emittance * beta_c).sqrt(),
            sigma_prime: (emittance * gamma_c).sqrt(),
        }
    }
}

/// Beam-optics quantities at a trajectory point: the lattice functions,
/// the emittance in each plane and the resulting beam sizes (cm) and
/// divergences (rad). All zero for an ideal beam.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BeamOptics {
    pub beta_x: f64,
    pub beta_y: f64,
    pub eta: f64,
    pub eta_prime: f64,
    pub alpha_x: f64,
    pub alpha_y: f64,
    pub gamma_x: f64,
    pub gamma_y: f64,
    pub emittance_x: f64,
    pub emittance_y: f64,
    pub sigma_x: f64,
    pub sigma_y: f64,
    pub sigma_x_prime: f64,
    pub sigma_y_prime: f64,
    pub theta_x: f64,
    pub theta_y: f64,
    pub a_x: f64,
    pub b_x: f64,
    pub a_y: f64,
    pub b_y: f64,
}

impl BeamOptics {
    /// Evaluates the beam optics for the given lattice functions.
    /// Dispersion acts in the horizontal plane only.
    pub fn new(twiss: &Twiss, beam: &ParticleBeam) -> Self {
        if beam.emittance_cm <= 0.0 {
            return BeamOptics::default();
        }

        let (emittance_x, emittance_y) = (beam.emittance_x(), beam.emittance_y());
        let x = Ellipse::new(twiss.beta_x, twiss.alpha_x, twiss.eta, twiss.eta_prime, emittance_x, beam.energy_spread);
        let y = Ellipse::new(twiss.beta_y, twiss.alpha_y, 0.0, 0.0, emittance_y, beam.energy_spread);

        BeamOptics {
            beta_x: twiss.beta_x,
            beta_y: twiss.beta_y,
            eta: twiss.eta,
            eta_prime: twiss.eta_prime,
            alpha_x: twiss.alpha_x,
            alpha_y: twiss.alpha_y,
            gamma_x: x.gamma,
            gamma_y: y.gamma,
            emittance_x,
            emittance_y,
            sigma_x: x.sigma,
            sigma_y: y.sigma,
            sigma_x_prime: x.sigma_prime,
            sigma_y_prime: y.sigma_prime,
            theta_x: x.theta,
            theta_y: y.theta,
            a_x: x.a,
            b_x: x.b,
            a_y: y.a,
            b_y: y.b,
        }
    }

    /// Does the beam have a finite size?
    pub fn is_ideal(&self) -> bool {
        self.emittance_x == 0.0 && self.emittance_y == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beam() -> ParticleBeam {
        ParticleBeam::new(3.0, 0.000511)
            .with_emittance(1.0e-7, 0.01)
            .with_energy_spread(1.0e-3)
    }

    #[test]
    fn courant_snyder_invariant() {
        let twiss = Twiss::new(1200.0, 350.0)
            .with_alpha(-1.3, 0.4)
            .with_dispersion(25.0, 0.02);
        let optics = BeamOptics::new(&twiss, &beam());
        println!("{:#?}", optics);
        let inv_x = optics.gamma_x * optics.beta_x - optics.alpha_x.powi(2);
        let inv_y = optics.gamma_y * optics.beta_y - optics.alpha_y.powi(2);
        assert!((inv_x - 1.0).abs() < 1.0e-12);
        assert!((inv_y - 1.0).abs() < 1.0e-12);
        assert!((optics.emittance_x + optics.emittance_y - 1.0e-7).abs() < 1.0e-20);
    }

    #[test]
    fn upright_ellipse() {
        // alpha = 0, no dispersion: the semi-axes are the rms size
        // and divergence
        let twiss = Twiss::new(1000.0, 400.0);
        let optics = BeamOptics::new(&twiss, &beam());
        assert_eq!(optics.theta_x, 0.0);
        assert!((optics.a_x - optics.sigma_x).abs() < 1.0e-15);
        assert!((optics.b_x - optics.sigma_x_prime).abs() < 1.0e-15);
        assert!((optics.sigma_x - (optics.emittance_x * 1000.0f64).sqrt()).abs() < 1.0e-15);
        assert!((optics.sigma_y_prime - (optics.emittance_y / 400.0f64).sqrt()).abs() < 1.0e-15);
    }

    #[test]
    fn dispersion_widens_beam() {
        let twiss = Twiss::new(1000.0, 400.0).with_dispersion(50.0, 0.0);
        let optics = BeamOptics::new(&twiss, &beam());
        let expected = (optics.emittance_x * 1000.0 + (50.0f64 * 1.0e-3).powi(2)).sqrt();
        println!("sigma_x = {:.6e}, expected {:.6e}", optics.sigma_x, expected);
        assert!((optics.sigma_x - expected).abs() < 1.0e-12 * expected);
    }

    #[test]
    fn ideal_beam() {
        let beam = ParticleBeam::new(3.0, 0.000511);
        let optics = BeamOptics::new(&Twiss::new(1000.0, 400.0), &beam);
        assert!(optics.is_ideal());
        assert_eq!(optics, BeamOptics::default());
    }

    #[test]
    fn lattice_interpolation() {
        let text = "# s betax betay eta eta' alphax alphay
            0.0   100.0 50.0 0.0 0.0  1.0 -1.0
            100.0 300.0 50.0 10.0 0.1 -1.0 1.0
            ";
        let table = LatticeTable::from_text("lattice", text).unwrap();
        assert_eq!(table.len(), 2);
        let twiss = table.twiss_at(25.0);
        println!("{:?}", twiss);
        assert!((twiss.beta_x - 150.0).abs() < 1.0e-12);
        assert!((twiss.alpha_x - 0.5).abs() < 1.0e-12);
        assert_eq!(table.twiss_at(-10.0).beta_x, 100.0);
        assert_eq!(table.twiss_at(500.0).eta, 10.0);

        let optics = Optics::Lattice {table, key: LatticeKey::Coordinate(2)};
        let twiss = optics.twiss_at(ThreeVector::new(0.0, 0.0, 50.0), 0.0).unwrap();
        assert!((twiss.eta_prime - 0.05).abs() < 1.0e-12);

        assert!(LatticeTable::from_text("short", "0 1 2 3\n").is_err());
        assert!(LatticeTable::from_text("unsorted", "1 0 0 0 0 0 0\n0 0 0 0 0 0 0\n").is_err());
    }

    #[test]
    fn lattice_rejects_bad_beta() {
        let rows = [
            [0.0, 100.0, 50.0, 0.0, 0.0, 0.0, 0.0],
            [10.0, 0.0, 50.0, 0.0, 0.0, 0.0, 0.0],
        ];
        let err = LatticeTable::from_rows("lattice", &rows).err();
        println!("{:?}", err);
        assert!(matches!(err, Some(TableError::Invalid(..))));

        let text = "0.0 100.0 50.0 0 0 0 0\n10.0 100.0 -5.0 0 0 0 0\n";
        assert!(LatticeTable::from_text("lattice", text).is_err());
        let text = "0.0 100.0 50.0 0 0 0 0\n10.0 120.0 60.0 0 0 0 0\n";
        assert!(LatticeTable::from_text("lattice", text).is_ok());
    }
}
