//! Measured reflectivity of surface materials

use std::fmt;
use std::path::Path;

use crate::distribution::{TableError, check_ascending};
use crate::interpolation::{self, Edge};

mod parse;

/// Outcome of a photon striking a surface
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// Specular reflection
    Forward,
    Diffuse,
    Back,
    Transparent,
    Absorb,
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Interaction::Forward => "forward",
            Interaction::Diffuse => "diffuse",
            Interaction::Back => "back",
            Interaction::Transparent => "transparent",
            Interaction::Absorb => "absorb",
        };
        write!(f, "{}", name)
    }
}

/// Probabilities of forward, diffuse and back reflection, and of
/// transmission, tabulated against photon energy (eV) and grazing
/// angle (rad).
#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    energies: Vec<f64>,
    angles: Vec<f64>,
    log_energies: Vec<f64>,
    log_angles: Vec<f64>,
    /// One entry per (energy, angle), energy-major
    cells: Vec<[f64; 4]>,
    has_backscattering: bool,
}

/// Bracketing entries and the fraction between them, in log space.
/// A table with a single entry along an axis is constant along it.
fn bracket(log_keys: &[f64], x: f64) -> (usize, usize, f64) {
    if log_keys.len() < 2 {
        return (0, 0, 0.0);
    }
    let b = interpolation::locate_in(log_keys, x.log10(), Edge::Clamp);
    (b.index, b.index + 1, b.fraction)
}

impl Material {
    /// Creates a material from its headers and cells, which hold the
    /// forward component and, if `has_backscattering`, the diffuse,
    /// back and transparent components.
    pub fn new(name: &str, energies: Vec<f64>, angles: Vec<f64>, cells: Vec<[f64; 4]>, has_backscattering: bool) -> Result<Self, TableError> {
        for (header, values) in [("energies", &energies), ("angles", &angles)].iter() {
            let label = format!("{}: {}", name, header);
            if values.is_empty() {
                return Err(TableError::TooShort(label, 0));
            }
            if values.len() > 1 {
                check_ascending(&label, values)?;
            }
            if let Some(i) = values.iter().position(|&v| !(v > 0.0)) {
                return Err(TableError::Invalid(label, format!("entry {} must be positive", i)));
            }
        }

        if cells.len() != energies.len() * angles.len() {
            return Err(TableError::Shape(name.to_owned(), energies.len() * angles.len(), cells.len()));
        }

        let cells = if has_backscattering {
            cells
        } else {
            cells.into_iter().map(|c| [c[0], 0.0, 0.0, 0.0]).collect()
        };

        Ok(Material {
            name: name.to_owned(),
            log_energies: energies.iter().map(|e| e.log10()).collect(),
            log_angles: angles.iter().map(|a| a.log10()).collect(),
            energies,
            angles,
            cells,
            has_backscattering,
        })
    }

    /// Reads a material table from comma-separated text.
    ///
    /// The first line lists the grazing angles (its first cell is
    /// ignored), each following line an energy and the forward
    /// reflection probability at each angle. A line starting with
    /// `diffuse`, `back` or `transparent` begins the table of that
    /// component, which must cover the same energies. Blank lines and
    /// lines starting with `#` are skipped.
    pub fn from_csv_str(name: &str, text: &str) -> Result<Self, TableError> {
        let table = parse::parse_sections(name, text)?;
        Self::new(name, table.energies, table.angles, table.cells, table.has_backscattering)
    }

    pub fn from_file<P: AsRef<Path>>(name: &str, path: P) -> Result<Self, TableError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_csv_str(name, &text)
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    pub fn has_backscattering(&self) -> bool {
        self.has_backscattering
    }

    fn cell(&self, i: usize, j: usize) -> &[f64; 4] {
        &self.cells[i * self.angles.len() + j]
    }

    /// Probabilities of forward, diffuse and back reflection and of
    /// transmission, for a photon of energy `energy` (eV) at grazing
    /// angle `angle` (rad). Interpolation is bilinear in log energy and
    /// log angle; arguments outside the table are pinned to its edges.
    /// Each component lies in [0, 1].
    pub fn reflection_probabilities(&self, energy: f64, angle: f64) -> [f64; 4] {
        let (i0, i1, u) = bracket(&self.log_energies, energy);
        let (j0, j1, v) = bracket(&self.log_angles, angle);

        let mut p = [0.0; 4];
        for (k, p) in p.iter_mut().enumerate() {
            let low = interpolation::lerp(self.cell(i0, j0)[k], self.cell(i0, j1)[k], v);
            let high = interpolation::lerp(self.cell(i1, j0)[k], self.cell(i1, j1)[k], v);
            *p = interpolation::lerp(low, high, u).max(0.0).min(1.0);
        }
        p
    }

    /// Decides the fate of a photon using the uniform draw `rand`.
    /// The components are stacked in the order forward, diffuse, back,
    /// transparent; whatever is left over is absorbed.
    pub fn classify(&self, energy: f64, angle: f64, rand: f64) -> Interaction {
        let p = self.reflection_probabilities(energy, angle);
        let outcomes = [Interaction::Forward, Interaction::Diffuse, Interaction::Back, Interaction::Transparent];
        let mut threshold = 0.0;
        for (prob, outcome) in p.iter().zip(outcomes.iter()) {
            threshold += prob;
            if rand < threshold {
                return *outcome;
            }
        }
        Interaction::Absorb
    }
}
