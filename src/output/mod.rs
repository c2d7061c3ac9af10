//! Creates and prints photon distribution functions
//! and other output

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::str::FromStr;

use crate::distribution::{Histogram, BinSpec};
use crate::emission::Photon;
use crate::region::Trajectory;

mod error;
mod functions;

pub use error::*;

type PhotonOutput = fn(&Photon) -> f64;

/// Number of bins used unless otherwise specified
const DEFAULT_BINS: usize = 100;

/// A one-dimensional distribution of some property of the generated
/// photons, e.g. `energy:(200;log;flux)`: the photon energy, in 200
/// log-spaced bins, weighted by flux.
pub struct DistributionFunction {
    bspec: BinSpec,
    nbins: usize,
    name: String,
    unit: String,
    weight: String,
    fweight: PhotonOutput,
    func: PhotonOutput,
}

impl fmt::Debug for DistributionFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "name: {} [{}]", self.name, self.unit)?;
        writeln!(f, "bspec: {}, nbins = {}", self.bspec, self.nbins)?;
        writeln!(f, "weight: {}", self.weight)?;
        Ok(())
    }
}

impl FromStr for DistributionFunction {
    type Err = OutputError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        // name, optionally followed by a bracketed (nbins; bspec; weight)
        let mut ss: Vec<&str> = spec.split(':').map(|s| s.trim()).collect();

        let last = match ss.last().copied() {
            Some(s) if ss.len() >= 2 && s.starts_with('(') && s.ends_with(')') => {
                Some(s.trim_start_matches('(').trim_end_matches(')'))
            },
            _ => None,
        };

        let (nbins, bspec, weight) = if let Some(last) = last {
            ss.pop();
            let last: Vec<&str> = last.split(';').map(|s| s.trim()).collect();
            match last.len() {
                1 => (DEFAULT_BINS, BinSpec::Linear, last[0]),
                2 => (DEFAULT_BINS, last[0].into(), last[1]),
                3 => {
                    let nbins = last[0].parse::<usize>()
                        .ok()
                        .filter(|&n| n > 0)
                        .ok_or_else(|| OutputError::conversion_explained(spec, "distribution function", "the number of bins must be a positive integer"))?;
                    (nbins, last[1].into(), last[2])
                },
                _ => return Err(OutputError::conversion_explained(spec, "distribution function", "expected at most three bracketed options")),
            }
        } else {
            (DEFAULT_BINS, BinSpec::Linear, "unit")
        };

        if ss.len() != 1 {
            return Err(OutputError::conversion_explained(spec, "distribution function", "only one-dimensional distributions are supported"));
        }

        let (func, unit) = functions::identify(ss[0])
            .ok_or_else(|| OutputError::conversion(spec, "distribution function"))?;

        let (fweight, _) = functions::identify_weight(weight)
            .ok_or_else(|| OutputError::conversion_explained(spec, "distribution function", &format!("'{}' is not a weight", weight)))?;

        Ok(DistributionFunction {
            bspec,
            nbins,
            name: ss[0].to_owned(),
            unit: unit.to_owned(),
            weight: weight.to_owned(),
            fweight,
            func,
        })
    }
}

impl DistributionFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bins the photons between the smallest and largest value of the
    /// output, multiplying each weight by `scale`. Returns `None` if
    /// there is no range to bin over.
    ///
    /// Flux and power weights are only meaningful for photons whose
    /// energies were sampled in proportion to that same quantity.
    pub fn histogram(&self, photons: &[Photon], scale: f64) -> Option<Histogram> {
        let values: Vec<f64> = photons.iter()
            .map(|ph| (self.func)(ph))
            .filter(|v| v.is_finite() && (self.bspec == BinSpec::Linear || *v > 0.0))
            .collect();

        let min = values.iter().cloned().fold(std::f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(std::f64::NEG_INFINITY, f64::max);
        if !(max > min) {
            return None;
        }

        // widen the top edge so the largest value is in range
        let max = match self.bspec {
            BinSpec::Linear => max + 1.0e-9 * (max - min),
            BinSpec::LogScaled => max * (1.0 + 1.0e-9),
        };

        let mut hgram = Histogram::new(&self.name, &self.unit, min, max, self.nbins, self.bspec);
        for ph in photons.iter() {
            hgram.add((self.func)(ph), scale * (self.fweight)(ph));
        }
        Some(hgram)
    }

    /// Writes the histogram to `prefix_name[_weight].dat`, if there is
    /// anything to write.
    pub fn write(&self, photons: &[Photon], scale: f64, prefix: &str) -> Result<(), OutputError> {
        let mut filename = format!("{}_{}", prefix, self.name);
        if self.weight != "unit" {
            filename.push('_');
            filename.push_str(&self.weight);
        }

        if let Some(hg) = self.histogram(photons, scale) {
            hg.write_plain_text(&filename).map_err(|e| OutputError::write(&filename, e))
        } else {
            Ok(())
        }
    }
}

/// Writes the trajectory, one point per line, to `filename`.
pub fn write_trajectory(trajectory: &Trajectory, filename: &str) -> Result<(), OutputError> {
    let write = || -> std::io::Result<()> {
        let mut file = BufWriter::new(File::create(filename)?);
        writeln!(file, "# s x y z (cm)\tv_x v_y v_z\trho_x rho_y rho_z (cm)\tB_x B_y B_z (T)\tE_c (eV)\tbeta_x beta_y (cm)\tsigma_x sigma_y (cm)\tsigma_x' sigma_y' (rad)")?;
        for pt in trajectory.points.iter() {
            let o = &pt.optics;
            writeln!(file,
                "{:.9e}\t{:.9e}\t{:.9e}\t{:.9e}\t{:.9e}\t{:.9e}\t{:.9e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}",
                pt.s, pt.position[0], pt.position[1], pt.position[2],
                pt.direction[0], pt.direction[1], pt.direction[2],
                pt.rho[0], pt.rho[1], pt.rho[2],
                pt.b[0], pt.b[1], pt.b[2],
                pt.critical_energy,
                o.beta_x, o.beta_y,
                o.sigma_x, o.sigma_y,
                o.sigma_x_prime, o.sigma_y_prime,
            )?;
        }
        file.flush()
    };
    write().map_err(|e| OutputError::write(filename, e))
}

/// Writes the photons, one per line, to `filename`.
pub fn write_photons(photons: &[Photon], filename: &str) -> Result<(), OutputError> {
    let write = || -> std::io::Result<()> {
        let mut file = BufWriter::new(File::create(filename)?);
        writeln!(file, "# E (eV)\tx y z (cm)\tv_x v_y v_z\tpsi chi (rad)\tpol\tflux (1/s)\tpower (W)\tindex")?;
        for ph in photons.iter() {
            writeln!(file, "{}", ph)?;
        }
        file.flush()
    };
    write().map_err(|e| OutputError::write(filename, e))
}
