//! Weighted, fixed-bin histograms for accumulating sampled quantities

use std::fmt;
use std::fs::File;
use std::io::Write;

use super::Distribution2D;

/// How bins are laid out between the minimum and maximum
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BinSpec {
    /// Equal widths in x
    Linear,
    /// Equal widths in log10(x); requires a positive range
    LogScaled,
}

impl From<&str> for BinSpec {
    fn from(s: &str) -> Self {
        match s {
            "log" | "log10" => BinSpec::LogScaled,
            _ => BinSpec::Linear,
        }
    }
}

impl fmt::Display for BinSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinSpec::Linear => write!(f, "linear"),
            BinSpec::LogScaled => write!(f, "log"),
        }
    }
}

/// A one-dimensional histogram with a fixed number of bins.
/// Samples outside `[min, max)` are tallied separately.
#[derive(Clone, Debug)]
pub struct Histogram {
    min: f64,
    max: f64,
    bspec: BinSpec,
    cts: Vec<f64>,
    underflow: f64,
    overflow: f64,
    name: String,
    unit: String,
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Histogram \"{}\" [\"{}\"] {{", self.name, self.unit)?;
        writeln!(f, "\tmin = {:e}, max = {:e}, {} {} bins", self.min, self.max, self.cts.len(), self.bspec)?;
        writeln!(f, "\ttotal = {:e}, underflow = {:e}, overflow = {:e}", self.total(), self.underflow, self.overflow)?;
        write!(f, "}}")
    }
}

impl Histogram {
    /// Creates an empty histogram.
    ///
    /// # Panics
    /// If `nbins` is zero, `max <= min`, or if a log-scaled histogram
    /// is requested for a non-positive range.
    pub fn new(name: &str, unit: &str, min: f64, max: f64, nbins: usize, bspec: BinSpec) -> Self {
        assert!(nbins > 0 && max > min);
        if bspec == BinSpec::LogScaled {
            assert!(min > 0.0);
        }
        Histogram {
            min,
            max,
            bspec,
            cts: vec![0.0; nbins],
            underflow: 0.0,
            overflow: 0.0,
            name: name.to_owned(),
            unit: unit.to_owned(),
        }
    }

    fn scaled(&self, x: f64) -> f64 {
        match self.bspec {
            BinSpec::Linear => x,
            BinSpec::LogScaled => x.log10(),
        }
    }

    fn unscaled(&self, s: f64) -> f64 {
        match self.bspec {
            BinSpec::Linear => s,
            BinSpec::LogScaled => 10f64.powf(s),
        }
    }

    /// Width of a bin, in scaled units
    fn bin_size(&self) -> f64 {
        (self.scaled(self.max) - self.scaled(self.min)) / (self.cts.len() as f64)
    }

    /// Adds `weight` to the bin containing `x`.
    pub fn add(&mut self, x: f64, weight: f64) {
        if !(x >= self.min) {
            self.underflow += weight;
        } else if x >= self.max {
            self.overflow += weight;
        } else {
            let s = (self.scaled(x) - self.scaled(self.min)) / self.bin_size();
            let i = (s.floor() as usize).min(self.cts.len() - 1);
            self.cts[i] += weight;
        }
    }

    pub fn counts(&self) -> &[f64] {
        &self.cts
    }

    /// Sum of the weights in range
    pub fn total(&self) -> f64 {
        self.cts.iter().sum()
    }

    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Centre of the `i`th bin
    pub fn centre(&self, i: usize) -> f64 {
        let s = self.scaled(self.min) + (0.5 + i as f64) * self.bin_size();
        self.unscaled(s)
    }

    /// Upper edge of the `i`th bin
    pub fn upper_edge(&self, i: usize) -> f64 {
        let s = self.scaled(self.min) + (1.0 + i as f64) * self.bin_size();
        self.unscaled(s)
    }

    /// Bin centres against bin contents
    pub fn to_distribution(&self) -> Distribution2D {
        let mut dstr = Distribution2D::new(self.cts.len());
        for (i, ct) in self.cts.iter().enumerate() {
            dstr.set(i, self.centre(i), *ct);
        }
        dstr
    }

    /// Normalized cumulative distribution: upper bin edges against
    /// the fraction of the in-range weight below them. Returns `None`
    /// if the histogram is empty.
    pub fn cumulative(&self) -> Option<Distribution2D> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        let mut dstr = Distribution2D::new(self.cts.len());
        let mut sum = 0.0;
        for (i, ct) in self.cts.iter().enumerate() {
            sum += ct;
            dstr.set(i, self.upper_edge(i), sum / total);
        }
        Some(dstr)
    }

    /// Writes the histogram to file.
    /// The relevant extension is added to `filename`.
    pub fn write_plain_text(&self, filename: &str) -> std::io::Result<()> {
        let filename = format!("{}.dat", filename);
        let mut file = File::create(filename)?;
        writeln!(file, "{}\t{}", self.name, "weight")?;
        writeln!(file, "{}\t{}", self.unit, "1")?;
        for (i, ct) in self.cts.iter().enumerate() {
            writeln!(file, "{:.9e}\t{:.9e}", self.centre(i), ct)?;
        }
        Ok(())
    }
}
