//! Tabulated angular distributions of synchrotron radiation.
//!
//! The psi table is indexed by log10(E/E_c), in steps of 0.1 over
//! [-10, 2], and by an angle index `k`, which corresponds to
//! `gamma psi = k * 0.005 * 4 / (E/E_c)^0.35`. The chi table is indexed
//! by log10 of the vertical angle of a particle with Lorentz factor
//! 10000, in steps of 0.02 over [-7, 0], and by the angles
//! `0, 10^(-7 + 0.04 k)` for `k >= 1`.

use std::path::Path;

use crate::distribution::{CdfMatrix, TableError};
use crate::special_functions::BesselK;

/// log10(E/E_c) of the first psi row
pub const PSI_LOG_MIN: f64 = -10.0;
/// Spacing of the psi rows in log10(E/E_c)
pub const PSI_LOG_STEP: f64 = 0.1;
pub const PSI_ROWS: usize = 121;
/// Default number of angle columns in a tabulated psi table
pub const PSI_COLUMNS: usize = 250;

/// log10 of the normalized vertical angle of the first chi row
pub const CHI_LOG_MIN: f64 = -7.0;
/// Spacing of the chi rows
pub const CHI_LOG_STEP: f64 = 0.02;
pub const CHI_ROWS: usize = 351;
/// Spacing of the chi angle columns, in log10(angle)
pub const CHI_ANGLE_STEP: f64 = 0.04;
/// Number of chi angle columns, which then span 0 to 1 rad
pub const CHI_COLUMNS: usize = 176;
/// The first non-zero chi angle, 10^(-7 + 0.04)
pub const CHI_FIRST_ANGLE: f64 = 1.0964782e-7;

/// `gamma psi` at the angle index `index` of the row for `lambda_ratio`
pub fn psi_angle(index: f64, lambda_ratio: f64) -> f64 {
    index * 0.005 * (4.0 / lambda_ratio.powf(0.35))
}

/// Angle (rad, for Lorentz factor 10000) of chi column `k`
pub fn chi_angle(k: usize) -> f64 {
    match k {
        0 => 0.0,
        1 => CHI_FIRST_ANGLE,
        _ => 10f64.powf(CHI_LOG_MIN + CHI_ANGLE_STEP * (k as f64)),
    }
}

/// Fractional row position of `value` in a table whose rows start at
/// `min` and are separated by `step`, clamped to the table.
pub(crate) fn row_position(value: f64, min: f64, step: f64, rows: usize) -> (usize, f64) {
    let pos = (value - min) / step;
    let pos = if pos.is_nan() {0.0} else {pos.max(0.0).min((rows - 1) as f64)};
    let row = (pos.floor() as usize).min(rows - 1);
    (row, pos - row as f64)
}

/// The Schwinger distribution of radiation in `X = gamma psi`, at
/// `y = E/E_c`, split into its parallel and orthogonal parts.
fn schwinger(y: f64, x: f64) -> (f64, f64) {
    let u = 1.0 + x * x;
    let xi = 0.5 * y * u.powf(1.5);
    let k2_3 = xi.bessel_k_2_3().unwrap_or(0.0);
    let k1_3 = xi.bessel_k_1_3().unwrap_or(0.0);
    let prefactor = y * y * u * u;
    (prefactor * k2_3 * k2_3, prefactor * k1_3 * k1_3 * x * x / u)
}

fn check_shape(name: &str, matrix: &CdfMatrix, rows: usize) -> Result<(), TableError> {
    if matrix.rows() != rows {
        return Err(TableError::Shape(format!("{} (rows)", name), rows, matrix.rows()));
    }
    match (0..matrix.rows()).find(|i| matrix.row(*i).windows(2).any(|w| w[1] < w[0])) {
        Some(i) => Err(TableError::NotAscending(format!("{} (row {})", name, i), 0)),
        None => Ok(()),
    }
}

/// Normalizes a running integral to a CDF
fn normalize(name: &str, row: usize, mut cdf: Vec<f64>) -> Result<Vec<f64>, TableError> {
    let total = cdf.last().copied().unwrap_or(0.0);
    if !(total > 0.0 && total.is_finite()) {
        return Err(TableError::Missing(name.to_owned(), format!("probability in row {}", row)));
    }
    cdf.iter_mut().for_each(|c| *c /= total);
    Ok(cdf)
}

/// Cumulative distributions of the vertical emission angle, one per
/// photon energy.
#[derive(Clone, Debug)]
pub struct PsiTable {
    cdf: CdfMatrix,
}

impl PsiTable {
    /// Wraps a precomputed matrix, which must have one row per energy.
    pub fn new(cdf: CdfMatrix) -> Result<Self, TableError> {
        check_shape("psi", &cdf, PSI_ROWS)?;
        Ok(PsiTable {cdf})
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        Self::new(CdfMatrix::from_file("psi", path)?)
    }

    /// Integrates the Schwinger distribution to obtain the table, with
    /// the default number of columns.
    pub fn tabulate() -> Result<Self, TableError> {
        Self::tabulate_with(PSI_COLUMNS, 4)
    }

    /// Integrates the Schwinger distribution over `columns` angles by
    /// the trapezoidal rule, with `substeps` intervals per column.
    pub fn tabulate_with(columns: usize, substeps: usize) -> Result<Self, TableError> {
        let substeps = substeps.max(1);
        let cdf = CdfMatrix::from_fn("psi", PSI_ROWS, columns, |i| {
            let y = 10f64.powf(PSI_LOG_MIN + PSI_LOG_STEP * (i as f64));
            let scale = psi_angle(1.0, y);
            let h = scale / (substeps as f64);
            let pdf = |x: f64| {let (par, orth) = schwinger(y, x); par + orth};

            let mut sum = 0.0;
            let mut prev = pdf(0.0);
            let mut row = Vec::with_capacity(columns);
            row.push(0.0);
            for k in 1..columns {
                for j in 1..=substeps {
                    let x = scale * ((k - 1) as f64) + h * (j as f64);
                    let next = pdf(x);
                    sum += 0.5 * (prev + next) * h;
                    prev = next;
                }
                row.push(sum);
            }
            row
        })?;

        let rows: Result<Vec<Vec<f64>>, TableError> = (0..cdf.rows())
            .map(|i| normalize("psi", i, cdf.row(i).to_vec()))
            .collect();
        let data = rows?.concat();
        Self::new(CdfMatrix::from_flat("psi", PSI_ROWS, columns, data)?)
    }

    pub fn matrix(&self) -> &CdfMatrix {
        &self.cdf
    }
}

/// Fraction of the radiation, at each energy and angle of the psi
/// table, that is polarized parallel to the orbit plane.
#[derive(Clone, Debug)]
pub struct PolarizationTable {
    fraction: CdfMatrix,
}

impl PolarizationTable {
    pub fn new(fraction: CdfMatrix) -> Result<Self, TableError> {
        if fraction.rows() != PSI_ROWS {
            return Err(TableError::Shape("polarization (rows)".to_owned(), PSI_ROWS, fraction.rows()));
        }
        Ok(PolarizationTable {fraction})
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        Self::new(CdfMatrix::from_file("polarization", path)?)
    }

    /// Evaluates the parallel fraction on the same grid as a psi table
    /// with `columns` columns.
    pub fn tabulate(columns: usize) -> Result<Self, TableError> {
        let fraction = CdfMatrix::from_fn("polarization", PSI_ROWS, columns, |i| {
            let y = 10f64.powf(PSI_LOG_MIN + PSI_LOG_STEP * (i as f64));
            (0..columns)
                .map(|k| {
                    let (par, orth) = schwinger(y, psi_angle(k as f64, y));
                    // far in the tail both parts underflow
                    if par + orth > 0.0 {par / (par + orth)} else {0.5}
                })
                .collect()
        })?;
        Self::new(fraction)
    }

    pub fn matrix(&self) -> &CdfMatrix {
        &self.fraction
    }
}

/// Cumulative distributions of the horizontal emission angle, one per
/// vertical angle.
#[derive(Clone, Debug)]
pub struct ChiTable {
    cdf: CdfMatrix,
}

impl ChiTable {
    pub fn new(cdf: CdfMatrix) -> Result<Self, TableError> {
        check_shape("chi", &cdf, CHI_ROWS)?;
        Ok(ChiTable {cdf})
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        Self::new(CdfMatrix::from_file("chi", path)?)
    }

    /// Integrates `pdf(psi, chi)`, where both angles are in rad for a
    /// Lorentz factor of 10000, over the chi columns, using `substeps`
    /// trapezoids per column.
    pub fn tabulate<F>(pdf: F, substeps: usize) -> Result<Self, TableError>
    where F: Fn(f64, f64) -> f64 {
        let substeps = substeps.max(1);
        let mut data = Vec::with_capacity(CHI_ROWS * CHI_COLUMNS);

        for i in 0..CHI_ROWS {
            let psi = 10f64.powf(CHI_LOG_MIN + CHI_LOG_STEP * (i as f64));
            let mut sum = 0.0;
            let mut prev = pdf(psi, 0.0);
            let mut row = vec![0.0];
            for k in 1..CHI_COLUMNS {
                let (lo, hi) = (chi_angle(k - 1), chi_angle(k));
                let h = (hi - lo) / (substeps as f64);
                for j in 1..=substeps {
                    let next = pdf(psi, lo + h * (j as f64));
                    sum += 0.5 * (prev + next) * h;
                    prev = next;
                }
                row.push(sum);
            }
            data.extend(normalize("chi", i, row)?);
        }

        Self::new(CdfMatrix::from_flat("chi", CHI_ROWS, CHI_COLUMNS, data)?)
    }

    pub fn matrix(&self) -> &CdfMatrix {
        &self.cdf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_grids() {
        assert_eq!(chi_angle(0), 0.0);
        assert!((chi_angle(2) / 10f64.powf(-6.92) - 1.0).abs() < 1.0e-12);
        assert!(((10f64.powf(-6.96) - CHI_FIRST_ANGLE) / CHI_FIRST_ANGLE).abs() < 1.0e-7);
        assert!((chi_angle(CHI_COLUMNS - 1) - 1.0).abs() < 1.0e-12);
        assert!((psi_angle(10.0, 1.0) - 0.2).abs() < 1.0e-15);
        assert_eq!(row_position(-20.0, PSI_LOG_MIN, PSI_LOG_STEP, PSI_ROWS), (0, 0.0));
        assert_eq!(row_position(5.0, PSI_LOG_MIN, PSI_LOG_STEP, PSI_ROWS), (PSI_ROWS - 1, 0.0));
        let (row, frac) = row_position(-9.85, PSI_LOG_MIN, PSI_LOG_STEP, PSI_ROWS);
        assert_eq!(row, 1);
        assert!((frac - 0.5).abs() < 1.0e-9);
    }

    #[test]
    fn polarization_on_axis() {
        // at psi = 0 the radiation is entirely parallel polarized
        let table = PolarizationTable::tabulate(40).unwrap();
        let m = table.matrix();
        for i in 0..PSI_ROWS {
            assert!((m.get(i, 0) - 1.0).abs() < 1.0e-12);
            assert!(m.row(i).iter().all(|f| *f >= 0.0 && *f <= 1.0));
        }
        println!("parallel fraction at E = E_c, gamma psi = 0.4: {:.4}", m.get(100, 20));
        assert!(m.get(100, 20) < 1.0);
    }

    #[test]
    fn chi_from_pdf() {
        // chi uniform on [0, psi]
        let table = ChiTable::tabulate(|psi, chi| if chi <= psi {1.0} else {0.0}, 2).unwrap();
        let m = table.matrix();
        assert!(m.is_row_monotone());
        assert!((0..CHI_ROWS).all(|i| m.get(i, 0) == 0.0 && m.get(i, CHI_COLUMNS - 1) == 1.0));
        assert!(ChiTable::tabulate(|_, _| 0.0, 1).is_err());
    }

    #[test]
    fn rejects_wrong_shape() {
        let m = CdfMatrix::from_flat("psi", 2, 2, vec![0.0, 1.0, 0.0, 1.0]).unwrap();
        let err = PsiTable::new(m.clone()).unwrap_err();
        println!("{}", err);
        assert!(ChiTable::new(m.clone()).is_err());
        assert!(PolarizationTable::new(m).is_err());
        let m = CdfMatrix::from_fn("psi", PSI_ROWS, 3, |i| if i == 7 {vec![0.0, 0.6, 0.5]} else {vec![0.0, 0.5, 1.0]}).unwrap();
        let err = PsiTable::new(m).unwrap_err();
        println!("{}", err);
        assert!(format!("{}", err).contains("row 7"));
    }
}
