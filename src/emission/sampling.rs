//! Inversion of the tabulated psi and chi distributions.
//!
//! Both samplers assume well-formed tables: rows non-decreasing from
//! 0 to 1, as checked when the tables are built or loaded.

use crate::constants::*;
use crate::interpolation::{self, Edge};
use super::*;

/// Outcome of sampling the vertical angle
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PsiSample {
    /// Vertical angle, multiplied by the Lorentz factor
    pub gamma_psi: f64,
    /// Fraction of the radiation at this angle in the selected
    /// polarization component; 1 if both are selected.
    pub polarization: f64,
}

/// Samples the magnitude of the vertical emission angle of a photon
/// with energy `lambda_ratio` times the critical energy, using the
/// uniform draw `rand`.
pub fn sample_psi(table: &PsiTable, pol_table: &PolarizationTable, lambda_ratio: f64, selector: Polarization, rand: f64) -> PsiSample {
    let m = table.matrix();
    let (row, frac) = row_position(lambda_ratio.log10(), PSI_LOG_MIN, PSI_LOG_STEP, m.rows());

    let b = interpolation::locate(m.cols(), rand, |k| m.row_lerp(row, frac, k), Edge::Clamp);
    let gamma_psi = psi_angle(b.position(), lambda_ratio);

    let polarization = match selector {
        Polarization::Full => 1.0,
        _ => {
            let p = pol_table.matrix();
            let parallel = b.blend(p.row_lerp(row, frac, b.index), p.row_lerp(row, frac, b.index + 1));
            if selector == Polarization::Parallel {parallel} else {1.0 - parallel}
        }
    };

    PsiSample {gamma_psi, polarization}
}

/// Samples the magnitude of the horizontal emission angle (rad) of a
/// photon emitted at vertical angle `psi` (rad) by a particle with
/// Lorentz factor `gamma`, using the uniform draw `rand`. A second,
/// independent draw `spread` places the angle within a bin that holds
/// no probability, which `rand` can only reach at the clamped ends of
/// the table.
///
/// Within the first bin, the CDF is taken to be linear; elsewhere it is
/// inverted by quadratic interpolation through the bracketing column
/// and its two neighbours.
pub fn sample_chi(table: &ChiTable, psi: f64, gamma: f64, rand: f64, spread: f64) -> f64 {
    let m = table.matrix();
    let psi_relative = (psi.abs() * gamma / REFERENCE_GAMMA).log10();
    let (row, frac) = row_position(psi_relative, CHI_LOG_MIN, CHI_LOG_STEP, m.rows());
    let cdf = |k: usize| m.row_lerp(row, frac, k);

    let b = interpolation::locate(m.cols(), rand, cdf, Edge::Clamp);
    let i = b.index;
    let (f0, f1) = (cdf(i), cdf(i + 1));

    let angle = if f0 == f1 {
        // no probability in this bin: uniform across it
        interpolation::lerp(chi_angle(i), chi_angle(i + 1), spread)
    } else if i == 0 {
        interpolation::linear_inverse(rand, 0.0, CHI_FIRST_ANGLE, f0, f1)
    } else {
        interpolation::quadratic_interpolate_x(
            rand,
            chi_angle(i - 1), chi_angle(i), chi_angle(i + 1),
            cdf(i - 1), f0, f1,
        )
    };

    angle * REFERENCE_GAMMA / gamma
}

#[cfg(test)]
mod tests {
    use rand::prelude::*;
    use rand_xoshiro::*;
    use crate::distribution::CdfMatrix;
    use super::*;

    /// A psi table in which the angle index is uniform in [0, 10] at
    /// every energy.
    fn uniform_psi() -> (PsiTable, PolarizationTable) {
        let psi = CdfMatrix::from_fn("psi", PSI_ROWS, 11, |_| (0..11).map(|k| 0.1 * k as f64).collect()).unwrap();
        let pol = CdfMatrix::from_fn("pol", PSI_ROWS, 11, |_| (0..11).map(|k| 1.0 - 0.05 * k as f64).collect()).unwrap();
        (PsiTable::new(psi).unwrap(), PolarizationTable::new(pol).unwrap())
    }

    #[test]
    fn psi_inversion() {
        let (psi, pol) = uniform_psi();
        let sample = sample_psi(&psi, &pol, 1.0, Polarization::Full, 0.25);
        println!("{:?}", sample);
        // index 2.5
        assert!((sample.gamma_psi - 2.5 * 0.02).abs() < 1.0e-12);
        assert_eq!(sample.polarization, 1.0);

        // the angle scale shrinks with energy
        let sample = sample_psi(&psi, &pol, 10.0, Polarization::Parallel, 0.25);
        assert!((sample.gamma_psi - 0.05 / 10f64.powf(0.35)).abs() < 1.0e-12);
        assert!((sample.polarization - 0.875).abs() < 1.0e-12);
        let sample = sample_psi(&psi, &pol, 10.0, Polarization::Orthogonal, 0.25);
        assert!((sample.polarization - 0.125).abs() < 1.0e-12);

        // energies beyond the table use its last row
        let sample = sample_psi(&psi, &pol, 1.0e4, Polarization::Full, 0.999);
        assert!((sample.gamma_psi - psi_angle(9.99, 1.0e4)).abs() < 1.0e-12);
    }

    #[test]
    fn psi_schwinger_median() {
        // median of gamma psi, from direct integration of the
        // Schwinger distribution
        let psi = PsiTable::tabulate_with(PSI_COLUMNS, 4).unwrap();
        let pol = PolarizationTable::tabulate(PSI_COLUMNS).unwrap();
        for &(ratio, median) in [(1.0, 0.4222632138), (0.01, 2.7177683314), (10.0, 0.1266267082)].iter() {
            let sample = sample_psi(&psi, &pol, ratio, Polarization::Full, 0.5);
            let error = (sample.gamma_psi - median).abs() / median;
            println!("E/E_c = {:.2e}: median gamma psi = {:.6}, expected {:.6}, error = {:.3e}", ratio, sample.gamma_psi, median, error);
            assert!(error < 1.0e-3);
        }

        // integrated over angle, 88% of the radiation at E = E_c is
        // polarized parallel to the orbit plane
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        let n = 100_000;
        let parallel = (0..n)
            .map(|_| sample_psi(&psi, &pol, 1.0, Polarization::Parallel, rng.gen()).polarization)
            .sum::<f64>() / (n as f64);
        println!("parallel fraction = {:.4}, expected 0.8795", parallel);
        assert!((parallel - 0.8795).abs() < 5.0e-3);
    }

    /// Chi uniformly distributed in log10(chi) over [-7, 0]
    fn log_uniform_chi() -> ChiTable {
        let row: Vec<f64> = (0..CHI_COLUMNS)
            .map(|k| if k == 0 {0.0} else {(chi_angle(k).log10() + 7.0) / 7.0})
            .collect();
        let m = CdfMatrix::from_fn("chi", CHI_ROWS, CHI_COLUMNS, |_| row.clone()).unwrap();
        ChiTable::new(m).unwrap()
    }

    #[test]
    fn chi_inversion() {
        let table = log_uniform_chi();
        let gamma = 5000.0;
        // (cdf, chi for gamma = 10000)
        let cases = [
            (0.5, 10f64.powf(-3.5)),
            (0.25, 10f64.powf(-5.25)),
            (0.9, 10f64.powf(-0.7)),
        ];
        for &(cdf, expected) in cases.iter() {
            let chi = sample_chi(&table, 1.0e-4, gamma, cdf, 0.5);
            let expected = expected * REFERENCE_GAMMA / gamma;
            println!("cdf = {:.2}: chi = {:.6e}, expected {:.6e}", cdf, chi, expected);
            // the CDF is quadratic in chi between columns only approximately
            assert!((chi - expected).abs() < 5.0e-3 * expected);
        }
    }

    #[test]
    fn chi_first_bin() {
        let table = log_uniform_chi();
        // CDF rises linearly from 0 over the first bin
        let f1 = table.matrix().get(0, 1);
        let chi = sample_chi(&table, 0.0, REFERENCE_GAMMA, 0.5 * f1, 0.5);
        println!("f1 = {:.9e}, chi = {:.6e}", f1, chi);
        assert!((f1 - 0.04 / 7.0).abs() < 1.0e-6 * f1);
        assert!((chi - 0.5 * CHI_FIRST_ANGLE).abs() < 1.0e-12 * CHI_FIRST_ANGLE);
        let chi = sample_chi(&table, 0.0, REFERENCE_GAMMA, 0.0, 0.5);
        assert_eq!(chi, 0.0);
    }

    #[test]
    fn chi_flat_bin() {
        // all the probability lies below the second column
        let row: Vec<f64> = (0..CHI_COLUMNS).map(|k| if k == 0 {0.0} else {1.0}).collect();
        let m = CdfMatrix::from_fn("chi", CHI_ROWS, CHI_COLUMNS, |_| row.clone()).unwrap();
        let table = ChiTable::new(m).unwrap();
        let chi = sample_chi(&table, 1.0e-3, REFERENCE_GAMMA, 0.3, 0.9);
        assert!((chi - 0.3 * CHI_FIRST_ANGLE).abs() < 1.0e-12 * CHI_FIRST_ANGLE);

        // a draw at the top of the CDF lands in the last bin, placed
        // across it by the second draw
        let (lo, hi) = (chi_angle(CHI_COLUMNS - 2), chi_angle(CHI_COLUMNS - 1));
        for &spread in [0.0, 0.25, 0.75].iter() {
            let chi = sample_chi(&table, 1.0e-3, REFERENCE_GAMMA, 1.0, spread);
            println!("spread = {:.2}: chi = {:.6e}", spread, chi);
            assert!((chi - (lo + spread * (hi - lo))).abs() < 1.0e-12 * hi);
        }
    }
}
