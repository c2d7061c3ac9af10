//! Physical constants and the fixed parameters of the trajectory
//! integrator.
//!
//! Unless stated otherwise, lengths are in cm, magnetic fields in T,
//! particle energies and masses in GeV and photon energies in eV.

/// Magnetic rigidity factor: a particle of energy E (GeV) in a field
/// B (T) has bending radius R = E / (BENDING_CONSTANT * B), in cm.
pub const BENDING_CONSTANT: f64 = 0.00299792458;
/// Critical energy prefactor, 3 hbar c / 2, in eV cm:
/// E_c = CRITICAL_ENERGY_COEFF * gamma^3 / rho.
pub const CRITICAL_ENERGY_COEFF: f64 = 2.96e-5;
/// Below this magnitude (in T) the field is treated as exactly zero
pub const VERY_SMALL: f64 = 1.0e-10;
/// Radius of curvature assigned to straight sections, in cm
pub const STRAIGHT_RADIUS: f64 = 1.0e30;
/// Default cap on the number of integration steps in a region
pub const MAX_STEPS: usize = 1_000_000;

/// Electron mass, units of GeV
pub const ELECTRON_MASS_GEV: f64 = 0.000510999;
/// Proton mass, units of GeV
pub const PROTON_MASS_GEV: f64 = 0.938272;
/// The absolute value of the electron charge, units of C
pub const ELEMENTARY_CHARGE: f64 = 1.602177e-19;
/// Fine-structure constant
pub const ALPHA_FINE: f64 = 7.29735257e-3;

/// The psi and chi tables are precomputed for this Lorentz factor
pub const REFERENCE_GAMMA: f64 = 10000.0;
