//! Trajectories of charged particles through magnetic lattices, and
//! the synchrotron radiation they emit.
//!
//! A [`region::Region`] integrates the reference trajectory through a
//! [`field::FieldSource`], recording the curvature, critical energy and
//! beam optics at each step. Photons are then generated along it by an
//! [`emission::PhotonGenerator`], which samples their energies from the
//! [`spectrum::SrSpectrum`] and their angles from tabulated psi and chi
//! distributions. A [`material::Material`] decides what happens to a
//! photon when it strikes a surface.

pub mod constants;
pub mod geometry;
pub mod interpolation;
pub mod distribution;
pub mod special_functions;
pub mod spectrum;
pub mod field;
pub mod region;
pub mod emission;
pub mod material;
pub mod input;
pub mod output;
