//! Provides possible photon outputs

use crate::emission::Photon;
use super::PhotonOutput;

/// Returns the PhotonOutput and its unit.
pub fn identify(name: &str) -> Option<(PhotonOutput, &'static str)> {
    match name {
        "energy" => Some(
            (energy as PhotonOutput, "eV")
        ),
        "psi" => Some(
            (psi as PhotonOutput, "rad")
        ),
        "chi" => Some(
            (chi as PhotonOutput, "rad")
        ),
        "abs_psi" => Some(
            (abs_psi as PhotonOutput, "rad")
        ),
        "x" => Some(
            (x as PhotonOutput, "cm")
        ),
        "y" => Some(
            (y as PhotonOutput, "cm")
        ),
        "z" => Some(
            (z as PhotonOutput, "cm")
        ),
        "polarization" => Some(
            (polarization as PhotonOutput, "1")
        ),
        "index" => Some(
            (index as PhotonOutput, "1")
        ),
        _ => None,
    }
}

/// Returns the weight function and its unit.
pub fn identify_weight(name: &str) -> Option<(PhotonOutput, &'static str)> {
    match name {
        "unit" | "number" | "auto" => Some(
            (unit as PhotonOutput, "1")
        ),
        "flux" => Some(
            (flux as PhotonOutput, "1/s")
        ),
        "power" => Some(
            (power as PhotonOutput, "W")
        ),
        _ => None,
    }
}

pub fn energy(ph: &Photon) -> f64 {
    ph.energy
}

pub fn psi(ph: &Photon) -> f64 {
    ph.psi
}

pub fn chi(ph: &Photon) -> f64 {
    ph.chi
}

pub fn abs_psi(ph: &Photon) -> f64 {
    ph.psi.abs()
}

pub fn x(ph: &Photon) -> f64 {
    ph.position[0]
}

pub fn y(ph: &Photon) -> f64 {
    ph.position[1]
}

pub fn z(ph: &Photon) -> f64 {
    ph.position[2]
}

pub fn polarization(ph: &Photon) -> f64 {
    ph.polarization
}

pub fn index(ph: &Photon) -> f64 {
    ph.index as f64
}

pub fn unit(_ph: &Photon) -> f64 {
    1.0
}

pub fn flux(ph: &Photon) -> f64 {
    ph.flux
}

pub fn power(ph: &Photon) -> f64 {
    ph.power
}
