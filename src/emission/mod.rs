//! Photon emission along the trajectory: angular distributions,
//! polarization and the generation of weighted photons

mod tables;
mod sampling;
mod generator;

pub use self::tables::*;
pub use self::sampling::*;
pub use self::generator::*;

/// Which polarization component of the radiation is generated
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Polarization {
    /// Both components
    Full,
    /// Electric field parallel to the orbit plane
    Parallel,
    /// Electric field orthogonal to the orbit plane
    Orthogonal,
}

impl Default for Polarization {
    fn default() -> Self {
        Polarization::Full
    }
}

impl std::str::FromStr for Polarization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" | "both" => Ok(Polarization::Full),
            "parallel" => Ok(Polarization::Parallel),
            "orthogonal" | "perpendicular" => Ok(Polarization::Orthogonal),
            _ => Err(format!("'{}' is not a polarization component, expected 'full', 'parallel' or 'orthogonal'", s)),
        }
    }
}
