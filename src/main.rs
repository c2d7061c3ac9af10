use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;

use colored::Colorize;
use rand::prelude::*;
use rand_xoshiro::*;

use synrad::constants::*;
use synrad::distribution::Distribution2D;
use synrad::emission::*;
use synrad::field::*;
use synrad::geometry::ThreeVector;
use synrad::input::*;
use synrad::material::{Material, Interaction};
use synrad::output::{self, DistributionFunction};
use synrad::region::*;
use synrad::spectrum::*;

/// Number of progress reports printed while generating photons
const PROGRESS_REPORTS: usize = 10;

fn read_beam(input: &Config) -> Result<ParticleBeam, InputError> {
    // energies in the input file are in eV
    let energy: f64 = input.read("beam:energy")?;
    let mass = input.read_optional::<f64, _>("beam:mass")?.unwrap_or(ELECTRON_MASS_GEV * 1.0e9);
    let current = input.read_optional::<f64, _>("beam:current")?.unwrap_or(1.0);
    let emittance = input.read_optional::<f64, _>("beam:emittance")?.unwrap_or(0.0);
    let coupling = input.read_optional::<f64, _>("beam:coupling")?.unwrap_or(0.0);
    let spread = input.read_optional::<f64, _>("beam:energy_spread")?.unwrap_or(0.0);

    let beam = ParticleBeam::new(1.0e-9 * energy, 1.0e-9 * mass)
        .with_current(current)
        .with_emittance(emittance, coupling)
        .with_energy_spread(spread);

    Ok(beam)
}

/// Reads how one Cartesian component of the field varies, from `path`,
/// which may hold a number, or a `periodic`, `expr` or `file` block.
fn read_axis_profile(input: &Config, path: &str) -> Result<AxisProfile, InputError> {
    let periodic = format!("{}:periodic", path);
    let expr = format!("{}:expr", path);
    let file = format!("{}:file", path);

    if let Some(period) = input.read_optional::<f64, _>(format!("{}:period", periodic))? {
        if !(period > 0.0) {
            return Err(InputError::invalid(&periodic, "period must be positive"));
        }
        Ok(AxisProfile::Periodic {
            period,
            phase: input.read_optional(format!("{}:phase", periodic))?.unwrap_or(0.0),
            offset: input.read_optional(format!("{}:offset", periodic))?.unwrap_or(0.0),
            sin: input.read_optional(format!("{}:sin", periodic))?.unwrap_or_default(),
            cos: input.read_optional(format!("{}:cos", periodic))?.unwrap_or_default(),
        })
    } else if input.read_optional::<String, _>(&expr)?.is_some() {
        // tabulate a function of the path length s
        let length: f64 = input.read(format!("{}:length", path))?;
        let points = input.read_optional::<usize, _>(format!("{}:points", path))?.unwrap_or(1000);
        if !(length > 0.0) || points < 2 {
            return Err(InputError::invalid(path, "expression needs a positive length and at least 2 points"));
        }
        let f = input.func(expr.as_str(), "s")?;
        let mut x = Vec::with_capacity(points);
        let mut y = Vec::with_capacity(points);
        for i in 0..points {
            let s = length * (i as f64) / ((points - 1) as f64);
            let b = f(s).ok_or_else(|| InputError::invalid(&expr, &format!("could not be evaluated at s = {:e}", s)))?;
            x.push(s);
            y.push(b);
        }
        let table = Distribution2D::from_pairs(path, x, y)
            .map_err(|e| InputError::invalid(path, &e.to_string()))?;
        Ok(AxisProfile::AlongBeam(table))
    } else if let Some(filename) = input.read_optional::<String, _>(&file)? {
        let table = Distribution2D::from_file(path, &filename)
            .map_err(|e| InputError::invalid(&file, &e.to_string()))?;
        let along = format!("{}:along", path);
        // 'beam' or absent means tabulated against path length
        match input.read::<ThreeVector, _>(&along) {
            Ok(direction) => {
                let direction = direction.try_normalize()
                    .ok_or_else(|| InputError::invalid(&along, "must be a non-zero vector"))?;
                let origin = input.read_optional(format!("{}:origin", path))?.unwrap_or_else(ThreeVector::zero);
                Ok(AxisProfile::AlongDirection {origin, direction, table})
            },
            Err(e) if e.kind() == InputErrorKind::Location => Ok(AxisProfile::AlongBeam(table)),
            Err(e) => match input.read::<String, _>(&along) {
                Ok(ref s) if s == "beam" => Ok(AxisProfile::AlongBeam(table)),
                _ => Err(e),
            },
        }
    } else {
        let b = input.read_optional::<f64, _>(path)?;
        Ok(b.map_or(AxisProfile::Zero, AxisProfile::Constant))
    }
}

fn read_field(input: &Config) -> Result<FieldSource, InputError> {
    let kind: String = input.read("region:field:type")?;

    let axis = || -> Result<ThreeVector, InputError> {
        let axis: ThreeVector = input.read("region:field:axis")?;
        axis.try_normalize().ok_or_else(|| InputError::invalid("region:field:axis", "must be a non-zero vector"))
    };

    let field: FieldSource = match kind.to_lowercase().as_str() {
        "uniform" | "constant" => {
            let b: ThreeVector = input.read("region:field:b")?;
            UniformField::new(b).into()
        },
        "composite" => {
            let x = read_axis_profile(input, "region:field:x")?;
            let y = read_axis_profile(input, "region:field:y")?;
            let z = read_axis_profile(input, "region:field:z")?;
            CompositeField::new(x, y, z).into()
        },
        "helicoidal" | "helical" => {
            let period: f64 = input.read("region:field:period")?;
            if !(period > 0.0) {
                return Err(InputError::invalid("region:field:period", "must be positive"));
            }
            HelicoidalField::new(
                input.read_optional("region:field:origin")?.unwrap_or_else(ThreeVector::zero),
                axis()?,
                period,
                input.read("region:field:amplitude")?,
                input.read_optional("region:field:phase")?.unwrap_or(0.0),
            ).into()
        },
        "quadrupole" => {
            QuadrupoleField::new(
                input.read("region:field:centre")?,
                axis()?,
                input.read_optional("region:field:rotation")?.unwrap_or(0.0),
                input.read("region:field:gradient")?,
                input.read("region:field:length")?,
            ).into()
        },
        _ => return Err(InputError::invalid("region:field:type", "expected one of 'uniform', 'composite', 'helicoidal' or 'quadrupole'")),
    };

    Ok(field)
}

fn read_optics(input: &Config) -> Result<Optics, InputError> {
    if let Some(filename) = input.read_optional::<String, _>("optics:file")? {
        let table = LatticeTable::from_file("optics", &filename)
            .map_err(|e| InputError::invalid("optics:file", &e.to_string()))?;
        let key: String = input.read_optional("optics:key")?.unwrap_or_else(|| "s".to_owned());
        let key = match key.as_str() {
            "s" => LatticeKey::PathLength,
            "x" => LatticeKey::Coordinate(0),
            "y" => LatticeKey::Coordinate(1),
            "z" => LatticeKey::Coordinate(2),
            _ => return Err(InputError::invalid("optics:key", "expected one of 's', 'x', 'y' or 'z'")),
        };
        return Ok(Optics::Lattice {table, key});
    }

    match input.read_optional::<[f64; 2], _>("optics:beta")? {
        None => Ok(Optics::Ideal),
        Some([beta_x, beta_y]) => {
            let [alpha_x, alpha_y] = input.read_optional("optics:alpha")?.unwrap_or([0.0, 0.0]);
            let twiss = Twiss::new(beta_x, beta_y)
                .with_alpha(alpha_x, alpha_y)
                .with_dispersion(
                    input.read_optional("optics:eta")?.unwrap_or(0.0),
                    input.read_optional("optics:eta_prime")?.unwrap_or(0.0),
                );
            Ok(Optics::Constant(twiss))
        },
    }
}

fn read_region(input: &Config) -> Result<Region, InputError> {
    let beam = read_beam(input)?;
    let field = read_field(input)?;
    let optics = read_optics(input)?;

    let params = RegionParams::new(
        input.read("region:start")?,
        input.read("region:direction")?,
        input.read("region:step")?,
        input.read("region:limits")?,
        beam,
        field,
        optics,
    )?;

    let params = match input.read_optional::<usize, _>("region:max_steps")? {
        Some(n) => params.with_max_steps(n)?,
        None => params,
    };

    let polarization = input.read_optional("generation:polarization")?.unwrap_or_default();

    Ok(Region::new(params.with_polarization(polarization)))
}

fn load_table<T, F>(input: &Config, path: &str, load: F) -> Result<Option<T>, Box<dyn Error>>
where F: Fn(&Path) -> Result<T, synrad::distribution::TableError> {
    match input.read_optional::<String, _>(path)? {
        Some(filename) => {
            println!("{} {} from {}...", "Loading".bold().cyan(), path, filename.bold().blue());
            Ok(Some(load(Path::new(&filename))?))
        },
        None => Ok(None),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    let path = args.get(1).map(PathBuf::from).ok_or_else(InputError::file)?;

    println!("{} v{}, {}", "synrad".bold(), env!("CARGO_PKG_VERSION"), option_env!("VERGEN_SHA_SHORT").unwrap_or("unknown"));
    println!("{} configuration from {}...", "Reading".bold().cyan(), path.display().to_string().bold().blue());

    let mut input = Config::from_file(&path)?;
    input.with_context("constants")?;

    let seed = input.read_optional::<u64, _>("control:seed")?.unwrap_or(0);
    let num: usize = input.read("control:photons")?;
    let prefix = input.read_optional::<String, _>("control:prefix")?.unwrap_or_else(|| "synrad".to_owned());
    let dump_photons = input.read_optional::<bool, _>("output:photons")?.unwrap_or(false);

    let window: EnergyWindow = input.read("generation:window")?;
    let mode = input.read_optional("generation:mode")?.unwrap_or(GenerationMode::Flux);

    let ospecs: Vec<String> = match input.read_optional("output:distributions")? {
        Some(ospecs) => ospecs,
        None => {
            let weight = match mode {
                GenerationMode::Flux => "flux",
                GenerationMode::Power => "power",
            };
            vec![
                format!("energy:(log;{})", weight),
                format!("psi:({})", weight),
                format!("chi:({})", weight),
            ]
        },
    };

    let ospecs: Vec<DistributionFunction> = ospecs.iter()
        .map(|s| s.parse::<DistributionFunction>())
        .collect::<Result<_, _>>()?;

    let region = read_region(&input)?;
    let beam = *region.beam();

    println!("{} trajectory: E = {:.3} GeV, gamma = {:.1}, step = {:.3e} cm...", "Integrating".bold().cyan(), beam.energy_gev, beam.gamma(), region.params().step_cm);
    let trajectory = region.trajectory();
    if trajectory.termination == Termination::StepCap {
        eprintln!("{}: trajectory truncated after {} steps without leaving the region.", "Warning".bold().yellow(), trajectory.len());
    }
    println!(
        "{} trajectory: {} points, length = {:.3e} cm, total bend = {:.6e} rad.",
        "Completed".bold().bright_green(), trajectory.len(), trajectory.length(), trajectory.total_bend()
    );
    output::write_trajectory(&trajectory, &format!("{}_trajectory.dat", prefix))?;

    let spectrum = SrSpectrum::new();
    let psi_table = match load_table(&input, "tables:psi", |p| PsiTable::from_file(p))? {
        Some(table) => table,
        None => {
            println!("{} psi distribution...", "Tabulating".bold().cyan());
            PsiTable::tabulate()?
        },
    };
    let pol_table = match load_table(&input, "tables:polarization", |p| PolarizationTable::from_file(p))? {
        Some(table) => table,
        None => PolarizationTable::tabulate(psi_table.matrix().cols())?,
    };
    let chi_table = load_table(&input, "tables:chi", |p| ChiTable::from_file(p))?;

    let material = match input.read_optional::<String, _>("material:file")? {
        Some(filename) => {
            let name = input.read_optional::<String, _>("material:name")?.unwrap_or_else(|| filename.clone());
            // grazing angle, possibly scanned over a range
            let angles: Vec<f64> = input.read_loop("material:angle")?;
            Some((Material::from_file(&name, &filename)?, angles))
        },
        None => None,
    };

    let generator = PhotonGenerator::new(&trajectory, &spectrum, &psi_table, &pol_table, beam, window, mode)?
        .with_polarization(region.params().polarization);
    let generator = match chi_table.as_ref() {
        Some(table) => generator.with_chi_table(table),
        None => generator,
    };

    println!(
        "{} {} photons in [{:.3e}, {:.3e}] eV ({:?} mode, {:?} polarization)...",
        "Generating".bold().cyan(), num, window.low_ev, window.high_ev, mode, region.params().polarization
    );

    let num = if generator.emitting_points() == 0 {
        eprintln!("{}: no point of the trajectory radiates within the energy window.", "Warning".bold().yellow());
        0
    } else {
        num
    };

    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let mut photons = Vec::with_capacity(num);
    let mut interactions = vec![[0usize; 5]; material.as_ref().map_or(0, |(_, a)| a.len())];
    let runtime = Instant::now();
    let report = (num / PROGRESS_REPORTS).max(1);

    for i in 0..num {
        let photon = match generator.generate(&mut rng) {
            Some(photon) => photon,
            None => break,
        };

        if let Some((material, angles)) = material.as_ref() {
            for (angle, tally) in angles.iter().zip(interactions.iter_mut()) {
                let k = match material.classify(photon.energy, *angle, rng.gen()) {
                    Interaction::Forward => 0,
                    Interaction::Diffuse => 1,
                    Interaction::Back => 2,
                    Interaction::Transparent => 3,
                    Interaction::Absorb => 4,
                };
                tally[k] += 1;
            }
        }

        photons.push(photon);

        if (i + 1) % report == 0 && i + 1 < num {
            println!(
                "\t... done {: >10} of {: >10} photons, RT = {}, ETTC = {}",
                i + 1, num,
                PrettyDuration::from(runtime.elapsed()),
                PrettyDuration::from(ettc(runtime, i + 1, num)),
            );
        }
    }

    println!("{} generation in {}.", "Completed".bold().bright_green(), PrettyDuration::from(runtime.elapsed()));

    // each photon carries the weight of its segment
    let scale = generator.emitting_points() as f64 / photons.len().max(1) as f64;
    for dstr in ospecs.iter() {
        dstr.write(&photons, scale, &prefix)?;
    }
    if dump_photons {
        output::write_photons(&photons, &format!("{}_photons.dat", prefix))?;
    }

    println!("{}", "Summary:".bold());
    println!("\tflux  = {:.6e} photons/s", generator.total_flux());
    println!("\tpower = {:.6e} W", generator.total_power());
    if !photons.is_empty() {
        let mean = photons.iter().map(|ph| ph.energy).sum::<f64>() / (photons.len() as f64);
        println!("\tmean sampled photon energy = {:.6e} eV", mean);
    }

    if let Some((material, angles)) = material.as_ref() {
        let names = [Interaction::Forward, Interaction::Diffuse, Interaction::Back, Interaction::Transparent, Interaction::Absorb];
        for (angle, tally) in angles.iter().zip(interactions.iter()) {
            println!("\tmaterial '{}' at {:.3e} rad:", material.name, angle);
            for (name, count) in names.iter().zip(tally.iter()) {
                println!("\t\t{: <12} {:.4}", name.to_string(), *count as f64 / photons.len().max(1) as f64);
            }
        }
    }

    Ok(())
}
