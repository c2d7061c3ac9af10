//! Types that can be read from the input file

use std::convert::TryFrom;
use yaml_rust::yaml::Yaml;
use evalexpr::{HashMapContext, eval_number_with_context};

use crate::emission::Polarization;
use crate::geometry::ThreeVector;
use crate::spectrum::{EnergyWindow, GenerationMode};

/// Types that can be parsed from a YAML field, using the supplied
/// context for named constants and units.
pub trait FromYaml: Sized {
    type Error;
    fn from_yaml(arg: Yaml, ctx: &HashMapContext) -> Result<Self, Self::Error>;
}

/// Scalars are either plain YAML numbers or strings holding an
/// expression, e.g. `3.0 * GeV`.
fn scalar(arg: &Yaml, ctx: &HashMapContext) -> Option<f64> {
    match arg {
        Yaml::Real(s) => s.parse::<f64>().ok(),
        Yaml::Integer(i) => Some(*i as f64),
        Yaml::String(s) => eval_number_with_context(s, ctx).ok(),
        _ => None,
    }
}

fn as_text(arg: &Yaml) -> Option<String> {
    match arg {
        Yaml::String(s) | Yaml::Real(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

impl FromYaml for bool {
    type Error = ();
    fn from_yaml(arg: Yaml, _ctx: &HashMapContext) -> Result<Self, Self::Error> {
        arg.as_bool().ok_or(())
    }
}

impl FromYaml for String {
    type Error = ();
    fn from_yaml(arg: Yaml, _ctx: &HashMapContext) -> Result<Self, Self::Error> {
        as_text(&arg).ok_or(())
    }
}

impl FromYaml for f64 {
    type Error = ();
    fn from_yaml(arg: Yaml, ctx: &HashMapContext) -> Result<Self, Self::Error> {
        scalar(&arg, ctx).ok_or(())
    }
}

// Counts and seeds must be written as plain integers

impl FromYaml for usize {
    type Error = ();
    fn from_yaml(arg: Yaml, _ctx: &HashMapContext) -> Result<Self, Self::Error> {
        arg.as_i64().and_then(|i| usize::try_from(i).ok()).ok_or(())
    }
}

impl FromYaml for u64 {
    type Error = ();
    fn from_yaml(arg: Yaml, _ctx: &HashMapContext) -> Result<Self, Self::Error> {
        arg.as_i64().and_then(|i| u64::try_from(i).ok()).ok_or(())
    }
}

impl FromYaml for Vec<String> {
    type Error = ();
    fn from_yaml(arg: Yaml, _ctx: &HashMapContext) -> Result<Self, Self::Error> {
        match arg {
            // a single entry is a list of length one
            Yaml::Array(array) => {
                let got: Vec<String> = array.iter().filter_map(as_text).collect();
                if got.is_empty() || got.len() != array.len() {
                    Err(())
                } else {
                    Ok(got)
                }
            },
            _ => as_text(&arg).map(|s| vec![s]).ok_or(()),
        }
    }
}

impl FromYaml for Vec<f64> {
    type Error = ();
    fn from_yaml(arg: Yaml, ctx: &HashMapContext) -> Result<Self, Self::Error> {
        match arg {
            Yaml::Array(array) if !array.is_empty() => {
                array.iter().map(|y| scalar(y, ctx).ok_or(())).collect()
            },
            Yaml::Array(_) => Err(()),
            _ => scalar(&arg, ctx).map(|x| vec![x]).ok_or(()),
        }
    }
}

/// A pair of values, such as the horizontal and vertical beta functions.
impl FromYaml for [f64; 2] {
    type Error = ();
    fn from_yaml(arg: Yaml, ctx: &HashMapContext) -> Result<Self, Self::Error> {
        let v: Vec<f64> = FromYaml::from_yaml(arg, ctx)?;
        match v.as_slice() {
            [a, b] => Ok([*a, *b]),
            _ => Err(()),
        }
    }
}

impl FromYaml for ThreeVector {
    type Error = ();
    fn from_yaml(arg: Yaml, ctx: &HashMapContext) -> Result<Self, Self::Error> {
        let v: Vec<f64> = FromYaml::from_yaml(arg, ctx)?;
        match v.as_slice() {
            [x, y, z] => Ok(ThreeVector::new(*x, *y, *z)),
            _ => Err(()),
        }
    }
}

/// `[low, high]`, in eV
impl FromYaml for EnergyWindow {
    type Error = ();
    fn from_yaml(arg: Yaml, ctx: &HashMapContext) -> Result<Self, Self::Error> {
        let [low, high]: [f64; 2] = FromYaml::from_yaml(arg, ctx)?;
        Ok(EnergyWindow::new(low, high))
    }
}

impl FromYaml for GenerationMode {
    type Error = ();
    fn from_yaml(arg: Yaml, _ctx: &HashMapContext) -> Result<Self, Self::Error> {
        arg.as_str().ok_or(())?.parse().map_err(|_| ())
    }
}

impl FromYaml for Polarization {
    type Error = ();
    fn from_yaml(arg: Yaml, _ctx: &HashMapContext) -> Result<Self, Self::Error> {
        arg.as_str().ok_or(())?.parse().map_err(|_| ())
    }
}
