//! Parse input configuration file

use std::path::Path;
use std::ops::Add;
use yaml_rust::{YamlLoader, yaml::Yaml};
use evalexpr::*;

use crate::constants::*;

mod error;
mod types;
mod timing;

pub use error::*;
pub use types::*;
pub use timing::*;

/// Represents the input configuration, which defines values
/// for simulation parameters, and any automatic values
/// for those parameters.
pub struct Config {
    input: Yaml,
    ctx: HashMapContext,
}

impl Config {
    /// Loads a configuration file.
    /// Fails if the file cannot be opened or if it is not
    /// YAML-formatted.
    pub fn from_file(path: &Path) -> Result<Self, InputError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|_| InputError::file_named(&path.display().to_string()))?;
        Self::from_string(&contents)
    }

    /// Loads a YAML configuration from a string.
    /// Fails if the string is not formatted correctly.
    pub fn from_string(s: &str) -> Result<Self, InputError> {
        let input = YamlLoader::load_from_str(s)
            .map_err(|_| InputError::file())?;
        let input = input.first()
            .ok_or(InputError::file())?;

        Ok(Config {
            input: input.clone(),
            ctx: HashMapContext::new(),
        })
    }

    /// Loads automatic values for constants, special functions
    /// and keywords.
    /// Also loads and evaluates mathematical expressions
    /// that are given in the specified `section`.
    pub fn with_context(&mut self, section: &str) -> Result<&mut Self, InputError> {
        use helper::context_function;
        // Default units and functions. Energies are in eV, lengths in cm

        let mut ctx = context_map! {
            "me" => ELECTRON_MASS_GEV * 1.0e9,
            "mp" => PROTON_MASS_GEV * 1.0e9,
            "eV" => 1.0,
            "keV" => 1.0e3,
            "MeV" => 1.0e6,
            "GeV" => 1.0e9,
            "cm" => 1.0,
            "mm" => 0.1,
            "um" => 1.0e-4,
            "m" => 100.0,
            "T" => 1.0,
            "A" => 1.0,
            "mA" => 1.0e-3,
            "rad" => 1.0,
            "mrad" => 1.0e-3,
            "urad" => 1.0e-6,
            "pi" => std::f64::consts::PI,
            "degree" => std::f64::consts::PI / 180.0,
        }.unwrap();

        context_function!(ctx, "sqrt",   f64::sqrt);
        context_function!(ctx, "cbrt",   f64::cbrt);
        context_function!(ctx, "abs",    f64::abs);
        context_function!(ctx, "exp",    f64::exp);
        context_function!(ctx, "ln",     f64::ln);
        context_function!(ctx, "sin",    f64::sin);
        context_function!(ctx, "cos",    f64::cos);
        context_function!(ctx, "tan",    f64::tan);
        context_function!(ctx, "asin",   f64::asin);
        context_function!(ctx, "acos",   f64::acos);
        context_function!(ctx, "atan",   f64::atan);
        context_function!(ctx, "atan2",  f64::atan2, 2);
        context_function!(ctx, "sinh",   f64::sinh);
        context_function!(ctx, "cosh",   f64::cosh);
        context_function!(ctx, "tanh",   f64::tanh);
        context_function!(ctx, "asinh",  f64::asinh);
        context_function!(ctx, "acosh",  f64::acosh);
        context_function!(ctx, "atanh",  f64::atanh);
        context_function!(ctx, "floor",  f64::floor);
        context_function!(ctx, "ceil",   f64::ceil);
        context_function!(ctx, "round",  f64::round);
        context_function!(ctx, "signum", f64::signum);

        context_function!(ctx, "step",     |x: f64, min: f64, max: f64| {if x >= min && x < max {1.0} else {0.0}}, 3);
        context_function!(ctx, "gauss",    |x: f64, mu: f64, sigma: f64| (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp(), 3);
        context_function!(ctx, "critical", |energy: f64, radius: f64| CRITICAL_ENERGY_COEFF * (energy / (ELECTRON_MASS_GEV * 1.0e9)).powi(3) / radius, 2);

        self.ctx = ctx;

        // user-defined constants, each of which may refer to those above it
        let entries = match &self.input[section] {
            Yaml::BadValue => return Ok(self),
            Yaml::Hash(entries) => entries.clone(),
            _ => return Err(InputError::conversion(section, section)),
        };

        for (key, value) in entries {
            let key = key.as_str()
                .ok_or_else(|| InputError::conversion(section, "non-string key"))?;
            let path = format!("{}:{}", section, key);
            let v = f64::from_yaml(value, &self.ctx)
                .map_err(|_| InputError::conversion(&path, key))?;
            self.ctx.set_value(key.to_owned(), Value::from(v))
                .map_err(|_| InputError::invalid(&path, "cannot be redefined"))?;
        }

        Ok(self)
    }

    /// Follows a colon-separated path, e.g. `'section:subsection:key'`,
    /// to a node of the configuration file.
    fn locate(&self, path: &str) -> Result<&Yaml, InputError> {
        path.split(':').try_fold(&self.input, |y, key| {
            match &y[key] {
                Yaml::BadValue => Err(InputError::location(path, key)),
                node => Ok(node),
            }
        })
    }

    /// Locates a key-value pair in the configuration file and attempts
    /// to parse the value as the specified type.
    pub fn read<T, S>(&self, path: S) -> Result<T, InputError>
    where
        T: FromYaml,
        S: AsRef<str>,
    {
        let path = path.as_ref();
        let node = self.locate(path)?;
        let key = path.rsplit(':').next().unwrap_or(path);
        T::from_yaml(node.clone(), &self.ctx)
            .map_err(|_| InputError::conversion(path, key))
    }

    /// Like `Config::read`, but a missing key gives `Ok(None)`. A key that
    /// is present but cannot be converted is still an error.
    pub fn read_optional<T, S>(&self, path: S) -> Result<Option<T>, InputError>
    where
        T: FromYaml,
        S: AsRef<str>,
    {
        match self.read(path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == InputErrorKind::Location => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Like `Config::read`, but parses the value of a key-value pair
    /// as a function of a single variable `arg`. The function returns
    /// `None` if evaluation fails for a particular argument.
    pub fn func<'a, S: AsRef<str> + 'a>(&'a self, path: S, arg: S) -> Result<impl Fn(f64) -> Option<f64> + 'a, InputError> {
        // get the field, if it exists
        let s: String = self.read(&path)?;

        let tree = build_operator_tree(&s)
            .map_err(|_| InputError::conversion(path.as_ref(), &s))?;

        // walk tree and verify there are no missing identifiers, apart from 'arg'
        for var in tree.iter_read_variable_identifiers() {
            if var == arg.as_ref() || self.ctx.iter_variable_names().find(|id| var == id).is_some() {
                continue;
            } else {
                return Err(InputError::conversion(path.as_ref(), &s))
            }
        }

        let func = move |x| {
            let name = arg.as_ref().to_owned();
            let mut ctx = self.ctx.clone();
            ctx.set_value(name, Value::from(x)).ok()?;
            tree.eval_number_with_context(&ctx).ok()
        };

        Ok(func)
    }

    /// Parses a string argument and evaluates it using the default
    /// context, so that `"2.0 / (1.0 + gap)"` is accepted wherever
    /// `"2.0"` would be, provided `gap` is given in the constants block.
    pub fn evaluate<S: AsRef<str>>(&self, arg: S) -> Option<f64> {
        eval_number_with_context(arg.as_ref(), &self.ctx).ok()
    }

    /// Locates a key-value pair in the configuration file and attempts
    /// to parse it as a looped variable, returning a Vec of the values.
    /// The loop is defined by a `start`, `stop` and `step`:
    ///
    /// ```
    /// use synrad::input::Config;
    ///
    /// let text: &str = "---
    ///     x:
    ///         start: 1.0
    ///         stop: 2.0
    ///         step: 0.5
    /// ";
    ///
    /// let values: Vec<f64> = Config::from_string(&text).unwrap()
    ///     .read_loop("x").unwrap();
    ///
    /// assert_eq!(values, vec![1.0, 1.5, 2.0]);
    /// ```
    pub fn read_loop<T, S>(&self, path: S) -> Result<Vec<T>, InputError>
    where
        T: FromYaml + PartialOrd + Add<Output=T> + Copy,
        S: AsRef<str> {
        let key = path.as_ref();

        if self.read::<T, _>(format!("{}{}", key, ":start").as_str()).is_err() {
            let value = self.read(path)?;
            let v = vec![value];
            Ok(v)
        }
        else { // 'start' value found
            let start = self.read(format!("{}{}", key, ":start").as_str())?;
            let stop = self.read(format!("{}{}", key, ":stop").as_str())?;
            let step = self.read(format!("{}{}", key, ":step").as_str())?;

            let mut v: Vec<T> = Vec::new();
            let mut x = start;
            while x <= stop {
                v.push(x);
                x = x + step;
            }
            Ok(v)
        }
    }
}

mod helper {
    macro_rules! context_function {
        ($ctx:expr, $name:literal, $func:expr) => {
            $ctx.set_function(
                $name.to_string(),
                Function::new(|arg| {
                    let x = arg.as_number()?;
                    Ok(Value::Float($func(x)))
                })
            ).unwrap()
        };
        ($ctx:expr, $name:literal, $func:expr, 2) => {
            $ctx.set_function(
                $name.to_string(),
                Function::new(|arg| {
                    let arg = arg.as_fixed_len_tuple(2)?;
                    let x = arg[0].as_number()?;
                    let y = arg[1].as_number()?;
                    Ok(Value::Float($func(x, y)))
                })
            ).unwrap()
        };
        ($ctx:expr, $name:literal, $func:expr, 3) => {
            $ctx.set_function(
                $name.to_string(),
                Function::new(|arg| {
                    let arg = arg.as_fixed_len_tuple(3)?;
                    let x = arg[0].as_number()?;
                    let y = arg[1].as_number()?;
                    let z = arg[2].as_number()?;
                    Ok(Value::Float($func(x, y, z)))
                })
            ).unwrap()
        };
    }

    pub(super) use context_function;
}

#[cfg(test)]
mod tests {
    use std::f64::consts;
    use crate::geometry::ThreeVector;
    use crate::spectrum::{EnergyWindow, GenerationMode};
    use super::*;

    #[test]
    fn config_parser() {
        let text = "---
        beam:
          energy: 3.0 * GeV
          mass: me
          current: 400 * mA
          emittance: 0.1 * um
        region:
          step: 10 * mm
          nsteps: 4000
          start: [0.0, 0.0, -0.5 * length]
          by: B0 * sin(2 * pi * s / period)
        generation:
          window: [10 * eV, 100 * keV]
          mode: flux
          seeds: [1, none]

        constants:
          B0: 1.2
          period: 4.0 * cm
          length: 2 * m
          gap: 1.0

        deep:
          nested:
            section:
              key: 1.0
        ";

        let mut config = Config::from_string(&text).unwrap();
        config.with_context("constants").unwrap();

        // Evaluates math expr with units
        let energy: f64 = config.read("beam:energy").unwrap();
        assert_eq!(energy, 3.0e9);
        let mass: f64 = config.read("beam:mass").unwrap();
        assert!((mass - 510999.0).abs() < 1.0e-6);
        let emittance: f64 = config.read("beam:emittance").unwrap();
        assert!((emittance - 1.0e-5).abs() < 1.0e-18);

        // Plain usize
        let nsteps: usize = config.read("region:nsteps").unwrap();
        assert_eq!(nsteps, 4000);

        // Vectors
        let start: ThreeVector = config.read("region:start").unwrap();
        assert_eq!(start, ThreeVector::new(0.0, 0.0, -100.0));
        let window: Vec<f64> = config.read("generation:window").unwrap();
        assert_eq!(window, vec![10.0, 1.0e5]);
        let seeds: Result<Vec<f64>, _> = config.read("generation:seeds");
        assert!(seeds.is_err());

        // Strings and keywords
        let mode: String = config.read("generation:mode").unwrap();
        assert_eq!(mode, "flux");
        let mode: GenerationMode = config.read("generation:mode").unwrap();
        assert_eq!(mode, GenerationMode::Flux);
        let window: EnergyWindow = config.read("generation:window").unwrap();
        assert_eq!(window, EnergyWindow::new(10.0, 1.0e5));
        assert!(config.read::<[f64; 2], _>("region:start").is_err());
        assert!(config.read::<usize, _>("beam:energy").is_err());

        // Function of one variable
        let by = config.func("region:by", "s").unwrap();
        assert!((by(1.0).unwrap() - 1.2).abs() < 1.0e-12);
        assert!((by(0.5).unwrap() - 1.2 * (consts::PI / 4.0).sin()).abs() < 1.0e-12);
        assert!(config.func("region:by", "x").is_err());

        // Missing sections
        let err = config.read::<f64, _>("beam:spread").unwrap_err();
        println!("{}", err);
        assert_eq!(err.kind(), InputErrorKind::Location);

        // Optional values
        let spread: Option<f64> = config.read_optional("beam:spread").unwrap();
        assert!(spread.is_none());
        let current: Option<f64> = config.read_optional("beam:current").unwrap();
        assert_eq!(current, Some(0.4));
        assert!(config.read_optional::<Vec<f64>, _>("generation:seeds").is_err());

        let key: f64 = config.read("deep:nested:section:key").unwrap();
        assert_eq!(key, 1.0);

        // evaluate arb string
        let val = config.evaluate("1.0 / (1.0 + gap)").unwrap();
        assert_eq!(val, 1.0 / 2.0);
    }

    #[test]
    fn looper() {
        // Test extraction of single value
        let text: &str = "---
        region:
            step: 1.0
        ";
        let mut config = Config::from_string(&text).unwrap();
        let steps: Vec<f64> = config.read_loop("region:step").unwrap();
        assert_eq!(steps, vec![1.0; 1]);

        // Test extraction of looped values
        let text: &str = "---
        region:
            step:
                start: 1.0
                stop: 10.0
                step: 2.0
        ";
        config = Config::from_string(&text).unwrap();
        let steps: Vec<f64> = config.read_loop("region:step").unwrap();
        assert_eq!(steps, vec![1.0, 3.0, 5.0, 7.0, 9.0]);
    }
}
