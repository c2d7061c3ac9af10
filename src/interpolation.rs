//! Bracketing search and (inverse) interpolation on tabulated data.
//!
//! Every table lookup in the crate goes through [`locate`]: the
//! spectrum CDFs, the psi and chi matrices, the material table and the
//! field and lattice-function tables. What differs between call sites
//! is only the [`Edge`] policy.

/// What to do with arguments that lie outside the tabulated range
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Pin to the first or last entry
    Clamp,
    /// Continue the first or last segment linearly
    Extrapolate,
}

/// Position of an argument within a table: it lies between entries
/// `index` and `index + 1`, at `fraction` of the way to the latter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bracket {
    pub index: usize,
    pub fraction: f64,
}

impl Bracket {
    /// Fractional index, `index + fraction`
    pub fn position(&self) -> f64 {
        self.index as f64 + self.fraction
    }

    /// Blends `lower` (at `index`) and `upper` (at `index + 1`)
    pub fn blend(&self, lower: f64, upper: f64) -> f64 {
        lerp(lower, upper, self.fraction)
    }
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

/// Finds `i` such that `key(i) <= value < key(i+1)` by binary search,
/// where `key` is non-decreasing over `0..len`, and returns the
/// fractional position of `value` in that interval.
///
/// Below the first key, `Edge::Clamp` returns `(0, 0.0)`; at or above
/// the last key it returns `(len-2, 1.0)`. `Edge::Extrapolate` returns
/// the unclamped fraction instead. Where the bracketing keys are equal
/// the fraction is zero.
///
/// # Panics
/// If `len < 2`.
pub fn locate<F>(len: usize, value: f64, key: F, edge: Edge) -> Bracket
where F: Fn(usize) -> f64 {
    assert!(len >= 2, "cannot interpolate in a table with {} entries", len);

    let index = if value < key(0) {
        0
    } else if value >= key(len - 1) {
        len - 2
    } else {
        // invariant: key(lo) <= value < key(hi)
        let (mut lo, mut hi) = (0, len - 1);
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if key(mid) <= value {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    };

    let (k0, k1) = (key(index), key(index + 1));
    let fraction = if k1 == k0 {
        0.0
    } else {
        (value - k0) / (k1 - k0)
    };

    let fraction = match edge {
        Edge::Clamp => fraction.max(0.0).min(1.0),
        Edge::Extrapolate => fraction,
    };

    Bracket {index, fraction}
}

/// Convenience wrapper of [`locate`] for a slice of keys.
pub fn locate_in(keys: &[f64], value: f64, edge: Edge) -> Bracket {
    locate(keys.len(), value, |i| keys[i], edge)
}

/// Solves `f(x) = y` for the straight line through `(x0, f0)` and
/// `(x1, f1)`. If the two values of `f` are equal, returns the
/// midpoint of the segment.
pub fn linear_inverse(y: f64, x0: f64, x1: f64, f0: f64, f1: f64) -> f64 {
    if f1 == f0 {
        0.5 * (x0 + x1)
    } else {
        x0 + (y - f0) * (x1 - x0) / (f1 - f0)
    }
}

/// Relative size below which the quadratic term is ignored
const QUADRATIC_TOLERANCE: f64 = 1.0e-10;

/// Inverse quadratic interpolation: returns the `x` in `[a, c]` at
/// which the parabola through `(a, fa)`, `(b, fb)` and `(c, fc)`
/// takes the value `y`.
///
/// The parabola is written in Lagrange form in the scaled coordinate
/// `u = (x - a) / (c - a)`, with nodes at `0`, `t = (b - a) / (c - a)`
/// and `1`, and the resulting `A u^2 + B u + C = 0` is solved with the
/// cancellation-free form of the quadratic formula. When the quadratic
/// coefficient is negligible, the discriminant is negative, or no root
/// lies in the interval, the result falls back to linear interpolation
/// on whichever of `[a, b]` or `[b, c]` contains `y`.
pub fn quadratic_interpolate_x(y: f64, a: f64, b: f64, c: f64, fa: f64, fb: f64, fc: f64) -> f64 {
    let linear = || {
        if (y - fa) * (y - fb) <= 0.0 {
            linear_inverse(y, a, b, fa, fb)
        } else {
            linear_inverse(y, b, c, fb, fc)
        }
    };

    let span = c - a;
    let t = (b - a) / span;
    if !(t > 0.0 && t < 1.0) {
        return linear();
    }

    // Lagrange basis: L0 = (u-t)(u-1)/t, L1 = u(u-1)/(t(t-1)), L2 = u(u-t)/(1-t)
    let qa = fa / t + fb / (t * (t - 1.0)) + fc / (1.0 - t);
    let qb = -fa * (1.0 + t) / t - fb / (t * (t - 1.0)) - fc * t / (1.0 - t);
    let qc = fa - y;

    if qa.abs() <= QUADRATIC_TOLERANCE * (qb.abs() + (fc - fa).abs()) {
        return linear();
    }

    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 {
        return linear();
    }

    let q = -0.5 * (qb + qb.signum() * disc.sqrt());
    let roots = [q / qa, if q != 0.0 {qc / q} else {f64::NAN}];

    // Of the roots inside the interval, take the one nearest the
    // linear estimate; the parabola may turn over within [0, 1].
    let estimate = (linear() - a) / span;
    let margin = 1.0e-12;
    let u = roots.iter()
        .filter(|u| **u >= -margin && **u <= 1.0 + margin)
        .fold(None, |best: Option<f64>, &u| match best {
            Some(v) if (v - estimate).abs() <= (u - estimate).abs() => Some(v),
            _ => Some(u),
        });

    match u {
        Some(u) => a + u.max(0.0).min(1.0) * span,
        None => linear(),
    }
}
