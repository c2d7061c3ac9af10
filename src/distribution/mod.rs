//! Tabulated functions: (x, y) sample tables, histograms and dense
//! matrices of cumulative distributions.

use std::path::Path;

use crate::interpolation::{self, Bracket, Edge};

mod error;
mod histogram;
mod matrix;

pub use error::*;
pub use histogram::*;
pub use matrix::*;

/// An ordered sequence of `(x, y)` pairs.
///
/// Lookups assume that `x` is strictly ascending; reverse lookups
/// additionally assume that `y` is non-decreasing, as it is for a
/// cumulative distribution. Neither is enforced by the type: tables
/// built from external data should be checked with
/// [`Distribution2D::from_pairs`], which does.
#[derive(Clone, Debug, PartialEq)]
pub struct Distribution2D {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Distribution2D {
    /// Creates a table of `len` entries, all zero.
    pub fn new(len: usize) -> Self {
        Distribution2D {
            x: vec![0.0; len],
            y: vec![0.0; len],
        }
    }

    /// Creates a table from parallel vectors, checking that they have
    /// the same length and that `x` is strictly ascending.
    pub fn from_pairs(name: &str, x: Vec<f64>, y: Vec<f64>) -> Result<Self, TableError> {
        if x.len() != y.len() {
            return Err(TableError::Shape(name.to_owned(), x.len(), y.len()));
        }
        check_ascending(name, &x)?;
        Ok(Distribution2D {x, y})
    }

    /// Parses a two-column table of `x y` pairs, see
    /// [`CdfMatrix::from_text`] for the format.
    pub fn from_text(name: &str, text: &str) -> Result<Self, TableError> {
        let m = CdfMatrix::from_text(name, text)?;
        if m.cols() != 2 {
            return Err(TableError::Shape(format!("{} (columns)", name), 2, m.cols()));
        }
        let (x, y) = (0..m.rows()).map(|i| (m.get(i, 0), m.get(i, 1))).unzip();
        Self::from_pairs(name, x, y)
    }

    pub fn from_file<P: AsRef<Path>>(name: &str, path: P) -> Result<Self, TableError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_text(name, &text)
    }

    pub fn set(&mut self, i: usize, x: f64, y: f64) {
        self.x[i] = x;
        self.y[i] = y;
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self, i: usize) -> f64 {
        self.x[i]
    }

    pub fn y(&self, i: usize) -> f64 {
        self.y[i]
    }

    pub fn xs(&self) -> &[f64] {
        &self.x
    }

    pub fn ys(&self) -> &[f64] {
        &self.y
    }

    pub fn first(&self) -> (f64, f64) {
        (self.x[0], self.y[0])
    }

    pub fn last(&self) -> (f64, f64) {
        let n = self.len() - 1;
        (self.x[n], self.y[n])
    }

    /// Returns the index `i` such that `x[i] <= x < x[i+1]`,
    /// or `None` if `x` lies outside the table.
    pub fn find_index(&self, x: f64) -> Option<usize> {
        if self.len() < 2 || x < self.x[0] || x > self.x[self.len() - 1] {
            None
        } else {
            Some(interpolation::locate_in(&self.x, x, Edge::Clamp).index)
        }
    }

    /// Position of `x` in the table
    pub fn bracket_x(&self, x: f64, edge: Edge) -> Bracket {
        interpolation::locate_in(&self.x, x, edge)
    }

    /// Interpolates y at the given x.
    pub fn value_at(&self, x: f64, edge: Edge) -> f64 {
        let b = self.bracket_x(x, edge);
        b.blend(self.y[b.index], self.y[b.index + 1])
    }

    /// Interpolates x at the given y: the inverse lookup used to
    /// sample from a tabulated cumulative distribution.
    pub fn reverse(&self, y: f64, edge: Edge) -> f64 {
        let b = interpolation::locate_in(&self.y, y, edge);
        b.blend(self.x[b.index], self.x[b.index + 1])
    }

    pub fn is_strictly_ascending(&self) -> bool {
        self.x.windows(2).all(|w| w[1] > w[0])
    }

    pub fn is_non_decreasing(&self) -> bool {
        self.y.windows(2).all(|w| w[1] >= w[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squares() -> Distribution2D {
        let x: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|x| x * x).collect();
        Distribution2D::from_pairs("squares", x, y).unwrap()
    }

    #[test]
    fn forward_lookup() {
        let table = squares();
        assert_eq!(table.value_at(3.0, Edge::Clamp), 9.0);
        assert_eq!(table.value_at(2.5, Edge::Clamp), 6.5);
        assert_eq!(table.value_at(-1.0, Edge::Clamp), 0.0);
        assert_eq!(table.value_at(12.0, Edge::Clamp), 100.0);
        assert_eq!(table.value_at(11.0, Edge::Extrapolate), 119.0);
    }

    #[test]
    fn reverse_lookup() {
        let table = squares();
        assert_eq!(table.reverse(6.5, Edge::Clamp), 2.5);
        assert_eq!(table.reverse(100.0, Edge::Clamp), 10.0);
        assert_eq!(table.reverse(-3.0, Edge::Clamp), 0.0);
    }

    #[test]
    fn index_search() {
        let table = squares();
        assert_eq!(table.find_index(0.0), Some(0));
        assert_eq!(table.find_index(4.2), Some(4));
        assert_eq!(table.find_index(10.0), Some(9));
        assert_eq!(table.find_index(10.5), None);
        assert_eq!(table.find_index(-0.5), None);
    }

    #[test]
    fn two_column_text() {
        let text = "# s (cm)  B_y (T)\n0.0 0.0\n10.0, 1.5\n20.0\t0.0\n";
        let table = Distribution2D::from_text("by", text).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.value_at(15.0, Edge::Clamp), 0.75);
        assert!(Distribution2D::from_text("by", "0.0 1.0 2.0\n1.0 2.0 3.0\n").is_err());
        assert!(Distribution2D::from_text("by", "1.0 0.0\n0.0 1.0\n").is_err());
    }

    #[test]
    fn rejects_malformed() {
        assert!(Distribution2D::from_pairs("a", vec![0.0, 1.0], vec![0.0]).is_err());
        assert!(Distribution2D::from_pairs("b", vec![0.0, 1.0, 1.0], vec![0.0; 3]).is_err());
        assert!(Distribution2D::from_pairs("c", vec![0.0], vec![0.0]).is_err());
        let err = Distribution2D::from_pairs("d", vec![0.0, 2.0, 1.0], vec![0.0; 3]).unwrap_err();
        println!("{}", err);
        assert!(format!("{}", err).contains("entry 2"));
    }
}
