//! Dense row-major matrices, used for families of tabulated CDFs

use std::path::Path;

use crate::interpolation::lerp;
use super::TableError;

/// A `rows` x `cols` matrix of values, stored row-major.
///
/// Each row typically holds one cumulative distribution, sampled at
/// the same column positions as every other row, so that values can
/// be interpolated between neighbouring rows.
#[derive(Clone, Debug, PartialEq)]
pub struct CdfMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CdfMatrix {
    /// Wraps a flat, row-major vector of values.
    pub fn from_flat(name: &str, rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, TableError> {
        if rows == 0 || cols < 2 {
            return Err(TableError::TooShort(name.to_owned(), rows.min(cols)));
        }
        if data.len() != rows * cols {
            return Err(TableError::Shape(name.to_owned(), rows * cols, data.len()));
        }
        Ok(CdfMatrix {rows, cols, data})
    }

    /// Builds the matrix row by row from a generating function.
    pub fn from_fn<F>(name: &str, rows: usize, cols: usize, f: F) -> Result<Self, TableError>
    where F: Fn(usize) -> Vec<f64> {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            let row = f(i);
            if row.len() != cols {
                return Err(TableError::Shape(format!("{} (row {})", name, i), cols, row.len()));
            }
            data.extend(row);
        }
        Self::from_flat(name, rows, cols, data)
    }

    /// Parses a matrix from text: one row per line, values separated
    /// by whitespace and/or commas. Blank lines and lines starting
    /// with '#' are skipped. All rows must have the same length.
    pub fn from_text(name: &str, text: &str) -> Result<Self, TableError> {
        let mut data = Vec::new();
        let mut rows = 0;
        let mut cols = None;

        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let row: Result<Vec<f64>, TableError> = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<f64>().map_err(|_| TableError::Parse(name.to_owned(), n + 1, s.to_owned())))
                .collect();
            let row = row?;

            match cols {
                None => cols = Some(row.len()),
                Some(c) if c != row.len() => {
                    return Err(TableError::Shape(format!("{} (line {})", name, n + 1), c, row.len()));
                },
                _ => {},
            }

            data.extend(row);
            rows += 1;
        }

        let cols = cols.ok_or_else(|| TableError::Missing(name.to_owned(), "data rows".to_owned()))?;
        Self::from_flat(name, rows, cols, data)
    }

    /// Loads a matrix from a text file, see [`CdfMatrix::from_text`].
    pub fn from_file<P: AsRef<Path>>(name: &str, path: P) -> Result<Self, TableError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_text(name, &text)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Value at column `col`, interpolated between rows `row` and
    /// `row + 1` with weight `frac` on the latter. The last row is
    /// returned unblended.
    #[inline]
    pub fn row_lerp(&self, row: usize, frac: f64, col: usize) -> f64 {
        if row + 1 >= self.rows {
            self.get(self.rows - 1, col)
        } else {
            lerp(self.get(row, col), self.get(row + 1, col), frac)
        }
    }

    /// Does every row increase (weakly) from left to right?
    pub fn is_row_monotone(&self) -> bool {
        (0..self.rows).all(|i| self.row(i).windows(2).all(|w| w[1] >= w[0]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_text() {
        let text = "# two CDFs
            0.0, 0.5, 1.0
            0.0 0.25 1.0

            ";
        let m = CdfMatrix::from_text("test", text).unwrap();
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.get(1, 1), 0.25);
        assert_eq!(m.row_lerp(0, 0.5, 1), 0.375);
        assert_eq!(m.row_lerp(1, 0.5, 1), 0.25);
        assert!(m.is_row_monotone());
    }

    #[test]
    fn reject_ragged() {
        let err = CdfMatrix::from_text("ragged", "0 1 2\n0 1\n").unwrap_err();
        println!("{}", err);
        assert!(format!("{}", err).contains("line 2"));
        let err = CdfMatrix::from_text("garbage", "0 1 x\n").unwrap_err();
        println!("{}", err);
        assert!(CdfMatrix::from_text("empty", "# nothing\n").is_err());
        assert!(CdfMatrix::from_flat("flat", 2, 2, vec![0.0; 3]).is_err());
    }
}
