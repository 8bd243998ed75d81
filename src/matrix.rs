//! Borrowed row-major matrix view

use crate::error::{Error, Result};

/// Read-only view of an N×M row-major matrix.
///
/// The view is only constructible when `data.len() == rows * cols` and both
/// dimensions are at least 1, so every row slice handed out is exactly `cols`
/// elements long.
#[derive(Debug, Clone, Copy)]
pub struct MatrixRef<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
}

impl<'a, T> MatrixRef<'a, T> {
    /// Wrap `data` as a `rows` × `cols` matrix.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShape` if either dimension is zero or the slice length
    /// does not equal `rows * cols`.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Result<Self> {
        if rows < 1 || cols < 1 {
            return Err(Error::invalid_shape(format!(
                "matrix dimensions must be >= 1, got [{}, {}]",
                rows, cols
            )));
        }
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| Error::invalid_shape(format!("[{}, {}] overflows usize", rows, cols)))?;
        if data.len() != expected {
            return Err(Error::invalid_shape(format!(
                "matrix [{}, {}] needs {} elements, got {}",
                rows,
                cols,
                expected,
                data.len()
            )));
        }
        Ok(Self { data, rows, cols })
    }

    /// Number of rows (N)
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Row dimension (M)
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape as `[rows, cols]`
    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Row `i` as a slice of length `cols`
    #[inline]
    pub fn row(&self, i: usize) -> &'a [T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// The underlying row-major storage
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows() {
        let data = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let x = MatrixRef::new(&data, 3, 2).unwrap();
        assert_eq!(x.shape(), [3, 2]);
        assert_eq!(x.row(0), &[1.0, 2.0]);
        assert_eq!(x.row(2), &[5.0, 6.0]);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let data = [0.0f32; 6];
        assert!(matches!(
            MatrixRef::new(&data, 4, 2),
            Err(Error::InvalidShape { .. })
        ));
        assert!(MatrixRef::new(&data[..0], 0, 2).is_err());
        assert!(MatrixRef::new(&data[..0], 3, 0).is_err());
    }
}
