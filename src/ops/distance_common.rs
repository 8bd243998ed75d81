//! Shared validation and shape functions for distance operations.

use crate::error::{Error, Result};
use crate::runtime::cpu::kernels::condensed_len;

/// Validates that a shape is 2-dimensional with both dimensions at least 1.
///
/// # Errors
/// Returns `InvalidShape` otherwise.
#[inline]
pub fn validate_2d_shape(shape: &[usize], op: &'static str) -> Result<[usize; 2]> {
    match *shape {
        [n, m] if n >= 1 && m >= 1 => Ok([n, m]),
        [n, m] => Err(Error::invalid_shape(format!(
            "{} expects n >= 1 and m >= 1, got [{}, {}]",
            op, n, m
        ))),
        _ => Err(Error::invalid_shape(format!(
            "{} expects 2D input, got {}D",
            op,
            shape.len()
        ))),
    }
}

/// Validates a Minkowski exponent.
///
/// Accepts any `p > 0`, including `+inf`.
///
/// # Errors
/// Returns `InvalidArgument` if `p` is NaN or `p <= 0`.
#[inline]
pub fn validate_exponent(p: f32, op: &'static str) -> Result<()> {
    if p.is_nan() || p <= 0.0 {
        return Err(Error::invalid_argument(
            "p",
            format!("{} requires p > 0, got {}", op, p),
        ));
    }
    Ok(())
}

/// Validates that a condensed distance vector has the correct length for n points.
///
/// # Errors
/// Returns `InvalidShape` if the length doesn't match n*(n-1)/2.
#[inline]
pub fn validate_condensed_length(actual: usize, n: usize, op: &'static str) -> Result<()> {
    let expected = condensed_len(n);
    if actual != expected {
        return Err(Error::invalid_shape(format!(
            "{} with n={} expects condensed length {}, got {}",
            op, n, expected, actual
        )));
    }
    Ok(())
}

/// Output shape of pdist for an input of shape `[n, m]`: `[n*(n-1)/2]`.
///
/// # Errors
/// Returns `InvalidShape` for anything but a 2D shape with non-zero dimensions.
pub fn pdist_output_shape(input_shape: &[usize]) -> Result<[usize; 1]> {
    let [n, _] = validate_2d_shape(input_shape, "pdist")?;
    Ok([condensed_len(n)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_2d_shape() {
        assert_eq!(validate_2d_shape(&[3, 4], "test").unwrap(), [3, 4]);
        assert!(validate_2d_shape(&[3], "test").is_err());
        assert!(validate_2d_shape(&[3, 4, 5], "test").is_err());
        assert!(validate_2d_shape(&[0, 4], "test").is_err());
    }

    #[test]
    fn test_validate_exponent() {
        assert!(validate_exponent(1.0, "test").is_ok());
        assert!(validate_exponent(0.5, "test").is_ok());
        assert!(validate_exponent(f32::INFINITY, "test").is_ok());
        assert!(validate_exponent(0.0, "test").is_err());
        assert!(validate_exponent(-1.0, "test").is_err());
        assert!(validate_exponent(f32::NAN, "test").is_err());
    }

    #[test]
    fn test_validate_condensed_length() {
        assert!(validate_condensed_length(3, 3, "test").is_ok());
        assert!(validate_condensed_length(4, 3, "test").is_err());
        assert!(validate_condensed_length(10, 5, "test").is_ok());
        assert!(validate_condensed_length(0, 1, "test").is_ok());
    }

    #[test]
    fn test_pdist_output_shape() {
        assert_eq!(pdist_output_shape(&[1024, 128]).unwrap(), [523_776]);
        assert_eq!(pdist_output_shape(&[1, 7]).unwrap(), [0]);
        assert!(pdist_output_shape(&[5]).is_err());
    }
}
