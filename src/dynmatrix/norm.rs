use num_traits::{Float, Zero};

use crate::traits::LinalgScalar;

use super::DynMatrix;

impl<T: LinalgScalar> DynMatrix<T> {
    /// Frobenius norm (square root of sum of squared moduli).
    ///
    /// ```
    /// use tnsvd::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
    /// assert!((m.frobenius_norm() - 30.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn frobenius_norm(&self) -> T::Real {
        let mut sum = <T::Real as Zero>::zero();
        for &x in &self.data {
            let m = x.modulus();
            sum = sum + m * m;
        }
        sum.sqrt()
    }

    /// Largest entry modulus (`max |a_ij|`), zero for an empty matrix.
    ///
    /// ```
    /// use tnsvd::{c64, DynMatrix};
    /// let m = DynMatrix::from_rows(1, 2, &[c64::new(3.0, 4.0), c64::new(-1.0, 0.0)]);
    /// assert_eq!(m.max_modulus(), 5.0);
    /// ```
    pub fn max_modulus(&self) -> T::Real {
        self.data
            .iter()
            .map(|&x| x.modulus())
            .fold(<T::Real as Zero>::zero(), |acc, m| acc.max(m))
    }

    /// Largest entrywise deviation `max |self_ij - rhs_ij|`.
    ///
    /// Panics on a shape mismatch.
    pub fn max_abs_diff(&self, rhs: &DynMatrix<T>) -> T::Real {
        (self - rhs).max_modulus()
    }
}
