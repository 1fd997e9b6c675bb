use crate::c64;
use crate::DynMatrix;

/// Make singular values non-negative and sort them in decreasing order.
///
/// A negative `s[k]` is negated together with column `k` of `v`. The sort
/// is a selection sort taking the first maximum of each tail, so equal
/// values keep their relative order; columns of `u` and `v` follow their
/// singular values.
pub(crate) fn normalize(s: &mut [f64], u: &mut DynMatrix<c64>, v: &mut DynMatrix<c64>) {
    let n = s.len();

    for k in 0..n {
        if s[k] < 0.0 {
            s[k] = -s[k];
            for j in 0..v.nrows() {
                v[(j, k)] = -v[(j, k)];
            }
        }
    }

    for k in 0..n {
        let mut g = -1.0;
        let mut j = k;
        for (i, &si) in s.iter().enumerate().skip(k) {
            if g < si {
                g = si;
                j = i;
            }
        }
        if j != k {
            s.swap(j, k);
            u.swap_cols(j, k);
            v.swap_cols(j, k);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64) -> c64 {
        c64::new(re, 0.0)
    }

    #[test]
    fn flips_sign_into_v() {
        let mut s = vec![-2.0, 1.0];
        let mut u = DynMatrix::eye(2, c(0.0));
        let mut v = DynMatrix::eye(2, c(0.0));
        normalize(&mut s, &mut u, &mut v);
        assert_eq!(s, vec![2.0, 1.0]);
        assert_eq!(v[(0, 0)], c(-1.0));
        assert_eq!(u, DynMatrix::eye(2, c(0.0)));
    }

    #[test]
    fn sorts_with_columns() {
        let mut s = vec![1.0, 3.0, 2.0];
        let mut u = DynMatrix::from_fn(3, 3, |i, j| c((10 * i + j) as f64));
        let mut v = DynMatrix::eye(3, c(0.0));
        normalize(&mut s, &mut u, &mut v);
        assert_eq!(s, vec![3.0, 2.0, 1.0]);
        // column 1 moved to the front, then original columns 2 and 0
        assert_eq!(u[(2, 0)], c(21.0));
        assert_eq!(u[(2, 1)], c(22.0));
        assert_eq!(u[(2, 2)], c(20.0));
        assert_eq!(v[(1, 0)], c(1.0));
        assert_eq!(v[(2, 1)], c(1.0));
        assert_eq!(v[(0, 2)], c(1.0));
    }

    #[test]
    fn ties_keep_first() {
        let mut s = vec![1.0, 2.0, 2.0];
        let mut u = DynMatrix::eye(3, c(0.0));
        let mut v = DynMatrix::eye(3, c(0.0));
        normalize(&mut s, &mut u, &mut v);
        assert_eq!(s, vec![2.0, 2.0, 1.0]);
        // first 2.0 (column 1) wins position 0
        assert_eq!(u[(1, 0)], c(1.0));
    }

    #[test]
    fn wide_u_swaps_full_columns() {
        let mut s = vec![0.5, 4.0];
        let mut u = DynMatrix::eye(3, c(0.0));
        let mut v = DynMatrix::eye(2, c(0.0));
        normalize(&mut s, &mut u, &mut v);
        assert_eq!(s, vec![4.0, 0.5]);
        assert_eq!(u[(1, 0)], c(1.0));
        assert_eq!(u[(2, 2)], c(1.0));
    }
}
