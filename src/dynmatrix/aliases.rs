//! The element type the SVD works with.

/// Double-precision complex scalar.
#[allow(non_camel_case_types)]
pub type c64 = num_complex::Complex<f64>;
