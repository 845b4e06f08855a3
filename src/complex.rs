use num::complex::Complex;

pub type C<T> = Complex<T>;

pub const ZERO: C<f64> = Complex::new(0.0, 0.0);
pub const ONE: C<f64> = Complex::new(1.0, 0.0);

pub fn c(re: f64, im: f64) -> C<f64> {
    Complex::new(re, im)
}
