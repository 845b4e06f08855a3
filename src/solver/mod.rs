use crate::complex::{C, ZERO};
use crate::threads::{Call, Join, Split, WorkerPool};

pub mod mandelbrot;
pub mod newton;
pub mod vec;

pub use mandelbrot::MandelbrotSolver;
pub use newton::NewtonSolver;
pub use vec::{VecCell, VecState};

/// Iteration bound of the Mandelbrot recurrence.
pub const MAX_ITERATIONS: u16 = 200;
/// Divergence threshold of the Mandelbrot recurrence.
pub const THRESHOLD: f64 = 2.0;

/// Outcome of iterating a recurrence at one point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Escape {
    /// Left the threshold at step `n`, counting from zero.
    After(u16),
    /// Stayed bounded for the whole iteration budget.
    Never,
}

/// Iterate `v = v*v + c` from zero and report the first step at which
/// `|v|` is strictly greater than `threshold`.
pub fn escape_time(c: C<f64>, max_iterations: u16, threshold: f64) -> Escape {
    let mut v = ZERO;
    for n in 0..max_iterations {
        v = v * v + c;
        if v.norm() > threshold {
            return Escape::After(n);
        }
    }
    Escape::Never
}

pub trait Solver<T> {
    fn solve(&self, state: T) -> T;

    fn threaded(self, n: usize) -> WorkerPool<T, T>
    where
        Self: Sized + Clone + Send + 'static,
        T: Split + Join + Send + 'static,
    {
        WorkerPool::with(n, || {
            let solver = self.clone();
            move |state: T| solver.solve(state)
        })
    }
}

impl<T> Solver<T> for WorkerPool<T, T>
where
    T: Split + Join + Send + 'static,
{
    fn solve(&self, state: T) -> T {
        self.call(state)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::complex::c;

    #[test]
    fn test_origin_never_escapes() {
        assert_eq!(escape_time(ZERO, MAX_ITERATIONS, THRESHOLD), Escape::Never);
    }

    #[test]
    fn test_corner_escapes_immediately() {
        let e = escape_time(c(-2.0, -2.0), MAX_ITERATIONS, THRESHOLD);
        assert_eq!(e, Escape::After(0));
    }

    #[test]
    fn test_threshold_is_strict() {
        // -2 is on the boundary: the orbit is -2, 2, 2, ... and |v| == 2 forever.
        assert_eq!(escape_time(c(-2.0, 0.0), MAX_ITERATIONS, THRESHOLD), Escape::Never);
    }

    #[test]
    fn test_escape_count_of_real_point() {
        // 1 -> 1, 2, 5
        assert_eq!(escape_time(c(1.0, 0.0), MAX_ITERATIONS, THRESHOLD), Escape::After(2));
        // 0.5 -> 0.5, 0.75, 1.0625, 1.6289, 3.1533
        assert_eq!(escape_time(c(0.5, 0.0), MAX_ITERATIONS, THRESHOLD), Escape::After(4));
    }

    #[test]
    fn test_points_inside_set_never_escape() {
        for p in [c(-1.0, 0.0), c(-0.1, 0.1), c(0.25, 0.0), c(0.0, 1.0)] {
            assert_eq!(escape_time(p, MAX_ITERATIONS, THRESHOLD), Escape::Never, "{}", p);
        }
    }

    #[test]
    fn test_escape_bounded_by_iterations() {
        // Just outside the cusp the orbit lingers but must escape eventually.
        match escape_time(c(0.26, 0.0), MAX_ITERATIONS, THRESHOLD) {
            Escape::After(n) => assert!(n < MAX_ITERATIONS),
            Escape::Never => panic!("0.26 should escape"),
        }
        assert_eq!(escape_time(c(0.26, 0.0), 3, THRESHOLD), Escape::Never);
    }
}
