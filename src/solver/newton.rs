use crate::complex::{C, ONE};
use crate::solver::{Escape, Solver, VecState};

pub const NEWTON_ITERATIONS: u16 = 37;
pub const NEWTON_TOLERANCE: f64 = 1e-6;

/// Newton's method for `f(z) = z^4 - 1`, reporting the step at which
/// the orbit lands on one of the four roots.
#[derive(Copy, Clone, Debug)]
pub struct NewtonSolver {
    iterations: u16,
    tolerance: f64,
}

impl NewtonSolver {
    pub fn new(iterations: u16, tolerance: f64) -> Self {
        Self {
            iterations,
            tolerance,
        }
    }

    // z' = z - f(z)/f'(z) = z - (z - 1/z^3) / 4
    pub fn converge(&self, c: C<f64>) -> Escape {
        let mut z = c;
        for i in 0..self.iterations {
            z -= (z - ONE / (z * z * z)) / 4.0;
            if (z * z * z * z - ONE).norm() < self.tolerance {
                return Escape::After(i);
            }
        }
        Escape::Never
    }
}

impl Default for NewtonSolver {
    fn default() -> Self {
        Self::new(NEWTON_ITERATIONS, NEWTON_TOLERANCE)
    }
}

impl Solver<VecState> for NewtonSolver {
    fn solve(&self, mut state: VecState) -> VecState {
        for cell in state.cells_mut() {
            cell.escape = self.converge(cell.c);
        }
        state
    }
}
