use crate::solver::{escape_time, Solver, VecState, MAX_ITERATIONS, THRESHOLD};

#[derive(Copy, Clone, Debug)]
pub struct MandelbrotSolver {
    iterations: u16,
    threshold: f64,
}

impl MandelbrotSolver {
    pub fn new(iterations: u16, threshold: f64) -> Self {
        Self {
            iterations,
            threshold,
        }
    }

    pub fn iterations(&self) -> u16 {
        self.iterations
    }
}

impl Default for MandelbrotSolver {
    fn default() -> Self {
        Self::new(MAX_ITERATIONS, THRESHOLD)
    }
}

impl Solver<VecState> for MandelbrotSolver {
    fn solve(&self, mut state: VecState) -> VecState {
        for cell in state.cells_mut() {
            cell.escape = escape_time(cell.c, self.iterations, self.threshold);
        }
        state
    }
}
