use crate::complex::C;
use crate::coord::{Dimensions, Frame};
use crate::solver::Escape;
use crate::threads::{Join, Split};

#[derive(Clone, Debug, PartialEq)]
pub struct VecCell {
    pub(crate) c: C<f64>,
    pub(crate) escape: Escape,
}

impl VecCell {
    pub fn point(&self) -> C<f64> {
        self.c
    }

    pub fn escape(&self) -> Escape {
        self.escape
    }
}

/// Row-major grid of sample points and their escape results.
#[derive(Clone, Debug, PartialEq)]
pub struct VecState {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) state: Vec<VecCell>,
}

impl VecState {
    pub fn initialize(dims: Dimensions, frame: &Frame<f64>) -> Self {
        let state = dims
            .iter()
            .map(|(px, py)| VecCell {
                c: frame.sample(px, py, dims),
                escape: Escape::Never,
            })
            .collect();
        Self {
            width: dims.width() as usize,
            height: dims.height() as usize,
            state,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, x: usize, y: usize) -> &VecCell {
        &self.state[y * self.width + x]
    }

    pub fn escape(&self, x: usize, y: usize) -> Escape {
        self.cell(x, y).escape
    }

    pub fn cells(&self) -> &[VecCell] {
        &self.state
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [VecCell] {
        &mut self.state
    }
}

impl Split for VecState {
    fn split_to_vec(self, n: usize) -> Vec<Self> {
        let width = self.width;
        let rows = self.state.split_to_vec(self.height);
        rows.split_to_vec(n)
            .into_iter()
            .map(|row_group| Self {
                width,
                height: row_group.len(),
                state: Vec::<VecCell>::join_vec(row_group),
            })
            .collect()
    }
}

impl Join for VecState {
    fn join_vec(parts: Vec<Self>) -> Self {
        let width = parts[0].width;
        let mut height = 0;
        let mut state_parts: Vec<Vec<VecCell>> = Vec::with_capacity(parts.len());
        for part in parts {
            assert!(part.width == width, "different width");
            height += part.height;
            state_parts.push(part.state);
        }
        Self {
            width,
            height,
            state: Vec::join_vec(state_parts),
        }
    }
}
