use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use image::RgbImage;
use log::debug;
use thiserror::Error;

use crate::coord::{Dimensions, Frame, PLANE};
use crate::painter::{Contrast, GreyPainter, Painter, PalettePainter};
use crate::solver::{MandelbrotSolver, NewtonSolver, Solver, VecState};

pub mod bench;
mod complex;
pub mod coord;
pub mod error;
pub mod painter;
pub mod palette;
#[cfg(feature = "server")]
pub mod server;
pub mod solver;
pub mod threads;

pub use error::{RenderError, Result};

/// Fixed contrast of the Newton plot, which ignores the requested one.
pub const NEWTON_CONTRAST: Contrast = Contrast(7);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Fractal {
    #[default]
    Mandelbrot,
    Newton,
}

impl Fractal {
    pub fn name(&self) -> &'static str {
        match self {
            Fractal::Mandelbrot => "mandelbrot",
            Fractal::Newton => "newton",
        }
    }
}

impl fmt::Display for Fractal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown fractal '{0}', expected 'mandelbrot' or 'newton'")]
pub struct UnknownFractal(pub String);

impl FromStr for Fractal {
    type Err = UnknownFractal;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mandelbrot" => Ok(Fractal::Mandelbrot),
            "newton" => Ok(Fractal::Newton),
            _ => Err(UnknownFractal(s.to_string())),
        }
    }
}

type BoxedSolver = Box<dyn Solver<VecState> + Send + Sync>;

fn make_solver<S>(solver: S, threads: usize) -> BoxedSolver
where
    S: Solver<VecState> + Clone + Send + Sync + 'static,
{
    if threads == 0 {
        Box::new(solver)
    } else {
        Box::new(solver.threaded(threads))
    }
}

/// Samples the plane window, solves every pixel and paints the result.
///
/// A renderer keeps its worker threads for its whole life but no state
/// from one render to the next, so it can be shared between callers.
pub struct Renderer {
    frame: Frame<f64>,
    threads: usize,
    mandelbrot: BoxedSolver,
    newton: BoxedSolver,
}

impl Renderer {
    /// Renderer over the default plane window; `threads == 0` solves on the
    /// calling thread.
    pub fn new(threads: usize) -> Self {
        Self::with_frame(PLANE, threads)
    }

    pub fn with_frame(frame: Frame<f64>, threads: usize) -> Self {
        Self {
            frame,
            threads,
            mandelbrot: make_solver(MandelbrotSolver::default(), threads),
            newton: make_solver(NewtonSolver::default(), threads),
        }
    }

    pub fn single_threaded() -> Self {
        Self::new(0)
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn frame(&self) -> &Frame<f64> {
        &self.frame
    }

    pub fn solve(&self, fractal: Fractal, dims: Dimensions) -> VecState {
        let initial = VecState::initialize(dims, &self.frame);
        match fractal {
            Fractal::Mandelbrot => self.mandelbrot.solve(initial),
            Fractal::Newton => self.newton.solve(initial),
        }
    }

    pub fn render(&self, width: i64, height: i64, contrast: Contrast) -> Result<RgbImage> {
        self.render_fractal(Fractal::Mandelbrot, width, height, contrast)
    }

    pub fn render_fractal(
        &self,
        fractal: Fractal,
        width: i64,
        height: i64,
        contrast: Contrast,
    ) -> Result<RgbImage> {
        let dims = Dimensions::new(width, height)?;
        let start = Instant::now();
        let solved = self.solve(fractal, dims);
        let img = match fractal {
            Fractal::Mandelbrot => PalettePainter::new(contrast).paint(&solved),
            Fractal::Newton => GreyPainter::new(NEWTON_CONTRAST).paint(&solved),
        };
        debug!(
            "rendered {} {}x{} contrast={} in {:?}",
            fractal,
            width,
            height,
            contrast,
            start.elapsed()
        );
        Ok(img)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(num_cpus::get_physical())
    }
}

/// Render a `width`x`height` image of the Mandelbrot set on the calling
/// thread.
pub fn render(width: i64, height: i64, contrast: Contrast) -> Result<RgbImage> {
    Renderer::single_threaded().render(width, height, contrast)
}
