use num::{Num, NumCast};

use crate::complex::{c, C};
use crate::error::{RenderError, Result};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Axis<T> {
    pub min: T,
    pub max: T,
}

impl<T> Axis<T>
where
    T: Num + Copy,
{
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn length(&self) -> T {
        self.max - self.min
    }
}

impl Axis<f64> {
    /// Position `n` out of `steps` equal steps from `min`, never reaching `max`.
    pub fn interpolate(&self, n: u32, steps: u32) -> f64 {
        n as f64 / steps as f64 * self.length() + self.min
    }
}

/// Rectangular region of the complex plane sampled by an image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame<T> {
    pub x: Axis<T>,
    pub y: Axis<T>,
}

impl<T> Frame<T>
where
    T: Num + Copy,
{
    pub const fn new(x: Axis<T>, y: Axis<T>) -> Self {
        Self { x, y }
    }
}

impl Frame<f64> {
    /// Complex point represented by pixel (px, py) of an image of size `dims`.
    pub fn sample(&self, px: u32, py: u32, dims: Dimensions) -> C<f64> {
        c(
            self.x.interpolate(px, dims.width),
            self.y.interpolate(py, dims.height),
        )
    }
}

/// The fixed window {xmin=-2, ymin=-2, xmax=2, ymax=2}.
pub const PLANE: Frame<f64> = Frame::new(Axis::new(-2.0, 2.0), Axis::new(-2.0, 2.0));

/// Width and height of a pixel grid, both known to be positive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Dimensions {
    pub fn new<W, H>(width: W, height: H) -> Result<Self>
    where
        W: NumCast + Copy,
        H: NumCast + Copy,
    {
        let invalid = || RenderError::InvalidDimension {
            width: NumCast::from(width).unwrap_or(i64::MIN),
            height: NumCast::from(height).unwrap_or(i64::MIN),
        };
        let w: u32 = NumCast::from(width).ok_or_else(invalid)?;
        let h: u32 = NumCast::from(height).ok_or_else(invalid)?;
        if w == 0 || h == 0 {
            return Err(invalid());
        }
        Ok(Self {
            width: w,
            height: h,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major iterator over every (px, py) in the grid.
    pub fn iter(&self) -> PixelIter {
        PixelIter {
            dims: *self,
            x: 0,
            y: 0,
        }
    }
}

impl IntoIterator for Dimensions {
    type Item = (u32, u32);
    type IntoIter = PixelIter;
    fn into_iter(self) -> PixelIter {
        self.iter()
    }
}

pub struct PixelIter {
    dims: Dimensions,
    x: u32,
    y: u32,
}

impl Iterator for PixelIter {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<(u32, u32)> {
        if self.y >= self.dims.height {
            return None;
        }
        let current = (self.x, self.y);
        self.x += 1;
        if self.x == self.dims.width {
            self.x = 0;
            self.y += 1;
        }
        Some(current)
    }
}
