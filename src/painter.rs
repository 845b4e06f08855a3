use std::fmt;

use image::{Rgb, RgbImage};
use rand::Rng;

use crate::palette::{Palette, PLAN9};
use crate::solver::{Escape, VecState};

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Exclusive upper bound of randomly drawn contrast values.
pub const RANDOM_CONTRAST_BOUND: u8 = 15;

/// Multiplier applied to escape counts when picking a palette slot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Contrast(pub u8);

impl Contrast {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self(rng.gen_range(0..RANDOM_CONTRAST_BOUND))
    }

    /// `255 - contrast * n` in wrapping 8 bit arithmetic.
    pub fn index(&self, n: u16) -> u8 {
        255u8.wrapping_sub(self.0.wrapping_mul(n as u8))
    }
}

impl From<u8> for Contrast {
    fn from(c: u8) -> Self {
        Self(c)
    }
}

impl fmt::Display for Contrast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait Painter {
    fn escape_color(&self, n: u16) -> Rgb<u8>;

    fn color(&self, escape: Escape) -> Rgb<u8> {
        match escape {
            Escape::After(n) => self.escape_color(n),
            Escape::Never => BLACK,
        }
    }

    fn paint(&self, state: &VecState) -> RgbImage {
        let width: u32 = state.width() as u32;
        let height: u32 = state.height() as u32;
        RgbImage::from_fn(width, height, |x, y| {
            self.color(state.escape(x as usize, y as usize))
        })
    }
}

/// Looks escape counts up in a 256 entry palette.
pub struct PalettePainter {
    palette: &'static Palette,
    contrast: Contrast,
}

impl PalettePainter {
    pub fn new(contrast: Contrast) -> Self {
        Self::with_palette(&PLAN9, contrast)
    }

    pub fn with_palette(palette: &'static Palette, contrast: Contrast) -> Self {
        Self { palette, contrast }
    }
}

impl Painter for PalettePainter {
    fn escape_color(&self, n: u16) -> Rgb<u8> {
        self.palette[self.contrast.index(n) as usize]
    }
}

/// Shades escape counts from white down to black.
pub struct GreyPainter {
    contrast: Contrast,
}

impl GreyPainter {
    pub fn new(contrast: Contrast) -> Self {
        Self { contrast }
    }
}

impl Painter for GreyPainter {
    fn escape_color(&self, n: u16) -> Rgb<u8> {
        let v = self.contrast.index(n);
        Rgb([v, v, v])
    }
}

/// Color of a single escape result with the Plan 9 palette.
pub fn color_of(escape: Escape, contrast: Contrast) -> Rgb<u8> {
    PalettePainter::new(contrast).color(escape)
}
