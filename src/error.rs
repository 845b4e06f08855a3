use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors raised by the rendering pipeline itself.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// Width or height was zero, negative or wider than `u32`.
    #[error("invalid image dimensions {width}x{height}, each must be between 1 and {}", u32::MAX)]
    InvalidDimension { width: i64, height: i64 },
}
