//! Softraster - software rasterization into in-memory pixel buffers
//!
//! This crate draws primitives and copies rectangular regions directly into
//! pixmaps of any supported bit depth, and tracks the region of the screen
//! that has to be redisplayed afterwards.
//!
//! # Architecture
//!
//! - `bbox`: Rectangle value type with a canonical empty value
//! - `pixel`: Pixel type tags, channel layouts and color conversion
//! - `registry`: Table of known pixel formats
//! - `codec`: Per bit depth pixel encoding, selected with [`with_codec!`]
//! - `access`: Pixel access traits the drawing algorithms are written against
//! - `pixmap`: Owned pixel buffer
//! - `gfx`: Circles, lines, rectangles and tetragons
//! - `blit`: Rectangular copies between pixmaps
//! - `damage`: Damage accumulation and flushing to a display backend
//! - `painter`: Pixmap and damage tracker bound together

#![no_std]

extern crate alloc;

pub mod access;
pub mod bbox;
pub mod blit;
pub mod codec;
pub mod damage;
pub mod gfx;
pub mod painter;
pub mod pixel;
pub mod pixmap;
pub mod registry;

use core::fmt;

pub use bbox::{BBox, Coord, Size};
pub use blit::{blit, blit_clipped, blit_xywh, blit_xywh_clipped};
pub use damage::{DamageConfig, DamageStats, DamageTracker, DisplayBackend, Redraw};
pub use painter::Painter;
pub use pixel::{Channel, ChannelKind, Depth, Pixel, PixelFormat, PixelType, Rgba};
pub use pixmap::{Orientation, Pixmap, PixmapConfig};
pub use registry::FormatRegistry;

/// Errors returned by fallible construction and configuration calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// Buffer size does not fit in memory.
    DimensionsTooLarge { width: u32, height: u32 },
    /// Stride alignment is not a power of two.
    InvalidStrideAlign(usize),
    /// Stride is shorter than one packed row.
    StrideTooSmall { stride: usize, min: usize },
    /// Pixel data is shorter than stride * height.
    BufferTooSmall { len: usize, required: usize },
    /// Pixel type is not in the registry.
    UnknownPixelType(PixelType),
    /// A format with this name already exists.
    DuplicateFormat(&'static str),
    /// Channel layout of the named format is invalid.
    InvalidChannel(&'static str),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::DimensionsTooLarge { width, height } => {
                write!(f, "dimensions {}x{} too large", width, height)
            }
            RasterError::InvalidStrideAlign(align) => {
                write!(f, "stride alignment {} is not a power of two", align)
            }
            RasterError::StrideTooSmall { stride, min } => {
                write!(f, "stride {} smaller than row size {}", stride, min)
            }
            RasterError::BufferTooSmall { len, required } => {
                write!(f, "buffer of {} bytes, {} required", len, required)
            }
            RasterError::UnknownPixelType(pixel_type) => {
                write!(f, "unknown pixel type {}", pixel_type.0)
            }
            RasterError::DuplicateFormat(name) => write!(f, "format {} already registered", name),
            RasterError::InvalidChannel(name) => write!(f, "invalid channel layout for {}", name),
        }
    }
}

impl core::error::Error for RasterError {}
