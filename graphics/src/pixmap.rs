//! Pixmap - Owned pixel buffer
//!
//! A Pixmap owns a contiguous block of pixel memory together with its
//! geometry, row stride and pixel format. Rows may be padded beyond their
//! packed size; padding bytes are never touched by drawing operations.

use alloc::vec;
use alloc::vec::Vec;
use bitflags::bitflags;
use core::fmt;

use crate::bbox::{BBox, Coord};
use crate::pixel::{Pixel, PixelFormat, PixelType};
use crate::registry::FormatRegistry;
use crate::RasterError;

bitflags! {
    /// Coordinate transform applied by the oriented drawing functions.
    ///
    /// The axes are swapped first, then mirrored.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Orientation: u8 {
        /// Swap x and y.
        const AXES_SWAP = 1 << 0;
        /// Mirror horizontally.
        const X_SWAP = 1 << 1;
        /// Mirror vertically.
        const Y_SWAP = 1 << 2;
    }
}

impl Orientation {
    /// Rotate 90 degrees clockwise
    pub const ROTATE_CW: Orientation = Orientation::AXES_SWAP.union(Orientation::X_SWAP);
    /// Rotate 180 degrees
    pub const ROTATE_180: Orientation = Orientation::X_SWAP.union(Orientation::Y_SWAP);
    /// Rotate 90 degrees counter-clockwise
    pub const ROTATE_CCW: Orientation = Orientation::AXES_SWAP.union(Orientation::Y_SWAP);
}

/// Pixmap creation options
#[derive(Debug, Clone)]
pub struct PixmapConfig {
    /// Row stride is rounded up to a multiple of this (power of two)
    pub stride_align: usize,
    /// Initial orientation
    pub orientation: Orientation,
}

impl Default for PixmapConfig {
    fn default() -> Self {
        Self {
            stride_align: 1,
            orientation: Orientation::empty(),
        }
    }
}

/// An owned pixel buffer
#[derive(Clone)]
pub struct Pixmap {
    width: u32,
    height: u32,
    stride: usize,
    stride_align: usize,
    format: PixelFormat,
    data: Vec<u8>,
    clip: Option<BBox>,
    orientation: Orientation,
}

impl Pixmap {
    /// Create a zeroed pixmap with a standard pixel type
    ///
    /// # Panics
    /// If the pixel type is unknown or the size overflows. Use
    /// [`Pixmap::try_new`] to handle these as errors.
    pub fn new(width: u32, height: u32, pixel_type: PixelType) -> Self {
        match Self::try_new(width, height, pixel_type) {
            Ok(pixmap) => pixmap,
            Err(err) => panic!("cannot create {}x{} pixmap: {}", width, height, err),
        }
    }

    /// Create a zeroed pixmap with a standard pixel type
    pub fn try_new(width: u32, height: u32, pixel_type: PixelType) -> Result<Self, RasterError> {
        Self::from_registry(
            FormatRegistry::standard(),
            width,
            height,
            pixel_type,
            &PixmapConfig::default(),
        )
    }

    /// Create a zeroed pixmap with a format looked up in `registry`
    pub fn from_registry(
        registry: &FormatRegistry,
        width: u32,
        height: u32,
        pixel_type: PixelType,
        config: &PixmapConfig,
    ) -> Result<Self, RasterError> {
        Self::with_format(registry.format(pixel_type)?, width, height, config)
    }

    /// Create a zeroed pixmap with an explicit format
    pub fn with_format(
        format: PixelFormat,
        width: u32,
        height: u32,
        config: &PixmapConfig,
    ) -> Result<Self, RasterError> {
        let stride = Self::stride_for(&format, width, height, config.stride_align)?;
        let size = stride
            .checked_mul(height as usize)
            .ok_or(RasterError::DimensionsTooLarge { width, height })?;

        Ok(Self {
            width,
            height,
            stride,
            stride_align: config.stride_align,
            format,
            data: vec![0u8; size],
            clip: None,
            orientation: config.orientation,
        })
    }

    /// Adopt pixel data produced elsewhere, e.g. by an image loader
    pub fn from_raw(
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, RasterError> {
        let min = Self::stride_for(&format, width, height, 1)?;
        if stride < min {
            return Err(RasterError::StrideTooSmall { stride, min });
        }
        let required = stride
            .checked_mul(height as usize)
            .ok_or(RasterError::DimensionsTooLarge { width, height })?;
        if data.len() < required {
            return Err(RasterError::BufferTooSmall {
                len: data.len(),
                required,
            });
        }

        Ok(Self {
            width,
            height,
            stride,
            stride_align: 1,
            format,
            data,
            clip: None,
            orientation: Orientation::empty(),
        })
    }

    fn stride_for(
        format: &PixelFormat,
        width: u32,
        height: u32,
        align: usize,
    ) -> Result<usize, RasterError> {
        if !align.is_power_of_two() {
            return Err(RasterError::InvalidStrideAlign(align));
        }
        if width > Coord::MAX as u32 || height > Coord::MAX as u32 {
            return Err(RasterError::DimensionsTooLarge { width, height });
        }
        format
            .row_bytes(width)
            .and_then(|row| row.checked_next_multiple_of(align))
            .ok_or(RasterError::DimensionsTooLarge { width, height })
    }

    /// Reallocate for a new size. All pixels are reset to zero.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RasterError> {
        let stride = Self::stride_for(&self.format, width, height, self.stride_align)?;
        let size = stride
            .checked_mul(height as usize)
            .ok_or(RasterError::DimensionsTooLarge { width, height })?;

        log::debug!(
            "Resizing {} pixmap {}x{} -> {}x{}",
            self.format.name,
            self.width,
            self.height,
            width,
            height
        );

        self.data = vec![0u8; size];
        self.width = width;
        self.height = height;
        self.stride = stride;
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row, including padding
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    #[inline]
    pub fn pixel_type(&self) -> PixelType {
        self.format.pixel_type
    }

    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Packed bytes of one row, without padding
    #[inline]
    pub fn row_bytes(&self) -> usize {
        (self.width as usize * self.format.bits_per_pixel() as usize).div_ceil(8)
    }

    /// Raw pixel memory
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw pixel memory
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Give up the pixel memory
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Packed bytes of row `y`
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.row_bytes()]
    }

    /// Mutable packed bytes of row `y`
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let len = self.row_bytes();
        &mut self.data[start..start + len]
    }

    /// The whole buffer as a box at the origin
    #[inline]
    pub fn bounds(&self) -> BBox {
        BBox::pack(0, 0, self.width, self.height)
    }

    /// Clip rectangle set by the user, if any
    pub fn clip(&self) -> Option<BBox> {
        self.clip
    }

    /// Restrict drawing to a rectangle. `None` allows the whole buffer.
    pub fn set_clip(&mut self, clip: Option<BBox>) {
        self.clip = clip;
    }

    /// Area drawing operations may write to
    #[inline]
    pub fn clip_rect(&self) -> BBox {
        match self.clip {
            Some(clip) => clip.intersect(&self.bounds()),
            None => self.bounds(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Width as seen through the orientation
    pub fn oriented_width(&self) -> u32 {
        if self.orientation.contains(Orientation::AXES_SWAP) {
            self.height
        } else {
            self.width
        }
    }

    /// Height as seen through the orientation
    pub fn oriented_height(&self) -> u32 {
        if self.orientation.contains(Orientation::AXES_SWAP) {
            self.width
        } else {
            self.height
        }
    }

    /// Map an oriented point to buffer coordinates
    pub fn transform_point(&self, x: Coord, y: Coord) -> (Coord, Coord) {
        let (mut x, mut y) = if self.orientation.contains(Orientation::AXES_SWAP) {
            (y, x)
        } else {
            (x, y)
        };
        if self.orientation.contains(Orientation::X_SWAP) {
            x = mirror(self.width, x);
        }
        if self.orientation.contains(Orientation::Y_SWAP) {
            y = mirror(self.height, y);
        }
        (x, y)
    }

    /// Map an oriented box to buffer coordinates
    pub fn transform_bbox(&self, bbox: &BBox) -> BBox {
        if bbox.is_empty() {
            return BBox::EMPTY;
        }
        let x1 = bbox.x1().clamp(Coord::MIN as i64, Coord::MAX as i64) as Coord;
        let y1 = bbox.y1().clamp(Coord::MIN as i64, Coord::MAX as i64) as Coord;
        let (ax, ay) = self.transform_point(bbox.x(), bbox.y());
        let (bx, by) = self.transform_point(x1, y1);
        BBox::from_xyxy(ax, ay, bx, by)
    }

    /// Read a pixel; anything outside the buffer reads as 0
    pub fn get_pixel(&self, x: Coord, y: Coord) -> Pixel {
        if !self.bounds().contains(x, y) {
            return 0;
        }
        self.read(x as u32, y as u32)
    }

    /// Write a pixel; anything outside the clip area is skipped
    pub fn put_pixel(&mut self, x: Coord, y: Coord, pixel: Pixel) {
        if !self.clip_rect().contains(x, y) {
            return;
        }
        self.write(x as u32, y as u32, pixel);
    }

    /// Read a pixel that must lie inside the buffer
    ///
    /// # Panics
    /// If `(x, y)` is outside the buffer.
    pub fn get_pixel_raw(&self, x: u32, y: u32) -> Pixel {
        self.check_bounds(x, y);
        self.read(x, y)
    }

    /// Write a pixel that must lie inside the buffer. Bits above the
    /// format's depth are dropped.
    ///
    /// # Panics
    /// If `(x, y)` is outside the buffer.
    pub fn put_pixel_raw(&mut self, x: u32, y: u32, pixel: Pixel) {
        self.check_bounds(x, y);
        self.write(x, y, pixel);
    }

    /// Set every pixel, ignoring the clip rectangle
    pub fn fill(&mut self, pixel: Pixel) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        for x in 0..self.width {
            self.write(x, 0, pixel);
        }
        let row = self.row_bytes();
        for y in 1..self.height as usize {
            self.data.copy_within(0..row, y * self.stride);
        }
    }

    /// Reset every pixel to zero
    pub fn clear(&mut self) {
        self.fill(0);
    }

    #[inline]
    fn check_bounds(&self, x: u32, y: u32) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside {}x{} pixmap",
            x,
            y,
            self.width,
            self.height
        );
    }

    #[inline]
    fn read(&self, x: u32, y: u32) -> Pixel {
        let row = y as usize * self.stride;
        crate::with_codec!(self.format.depth, C => {
            <C as crate::codec::PixelCodec>::read(&self.data, row, x)
        })
    }

    #[inline]
    fn write(&mut self, x: u32, y: u32, pixel: Pixel) {
        let row = y as usize * self.stride;
        crate::with_codec!(self.format.depth, C => {
            <C as crate::codec::PixelCodec>::write(&mut self.data, row, x, pixel)
        })
    }
}

fn mirror(size: u32, v: Coord) -> Coord {
    (size as i64 - 1 - v as i64).clamp(Coord::MIN as i64, Coord::MAX as i64) as Coord
}

impl fmt::Debug for Pixmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pixmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("format", &self.format.name)
            .field("clip", &self.clip)
            .field("orientation", &self.orientation)
            .finish_non_exhaustive()
    }
}
