//! Pixel Access
//!
//! Drawing algorithms are written against [`PixelSink`] and [`PixelSource`]
//! instead of against a concrete pixel layout. [`Canvas`] and [`Reader`]
//! implement them for a pixmap and one [`PixelCodec`], so every algorithm is
//! instantiated once per bit depth with no per-format source.

use core::marker::PhantomData;

use crate::bbox::{BBox, Coord};
use crate::codec::PixelCodec;
use crate::pixel::Pixel;
use crate::pixmap::Pixmap;

/// Destination of drawing operations
pub trait PixelSink {
    /// Area writes are allowed in, never larger than the buffer
    fn clip(&self) -> BBox;

    /// Write one pixel. `(x, y)` must lie inside [`Self::clip`].
    fn put_raw(&mut self, x: u32, y: u32, pixel: Pixel);

    /// Write one pixel, silently skipping anything outside the clip area
    #[inline]
    fn put(&mut self, x: Coord, y: Coord, pixel: Pixel) {
        if self.clip().contains(x, y) {
            self.put_raw(x as u32, y as u32, pixel);
        }
    }

    /// Clipped horizontal span, endpoints inclusive and in any order
    fn hline(&mut self, x0: Coord, x1: Coord, y: Coord, pixel: Pixel) {
        let clip = self.clip();
        if clip.is_empty() || (y as i64) < clip.y() as i64 || (y as i64) > clip.y1() {
            return;
        }
        let lo = (x0.min(x1) as i64).max(clip.x() as i64);
        let hi = (x0.max(x1) as i64).min(clip.x1());
        for x in lo..=hi {
            self.put_raw(x as u32, y as u32, pixel);
        }
    }

    /// Clipped vertical span, endpoints inclusive and in any order
    fn vline(&mut self, x: Coord, y0: Coord, y1: Coord, pixel: Pixel) {
        let clip = self.clip();
        if clip.is_empty() || (x as i64) < clip.x() as i64 || (x as i64) > clip.x1() {
            return;
        }
        let lo = (y0.min(y1) as i64).max(clip.y() as i64);
        let hi = (y0.max(y1) as i64).min(clip.y1());
        for y in lo..=hi {
            self.put_raw(x as u32, y as u32, pixel);
        }
    }
}

/// Source of pixel values
pub trait PixelSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Read one pixel. `(x, y)` must lie inside the buffer.
    fn get_raw(&self, x: u32, y: u32) -> Pixel;
}

/// Write access to a pixmap through one codec
pub struct Canvas<'a, C: PixelCodec> {
    data: &'a mut [u8],
    stride: usize,
    width: u32,
    height: u32,
    clip: BBox,
    _codec: PhantomData<C>,
}

impl<'a, C: PixelCodec> Canvas<'a, C> {
    /// Borrow `pixmap` for writing, honouring its clip rectangle
    ///
    /// # Panics
    /// If `C` does not match the pixmap's bit depth.
    pub fn new(pixmap: &'a mut Pixmap) -> Self {
        assert_eq!(
            C::BITS,
            pixmap.format().bits_per_pixel(),
            "codec does not match pixmap depth"
        );
        let clip = pixmap.clip_rect();
        let (width, height, stride) = (pixmap.width(), pixmap.height(), pixmap.stride());
        Self {
            data: pixmap.data_mut(),
            stride,
            width,
            height,
            clip,
            _codec: PhantomData,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl<C: PixelCodec> PixelSink for Canvas<'_, C> {
    #[inline]
    fn clip(&self) -> BBox {
        self.clip
    }

    #[inline]
    fn put_raw(&mut self, x: u32, y: u32, pixel: Pixel) {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside {}x{} buffer",
            x,
            y,
            self.width,
            self.height
        );
        C::write(self.data, y as usize * self.stride, x, pixel);
    }
}

/// Read access to a pixmap through one codec
pub struct Reader<'a, C: PixelCodec> {
    data: &'a [u8],
    stride: usize,
    width: u32,
    height: u32,
    _codec: PhantomData<C>,
}

impl<'a, C: PixelCodec> Reader<'a, C> {
    /// Borrow `pixmap` for reading
    ///
    /// # Panics
    /// If `C` does not match the pixmap's bit depth.
    pub fn new(pixmap: &'a Pixmap) -> Self {
        assert_eq!(
            C::BITS,
            pixmap.format().bits_per_pixel(),
            "codec does not match pixmap depth"
        );
        Self {
            data: pixmap.data(),
            stride: pixmap.stride(),
            width: pixmap.width(),
            height: pixmap.height(),
            _codec: PhantomData,
        }
    }
}

impl<C: PixelCodec> PixelSource for Reader<'_, C> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn get_raw(&self, x: u32, y: u32) -> Pixel {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside {}x{} buffer",
            x,
            y,
            self.width,
            self.height
        );
        C::read(self.data, y as usize * self.stride, x)
    }
}
