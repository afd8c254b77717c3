//! Per-Depth Pixel Codecs
//!
//! The only place that knows how pixels sit in memory. Everything above
//! this layer is written once, generic over [`PixelCodec`], and selected per
//! pixmap with [`with_codec!`](crate::with_codec).
//!
//! Multi-byte pixels are stored little-endian. Sub-byte pixels are packed
//! most significant bits first, so pixel 0 of a 1 bpp row is bit 7 of the
//! first byte.

use crate::pixel::Pixel;

/// Reads and writes pixel values of one bit depth
pub trait PixelCodec {
    /// Bits per pixel
    const BITS: u32;

    /// Read pixel `x` of the row starting at byte `row`
    fn read(data: &[u8], row: usize, x: u32) -> Pixel;

    /// Write pixel `x` of the row starting at byte `row`.
    /// Bits above [`Self::BITS`] are ignored.
    fn write(data: &mut [u8], row: usize, x: u32, pixel: Pixel);
}

/// 1, 2 or 4 bits per pixel, MSB first
#[derive(Debug, Clone, Copy)]
pub struct SubByte<const BITS: u32>;

/// 1 to 4 whole bytes per pixel, little-endian
#[derive(Debug, Clone, Copy)]
pub struct ByteAligned<const N: usize>;

impl<const BITS: u32> SubByte<BITS> {
    const MASK: u8 = ((1u16 << BITS) - 1) as u8;

    #[inline(always)]
    fn locate(row: usize, x: u32) -> (usize, u32) {
        let bit = x as usize * BITS as usize;
        let shift = 8 - BITS - (bit % 8) as u32;
        (row + bit / 8, shift)
    }
}

impl<const BITS: u32> PixelCodec for SubByte<BITS> {
    const BITS: u32 = BITS;

    #[inline(always)]
    fn read(data: &[u8], row: usize, x: u32) -> Pixel {
        let (byte, shift) = Self::locate(row, x);
        ((data[byte] >> shift) & Self::MASK) as Pixel
    }

    #[inline(always)]
    fn write(data: &mut [u8], row: usize, x: u32, pixel: Pixel) {
        let (byte, shift) = Self::locate(row, x);
        let mask = Self::MASK << shift;
        data[byte] = (data[byte] & !mask) | (((pixel as u8) << shift) & mask);
    }
}

impl<const N: usize> PixelCodec for ByteAligned<N> {
    const BITS: u32 = N as u32 * 8;

    #[inline(always)]
    fn read(data: &[u8], row: usize, x: u32) -> Pixel {
        let start = row + x as usize * N;
        let mut bytes = [0u8; 4];
        bytes[..N].copy_from_slice(&data[start..start + N]);
        Pixel::from_le_bytes(bytes)
    }

    #[inline(always)]
    fn write(data: &mut [u8], row: usize, x: u32, pixel: Pixel) {
        let start = row + x as usize * N;
        data[start..start + N].copy_from_slice(&pixel.to_le_bytes()[..N]);
    }
}

/// Run `$body` with `$codec` bound to the codec type for `$depth`
///
/// ```
/// use softraster::{codec::PixelCodec, pixel::Depth, with_codec};
///
/// let bits = with_codec!(Depth::Bpp24, C => C::BITS);
/// assert_eq!(bits, 24);
/// ```
#[macro_export]
macro_rules! with_codec {
    ($depth:expr, $codec:ident => $body:expr) => {
        match $depth {
            $crate::pixel::Depth::Bpp1 => {
                type $codec = $crate::codec::SubByte<1>;
                $body
            }
            $crate::pixel::Depth::Bpp2 => {
                type $codec = $crate::codec::SubByte<2>;
                $body
            }
            $crate::pixel::Depth::Bpp4 => {
                type $codec = $crate::codec::SubByte<4>;
                $body
            }
            $crate::pixel::Depth::Bpp8 => {
                type $codec = $crate::codec::ByteAligned<1>;
                $body
            }
            $crate::pixel::Depth::Bpp16 => {
                type $codec = $crate::codec::ByteAligned<2>;
                $body
            }
            $crate::pixel::Depth::Bpp24 => {
                type $codec = $crate::codec::ByteAligned<3>;
                $body
            }
            $crate::pixel::Depth::Bpp32 => {
                type $codec = $crate::codec::ByteAligned<4>;
                $body
            }
        }
    };
}
