//! Pixel Types and Formats
//!
//! A pixel is an opaque `u32` whose bit layout is described by a
//! [`PixelFormat`]. Only this module interprets channels; the drawing
//! algorithms treat pixel values as plain scalars.

use core::fmt;

/// Pixel value in the layout of some [`PixelFormat`]
pub type Pixel = u32;

/// 8-bit RGBA color used as the interchange form between formats
pub type Rgba = [u8; 4];

/// Pixel type tag
///
/// Standard tags are provided as associated constants. Formats registered
/// in a [`FormatRegistry`](crate::registry::FormatRegistry) get fresh tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelType(pub u16);

impl PixelType {
    /// 1-bit grayscale
    pub const G1: PixelType = PixelType(0);
    /// 2-bit grayscale
    pub const G2: PixelType = PixelType(1);
    /// 4-bit grayscale
    pub const G4: PixelType = PixelType(2);
    /// 8-bit grayscale
    pub const G8: PixelType = PixelType(3);
    /// 16-bit RGB 5:6:5
    pub const RGB565: PixelType = PixelType(4);
    /// 24-bit RGB, red in the most significant byte
    pub const RGB888: PixelType = PixelType(5);
    /// 24-bit BGR, blue in the most significant byte
    pub const BGR888: PixelType = PixelType(6);
    /// 32-bit RGB with unused top byte
    pub const XRGB8888: PixelType = PixelType(7);
    /// 32-bit RGBA, alpha in the least significant byte
    pub const RGBA8888: PixelType = PixelType(8);

    /// Index into a registry's descriptor table
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Bits per pixel a codec can address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Depth {
    Bpp1,
    Bpp2,
    Bpp4,
    Bpp8,
    Bpp16,
    Bpp24,
    Bpp32,
}

impl Depth {
    pub const fn bits(self) -> u32 {
        match self {
            Depth::Bpp1 => 1,
            Depth::Bpp2 => 2,
            Depth::Bpp4 => 4,
            Depth::Bpp8 => 8,
            Depth::Bpp16 => 16,
            Depth::Bpp24 => 24,
            Depth::Bpp32 => 32,
        }
    }

    /// Whether several pixels share one byte
    pub const fn is_sub_byte(self) -> bool {
        self.bits() < 8
    }

    /// Mask covering every bit of a pixel
    pub const fn mask(self) -> Pixel {
        match self {
            Depth::Bpp32 => Pixel::MAX,
            _ => (1 << self.bits()) - 1,
        }
    }
}

/// Meaning of a channel within a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Red,
    Green,
    Blue,
    Alpha,
    /// Grayscale intensity
    Value,
    /// Unused bits
    Pad,
}

/// A bit field within a pixel value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel {
    pub kind: ChannelKind,
    /// Bit offset from the least significant bit
    pub offset: u8,
    /// Width in bits
    pub size: u8,
}

impl Channel {
    pub const fn new(kind: ChannelKind, offset: u8, size: u8) -> Self {
        Self { kind, offset, size }
    }

    #[inline]
    fn max(&self) -> u32 {
        if self.size >= 32 {
            u32::MAX
        } else {
            (1u32 << self.size) - 1
        }
    }

    /// Extract this channel scaled to 8 bits
    #[inline]
    fn get8(&self, pixel: Pixel) -> u8 {
        let v = (pixel >> self.offset) & self.max();
        if self.size >= 8 {
            (v >> (self.size - 8)) as u8
        } else {
            (v * 255 / self.max()) as u8
        }
    }

    /// Scale an 8-bit value to this channel and move it into place
    #[inline]
    fn put8(&self, value: u8) -> Pixel {
        let v = if self.size >= 8 {
            (value as u32) << (self.size - 8)
        } else {
            (value as u32 * self.max() + 127) / 255
        };
        (v & self.max()) << self.offset
    }
}

/// Maximum number of channels in one format
pub const MAX_CHANNELS: usize = 4;

/// Fixed-capacity list of channels
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelLayout {
    channels: [Channel; MAX_CHANNELS],
    len: u8,
}

impl ChannelLayout {
    const PAD: Channel = Channel::new(ChannelKind::Pad, 0, 0);

    /// Build a layout. Channels past [`MAX_CHANNELS`] are a caller error
    /// reported by the registry; here they are dropped.
    pub const fn new(list: &[Channel]) -> Self {
        let mut channels = [Self::PAD; MAX_CHANNELS];
        let mut i = 0;
        while i < list.len() && i < MAX_CHANNELS {
            channels[i] = list[i];
            i += 1;
        }
        Self {
            channels,
            len: i as u8,
        }
    }

    pub fn as_slice(&self) -> &[Channel] {
        &self.channels[..self.len as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.as_slice().iter()
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Description of one pixel representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    pub pixel_type: PixelType,
    pub name: &'static str,
    pub depth: Depth,
    pub channels: ChannelLayout,
}

impl PixelFormat {
    pub const fn new(
        pixel_type: PixelType,
        name: &'static str,
        depth: Depth,
        channels: &[Channel],
    ) -> Self {
        Self {
            pixel_type,
            name,
            depth,
            channels: ChannelLayout::new(channels),
        }
    }

    #[inline]
    pub const fn bits_per_pixel(&self) -> u32 {
        self.depth.bits()
    }

    /// Bytes touched by one pixel, rounded up for sub-byte formats
    #[inline]
    pub const fn bytes_per_pixel(&self) -> usize {
        (self.depth.bits() as usize + 7) / 8
    }

    /// Packed size of a row of `width` pixels
    #[inline]
    pub fn row_bytes(&self, width: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(self.depth.bits() as usize)
            .map(|bits| bits.div_ceil(8))
    }

    /// Find a channel by meaning
    pub fn channel(&self, kind: ChannelKind) -> Option<Channel> {
        self.channels.iter().find(|c| c.kind == kind).copied()
    }

    pub fn has_alpha(&self) -> bool {
        self.channel(ChannelKind::Alpha).is_some()
    }

    pub fn is_gray(&self) -> bool {
        self.channel(ChannelKind::Value).is_some()
    }

    /// Decode a pixel into 8-bit RGBA
    ///
    /// Gray is replicated into all color channels, a missing alpha channel
    /// reads as opaque.
    pub fn unpack(&self, pixel: Pixel) -> Rgba {
        let mut rgba = [0, 0, 0, 255];
        for ch in self.channels.iter() {
            match ch.kind {
                ChannelKind::Red => rgba[0] = ch.get8(pixel),
                ChannelKind::Green => rgba[1] = ch.get8(pixel),
                ChannelKind::Blue => rgba[2] = ch.get8(pixel),
                ChannelKind::Alpha => rgba[3] = ch.get8(pixel),
                ChannelKind::Value => {
                    let v = ch.get8(pixel);
                    rgba[0] = v;
                    rgba[1] = v;
                    rgba[2] = v;
                }
                ChannelKind::Pad => {}
            }
        }
        rgba
    }

    /// Encode an 8-bit RGBA color. Gray formats take the channel average.
    pub fn pack(&self, rgba: Rgba) -> Pixel {
        let [r, g, b, a] = rgba;
        let mut pixel = 0;
        for ch in self.channels.iter() {
            pixel |= match ch.kind {
                ChannelKind::Red => ch.put8(r),
                ChannelKind::Green => ch.put8(g),
                ChannelKind::Blue => ch.put8(b),
                ChannelKind::Alpha => ch.put8(a),
                ChannelKind::Value => ch.put8(((r as u32 + g as u32 + b as u32) / 3) as u8),
                ChannelKind::Pad => 0,
            };
        }
        pixel
    }

    /// Resolve an opaque RGB color to a pixel value
    pub fn rgb(&self, r: u8, g: u8, b: u8) -> Pixel {
        self.pack([r, g, b, 255])
    }

    /// Re-encode a pixel of this format in another format
    pub fn convert(&self, pixel: Pixel, to: &PixelFormat) -> Pixel {
        if self.channels == to.channels && self.depth == to.depth {
            return pixel & to.depth.mask();
        }
        to.pack(self.unpack(pixel))
    }
}

use ChannelKind::{Alpha, Blue, Green, Pad, Red, Value};

/// Formats every registry starts with, indexed by their tag
pub const STANDARD_FORMATS: [PixelFormat; 9] = [
    PixelFormat::new(PixelType::G1, "G1", Depth::Bpp1, &[Channel::new(Value, 0, 1)]),
    PixelFormat::new(PixelType::G2, "G2", Depth::Bpp2, &[Channel::new(Value, 0, 2)]),
    PixelFormat::new(PixelType::G4, "G4", Depth::Bpp4, &[Channel::new(Value, 0, 4)]),
    PixelFormat::new(PixelType::G8, "G8", Depth::Bpp8, &[Channel::new(Value, 0, 8)]),
    PixelFormat::new(
        PixelType::RGB565,
        "RGB565",
        Depth::Bpp16,
        &[
            Channel::new(Red, 11, 5),
            Channel::new(Green, 5, 6),
            Channel::new(Blue, 0, 5),
        ],
    ),
    PixelFormat::new(
        PixelType::RGB888,
        "RGB888",
        Depth::Bpp24,
        &[
            Channel::new(Red, 16, 8),
            Channel::new(Green, 8, 8),
            Channel::new(Blue, 0, 8),
        ],
    ),
    PixelFormat::new(
        PixelType::BGR888,
        "BGR888",
        Depth::Bpp24,
        &[
            Channel::new(Blue, 16, 8),
            Channel::new(Green, 8, 8),
            Channel::new(Red, 0, 8),
        ],
    ),
    PixelFormat::new(
        PixelType::XRGB8888,
        "xRGB8888",
        Depth::Bpp32,
        &[
            Channel::new(Pad, 24, 8),
            Channel::new(Red, 16, 8),
            Channel::new(Green, 8, 8),
            Channel::new(Blue, 0, 8),
        ],
    ),
    PixelFormat::new(
        PixelType::RGBA8888,
        "RGBA8888",
        Depth::Bpp32,
        &[
            Channel::new(Red, 24, 8),
            Channel::new(Green, 16, 8),
            Channel::new(Blue, 8, 8),
            Channel::new(Alpha, 0, 8),
        ],
    ),
];
