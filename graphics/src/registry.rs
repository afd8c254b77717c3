//! Pixel Format Registry
//!
//! Owns the table of known pixel formats. Lookup by tag is a plain index,
//! lookup by name goes through a hash map. Pixmaps copy their descriptor out
//! of a registry when they are created.

use alloc::vec::Vec;
use hashbrown::HashMap;
use spin::Lazy;

use crate::pixel::{Channel, ChannelKind, Depth, PixelFormat, PixelType, MAX_CHANNELS, STANDARD_FORMATS};
use crate::RasterError;

static STANDARD: Lazy<FormatRegistry> = Lazy::new(FormatRegistry::new);

/// Table of pixel formats
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: Vec<PixelFormat>,
    by_name: HashMap<&'static str, PixelType>,
}

impl FormatRegistry {
    /// Create a registry holding the standard formats
    pub fn new() -> Self {
        let mut registry = Self {
            formats: Vec::with_capacity(STANDARD_FORMATS.len()),
            by_name: HashMap::with_capacity(STANDARD_FORMATS.len()),
        };
        for format in STANDARD_FORMATS {
            registry.by_name.insert(format.name, format.pixel_type);
            registry.formats.push(format);
        }
        registry
    }

    /// Shared immutable registry with the standard formats
    pub fn standard() -> &'static FormatRegistry {
        &STANDARD
    }

    /// Look up a format by tag
    #[inline]
    pub fn get(&self, pixel_type: PixelType) -> Option<&PixelFormat> {
        self.formats.get(pixel_type.index())
    }

    /// Look up a format by tag, failing with a typed error
    pub fn format(&self, pixel_type: PixelType) -> Result<PixelFormat, RasterError> {
        self.get(pixel_type)
            .copied()
            .ok_or(RasterError::UnknownPixelType(pixel_type))
    }

    /// Look up a tag by format name
    pub fn by_name(&self, name: &str) -> Option<PixelType> {
        self.by_name.get(name).copied()
    }

    /// Number of known formats
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PixelFormat> {
        self.formats.iter()
    }

    /// Register a new format and return its tag
    ///
    /// Channels must fit within the pixel depth and must not overlap.
    pub fn register(
        &mut self,
        name: &'static str,
        depth: Depth,
        channels: &[Channel],
    ) -> Result<PixelType, RasterError> {
        if self.by_name.contains_key(name) {
            return Err(RasterError::DuplicateFormat(name));
        }
        if channels.is_empty() || channels.len() > MAX_CHANNELS {
            return Err(RasterError::InvalidChannel(name));
        }

        let mut used: u32 = 0;
        for ch in channels {
            let end = ch.offset as u32 + ch.size as u32;
            if ch.size == 0 || end > depth.bits() {
                return Err(RasterError::InvalidChannel(name));
            }
            let bits = depth_mask(ch.size as u32) << ch.offset;
            if used & bits != 0 {
                return Err(RasterError::InvalidChannel(name));
            }
            used |= bits;
        }
        if channels.iter().any(|c| c.kind == ChannelKind::Value)
            && channels
                .iter()
                .any(|c| matches!(c.kind, ChannelKind::Red | ChannelKind::Green | ChannelKind::Blue))
        {
            return Err(RasterError::InvalidChannel(name));
        }

        let index = u16::try_from(self.formats.len()).map_err(|_| RasterError::InvalidChannel(name))?;
        let pixel_type = PixelType(index);
        self.formats.push(PixelFormat::new(pixel_type, name, depth, channels));
        self.by_name.insert(name, pixel_type);

        log::debug!("Registered pixel format {} as {:?} ({} bpp)", name, pixel_type, depth.bits());

        Ok(pixel_type)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn depth_mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1 << bits) - 1
    }
}
