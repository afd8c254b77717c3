//! Damage Tracking
//!
//! Collects the boxes returned by drawing and blitting into a single
//! pending rectangle. At flush time the rectangle is clipped to the screen
//! and handed to a [`DisplayBackend`] as one update, or the whole screen is
//! flipped when the damage is large enough that a partial update does not
//! pay off.

use crate::bbox::{BBox, Coord, Size};

/// Something that can show the contents of a pixel buffer
pub trait DisplayBackend {
    /// Redisplay the whole buffer
    fn flip(&mut self);

    /// Redisplay one rectangle of the buffer
    fn update_rect(&mut self, bbox: BBox);
}

/// Damage tracker configuration
#[derive(Debug, Clone)]
pub struct DamageConfig {
    /// Pending area, in percent of the screen, at which a flush
    /// redraws everything instead of one rectangle
    pub full_redraw_percent: u8,
    /// Request a full redraw on the first flush
    pub start_full: bool,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            full_redraw_percent: 50,
            start_full: true,
        }
    }
}

/// What a flush has to redisplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// No damage, skip rendering
    Nothing,
    /// Full screen redraw needed
    Full,
    /// Only this rectangle changed
    Rect(BBox),
}

/// Counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageStats {
    /// Non-empty boxes added
    pub boxes_added: u64,
    /// Calls to `take` or `flush`
    pub flushes: u64,
    /// Flushes that resolved to a full redraw
    pub full_redraws: u64,
    /// Pixels covered by the last flush
    pub last_flush_pixels: u64,
}

/// Damage accumulator for one screen
#[derive(Debug, Clone)]
pub struct DamageTracker {
    pending: BBox,
    full: bool,
    width: Size,
    height: Size,
    config: DamageConfig,
    stats: DamageStats,
}

impl DamageTracker {
    /// Create a tracker for a `width` x `height` screen
    pub fn new(width: Size, height: Size) -> Self {
        Self::with_config(width, height, DamageConfig::default())
    }

    pub fn with_config(width: Size, height: Size, config: DamageConfig) -> Self {
        Self {
            pending: BBox::EMPTY,
            full: config.start_full,
            width,
            height,
            config,
            stats: DamageStats::default(),
        }
    }

    /// Mark a region as damaged. Empty boxes are ignored.
    pub fn add(&mut self, bbox: BBox) {
        if bbox.is_empty() {
            return;
        }
        self.stats.boxes_added += 1;
        if !self.full {
            self.pending = self.pending.union(&bbox);
        }
    }

    pub fn add_xywh(&mut self, x: Coord, y: Coord, w: Size, h: Size) {
        self.add(BBox::pack(x, y, w, h));
    }

    /// Mark the region between two inclusive corners as damaged
    pub fn add_xyxy(&mut self, x0: Coord, y0: Coord, x1: Coord, y1: Coord) {
        self.add(BBox::from_xyxy(x0, y0, x1, y1));
    }

    /// Request a redraw of the whole screen
    pub fn mark_full(&mut self) {
        self.full = true;
        self.pending = BBox::EMPTY;
    }

    pub fn has_damage(&self) -> bool {
        self.full || !self.pending.intersect(&self.bounds()).is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Accumulated box, not yet clipped to the screen
    pub fn pending(&self) -> BBox {
        self.pending
    }

    /// The screen as a box at the origin
    pub fn bounds(&self) -> BBox {
        BBox::pack(0, 0, self.width, self.height)
    }

    /// Follow a screen size change. The next flush redraws everything.
    pub fn resize(&mut self, width: Size, height: Size) {
        log::debug!(
            "Damage area resized {}x{} -> {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        self.width = width;
        self.height = height;
        self.mark_full();
    }

    pub fn stats(&self) -> DamageStats {
        self.stats
    }

    /// Resolve the accumulated damage and start over
    pub fn take(&mut self) -> Redraw {
        let screen = self.bounds();
        let rect = self.pending.intersect(&screen);
        // Areas reach 2^64 on the largest screens, so compare in u128
        let threshold = screen.area() as u128 * self.config.full_redraw_percent as u128;

        let redraw = if self.full || (!rect.is_empty() && rect.area() as u128 * 100 >= threshold) {
            Redraw::Full
        } else if rect.is_empty() {
            Redraw::Nothing
        } else {
            Redraw::Rect(rect)
        };

        self.full = false;
        self.pending = BBox::EMPTY;
        self.stats.flushes += 1;
        self.stats.last_flush_pixels = match redraw {
            Redraw::Nothing => 0,
            Redraw::Full => {
                self.stats.full_redraws += 1;
                screen.area()
            }
            Redraw::Rect(rect) => rect.area(),
        };

        redraw
    }

    /// Resolve the accumulated damage and redisplay it on `backend`
    pub fn flush<B: DisplayBackend + ?Sized>(&mut self, backend: &mut B) -> Redraw {
        let redraw = self.take();
        match redraw {
            Redraw::Nothing => {}
            Redraw::Full => {
                log::debug!("Flushing full {}x{} screen", self.width, self.height);
                backend.flip();
            }
            Redraw::Rect(rect) => {
                log::debug!("Flushing {}", rect);
                backend.update_rect(rect);
            }
        }
        redraw
    }
}
