//! Painter
//!
//! Binds a pixmap to the damage tracker of the screen it is shown on, so
//! every drawing call reports what it changed without the caller having to
//! thread boxes around.

use crate::bbox::{BBox, Coord, Size};
use crate::blit;
use crate::damage::{DamageTracker, DisplayBackend, Redraw};
use crate::gfx;
use crate::pixel::Pixel;
use crate::pixmap::Pixmap;

/// Drawing front end that records damage
pub struct Painter<'a> {
    pixmap: &'a mut Pixmap,
    damage: &'a mut DamageTracker,
}

impl<'a> Painter<'a> {
    pub fn new(pixmap: &'a mut Pixmap, damage: &'a mut DamageTracker) -> Self {
        Self { pixmap, damage }
    }

    pub fn pixmap(&self) -> &Pixmap {
        &*self.pixmap
    }

    pub fn damage(&self) -> &DamageTracker {
        &*self.damage
    }

    #[inline]
    fn record(&mut self, bbox: BBox) -> BBox {
        self.damage.add(bbox);
        bbox
    }

    pub fn put_pixel(&mut self, x: Coord, y: Coord, pixel: Pixel) -> BBox {
        self.pixmap.put_pixel(x, y, pixel);
        let bbox = BBox::pack(x, y, 1, 1).intersect(&self.pixmap.clip_rect());
        self.record(bbox)
    }

    /// Set every pixel and request a full redraw
    pub fn fill(&mut self, pixel: Pixel) {
        self.pixmap.fill(pixel);
        self.damage.mark_full();
    }

    pub fn draw_circle(&mut self, cx: Coord, cy: Coord, r: i32, pixel: Pixel) -> BBox {
        let bbox = gfx::draw_circle(self.pixmap, cx, cy, r, pixel);
        self.record(bbox)
    }

    pub fn fill_circle(&mut self, cx: Coord, cy: Coord, r: i32, pixel: Pixel) -> BBox {
        let bbox = gfx::fill_circle(self.pixmap, cx, cy, r, pixel);
        self.record(bbox)
    }

    pub fn hline(&mut self, x0: Coord, x1: Coord, y: Coord, pixel: Pixel) -> BBox {
        let bbox = gfx::hline(self.pixmap, x0, x1, y, pixel);
        self.record(bbox)
    }

    pub fn vline(&mut self, x: Coord, y0: Coord, y1: Coord, pixel: Pixel) -> BBox {
        let bbox = gfx::vline(self.pixmap, x, y0, y1, pixel);
        self.record(bbox)
    }

    pub fn line(&mut self, x0: Coord, y0: Coord, x1: Coord, y1: Coord, pixel: Pixel) -> BBox {
        let bbox = gfx::line(self.pixmap, x0, y0, x1, y1, pixel);
        self.record(bbox)
    }

    pub fn rect(&mut self, x0: Coord, y0: Coord, x1: Coord, y1: Coord, pixel: Pixel) -> BBox {
        let bbox = gfx::rect(self.pixmap, x0, y0, x1, y1, pixel);
        self.record(bbox)
    }

    pub fn fill_rect(&mut self, x0: Coord, y0: Coord, x1: Coord, y1: Coord, pixel: Pixel) -> BBox {
        let bbox = gfx::fill_rect(self.pixmap, x0, y0, x1, y1, pixel);
        self.record(bbox)
    }

    pub fn tetragon(&mut self, points: [(Coord, Coord); 4], pixel: Pixel) -> BBox {
        let bbox = gfx::tetragon(self.pixmap, points, pixel);
        self.record(bbox)
    }

    pub fn fill_tetragon(&mut self, points: [(Coord, Coord); 4], pixel: Pixel) -> BBox {
        let bbox = gfx::fill_tetragon(self.pixmap, points, pixel);
        self.record(bbox)
    }

    /// See [`blit::blit`]
    ///
    /// # Panics
    /// If the rectangle does not fit `src` or the painted pixmap.
    #[allow(clippy::too_many_arguments)]
    pub fn blit(
        &mut self,
        src: &Pixmap,
        x0: Coord,
        y0: Coord,
        x1: Coord,
        y1: Coord,
        x2: Coord,
        y2: Coord,
    ) -> BBox {
        let bbox = blit::blit(src, x0, y0, x1, y1, self.pixmap, x2, y2);
        self.record(bbox)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn blit_clipped(
        &mut self,
        src: &Pixmap,
        x0: Coord,
        y0: Coord,
        x1: Coord,
        y1: Coord,
        x2: Coord,
        y2: Coord,
    ) -> BBox {
        let bbox = blit::blit_clipped(src, x0, y0, x1, y1, self.pixmap, x2, y2);
        self.record(bbox)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn blit_xywh(
        &mut self,
        src: &Pixmap,
        x0: Coord,
        y0: Coord,
        w: Size,
        h: Size,
        x2: Coord,
        y2: Coord,
    ) -> BBox {
        let bbox = blit::blit_xywh(src, x0, y0, w, h, self.pixmap, x2, y2);
        self.record(bbox)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn blit_xywh_clipped(
        &mut self,
        src: &Pixmap,
        x0: Coord,
        y0: Coord,
        w: Size,
        h: Size,
        x2: Coord,
        y2: Coord,
    ) -> BBox {
        let bbox = blit::blit_xywh_clipped(src, x0, y0, w, h, self.pixmap, x2, y2);
        self.record(bbox)
    }

    /// Hand the accumulated damage to `backend`
    pub fn flush<B: DisplayBackend + ?Sized>(&mut self, backend: &mut B) -> Redraw {
        self.damage.flush(backend)
    }
}
