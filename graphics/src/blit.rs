//! Blitter
//!
//! Rectangular copies from one pixmap into another. [`blit`] and
//! [`blit_xywh`] require the whole rectangle to be valid in both pixmaps and
//! panic otherwise; [`blit_clipped`] and [`blit_xywh_clipped`] copy whatever
//! part of the rectangle is valid and silently do nothing when that is empty.
//!
//! Blits address the whole buffer. The pixmap clip rectangle only applies
//! to drawing.
//!
//! Source and destination are separate borrows, so a pixmap can not be
//! blitted onto itself.

use crate::access::{Canvas, PixelSink, PixelSource, Reader};
use crate::bbox::{BBox, Coord, Size};
use crate::pixmap::Pixmap;

/// Inclusive rectangle in wide coordinates
#[derive(Debug, Clone, Copy)]
struct Span {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl Span {
    fn from_xyxy(x0: Coord, y0: Coord, x1: Coord, y1: Coord) -> Self {
        Self {
            x0: x0.min(x1) as i64,
            y0: y0.min(y1) as i64,
            x1: x0.max(x1) as i64,
            y1: y0.max(y1) as i64,
        }
    }

    fn from_xywh(x: Coord, y: Coord, w: Size, h: Size) -> Self {
        Self {
            x0: x as i64,
            y0: y as i64,
            x1: x as i64 + w as i64 - 1,
            y1: y as i64 + h as i64 - 1,
        }
    }
}

/// Copy the inclusive rectangle `(x0, y0)..(x1, y1)` of `src` to `(x2, y2)`
/// in `dst`. Corners may be given in any order.
///
/// Returns the destination rectangle.
///
/// # Panics
/// If the rectangle is not fully inside `src` or its placement is not fully
/// inside `dst`.
#[allow(clippy::too_many_arguments)]
pub fn blit(
    src: &Pixmap,
    x0: Coord,
    y0: Coord,
    x1: Coord,
    y1: Coord,
    dst: &mut Pixmap,
    x2: Coord,
    y2: Coord,
) -> BBox {
    blit_checked(src, Span::from_xyxy(x0, y0, x1, y1), dst, x2, y2)
}

/// Like [`blit`] with the source rectangle given as origin and size.
/// An empty size copies nothing.
#[allow(clippy::too_many_arguments)]
pub fn blit_xywh(
    src: &Pixmap,
    x0: Coord,
    y0: Coord,
    w: Size,
    h: Size,
    dst: &mut Pixmap,
    x2: Coord,
    y2: Coord,
) -> BBox {
    if w == 0 || h == 0 {
        return BBox::EMPTY;
    }
    blit_checked(src, Span::from_xywh(x0, y0, w, h), dst, x2, y2)
}

/// Copy as much of the inclusive rectangle `(x0, y0)..(x1, y1)` of `src`
/// to `(x2, y2)` in `dst` as both pixmaps allow.
///
/// The copied part is the rectangle clipped to `src` and to `dst` moved
/// back by the placement offset, so every copied pixel keeps its position
/// relative to `(x2, y2)`. Returns the destination rectangle written, empty
/// when nothing was copied.
#[allow(clippy::too_many_arguments)]
pub fn blit_clipped(
    src: &Pixmap,
    x0: Coord,
    y0: Coord,
    x1: Coord,
    y1: Coord,
    dst: &mut Pixmap,
    x2: Coord,
    y2: Coord,
) -> BBox {
    blit_clipped_span(src, Span::from_xyxy(x0, y0, x1, y1), dst, x2, y2)
}

/// Like [`blit_clipped`] with the source rectangle given as origin and size
#[allow(clippy::too_many_arguments)]
pub fn blit_xywh_clipped(
    src: &Pixmap,
    x0: Coord,
    y0: Coord,
    w: Size,
    h: Size,
    dst: &mut Pixmap,
    x2: Coord,
    y2: Coord,
) -> BBox {
    if w == 0 || h == 0 {
        return BBox::EMPTY;
    }
    blit_clipped_span(src, Span::from_xywh(x0, y0, w, h), dst, x2, y2)
}

fn blit_checked(src: &Pixmap, rect: Span, dst: &mut Pixmap, x2: Coord, y2: Coord) -> BBox {
    assert!(
        rect.x0 >= 0
            && rect.y0 >= 0
            && rect.x1 < src.width() as i64
            && rect.y1 < src.height() as i64,
        "blit source ({}, {})-({}, {}) outside {}x{} pixmap",
        rect.x0,
        rect.y0,
        rect.x1,
        rect.y1,
        src.width(),
        src.height()
    );

    let (x2, y2) = (x2 as i64, y2 as i64);
    let w = rect.x1 - rect.x0 + 1;
    let h = rect.y1 - rect.y0 + 1;
    assert!(
        x2 >= 0 && y2 >= 0 && x2 + w <= dst.width() as i64 && y2 + h <= dst.height() as i64,
        "blit destination {}x{} at ({}, {}) outside {}x{} pixmap",
        w,
        h,
        x2,
        y2,
        dst.width(),
        dst.height()
    );

    copy(src, rect.x0, rect.y0, w, h, dst, x2, y2);
    BBox::from_edges(x2, y2, x2 + w, y2 + h)
}

fn blit_clipped_span(src: &Pixmap, rect: Span, dst: &mut Pixmap, x2: Coord, y2: Coord) -> BBox {
    // Offset from source to destination coordinates
    let dx = x2 as i64 - rect.x0;
    let dy = y2 as i64 - rect.y0;

    let lo_x = rect.x0.max(0).max(-dx);
    let lo_y = rect.y0.max(0).max(-dy);
    let hi_x = rect.x1.min(src.width() as i64 - 1).min(dst.width() as i64 - 1 - dx);
    let hi_y = rect.y1.min(src.height() as i64 - 1).min(dst.height() as i64 - 1 - dy);

    if lo_x > hi_x || lo_y > hi_y {
        log::trace!(
            "Blit ({}, {})-({}, {}) to ({}, {}) clipped away",
            rect.x0,
            rect.y0,
            rect.x1,
            rect.y1,
            x2,
            y2
        );
        return BBox::EMPTY;
    }

    let w = hi_x - lo_x + 1;
    let h = hi_y - lo_y + 1;
    copy(src, lo_x, lo_y, w, h, dst, lo_x + dx, lo_y + dy);
    BBox::from_edges(lo_x + dx, lo_y + dy, lo_x + dx + w, lo_y + dy + h)
}

/// Copy a `w` x `h` block that is known to be valid in both pixmaps
#[allow(clippy::too_many_arguments)]
fn copy(src: &Pixmap, sx: i64, sy: i64, w: i64, h: i64, dst: &mut Pixmap, dx: i64, dy: i64) {
    log::debug!(
        "Blitting {}x{} from ({}, {}) in {:?} to ({}, {}) in {:?}",
        w,
        h,
        sx,
        sy,
        src,
        dx,
        dy,
        dst
    );

    let (sx, sy, w, h) = (sx as u32, sy as u32, w as u32, h as u32);
    let (dx, dy) = (dx as u32, dy as u32);
    let (from, to) = (*src.format(), *dst.format());
    let same_layout = from.depth == to.depth && from.channels == to.channels;

    if same_layout && !from.depth.is_sub_byte() {
        let bpp = from.bytes_per_pixel();
        let len = w as usize * bpp;
        for row in 0..h {
            let s = (sy + row) as usize * src.stride() + sx as usize * bpp;
            let d = (dy + row) as usize * dst.stride() + dx as usize * bpp;
            dst.data_mut()[d..d + len].copy_from_slice(&src.data()[s..s + len]);
        }
        return;
    }

    if same_layout {
        crate::with_codec!(from.depth, C => {
            let reader = Reader::<C>::new(src);
            let mut canvas = Canvas::<C>::new(dst);
            for row in 0..h {
                for col in 0..w {
                    canvas.put_raw(dx + col, dy + row, reader.get_raw(sx + col, sy + row));
                }
            }
        });
        return;
    }

    crate::with_codec!(from.depth, S => {
        crate::with_codec!(to.depth, D => {
            let reader = Reader::<S>::new(src);
            let mut canvas = Canvas::<D>::new(dst);
            for row in 0..h {
                for col in 0..w {
                    let pixel = reader.get_raw(sx + col, sy + row);
                    canvas.put_raw(dx + col, dy + row, from.convert(pixel, &to));
                }
            }
        })
    });
}
