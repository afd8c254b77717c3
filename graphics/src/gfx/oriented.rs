//! Orientation-aware drawing
//!
//! These take coordinates in the space seen through the pixmap's
//! [`Orientation`](crate::pixmap::Orientation), map them to buffer space
//! and draw with the plain primitives. Returned boxes are in buffer space,
//! which is what damage tracking works in.
//!
//! The blits here check and clip against the oriented size of each pixmap,
//! and each pixmap may have its own orientation.

use crate::bbox::{BBox, Coord};
use crate::blit::blit_xywh;
use crate::pixel::Pixel;
use crate::pixmap::Pixmap;

pub fn put_pixel(pixmap: &mut Pixmap, x: Coord, y: Coord, pixel: Pixel) -> BBox {
    let (x, y) = pixmap.transform_point(x, y);
    pixmap.put_pixel(x, y, pixel);
    BBox::pack(x, y, 1, 1).intersect(&pixmap.clip_rect())
}

pub fn get_pixel(pixmap: &Pixmap, x: Coord, y: Coord) -> Pixel {
    let (x, y) = pixmap.transform_point(x, y);
    pixmap.get_pixel(x, y)
}

pub fn draw_circle(pixmap: &mut Pixmap, cx: Coord, cy: Coord, r: i32, pixel: Pixel) -> BBox {
    let (cx, cy) = pixmap.transform_point(cx, cy);
    super::draw_circle(pixmap, cx, cy, r, pixel)
}

pub fn fill_circle(pixmap: &mut Pixmap, cx: Coord, cy: Coord, r: i32, pixel: Pixel) -> BBox {
    let (cx, cy) = pixmap.transform_point(cx, cy);
    super::fill_circle(pixmap, cx, cy, r, pixel)
}

/// Horizontal in oriented space, which may be vertical in the buffer
pub fn hline(pixmap: &mut Pixmap, x0: Coord, x1: Coord, y: Coord, pixel: Pixel) -> BBox {
    fill_rect(pixmap, x0, y, x1, y, pixel)
}

/// Vertical in oriented space, which may be horizontal in the buffer
pub fn vline(pixmap: &mut Pixmap, x: Coord, y0: Coord, y1: Coord, pixel: Pixel) -> BBox {
    fill_rect(pixmap, x, y0, x, y1, pixel)
}

pub fn line(
    pixmap: &mut Pixmap,
    x0: Coord,
    y0: Coord,
    x1: Coord,
    y1: Coord,
    pixel: Pixel,
) -> BBox {
    let (x0, y0) = pixmap.transform_point(x0, y0);
    let (x1, y1) = pixmap.transform_point(x1, y1);
    super::line(pixmap, x0, y0, x1, y1, pixel)
}

pub fn rect(
    pixmap: &mut Pixmap,
    x0: Coord,
    y0: Coord,
    x1: Coord,
    y1: Coord,
    pixel: Pixel,
) -> BBox {
    let (x0, y0) = pixmap.transform_point(x0, y0);
    let (x1, y1) = pixmap.transform_point(x1, y1);
    super::rect(pixmap, x0, y0, x1, y1, pixel)
}

pub fn fill_rect(
    pixmap: &mut Pixmap,
    x0: Coord,
    y0: Coord,
    x1: Coord,
    y1: Coord,
    pixel: Pixel,
) -> BBox {
    let (x0, y0) = pixmap.transform_point(x0, y0);
    let (x1, y1) = pixmap.transform_point(x1, y1);
    super::fill_rect(pixmap, x0, y0, x1, y1, pixel)
}

pub fn tetragon(pixmap: &mut Pixmap, points: [(Coord, Coord); 4], pixel: Pixel) -> BBox {
    let points = points.map(|(x, y)| pixmap.transform_point(x, y));
    super::tetragon(pixmap, points, pixel)
}

pub fn fill_tetragon(pixmap: &mut Pixmap, points: [(Coord, Coord); 4], pixel: Pixel) -> BBox {
    let points = points.map(|(x, y)| pixmap.transform_point(x, y));
    super::fill_tetragon(pixmap, points, pixel)
}

/// [`blit`](crate::blit()) in oriented coordinates. The rectangle is read
/// in the oriented space of `src` and placed at `(x2, y2)` in the oriented
/// space of `dst`.
///
/// Returns the written rectangle in `dst` buffer space.
///
/// # Panics
/// If the rectangle is not inside the oriented size of `src` or its
/// placement is not inside the oriented size of `dst`.
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
    let (sx, sy) = (x0.min(x1) as i64, y0.min(y1) as i64);
    let w = x0.max(x1) as i64 - sx + 1;
    let h = y0.max(y1) as i64 - sy + 1;
    assert!(
        sx >= 0
            && sy >= 0
            && sx + w <= src.oriented_width() as i64
            && sy + h <= src.oriented_height() as i64,
        "oriented blit source {}x{} at ({}, {}) outside {}x{} pixmap",
        w,
        h,
        sx,
        sy,
        src.oriented_width(),
        src.oriented_height()
    );

    let (x2, y2) = (x2 as i64, y2 as i64);
    assert!(
        x2 >= 0
            && y2 >= 0
            && x2 + w <= dst.oriented_width() as i64
            && y2 + h <= dst.oriented_height() as i64,
        "oriented blit destination {}x{} at ({}, {}) outside {}x{} pixmap",
        w,
        h,
        x2,
        y2,
        dst.oriented_width(),
        dst.oriented_height()
    );

    copy(src, sx, sy, w, h, dst, x2, y2)
}

/// [`blit_clipped`](crate::blit_clipped) in oriented coordinates. Copies the
/// part of the rectangle that fits both oriented sizes.
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
    let (rx0, rx1) = (x0.min(x1) as i64, x0.max(x1) as i64);
    let (ry0, ry1) = (y0.min(y1) as i64, y0.max(y1) as i64);
    let dx = x2 as i64 - rx0;
    let dy = y2 as i64 - ry0;

    let lo_x = rx0.max(0).max(-dx);
    let lo_y = ry0.max(0).max(-dy);
    let hi_x = rx1
        .min(src.oriented_width() as i64 - 1)
        .min(dst.oriented_width() as i64 - 1 - dx);
    let hi_y = ry1
        .min(src.oriented_height() as i64 - 1)
        .min(dst.oriented_height() as i64 - 1 - dy);
    if lo_x > hi_x || lo_y > hi_y {
        return BBox::EMPTY;
    }

    let (w, h) = (hi_x - lo_x + 1, hi_y - lo_y + 1);
    copy(src, lo_x, lo_y, w, h, dst, lo_x + dx, lo_y + dy)
}

/// Copy an oriented block known to be valid in both pixmaps
#[allow(clippy::too_many_arguments)]
fn copy(
    src: &Pixmap,
    sx: i64,
    sy: i64,
    w: i64,
    h: i64,
    dst: &mut Pixmap,
    dx: i64,
    dy: i64,
) -> BBox {
    let from = src.transform_bbox(&BBox::from_edges(sx, sy, sx + w, sy + h));
    let to = dst.transform_bbox(&BBox::from_edges(dx, dy, dx + w, dy + h));

    // The same transform on both sides keeps the block intact in buffer space
    if src.orientation() == dst.orientation() {
        blit_xywh(src, from.x(), from.y(), from.w(), from.h(), dst, to.x(), to.y());
        return to;
    }

    let (a, b) = (*src.format(), *dst.format());
    for row in 0..h {
        for col in 0..w {
            let (x, y) = src.transform_point((sx + col) as Coord, (sy + row) as Coord);
            let pixel = a.convert(src.get_pixel_raw(x as u32, y as u32), &b);
            let (x, y) = dst.transform_point((dx + col) as Coord, (dy + row) as Coord);
            dst.put_pixel_raw(x as u32, y as u32, pixel);
        }
    }
    to
}
