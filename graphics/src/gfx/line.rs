//! Bresenham lines
//!
//! One pixel per step along the major axis, the minor coordinate rounded
//! to the nearest pixel of the ideal line. It is computed directly instead
//! of carried in an error term, so only the clipped part of a long line is
//! visited.

use super::{plot, span, vspan};
use crate::access::PixelSink;
use crate::bbox::{BBox, Coord};
use crate::pixel::Pixel;

/// Minor axis offset after `i` major steps, rounded half up
#[inline]
fn step(i: i64, minor: i64, major: i64) -> i64 {
    let num = 2 * i as i128 * minor as i128 + major as i128;
    num.div_euclid(2 * major as i128) as i64
}

pub(crate) fn stroke<S: PixelSink>(
    sink: &mut S,
    x0: Coord,
    y0: Coord,
    x1: Coord,
    y1: Coord,
    pixel: Pixel,
) -> BBox {
    let clip = sink.clip();
    let bbox = BBox::from_xyxy(x0, y0, x1, y1).intersect(&clip);
    if bbox.is_empty() {
        return BBox::EMPTY;
    }

    let (mut x0, mut y0, mut x1, mut y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
    if y0 == y1 {
        span(sink, &clip, x0, x1, y0, pixel);
        return bbox;
    }
    if x0 == x1 {
        vspan(sink, &clip, x0, y0, y1, pixel);
        return bbox;
    }

    if (x1 - x0).abs() >= (y1 - y0).abs() {
        if x0 > x1 {
            core::mem::swap(&mut x0, &mut x1);
            core::mem::swap(&mut y0, &mut y1);
        }
        let lo = x0.max(clip.x() as i64);
        let hi = x1.min(clip.x1());
        for x in lo..=hi {
            plot(sink, &clip, x, y0 + step(x - x0, y1 - y0, x1 - x0), pixel);
        }
    } else {
        if y0 > y1 {
            core::mem::swap(&mut x0, &mut x1);
            core::mem::swap(&mut y0, &mut y1);
        }
        let lo = y0.max(clip.y() as i64);
        let hi = y1.min(clip.y1());
        for y in lo..=hi {
            plot(sink, &clip, x0 + step(y - y0, x1 - x0, y1 - y0), y, pixel);
        }
    }

    bbox
}
