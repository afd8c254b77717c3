//! Rectangles

use super::{span, vspan};
use crate::access::PixelSink;
use crate::bbox::{BBox, Coord};
use crate::pixel::Pixel;

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

    let (left, right) = (x0.min(x1) as i64, x0.max(x1) as i64);
    let (top, bottom) = (y0.min(y1) as i64, y0.max(y1) as i64);

    span(sink, &clip, left, right, top, pixel);
    span(sink, &clip, left, right, bottom, pixel);
    if bottom - top > 1 {
        vspan(sink, &clip, left, top + 1, bottom - 1, pixel);
        vspan(sink, &clip, right, top + 1, bottom - 1, pixel);
    }

    bbox
}

pub(crate) fn fill<S: PixelSink>(
    sink: &mut S,
    x0: Coord,
    y0: Coord,
    x1: Coord,
    y1: Coord,
    pixel: Pixel,
) -> BBox {
    let bbox = BBox::from_xyxy(x0, y0, x1, y1).intersect(&sink.clip());
    if bbox.is_empty() {
        return BBox::EMPTY;
    }

    for y in bbox.y() as i64..=bbox.y1() {
        span(sink, &bbox, bbox.x() as i64, bbox.x1(), y, pixel);
    }

    bbox
}
