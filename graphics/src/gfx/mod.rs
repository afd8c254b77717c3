//! Primitive Rasterizer
//!
//! Each primitive is a single routine generic over [`PixelSink`]. The
//! functions in this module pick the codec for the pixmap's depth once and
//! run that routine on a [`Canvas`], so there is no per-format drawing code.
//!
//! All functions clip against the pixmap's clip area, skip whatever falls
//! outside it and return the box they may have changed. A primitive that
//! lies completely outside returns [`BBox::EMPTY`] without touching pixels.

mod circle;
mod line;
mod rect;
mod tetragon;

pub mod oriented;

pub use circle::{circle_rows, CircleOctant, CircleRows};

use crate::access::{Canvas, PixelSink};
use crate::bbox::{BBox, Coord};
use crate::pixel::Pixel;
use crate::pixmap::Pixmap;

/// Circle outline centered at `(cx, cy)`. A negative radius draws nothing.
pub fn draw_circle(pixmap: &mut Pixmap, cx: Coord, cy: Coord, r: i32, pixel: Pixel) -> BBox {
    let depth = pixmap.format().depth;
    crate::with_codec!(depth, C => {
        circle::stroke(&mut Canvas::<C>::new(pixmap), cx, cy, r, pixel)
    })
}

/// Filled disk centered at `(cx, cy)`. Its boundary is the
/// [`draw_circle`] outline with the same parameters.
pub fn fill_circle(pixmap: &mut Pixmap, cx: Coord, cy: Coord, r: i32, pixel: Pixel) -> BBox {
    let depth = pixmap.format().depth;
    crate::with_codec!(depth, C => {
        circle::fill(&mut Canvas::<C>::new(pixmap), cx, cy, r, pixel)
    })
}

/// Horizontal line, endpoints inclusive
pub fn hline(pixmap: &mut Pixmap, x0: Coord, x1: Coord, y: Coord, pixel: Pixel) -> BBox {
    let depth = pixmap.format().depth;
    crate::with_codec!(depth, C => {
        let mut canvas = Canvas::<C>::new(pixmap);
        let bbox = BBox::from_xyxy(x0, y, x1, y).intersect(&canvas.clip());
        canvas.hline(x0, x1, y, pixel);
        bbox
    })
}

/// Vertical line, endpoints inclusive
pub fn vline(pixmap: &mut Pixmap, x: Coord, y0: Coord, y1: Coord, pixel: Pixel) -> BBox {
    let depth = pixmap.format().depth;
    crate::with_codec!(depth, C => {
        let mut canvas = Canvas::<C>::new(pixmap);
        let bbox = BBox::from_xyxy(x, y0, x, y1).intersect(&canvas.clip());
        canvas.vline(x, y0, y1, pixel);
        bbox
    })
}

/// Line between two points, endpoints inclusive.
///
/// Swapping the endpoints yields the same pixels.
pub fn line(
    pixmap: &mut Pixmap,
    x0: Coord,
    y0: Coord,
    x1: Coord,
    y1: Coord,
    pixel: Pixel,
) -> BBox {
    let depth = pixmap.format().depth;
    crate::with_codec!(depth, C => {
        line::stroke(&mut Canvas::<C>::new(pixmap), x0, y0, x1, y1, pixel)
    })
}

/// Rectangle outline through two inclusive corners
pub fn rect(
    pixmap: &mut Pixmap,
    x0: Coord,
    y0: Coord,
    x1: Coord,
    y1: Coord,
    pixel: Pixel,
) -> BBox {
    let depth = pixmap.format().depth;
    crate::with_codec!(depth, C => {
        rect::stroke(&mut Canvas::<C>::new(pixmap), x0, y0, x1, y1, pixel)
    })
}

/// Filled rectangle through two inclusive corners
pub fn fill_rect(
    pixmap: &mut Pixmap,
    x0: Coord,
    y0: Coord,
    x1: Coord,
    y1: Coord,
    pixel: Pixel,
) -> BBox {
    let depth = pixmap.format().depth;
    crate::with_codec!(depth, C => {
        rect::fill(&mut Canvas::<C>::new(pixmap), x0, y0, x1, y1, pixel)
    })
}

/// Closed outline through four points
pub fn tetragon(pixmap: &mut Pixmap, points: [(Coord, Coord); 4], pixel: Pixel) -> BBox {
    let depth = pixmap.format().depth;
    crate::with_codec!(depth, C => {
        tetragon::stroke(&mut Canvas::<C>::new(pixmap), &points, pixel)
    })
}

/// Filled tetragon using the even-odd rule, including its outline
pub fn fill_tetragon(pixmap: &mut Pixmap, points: [(Coord, Coord); 4], pixel: Pixel) -> BBox {
    let depth = pixmap.format().depth;
    crate::with_codec!(depth, C => {
        tetragon::fill(&mut Canvas::<C>::new(pixmap), &points, pixel)
    })
}

/// Write one pixel given in wide coordinates, if it lies inside `clip`
#[inline]
pub(crate) fn plot<S: PixelSink>(sink: &mut S, clip: &BBox, x: i64, y: i64, pixel: Pixel) {
    if x >= clip.x() as i64 && x <= clip.x1() && y >= clip.y() as i64 && y <= clip.y1() {
        sink.put_raw(x as u32, y as u32, pixel);
    }
}

/// Horizontal run in wide coordinates, clipped to `clip`
pub(crate) fn span<S: PixelSink>(sink: &mut S, clip: &BBox, x0: i64, x1: i64, y: i64, pixel: Pixel) {
    if y < clip.y() as i64 || y > clip.y1() {
        return;
    }
    let lo = x0.min(x1).max(clip.x() as i64);
    let hi = x0.max(x1).min(clip.x1());
    for x in lo..=hi {
        sink.put_raw(x as u32, y as u32, pixel);
    }
}

/// Vertical run in wide coordinates, clipped to `clip`
pub(crate) fn vspan<S: PixelSink>(sink: &mut S, clip: &BBox, x: i64, y0: i64, y1: i64, pixel: Pixel) {
    if x < clip.x() as i64 || x > clip.x1() {
        return;
    }
    let lo = y0.min(y1).max(clip.y() as i64);
    let hi = y0.max(y1).min(clip.y1());
    for y in lo..=hi {
        sink.put_raw(x as u32, y as u32, pixel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::PixelType;

    fn count(pixmap: &Pixmap, value: Pixel) -> usize {
        let mut n = 0;
        for y in 0..pixmap.height() {
            for x in 0..pixmap.width() {
                if pixmap.get_pixel_raw(x, y) == value {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_same_shape_on_every_depth() {
        let types = [
            PixelType::G1,
            PixelType::G2,
            PixelType::G4,
            PixelType::G8,
            PixelType::RGB565,
            PixelType::RGB888,
            PixelType::XRGB8888,
        ];
        let mut reference = None;
        for pixel_type in types {
            let mut pixmap = Pixmap::new(21, 17, pixel_type);
            fill_circle(&mut pixmap, 10, 8, 6, 1);
            line(&mut pixmap, 0, 16, 20, 0, 1);
            rect(&mut pixmap, 2, 2, 18, 14, 1);
            let mut set = alloc::vec::Vec::new();
            for y in 0..17 {
                for x in 0..21 {
                    set.push(pixmap.get_pixel_raw(x, y));
                }
            }
            match &reference {
                None => reference = Some(set),
                Some(r) => assert_eq!(r, &set, "{:?}", pixel_type),
            }
        }
    }

    #[test]
    fn test_hline_vline_return_clipped_box() {
        let mut pixmap = Pixmap::new(8, 8, PixelType::G8);
        assert_eq!(hline(&mut pixmap, -5, 20, 3, 7), BBox::pack(0, 3, 8, 1));
        assert_eq!(vline(&mut pixmap, 2, 6, 100, 7), BBox::pack(2, 6, 1, 2));
        assert_eq!(hline(&mut pixmap, 0, 7, 8, 7), BBox::EMPTY);
        assert_eq!(count(&pixmap, 7), 8 + 2);
    }

    #[test]
    fn test_clip_rect_limits_drawing() {
        let mut pixmap = Pixmap::new(10, 10, PixelType::G8);
        pixmap.set_clip(Some(BBox::pack(2, 2, 3, 3)));
        let bbox = fill_rect(&mut pixmap, 0, 0, 9, 9, 1);
        assert_eq!(bbox, BBox::pack(2, 2, 3, 3));
        assert_eq!(count(&pixmap, 1), 9);
        assert_eq!(pixmap.get_pixel(1, 1), 0);
        assert_eq!(pixmap.get_pixel(5, 5), 0);
    }

    #[test]
    fn test_drawing_keeps_stride_padding() {
        let config = crate::pixmap::PixmapConfig {
            stride_align: 8,
            ..Default::default()
        };
        let mut pixmap =
            Pixmap::from_registry(crate::FormatRegistry::standard(), 3, 4, PixelType::G8, &config)
                .unwrap();
        assert_eq!(pixmap.stride(), 8);
        fill_rect(&mut pixmap, -10, -10, 10, 10, 0xff);
        fill_circle(&mut pixmap, 1, 1, 50, 0xff);
        for y in 0..4 {
            let row = &pixmap.data()[y * 8..y * 8 + 8];
            assert_eq!(&row[..3], &[0xff; 3]);
            assert_eq!(&row[3..], &[0; 5]);
        }
    }
}
