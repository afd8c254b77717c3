//! Four-sided polygons

use super::span;
use crate::access::PixelSink;
use crate::bbox::{BBox, Coord};
use crate::pixel::Pixel;

fn bounds(points: &[(Coord, Coord); 4]) -> BBox {
    let mut left = i64::MAX;
    let mut top = i64::MAX;
    let mut right = i64::MIN;
    let mut bottom = i64::MIN;
    for &(x, y) in points {
        left = left.min(x as i64);
        top = top.min(y as i64);
        right = right.max(x as i64 + 1);
        bottom = bottom.max(y as i64 + 1);
    }
    BBox::from_edges(left, top, right, bottom)
}

pub(crate) fn stroke<S: PixelSink>(sink: &mut S, points: &[(Coord, Coord); 4], pixel: Pixel) -> BBox {
    let bbox = bounds(points).intersect(&sink.clip());
    if bbox.is_empty() {
        return BBox::EMPTY;
    }

    for i in 0..4 {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % 4];
        super::line::stroke(sink, x0, y0, x1, y1, pixel);
    }

    bbox
}

/// Where the edge `a -> b` crosses row `y`, rounded to the nearest column
fn crossing(a: (i64, i64), b: (i64, i64), y: i64) -> i64 {
    let mut num = (y - a.1) as i128 * (b.0 - a.0) as i128;
    let mut den = (b.1 - a.1) as i128;
    if den < 0 {
        num = -num;
        den = -den;
    }
    a.0 + (2 * num + den).div_euclid(2 * den) as i64
}

pub(crate) fn fill<S: PixelSink>(sink: &mut S, points: &[(Coord, Coord); 4], pixel: Pixel) -> BBox {
    let clip = sink.clip();
    let bbox = bounds(points).intersect(&clip);
    if bbox.is_empty() {
        return BBox::EMPTY;
    }

    let wide = points.map(|(x, y)| (x as i64, y as i64));
    for y in bbox.y() as i64..=bbox.y1() {
        let mut xs = [0i64; 4];
        let mut n = 0;
        for i in 0..4 {
            let (a, b) = (wide[i], wide[(i + 1) % 4]);
            // Half-open in y, so shared vertices are counted once.
            if a.1 != b.1 && y >= a.1.min(b.1) && y < a.1.max(b.1) {
                xs[n] = crossing(a, b, y);
                n += 1;
            }
        }
        xs[..n].sort_unstable();
        for pair in xs[..n].chunks_exact(2) {
            span(sink, &clip, pair[0], pair[1], y, pixel);
        }
    }

    stroke(sink, points, pixel);

    bbox
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{fill_rect, fill_tetragon, tetragon};
    use crate::pixel::PixelType;
    use crate::pixmap::Pixmap;

    #[test]
    fn test_axis_aligned_fill_matches_rect() {
        let mut a = Pixmap::new(8, 8, PixelType::G8);
        let mut b = Pixmap::new(8, 8, PixelType::G8);
        let bbox = fill_tetragon(&mut a, [(1, 1), (5, 1), (5, 5), (1, 5)], 9);
        fill_rect(&mut b, 1, 1, 5, 5, 9);
        assert_eq!(bbox, BBox::pack(1, 1, 5, 5));
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_diamond() {
        let mut pixmap = Pixmap::new(9, 9, PixelType::G8);
        fill_tetragon(&mut pixmap, [(4, 0), (8, 4), (4, 8), (0, 4)], 1);
        for y in 0..9 {
            for x in 0..9 {
                let inside = (x - 4i32).abs() + (y - 4i32).abs() <= 4;
                assert_eq!(pixmap.get_pixel(x, y), inside as u32, "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_outline_is_part_of_fill() {
        let points = [(1, 2), (13, 0), (10, 11), (3, 8)];
        let mut outline = Pixmap::new(16, 16, PixelType::G8);
        let mut filled = Pixmap::new(16, 16, PixelType::G8);
        let bbox = tetragon(&mut outline, points, 1);
        assert_eq!(bbox, BBox::pack(1, 0, 13, 12));
        assert_eq!(fill_tetragon(&mut filled, points, 1), bbox);
        for y in 0..16 {
            for x in 0..16 {
                if outline.get_pixel(x, y) != 0 {
                    assert_eq!(filled.get_pixel(x, y), 1, "({}, {})", x, y);
                }
                if filled.get_pixel(x, y) != 0 {
                    assert!(bbox.contains(x, y));
                }
            }
        }
        assert_eq!(filled.get_pixel(7, 5), 1);
        assert_eq!(outline.get_pixel(7, 5), 0);
    }

    #[test]
    fn test_self_intersecting_and_offscreen() {
        let mut pixmap = Pixmap::new(10, 10, PixelType::G1);
        fill_tetragon(&mut pixmap, [(0, 0), (9, 9), (9, 0), (0, 9)], 1);
        assert_eq!(pixmap.get_pixel(1, 4), 1);
        assert_eq!(pixmap.get_pixel(8, 4), 1);
        assert_eq!(pixmap.get_pixel(4, 1), 0);

        let far = [(i32::MIN, i32::MIN), (i32::MAX, 5), (i32::MAX, i32::MAX), (i32::MIN, 3)];
        let bbox = fill_tetragon(&mut pixmap, far, 1);
        assert_eq!(bbox, pixmap.bounds());
    }
}
