//! Midpoint circle
//!
//! Outline and disk come from the same midpoint octant, so the outermost
//! pixel of each filled row is always an outline pixel. Drawing does not
//! walk the octant: the height of the octant above a column is solved
//! directly, and only the columns and rows that can reach the clip
//! rectangle are visited.

use core::iter::Peekable;
use core::ops::RangeInclusive;

use super::{plot, span};
use crate::access::PixelSink;
use crate::bbox::{BBox, Coord};
use crate::pixel::Pixel;

/// Points of one circle octant, from the top `(0, r)` towards the diagonal
///
/// Yields `(x, y)` with `0 <= x <= y`. A negative radius yields nothing.
#[derive(Debug, Clone)]
pub struct CircleOctant {
    x: i64,
    y: i64,
    err: i64,
}

impl CircleOctant {
    pub fn new(r: i32) -> Self {
        Self {
            x: 0,
            y: r as i64,
            err: 1 - r as i64,
        }
    }
}

impl Iterator for CircleOctant {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.x > self.y {
            return None;
        }
        let point = (self.x, self.y);
        self.x += 1;
        if self.err < 0 {
            self.err += 2 * self.x + 1;
        } else {
            self.y -= 1;
            self.err += 2 * (self.x - self.y) + 1;
        }
        Some(point)
    }
}

/// Rows of a disk as `(dy, half_width)`, each `dy` in `0..=r` exactly once
///
/// Rows come out in octant order, not sorted by `dy`.
#[derive(Debug, Clone)]
pub struct CircleRows {
    octant: Peekable<CircleOctant>,
    pending: Option<(i64, i64)>,
}

/// Row half-widths of a disk of radius `r`
pub fn circle_rows(r: i32) -> CircleRows {
    CircleRows {
        octant: CircleOctant::new(r).peekable(),
        pending: None,
    }
}

impl Iterator for CircleRows {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(row) = self.pending.take() {
            return Some(row);
        }
        let (x, y) = self.octant.next()?;
        // Row `y` is final once the walk steps down to the next y.
        let last_for_y = match self.octant.peek() {
            Some(&(_, next_y)) => next_y != y,
            None => true,
        };
        if last_for_y && x != y {
            self.pending = Some((y, x));
        }
        Some((x, y))
    }
}

/// Whether the midpoint between rows `b - 1` and `b` of column `a` lies
/// inside the circle, `(2a)^2 + (2b - 1)^2 < (2r)^2`
fn inside(r: i64, a: i64, b: i64) -> bool {
    let (r, a, b) = (r as i128, a as i128, b as i128);
    4 * a * a + (2 * b - 1) * (2 * b - 1) < 4 * r * r
}

/// Largest `v` in `lo..=hi` for which `pred` holds. `pred` must hold on
/// `lo` and on a prefix of the range.
fn last_where(mut lo: i64, mut hi: i64, pred: impl Fn(i64) -> bool) -> i64 {
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if pred(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

/// Last `x` of the octant of radius `r >= 0`
fn octant_end(r: i64) -> i64 {
    if r == 0 {
        return 0;
    }
    last_where(0, r, |x| inside(r, x, x))
}

/// The `y` that [`CircleOctant`] yields together with `x`, for
/// `0 <= x <= octant_end(r)`
fn octant_height(r: i64, x: i64) -> i64 {
    if r == 0 {
        return 0;
    }
    last_where(0, r, |y| inside(r, x, y))
}

/// Half width of disk row `dy`, for `0 <= dy <= r`
fn row_half_width(r: i64, end: i64, dy: i64) -> i64 {
    if r == 0 {
        0
    } else if dy <= end {
        octant_height(r, dy)
    } else {
        last_where(0, r, |w| inside(r, w, dy))
    }
}

/// Offsets `d` in `0..=max` for which `c - d` or `c + d` lies in `lo..=hi`
fn offsets(c: i64, lo: i64, hi: i64, max: i64) -> RangeInclusive<i64> {
    let (start, end) = if c < lo {
        (lo - c, hi - c)
    } else if c > hi {
        (c - hi, c - lo)
    } else {
        (0, (hi - c).max(c - lo))
    };
    start..=end.min(max)
}

fn bounding_square(cx: Coord, cy: Coord, r: i32) -> BBox {
    let (cx, cy, r) = (cx as i64, cy as i64, r as i64);
    BBox::from_edges(cx - r, cy - r, cx + r + 1, cy + r + 1)
}

pub(crate) fn stroke<S: PixelSink>(sink: &mut S, cx: Coord, cy: Coord, r: i32, pixel: Pixel) -> BBox {
    if r < 0 {
        return BBox::EMPTY;
    }
    let clip = sink.clip();
    let bbox = bounding_square(cx, cy, r).intersect(&clip);
    if bbox.is_empty() {
        return BBox::EMPTY;
    }

    let (cx, cy, r) = (cx as i64, cy as i64, r as i64);
    let end = octant_end(r);
    // Octant columns whose mirrored points can land inside the clip:
    // `cx +- x` must hit the clip columns or `cy +- x` the clip rows.
    let across = offsets(cx, clip.x() as i64, clip.x1(), end);
    let down = offsets(cy, clip.y() as i64, clip.y1(), end);
    let columns = across
        .clone()
        .chain(down.filter(|x| !across.contains(x)));

    for x in columns {
        let y = octant_height(r, x);
        plot(sink, &clip, cx + x, cy + y, pixel);
        plot(sink, &clip, cx + y, cy - x, pixel);
        plot(sink, &clip, cx - x, cy - y, pixel);
        plot(sink, &clip, cx - y, cy + x, pixel);
        if x != 0 && x != y {
            plot(sink, &clip, cx - x, cy + y, pixel);
            plot(sink, &clip, cx + y, cy + x, pixel);
            plot(sink, &clip, cx + x, cy - y, pixel);
            plot(sink, &clip, cx - y, cy - x, pixel);
        }
    }

    bbox
}

pub(crate) fn fill<S: PixelSink>(sink: &mut S, cx: Coord, cy: Coord, r: i32, pixel: Pixel) -> BBox {
    if r < 0 {
        return BBox::EMPTY;
    }
    let clip = sink.clip();
    let bbox = bounding_square(cx, cy, r).intersect(&clip);
    if bbox.is_empty() {
        return BBox::EMPTY;
    }

    let (cx, cy, r) = (cx as i64, cy as i64, r as i64);
    let end = octant_end(r);
    for dy in offsets(cy, clip.y() as i64, clip.y1(), r) {
        let hw = row_half_width(r, end, dy);
        span(sink, &clip, cx - hw, cx + hw, cy - dy, pixel);
        if dy != 0 {
            span(sink, &clip, cx - hw, cx + hw, cy + dy, pixel);
        }
    }

    bbox
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{draw_circle, fill_circle};
    use crate::pixel::PixelType;
    use crate::pixmap::Pixmap;
    use alloc::collections::BTreeSet;
    use alloc::vec::Vec;

    fn set_pixels(pixmap: &Pixmap) -> BTreeSet<(i32, i32)> {
        let mut set = BTreeSet::new();
        for y in 0..pixmap.height() {
            for x in 0..pixmap.width() {
                if pixmap.get_pixel_raw(x, y) != 0 {
                    set.insert((x as i32, y as i32));
                }
            }
        }
        set
    }

    #[test]
    fn test_octant_radius_three() {
        let points: Vec<_> = CircleOctant::new(3).collect();
        assert_eq!(points, [(0, 3), (1, 3), (2, 2)]);
        assert_eq!(CircleOctant::new(0).collect::<Vec<_>>(), [(0, 0)]);
        assert_eq!(CircleOctant::new(-1).count(), 0);
    }

    #[test]
    fn test_rows_cover_every_dy_once() {
        for r in 0..200 {
            let mut dys: Vec<i64> = circle_rows(r).map(|(dy, _)| dy).collect();
            dys.sort_unstable();
            let expected: Vec<i64> = (0..=r as i64).collect();
            assert_eq!(dys, expected, "radius {}", r);
        }
    }

    #[test]
    fn test_fill_circle_golden() {
        let mut pixmap = Pixmap::new(10, 10, PixelType::G8);
        let bbox = fill_circle(&mut pixmap, 5, 5, 3, 0xff);
        assert_eq!(bbox, BBox::pack(2, 2, 7, 7));

        // Row half-widths of the midpoint disk of radius 3: 3, 3, 2, 1.
        let mut expected = BTreeSet::new();
        for (dy, hw) in [(0, 3), (1, 3), (2, 2), (3, 1)] {
            for dx in -hw..=hw {
                expected.insert((5 + dx, 5 + dy));
                expected.insert((5 + dx, 5 - dy));
            }
        }
        let got = set_pixels(&pixmap);
        assert_eq!(got, expected);
        assert_eq!(got.len(), 37);

        // Within one pixel of the ideal disk x^2 + y^2 <= r^2.
        for &(x, y) in &got {
            let (dx, dy) = ((x - 5) as i64, (y - 5) as i64);
            assert!(dx * dx + dy * dy <= (3 + 1) * (3 + 1), "({}, {})", x, y);
        }
        for y in 0..10 {
            for x in 0..10 {
                let (dx, dy) = (x - 5, y - 5);
                if dx * dx + dy * dy <= 9 {
                    assert!(got.contains(&(x, y)), "({}, {})", x, y);
                }
            }
        }
        assert_eq!(pixmap.get_pixel(5, 5), 0xff);
    }

    #[test]
    fn test_outline_eightfold_symmetry() {
        for r in 1..30 {
            let mut pixmap = Pixmap::new(64, 64, PixelType::G8);
            draw_circle(&mut pixmap, 32, 32, r, 1);
            let set = set_pixels(&pixmap);
            for &(x, y) in &set {
                let (dx, dy) = (x - 32, y - 32);
                assert!(set.contains(&(32 - dy, 32 + dx)), "r {} rotate ({}, {})", r, x, y);
                assert!(set.contains(&(32 + dy, 32 + dx)), "r {} mirror ({}, {})", r, x, y);
            }
        }
    }

    #[test]
    fn test_degenerate_radius() {
        let mut pixmap = Pixmap::new(5, 5, PixelType::G8);
        assert_eq!(draw_circle(&mut pixmap, 2, 2, -1, 1), BBox::EMPTY);
        assert_eq!(fill_circle(&mut pixmap, 2, 2, -7, 1), BBox::EMPTY);
        assert!(set_pixels(&pixmap).is_empty());

        assert_eq!(draw_circle(&mut pixmap, 2, 2, 0, 1), BBox::pack(2, 2, 1, 1));
        assert_eq!(set_pixels(&pixmap).into_iter().collect::<Vec<_>>(), [(2, 2)]);

        let mut pixmap = Pixmap::new(5, 5, PixelType::G8);
        fill_circle(&mut pixmap, 2, 2, 0, 1);
        assert_eq!(set_pixels(&pixmap).into_iter().collect::<Vec<_>>(), [(2, 2)]);
    }

    #[test]
    fn test_fill_boundary_matches_outline() {
        for r in 0..25 {
            let mut outline = Pixmap::new(60, 60, PixelType::G8);
            let mut disk = Pixmap::new(60, 60, PixelType::G8);
            draw_circle(&mut outline, 30, 30, r, 1);
            fill_circle(&mut disk, 30, 30, r, 1);
            let outline = set_pixels(&outline);
            let disk = set_pixels(&disk);

            assert!(outline.is_subset(&disk), "radius {}", r);
            for y in 0..60 {
                let row: Vec<i32> = disk.iter().filter(|p| p.1 == y).map(|p| p.0).collect();
                if let (Some(&lo), Some(&hi)) = (row.first(), row.last()) {
                    assert!(outline.contains(&(lo, y)), "radius {} row {}", r, y);
                    assert!(outline.contains(&(hi, y)), "radius {} row {}", r, y);
                    assert_eq!(row.len() as i32, hi - lo + 1);
                }
            }
        }
    }

    #[test]
    fn test_clipped_circle() {
        let mut pixmap = Pixmap::new(10, 10, PixelType::G4);
        let bbox = fill_circle(&mut pixmap, 0, 0, 4, 0xf);
        assert_eq!(bbox, BBox::pack(0, 0, 5, 5));
        assert_eq!(pixmap.get_pixel(0, 0), 0xf);
        assert_eq!(pixmap.get_pixel(4, 0), 0xf);
        assert_eq!(pixmap.get_pixel(5, 0), 0);

        assert_eq!(draw_circle(&mut pixmap, -100, -100, 50, 1), BBox::EMPTY);
        assert_eq!(fill_circle(&mut pixmap, i32::MAX, i32::MIN, i32::MAX, 1), BBox::EMPTY);
    }

    #[test]
    fn test_huge_radius_near_edge() {
        let mut pixmap = Pixmap::new(16, 16, PixelType::G8);
        let bbox = draw_circle(&mut pixmap, 100_000, 8, 99_990, 1);
        assert_eq!(bbox, BBox::pack(10, 0, 6, 16));
        assert_eq!(pixmap.get_pixel(10, 8), 1);
        assert_eq!(pixmap.get_pixel(9, 8), 0);
    }

    #[test]
    fn test_direct_octant_matches_walk() {
        for r in 0..400 {
            let r = r as i64;
            let end = octant_end(r);
            let direct: Vec<_> = (0..=end).map(|x| (x, octant_height(r, x))).collect();
            let walked: Vec<_> = CircleOctant::new(r as i32).collect();
            assert_eq!(direct, walked, "radius {}", r);

            let mut rows: Vec<_> = circle_rows(r as i32).collect();
            rows.sort_unstable();
            let direct: Vec<_> = (0..=r).map(|dy| (dy, row_half_width(r, end, dy))).collect();
            assert_eq!(rows, direct, "radius {}", r);
        }
    }

    #[test]
    fn test_clipped_circle_matches_walk() {
        for (cx, cy, r) in [(3, 4, 9), (-6, 5, 12), (20, -3, 15), (7, 7, 40)] {
            let mut outline = Pixmap::new(12, 10, PixelType::G8);
            let mut disk = Pixmap::new(12, 10, PixelType::G8);
            outline.set_clip(Some(BBox::pack(2, 1, 8, 7)));
            disk.set_clip(Some(BBox::pack(2, 1, 8, 7)));
            draw_circle(&mut outline, cx, cy, r, 1);
            fill_circle(&mut disk, cx, cy, r, 1);

            let inside = |&(x, y): &(i32, i32)| (2..10).contains(&x) && (1..8).contains(&y);
            let mut expected = BTreeSet::new();
            for (x, y) in CircleOctant::new(r) {
                let (x, y) = (x as i32, y as i32);
                for (dx, dy) in [(x, y), (y, x)] {
                    for (sx, sy) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
                        expected.insert((cx + sx * dx, cy + sy * dy));
                    }
                }
            }
            expected.retain(inside);
            assert_eq!(set_pixels(&outline), expected, "circle ({}, {}) r {}", cx, cy, r);

            let mut expected = BTreeSet::new();
            for (dy, hw) in circle_rows(r) {
                let (dy, hw) = (dy as i32, hw as i32);
                for x in cx - hw..=cx + hw {
                    expected.insert((x, cy - dy));
                    expected.insert((x, cy + dy));
                }
            }
            expected.retain(inside);
            assert_eq!(set_pixels(&disk), expected, "disk ({}, {}) r {}", cx, cy, r);
        }
    }

    #[test]
    fn test_max_radius_centered() {
        let mut pixmap = Pixmap::new(10, 10, PixelType::G8);
        assert_eq!(draw_circle(&mut pixmap, 5, 5, i32::MAX, 1), BBox::pack(0, 0, 10, 10));
        assert!(set_pixels(&pixmap).is_empty());

        assert_eq!(fill_circle(&mut pixmap, 5, 5, i32::MAX, 1), BBox::pack(0, 0, 10, 10));
        assert_eq!(set_pixels(&pixmap).len(), 100);
    }
}
