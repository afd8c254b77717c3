//! Raster Fuzz Targets
//!
//! Each target decodes its parameters from the input with a [`ByteReader`],
//! runs one library call and compares the result with a brute force model.

use crate::{ByteReader, FuzzResult, FuzzTarget, Violation, ViolationKind};
use alloc::format;
use alloc::string::String;
use softraster::gfx;
use softraster::{
    blit_clipped, BBox, Coord, FormatRegistry, PixelType, Pixmap, PixmapConfig, Size,
};

const MAX_SIDE: u32 = 24;
const STRIDE_ALIGNS: [usize; 4] = [1, 2, 4, 8];
const PADDING: u8 = 0xA5;

fn violation(kind: ViolationKind, detail: String) -> FuzzResult {
    FuzzResult::Violation(Violation::new(kind, detail))
}

fn pixmap(reader: &mut ByteReader) -> Option<Pixmap> {
    let registry = FormatRegistry::standard();
    let pixel_type = PixelType((reader.u8() as usize % registry.len()) as u16);
    let width = reader.size(MAX_SIDE);
    let height = reader.size(MAX_SIDE);
    let config = PixmapConfig {
        stride_align: STRIDE_ALIGNS[reader.u8() as usize % STRIDE_ALIGNS.len()],
        ..Default::default()
    };
    Pixmap::from_registry(registry, width, height, pixel_type, &config).ok()
}

/// Deterministic per-pixel pattern so that untouched pixels are recognizable
fn pattern(x: u32, y: u32, salt: u32) -> u32 {
    (x.wrapping_mul(0x9E37_79B9) ^ y.wrapping_mul(0x85EB_CA6B) ^ salt).rotate_left(7)
}

fn paint_pattern(pixmap: &mut Pixmap, salt: u32) {
    for y in 0..pixmap.height() {
        for x in 0..pixmap.width() {
            pixmap.put_pixel_raw(x, y, pattern(x, y, salt));
        }
    }
}

fn fill_padding(pixmap: &mut Pixmap) {
    let (stride, row) = (pixmap.stride(), pixmap.row_bytes());
    for line in pixmap.data_mut().chunks_mut(stride) {
        for byte in &mut line[row..] {
            *byte = PADDING;
        }
    }
}

fn padding_intact(pixmap: &Pixmap) -> bool {
    let (stride, row) = (pixmap.stride(), pixmap.row_bytes());
    pixmap
        .data()
        .chunks(stride)
        .all(|line| line[row..].iter().all(|&byte| byte == PADDING))
}

/// Inclusive coordinate range as i64
fn ordered(a: Coord, b: Coord) -> (i64, i64) {
    (a.min(b) as i64, a.max(b) as i64)
}

/// Clipped blit between random pixmaps of random formats
#[derive(Default)]
pub struct BlitClippedTarget;

impl BlitClippedTarget {
    pub fn new() -> Self {
        Self
    }
}

impl FuzzTarget for BlitClippedTarget {
    fn name(&self) -> &str {
        "blit_clipped"
    }

    fn fuzz(&mut self, input: &[u8]) -> FuzzResult {
        if input.len() < 8 {
            return FuzzResult::Rejected;
        }
        let mut reader = ByteReader::new(input);

        let (Some(mut src), Some(mut dst)) = (pixmap(&mut reader), pixmap(&mut reader)) else {
            return FuzzResult::Rejected;
        };
        let salt = reader.i32() as u32;
        paint_pattern(&mut src, salt);
        paint_pattern(&mut dst, !salt);
        fill_padding(&mut dst);
        let before = dst.clone();

        let (x0, y0, x1, y1) = (reader.coord(), reader.coord(), reader.coord(), reader.coord());
        let (x2, y2) = (reader.coord(), reader.coord());
        let bbox = blit_clipped(&src, x0, y0, x1, y1, &mut dst, x2, y2);

        if !padding_intact(&dst) {
            return violation(
                ViolationKind::PaddingWritten,
                format!("stride {} row {}", dst.stride(), dst.row_bytes()),
            );
        }

        let (rx0, rx1) = ordered(x0, x1);
        let (ry0, ry1) = ordered(y0, y1);
        let dx = x2 as i64 - rx0;
        let dy = y2 as i64 - ry0;
        let src_bounds = src.bounds();
        let mut copied = BBox::EMPTY;

        for y in 0..dst.height() {
            for x in 0..dst.width() {
                let sx = x as i64 - dx;
                let sy = y as i64 - dy;
                let inside = (rx0..=rx1).contains(&sx)
                    && (ry0..=ry1).contains(&sy)
                    && sx >= 0
                    && sy >= 0
                    && src_bounds.contains(sx as Coord, sy as Coord);

                let expected = if inside {
                    copied = copied.union(&BBox::pack(x as Coord, y as Coord, 1, 1));
                    src.format()
                        .convert(src.get_pixel_raw(sx as u32, sy as u32), dst.format())
                } else {
                    before.get_pixel_raw(x, y)
                };

                let actual = dst.get_pixel_raw(x, y);
                if actual != expected {
                    let kind = if inside {
                        ViolationKind::WrongValue
                    } else {
                        ViolationKind::OutOfBounds
                    };
                    return violation(
                        kind,
                        format!("({}, {}) is {:#x}, expected {:#x}", x, y, actual, expected),
                    );
                }
            }
        }

        if bbox != copied {
            return violation(
                ViolationKind::WrongBox,
                format!("returned {}, copied {}", bbox, copied),
            );
        }
        if !copied.is_empty() && copied != dst.bounds() && copied.area() < src_bounds.area() {
            return FuzzResult::Interesting(format!("partial copy {}", copied));
        }
        FuzzResult::Ok
    }

    fn reset(&mut self) {}
}

/// Circle outline and disk with random centers, radii and clip rectangles
#[derive(Default)]
pub struct CircleTarget;

impl CircleTarget {
    pub fn new() -> Self {
        Self
    }
}

impl FuzzTarget for CircleTarget {
    fn name(&self) -> &str {
        "circle"
    }

    fn fuzz(&mut self, input: &[u8]) -> FuzzResult {
        if input.len() < 6 {
            return FuzzResult::Rejected;
        }
        let mut reader = ByteReader::new(input);

        let Some(mut outline) = pixmap(&mut reader) else {
            return FuzzResult::Rejected;
        };
        if reader.u8() & 1 == 1 {
            let x = reader.u8() as i8 as Coord;
            let y = reader.u8() as i8 as Coord;
            let (w, h) = (reader.size(MAX_SIDE), reader.size(MAX_SIDE));
            outline.set_clip(Some(BBox::pack(x, y, w, h)));
        }
        let mut disk = outline.clone();

        let (cx, cy) = (reader.coord(), reader.coord());
        let r = match reader.u8() % 3 {
            0 => reader.u8() as i8 as i32,
            1 => i16::from_le_bytes([reader.u8(), reader.u8()]) as i32,
            _ => reader.i32(),
        };

        let outline_box = gfx::draw_circle(&mut outline, cx, cy, r, 1);
        let disk_box = gfx::fill_circle(&mut disk, cx, cy, r, 1);

        if outline_box != disk_box {
            return violation(
                ViolationKind::WrongBox,
                format!("outline {} disk {}", outline_box, disk_box),
            );
        }
        let clip = outline.clip_rect();
        if !clip.contains_bbox(&outline_box) {
            return violation(
                ViolationKind::WrongBox,
                format!("{} exceeds clip {}", outline_box, clip),
            );
        }
        if r < 0 && !outline_box.is_empty() {
            return violation(ViolationKind::WrongBox, format!("radius {} drew {}", r, outline_box));
        }

        let r2 = (r as i128) * (r as i128);
        let r = r as i128;
        let mut touched = 0u64;

        for y in 0..outline.height() {
            for x in 0..outline.width() {
                let on_outline = outline.get_pixel_raw(x, y) != 0;
                let in_disk = disk.get_pixel_raw(x, y) != 0;
                if !on_outline && !in_disk {
                    continue;
                }
                touched += 1;

                let (px, py) = (x as Coord, y as Coord);
                if !clip.contains(px, py) || !outline_box.contains(px, py) {
                    return violation(
                        ViolationKind::OutOfBounds,
                        format!("({}, {}) outside {}", x, y, outline_box),
                    );
                }
                if on_outline && !in_disk {
                    return violation(
                        ViolationKind::WrongValue,
                        format!("outline pixel ({}, {}) not in disk", x, y),
                    );
                }

                let ex = px as i128 - cx as i128;
                let ey = py as i128 - cy as i128;
                let d = ex * ex + ey * ey;
                if d > r2 + r || (on_outline && d < r2 - r) {
                    return violation(
                        ViolationKind::WrongValue,
                        format!("({}, {}) at squared distance {} from radius {}", x, y, d, r),
                    );
                }
            }
        }

        let (cx, cy, r) = (cx as i64, cy as i64, r as i64);
        let square = BBox::from_xyxy(
            (cx - r).max(clip.x() as i64) as Coord,
            (cy - r).max(clip.y() as i64) as Coord,
            (cx + r).min(clip.x1()) as Coord,
            (cy + r).min(clip.y1()) as Coord,
        );
        if touched > 0 && outline_box != square {
            return violation(
                ViolationKind::WrongBox,
                format!("{} is not the clipped bounding square {}", outline_box, square),
            );
        }
        if touched > 0 && outline.clip().is_some() {
            return FuzzResult::Interesting(format!("clipped circle r={}", r));
        }
        FuzzResult::Ok
    }

    fn reset(&mut self) {}
}

/// Box algebra: intersection, union and containment laws
#[derive(Default)]
pub struct BBoxTarget;

impl BBoxTarget {
    pub fn new() -> Self {
        Self
    }
}

fn extent(reader: &mut ByteReader) -> Size {
    if reader.u8() & 3 == 0 {
        reader.i32() as Size
    } else {
        reader.u8() as Size
    }
}

fn bbox(reader: &mut ByteReader) -> BBox {
    let (x, y) = (reader.coord(), reader.coord());
    BBox::pack(x, y, extent(reader), extent(reader))
}

fn check(ok: bool, law: &str, a: &BBox, b: &BBox) -> Result<(), FuzzResult> {
    if ok {
        Ok(())
    } else {
        Err(violation(
            ViolationKind::BoxAlgebra,
            format!("{} fails for {:?} and {:?}", law, a, b),
        ))
    }
}

impl BBoxTarget {
    fn laws(a: &BBox, b: &BBox, px: Coord, py: Coord) -> Result<(), FuzzResult> {
        let meet = a.intersect(b);
        let join = a.union(b);

        check(meet == b.intersect(a), "intersect commutes", a, b)?;
        check(join == b.union(a), "union commutes", a, b)?;
        check(a.contains_bbox(&meet) && b.contains_bbox(&meet), "intersection inside both", a, b)?;
        check(meet.area() <= a.area().min(b.area()), "intersection area", a, b)?;
        check(
            meet.contains(px, py) == (a.contains(px, py) && b.contains(px, py)),
            "intersection membership",
            a,
            b,
        )?;
        check(a.intersect(a) == *a && a.union(a) == *a, "idempotence", a, b)?;
        check(a.union(&BBox::EMPTY) == *a, "union identity", a, b)?;
        check(a.intersect(&BBox::EMPTY) == BBox::EMPTY, "intersect annihilator", a, b)?;
        check(a.is_empty() == (*a == BBox::EMPTY), "canonical empty", a, b)?;

        let overlap = !a.is_empty()
            && !b.is_empty()
            && (a.x() as i64).max(b.x() as i64) < a.right().min(b.right())
            && (a.y() as i64).max(b.y() as i64) < a.bottom().min(b.bottom());
        check(a.intersects(b) == overlap, "overlap test", a, b)?;

        // A union wider than Size::MAX is clamped and no longer covers both.
        let left = (a.x() as i64).min(b.x() as i64);
        let top = (a.y() as i64).min(b.y() as i64);
        let fits = a.right().max(b.right()) - left <= Size::MAX as i64
            && a.bottom().max(b.bottom()) - top <= Size::MAX as i64;
        if fits || a.is_empty() || b.is_empty() {
            check(join.contains_bbox(a) && join.contains_bbox(b), "union covers both", a, b)?;
        }
        if fits && !a.is_empty() && !b.is_empty() {
            check(
                join.x() as i64 == left
                    && join.y() as i64 == top
                    && join.right() == a.right().max(b.right())
                    && join.bottom() == a.bottom().max(b.bottom()),
                "union is tight",
                a,
                b,
            )?;
        }
        Ok(())
    }
}

impl FuzzTarget for BBoxTarget {
    fn name(&self) -> &str {
        "bbox"
    }

    fn fuzz(&mut self, input: &[u8]) -> FuzzResult {
        if input.len() < 4 {
            return FuzzResult::Rejected;
        }
        let mut reader = ByteReader::new(input);
        let a = bbox(&mut reader);
        let b = bbox(&mut reader);
        let (px, py) = (reader.coord(), reader.coord());

        match Self::laws(&a, &b, px, py) {
            Ok(()) if a.intersects(&b) && a != b => {
                FuzzResult::Interesting(String::from("overlapping boxes"))
            }
            Ok(()) => FuzzResult::Ok,
            Err(result) => result,
        }
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::{quick_fuzz, FuzzHarness};
    use crate::FuzzerConfig;
    use alloc::boxed::Box;
    use alloc::vec;
    use alloc::vec::Vec;

    fn seeds() -> Vec<Vec<u8>> {
        vec![
            vec![3, 8, 8, 0, 3, 8, 8, 0, 1, 2, 3, 4, 1, 0, 1, 0, 1, 7, 1, 7, 1, 2, 1, 2],
            vec![0, 16, 4, 1, 4, 5, 5, 2, 0, 0, 0, 0, 1, 0xfe, 1, 0xfe, 1, 9, 1, 9, 1, 20, 1, 3],
            vec![8, 1, 1, 3, 2, 23, 23, 0, 9, 9, 9, 9, 0, 0, 0, 0, 0x80, 1, 5, 1, 5, 1, 0, 1, 0],
        ]
    }

    #[test]
    fn test_blit_target_seeds() {
        let mut target = BlitClippedTarget::new();
        for seed in seeds() {
            let result = target.fuzz(&seed);
            assert!(!result.is_violation(), "{:?}", result);
        }
        assert_eq!(target.fuzz(&[1, 2]), FuzzResult::Rejected);
    }

    #[test]
    fn test_circle_target_seeds() {
        let mut target = CircleTarget::new();
        for seed in seeds() {
            let result = target.fuzz(&seed);
            assert!(!result.is_violation(), "{:?}", result);
        }
    }

    #[test]
    fn test_bbox_target_extremes() {
        let mut target = BBoxTarget::new();
        let extremes: [&[u8]; 3] = [
            &[0, 0, 0, 0, 0x80, 0, 0, 0, 0, 0x80, 0, 0xff, 0xff, 0xff, 0xff, 1, 1],
            &[0, 0xff, 0xff, 0xff, 0x7f, 1, 0, 0, 0xff, 0xff, 0xff, 0xff, 1, 1],
            &[1, 5, 1, 5, 1, 4, 1, 4, 1, 7, 1, 7, 1, 4, 1, 4, 1, 8, 1, 8],
        ];
        for input in extremes {
            let result = target.fuzz(input);
            assert!(!result.is_violation(), "{:?}", result);
        }
    }

    #[test]
    fn test_quick_fuzz_finds_nothing() {
        assert!(!quick_fuzz(BBoxTarget::new(), seeds(), 2_000));
        assert!(!quick_fuzz(CircleTarget::new(), seeds(), 300));
        assert!(!quick_fuzz(BlitClippedTarget::new(), seeds(), 300));
    }

    #[test]
    fn test_harness_runs_all_targets() {
        let mut harness = FuzzHarness::new(FuzzerConfig {
            max_iterations: 200,
            ..Default::default()
        });
        harness.add_target(Box::new(BlitClippedTarget::new()));
        harness.add_target(Box::new(CircleTarget::new()));
        harness.add_target(Box::new(BBoxTarget::new()));
        for seed in seeds() {
            harness.add_corpus(seed);
        }
        harness.add_dictionary(vec![vec![0, 0, 0, 0x80], vec![0xff, 0xff, 0xff, 0x7f]]);

        let report = harness.run_configured();
        assert_eq!(report.stats.iterations, 200);
        assert_eq!(report.stats.executions, 600);
        assert!(report.is_clean(), "{}", report.format());
    }
}
