//! Softraster Memory Safety Verification
//!
//! Checks that drawing and blitting never write outside the pixel buffer,
//! never touch row padding and that pixmaps can be shared between clients
//! behind a lock.

#![no_std]
extern crate alloc;

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashSet;
use spin::Mutex;

use softraster::gfx;
use softraster::pixel::STANDARD_FORMATS;
use softraster::{
    blit_clipped, BBox, DamageConfig, DamageTracker, FormatRegistry, PixelType, Pixmap,
    PixmapConfig, RasterError, Redraw,
};

/// Safety check result
#[derive(Debug, Clone)]
pub enum SafetyResult {
    /// Check passed
    Pass,
    /// Check failed with error
    Fail(String),
}

impl SafetyResult {
    pub fn passed(&self) -> bool {
        matches!(self, SafetyResult::Pass)
    }
}

/// Safety check trait
pub trait SafetyCheck {
    fn name(&self) -> &str;
    fn run(&mut self) -> SafetyResult;
}

const PADDING: u8 = 0x5A;

fn padded(pixel_type: PixelType, width: u32, height: u32) -> Result<Pixmap, RasterError> {
    let config = PixmapConfig {
        stride_align: 16,
        ..Default::default()
    };
    let mut pixmap =
        Pixmap::from_registry(FormatRegistry::standard(), width, height, pixel_type, &config)?;
    let (stride, row) = (pixmap.stride(), pixmap.row_bytes());
    for line in pixmap.data_mut().chunks_mut(stride) {
        line[row..].fill(PADDING);
    }
    Ok(pixmap)
}

fn padding_intact(pixmap: &Pixmap) -> bool {
    let (stride, row) = (pixmap.stride(), pixmap.row_bytes());
    pixmap
        .data()
        .chunks(stride)
        .all(|line| line[row..].iter().all(|&byte| byte == PADDING))
}

/// Pixels that differ from zero
fn lit(pixmap: &Pixmap) -> HashSet<(u32, u32)> {
    let mut set = HashSet::new();
    for y in 0..pixmap.height() {
        for x in 0..pixmap.width() {
            if pixmap.get_pixel_raw(x, y) != 0 {
                set.insert((x, y));
            }
        }
    }
    set
}

/// Clipped blits with offsets far outside both pixmaps
pub struct ClippedBlitBoundsTest;

impl SafetyCheck for ClippedBlitBoundsTest {
    fn name(&self) -> &str {
        "clipped_blit_bounds"
    }

    fn run(&mut self) -> SafetyResult {
        let mut src = Pixmap::new(16, 16, PixelType::G4);
        src.fill(0xf);

        // (source corners, placement) pairs
        let cases = [
            ((0, 0, 15, 15), (0, 0)),
            ((0, 0, 15, 15), (-3, -3)),
            ((15, 15, 0, 0), (5, 5)),
            ((0, 0, 15, 15), (7, 0)),
            ((0, 0, 15, 15), (-15, 7)),
            ((0, 0, 15, 15), (i32::MAX, i32::MAX)),
            ((0, 0, 15, 15), (i32::MIN, 0)),
            ((i32::MIN, i32::MIN, i32::MAX, i32::MAX), (i32::MIN, i32::MIN)),
            ((i32::MIN, i32::MIN, i32::MAX, i32::MAX), (0, i32::MIN)),
        ];

        for ((x0, y0, x1, y1), (x2, y2)) in cases {
            let mut dst = match padded(PixelType::G4, 8, 8) {
                Ok(pixmap) => pixmap,
                Err(err) => return SafetyResult::Fail(format!("{}", err)),
            };
            let bbox = blit_clipped(&src, x0, y0, x1, y1, &mut dst, x2, y2);

            let covers = (x2, y2) != (-3, -3) || bbox == dst.bounds();
            if !dst.bounds().contains_bbox(&bbox) || !covers {
                return SafetyResult::Fail(format!("blit to ({}, {}) reported {}", x2, y2, bbox));
            }
            if !padding_intact(&dst) {
                return SafetyResult::Fail(format!("blit to ({}, {}) wrote padding", x2, y2));
            }
            let written = lit(&dst);
            if written.len() as u64 != bbox.area() {
                return SafetyResult::Fail(format!(
                    "blit to ({}, {}) wrote {} pixels for {}",
                    x2,
                    y2,
                    written.len(),
                    bbox
                ));
            }
        }
        SafetyResult::Pass
    }
}

/// Circles whose radius dwarfs the pixmap
pub struct HugeCircleTest;

impl SafetyCheck for HugeCircleTest {
    fn name(&self) -> &str {
        "huge_circle"
    }

    fn run(&mut self) -> SafetyResult {
        let cases = [
            (100_000, 8, 99_995),
            (-50_000, -50_000, 70_710),
            (8, 8, 65_535),
            (8, 8, i32::MAX),
            (i32::MIN, 8, i32::MAX),
        ];

        for (cx, cy, r) in cases {
            let mut outline = match padded(PixelType::G1, 16, 16) {
                Ok(pixmap) => pixmap,
                Err(err) => return SafetyResult::Fail(format!("{}", err)),
            };
            let mut disk = outline.clone();

            let a = gfx::draw_circle(&mut outline, cx, cy, r, 1);
            let b = gfx::fill_circle(&mut disk, cx, cy, r, 1);

            if !outline.bounds().contains_bbox(&a) || a != b {
                return SafetyResult::Fail(format!("circle r={} reported {} and {}", r, a, b));
            }
            if !padding_intact(&outline) || !padding_intact(&disk) {
                return SafetyResult::Fail(format!("circle r={} wrote padding", r));
            }
            if !lit(&outline).is_subset(&lit(&disk)) {
                return SafetyResult::Fail(format!("circle r={} outline leaves the disk", r));
            }
            if r == i32::MAX && cx == 8 && lit(&disk).len() != 256 {
                return SafetyResult::Fail(String::from("centered disk left pixels unset"));
            }
        }
        SafetyResult::Pass
    }
}

/// Lines and tetragons with endpoints at the ends of the coordinate space
pub struct ExtremeCoordinatesTest;

impl SafetyCheck for ExtremeCoordinatesTest {
    fn name(&self) -> &str {
        "extreme_coordinates"
    }

    fn run(&mut self) -> SafetyResult {
        let mut pixmap = match padded(PixelType::RGB888, 10, 10) {
            Ok(pixmap) => pixmap,
            Err(err) => return SafetyResult::Fail(format!("{}", err)),
        };
        let bounds = pixmap.bounds();

        let boxes = [
            gfx::line(&mut pixmap, i32::MIN, i32::MIN, i32::MAX, i32::MAX, 0xffffff),
            gfx::line(&mut pixmap, i32::MIN, 5, i32::MAX, 5, 0xff),
            gfx::fill_rect(&mut pixmap, i32::MIN, i32::MIN, i32::MAX, i32::MAX, 0x10),
            gfx::rect(&mut pixmap, -1, -1, i32::MAX, i32::MAX, 0x20),
            gfx::fill_tetragon(
                &mut pixmap,
                [(i32::MIN, 0), (0, i32::MIN), (i32::MAX, 0), (0, i32::MAX)],
                0x30,
            ),
        ];

        for bbox in boxes {
            if !bounds.contains_bbox(&bbox) {
                return SafetyResult::Fail(format!("{} outside {}", bbox, bounds));
            }
        }
        if !padding_intact(&pixmap) {
            return SafetyResult::Fail(String::from("Row padding modified"));
        }
        if pixmap.get_pixel(0, 0) != 0x30 {
            return SafetyResult::Fail(String::from("Last fill did not cover the pixmap"));
        }
        SafetyResult::Pass
    }
}

/// Pixel access outside the buffer and oversized allocations
pub struct RawAccessBoundsTest;

impl SafetyCheck for RawAccessBoundsTest {
    fn name(&self) -> &str {
        "raw_access_bounds"
    }

    fn run(&mut self) -> SafetyResult {
        let mut pixmap = Pixmap::new(5, 3, PixelType::G2);
        let before = pixmap.data().to_vec();

        for (x, y) in [(-1, 0), (5, 0), (0, 3), (i32::MIN, i32::MAX)] {
            pixmap.put_pixel(x, y, 3);
            if pixmap.get_pixel(x, y) != 0 {
                return SafetyResult::Fail(format!("({}, {}) readable outside buffer", x, y));
            }
        }
        if pixmap.data() != before.as_slice() {
            return SafetyResult::Fail(String::from("Out of bounds write reached the buffer"));
        }

        if Pixmap::try_new(u32::MAX, 1, PixelType::XRGB8888).is_ok() {
            return SafetyResult::Fail(String::from("Oversized pixmap was created"));
        }

        let format = STANDARD_FORMATS[PixelType::G8.index()];
        match Pixmap::from_raw(4, 4, 3, format, vec![0; 16]) {
            Err(RasterError::StrideTooSmall { stride: 3, min: 4 }) => {}
            other => return SafetyResult::Fail(format!("Short stride accepted: {:?}", other.err())),
        }
        match Pixmap::from_raw(4, 4, 4, format, vec![0; 15]) {
            Err(RasterError::BufferTooSmall { len: 15, required: 16 }) => {}
            other => return SafetyResult::Fail(format!("Short buffer accepted: {:?}", other.err())),
        }
        SafetyResult::Pass
    }
}

/// Primitives on sub-byte and byte-aligned pixmaps with padded rows
pub struct StridePaddingTest;

impl SafetyCheck for StridePaddingTest {
    fn name(&self) -> &str {
        "stride_padding"
    }

    fn run(&mut self) -> SafetyResult {
        for pixel_type in [PixelType::G1, PixelType::G2, PixelType::G4, PixelType::RGB888] {
            let mut pixmap = match padded(pixel_type, 13, 7) {
                Ok(pixmap) => pixmap,
                Err(err) => return SafetyResult::Fail(format!("{}", err)),
            };

            gfx::fill_circle(&mut pixmap, 12, 3, 4, 1);
            gfx::hline(&mut pixmap, -5, 40, 6, 1);
            gfx::vline(&mut pixmap, 12, -5, 40, 1);
            gfx::line(&mut pixmap, 0, 0, 12, 6, 1);
            gfx::tetragon(&mut pixmap, [(0, 0), (12, 0), (12, 6), (0, 6)], 1);
            pixmap.put_pixel(12, 6, 1);

            if !padding_intact(&pixmap) {
                return SafetyResult::Fail(format!("{:?} padding modified", pixel_type));
            }
            if pixmap.get_pixel(12, 0) != 1 {
                return SafetyResult::Fail(format!("{:?} last column not drawn", pixel_type));
            }
        }
        SafetyResult::Pass
    }
}

/// Pixmap and damage tracker shared between clients behind spin locks
pub struct SharedPixmapTest;

impl SafetyCheck for SharedPixmapTest {
    fn name(&self) -> &str {
        "shared_pixmap"
    }

    fn run(&mut self) -> SafetyResult {
        let screen = Arc::new(Mutex::new(Pixmap::new(64, 64, PixelType::RGB565)));
        let damage = Arc::new(Mutex::new(DamageTracker::with_config(
            64,
            64,
            DamageConfig {
                start_full: false,
                ..Default::default()
            },
        )));

        let clients: Vec<(Arc<Mutex<Pixmap>>, Arc<Mutex<DamageTracker>>)> = (0..4)
            .map(|_| (Arc::clone(&screen), Arc::clone(&damage)))
            .collect();
        if Arc::strong_count(&screen) != 5 {
            return SafetyResult::Fail(String::from("Strong count should be 5"));
        }

        for (i, (pixmap, tracker)) in clients.iter().enumerate() {
            let offset = i as i32 * 8;
            // One lock scope per batch so another client never sees half of it
            let mut pixmap = pixmap.lock();
            let bbox = gfx::fill_rect(&mut pixmap, offset, offset, offset + 3, offset + 3, 0xffff);
            tracker.lock().add(bbox);
        }
        drop(clients);

        if Arc::strong_count(&screen) != 1 {
            return SafetyResult::Fail(String::from("Client handles leaked"));
        }

        let pending = damage.lock().take();
        if pending != Redraw::Rect(BBox::pack(0, 0, 28, 28)) {
            return SafetyResult::Fail(format!("Unexpected damage {:?}", pending));
        }
        let lit = lit(&screen.lock());
        if lit.len() != 4 * 16 {
            return SafetyResult::Fail(format!("{} pixels drawn, expected 64", lit.len()));
        }
        SafetyResult::Pass
    }
}

/// Run all safety tests
pub fn run_all_tests() -> Vec<(String, SafetyResult)> {
    let mut results = Vec::new();

    let mut tests: Vec<Box<dyn SafetyCheck>> = vec![
        Box::new(ClippedBlitBoundsTest),
        Box::new(HugeCircleTest),
        Box::new(ExtremeCoordinatesTest),
        Box::new(RawAccessBoundsTest),
        Box::new(StridePaddingTest),
        Box::new(SharedPixmapTest),
    ];

    for test in tests.iter_mut() {
        let result = test.run();
        results.push((String::from(test.name()), result));
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_checks_pass() {
        for (name, result) in run_all_tests() {
            assert!(result.passed(), "{}: {:?}", name, result);
        }
    }

    #[test]
    fn test_check_names_are_unique() {
        let names: HashSet<String> = run_all_tests().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names.len(), 6);
    }
}
