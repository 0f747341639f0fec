use crate::compositing::{blit_rgba, transparent_canvas};
use crate::config::Direction;
use crate::error::{Result, SpriteError};
use crate::model::{Placement, Sheet, SheetStats};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Decoded image to pack (path key + pixels).
pub struct SourceImage {
    /// Path the image was loaded from; its basename becomes the selector name.
    pub key: String,
    pub image: DynamicImage,
}

impl SourceImage {
    pub fn new(key: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            key: key.into(),
            image,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Selector name for this image (basename of `key`).
    pub fn name(&self) -> &str {
        sprite_name(&self.key)
    }
}

/// Output of a packing run: the layout record and the composited RGBA sheet.
pub struct PackOutput {
    pub sheet: Sheet,
    pub rgba: RgbaImage,
}

impl PackOutput {
    /// Convenience method that delegates to `sheet.stats()`.
    pub fn stats(&self) -> SheetStats {
        self.sheet.stats()
    }
}

/// Largest sheet, in pixels, that will be allocated (1 GiB of RGBA).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Basename of a path-like key. `\` is only a separator on Windows.
pub fn sprite_name(key: &str) -> &str {
    let base = if cfg!(windows) {
        key.rsplit(['/', '\\']).next()
    } else {
        key.rsplit('/').next()
    };
    base.unwrap_or(key)
}

/// Canvas size for a strip of `(width, height)` sprites.
///
/// The layout axis gets the sum of extents, the cross axis the maximum.
/// Fails with `Empty` for no sprites, `InvalidInput` for a sprite with a zero
/// dimension and `CanvasTooLarge` when the sum overflows `u32` or the area
/// exceeds [`MAX_CANVAS_PIXELS`].
pub fn canvas_size<I>(sizes: I, direction: Direction) -> Result<(u32, u32)>
where
    I: IntoIterator<Item = (u32, u32)>,
{
    let mut count = 0usize;
    let mut main: u64 = 0;
    let mut cross: u32 = 0;
    for (index, (w, h)) in sizes.into_iter().enumerate() {
        if w == 0 || h == 0 {
            return Err(SpriteError::InvalidInput(format!(
                "sprite #{} has an empty size ({}x{})",
                index, w, h
            )));
        }
        count += 1;
        main += direction.main_extent(w, h) as u64;
        cross = cross.max(direction.cross_extent(w, h));
    }
    if count == 0 {
        return Err(SpriteError::Empty);
    }
    let (width, height) = match direction {
        Direction::Vertical => (cross as u64, main),
        Direction::Horizontal => (main, cross as u64),
    };
    let too_large = SpriteError::CanvasTooLarge { width, height };
    if width.saturating_mul(height) > MAX_CANVAS_PIXELS {
        return Err(too_large);
    }
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(too_large),
    }
}

/// Canvas size needed to hold `images` laid out along `direction`.
pub fn compute_canvas_size(images: &[SourceImage], direction: Direction) -> Result<(u32, u32)> {
    canvas_size(images.iter().map(SourceImage::dimensions), direction)
}

/// Assign offsets along the strip in input order.
///
/// Each offset is the sum of the extents of all earlier sprites.
fn place_strip<'a, I>(items: I, direction: Direction) -> Vec<Placement>
where
    I: IntoIterator<Item = (&'a str, u32, u32)>,
{
    let mut offset: i64 = 0;
    items
        .into_iter()
        .map(|(key, w, h)| {
            let placement = Placement {
                name: sprite_name(key).to_string(),
                offset,
                width: w,
                height: h,
            };
            offset += direction.main_extent(w, h) as i64;
            placement
        })
        .collect()
}

/// Paste `images` into a transparent `canvas_width x canvas_height` sheet.
///
/// Returns the sheet and one placement per image in input order. The size is
/// expected to come from `compute_canvas_size`; sprites past the canvas edge
/// are clipped.
pub fn composite(
    images: &[SourceImage],
    direction: Direction,
    canvas_width: u32,
    canvas_height: u32,
) -> (RgbaImage, Vec<Placement>) {
    let placements = place_strip(
        images.iter().map(|img| {
            let (w, h) = img.dimensions();
            (img.key.as_str(), w, h)
        }),
        direction,
    );
    let mut canvas = transparent_canvas(canvas_width, canvas_height);
    for (img, placement) in images.iter().zip(&placements) {
        let converted;
        let rgba = match img.image.as_rgba8() {
            Some(rgba) => rgba,
            None => {
                converted = img.image.to_rgba8();
                &converted
            }
        };
        let offset = u32::try_from(placement.offset).unwrap_or(u32::MAX);
        let (dx, dy) = direction.position(offset);
        debug!(key = %img.key, offset = placement.offset, "adding sprite");
        blit_rgba(rgba, &mut canvas, dx, dy);
    }
    (canvas, placements)
}

#[instrument(skip_all, fields(count = images.len(), direction = %direction))]
/// Packs `images` into one strip and returns the layout plus the RGBA sheet.
///
/// Notes:
/// - Input order is the layout order; nothing is sorted here.
/// - Validation (empty input, canvas overflow) runs once before any pixels
///   are allocated.
pub fn pack_images(images: &[SourceImage], direction: Direction) -> Result<PackOutput> {
    let (width, height) = compute_canvas_size(images, direction)?;
    info!(
        count = images.len(),
        width, height, "the master image will be {}x{} pixels", width, height
    );
    let (rgba, placements) = composite(images, direction, width, height);
    Ok(PackOutput {
        sheet: Sheet {
            width,
            height,
            direction,
            placements,
        },
        rgba,
    })
}

#[instrument(skip_all, fields(count = inputs.len(), direction = %direction))]
/// Layout-only packing from `(key, width, height)` triples; no pixels are touched.
pub fn pack_layout<K: Into<String>>(
    inputs: Vec<(K, u32, u32)>,
    direction: Direction,
) -> Result<Sheet> {
    let items: Vec<(String, u32, u32)> = inputs
        .into_iter()
        .map(|(k, w, h)| (k.into(), w, h))
        .collect();
    let (width, height) = canvas_size(items.iter().map(|(_, w, h)| (*w, *h)), direction)?;
    let placements = place_strip(
        items.iter().map(|(k, w, h)| (k.as_str(), *w, *h)),
        direction,
    );
    Ok(Sheet {
        width,
        height,
        direction,
        placements,
    })
}

/// Encode `rgba` to `path`, picking the format from the file extension.
///
/// Formats without an alpha channel (JPEG) receive the sheet flattened to RGB.
pub fn save_sheet(rgba: &RgbaImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)?;
    if matches!(format, ImageFormat::Jpeg) {
        let rgb = DynamicImage::ImageRgba8(rgba.clone()).to_rgb8();
        rgb.save_with_format(path, format)?;
    } else {
        rgba.save_with_format(path, format)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_name_strips_directories() {
        assert_eq!(sprite_name("icons/home.png"), "home.png");
        assert_eq!(sprite_name("plain.png"), "plain.png");
    }

    #[cfg(windows)]
    #[test]
    fn sprite_name_accepts_windows_separators() {
        assert_eq!(sprite_name("C:\\art\\x.png"), "x.png");
    }

    #[cfg(not(windows))]
    #[test]
    fn backslash_is_part_of_the_name_outside_windows() {
        assert_eq!(sprite_name("icons/a\\b.png"), "a\\b.png");
    }

    #[test]
    fn zero_sized_sprites_are_rejected() {
        let sizes = vec![(4, 4), (0, 3)];
        match canvas_size(sizes, Direction::Vertical) {
            Err(SpriteError::InvalidInput(msg)) => assert!(msg.contains("#1")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn canvas_size_overflow_is_reported() {
        let sizes = vec![(u32::MAX, 1), (1, 1)];
        match canvas_size(sizes, Direction::Horizontal) {
            Err(SpriteError::CanvasTooLarge { width, height }) => {
                assert_eq!(width, u32::MAX as u64 + 1);
                assert_eq!(height, 1);
            }
            other => panic!("expected CanvasTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn canvas_area_is_capped_before_allocation() {
        let sizes = vec![(60_000, 1), (1, 60_000)];
        match canvas_size(sizes, Direction::Vertical) {
            Err(SpriteError::CanvasTooLarge { width, height }) => {
                assert_eq!(width, 60_000);
                assert_eq!(height, 60_001);
            }
            other => panic!("expected CanvasTooLarge, got {:?}", other),
        }
        assert!(canvas_size(vec![(16_384, 16_384)], Direction::Vertical).is_ok());
    }
}
