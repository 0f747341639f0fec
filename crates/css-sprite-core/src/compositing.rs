use image::{Rgba, RgbaImage};

/// Fully transparent pixel used for the sheet background.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Allocate a `width x height` RGBA canvas with zero alpha everywhere.
pub fn transparent_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, TRANSPARENT)
}

/// Copy all of `src` into `canvas` with its top-left corner at (dx, dy).
///
/// Pixels are replaced, not blended, so transparent source pixels stay
/// transparent in the sheet. Anything falling outside the canvas is clipped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    if dx >= cw || dy >= ch {
        return;
    }
    let rw = sw.min(cw - dx);
    let rh = sh.min(ch - dy);
    for yy in 0..rh {
        for xx in 0..rw {
            let px = *src.get_pixel(xx, yy);
            canvas.put_pixel(dx + xx, dy + yy, px);
        }
    }
}
