//! Shared raster stage: module matrix to sized monochrome image.

use image::{GrayImage, Luma};

use crate::ValidationError;

const WHITE: Luma<u8> = Luma([255u8]);
const BLACK: Luma<u8> = Luma([0u8]);

/// A symbology-agnostic module grid. `true` = dark module.
///
/// For linear symbologies the matrix is one row tall and the renderer
/// stretches it over the full symbol height.
#[derive(Debug, Clone)]
pub struct ModuleMatrix {
    width: u32,
    height: u32,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, modules: vec![false; (width * height) as usize] }
    }

    /// Build a one-row matrix from a linear bar pattern.
    pub fn from_row(row: &[bool]) -> Self {
        Self { width: row.len() as u32, height: 1, modules: row.to_vec() }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set(&mut self, x: u32, y: u32, dark: bool) {
        self.modules[(y * self.width + x) as usize] = dark;
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        self.modules[(y * self.width + x) as usize]
    }
}

/// Render a module matrix onto a white `width_px` x `height_px` canvas.
///
/// `quiet` is the quiet-zone width in modules, added on every side. The
/// module pixel scale is the largest integer that fits; scale zero means
/// the request cannot hold the symbol and is a validation error. The
/// symbol is centered on the canvas. One-row matrices stretch vertically
/// over the full symbol height.
pub fn render_modules(
    matrix: &ModuleMatrix,
    quiet: u32,
    width_px: u32,
    height_px: u32,
) -> Result<GrayImage, ValidationError> {
    let total_w = matrix.width() + 2 * quiet;
    let linear = matrix.height() == 1;
    let total_h = if linear { matrix.height() } else { matrix.height() + 2 * quiet };

    let scale_x = width_px / total_w;
    // Linear codes have no vertical module constraint beyond one pixel row.
    let scale = if linear { scale_x } else { scale_x.min(height_px / total_h) };
    if scale == 0 || (linear && height_px == 0) {
        return Err(ValidationError::SizeTooSmall {
            requested_w: width_px,
            requested_h: height_px,
            modules_w: total_w,
            modules_h: total_h,
        });
    }

    let symbol_w = matrix.width() * scale;
    let symbol_h = if linear { height_px } else { matrix.height() * scale };
    let x0 = (width_px - symbol_w) / 2;
    let y0 = (height_px - symbol_h) / 2;

    let mut img = GrayImage::from_pixel(width_px, height_px, WHITE);
    for my in 0..matrix.height() {
        for mx in 0..matrix.width() {
            if !matrix.get(mx, my) {
                continue;
            }
            let px0 = x0 + mx * scale;
            let (py0, run_h) = if linear { (y0, symbol_h) } else { (y0 + my * scale, scale) };
            for dy in 0..run_h {
                for dx in 0..scale {
                    img.put_pixel(px0 + dx, py0 + dy, BLACK);
                }
            }
        }
    }
    Ok(img)
}
