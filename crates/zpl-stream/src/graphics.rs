//! Monochrome raster packing for `~DG` graphic downloads.

use image::GrayImage;

/// Luma values below this pack as ink.
const INK_THRESHOLD: u8 = 128;

/// A 1-bit row-packed raster ready for download.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedRaster {
    pub width: u32,
    pub height: u32,
    pub bytes_per_row: u32,
    pub data: Vec<u8>,
}

/// Pack a grayscale image into 1-bit rows, 8 pixels per byte, MSB first.
/// Dark pixels (luma < 128) become set bits.
pub fn pack_rows(img: &GrayImage) -> PackedRaster {
    let (width, height) = img.dimensions();
    let bytes_per_row = width.div_ceil(8);
    let mut data = vec![0u8; (bytes_per_row * height) as usize];

    for y in 0..height {
        for x in 0..width {
            if img.get_pixel(x, y).0[0] < INK_THRESHOLD {
                let idx = (y * bytes_per_row + x / 8) as usize;
                data[idx] |= 1 << (7 - (x % 8));
            }
        }
    }

    PackedRaster { width, height, bytes_per_row, data }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn packs_msb_first() {
        let mut img = GrayImage::from_pixel(10, 1, Luma([255]));
        img.put_pixel(0, 0, Luma([0]));
        img.put_pixel(7, 0, Luma([0]));
        img.put_pixel(9, 0, Luma([0]));
        let packed = pack_rows(&img);
        assert_eq!(packed.bytes_per_row, 2);
        assert_eq!(packed.data, vec![0b1000_0001, 0b0100_0000]);
    }

    #[test]
    fn row_padding_is_zero() {
        let img = GrayImage::from_pixel(3, 2, Luma([0]));
        let packed = pack_rows(&img);
        assert_eq!(packed.bytes_per_row, 1);
        assert_eq!(packed.data, vec![0b1110_0000, 0b1110_0000]);
    }

    #[test]
    fn threshold_splits_gray() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([127]));
        img.put_pixel(1, 0, Luma([128]));
        let packed = pack_rows(&img);
        assert_eq!(packed.data, vec![0b1000_0000]);
    }
}
