//! QR code encoder, backed by the `qrcode` crate.

use image::GrayImage;
use qrcode::QrCode;

use crate::render::{render_modules, ModuleMatrix};
use crate::{Result, Symbology, SymbologyError, ValidationError};

/// Quiet zone in modules on each side of the symbol.
const QUIET_MODULES: u32 = 4;

fn to_matrix(code: &QrCode) -> ModuleMatrix {
    let size = code.width() as u32;
    let modules = code.to_colors();
    let mut matrix = ModuleMatrix::new(size, size);
    for (i, color) in modules.iter().enumerate() {
        let x = i as u32 % size;
        let y = i as u32 / size;
        matrix.set(x, y, *color == qrcode::Color::Dark);
    }
    matrix
}

/// Encode a payload as a QR raster of the requested size.
pub fn encode(payload: &str, width_px: u32, height_px: u32) -> Result<GrayImage> {
    if payload.is_empty() {
        return Err(ValidationError::EmptyPayload.into());
    }
    let code = QrCode::new(payload.as_bytes()).map_err(|e| SymbologyError::Encoding {
        kind: Symbology::QrCode,
        reason: e.to_string(),
    })?;
    let matrix = to_matrix(&code);
    Ok(render_modules(&matrix, QUIET_MODULES, width_px, height_px)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_requested_size() {
        let img = encode("https://example.com", 200, 200).unwrap();
        assert_eq!(img.dimensions(), (200, 200));
    }

    #[test]
    fn quiet_zone_border_stays_white() {
        let img = encode("test", 120, 120).unwrap();
        for i in 0..120 {
            assert_eq!(img.get_pixel(i, 0).0[0], 255);
            assert_eq!(img.get_pixel(0, i).0[0], 255);
        }
    }

    #[test]
    fn finder_pattern_is_present() {
        // Version 1 payload -> 21 modules + 8 quiet = 29; at 116px scale = 4.
        let img = encode("test", 116, 116).unwrap();
        let x0 = (116 - 21 * 4) / 2;
        // top-left finder corner module is dark
        assert_eq!(img.get_pixel(x0, x0).0[0], 0);
    }

    #[test]
    fn size_below_module_count_is_rejected() {
        let err = encode("test", 20, 20).unwrap_err();
        assert!(matches!(
            err,
            SymbologyError::Validation(crate::ValidationError::SizeTooSmall { .. })
        ));
    }

    #[test]
    fn deterministic_output() {
        let a = encode("deterministic", 150, 150).unwrap();
        let b = encode("deterministic", 150, 150).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
