//! Data Matrix (ECC200) encoder, backed by the `datamatrix` crate.

use datamatrix::{DataMatrix, SymbolList};
use image::GrayImage;

use crate::render::{render_modules, ModuleMatrix};
use crate::{Result, Symbology, SymbologyError, ValidationError};

/// Quiet zone in modules on each side of the symbol.
const QUIET_MODULES: u32 = 2;

/// Encode a payload as a Data Matrix raster of the requested size.
pub fn encode(payload: &str, width_px: u32, height_px: u32) -> Result<GrayImage> {
    if payload.is_empty() {
        return Err(ValidationError::EmptyPayload.into());
    }
    let encoded = DataMatrix::encode(payload.as_bytes(), SymbolList::default()).map_err(|e| {
        SymbologyError::Encoding {
            kind: Symbology::DataMatrix,
            reason: format!("{e:?}"),
        }
    })?;
    let bitmap = encoded.bitmap();

    let mut matrix = ModuleMatrix::new(bitmap.width() as u32, bitmap.height() as u32);
    for (x, y) in bitmap.pixels() {
        matrix.set(x as u32, y as u32, true);
    }
    Ok(render_modules(&matrix, QUIET_MODULES, width_px, height_px)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_requested_size() {
        let img = encode("LOT-2024-11", 160, 160).unwrap();
        assert_eq!(img.dimensions(), (160, 160));
    }

    #[test]
    fn has_solid_left_finder_edge() {
        // The L-shaped finder makes the symbol's left column solid dark.
        // Smallest symbol is 10x10 modules + 4 quiet = 14; 140px -> scale 10.
        let img = encode("A", 140, 140).unwrap();
        let mut dark_runs = 0;
        for y in 0..140 {
            if img.get_pixel(20, y).0[0] == 0 {
                dark_runs += 1;
            }
        }
        assert!(dark_runs >= 90, "left finder edge missing ({dark_runs} dark px)");
    }

    #[test]
    fn size_below_module_count_is_rejected() {
        let err = encode("A", 8, 8).unwrap_err();
        assert!(matches!(
            err,
            SymbologyError::Validation(crate::ValidationError::SizeTooSmall { .. })
        ));
    }

    #[test]
    fn deterministic_output() {
        let a = encode("deterministic", 160, 160).unwrap();
        let b = encode("deterministic", 160, 160).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
