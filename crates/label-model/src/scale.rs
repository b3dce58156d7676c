//! DPI scale transform: design-resolution units to printer pixels.
//!
//! The transform is pure. It clones the document rather than mutating it
//! in place, so repeated preview/generate cycles can run while the editing
//! session keeps mutating the original.

use tracing::debug;

use crate::document::LabelDocument;
use crate::element::ElementKind;

#[derive(Debug, thiserror::Error)]
pub enum ScaleError {
    #[error("scale factor must be a positive finite number, got {0}")]
    InvalidFactor(f64),

    #[error("DPI values must be positive, got printer={printer} design={design}")]
    InvalidDpi { printer: f64, design: f64 },
}

/// A document with all coordinates in printer pixels, plus the pixel
/// canvas the printer must allocate for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledDocument {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub document: LabelDocument,
}

/// Compute the printer/design scale factor as a true floating ratio.
///
/// 304/96 is ≈3.1667, not 3 — truncating to an integer ratio shrinks the
/// output by over 5% and is rejected here.
pub fn scale_factor(printer_dpi: f64, design_dpi: f64) -> Result<f64, ScaleError> {
    if printer_dpi <= 0.0 || design_dpi <= 0.0 {
        return Err(ScaleError::InvalidDpi { printer: printer_dpi, design: design_dpi });
    }
    Ok(printer_dpi / design_dpi)
}

/// Scale a document by `factor` without touching the source.
///
/// Geometry (x, y, width, height) scales for every element; font size
/// scales for text elements. The pixel canvas is the ceiling of the scaled
/// label dimensions.
pub fn scale_document(doc: &LabelDocument, factor: f64) -> Result<ScaledDocument, ScaleError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ScaleError::InvalidFactor(factor));
    }

    let mut scaled = doc.clone();
    scaled.width = doc.width * factor;
    scaled.height = doc.height * factor;
    for el in &mut scaled.elements {
        el.x *= factor;
        el.y *= factor;
        el.width *= factor;
        el.height *= factor;
        if el.kind == ElementKind::Text {
            el.font_size *= factor;
        }
    }

    let pixel_width = scaled.width.ceil() as u32;
    let pixel_height = scaled.height.ceil() as u32;
    debug!(factor, pixel_width, pixel_height, "Scaled document");

    Ok(ScaledDocument { pixel_width, pixel_height, document: scaled })
}
