//! Barcode raster encoders for label printing.
//!
//! Supports QR, EAN-13, Code128 and Data Matrix. Every encoder produces a
//! monochrome `GrayImage` sized exactly to the request, with the
//! symbology's quiet zone included; a request too small to hold the
//! symbol's modules is rejected, never silently distorted.

pub mod code128;
pub mod dmtx;
pub mod ean13;
pub mod qr;
mod render;

pub use ean13::append_check_digit;
pub use render::ModuleMatrix;

use image::GrayImage;
use tracing::debug;

/// The four supported barcode symbologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbology {
    QrCode,
    Ean13,
    Code128,
    DataMatrix,
}

impl std::fmt::Display for Symbology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Symbology::QrCode => "QrCode",
            Symbology::Ean13 => "Ean13",
            Symbology::Code128 => "Code128",
            Symbology::DataMatrix => "DataMatrix",
        };
        f.write_str(s)
    }
}

/// Payload/size problems caught before any encoding happens.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("payload is empty")]
    EmptyPayload,

    #[error("EAN-13 payload must be 1-13 ASCII digits, got {0:?}")]
    NotNumeric(String),

    #[error("payload contains characters outside the Code128 subset: {0:?}")]
    UnsupportedCharacters(String),

    #[error(
        "requested {requested_w}x{requested_h} px cannot hold {modules_w}x{modules_h} modules"
    )]
    SizeTooSmall {
        requested_w: u32,
        requested_h: u32,
        modules_w: u32,
        modules_h: u32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SymbologyError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{kind} encoding failed: {reason}")]
    Encoding { kind: Symbology, reason: String },
}

pub type Result<T> = std::result::Result<T, SymbologyError>;

/// Encode `payload` as `kind`, rendered onto a `width_px` x `height_px`
/// white canvas (black modules = 0, white = 255).
pub fn encode(kind: Symbology, payload: &str, width_px: u32, height_px: u32) -> Result<GrayImage> {
    if payload.is_empty() {
        return Err(ValidationError::EmptyPayload.into());
    }
    debug!(%kind, len = payload.len(), width_px, height_px, "Encoding barcode");
    match kind {
        Symbology::QrCode => qr::encode(payload, width_px, height_px),
        Symbology::Ean13 => ean13::encode(payload, width_px, height_px),
        Symbology::Code128 => code128::encode(payload, width_px, height_px),
        Symbology::DataMatrix => dmtx::encode(payload, width_px, height_px),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_rejected_for_every_kind() {
        for kind in [Symbology::QrCode, Symbology::Ean13, Symbology::Code128, Symbology::DataMatrix]
        {
            let err = encode(kind, "", 300, 300).unwrap_err();
            assert!(
                matches!(err, SymbologyError::Validation(ValidationError::EmptyPayload)),
                "{kind}: {err}"
            );
        }
    }

    #[test]
    fn encode_sizes_output_to_request() {
        let img = encode(Symbology::QrCode, "https://example.com", 240, 240).unwrap();
        assert_eq!(img.dimensions(), (240, 240));

        let img = encode(Symbology::Ean13, "123456789012", 300, 100).unwrap();
        assert_eq!(img.dimensions(), (300, 100));
    }

    #[test]
    fn output_is_monochrome() {
        let img = encode(Symbology::Code128, "LBL-001", 400, 120).unwrap();
        for px in img.pixels() {
            assert!(px.0[0] == 0 || px.0[0] == 255);
        }
    }
}
