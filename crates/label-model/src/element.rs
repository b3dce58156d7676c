//! Label element: one positioned item on the label canvas.

use serde::{Deserialize, Serialize};

use crate::DEFAULT_FONT_SIZE;

/// The kind of content an element carries.
///
/// A kind is fixed at creation time; re-typing an element is modeled as
/// delete + recreate by callers, never as mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Text,
    Image,
    QrCode,
    Ean13,
    Code128,
    DataMatrix,
}

impl ElementKind {
    /// True for the four barcode symbologies.
    pub fn is_barcode(self) -> bool {
        matches!(
            self,
            ElementKind::QrCode | ElementKind::Ean13 | ElementKind::Code128 | ElementKind::DataMatrix
        )
    }

    /// True for kinds that carry a raster payload (barcodes and images).
    pub fn has_raster(self) -> bool {
        self.is_barcode() || self == ElementKind::Image
    }
}

/// One element placed on the label, in design-resolution units.
///
/// `data` holds the element's binary payload: PNG-encoded raster for
/// barcode kinds (replaced wholesale on each re-encode), raw source file
/// bytes for images, `None` for text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelElement {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, with = "crate::project::base64_bytes")]
    pub data: Option<Vec<u8>>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, rename = "originalWidth")]
    pub original_width: f64,
    #[serde(default, rename = "originalHeight")]
    pub original_height: f64,
    #[serde(default = "default_scale", rename = "scaleX")]
    pub scale_x: f64,
    #[serde(default = "default_scale", rename = "scaleY")]
    pub scale_y: f64,
    #[serde(default = "default_font_size", rename = "fontSize")]
    pub font_size: f64,
    #[serde(default)]
    pub rotation: f64,
}

fn default_scale() -> f64 {
    1.0
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

impl LabelElement {
    /// Create a text element.
    pub fn text(name: &str, content: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            name: name.to_string(),
            kind: ElementKind::Text,
            x: x.max(0.0),
            y: y.max(0.0),
            width: width.max(0.0),
            height: height.max(0.0),
            data: None,
            content: content.to_string(),
            path: String::new(),
            original_width: 0.0,
            original_height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            font_size: DEFAULT_FONT_SIZE,
            rotation: 0.0,
        }
    }

    /// Create a barcode element of the given symbology kind.
    pub fn barcode(
        name: &str,
        kind: ElementKind,
        content: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        debug_assert!(kind.is_barcode());
        Self {
            kind,
            content: content.to_string(),
            ..Self::text(name, "", x, y, width, height)
        }
    }

    /// Create an image element backed by raw source file bytes.
    pub fn image(
        name: &str,
        bytes: Vec<u8>,
        path: &str,
        x: f64,
        y: f64,
        original_width: f64,
        original_height: f64,
    ) -> Self {
        Self {
            kind: ElementKind::Image,
            data: Some(bytes),
            path: path.to_string(),
            original_width,
            original_height,
            ..Self::text(name, "", x, y, original_width.max(0.0), original_height.max(0.0))
        }
    }

    /// Move the element, clamping to the non-negative quadrant.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x.max(0.0);
        self.y = y.max(0.0);
    }

    /// Resize the element and re-derive its scale factors against the
    /// source raster dimensions, when a raster backs it.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        if self.original_width > 0.0 {
            self.scale_x = self.width / self.original_width;
        }
        if self.original_height > 0.0 {
            self.scale_y = self.height / self.original_height;
        }
    }

    /// Replace the raster payload (re-encode result or new image bytes).
    pub fn set_data(&mut self, data: Vec<u8>) {
        self.data = Some(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_constructor_clamps_negative_geometry() {
        let el = LabelElement::text("t", "hi", -5.0, -1.0, -10.0, 30.0);
        assert_eq!(el.x, 0.0);
        assert_eq!(el.y, 0.0);
        assert_eq!(el.width, 0.0);
        assert_eq!(el.height, 30.0);
    }

    #[test]
    fn set_size_rederives_scale_factors() {
        let mut el = LabelElement::image("i", vec![1, 2, 3], "a.png", 0.0, 0.0, 200.0, 100.0);
        el.set_size(100.0, 25.0);
        assert!((el.scale_x - 0.5).abs() < 1e-9);
        assert!((el.scale_y - 0.25).abs() < 1e-9);
        // invariant: scale_x * original_width == width
        assert!((el.scale_x * el.original_width - el.width).abs() < 1e-9);
    }

    #[test]
    fn scale_untouched_without_source_dimensions() {
        let mut el = LabelElement::text("t", "hi", 0.0, 0.0, 10.0, 10.0);
        el.set_size(40.0, 40.0);
        assert_eq!(el.scale_x, 1.0);
        assert_eq!(el.scale_y, 1.0);
    }

    #[test]
    fn kind_predicates() {
        assert!(ElementKind::Ean13.is_barcode());
        assert!(ElementKind::QrCode.has_raster());
        assert!(ElementKind::Image.has_raster());
        assert!(!ElementKind::Image.is_barcode());
        assert!(!ElementKind::Text.has_raster());
    }
}
