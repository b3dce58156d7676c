//! Label document model for the labelpress pipeline.
//!
//! Provides the resolution-independent document/element types, the
//! DPI scale transform, and the JSON project serializer.

pub mod document;
pub mod element;
pub mod project;
pub mod scale;

// Re-exports for convenience
pub use document::{DocumentEvent, LabelDocument};
pub use element::{ElementKind, LabelElement};
pub use project::{load, load_from_file, save, save_to_file, SerializationError};
pub use scale::{scale_document, scale_factor, ScaleError, ScaledDocument};

/// Default label canvas size in design units.
pub const DEFAULT_LABEL_SIZE: f64 = 100.0;

/// Default font size for new text elements, in design units.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;
