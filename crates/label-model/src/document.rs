//! Label document: the ordered element collection and its change events.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::LabelElement;
use crate::DEFAULT_LABEL_SIZE;

/// A change to the document, published by the editing session so that
/// rendering surfaces can subscribe without the model knowing about them.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    ElementAdded { name: String },
    ElementChanged { name: String },
    ElementRemoved { name: String },
    Cleared,
    Resized { width: f64, height: f64 },
}

/// The label being edited, in design-resolution units.
///
/// Element order is z-order: later elements render on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDocument {
    #[serde(default, rename = "labelName")]
    pub name: String,
    #[serde(default = "default_dimension", rename = "labelWidth")]
    pub width: f64,
    #[serde(default = "default_dimension", rename = "labelHeight")]
    pub height: f64,
    #[serde(default)]
    pub elements: Vec<LabelElement>,
}

fn default_dimension() -> f64 {
    DEFAULT_LABEL_SIZE
}

impl Default for LabelDocument {
    fn default() -> Self {
        Self {
            name: String::new(),
            width: DEFAULT_LABEL_SIZE,
            height: DEFAULT_LABEL_SIZE,
            elements: Vec::new(),
        }
    }
}

impl LabelDocument {
    pub fn new(name: &str, width: f64, height: f64) -> Self {
        Self {
            name: name.to_string(),
            width: width.max(0.0),
            height: height.max(0.0),
            elements: Vec::new(),
        }
    }

    /// Add an element, suffixing its name if it collides with an existing
    /// one. Returns the name the element actually got.
    pub fn add_element(&mut self, mut element: LabelElement) -> String {
        if self.element(&element.name).is_some() {
            let base = element.name.clone();
            let mut n = 1usize;
            while self.element(&format!("{base}_{n}")).is_some() {
                n += 1;
            }
            element.name = format!("{base}_{n}");
            debug!(name = %element.name, "Renamed colliding element");
        }
        let name = element.name.clone();
        self.elements.push(element);
        name
    }

    pub fn element(&self, name: &str) -> Option<&LabelElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn element_mut(&mut self, name: &str) -> Option<&mut LabelElement> {
        self.elements.iter_mut().find(|e| e.name == name)
    }

    /// Remove an element by name. Returns the removed element, if any.
    pub fn remove_element(&mut self, name: &str) -> Option<LabelElement> {
        let idx = self.elements.iter().position(|e| e.name == name)?;
        Some(self.elements.remove(idx))
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Resize the label canvas.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, LabelElement};

    #[test]
    fn add_and_lookup() {
        let mut doc = LabelDocument::new("test", 100.0, 100.0);
        doc.add_element(LabelElement::text("a", "hello", 0.0, 0.0, 10.0, 10.0));
        assert_eq!(doc.element("a").unwrap().content, "hello");
        assert!(doc.element("b").is_none());
    }

    #[test]
    fn colliding_names_are_suffixed() {
        let mut doc = LabelDocument::default();
        let n0 = doc.add_element(LabelElement::text("a", "1", 0.0, 0.0, 1.0, 1.0));
        let n1 = doc.add_element(LabelElement::text("a", "2", 0.0, 0.0, 1.0, 1.0));
        let n2 = doc.add_element(LabelElement::text("a", "3", 0.0, 0.0, 1.0, 1.0));
        assert_eq!(n0, "a");
        assert_eq!(n1, "a_1");
        assert_eq!(n2, "a_2");
        assert_eq!(doc.elements.len(), 3);
    }

    #[test]
    fn remove_preserves_z_order_of_rest() {
        let mut doc = LabelDocument::default();
        doc.add_element(LabelElement::text("a", "", 0.0, 0.0, 1.0, 1.0));
        doc.add_element(LabelElement::barcode("b", ElementKind::QrCode, "x", 0.0, 0.0, 1.0, 1.0));
        doc.add_element(LabelElement::text("c", "", 0.0, 0.0, 1.0, 1.0));
        assert!(doc.remove_element("b").is_some());
        let names: Vec<_> = doc.elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
        assert!(doc.remove_element("b").is_none());
    }

    #[test]
    fn default_document_is_100_square() {
        let doc = LabelDocument::default();
        assert_eq!(doc.width, 100.0);
        assert_eq!(doc.height, 100.0);
        assert!(doc.elements.is_empty());
    }
}
