//! Project file persistence: LabelDocument <-> JSON.
//!
//! Binary payloads travel as base64 strings in the JSON representation and
//! must round-trip byte-exactly. Malformed input is reported distinctly
//! from plain I/O failure so the caller can tell a broken file from a
//! missing one.

use std::path::Path;

use tracing::info;

use crate::document::LabelDocument;

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("malformed project file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("project file I/O failed: {0}")]
    IoFailure(#[from] std::io::Error),
}

/// Serialize a document to pretty-printed project JSON.
pub fn save(doc: &LabelDocument) -> Result<String, SerializationError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Parse project JSON back into a document.
pub fn load(json: &str) -> Result<LabelDocument, SerializationError> {
    Ok(serde_json::from_str(json)?)
}

/// Save a document to a file path.
pub fn save_to_file(doc: &LabelDocument, path: &Path) -> Result<(), SerializationError> {
    let json = save(doc)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "Saved project");
    Ok(())
}

/// Load a document from a file path.
pub fn load_from_file(path: &Path) -> Result<LabelDocument, SerializationError> {
    let json = std::fs::read_to_string(path)?;
    let doc = load(&json)?;
    info!(path = %path.display(), elements = doc.elements.len(), "Loaded project");
    Ok(doc)
}

/// Serde adapter: `Option<Vec<u8>>` as a base64 string or null.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Option<Vec<u8>>, ser: S) -> Result<S::Ok, S::Error> {
        match data {
            Some(bytes) => ser.serialize_str(&STANDARD.encode(bytes)),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Vec<u8>>, D::Error> {
        let text: Option<String> = Option::deserialize(de)?;
        match text {
            Some(s) => STANDARD
                .decode(s.as_bytes())
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
