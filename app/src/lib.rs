//! Labelpress application layer.
//!
//! Wires the document model, symbology encoders, command assembler and
//! printer transport into an editing session with debounced barcode
//! re-encoding and one-shot print delivery.

pub mod config;
pub mod session;

pub use config::AppConfig;
pub use session::{EditorSession, SessionError};
