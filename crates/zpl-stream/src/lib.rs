//! ZPL command stream generation and delivery for networked label printers.
//!
//! Turns a scaled label document (coordinates already in printer dots) into
//! an ordered ZPL command list, renders it to text, and ships it over a raw
//! TCP connection (port 9100 style, write-only, no response channel).

pub mod assembler;
pub mod command;
pub mod graphics;
pub mod options;
pub mod transport;

// Re-exports for convenience
pub use assembler::{assemble, AssembleError, SceneRasterizer};
pub use command::{render_stream, ZplCommand};
pub use graphics::PackedRaster;
pub use options::{RenderOptions, Strategy};
pub use transport::{probe, send, TransportError};
