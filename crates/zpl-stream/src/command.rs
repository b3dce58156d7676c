//! ZPL commands and their text rendering.
//!
//! Rendering is strictly deterministic: identical commands always produce
//! byte-identical text. Coordinates are integer dots, graphic data is
//! upper-case hex, and nothing embeds timestamps or ambient state.

use std::fmt::Write;

/// One ZPL command.
#[derive(Debug, Clone, PartialEq)]
pub enum ZplCommand {
    /// `^XA` — begin label format.
    StartFormat,
    /// `^XZ` — end label format.
    EndFormat,
    /// `^MUd,f,p` — dot units, recording format (source) and printer
    /// (target) DPI so the device can compensate residual scale mismatch.
    SetUnits { format_dpi: u32, printer_dpi: u32 },
    /// `^FOx,y^A0o,h,w^FDcontent^FS` — place a text field. `orient` is
    /// the ZPL field orientation (N/R/I/B).
    TextField { x: u32, y: u32, orient: char, glyph_h: u32, glyph_w: u32, content: String },
    /// `~DGd:name,total,bytes_per_row,data` — download a 1-bit graphic
    /// into printer memory under a device letter and resource name.
    DownloadGraphic { device: char, name: String, bytes_per_row: u32, data: Vec<u8> },
    /// `^FOx,y^XGd:name,1,1^FS` — recall a downloaded graphic at a position.
    RecallGraphic { x: u32, y: u32, device: char, name: String },
}

impl ZplCommand {
    /// Append this command's text form to `out`, newline-terminated.
    pub fn write_to(&self, out: &mut String) {
        match self {
            ZplCommand::StartFormat => out.push_str("^XA\n"),
            ZplCommand::EndFormat => out.push_str("^XZ\n"),
            ZplCommand::SetUnits { format_dpi, printer_dpi } => {
                let _ = writeln!(out, "^MUd,{format_dpi},{printer_dpi}");
            }
            ZplCommand::TextField { x, y, orient, glyph_h, glyph_w, content } => {
                let _ = writeln!(out, "^FO{x},{y}^A0{orient},{glyph_h},{glyph_w}^FD{content}^FS");
            }
            ZplCommand::DownloadGraphic { device, name, bytes_per_row, data } => {
                let _ = writeln!(
                    out,
                    "~DG{device}:{name},{},{bytes_per_row},{}",
                    data.len(),
                    hex::encode_upper(data)
                );
            }
            ZplCommand::RecallGraphic { x, y, device, name } => {
                let _ = writeln!(out, "^FO{x},{y}^XG{device}:{name},1,1^FS");
            }
        }
    }
}

/// Render an ordered command list to the final stream text.
pub fn render_stream(commands: &[ZplCommand]) -> String {
    let mut out = String::new();
    for cmd in commands {
        cmd.write_to(&mut out);
    }
    out
}
