//! Command assembler: scaled document to ordered ZPL command list.
//!
//! Elements are walked in document z-order, so identical input always
//! yields an identical command list. Every embedded raster gets its own
//! resource name (`IMG<z-index>`); sharing one name across distinct
//! rasters makes the device recall the wrong image.

use image::GrayImage;
use label_model::{ElementKind, ScaledDocument};
use tracing::{debug, warn};

use crate::command::ZplCommand;
use crate::graphics::pack_rows;
use crate::options::{RenderOptions, Strategy};

/// Printer memory device letter used for downloaded graphics.
const GRAPHIC_DEVICE: char = 'R';

/// External collaborator that composes the whole scene into one bitmap.
pub trait SceneRasterizer {
    fn render(&self, doc: &ScaledDocument, dpi: u32) -> Result<GrayImage, String>;
}

#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error("element {element:?} carries an undecodable raster payload: {source}")]
    BadRaster {
        element: String,
        #[source]
        source: image::ImageError,
    },

    #[error("whole-canvas strategy requires a scene rasterizer")]
    MissingRasterizer,

    #[error("scene rasterizer failed: {0}")]
    RasterizerFailed(String),
}

/// Map a rotation in degrees to the nearest ZPL field orientation.
fn orientation(rotation: f64) -> char {
    let quarter = ((rotation / 90.0).round() as i64).rem_euclid(4);
    match quarter {
        1 => 'R',
        2 => 'I',
        3 => 'B',
        _ => 'N',
    }
}

fn round_dot(v: f64) -> u32 {
    v.round().max(0.0) as u32
}

fn graphic_name(z_index: usize) -> String {
    format!("IMG{z_index}.GRF")
}

fn push_graphic(
    commands: &mut Vec<ZplCommand>,
    name: String,
    img: &GrayImage,
    x: u32,
    y: u32,
) {
    let packed = pack_rows(img);
    commands.push(ZplCommand::DownloadGraphic {
        device: GRAPHIC_DEVICE,
        name: name.clone(),
        bytes_per_row: packed.bytes_per_row,
        data: packed.data,
    });
    commands.push(ZplCommand::RecallGraphic { x, y, device: GRAPHIC_DEVICE, name });
}

/// Assemble a scaled document into an ordered command list.
///
/// `rasterizer` is only consulted for [`Strategy::WholeCanvas`].
pub fn assemble(
    scaled: &ScaledDocument,
    options: &RenderOptions,
    rasterizer: Option<&dyn SceneRasterizer>,
) -> Result<Vec<ZplCommand>, AssembleError> {
    let mut commands = vec![
        ZplCommand::StartFormat,
        ZplCommand::SetUnits {
            format_dpi: options.design_dpi,
            printer_dpi: options.printer_dpi,
        },
    ];

    match options.strategy {
        Strategy::PerElement => assemble_elements(scaled, &mut commands)?,
        Strategy::WholeCanvas => {
            let rasterizer = rasterizer.ok_or(AssembleError::MissingRasterizer)?;
            let scene = rasterizer
                .render(scaled, options.printer_dpi)
                .map_err(AssembleError::RasterizerFailed)?;
            push_graphic(&mut commands, graphic_name(0), &scene, 0, 0);
        }
    }

    commands.push(ZplCommand::EndFormat);
    debug!(commands = commands.len(), "Assembled command stream");
    Ok(commands)
}

fn assemble_elements(
    scaled: &ScaledDocument,
    commands: &mut Vec<ZplCommand>,
) -> Result<(), AssembleError> {
    for (z_index, el) in scaled.document.elements.iter().enumerate() {
        let x = round_dot(el.x);
        let y = round_dot(el.y);
        match el.kind {
            ElementKind::Text => {
                let glyph_h = round_dot(el.font_size);
                let glyph_w = round_dot(el.font_size * 0.6);
                commands.push(ZplCommand::TextField {
                    x,
                    y,
                    orient: orientation(el.rotation),
                    glyph_h,
                    glyph_w,
                    content: el.content.clone(),
                });
            }
            _ => {
                let Some(bytes) = el.data.as_deref() else {
                    warn!(element = %el.name, kind = ?el.kind, "No raster available, skipping");
                    continue;
                };
                let img = image::load_from_memory(bytes)
                    .map_err(|source| AssembleError::BadRaster {
                        element: el.name.clone(),
                        source,
                    })?
                    .to_luma8();
                push_graphic(commands, graphic_name(z_index), &img, x, y);
            }
        }
    }
    Ok(())
}
