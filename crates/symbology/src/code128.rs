//! Code128 encoder.
//!
//! Uses code set B for general ASCII text and code set C for even-length
//! all-digit payloads. Symbol = start code + data symbols + mod-103 check
//! symbol + stop pattern; `11 * (n + 2) + 13` modules wide, with a
//! 10-module quiet zone each side.

use image::GrayImage;

use crate::render::{render_modules, ModuleMatrix};
use crate::{Result, ValidationError};

/// Quiet zone in modules on each side of the symbol.
const QUIET_MODULES: u32 = 10;

/// Default sizing policy: width floor in pixels.
const DEFAULT_WIDTH_FLOOR: u32 = 120;

/// Default sizing policy: extra width per payload character.
const DEFAULT_WIDTH_PER_CHAR: u32 = 12;

const START_B: u8 = 104;
const START_C: u8 = 105;

/// Module widths (bar, space, ... alternating, starting with a bar) for
/// symbol values 0-105. Every entry sums to 11 modules.
#[rustfmt::skip]
const PATTERNS: [[u8; 6]; 106] = [
    [2,1,2,2,2,2], [2,2,2,1,2,2], [2,2,2,2,2,1], [1,2,1,2,2,3], [1,2,1,3,2,2],
    [1,3,1,2,2,2], [1,2,2,2,1,3], [1,2,2,3,1,2], [1,3,2,2,1,2], [2,2,1,2,1,3],
    [2,2,1,3,1,2], [2,3,1,2,1,2], [1,1,2,2,3,2], [1,2,2,1,3,2], [1,2,2,2,3,1],
    [1,1,3,2,2,2], [1,2,3,1,2,2], [1,2,3,2,2,1], [2,2,3,2,1,1], [2,2,1,1,3,2],
    [2,2,1,2,3,1], [2,1,3,2,1,2], [2,2,3,1,1,2], [3,1,2,1,3,1], [3,1,1,2,2,2],
    [3,2,1,1,2,2], [3,2,1,2,2,1], [3,1,2,2,1,2], [3,2,2,1,1,2], [3,2,2,2,1,1],
    [2,1,2,1,2,3], [2,1,2,3,2,1], [2,3,2,1,2,1], [1,1,1,3,2,3], [1,3,1,1,2,3],
    [1,3,1,3,2,1], [1,1,2,3,1,3], [1,3,2,1,1,3], [1,3,2,3,1,1], [2,1,1,3,1,3],
    [2,3,1,1,1,3], [2,3,1,3,1,1], [1,1,2,1,3,3], [1,1,2,3,3,1], [1,3,2,1,3,1],
    [1,1,3,1,2,3], [1,1,3,3,2,1], [1,3,3,1,2,1], [3,1,3,1,2,1], [2,1,1,3,3,1],
    [2,3,1,1,3,1], [2,1,3,1,1,3], [2,1,3,3,1,1], [2,1,3,1,3,1], [3,1,1,1,2,3],
    [3,1,1,3,2,1], [3,3,1,1,2,1], [3,1,2,1,1,3], [3,1,2,3,1,1], [3,3,2,1,1,1],
    [3,1,4,1,1,1], [2,2,1,4,1,1], [4,3,1,1,1,1], [1,1,1,2,2,4], [1,1,1,4,2,2],
    [1,2,1,1,2,4], [1,2,1,4,2,1], [1,4,1,1,2,2], [1,4,1,2,2,1], [1,1,2,2,1,4],
    [1,1,2,4,1,2], [1,2,2,1,1,4], [1,2,2,4,1,1], [1,4,2,1,1,2], [1,4,2,2,1,1],
    [2,4,1,2,1,1], [2,2,1,1,1,4], [4,1,3,1,1,1], [2,4,1,1,1,2], [1,3,4,1,1,1],
    [1,1,1,2,4,2], [1,2,1,1,4,2], [1,2,1,2,4,1], [1,1,4,2,1,2], [1,2,4,1,1,2],
    [1,2,4,2,1,1], [4,1,1,2,1,2], [4,2,1,1,1,2], [4,2,1,2,1,1], [2,1,2,1,4,1],
    [2,1,4,1,2,1], [4,1,2,1,2,1], [1,1,1,1,4,3], [1,1,1,3,4,1], [1,3,1,1,4,1],
    [1,1,4,1,1,3], [1,1,4,3,1,1], [4,1,1,1,1,3], [4,1,1,3,1,1], [1,1,3,1,4,1],
    [1,1,4,1,3,1], [3,1,1,1,4,1], [4,1,1,1,3,1], [2,1,1,4,1,2], [2,1,1,2,1,4],
    [2,1,1,2,3,2],
];

/// Stop pattern, 13 modules.
const STOP: [u8; 7] = [2, 3, 3, 1, 1, 1, 2];

/// Map the payload to symbol values: start code plus data symbols.
fn symbol_values(payload: &str) -> std::result::Result<Vec<u8>, ValidationError> {
    if payload.is_empty() {
        return Err(ValidationError::EmptyPayload);
    }
    let all_digits = payload.bytes().all(|b| b.is_ascii_digit());
    if all_digits && payload.len() % 2 == 0 {
        // Set C: digit pairs
        let mut values = vec![START_C];
        for pair in payload.as_bytes().chunks(2) {
            values.push((pair[0] - b'0') * 10 + (pair[1] - b'0'));
        }
        return Ok(values);
    }
    // Set B covers ASCII 32..=127
    if !payload.bytes().all(|b| (32..=127).contains(&b)) {
        return Err(ValidationError::UnsupportedCharacters(payload.to_string()));
    }
    let mut values = vec![START_B];
    values.extend(payload.bytes().map(|b| b - 32));
    Ok(values)
}

/// Mod-103 check symbol: start value + position-weighted data values.
fn check_symbol(values: &[u8]) -> u8 {
    let sum: u64 = values
        .iter()
        .enumerate()
        .map(|(i, &v)| u64::from(v) * (i as u64).max(1))
        .sum();
    (sum % 103) as u8
}

/// Build the full bar pattern for the given symbol values.
fn build_row(values: &[u8]) -> Vec<bool> {
    let check = check_symbol(values);
    let mut row = Vec::with_capacity(11 * (values.len() + 1) + 13);
    for &v in values.iter().chain(std::iter::once(&check)) {
        let mut dark = true;
        for &w in &PATTERNS[v as usize] {
            for _ in 0..w {
                row.push(dark);
            }
            dark = !dark;
        }
    }
    let mut dark = true;
    for &w in &STOP {
        for _ in 0..w {
            row.push(dark);
        }
        dark = !dark;
    }
    row
}

/// Default raster width for a payload of the given length: a floor plus a
/// per-character increment, so long payloads stay scannable.
pub fn default_width(payload_len: usize) -> u32 {
    DEFAULT_WIDTH_FLOOR + DEFAULT_WIDTH_PER_CHAR * payload_len as u32
}

/// Encode a payload as a Code128 raster of the requested size.
pub fn encode(payload: &str, width_px: u32, height_px: u32) -> Result<GrayImage> {
    let values = symbol_values(payload)?;
    let row = build_row(&values);
    let matrix = ModuleMatrix::from_row(&row);
    Ok(render_modules(&matrix, QUIET_MODULES, width_px, height_px)?)
}
