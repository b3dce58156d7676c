//! EAN-13 encoder.
//!
//! Symbol layout: start guard 101, six left digits (L/G parity selected by
//! the leading digit), center guard 01010, six right digits (R-codes), end
//! guard 101 — 95 modules, plus a 9-module quiet zone each side.

use image::GrayImage;

use crate::render::{render_modules, ModuleMatrix};
use crate::{Result, ValidationError};

/// Quiet zone in modules on each side of the symbol.
const QUIET_MODULES: u32 = 9;

/// L-codes (odd parity) for digits 0-9, 7 modules each, MSB = leftmost.
const L_CODES: [u8; 10] = [
    0b0001101, 0b0011001, 0b0010011, 0b0111101, 0b0100011,
    0b0110001, 0b0101111, 0b0111011, 0b0110111, 0b0001011,
];

/// Parity pattern for the six left digits, selected by the leading digit.
/// Bit 5 = first left digit; 0 = L-code, 1 = G-code.
const PARITY: [u8; 10] = [
    0b000000, 0b001011, 0b001101, 0b001110, 0b010011,
    0b011001, 0b011100, 0b010101, 0b010110, 0b011010,
];

/// Compute and append the mod-10 weighted check digit to a 12-digit string.
///
/// Weights alternate 1,3 starting from the most significant digit; the
/// check digit is `(10 - (sum mod 10)) mod 10`.
pub fn append_check_digit(digits: &str) -> std::result::Result<String, ValidationError> {
    if digits.len() != 12 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotNumeric(digits.to_string()));
    }
    let sum: u32 = digits
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 0 { d } else { d * 3 }
        })
        .sum();
    let check = (10 - (sum % 10)) % 10;
    Ok(format!("{digits}{check}"))
}

/// Reduce a digits-only payload to exactly 12 digits: truncate when longer,
/// right-pad with zeros when shorter.
fn normalize(payload: &str) -> std::result::Result<String, ValidationError> {
    if payload.is_empty() {
        return Err(ValidationError::EmptyPayload);
    }
    if payload.len() > 13 || !payload.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotNumeric(payload.to_string()));
    }
    let mut digits = payload.to_string();
    digits.truncate(12);
    while digits.len() < 12 {
        digits.push('0');
    }
    Ok(digits)
}

/// Reverse the low 7 bits of a pattern.
fn reverse7(p: u8) -> u8 {
    let mut out = 0u8;
    for i in 0..7 {
        if p & (1 << i) != 0 {
            out |= 1 << (6 - i);
        }
    }
    out
}

fn push_pattern(row: &mut Vec<bool>, pattern: u8, bits: u32) {
    for i in (0..bits).rev() {
        row.push(pattern & (1 << i) != 0);
    }
}

/// Build the 95-module bar pattern for 13 digits (check digit included).
fn build_row(digits: &str) -> Vec<bool> {
    let d: Vec<u8> = digits.bytes().map(|b| b - b'0').collect();
    let parity = PARITY[d[0] as usize];

    let mut row = Vec::with_capacity(95);
    push_pattern(&mut row, 0b101, 3);
    for (i, &digit) in d[1..7].iter().enumerate() {
        let l = L_CODES[digit as usize];
        // G-code = reversed complement of the L-code
        let code = if parity & (1 << (5 - i)) != 0 { reverse7(!l & 0x7f) } else { l };
        push_pattern(&mut row, code, 7);
    }
    push_pattern(&mut row, 0b01010, 5);
    for &digit in &d[7..13] {
        // R-code = complement of the L-code
        push_pattern(&mut row, !L_CODES[digit as usize] & 0x7f, 7);
    }
    push_pattern(&mut row, 0b101, 3);
    debug_assert_eq!(row.len(), 95);
    row
}

/// Encode a digits payload as an EAN-13 raster of the requested size.
pub fn encode(payload: &str, width_px: u32, height_px: u32) -> Result<GrayImage> {
    let digits = normalize(payload)?;
    let full = append_check_digit(&digits)?;
    let row = build_row(&full);
    let matrix = ModuleMatrix::from_row(&row);
    Ok(render_modules(&matrix, QUIET_MODULES, width_px, height_px)?)
}
