// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

//! Advance widths of the standard fonts, in thousandths of the font size.

use super::{
    encoding::{self, Slot},
    Face,
};

/// Times-Roman, printable ASCII from `0x20`.
#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 333, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

/// Times-Bold, printable ASCII from `0x20`.
#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 333, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

const COURIER: u16 = 600;
const LATIN_DEFAULT: u16 = 500;
const SYMBOL_UPPER: u16 = 640;
const SYMBOL_DEFAULT: u16 = 549;

fn text_width(byte: u8, face: Face) -> u16 {
    if face == Face::Mono {
        return COURIER;
    }
    let table = match face.bold() {
        true => &TIMES_BOLD,
        false => &TIMES_ROMAN,
    };
    match byte {
        0x20..=0x7E => table[(byte - 0x20) as usize],
        _ => LATIN_DEFAULT,
    }
}

fn symbol_width(byte: u8) -> u16 {
    match byte {
        b' ' => 250,
        b'A'..=b'Z' => SYMBOL_UPPER,
        _ => SYMBOL_DEFAULT,
    }
}

/// Width of an encoded byte in thousandths of the font size.
pub fn glyph_width(slot: Slot, byte: u8, face: Face) -> u16 {
    match slot {
        Slot::Text => text_width(byte, face),
        Slot::Symbol => symbol_width(byte),
    }
}

/// Width of `text` set in `face` at `size` points. Italic faces use the
/// upright widths.
pub fn measure(text: &str, face: Face, size: f32) -> f32 {
    let units: u32 = encoding::encode(text)
        .iter()
        .flat_map(|run| run.bytes.iter().map(move |b| glyph_width(run.slot, *b, face) as u32))
        .sum();
    units as f32 * size / 1000.0
}

/// Number of word spaces, which is what `Tw` stretches.
pub fn count_spaces(text: &str) -> usize {
    text.chars().filter(|c| *c == ' ').count()
}
