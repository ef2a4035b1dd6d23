// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

//! Map Unicode text onto the single-byte encodings of the standard PDF fonts.

/// Which font a byte is shown in: the text face (WinAnsi) or the Symbol font.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Text,
    Symbol,
}

/// A maximal run of bytes shown in the same slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub slot: Slot,
    pub bytes: Vec<u8>,
}

/// WinAnsi code points 0x80..=0x9F that differ from Latin-1.
const WIN_ANSI_EXTRA: &[(char, u8)] = &[
    ('€', 0x80),
    ('‚', 0x82),
    ('ƒ', 0x83),
    ('„', 0x84),
    ('…', 0x85),
    ('†', 0x86),
    ('‡', 0x87),
    ('ˆ', 0x88),
    ('‰', 0x89),
    ('Š', 0x8A),
    ('‹', 0x8B),
    ('Œ', 0x8C),
    ('Ž', 0x8E),
    ('‘', 0x91),
    ('’', 0x92),
    ('“', 0x93),
    ('”', 0x94),
    ('•', 0x95),
    ('–', 0x96),
    ('—', 0x97),
    ('˜', 0x98),
    ('™', 0x99),
    ('š', 0x9A),
    ('›', 0x9B),
    ('œ', 0x9C),
    ('ž', 0x9E),
    ('Ÿ', 0x9F),
];

const GREEK_UPPER: &str = "ΑΒΧΔΕΦΓΗΙϑΚΛΜΝΟΠΘΡΣΤΥςΩΞΨΖ";
const GREEK_LOWER: &str = "αβχδεφγηιϕκλμνοπθρστυϖωξψζ";

const SYMBOL_EXTRA: &[(char, u8)] = &[
    ('∀', 0x22),
    ('∃', 0x24),
    ('∋', 0x27),
    ('∗', 0x2A),
    ('−', 0x2D),
    ('≅', 0x40),
    ('∴', 0x5C),
    ('⊥', 0x5E),
    ('∼', 0x7E),
    ('′', 0xA2),
    ('≤', 0xA3),
    ('∞', 0xA5),
    ('↔', 0xAB),
    ('←', 0xAC),
    ('↑', 0xAD),
    ('→', 0xAE),
    ('↓', 0xAF),
    ('″', 0xB2),
    ('≥', 0xB3),
    ('∝', 0xB5),
    ('∂', 0xB6),
    ('≠', 0xB9),
    ('≡', 0xBA),
    ('≈', 0xBB),
    ('ℵ', 0xC0),
    ('ℑ', 0xC1),
    ('ℜ', 0xC2),
    ('⊗', 0xC4),
    ('⊕', 0xC5),
    ('∅', 0xC6),
    ('∩', 0xC7),
    ('∪', 0xC8),
    ('⊃', 0xC9),
    ('⊇', 0xCA),
    ('⊂', 0xCC),
    ('⊆', 0xCD),
    ('∈', 0xCE),
    ('∉', 0xCF),
    ('∠', 0xD0),
    ('∇', 0xD1),
    ('∏', 0xD5),
    ('√', 0xD6),
    ('⋅', 0xD7),
    ('∧', 0xD9),
    ('∨', 0xDA),
    ('⇔', 0xDB),
    ('⇐', 0xDC),
    ('⇑', 0xDD),
    ('⇒', 0xDE),
    ('⇓', 0xDF),
    ('⟨', 0xE1),
    ('∑', 0xE5),
    ('⌈', 0xE9),
    ('⌊', 0xEB),
    ('⟩', 0xF1),
    ('∫', 0xF2),
    ('⌉', 0xF9),
    ('⌋', 0xFB),
];

/// Characters neither font has, spelled with ones they do.
const TRANSLITERATIONS: &[(char, &str)] = &[
    ('ℝ', "R"),
    ('ℕ', "N"),
    ('ℤ', "Z"),
    ('ℚ', "Q"),
    ('ℂ', "C"),
    ('ℙ', "P"),
    ('𝔼', "E"),
    ('ϵ', "ε"),
    ('ϱ', "ρ"),
    ('ℓ', "l"),
    ('ℏ', "h"),
    ('∐', "∏"),
    ('∬', "∫∫"),
    ('∭', "∫∫∫"),
    ('∮', "∫"),
    ('⋃', "∪"),
    ('⋂', "∩"),
    ('⨁', "⊕"),
    ('⨂', "⊗"),
    ('∓', "-/+"),
    ('⋆', "*"),
    ('∘', "o"),
    ('⊙', "(·)"),
    ('∖', "\\"),
    ('≃', "≅"),
    ('≪', "<<"),
    ('≫', ">>"),
    ('≺', "<"),
    ('≻', ">"),
    ('∥', "||"),
    ('‖', "||"),
    ('∣', "|"),
    ('⊨', "|="),
    ('⊢', "|-"),
    ('≔', ":="),
    ('≜', "=^"),
    ('⟹', "⇒"),
    ('⟸', "⇐"),
    ('⟺', "⇔"),
    ('⟶', "→"),
    ('⟵', "←"),
    ('↦', "|→"),
    ('⟼', "|→"),
    ('↪', "→"),
    ('∄', "¬∃"),
    ('⊤', "T"),
    ('⋯', "…"),
    ('⋮', ":"),
    ('⋱', "…"),
    ('\u{E000}', "{"),
    ('\u{E001}', "}"),
];

fn win_ansi(c: char) -> Option<u8> {
    match c as u32 {
        0x20..=0x7E | 0xA0..=0xFF => Some(c as u8),
        _ => WIN_ANSI_EXTRA.iter().find(|(ch, _)| *ch == c).map(|(_, b)| *b),
    }
}

fn symbol(c: char) -> Option<u8> {
    if let Some(i) = GREEK_UPPER.chars().position(|g| g == c) {
        return Some(b'A' + i as u8);
    }
    if let Some(i) = GREEK_LOWER.chars().position(|g| g == c) {
        return Some(b'a' + i as u8);
    }
    SYMBOL_EXTRA.iter().find(|(ch, _)| *ch == c).map(|(_, b)| *b)
}

fn push(runs: &mut Vec<Run>, slot: Slot, byte: u8) {
    match runs.last_mut() {
        Some(run) if run.slot == slot => run.bytes.push(byte),
        _ => runs.push(Run { slot, bytes: vec![byte] }),
    }
}

fn encode_char(c: char, runs: &mut Vec<Run>, depth: usize) {
    // Combining marks from accents have no glyph of their own.
    if ('\u{300}'..='\u{36F}').contains(&c) {
        return;
    }
    let c = match c {
        '\t' | '\n' | '\r' => ' ',
        c => c,
    };
    if let Some(byte) = win_ansi(c) {
        push(runs, Slot::Text, byte);
    } else if let Some(byte) = symbol(c) {
        push(runs, Slot::Symbol, byte);
    } else if let Some((_, spelled)) = TRANSLITERATIONS.iter().find(|(ch, _)| *ch == c).filter(|_| depth == 0) {
        spelled.chars().for_each(|c| encode_char(c, runs, depth + 1));
    } else {
        push(runs, Slot::Text, b'?');
    }
}

/// Split `text` into runs; unrepresentable characters become `?`.
pub fn encode(text: &str) -> Vec<Run> {
    let mut runs = vec![];
    text.chars().for_each(|c| encode_char(c, &mut runs, 0));
    runs
}
