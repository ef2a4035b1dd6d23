// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

//! Paginated PDF output without a TeX engine.
//!
//! [`format_document`] walks the parse tree once and lays text out at absolute
//! positions; [`paint`] replays the resulting [`Layout`] on a [`Painter`].
//! Math is approximated with Unicode, so every document ends with a note
//! pointing at the `.tex` export.

pub mod encoding;
pub mod layout;
pub mod metrics;
pub mod writer;

use serde::{Deserialize, Serialize};

pub use layout::{format_document, FormatOptions, DISCLAIMER};
pub use writer::{paint, PaintError, Painter, PdfPainter};

/// Page size and margins in PostScript points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageGeometry {
    pub const fn a4() -> Self {
        Self::with_size(595.28, 841.89)
    }

    pub const fn letter() -> Self {
        Self::with_size(612.0, 792.0)
    }

    const fn with_size(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            margin_top: 72.0,
            margin_bottom: 72.0,
            margin_left: 72.0,
            margin_right: 72.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn content_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom
    }

    /// The lowest baseline offset, measured from the top edge.
    pub fn bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
}

impl PaperSize {
    pub fn geometry(self) -> PageGeometry {
        match self {
            PaperSize::A4 => PageGeometry::a4(),
            PaperSize::Letter => PageGeometry::letter(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Serif,
    SerifBold,
    SerifItalic,
    SerifBoldItalic,
    Mono,
}

impl Face {
    pub fn bold(self) -> bool {
        matches!(self, Face::SerifBold | Face::SerifBoldItalic)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    /// Stretch inter-word space to fill `width`.
    Justify,
}

/// One line of text. `y` is the baseline, measured from the top of the page;
/// `x` and `width` describe the box the line is aligned in.
#[derive(Clone, Debug, PartialEq)]
pub struct TextOp {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub text: String,
    pub face: Face,
    pub size: f32,
    pub align: Align,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<TextOp>,
}

impl Page {
    pub fn text(&self) -> String {
        self.ops.iter().map(|op| op.text.as_str()).collect::<Vec<_>>().join("\n")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub geometry: PageGeometry,
    pub title: String,
    pub pages: Vec<Page>,
}
