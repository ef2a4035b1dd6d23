// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};
use thiserror::Error;

use super::{
    encoding::{self, Slot},
    metrics, Align, Face, Layout, PageGeometry, TextOp,
};

#[derive(Error, Debug)]
pub enum PaintError {
    #[error("nothing to paint")]
    Empty,

    #[error("drawing before the first page")]
    NoPage,

    #[error("{0}")]
    Backend(String),
}

/// A surface a [`Layout`] is replayed on.
pub trait Painter {
    fn begin_page(&mut self, geometry: &PageGeometry) -> Result<(), PaintError>;
    fn draw(&mut self, op: &TextOp) -> Result<(), PaintError>;
    fn finish(&mut self, title: &str) -> Result<Vec<u8>, PaintError>;
}

pub fn paint(layout: &Layout, painter: &mut dyn Painter) -> Result<Vec<u8>, PaintError> {
    if layout.pages.is_empty() {
        return Err(PaintError::Empty);
    }
    for page in &layout.pages {
        painter.begin_page(&layout.geometry)?;
        for op in &page.ops {
            painter.draw(op)?;
        }
    }
    painter.finish(&layout.title)
}

/// Resource name and base font of the standard fonts in use.
const FONTS: [(&[u8], &[u8]); 6] = [
    (b"F1", b"Times-Roman"),
    (b"F2", b"Times-Bold"),
    (b"F3", b"Times-Italic"),
    (b"F4", b"Times-BoldItalic"),
    (b"F5", b"Courier"),
    (b"F6", b"Symbol"),
];

fn font_name(face: Face, slot: Slot) -> &'static [u8] {
    let index = match (slot, face) {
        (Slot::Symbol, _) => 5,
        (Slot::Text, Face::Serif) => 0,
        (Slot::Text, Face::SerifBold) => 1,
        (Slot::Text, Face::SerifItalic) => 2,
        (Slot::Text, Face::SerifBoldItalic) => 3,
        (Slot::Text, Face::Mono) => 4,
    };
    FONTS[index].0
}

/// Writes PDF 1.7 with the base-14 fonts, so no font files are embedded.
pub struct PdfPainter {
    pages: Vec<(PageGeometry, Vec<u8>)>,
    current: Option<(PageGeometry, Content)>,
}

impl PdfPainter {
    pub fn new() -> Self {
        Self {
            pages: vec![],
            current: None,
        }
    }

    fn close_page(&mut self) {
        if let Some((geometry, content)) = self.current.take() {
            self.pages.push((geometry, content.finish()));
        }
    }
}

impl Default for PdfPainter {
    fn default() -> Self {
        Self::new()
    }
}

impl Painter for PdfPainter {
    fn begin_page(&mut self, geometry: &PageGeometry) -> Result<(), PaintError> {
        self.close_page();
        self.current = Some((*geometry, Content::new()));
        Ok(())
    }

    fn draw(&mut self, op: &TextOp) -> Result<(), PaintError> {
        let (geometry, content) = self.current.as_mut().ok_or(PaintError::NoPage)?;

        let natural = metrics::measure(&op.text, op.face, op.size);
        let (x, word_spacing) = match op.align {
            Align::Left => (op.x, 0.0),
            Align::Center => (op.x + ((op.width - natural) / 2.0).max(0.0), 0.0),
            Align::Justify => {
                let spaces = metrics::count_spaces(&op.text);
                let extra = op.width - natural;
                match spaces > 0 && extra > 0.0 {
                    true => (op.x, extra / spaces as f32),
                    false => (op.x, 0.0),
                }
            }
        };

        content.begin_text();
        content.set_word_spacing(word_spacing);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, geometry.height - op.y]);
        for run in encoding::encode(&op.text) {
            content.set_font(Name(font_name(op.face, run.slot)), op.size);
            content.show(Str(&run.bytes));
        }
        content.end_text();
        Ok(())
    }

    fn finish(&mut self, title: &str) -> Result<Vec<u8>, PaintError> {
        self.close_page();
        if self.pages.is_empty() {
            return Err(PaintError::Empty);
        }

        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let tree_id = alloc.bump();
        let info_id = alloc.bump();
        let font_ids: Vec<Ref> = FONTS.iter().map(|_| alloc.bump()).collect();
        let page_ids: Vec<(Ref, Ref)> = self.pages.iter().map(|_| (alloc.bump(), alloc.bump())).collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(page_ids.len() as i32);

        for ((_, base_font), id) in FONTS.iter().zip(&font_ids) {
            let mut font = pdf.type1_font(*id);
            font.base_font(Name(base_font));
            if *base_font != b"Symbol".as_slice() {
                font.encoding_predefined(Name(b"WinAnsiEncoding"));
            }
        }

        for ((page_id, content_id), (geometry, data)) in page_ids.iter().zip(&self.pages) {
            {
                let mut page = pdf.page(*page_id);
                page.media_box(Rect::new(0.0, 0.0, geometry.width, geometry.height));
                page.parent(tree_id);
                page.contents(*content_id);
                let mut resources = page.resources();
                let mut fonts = resources.fonts();
                for ((name, _), id) in FONTS.iter().zip(&font_ids) {
                    fonts.pair(Name(name), *id);
                }
            }
            pdf.stream(*content_id, data);
        }

        pdf.document_info(info_id)
            .title(TextStr(title))
            .subject(TextStr("Research Paper"))
            .creator(TextStr("paperpress"));

        self.pages.clear();
        Ok(pdf.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{format_document, FormatOptions};

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    fn page_count(pdf: &[u8]) -> usize {
        let needle = b"/Type /Page";
        pdf.windows(needle.len() + 1)
            .filter(|window| &window[..needle.len()] == needle && window[needle.len()] != b's')
            .count()
    }

    struct Failing;

    impl Painter for Failing {
        fn begin_page(&mut self, _: &PageGeometry) -> Result<(), PaintError> {
            Ok(())
        }

        fn draw(&mut self, _: &TextOp) -> Result<(), PaintError> {
            Err(PaintError::Backend("canvas lost".to_string()))
        }

        fn finish(&mut self, _: &str) -> Result<Vec<u8>, PaintError> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_pdf_bytes() {
        let layout = format_document("Hello world, $\\alpha$.", &FormatOptions::default());
        let pdf = paint(&layout, &mut PdfPainter::new()).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(contains(&pdf, b"/Times-Roman"));
        assert!(contains(&pdf, b"/Symbol"));
        assert!(contains(&pdf, b"/WinAnsiEncoding"));
        assert!(contains(&pdf, b"/Title"));
        assert!(contains(&pdf, b"(Hello world, ) Tj"));
        assert_eq!(page_count(&pdf), 1);
    }

    #[test]
    fn test_page_count_follows_layout() {
        let src = "Paragraph text that goes on. ".repeat(40);
        let src = vec![src; 12].join("\n\n");
        let layout = format_document(&src, &FormatOptions::default());
        assert!(layout.pages.len() > 1);
        let pdf = paint(&layout, &mut PdfPainter::new()).unwrap();
        assert_eq!(page_count(&pdf), layout.pages.len());
    }

    #[test]
    fn test_failing_painter() {
        let layout = format_document("Hello", &FormatOptions::default());
        let error = paint(&layout, &mut Failing).unwrap_err();
        assert_eq!(error.to_string(), "canvas lost");
    }

    #[test]
    fn test_empty_layout() {
        let layout = Layout {
            geometry: PageGeometry::a4(),
            title: "t".to_string(),
            pages: vec![],
        };
        assert!(matches!(paint(&layout, &mut PdfPainter::new()), Err(PaintError::Empty)));
        let mut painter = PdfPainter::new();
        let op = TextOp {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            text: "x".to_string(),
            face: Face::Serif,
            size: 10.0,
            align: Align::Left,
        };
        assert!(matches!(painter.draw(&op), Err(PaintError::NoPage)));
    }
}
