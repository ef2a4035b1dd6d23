// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use std::sync::LazyLock;

use itertools::Itertools;
use regex_lite::Regex;

use super::{metrics, Align, Face, Layout, Page, PageGeometry, TextOp};
use crate::{
    counter::SectionCounter,
    latex::{self, document, Block, Inline, Size},
    math::unicode::to_unicode,
};

pub const DISCLAIMER: &str = "Note: mathematical notation in this PDF is approximated with Unicode \
    characters. For exact rendering, export the .tex file and compile it with pdflatex.";

/// Source lines in which a large or bold block is taken as the title.
const TITLE_WINDOW: usize = 10;
/// Source lines in which affiliation-marked lines are taken as authors.
const AUTHOR_WINDOW: usize = 30;

const LEADING: f32 = 1.35;
const TITLE_SIZE: f32 = 18.0;
const VERBATIM_SIZE: f32 = 9.0;
const DISCLAIMER_SIZE: f32 = 9.0;
const ABSTRACT_INDENT: f32 = 36.0;
const LIST_INDENT: f32 = 18.0;
const CELL_PADDING: f32 = 3.0;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

#[derive(Clone, Debug)]
pub struct FormatOptions {
    pub geometry: PageGeometry,
    /// Goes into the document information, not onto the page.
    pub title: String,
    pub body_size: f32,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            title: "Research Paper".to_string(),
            body_size: 11.0,
        }
    }
}

/// A line of a block. Op baselines are relative to the top of the row.
#[derive(Debug, Default)]
struct Row {
    height: f32,
    ops: Vec<TextOp>,
}

/// Rows that are placed together.
#[derive(Debug, Default)]
struct Chunk {
    rows: Vec<Row>,
    space_before: f32,
    space_after: f32,
    /// Room that must remain below the chunk, so headings stay with their text.
    keep: f32,
}

impl Chunk {
    fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    fn spaced(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    fn height(&self) -> f32 {
        self.rows.iter().map(|row| row.height).sum()
    }
}

#[derive(Clone, Copy, Debug)]
struct TextStyle {
    face: Face,
    size: f32,
    align: Align,
    indent_left: f32,
    indent_right: f32,
}

impl TextStyle {
    fn new(face: Face, size: f32, align: Align) -> Self {
        Self {
            face,
            size,
            align,
            indent_left: 0.0,
            indent_right: 0.0,
        }
    }

    fn indent(mut self, left: f32, right: f32) -> Self {
        self.indent_left = left;
        self.indent_right = right;
        self
    }
}

/// Traversal state of the single pass over the document.
pub struct FormatState<'a> {
    options: &'a FormatOptions,
    pub counter: SectionCounter,
    pub in_abstract: bool,
    pub title_done: bool,
    /// No heading has been seen yet.
    pub front_matter: bool,
    pub cursor_y: f32,
    pub pages: Vec<Page>,
}

/// Lay out a paper body on pages.
pub fn format_document(src: &str, options: &FormatOptions) -> Layout {
    let src = document::unwrap_document(src).unwrap_or(src);
    let mut state = FormatState::new(options);
    for block in latex::parse(src) {
        state.block(&block);
    }
    state.disclaimer();
    Layout {
        geometry: options.geometry,
        title: options.title.clone(),
        pages: state.pages,
    }
}

/// Greedy word wrap. A word wider than `width` gets a line of its own.
pub fn wrap(text: &str, face: Face, size: f32, width: f32) -> Vec<String> {
    let space = metrics::measure(" ", face, size);
    let mut lines = vec![];
    let mut line = String::new();
    let mut line_width = 0.0;
    for word in words(text) {
        let word_width = metrics::measure(word, face, size);
        if !line.is_empty() && line_width + space + word_width > width {
            lines.push(std::mem::take(&mut line));
            line_width = 0.0;
        }
        if !line.is_empty() {
            line.push(' ');
            line_width += space;
        }
        line.push_str(word);
        line_width += word_width;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

// No-break spaces are not separators.
fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split([' ', '\n', '\t', '\r']).filter(|word| !word.is_empty())
}

fn flatten(inlines: &[Inline]) -> String {
    words(&latex::plain_text(inlines, &|source, _| to_unicode(source))).join(" ")
}

fn is_title_candidate(content: &[Inline]) -> bool {
    latex::has_size_at_least(content, Size::Large) || latex::is_bold(content)
}

impl<'a> FormatState<'a> {
    pub fn new(options: &'a FormatOptions) -> Self {
        Self {
            options,
            counter: SectionCounter::init(),
            in_abstract: false,
            title_done: false,
            front_matter: true,
            cursor_y: options.geometry.margin_top,
            pages: vec![Page::default()],
        }
    }

    fn geometry(&self) -> PageGeometry {
        self.options.geometry
    }

    fn body_size(&self) -> f32 {
        self.options.body_size
    }

    fn at_top(&self) -> bool {
        self.cursor_y <= self.geometry().margin_top + f32::EPSILON
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor_y = self.geometry().margin_top;
    }

    fn place_row(&mut self, row: Row) {
        let top = self.cursor_y;
        if let Some(page) = self.pages.last_mut() {
            page.ops.extend(row.ops.into_iter().map(|op| TextOp { y: op.y + top, ..op }));
        }
        self.cursor_y += row.height;
    }

    /// Place a chunk as a whole, starting a fresh page when it does not fit.
    /// A chunk taller than a page flows row by row.
    fn place(&mut self, chunk: Chunk) {
        if chunk.rows.is_empty() {
            return;
        }
        let geometry = self.geometry();
        if !self.at_top() {
            self.cursor_y += chunk.space_before;
        }
        let height = chunk.height();
        let needed = height + chunk.keep;
        if needed <= geometry.content_height() && self.cursor_y + needed > geometry.bottom() && !self.at_top() {
            self.new_page();
        }
        for row in chunk.rows {
            if self.cursor_y + row.height > geometry.bottom() && !self.at_top() {
                self.new_page();
            }
            self.place_row(row);
        }
        self.cursor_y += chunk.space_after;
    }

    fn text_rows(&self, text: &str, style: TextStyle) -> Vec<Row> {
        let geometry = self.geometry();
        let x = geometry.margin_left + style.indent_left;
        let width = geometry.content_width() - style.indent_left - style.indent_right;
        let lines = wrap(text, style.face, style.size, width);
        let last = lines.len().saturating_sub(1);
        lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let align = match style.align {
                    Align::Justify if i == last => Align::Left,
                    align => align,
                };
                Row {
                    height: style.size * LEADING,
                    ops: vec![TextOp {
                        x,
                        y: style.size,
                        width,
                        text,
                        face: style.face,
                        size: style.size,
                        align,
                    }],
                }
            })
            .collect()
    }

    pub fn block(&mut self, block: &Block) {
        match block {
            Block::Heading {
                level,
                starred,
                title,
                ..
            } => self.heading(*level, *starred, title),
            Block::Paragraph { content, line } => self.paragraph(content, *line),
            Block::DisplayMath { source, .. } => self.display_math(source),
            Block::Center { blocks, line } => self.center(blocks, *line),
            Block::VSpace { length, .. } => self.vspace(length.as_pt()),
            Block::List { ordered, items, .. } => self.list(*ordered, items, 0.0),
            Block::Table { rows, .. } => self.table(rows),
            Block::Verbatim { text, .. } => self.verbatim(text),
            Block::Html { raw, .. } => {
                let text = htmlize::unescape(TAG.replace_all(raw, " "));
                let text = words(&text).join(" ");
                self.body(&text, Face::Serif);
            }
        }
    }

    fn heading(&mut self, level: usize, starred: bool, title: &[Inline]) {
        self.front_matter = false;
        self.title_done = true;
        self.in_abstract = false;
        let plain = flatten(title);
        let size = self.body_size();

        let (text, style) = if starred && plain.eq_ignore_ascii_case("abstract") {
            self.in_abstract = true;
            ("ABSTRACT".to_string(), TextStyle::new(Face::SerifBold, size, Align::Center))
        } else if starred {
            let text = match level {
                1 => plain.to_uppercase(),
                _ => plain,
            };
            (text, TextStyle::new(Face::SerifBold, size + 1.0, Align::Left))
        } else {
            self.counter.step_mut(level);
            let number = self.counter.display(level);
            let explicit = plain.starts_with(|c: char| c.is_ascii_digit());
            match level {
                1 if explicit => (plain.to_uppercase(), TextStyle::new(Face::SerifBold, size + 1.0, Align::Left)),
                1 => (
                    format!("{}. {}", number, plain.to_uppercase()),
                    TextStyle::new(Face::SerifBold, size + 1.0, Align::Left),
                ),
                2 if explicit => (plain, TextStyle::new(Face::SerifBold, size, Align::Left)),
                2 => (
                    format!("{} {}", number, plain),
                    TextStyle::new(Face::SerifBold, size, Align::Left),
                ),
                _ if explicit => (plain, TextStyle::new(Face::SerifBoldItalic, size, Align::Left)),
                _ => (
                    format!("{} {}", number, plain),
                    TextStyle::new(Face::SerifBoldItalic, size, Align::Left),
                ),
            }
        };

        let rows = self.text_rows(&text, style);
        let mut chunk = Chunk::new(rows).spaced(size * 1.2, size * 0.4);
        chunk.keep = 2.0 * size * LEADING;
        self.place(chunk);
    }

    fn paragraph(&mut self, content: &[Inline], line: usize) {
        let is_title = !self.title_done && line < TITLE_WINDOW && is_title_candidate(content);
        let is_author = line < AUTHOR_WINDOW && latex::has_superscript_marker(content);
        if self.front_matter && (is_title || is_author) {
            return self.front(content, line);
        }

        let text = flatten(content);
        if text.is_empty() {
            return;
        }
        if text.to_lowercase().starts_with("keywords") {
            let indent = if self.in_abstract { ABSTRACT_INDENT } else { 0.0 };
            let style = TextStyle::new(Face::SerifItalic, self.body_size() - 1.0, Align::Justify).indent(indent, indent);
            let rows = self.text_rows(&text, style);
            self.in_abstract = false;
            return self.place(Chunk::new(rows).spaced(4.0, self.body_size()));
        }

        let face = match latex::is_bold(content) {
            true => Face::SerifBold,
            false => Face::Serif,
        };
        match latex::has_size_at_least(content, Size::Large) {
            true => {
                let style = TextStyle::new(Face::SerifBold, self.body_size() + 3.0, Align::Left);
                let rows = self.text_rows(&text, style);
                self.place(Chunk::new(rows).spaced(4.0, 4.0));
            }
            false => self.body(&text, face),
        }
    }

    fn body(&mut self, text: &str, face: Face) {
        if text.is_empty() {
            return;
        }
        let style = match self.in_abstract {
            true => TextStyle::new(face, self.body_size() - 1.0, Align::Justify)
                .indent(ABSTRACT_INDENT, ABSTRACT_INDENT),
            false => TextStyle::new(face, self.body_size(), Align::Justify),
        };
        let rows = self.text_rows(text, style);
        self.place(Chunk::new(rows).spaced(0.0, self.body_size() * 0.5));
    }

    /// Title and author lines, all centered.
    fn front(&mut self, content: &[Inline], line: usize) {
        for text_line in latex::split_lines(content) {
            let text = flatten(&text_line);
            if text.is_empty() {
                continue;
            }
            if !self.title_done && line < TITLE_WINDOW && is_title_candidate(&text_line) {
                self.title_done = true;
                let rows = self.text_rows(&text, TextStyle::new(Face::SerifBold, TITLE_SIZE, Align::Center));
                self.place(Chunk::new(rows).spaced(0.0, TITLE_SIZE * 0.6));
            } else {
                let rows = self.text_rows(&text, TextStyle::new(Face::Serif, self.body_size(), Align::Center));
                self.place(Chunk::new(rows).spaced(0.0, 2.0));
            }
        }
    }

    fn center(&mut self, blocks: &[Block], line: usize) {
        let is_front = self.front_matter
            && line < AUTHOR_WINDOW
            && blocks.iter().any(|block| match block {
                Block::Paragraph { content, .. } => {
                    is_title_candidate(content) || latex::has_superscript_marker(content)
                }
                _ => false,
            });

        for block in blocks {
            match block {
                Block::Paragraph { content, line } if is_front => self.front(content, *line),
                Block::Paragraph { content, .. } => {
                    let rows = latex::split_lines(content)
                        .iter()
                        .flat_map(|text_line| {
                            let face = match latex::is_bold(text_line) {
                                true => Face::SerifBold,
                                false => Face::Serif,
                            };
                            self.text_rows(&flatten(text_line), TextStyle::new(face, self.body_size(), Align::Center))
                        })
                        .collect();
                    self.place(Chunk::new(rows).spaced(0.0, self.body_size() * 0.5));
                }
                other => self.block(other),
            }
        }
    }

    fn display_math(&mut self, source: &str) {
        let text = words(&to_unicode(source)).join(" ");
        if text.is_empty() {
            return;
        }
        let rows = self.text_rows(&text, TextStyle::new(Face::Serif, self.body_size(), Align::Center));
        let space = self.body_size() * 0.5;
        self.place(Chunk::new(rows).spaced(space, space));
    }

    fn vspace(&mut self, points: f32) {
        if self.at_top() {
            return;
        }
        self.cursor_y += points.max(0.0);
        if self.cursor_y > self.geometry().bottom() {
            self.new_page();
        }
    }

    fn list(&mut self, ordered: bool, items: &[Vec<Block>], indent: f32) {
        let size = self.body_size();
        let x = self.geometry().margin_left + indent;
        for (i, item) in items.iter().enumerate() {
            let marker = match ordered {
                true => format!("{}.", i + 1),
                false => "•".to_string(),
            };
            let mut marked = false;
            for block in item {
                match block {
                    Block::Paragraph { content, .. } => {
                        let style = TextStyle::new(Face::Serif, size, Align::Justify).indent(indent + LIST_INDENT, 0.0);
                        let mut rows = self.text_rows(&flatten(content), style);
                        if let Some(first) = rows.first_mut().filter(|_| !marked) {
                            first.ops.push(TextOp {
                                x,
                                y: size,
                                width: LIST_INDENT,
                                text: marker.clone(),
                                face: Face::Serif,
                                size,
                                align: Align::Left,
                            });
                            marked = true;
                        }
                        self.place(Chunk::new(rows).spaced(0.0, 2.0));
                    }
                    Block::List { ordered, items, .. } => self.list(*ordered, items, indent + LIST_INDENT),
                    other => self.block(other),
                }
            }
        }
        self.cursor_y += size * 0.5;
    }

    fn table(&mut self, rows: &[Vec<Vec<Inline>>]) {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return;
        }
        let geometry = self.geometry();
        let column_width = geometry.content_width() / columns as f32;
        let size = self.body_size() - 1.0;

        let mut out = vec![];
        for (r, row) in rows.iter().enumerate() {
            let face = match r {
                0 => Face::SerifBold,
                _ => Face::Serif,
            };
            let cells = row
                .iter()
                .map(|cell| wrap(&flatten(cell), face, size, column_width - 2.0 * CELL_PADDING))
                .collect_vec();
            let height = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
            for i in 0..height {
                let ops = cells
                    .iter()
                    .enumerate()
                    .filter_map(|(c, lines)| {
                        lines.get(i).map(|text| TextOp {
                            x: geometry.margin_left + c as f32 * column_width + CELL_PADDING,
                            y: size,
                            width: column_width - 2.0 * CELL_PADDING,
                            text: text.clone(),
                            face,
                            size,
                            align: Align::Left,
                        })
                    })
                    .collect();
                out.push(Row {
                    height: size * LEADING,
                    ops,
                });
            }
        }
        self.place(Chunk::new(out).spaced(6.0, 6.0));
    }

    fn verbatim(&mut self, text: &str) {
        let geometry = self.geometry();
        let x = geometry.margin_left + LIST_INDENT;
        let width = geometry.content_width() - LIST_INDENT;
        let per_line = ((width / (0.6 * VERBATIM_SIZE)).floor() as usize).max(1);
        let height = VERBATIM_SIZE * LEADING;

        let mut rows = vec![];
        for line in text.lines() {
            let chars = line.chars().collect_vec();
            if chars.is_empty() {
                rows.push(Row { height, ops: vec![] });
                continue;
            }
            for piece in chars.chunks(per_line) {
                rows.push(Row {
                    height,
                    ops: vec![TextOp {
                        x,
                        y: VERBATIM_SIZE,
                        width,
                        text: piece.iter().collect(),
                        face: Face::Mono,
                        size: VERBATIM_SIZE,
                        align: Align::Left,
                    }],
                });
            }
        }
        let space = self.body_size() * 0.5;
        self.place(Chunk::new(rows).spaced(space, space));
    }

    pub fn disclaimer(&mut self) {
        self.in_abstract = false;
        let rows = self.text_rows(DISCLAIMER, TextStyle::new(Face::SerifItalic, DISCLAIMER_SIZE, Align::Justify));
        self.place(Chunk::new(rows).spaced(DISCLAIMER_SIZE * 2.0, 0.0));
    }
}
