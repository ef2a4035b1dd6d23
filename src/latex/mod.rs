// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

//! A forgiving reader for the LaTeX subset research papers are written in.
//!
//! Both the HTML preview and the PDF formatter consume the same tree.
//! Parsing never fails: anything unrecognized degrades to text.

pub mod block;
pub mod document;
pub mod inline;
pub mod source;

pub use block::parse;
pub use inline::parse_inline;

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Heading {
        /// 1 for `\section`, 2 for `\subsection`, 3 for `\subsubsection`.
        level: usize,
        starred: bool,
        title: Vec<Inline>,
        line: usize,
    },
    Paragraph {
        content: Vec<Inline>,
        line: usize,
    },
    DisplayMath {
        source: String,
        line: usize,
    },
    Center {
        blocks: Vec<Block>,
        line: usize,
    },
    VSpace {
        length: Length,
        line: usize,
    },
    List {
        ordered: bool,
        items: Vec<Vec<Block>>,
        line: usize,
    },
    Table {
        /// The first row is the header row.
        rows: Vec<Vec<Vec<Inline>>>,
        line: usize,
    },
    Verbatim {
        text: String,
        line: usize,
    },
    /// Markup that is already HTML and is passed through untouched.
    Html {
        raw: String,
        line: usize,
    },
}

impl Block {
    pub fn line(&self) -> usize {
        match self {
            Block::Heading { line, .. }
            | Block::Paragraph { line, .. }
            | Block::DisplayMath { line, .. }
            | Block::Center { line, .. }
            | Block::VSpace { line, .. }
            | Block::List { line, .. }
            | Block::Table { line, .. }
            | Block::Verbatim { line, .. }
            | Block::Html { line, .. } => *line,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Inline {
    Text(String),
    Math { source: String, display: bool },
    Styled { style: Style, children: Vec<Inline> },
    /// A size switch such as `\Large`; it covers the rest of its group.
    Sized { size: Size, children: Vec<Inline> },
    Group(Vec<Inline>),
    Citation(String),
    Link { url: String, children: Vec<Inline> },
    LineBreak,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    Bold,
    Italic,
    Emph,
    Underline,
    Mono,
    SmallCaps,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Size {
    Tiny,
    Small,
    Normal,
    Large,
    XLarge,
    Huge,
}

impl Size {
    pub fn from_command(name: &str) -> Option<Size> {
        Some(match name {
            "tiny" | "scriptsize" => Size::Tiny,
            "footnotesize" | "small" => Size::Small,
            "normalsize" => Size::Normal,
            "large" => Size::Large,
            "Large" | "LARGE" => Size::XLarge,
            "huge" | "Huge" => Size::Huge,
            _ => return None,
        })
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Size::Tiny => "size-tiny",
            Size::Small => "size-small",
            Size::Normal => "size-normal",
            Size::Large => "size-large",
            Size::XLarge => "size-xlarge",
            Size::Huge => "size-huge",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthUnit {
    Cm,
    Mm,
    In,
    Pt,
    Em,
    Ex,
}

impl Length {
    /// Parse `0.5cm`, `-2mm`, `1em`. A missing or unknown unit is taken as centimeters,
    /// a missing number as zero.
    pub fn parse(text: &str) -> Length {
        let text = text.trim();
        let split = text
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(text.len());
        let (number, unit) = text.split_at(split);
        let value = number.parse::<f32>().unwrap_or(0.0);
        let unit = match unit.trim() {
            "mm" => LengthUnit::Mm,
            "in" => LengthUnit::In,
            "pt" | "bp" => LengthUnit::Pt,
            "em" => LengthUnit::Em,
            "ex" => LengthUnit::Ex,
            _ => LengthUnit::Cm,
        };
        Length { value, unit }
    }

    pub fn as_cm(&self) -> f32 {
        self.value
            * match self.unit {
                LengthUnit::Cm => 1.0,
                LengthUnit::Mm => 0.1,
                LengthUnit::In => 2.54,
                LengthUnit::Pt => 2.54 / 72.27,
                LengthUnit::Em => 0.42,
                LengthUnit::Ex => 0.19,
            }
    }

    pub fn as_pt(&self) -> f32 {
        self.as_cm() * 72.0 / 2.54
    }
}

/// Does the run contain a size switch of at least `size`?
pub fn has_size_at_least(inlines: &[Inline], size: Size) -> bool {
    inlines.iter().any(|inline| match inline {
        Inline::Sized { size: s, children } => *s >= size || has_size_at_least(children, size),
        Inline::Styled { children, .. }
        | Inline::Group(children)
        | Inline::Link { children, .. } => has_size_at_least(children, size),
        _ => false,
    })
}

/// Does the run contain an author/affiliation marker such as `$^{1,*}$`?
pub fn has_superscript_marker(inlines: &[Inline]) -> bool {
    inlines.iter().any(|inline| match inline {
        Inline::Math { source, display: false } => source.trim_start().starts_with('^'),
        Inline::Sized { children, .. }
        | Inline::Styled { children, .. }
        | Inline::Group(children)
        | Inline::Link { children, .. } => has_superscript_marker(children),
        _ => false,
    })
}

/// Is the whole run set in bold (ignoring whitespace)?
pub fn is_bold(inlines: &[Inline]) -> bool {
    let mut saw_bold = false;
    for inline in inlines {
        match inline {
            Inline::Text(text) if text.trim().is_empty() => {}
            Inline::LineBreak => {}
            Inline::Styled { style: Style::Bold, .. } => saw_bold = true,
            Inline::Sized { children, .. } | Inline::Group(children) => {
                if !is_bold(children) {
                    return false;
                }
                saw_bold = true;
            }
            _ => return false,
        }
    }
    saw_bold
}

/// Split a run at its top-level line breaks, descending through size switches
/// and groups so that `{\Large A \\ B}` yields two lines.
pub fn split_lines(inlines: &[Inline]) -> Vec<Vec<Inline>> {
    let mut lines = vec![vec![]];
    for inline in inlines {
        match inline {
            Inline::LineBreak => lines.push(vec![]),
            Inline::Sized { size, children } if children.contains(&Inline::LineBreak) => {
                let mut parts = split_lines(children).into_iter();
                if let Some(first) = parts.next() {
                    push_line(&mut lines, Inline::Sized { size: *size, children: first });
                }
                for part in parts {
                    lines.push(vec![Inline::Sized { size: *size, children: part }]);
                }
            }
            Inline::Group(children) if children.contains(&Inline::LineBreak) => {
                let mut parts = split_lines(children).into_iter();
                if let Some(first) = parts.next() {
                    push_line(&mut lines, Inline::Group(first));
                }
                for part in parts {
                    lines.push(vec![Inline::Group(part)]);
                }
            }
            other => push_line(&mut lines, other.clone()),
        }
    }
    lines
        .into_iter()
        .filter(|line| !plain_text(line, &|source, _| source.to_string()).trim().is_empty())
        .map(trim_line)
        .collect()
}

fn trim_line(mut line: Vec<Inline>) -> Vec<Inline> {
    if let Some(Inline::Text(text)) = line.first_mut() {
        *text = text.trim_start().to_string();
    }
    if let Some(Inline::Text(text)) = line.last_mut() {
        *text = text.trim_end().to_string();
    }
    line.retain(|inline| !matches!(inline, Inline::Text(text) if text.is_empty()));
    line
}

fn push_line(lines: &mut Vec<Vec<Inline>>, inline: Inline) {
    if let Some(last) = lines.last_mut() {
        last.push(inline);
    }
}

/// Flatten a run to plain text; `math` renders `(source, display)` pairs.
pub fn plain_text(inlines: &[Inline], math: &dyn Fn(&str, bool) -> String) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::Math { source, display } => out.push_str(&math(source, *display)),
            Inline::Styled { children, .. }
            | Inline::Sized { children, .. }
            | Inline::Group(children)
            | Inline::Link { children, .. } => out.push_str(&plain_text(children, math)),
            Inline::Citation(label) => {
                out.push('[');
                out.push_str(label);
                out.push(']');
            }
            Inline::LineBreak => out.push('\n'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length() {
        assert_eq!(Length::parse("0.5cm").as_cm(), 0.5);
        assert_eq!(Length::parse("10mm").as_cm(), 1.0);
        assert_eq!(Length::parse("2").as_cm(), 2.0);
        assert_eq!(Length::parse("abc").as_cm(), 0.0);
        assert!((Length::parse("1in").as_pt() - 72.0).abs() < 0.01);
    }

    #[test]
    fn test_split_lines() {
        let inlines = parse_inline(r"{\Large \textbf{Title}}\\ Alice$^{1}$ \\ $^1$MIT");
        let lines = split_lines(&inlines);
        assert_eq!(lines.len(), 3);
        assert!(has_size_at_least(&lines[0], Size::Large));
        assert!(is_bold(&lines[0]));
        assert!(has_superscript_marker(&lines[1]));
        assert!(has_superscript_marker(&lines[2]));
    }
}
