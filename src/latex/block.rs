// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use super::{
    inline::parse_inline,
    source::{line_of, strip_comments, VERBATIM_ENVS},
    Block, Inline, Length, Style,
};

const LIST_ENVS: &[&str] = &["itemize", "enumerate", "description"];
const TABLE_ENVS: &[&str] = &["tabular", "tabular*", "tabularx"];
const MATH_ENVS: &[&str] = &[
    "equation", "equation*", "align", "align*", "gather", "gather*", "multline", "multline*",
    "eqnarray", "eqnarray*", "displaymath", "flalign", "flalign*",
];

/// Environments with leading mandatory arguments that carry no content.
const ENV_ARGUMENTS: &[(&str, usize)] = &[
    ("minipage", 1),
    ("multicols", 1),
    ("wrapfigure", 2),
    ("tabular", 1),
    ("tabular*", 2),
    ("tabularx", 2),
    ("minted", 1),
];

/// Commands dropped together with their arguments when they open a line.
const PREAMBLE_COMMANDS: &[(&str, usize)] = &[
    ("documentclass", 1),
    ("usepackage", 1),
    ("geometry", 1),
    ("hypersetup", 1),
    ("newcommand", 2),
    ("renewcommand", 2),
    ("DeclareMathOperator", 2),
    ("setlength", 2),
    ("bibliographystyle", 1),
    ("bibliography", 1),
    ("label", 1),
    ("maketitle", 0),
    ("newpage", 0),
    ("clearpage", 0),
    ("centering", 0),
    ("tableofcontents", 0),
    ("noindent", 0),
    ("hline", 0),
];

/// Parse a paper body into blocks. Comments are stripped first.
pub fn parse(src: &str) -> Vec<Block> {
    let src = strip_comments(src);
    BlockParser::new(&src, 0).parse_blocks()
}

struct BlockParser<'a> {
    src: &'a str,
    pos: usize,
    base_line: usize,
}

impl<'a> BlockParser<'a> {
    fn new(src: &'a str, base_line: usize) -> Self {
        Self {
            src,
            pos: 0,
            base_line,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn line(&self) -> usize {
        self.base_line + line_of(self.src, self.pos)
    }

    /// Parse a nested fragment that starts at byte `offset` of this source.
    fn fragment(&self, body: &str, offset: usize) -> Vec<Block> {
        BlockParser::new(body, self.base_line + line_of(self.src, offset)).parse_blocks()
    }

    fn parse_blocks(&mut self) -> Vec<Block> {
        let mut blocks = vec![];
        loop {
            let trimmed = self.rest().trim_start();
            self.pos = self.src.len() - trimmed.len();
            if trimmed.is_empty() {
                break;
            }
            self.parse_block(&mut blocks);
        }
        blocks
    }

    fn parse_block(&mut self, blocks: &mut Vec<Block>) {
        let line = self.line();
        let rest = self.rest();

        if starts_with_tag(rest) {
            let end = paragraph_end(rest);
            blocks.push(Block::Html {
                raw: rest[..end].trim_end().to_string(),
                line,
            });
            self.pos += end;
            return;
        }

        if let Some(after) = rest.strip_prefix("\\begin{") {
            if let Some(close) = after.find('}') {
                let name = &after[..close];
                self.pos += "\\begin{".len() + close + 1;
                self.parse_environment(name, line, blocks);
                return;
            }
        }

        if let Some(after) = rest.strip_prefix("\\end{") {
            // Stray end of an environment we treated as transparent.
            self.pos += "\\end{".len() + after.find('}').map_or(after.len(), |i| i + 1);
            return;
        }

        if rest.starts_with("$$") {
            let body = &rest[2..];
            let end = body.find("$$").unwrap_or(body.len());
            blocks.push(Block::DisplayMath {
                source: clean_math(&body[..end]),
                line,
            });
            self.pos += 2 + (end + 2).min(body.len());
            return;
        }

        if rest.starts_with("\\[") {
            let body = &rest[2..];
            let end = body.find("\\]").unwrap_or(body.len());
            blocks.push(Block::DisplayMath {
                source: clean_math(&body[..end]),
                line,
            });
            self.pos += 2 + (end + 2).min(body.len());
            return;
        }

        if let Some((name, starred, after)) = command_at(rest) {
            let level = match name {
                "section" => Some(1),
                "subsection" => Some(2),
                "subsubsection" => Some(3),
                _ => None,
            };
            if let Some(level) = level {
                let after = skip_optional(after);
                let (title, after) = take_braced(after).unwrap_or(("", after));
                blocks.push(Block::Heading {
                    level,
                    starred,
                    title: parse_inline(title),
                    line,
                });
                self.pos = self.src.len() - after.len();
                return;
            }

            if name == "vspace" {
                let (length, after) = take_braced(after).unwrap_or(("", after));
                self.pos = self.src.len() - after.len();
                if rest_of_line_blank(after) {
                    blocks.push(Block::VSpace {
                        length: Length::parse(length),
                        line,
                    });
                }
                return;
            }

            if name == "caption" {
                let (caption, after) = take_braced(skip_optional(after)).unwrap_or(("", after));
                blocks.push(Block::Paragraph {
                    content: vec![Inline::Styled {
                        style: Style::Emph,
                        children: parse_inline(caption),
                    }],
                    line,
                });
                self.pos = self.src.len() - after.len();
                return;
            }

            if let Some((_, arity)) = PREAMBLE_COMMANDS.iter().find(|(n, _)| *n == name) {
                let mut after = skip_optional(after);
                for _ in 0..*arity {
                    after = match take_braced(after) {
                        Some((_, next)) => skip_optional(next),
                        None => after,
                    };
                }
                self.pos = self.src.len() - after.len();
                return;
            }
        }

        let end = self.paragraph_extent();
        let content = parse_inline(rest[..end].trim());
        if !is_blank(&content) {
            blocks.push(Block::Paragraph { content, line });
        }
        self.pos += end.max(1).min(rest.len());
    }

    fn parse_environment(&mut self, name: &str, line: usize, blocks: &mut Vec<Block>) {
        // Skip `[placement]` and content-free mandatory arguments.
        let mut after = skip_optional(self.rest());
        let arity = ENV_ARGUMENTS
            .iter()
            .find(|(n, _)| *n == name)
            .map_or(0, |(_, arity)| *arity);
        for _ in 0..arity {
            if let Some((_, next)) = take_braced(after.trim_start()) {
                after = next;
            }
        }
        self.pos = self.src.len() - after.len();

        let body_start = self.pos;
        let (body_end, resume) = find_env_end(self.src, body_start, name);
        let body = &self.src[body_start..body_end];
        self.pos = resume;

        match name {
            "center" => blocks.push(Block::Center {
                blocks: self.fragment(body, body_start),
                line,
            }),
            "abstract" => {
                blocks.push(Block::Heading {
                    level: 1,
                    starred: true,
                    title: vec![Inline::Text("Abstract".to_string())],
                    line,
                });
                blocks.extend(self.fragment(body, body_start));
            }
            _ if LIST_ENVS.contains(&name) => blocks.push(Block::List {
                ordered: name == "enumerate",
                items: split_items(body)
                    .into_iter()
                    .map(|(offset, item)| self.fragment(item, body_start + offset))
                    .collect(),
                line,
            }),
            _ if TABLE_ENVS.contains(&name) => {
                let rows = parse_table(body);
                if !rows.is_empty() {
                    blocks.push(Block::Table { rows, line });
                }
            }
            _ if VERBATIM_ENVS.contains(&name) => blocks.push(Block::Verbatim {
                text: body.trim_start_matches('\n').trim_end().to_string(),
                line,
            }),
            _ if MATH_ENVS.contains(&name) => {
                let source = clean_math(body);
                let source = if name.starts_with("align") || name.starts_with("flalign") || name.starts_with("eqnarray") {
                    format!("\\begin{{aligned}}{}\\end{{aligned}}", source)
                } else if name.starts_with("gather") || name.starts_with("multline") {
                    format!("\\begin{{gathered}}{}\\end{{gathered}}", source)
                } else {
                    source
                };
                blocks.push(Block::DisplayMath { source, line });
            }
            _ => blocks.extend(self.fragment(body, body_start)),
        }
    }

    /// Byte length of the paragraph at the cursor: up to a blank line or the
    /// start of a block-level construct.
    fn paragraph_extent(&self) -> usize {
        let rest = self.rest();
        let mut offset = 0;
        for (index, line) in rest.split_inclusive('\n').enumerate() {
            let trimmed = line.trim_start();
            if index > 0 && (trimmed.is_empty() || opens_block(trimmed)) {
                return offset;
            }
            let lead = line.len() - trimmed.len();
            let skip = match index {
                0 => trimmed.chars().next().map_or(0, char::len_utf8),
                _ => 0,
            };
            if let Some(inner) = block_env_in_line(&trimmed[skip..]) {
                return offset + lead + skip + inner;
            }
            offset += line.len();
        }
        offset
    }
}

fn is_blank(content: &[Inline]) -> bool {
    content.iter().all(|inline| match inline {
        Inline::Text(text) => text.trim().is_empty(),
        Inline::Group(children) => is_blank(children),
        _ => false,
    })
}

fn starts_with_tag(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!')
}

/// Byte offset of the first blank line in `text`, or its length.
fn paragraph_end(text: &str) -> usize {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if offset > 0 && line.trim().is_empty() {
            return offset;
        }
        offset += line.len();
    }
    offset
}

fn opens_block(line: &str) -> bool {
    line.starts_with("$$")
        || line.starts_with("\\[")
        || line.starts_with("\\end{")
        || starts_with_block_env(line)
        || command_at(line).is_some_and(|(name, _, _)| {
            matches!(name, "section" | "subsection" | "subsubsection" | "vspace" | "caption")
        })
}

fn starts_with_block_env(text: &str) -> bool {
    text.strip_prefix("\\begin{")
        .and_then(|after| after.find('}').map(|close| &after[..close]))
        .is_some_and(is_block_env)
}

fn is_block_env(name: &str) -> bool {
    !matches!(name, "math" | "small" | "footnotesize" | "scriptsize" | "large" | "Large" | "bf")
}

/// Offset of a block-level `\begin{...}` that appears later in a line.
fn block_env_in_line(line: &str) -> Option<usize> {
    line.match_indices("\\begin{")
        .map(|(index, _)| index)
        .find(|index| starts_with_block_env(&line[*index..]))
}

fn rest_of_line_blank(text: &str) -> bool {
    text.split('\n').next().map_or(true, |line| line.trim().is_empty())
}

/// `\name*` at the start of `text`: returns the name, the star and the rest.
fn command_at(text: &str) -> Option<(&str, bool, &str)> {
    let after = text.strip_prefix('\\')?;
    let len = after
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(after.len());
    if len == 0 {
        return None;
    }
    let (name, rest) = after.split_at(len);
    match rest.strip_prefix('*') {
        Some(rest) => Some((name, true, rest)),
        None => Some((name, false, rest)),
    }
}

fn skip_optional(text: &str) -> &str {
    let trimmed = text.trim_start_matches([' ', '\t']);
    if let Some(after) = trimmed.strip_prefix('[') {
        if let Some(close) = after.find(']') {
            return &after[close + 1..];
        }
    }
    text
}

/// Split `{inner}rest` with brace matching. Leading spaces are skipped.
pub(crate) fn take_braced(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start_matches([' ', '\t']);
    let after = text.strip_prefix('{')?;
    let mut depth = 1;
    let mut escaped = false;
    for (index, c) in after.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&after[..index], &after[index + 1..]));
                }
            }
            _ => {}
        }
    }
    Some((after, ""))
}

/// Find the `\end{name}` matching an environment whose body starts at
/// `start`. Returns the body end and the offset after the closing command.
/// An unclosed environment runs to the end of the source.
fn find_env_end(src: &str, start: usize, name: &str) -> (usize, usize) {
    let open = format!("\\begin{{{}}}", name);
    let close = format!("\\end{{{}}}", name);
    let mut depth = 1;
    let mut pos = start;
    while pos < src.len() {
        let rest = &src[pos..];
        let next_open = rest.find(&open);
        let next_close = rest.find(&close);
        match (next_open, next_close) {
            (Some(o), Some(c)) if o < c => {
                depth += 1;
                pos += o + open.len();
            }
            (_, Some(c)) => {
                depth -= 1;
                if depth == 0 {
                    return (pos + c, pos + c + close.len());
                }
                pos += c + close.len();
            }
            (_, None) => break,
        }
    }
    (src.len(), src.len())
}

/// Split a list body at its top-level `\item`s, returning each item's text
/// with its byte offset in `body`. Text before the first item is dropped.
fn split_items(body: &str) -> Vec<(usize, &str)> {
    let mut starts = vec![];
    let mut depth = 0usize;
    let mut index = 0;
    while index < body.len() {
        let rest = &body[index..];
        if let Some(after) = rest.strip_prefix("\\begin{") {
            if LIST_ENVS.iter().any(|env| after.starts_with(&format!("{}}}", env))) {
                depth += 1;
            }
        } else if let Some(after) = rest.strip_prefix("\\end{") {
            if LIST_ENVS.iter().any(|env| after.starts_with(&format!("{}}}", env))) {
                depth = depth.saturating_sub(1);
            }
        } else if depth == 0 && rest.starts_with("\\item") {
            let next = rest["\\item".len()..].chars().next();
            if !next.is_some_and(|c| c.is_ascii_alphabetic()) {
                starts.push(index);
            }
        }
        index += rest.chars().next().map_or(1, char::len_utf8);
    }

    let mut items = vec![];
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(body.len());
        let item = &body[start + "\\item".len()..end];
        let item = skip_optional(item);
        let offset = end - item.len();
        items.push((offset, item));
    }
    items
}

fn parse_table(body: &str) -> Vec<Vec<Vec<Inline>>> {
    split_top_level(body, "\\\\")
        .into_iter()
        .map(strip_rules)
        .filter(|row| !row.trim().is_empty())
        .map(|row| {
            split_top_level(&row, "&")
                .into_iter()
                .map(|cell| parse_inline(cell.trim()))
                .collect()
        })
        .collect()
}

fn strip_rules(row: &str) -> String {
    let mut out = row.to_string();
    for rule in ["\\hline", "\\toprule", "\\midrule", "\\bottomrule"] {
        out = out.replace(rule, "");
    }
    for rule in ["\\cline", "\\cmidrule"] {
        while let Some(index) = out.find(rule) {
            let after = &out[index + rule.len()..];
            let after = match after.strip_prefix('(') {
                Some(paren) => paren.find(')').map_or(paren, |close| &paren[close + 1..]),
                None => after,
            };
            let after = take_braced(after).map_or(after, |(_, rest)| rest);
            out = format!("{}{}", &out[..index], after);
        }
    }
    out
}

/// Split on `separator` outside braces, skipping escaped characters.
fn split_top_level<'s>(text: &'s str, separator: &str) -> Vec<&'s str> {
    let mut parts = vec![];
    let mut depth = 0usize;
    let mut start = 0;
    let mut index = 0;
    let bytes = text.as_bytes();
    while index < text.len() {
        let rest = &text[index..];
        if depth == 0 && rest.starts_with(separator) {
            parts.push(&text[start..index]);
            index += separator.len();
            start = index;
            continue;
        }
        match bytes[index] {
            b'\\' => {
                index += 1 + rest[1..].chars().next().map_or(0, char::len_utf8);
                continue;
            }
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        index += rest.chars().next().map_or(1, char::len_utf8);
    }
    parts.push(&text[start..]);
    parts
}

fn clean_math(source: &str) -> String {
    let mut out = source.to_string();
    for tag in ["\\nonumber", "\\notag"] {
        out = out.replace(tag, "");
    }
    while let Some(index) = out.find("\\label{") {
        let after = &out[index + "\\label".len()..];
        let after = take_braced(after).map_or("", |(_, rest)| rest);
        out = format!("{}{}", &out[..index], after);
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latex::Size;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_sections_and_paragraphs() {
        let blocks = parse("\\section{Intro}\nHello\nworld.\n\nSecond.\n\\subsection*{Notes}\nEnd");
        assert_eq!(
            blocks,
            vec![
                Block::Heading { level: 1, starred: false, title: vec![text("Intro")], line: 0 },
                Block::Paragraph { content: vec![text("Hello world.")], line: 1 },
                Block::Paragraph { content: vec![text("Second.")], line: 4 },
                Block::Heading { level: 2, starred: true, title: vec![text("Notes")], line: 5 },
                Block::Paragraph { content: vec![text("End")], line: 6 },
            ]
        );
    }

    #[test]
    fn test_center_header() {
        let src = "\\begin{center}\n{\\Large \\textbf{Title}}\\\\[0.5em]\nAlice$^{1}$\n\\end{center}\n\\vspace{0.5cm}\n";
        let blocks = parse(src);
        assert_eq!(blocks.len(), 2);
        let Block::Center { blocks: inner, line: 0 } = &blocks[0] else {
            panic!("expected center block, got {:?}", blocks[0]);
        };
        let Block::Paragraph { content, line: 1 } = &inner[0] else {
            panic!("expected paragraph");
        };
        assert!(crate::latex::has_size_at_least(content, Size::Large));
        assert!(crate::latex::has_superscript_marker(content));
        assert_eq!(
            blocks[1],
            Block::VSpace { length: Length::parse("0.5cm"), line: 4 }
        );
    }

    #[test]
    fn test_display_math() {
        let blocks = parse("Before\n$$\nE = mc^2\n$$\n\\begin{align}\na &= b \\label{eq:1}\\\\\nc &= d\n\\end{align}\n\\[ x \\]");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph { content: vec![text("Before")], line: 0 },
                Block::DisplayMath { source: "E = mc^2".into(), line: 1 },
                Block::DisplayMath {
                    source: "\\begin{aligned}a &= b \\\\\nc &= d\\end{aligned}".into(),
                    line: 4,
                },
                Block::DisplayMath { source: "x".into(), line: 8 },
            ]
        );
    }

    #[test]
    fn test_nested_lists() {
        let src = "\\begin{itemize}\n\\item One\n\\item Two\n  \\begin{enumerate}\n  \\item A\n  \\end{enumerate}\n\\end{itemize}";
        let blocks = parse(src);
        let Block::List { ordered: false, items, .. } = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], vec![Block::Paragraph { content: vec![text("One")], line: 1 }]);
        assert_eq!(items[1].len(), 2);
        assert!(matches!(&items[1][1], Block::List { ordered: true, items, .. } if items.len() == 1));
    }

    #[test]
    fn test_table() {
        let src = "\\begin{table}[h]\n\\centering\n\\begin{tabular}{lcc}\n\\toprule\nModel & Acc & F1 \\\\\n\\midrule\nOurs & \\textbf{91.2} & 0.9 \\\\\n\\bottomrule\n\\end{tabular}\n\\caption{Results}\n\\label{tab:r}\n\\end{table}";
        let blocks = parse(src);
        assert_eq!(blocks.len(), 2);
        let Block::Table { rows, .. } = &blocks[0] else {
            panic!("expected table, got {:?}", blocks[0]);
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec![vec![text("Model")], vec![text("Acc")], vec![text("F1")]]);
        assert_eq!(
            rows[1][1],
            vec![Inline::Styled { style: Style::Bold, children: vec![text("91.2")] }]
        );
        assert!(matches!(&blocks[1], Block::Paragraph { content, .. }
            if matches!(&content[0], Inline::Styled { style: Style::Emph, .. })));
    }

    #[test]
    fn test_abstract_and_unknown_env() {
        let blocks = parse("\\begin{abstract}\nWe study.\n\\end{abstract}\n\\begin{quote}\nQuoted\n\\end{quote}");
        assert_eq!(
            blocks,
            vec![
                Block::Heading { level: 1, starred: true, title: vec![text("Abstract")], line: 0 },
                Block::Paragraph { content: vec![text("We study.")], line: 1 },
                Block::Paragraph { content: vec![text("Quoted")], line: 4 },
            ]
        );
    }

    #[test]
    fn test_html_chunks_pass_through() {
        let blocks = parse("<h2 class=\"x\">1 Intro</h2>\n\n<p>Text</p>");
        assert_eq!(
            blocks,
            vec![
                Block::Html { raw: "<h2 class=\"x\">1 Intro</h2>".into(), line: 0 },
                Block::Html { raw: "<p>Text</p>".into(), line: 2 },
            ]
        );
    }

    #[test]
    fn test_preamble_is_ignored() {
        let blocks = parse("\\documentclass[11pt]{article}\n\\usepackage{amsmath}\n\\begin{document}\n\\maketitle\nBody\n\\end{document}");
        assert_eq!(blocks, vec![Block::Paragraph { content: vec![text("Body")], line: 4 }]);
    }

    #[test]
    fn test_verbatim() {
        let blocks = parse("\\begin{verbatim}\nrate = 0.5  % fifty percent\n\n  y\n\\end{verbatim} % done\nz");
        assert_eq!(
            blocks,
            vec![
                Block::Verbatim { text: "rate = 0.5  % fifty percent\n\n  y".into(), line: 0 },
                Block::Paragraph { content: vec![text("z")], line: 5 },
            ]
        );
    }

    #[test]
    fn test_malformed_does_not_panic() {
        for src in [
            "\\begin{itemize}\n\\item a",
            "\\section{",
            "$$ x",
            "\\begin{",
            "\\end{center}",
            "\\vspace",
            "\\begin{tabular}{",
            "\\[",
            "é\\begin{center}ü",
            "\\Large",
        ] {
            let _ = parse(src);
        }
    }
}
