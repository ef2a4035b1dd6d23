// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use super::{Inline, Size, Style};

/// Parse running text into inline nodes. Never fails: unknown commands keep
/// the content of their braced argument and an unmatched `$` stays literal.
pub fn parse_inline(src: &str) -> Vec<Inline> {
    let mut cursor = Cursor::new(src);
    cursor.parse_sequence(None)
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

/// Commands whose arguments are dropped together with the command.
const DISCARD_WITH_ARGUMENT: &[&str] = &[
    "label", "index", "hspace", "vspace", "phantom", "hphantom", "vphantom", "bibliographystyle",
    "bibliography", "nocite", "begin", "end", "setlength", "addtolength", "thispagestyle",
    "pagestyle", "includegraphics",
];

/// Commands without arguments that produce nothing.
const DISCARD: &[&str] = &[
    "noindent", "centering", "raggedright", "raggedleft", "maketitle", "newpage", "clearpage",
    "smallskip", "medskip", "bigskip", "indent", "protect", "relax", "null", "par", "hline",
    "toprule", "midrule", "bottomrule", "tableofcontents", "nonumber", "notag", "item",
];

const CITE: &[&str] = &[
    "cite", "citep", "citet", "citealp", "citealt", "citeauthor", "citeyear", "parencite",
    "textcite", "autocite",
];

impl Cursor {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn skip_spaces(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n')) {
            self.pos += 1;
        }
    }

    /// Read until `stop` at brace depth zero (not consumed) or end of input.
    fn parse_sequence(&mut self, stop: Option<char>) -> Vec<Inline> {
        let mut out: Vec<Inline> = vec![];
        let mut text = String::new();

        while let Some(c) = self.peek() {
            if Some(c) == stop {
                break;
            }
            match c {
                '\\' => {
                    if let Some(inline) = self.parse_command(&mut text, &mut out, stop) {
                        flush(&mut text, &mut out);
                        out.push(inline);
                    }
                }
                '$' => {
                    let display = self.peek_at(1) == Some('$');
                    let width = if display { 2 } else { 1 };
                    match self.find_math_end(self.pos + width, display) {
                        Some(end) => {
                            let source: String = self.chars[self.pos + width..end].iter().collect();
                            flush(&mut text, &mut out);
                            out.push(Inline::Math { source: source.trim().to_string(), display });
                            self.pos = end + width;
                        }
                        None => {
                            text.push('$');
                            self.pos += 1;
                        }
                    }
                }
                '{' => {
                    self.pos += 1;
                    let children = self.parse_sequence(Some('}'));
                    self.eat('}');
                    flush(&mut text, &mut out);
                    if !children.is_empty() {
                        out.push(Inline::Group(children));
                    }
                }
                '}' => self.pos += 1,
                '~' => {
                    text.push('\u{a0}');
                    self.pos += 1;
                }
                '-' if self.starts_with("---") => {
                    text.push('—');
                    self.pos += 3;
                }
                '-' if self.starts_with("--") => {
                    text.push('–');
                    self.pos += 2;
                }
                '`' if self.starts_with("``") => {
                    text.push('“');
                    self.pos += 2;
                }
                '`' => {
                    text.push('‘');
                    self.pos += 1;
                }
                '\'' if self.starts_with("''") => {
                    text.push('”');
                    self.pos += 2;
                }
                '[' => match self.numeric_citation() {
                    Some(label) => {
                        flush(&mut text, &mut out);
                        out.push(Inline::Citation(label));
                    }
                    None => {
                        text.push('[');
                        self.pos += 1;
                    }
                },
                '\n' | '\t' => {
                    text.push(' ');
                    self.pos += 1;
                }
                _ => {
                    text.push(c);
                    self.pos += 1;
                }
            }
        }

        flush(&mut text, &mut out);
        out
    }

    /// Handle the command at the cursor. Commands that swallow the rest of
    /// the group (size and font switches) push into `out` directly.
    fn parse_command(
        &mut self,
        text: &mut String,
        out: &mut Vec<Inline>,
        stop: Option<char>,
    ) -> Option<Inline> {
        self.pos += 1;
        let Some(next) = self.peek() else {
            text.push('\\');
            return None;
        };

        if !next.is_ascii_alphabetic() {
            self.pos += 1;
            match next {
                '\\' => {
                    self.skip_optional();
                    return Some(Inline::LineBreak);
                }
                '%' | '&' | '$' | '#' | '_' | '{' | '}' => text.push(next),
                ' ' | '\n' | ',' | ';' | ':' => text.push(' '),
                '!' | '/' | '-' => {}
                '(' => return Some(self.delimited_math("\\)", false)),
                '[' => return Some(self.delimited_math("\\]", true)),
                _ => text.push(next),
            }
            return None;
        }

        let name = self.read_name();
        if self.peek() == Some('*') {
            self.pos += 1;
        }

        if let Some(size) = Size::from_command(&name) {
            self.skip_spaces();
            flush(text, out);
            let children = self.parse_sequence(stop);
            return Some(Inline::Sized { size, children });
        }

        if let Some(style) = switch_style(&name) {
            self.skip_spaces();
            flush(text, out);
            let children = self.parse_sequence(stop);
            return Some(Inline::Styled { style, children });
        }

        if let Some(style) = command_style(&name) {
            let children = self.braced_inlines();
            return Some(Inline::Styled { style, children });
        }

        if CITE.contains(&name.as_str()) {
            self.skip_optional();
            self.skip_optional();
            let keys = self.braced_raw().unwrap_or_default();
            return Some(Inline::Citation(keys.split(',').map(str::trim).collect::<Vec<_>>().join(", ")));
        }

        if DISCARD_WITH_ARGUMENT.contains(&name.as_str()) {
            self.skip_optional();
            self.braced_raw();
            return None;
        }
        if DISCARD.contains(&name.as_str()) {
            self.skip_optional();
            self.eat_empty_group();
            return None;
        }

        match name.as_str() {
            "url" => {
                let url = self.braced_raw().unwrap_or_default();
                Some(Inline::Link { children: vec![Inline::Text(url.clone())], url })
            }
            "href" => {
                let url = self.braced_raw().unwrap_or_default();
                let children = self.braced_inlines();
                Some(Inline::Link { url, children })
            }
            "newline" | "linebreak" => Some(Inline::LineBreak),
            "footnote" => {
                let mut children = vec![Inline::Text(" (".to_string())];
                children.extend(self.braced_inlines());
                children.push(Inline::Text(")".to_string()));
                Some(Inline::Group(children))
            }
            "paragraph" | "subparagraph" => {
                let children = self.braced_inlines();
                Some(Inline::Group(vec![
                    Inline::Styled { style: Style::Bold, children },
                    Inline::Text(" ".to_string()),
                ]))
            }
            "multicolumn" | "multirow" => {
                self.braced_raw();
                self.skip_optional();
                self.braced_raw();
                Some(Inline::Group(self.braced_inlines()))
            }
            _ => {
                if let Some(symbol) = text_symbol(&name) {
                    self.eat_empty_group();
                    text.push_str(symbol);
                    return None;
                }
                // Unknown command: keep its argument.
                self.skip_optional();
                if self.peek() == Some('{') {
                    let children = self.braced_inlines();
                    return Some(Inline::Group(children));
                }
                None
            }
        }
    }

    fn read_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek().filter(char::is_ascii_alphabetic) {
            name.push(c);
            self.pos += 1;
        }
        name
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_empty_group(&mut self) {
        if self.starts_with("{}") {
            self.pos += 2;
        }
    }

    /// Skip `[...]` directly at the cursor.
    fn skip_optional(&mut self) {
        if self.peek() != Some('[') {
            return;
        }
        if let Some(end) = self.chars[self.pos..].iter().position(|&c| c == ']') {
            self.pos += end + 1;
        }
    }

    /// Raw text of the braced group at the cursor, skipping leading spaces.
    fn braced_raw(&mut self) -> Option<String> {
        let save = self.pos;
        self.skip_spaces();
        if !self.eat('{') {
            self.pos = save;
            return None;
        }
        let start = self.pos;
        let mut depth = 1;
        while let Some(c) = self.peek() {
            match c {
                '\\' => self.pos += 1,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let raw: String = self.chars[start..self.pos].iter().collect();
                        self.pos += 1;
                        return Some(raw);
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        Some(self.chars[start..self.chars.len()].iter().collect())
    }

    fn braced_inlines(&mut self) -> Vec<Inline> {
        let save = self.pos;
        self.skip_spaces();
        if !self.eat('{') {
            self.pos = save;
            return vec![];
        }
        let children = self.parse_sequence(Some('}'));
        self.eat('}');
        children
    }

    fn find_math_end(&self, from: usize, display: bool) -> Option<usize> {
        let mut i = from;
        while i < self.chars.len() {
            match self.chars[i] {
                '\\' => i += 1,
                '$' if !display => return (i > from).then_some(i),
                '$' if self.chars.get(i + 1) == Some(&'$') => return Some(i),
                _ => {}
            }
            i += 1;
        }
        None
    }

    fn delimited_math(&mut self, close: &str, display: bool) -> Inline {
        let start = self.pos;
        while self.pos < self.chars.len() && !self.starts_with(close) {
            self.pos += 1;
        }
        let source: String = self.chars[start..self.pos].iter().collect();
        self.pos = (self.pos + close.chars().count()).min(self.chars.len());
        Inline::Math { source: source.trim().to_string(), display }
    }

    /// `[1]`, `[1, 2]`, `[3-5]` or `[3--5]`.
    fn numeric_citation(&mut self) -> Option<String> {
        let rest = &self.chars[self.pos + 1..];
        let end = rest.iter().position(|&c| c == ']')?;
        let inner: String = rest[..end].iter().collect();
        let valid = !inner.trim().is_empty()
            && inner.chars().next().is_some_and(|c| c.is_ascii_digit())
            && inner
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, ',' | '-' | '–' | ' '));
        if !valid {
            return None;
        }
        self.pos += end + 2;
        Some(inner.replace("--", "–"))
    }
}

fn flush(text: &mut String, out: &mut Vec<Inline>) {
    if !text.is_empty() {
        out.push(Inline::Text(std::mem::take(text)));
    }
}

fn command_style(name: &str) -> Option<Style> {
    Some(match name {
        "textbf" | "mathbf" => Style::Bold,
        "textit" | "textsl" => Style::Italic,
        "emph" => Style::Emph,
        "underline" | "uline" => Style::Underline,
        "texttt" | "code" => Style::Mono,
        "textsc" => Style::SmallCaps,
        "caption" => Style::Emph,
        _ => return None,
    })
}

fn switch_style(name: &str) -> Option<Style> {
    Some(match name {
        "bfseries" | "bf" => Style::Bold,
        "itshape" | "it" | "slshape" | "sl" => Style::Italic,
        "em" => Style::Emph,
        "ttfamily" | "tt" => Style::Mono,
        "scshape" | "sc" => Style::SmallCaps,
        _ => return None,
    })
}

fn text_symbol(name: &str) -> Option<&'static str> {
    Some(match name {
        "ldots" | "dots" | "dotsc" | "textellipsis" => "…",
        "LaTeX" => "LaTeX",
        "TeX" => "TeX",
        "textasciitilde" => "~",
        "textbackslash" => "\\",
        "textbar" => "|",
        "textless" => "<",
        "textgreater" => ">",
        "textendash" => "–",
        "textemdash" => "—",
        "textbullet" => "•",
        "S" => "§",
        "P" => "¶",
        "copyright" => "©",
        "dag" | "dagger" => "†",
        "ddag" => "‡",
        "quad" | "qquad" | "hfill" | "enspace" => " ",
        "today" => "",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_styles() {
        assert_eq!(
            parse_inline(r"a \textbf{b} \emph{c}"),
            vec![
                text("a "),
                Inline::Styled { style: Style::Bold, children: vec![text("b")] },
                text(" "),
                Inline::Styled { style: Style::Emph, children: vec![text("c")] },
            ]
        );
    }

    #[test]
    fn test_escapes_and_ligatures() {
        assert_eq!(
            parse_inline(r"50\% \& \$5 \#1 a\_b ``q'' 1--2 a---b x~y \ldots"),
            vec![text("50% & $5 #1 a_b “q” 1–2 a—b x\u{a0}y …")]
        );
    }

    #[test]
    fn test_math() {
        assert_eq!(
            parse_inline(r"let $x^2$ and $$\sum_i$$"),
            vec![
                text("let "),
                Inline::Math { source: "x^2".into(), display: false },
                text(" and "),
                Inline::Math { source: r"\sum_i".into(), display: true },
            ]
        );
        assert_eq!(
            parse_inline(r"\(a\) \[b\]"),
            vec![
                Inline::Math { source: "a".into(), display: false },
                text(" "),
                Inline::Math { source: "b".into(), display: true },
            ]
        );
    }

    #[test]
    fn test_unmatched_dollar() {
        assert_eq!(parse_inline("costs $5 today"), vec![text("costs $5 today")]);
        assert_eq!(parse_inline("$"), vec![text("$")]);
    }

    #[test]
    fn test_size_switch_scope() {
        assert_eq!(
            parse_inline(r"{\Large Title} after"),
            vec![
                Inline::Group(vec![Inline::Sized { size: Size::XLarge, children: vec![text("Title")] }]),
                text(" after"),
            ]
        );
        assert_eq!(
            parse_inline(r"\Large"),
            vec![Inline::Sized { size: Size::XLarge, children: vec![] }]
        );
    }

    #[test]
    fn test_citations() {
        assert_eq!(
            parse_inline(r"see \citep[p.~3]{vaswani2017, devlin2019} and [1, 2] or [3-5] [x]"),
            vec![
                text("see "),
                Inline::Citation("vaswani2017, devlin2019".into()),
                text(" and "),
                Inline::Citation("1, 2".into()),
                text(" or "),
                Inline::Citation("3-5".into()),
                text(" [x]"),
            ]
        );
    }

    #[test]
    fn test_unknown_command_keeps_argument() {
        assert_eq!(
            parse_inline(r"\textcolor{red}{warm} \foo{bar}"),
            vec![
                Inline::Group(vec![text("red")]),
                Inline::Group(vec![text("warm")]),
                text(" "),
                Inline::Group(vec![text("bar")]),
            ]
        );
    }

    #[test]
    fn test_links_and_breaks() {
        assert_eq!(
            parse_inline(r"\href{https://a.org}{site}\\[2pt]next \label{x}"),
            vec![
                Inline::Link { url: "https://a.org".into(), children: vec![text("site")] },
                Inline::LineBreak,
                text("next "),
            ]
        );
    }

    #[test]
    fn test_malformed_input_does_not_panic() {
        for src in [r"\", r"{", r"}", r"\textbf{", r"\url{a", "[", "[1", r"\\[", r"\cite", "$$x"] {
            let _ = parse_inline(src);
        }
    }
}
