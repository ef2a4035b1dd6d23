// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

//! LaTeX body to an HTML fragment.
//!
//! Every block renders to one chunk that begins with a tag and contains no
//! blank line, and chunks are separated by a blank line. A second pass over
//! the output therefore sees only pass-through chunks, which makes the
//! transformation idempotent.

use std::sync::LazyLock;

use itertools::Itertools;
use regex_lite::Regex;
use url::Url;

use crate::{
    counter::SectionCounter,
    html_flake::{self, escape_text},
    latex::{self, document, Block, Inline, Size, Style},
    math::{self, FidelityTier, MathRenderer},
};

static EXPLICIT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+(\.\d+)*\.?\s").unwrap());

const SPECIAL_HEADINGS: &[&str] = &[
    "abstract",
    "acknowledgments",
    "acknowledgements",
    "acknowledgment",
    "references",
];

#[derive(Debug, Clone)]
pub struct PreviewOptions {
    pub tier: FidelityTier,
    pub vspace_px_per_cm: f32,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            tier: FidelityTier::default(),
            vspace_px_per_cm: 16.0,
        }
    }
}

/// Render a paper body to an HTML fragment.
/// A complete document is rendered from its `document` environment.
pub fn render_preview(src: &str, options: &PreviewOptions) -> String {
    let src = document::unwrap_document(src).unwrap_or(src);
    let blocks = latex::parse(src);
    let math = math::renderer(options.tier);
    let mut writer = PreviewWriter {
        counter: SectionCounter::init(),
        math: math.as_ref(),
        options,
    };
    blocks
        .iter()
        .map(|block| writer.block(block))
        .filter(|html| !html.is_empty())
        .join("\n\n")
}

struct PreviewWriter<'a> {
    counter: SectionCounter,
    math: &'a dyn MathRenderer,
    options: &'a PreviewOptions,
}

impl PreviewWriter<'_> {
    fn block(&mut self, block: &Block) -> String {
        match block {
            Block::Heading {
                level,
                starred,
                title,
                ..
            } => self.heading(*level, *starred, title),
            Block::Paragraph { content, .. } => {
                format!("<p>{}</p>", self.inlines(content))
            }
            Block::DisplayMath { source, .. } => {
                html_flake::html_math(&self.math_markup(source, true), true, true)
            }
            Block::Center { blocks, .. } => self.center(blocks),
            Block::VSpace { length, .. } => {
                html_flake::html_vspace((length.as_cm() * self.options.vspace_px_per_cm).max(0.0))
            }
            Block::List { ordered, items, .. } => {
                let items = items.iter().map(|item| self.list_item(item)).collect_vec();
                html_flake::html_list(*ordered, &items)
            }
            Block::Table { rows, .. } => {
                let rows = rows
                    .iter()
                    .map(|row| row.iter().map(|cell| self.inlines(cell)).collect_vec())
                    .collect_vec();
                html_flake::html_table(&rows)
            }
            Block::Verbatim { text, .. } => html_flake::html_verbatim(text),
            Block::Html { raw, .. } => raw.clone(),
        }
    }

    fn heading(&mut self, level: usize, starred: bool, title: &[Inline]) -> String {
        let plain = latex::plain_text(title, &|source, _| source.to_string());
        let title_html = self.inlines(title);

        if starred {
            let class_name = match SPECIAL_HEADINGS.contains(&plain.trim().to_lowercase().as_str()) {
                true => "section-heading special",
                false => "section-heading unnumbered",
            };
            return html_flake::html_heading(level, class_name, None, &title_html);
        }

        // An explicit number in the title wins, but the counter still advances.
        self.counter.step_mut(level);
        let number = self.counter.display(level);
        let number = (!EXPLICIT_NUMBER.is_match(&plain)).then_some(number.as_str());
        html_flake::html_heading(level, "section-heading", number, &title_html)
    }

    fn center(&mut self, blocks: &[Block]) -> String {
        let is_header = blocks.iter().any(|block| match block {
            Block::Paragraph { content, .. } => {
                latex::has_size_at_least(content, Size::Large) || latex::has_superscript_marker(content)
            }
            _ => false,
        });

        if !is_header {
            let inner = blocks.iter().map(|block| self.block(block)).join("\n");
            return html_flake::html_center(&inner);
        }

        let mut lines = vec![];
        for block in blocks {
            match block {
                Block::Paragraph { content, .. } => {
                    for line in latex::split_lines(content) {
                        let inner = self.inlines(&line);
                        match latex::has_size_at_least(&line, Size::Large) {
                            true => lines.push(html_flake::html_paper_title(&inner)),
                            false => lines.push(html_flake::html_paper_meta(&inner)),
                        }
                    }
                }
                other => lines.push(self.block(other)),
            }
        }
        html_flake::html_header(&lines.join("\n"))
    }

    fn list_item(&mut self, item: &[Block]) -> String {
        match item {
            [Block::Paragraph { content, .. }] => self.inlines(content),
            _ => item.iter().map(|block| self.block(block)).join("\n"),
        }
    }

    fn inlines(&mut self, inlines: &[Inline]) -> String {
        inlines.iter().map(|inline| self.inline(inline)).collect()
    }

    fn inline(&mut self, inline: &Inline) -> String {
        match inline {
            Inline::Text(text) => escape_text(text),
            Inline::Math { source, display } => {
                html_flake::html_math(&self.math_markup(source, *display), *display, false)
            }
            Inline::Styled { style, children } => {
                let inner = self.inlines(children);
                match style {
                    Style::Bold => format!("<strong>{}</strong>", inner),
                    Style::Italic | Style::Emph => format!("<em>{}</em>", inner),
                    Style::Underline => format!("<u>{}</u>", inner),
                    Style::Mono => format!("<code>{}</code>", inner),
                    Style::SmallCaps => format!(r#"<span class="smallcaps">{}</span>"#, inner),
                }
            }
            Inline::Sized { size, children } => {
                format!(r#"<span class="{}">{}</span>"#, size.class_name(), self.inlines(children))
            }
            Inline::Group(children) => self.inlines(children),
            Inline::Citation(label) => html_flake::html_citation(label),
            Inline::Link { url, children } => {
                let inner = self.inlines(children);
                match safe_href(url) {
                    Some(href) => html_flake::html_link(&href, &inner),
                    None => inner,
                }
            }
            Inline::LineBreak => "<br>".to_string(),
        }
    }

    /// Math markup kept on one line, so a blank line in the source never
    /// splits its chunk.
    fn math_markup(&self, source: &str, display: bool) -> String {
        let markup = math::render_or_fallback(self.math, source, display);
        markup.replace('%', "&#37;").replace('\n', "&#10;")
    }
}

/// Only absolute `http`, `https` and `mailto` URLs become links.
fn safe_href(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    matches!(parsed.scheme(), "http" | "https" | "mailto").then(|| parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unicode() -> PreviewOptions {
        PreviewOptions {
            tier: FidelityTier::Unicode,
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_document() {
        let doc = "\\documentclass{article}\n\\usepackage{amsmath}\n\\begin{document}\n\\section{Intro}\nHi.\n\\end{document}\n";
        assert_eq!(render_preview(doc, &unicode()), render_preview("\\section{Intro}\nHi.", &unicode()));
    }

    #[test]
    fn test_section_numbering() {
        let src = "\\section{Intro}\n\\section{Method}\n\\subsection{Data}\n\\subsection{Model}\n\\section{Results}";
        let html = render_preview(src, &unicode());
        let numbers: Vec<_> = html
            .match_indices(r#"<span class="section-number">"#)
            .map(|(i, m)| {
                let rest = &html[i + m.len()..];
                rest[..rest.find('<').unwrap()].to_string()
            })
            .collect();
        assert_eq!(numbers, vec!["1", "2", "2.1", "2.2", "3"]);
        assert!(html.contains("<h3 class=\"section-heading\">"));
    }

    #[test]
    fn test_explicit_number_and_starred() {
        let html = render_preview(
            "\\section*{Abstract}\nText.\n\\section{1 Introduction}\n\\section{Related}",
            &unicode(),
        );
        assert!(html.contains(r#"<h2 class="section-heading special">Abstract</h2>"#));
        assert!(html.contains(r#"<h2 class="section-heading">1 Introduction</h2>"#));
        assert!(html.contains(r#"<span class="section-number">2</span> Related"#));
    }

    #[test]
    fn test_header_and_vspace() {
        let src = "\\begin{center}\n{\\Large \\textbf{Deep Nets}}\\\\\nAda Lovelace$^{1}$\n\\end{center}\n\\vspace{0.5cm}\n";
        let html = render_preview(src, &unicode());
        assert_eq!(
            html,
            "<header class=\"paper-header\">\n\
             <h1 class=\"paper-title\"><span class=\"size-xlarge\"><strong>Deep Nets</strong></span></h1>\n\
             <p class=\"paper-meta\">Ada Lovelace<span class=\"math math-inline\">^(1)</span></p>\n\
             </header>\n\n\
             <div class=\"vspace\" style=\"height: 8px\"></div>"
        );
    }

    #[test]
    fn test_plain_center() {
        let html = render_preview("\\begin{center}\nsmall note\n\\end{center}", &unicode());
        assert_eq!(html, "<div class=\"center\">\n<p>small note</p>\n</div>");
    }

    #[test]
    fn test_math_containers() {
        let html = render_preview("Let $\\alpha$ be.\n\n$$\\sum_i x_i$$", &unicode());
        assert_eq!(
            html,
            "<p>Let <span class=\"math math-inline\">α</span> be.</p>\n\n\
             <div class=\"math math-display\">∑_i x_i</div>"
        );
    }

    #[test]
    fn test_escaping() {
        let html = render_preview(r"Costs 50\% and \$3 {braces}", &unicode());
        assert_eq!(html, "<p>Costs 50&#37; and &#36;3 braces</p>");
    }

    #[test]
    fn test_idempotent() {
        let fixtures = [
            "\\begin{center}\n{\\Large \\textbf{T}}\\\\ A$^{1}$\n\\end{center}\n\\vspace{1cm}\n\\section{Intro}\nWe use $x_{1}$ and 50\\% of \\textbf{data}~\\cite{a}.\n\n\\begin{itemize}\n\\item one\n\\item two\n\\end{itemize}\n\n\\begin{verbatim}\na\n\nb\n\\end{verbatim}\n\\begin{tabular}{ll}\nA & B \\\\\n1 & 2\n\\end{tabular}",
            "\\[\na\n\nb\n\\]",
            "\\begin{equation}\nx = 1\n\n\\label{eq:x}\n\\end{equation}",
            "We have $$x^2 + y^2$$ inside a paragraph.",
            "\\[\nx < y \\& z\n\\]\n\nIf $a<b$ and $c&d$ then.",
            "\\begin{verbatim}\nrate = 0.5  % fifty percent\n\\end{verbatim}",
            "<p class=\"note\">Already <em>rendered</em> &amp; kept.</p>\n\n\\section{Next}\nText with 5\\% and $\\alpha$.",
        ];
        for src in fixtures {
            for tier in [FidelityTier::Unicode, FidelityTier::Verbatim, FidelityTier::Typeset] {
                let options = PreviewOptions { tier, ..Default::default() };
                let once = render_preview(src, &options);
                let twice = render_preview(&once, &options);
                assert_eq!(once, twice, "{:?} under {:?}", src, tier);
            }
        }
    }

    #[test]
    fn test_blank_line_in_display_math() {
        let options = PreviewOptions {
            tier: FidelityTier::Verbatim,
            ..Default::default()
        };
        assert_eq!(
            render_preview("\\[\na\n\nb\n\\]", &options),
            "<div class=\"math math-display\">a&#10;&#10;b</div>"
        );
    }

    #[test]
    fn test_verbatim_keeps_comments() {
        let html = render_preview("\\begin{verbatim}\nrate = 0.5  % fifty percent\n\\end{verbatim}", &unicode());
        assert_eq!(html, "<pre class=\"verbatim\">rate = 0.5  &#37; fifty percent</pre>");
    }

    #[test]
    fn test_malformed_input() {
        let html = render_preview("\\Large\n\nprice $5", &unicode());
        assert_eq!(html, "<p><span class=\"size-xlarge\"></span></p>\n\n<p>price &#36;5</p>");
    }

    #[test]
    fn test_links() {
        let html = render_preview(r"\href{https://example.org}{site} \href{javascript:alert(1)}{bad}", &unicode());
        assert_eq!(
            html,
            "<p><a href=\"https://example.org/\" target=\"_blank\" rel=\"noopener\">site</a> bad</p>"
        );
    }

    #[test]
    fn test_typeset_fallback_on_error() {
        let options = PreviewOptions::default();
        let html = render_preview(r"bad $\frac{a$ here", &options);
        assert!(html.contains(r#"<span class="math math-inline">\frac{a</span>"#));
    }
}
