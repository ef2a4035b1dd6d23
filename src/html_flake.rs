// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use crate::html;

/// Escape text so that a later pass over the markup cannot read it as LaTeX:
/// besides `& < >`, the characters `% $ { } \` become numeric entities.
pub fn escape_text(text: &str) -> String {
    let escaped = htmlize::escape_text(text);
    let mut out = String::with_capacity(escaped.len());
    for c in escaped.chars() {
        match c {
            '%' => out.push_str("&#37;"),
            '$' => out.push_str("&#36;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            '\\' => out.push_str("&#92;"),
            c => out.push(c),
        }
    }
    out
}

pub fn html_heading(level: usize, class_name: &str, number: Option<&str>, title: &str) -> String {
    let number = number
        .map(|n| html!(span class = "section-number" => {n}) + " ")
        .unwrap_or_default();
    match level {
        1 => html!(h2 class = {class_name} => {number} {title}),
        2 => html!(h3 class = {class_name} => {number} {title}),
        _ => html!(h4 class = {class_name} => {number} {title}),
    }
}

pub fn html_math(markup: &str, display: bool, block: bool) -> String {
    match (display, block) {
        (true, true) => html!(div class = "math math-display" => {markup}),
        (true, false) => html!(span class = "math math-display" => {markup}),
        (false, _) => html!(span class = "math math-inline" => {markup}),
    }
}

pub fn html_vspace(px: f32) -> String {
    html!(div class = "vspace", style = format!("height: {}px", px) => )
}

pub fn html_paper_title(inner: &str) -> String {
    html!(h1 class = "paper-title" => {inner})
}

pub fn html_paper_meta(inner: &str) -> String {
    html!(p class = "paper-meta" => {inner})
}

pub fn html_header(inner: &str) -> String {
    html!(header class = "paper-header" => "\n" {inner} "\n")
}

pub fn html_center(inner: &str) -> String {
    html!(div class = "center" => "\n" {inner} "\n")
}

pub fn html_list(ordered: bool, items: &[String]) -> String {
    let items: String = items.iter().map(|item| html!(li => {item})).collect();
    match ordered {
        true => html!(ol => {items}),
        false => html!(ul => {items}),
    }
}

pub fn html_table(rows: &[Vec<String>]) -> String {
    let Some((header, body)) = rows.split_first() else {
        return String::new();
    };
    let header: String = header.iter().map(|cell| html!(th => {cell})).collect();
    let body: String = body
        .iter()
        .map(|row| {
            let cells: String = row.iter().map(|cell| html!(td => {cell})).collect();
            html!(tr => {cells})
        })
        .collect();
    html!(table class = "paper-table" =>
      (html!(thead => (html!(tr => {header}))))
      (html!(tbody => {body})))
}

pub fn html_verbatim(text: &str) -> String {
    html!(pre class = "verbatim" => (escape_text(text).replace('\n', "&#10;")))
}

pub fn html_citation(label: &str) -> String {
    html!(sup class = "citation" => "[" (escape_text(label)) "]")
}

pub fn html_link(href: &str, inner: &str) -> String {
    html!(a href = {href}, target = "_blank", rel = "noopener" => {inner})
}

/// A standalone page around a rendered fragment.
pub fn html_doc(title: &str, body: &str) -> String {
    html_page(title, &html_paper(body))
}

/// The paper next to its experiment code. `split` is the width of the paper
/// pane in percent.
pub fn html_split_doc(title: &str, paper: &str, code: &str, split: u8, code_first: bool) -> String {
    let paper = html!(section class = "pane pane-paper", style = format!("flex: 0 0 {}%", split) =>
        (html_paper(paper)));
    let code = html!(section class = "pane pane-code" =>
        (html!(pre class = "code" => (html!(code class = "language-python" => (escape_text(code)))))));
    let panes = match code_first {
        true => code + &paper,
        false => paper + &code,
    };
    html_page(title, &html!(main class = "workspace" => {panes}))
}

fn html_paper(body: &str) -> String {
    html!(article class = "paper" => "\n" {body} "\n")
}

fn html_page(title: &str, body: &str) -> String {
    let doc_type = "<!DOCTYPE html>";
    let html = html!(html lang = "en-US" =>
      (html!(head => r#"
<meta http-equiv="Content-Type" content="text/html; charset=utf-8">
<meta name="viewport" content="width=device-width">
"#
        (html!(title => (escape_text(title))))
        (html_css())))
      (html!(body => {body})));
    format!("{}\n{}", doc_type, &html)
}

pub fn html_css() -> String {
    html!(style => (html_main_style()))
}

pub fn html_main_style() -> &'static str {
    include_str!("include/preview.css")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text(r"50% of {x} costs $5 \o <b>"), "50&#37; of &#123;x&#125; costs &#36;5 &#92;o &lt;b&gt;");
    }

    #[test]
    fn test_heading() {
        assert_eq!(
            html_heading(2, "section-heading", Some("2.1"), "Setup"),
            r#"<h3 class="section-heading"><span class="section-number">2.1</span> Setup</h3>"#
        );
        assert_eq!(html_heading(1, "special", None, "Abstract"), r#"<h2 class="special">Abstract</h2>"#);
    }

    #[test]
    fn test_table() {
        let rows = vec![vec!["A".to_string(), "B".to_string()], vec!["1".to_string(), "2".to_string()]];
        assert_eq!(
            html_table(&rows),
            "<table class=\"paper-table\"><thead><tr><th>A</th><th>B</th></tr></thead><tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
        );
        assert_eq!(html_table(&[]), "");
    }

    #[test]
    fn test_doc_is_complete() {
        let doc = html_doc("T", "<p>x</p>");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>T</title>"));
        assert!(doc.contains("<p>x</p>"));
        assert!(doc.ends_with("</html>"));
    }

    #[test]
    fn test_split_doc() {
        let doc = html_split_doc("T", "<p>paper</p>", "x = {1}", 60, false);
        assert!(doc.contains(r#"<section class="pane pane-paper" style="flex: 0 0 60%">"#));
        assert!(doc.contains("x = &#123;1&#125;"));
        assert!(doc.find(r#"class="pane pane-paper""#).unwrap() < doc.find(r#"class="pane pane-code""#).unwrap());

        let doc = html_split_doc("T", "<p>paper</p>", "x", 50, true);
        assert!(doc.find(r#"class="pane pane-code""#).unwrap() < doc.find(r#"class="pane pane-paper""#).unwrap());
    }
}
