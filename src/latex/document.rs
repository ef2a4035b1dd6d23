// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

//! Turn a bare paper body into a standalone document that compiles with `pdflatex`.

use std::sync::LazyLock;

use regex_lite::Regex;

static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Which surface the document is produced for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flavor {
    /// The downloadable `.tex` file.
    Export,
    /// The text copied for pasting into an online LaTeX editor.
    Clipboard,
}

const PACKAGES: &str = r"\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}
\usepackage{amsmath}
\usepackage{amssymb}
\usepackage{amsfonts}
\usepackage{graphicx}
\usepackage{hyperref}
\usepackage{url}
\usepackage{booktabs}
\usepackage{natbib}";

const LAYOUT: &str = r"\usepackage[margin=1in,top=1in,bottom=1in]{geometry}

% Line spacing
\usepackage{setspace}
\onehalfspacing";

const MACROS: &str = r"\newcommand{\R}{\mathbb{R}}
\newcommand{\E}{\mathbb{E}}
\newcommand{\N}{\mathbb{N}}
\newcommand{\Z}{\mathbb{Z}}
\DeclareMathOperator*{\argmin}{arg\,min}
\DeclareMathOperator*{\argmax}{arg\,max}";

const HYPERSETUP: &str = "    colorlinks=true,
    linkcolor=blue,
    filecolor=magenta,
    urlcolor=cyan,
    citecolor=blue";

impl Flavor {
    fn banner(self) -> &'static str {
        match self {
            Flavor::Export => {
                "% Research paper\n% Generated by paperpress\n% Compile with pdflatex"
            }
            Flavor::Clipboard => {
                "% Research paper\n\
                 % Copy this entire code into Overleaf and compile with pdflatex\n\
                 % This document is ready to compile as-is"
            }
        }
    }

    fn hypersetup(self) -> String {
        match self {
            Flavor::Export => HYPERSETUP.to_string(),
            Flavor::Clipboard => format!(
                "{},\n    pdfauthor={{paperpress}},\n    pdfsubject={{Research Paper}}",
                HYPERSETUP
            ),
        }
    }
}

/// CRLF to LF, trimmed, runs of blank lines collapsed to one.
pub fn normalize(body: &str) -> String {
    let body = body.replace("\r\n", "\n");
    BLANK_RUNS.replace_all(body.trim(), "\n\n").into_owned()
}

/// Wrap `body` in the fixed preamble. A body that already carries a
/// `\documentclass` is only normalized, so wrapping twice is harmless.
pub fn wrap_document(body: &str, flavor: Flavor) -> String {
    let body = normalize(body);
    if body.contains(r"\documentclass") {
        return body;
    }
    format!(
        "{banner}\n\n\
         \\documentclass[11pt]{{article}}\n\n\
         % Packages\n{PACKAGES}\n\n\
         % Page layout\n{LAYOUT}\n\n\
         % Math macros\n{MACROS}\n\n\
         \\hypersetup{{\n{hypersetup}\n}}\n\n\
         \\begin{{document}}\n\n\
         {body}\n\n\
         \\end{{document}}\n",
        banner = flavor.banner(),
        hypersetup = flavor.hypersetup(),
    )
}

/// The body between `\begin{document}` and `\end{document}`, if `doc` is wrapped.
pub fn unwrap_document(doc: &str) -> Option<&str> {
    let start = doc.find(r"\begin{document}")? + r"\begin{document}".len();
    let end = doc[start..].find(r"\end{document}")? + start;
    Some(doc[start..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BODY: &str = "\\section{Intro}\r\nHello.\n\n\n\n$$x^2$$\n";

    #[test]
    fn test_wrap_contains_preamble() {
        let doc = wrap_document(BODY, Flavor::Export);
        assert!(doc.starts_with("% Research paper\n"));
        for needle in [
            r"\documentclass[11pt]{article}",
            r"\usepackage{natbib}",
            r"\usepackage[margin=1in,top=1in,bottom=1in]{geometry}",
            r"\onehalfspacing",
            r"\newcommand{\R}{\mathbb{R}}",
            r"\DeclareMathOperator*{\argmax}{arg\,max}",
            "\\begin{document}\n\n\\section{Intro}\nHello.\n\n$$x^2$$\n\n\\end{document}\n",
        ] {
            assert!(doc.contains(needle), "missing {needle}");
        }
        assert!(!doc.contains("pdfauthor"));
    }

    #[test]
    fn test_idempotent() {
        let once = wrap_document(BODY, Flavor::Export);
        let twice = wrap_document(&once, Flavor::Export);
        assert_eq!(once.trim_end(), twice);
        assert_eq!(wrap_document(&twice, Flavor::Clipboard), twice);
    }

    #[test]
    fn test_flavors_share_body() {
        let export = wrap_document(BODY, Flavor::Export);
        let clipboard = wrap_document(BODY, Flavor::Clipboard);
        assert_eq!(unwrap_document(&export), unwrap_document(&clipboard));
        assert_eq!(unwrap_document(&export), Some(normalize(BODY).as_str()));
        assert!(clipboard.contains("pdfauthor={paperpress}"));
        assert!(clipboard.contains("pdfsubject={Research Paper}"));

        let strip = |doc: &str| doc.lines().filter(|l| !l.starts_with('%')).collect::<Vec<_>>().join("\n");
        let export_lines = strip(&export);
        let clipboard_lines = strip(&clipboard)
            .replace(",\n    pdfauthor={paperpress},\n    pdfsubject={Research Paper}", "");
        assert_eq!(export_lines, clipboard_lines);
    }

    #[test]
    fn test_unwrap_bare_body() {
        assert_eq!(unwrap_document("just text"), None);
    }
}
