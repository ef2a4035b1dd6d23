// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

//! Normalize what a model sends back before it enters the paper record.

use std::sync::LazyLock;

use regex_lite::Regex;

static LATEX_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```(?:latex|tex)?\n?").unwrap());
static PYTHON_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```(?:python|py)?\n?").unwrap());

/// Preamble and title commands a bare body must not carry.
static PREAMBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\\documentclass(?:\[[^\]]*\])?\{[^}]*\}",
        r"|\\usepackage(?:\[[^\]]*\])?\{[^}]*\}",
        r"|\\geometry\{[^}]*\}",
        r"|\\title\{[^}]*\}",
        r"|\\author\{[^}]*\}",
        r"|\\date\{[^}]*\}",
        r"|\\begin\{document\}",
        r"|\\end\{document\}",
        r"|\\maketitle",
        r"|\\noindent",
    ))
    .unwrap()
});

/// What a chat reply turned out to be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Latex(String),
    Python(String),
    Answer(String),
}

pub fn clean_latex(text: &str) -> String {
    let text = LATEX_FENCE.replace_all(text, "");
    PREAMBLE.replace_all(&text, "").trim().to_string()
}

pub fn clean_python(text: &str) -> String {
    PYTHON_FENCE.replace_all(text, "").trim().to_string()
}

pub fn classify(response: &str) -> Reply {
    if response.contains(r"\section") || response.contains(r"\subsection") {
        Reply::Latex(clean_latex(response))
    } else if response.contains("import ") || response.contains("def ") {
        Reply::Python(clean_python(response))
    } else {
        Reply::Answer(response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_latex() {
        let raw = "```latex\n\\documentclass[11pt]{article}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amsmath}\n\\title{T}\n\\begin{document}\n\\maketitle\n\\section{Intro}\n\\noindent Text.\n\\end{document}\n```\n";
        assert_eq!(clean_latex(raw), "\\section{Intro}\n Text.");
    }

    #[test]
    fn test_clean_python() {
        assert_eq!(clean_python("```python\nimport torch\n```"), "import torch");
        assert_eq!(clean_python("  x = 1  "), "x = 1");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("\\section{A}\nB"), Reply::Latex("\\section{A}\nB".to_string()));
        assert_eq!(
            classify("```python\nimport numpy as np\n```"),
            Reply::Python("import numpy as np".to_string())
        );
        assert_eq!(classify("  Attention is a weighting.  "), Reply::Answer("Attention is a weighting.".to_string()));
    }
}
