// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

//! Lossy LaTeX math to Unicode text.
//!
//! The symbol table is consulted in order at every backslash and the first
//! matching command wins; a command that ends in a letter only matches when
//! the next character is not a letter, so `\in` never eats `\infty`.
//! Replacements are never rescanned. Structural rewrites run afterwards.

use std::sync::LazyLock;

use regex_lite::Regex;

const OPEN_BRACE: char = '\u{E000}';
const CLOSE_BRACE: char = '\u{E001}';
const AMPERSAND: char = '\u{E002}';

pub const SYMBOLS: &[(&str, &str)] = &[
    // Blackboard bold and the paper preamble shorthands.
    ("\\mathbb{R}", "ℝ"),
    ("\\mathbb{N}", "ℕ"),
    ("\\mathbb{Z}", "ℤ"),
    ("\\mathbb{Q}", "ℚ"),
    ("\\mathbb{C}", "ℂ"),
    ("\\mathbb{E}", "𝔼"),
    ("\\mathbb{P}", "ℙ"),
    ("\\R", "ℝ"),
    ("\\N", "ℕ"),
    ("\\Z", "ℤ"),
    ("\\E", "𝔼"),
    // Greek.
    ("\\alpha", "α"),
    ("\\beta", "β"),
    ("\\gamma", "γ"),
    ("\\delta", "δ"),
    ("\\epsilon", "ε"),
    ("\\varepsilon", "ε"),
    ("\\zeta", "ζ"),
    ("\\eta", "η"),
    ("\\theta", "θ"),
    ("\\vartheta", "ϑ"),
    ("\\iota", "ι"),
    ("\\kappa", "κ"),
    ("\\lambda", "λ"),
    ("\\mu", "μ"),
    ("\\nu", "ν"),
    ("\\xi", "ξ"),
    ("\\pi", "π"),
    ("\\rho", "ρ"),
    ("\\varrho", "ϱ"),
    ("\\sigma", "σ"),
    ("\\varsigma", "ς"),
    ("\\tau", "τ"),
    ("\\upsilon", "υ"),
    ("\\phi", "φ"),
    ("\\varphi", "φ"),
    ("\\chi", "χ"),
    ("\\psi", "ψ"),
    ("\\omega", "ω"),
    ("\\Gamma", "Γ"),
    ("\\Delta", "Δ"),
    ("\\Theta", "Θ"),
    ("\\Lambda", "Λ"),
    ("\\Xi", "Ξ"),
    ("\\Pi", "Π"),
    ("\\Sigma", "Σ"),
    ("\\Upsilon", "Υ"),
    ("\\Phi", "Φ"),
    ("\\Psi", "Ψ"),
    ("\\Omega", "Ω"),
    // Large operators.
    ("\\sum", "∑"),
    ("\\prod", "∏"),
    ("\\coprod", "∐"),
    ("\\int", "∫"),
    ("\\iint", "∬"),
    ("\\iiint", "∭"),
    ("\\oint", "∮"),
    ("\\bigcup", "⋃"),
    ("\\bigcap", "⋂"),
    ("\\bigoplus", "⨁"),
    ("\\bigotimes", "⨂"),
    // Binary operators.
    ("\\times", "×"),
    ("\\cdot", "·"),
    ("\\div", "÷"),
    ("\\pm", "±"),
    ("\\mp", "∓"),
    ("\\ast", "∗"),
    ("\\star", "⋆"),
    ("\\circ", "∘"),
    ("\\bullet", "•"),
    ("\\oplus", "⊕"),
    ("\\otimes", "⊗"),
    ("\\odot", "⊙"),
    ("\\wedge", "∧"),
    ("\\land", "∧"),
    ("\\vee", "∨"),
    ("\\lor", "∨"),
    ("\\cap", "∩"),
    ("\\cup", "∪"),
    ("\\setminus", "∖"),
    // Relations.
    ("\\leq", "≤"),
    ("\\le", "≤"),
    ("\\geq", "≥"),
    ("\\ge", "≥"),
    ("\\neq", "≠"),
    ("\\ne", "≠"),
    ("\\approx", "≈"),
    ("\\equiv", "≡"),
    ("\\sim", "∼"),
    ("\\simeq", "≃"),
    ("\\cong", "≅"),
    ("\\propto", "∝"),
    ("\\ll", "≪"),
    ("\\gg", "≫"),
    ("\\prec", "≺"),
    ("\\succ", "≻"),
    ("\\subset", "⊂"),
    ("\\subseteq", "⊆"),
    ("\\supset", "⊃"),
    ("\\supseteq", "⊇"),
    ("\\in", "∈"),
    ("\\notin", "∉"),
    ("\\ni", "∋"),
    ("\\perp", "⊥"),
    ("\\parallel", "∥"),
    ("\\mid", "∣"),
    ("\\models", "⊨"),
    ("\\vdash", "⊢"),
    ("\\coloneqq", "≔"),
    ("\\triangleq", "≜"),
    // Arrows.
    ("\\rightarrow", "→"),
    ("\\to", "→"),
    ("\\leftarrow", "←"),
    ("\\gets", "←"),
    ("\\leftrightarrow", "↔"),
    ("\\Rightarrow", "⇒"),
    ("\\Leftarrow", "⇐"),
    ("\\Leftrightarrow", "⇔"),
    ("\\implies", "⟹"),
    ("\\iff", "⟺"),
    ("\\mapsto", "↦"),
    ("\\longrightarrow", "⟶"),
    ("\\longmapsto", "⟼"),
    ("\\uparrow", "↑"),
    ("\\downarrow", "↓"),
    ("\\hookrightarrow", "↪"),
    // Logic, sets and calculus.
    ("\\forall", "∀"),
    ("\\exists", "∃"),
    ("\\nexists", "∄"),
    ("\\neg", "¬"),
    ("\\lnot", "¬"),
    ("\\emptyset", "∅"),
    ("\\varnothing", "∅"),
    ("\\infty", "∞"),
    ("\\partial", "∂"),
    ("\\nabla", "∇"),
    ("\\aleph", "ℵ"),
    ("\\ell", "ℓ"),
    ("\\hbar", "ℏ"),
    ("\\Re", "ℜ"),
    ("\\Im", "ℑ"),
    ("\\top", "⊤"),
    ("\\bot", "⊥"),
    ("\\angle", "∠"),
    ("\\prime", "′"),
    ("\\ldots", "…"),
    ("\\cdots", "⋯"),
    ("\\vdots", "⋮"),
    ("\\ddots", "⋱"),
    ("\\dots", "…"),
    // Delimiters.
    ("\\langle", "⟨"),
    ("\\rangle", "⟩"),
    ("\\lceil", "⌈"),
    ("\\rceil", "⌉"),
    ("\\lfloor", "⌊"),
    ("\\rfloor", "⌋"),
    ("\\lVert", "‖"),
    ("\\rVert", "‖"),
    ("\\Vert", "‖"),
    ("\\lvert", "|"),
    ("\\rvert", "|"),
    ("\\|", "‖"),
    ("\\{", "\u{E000}"),
    ("\\}", "\u{E001}"),
    ("\\%", "%"),
    ("\\&", "\u{E002}"),
    ("\\#", "#"),
    // Named functions.
    ("\\argmax", "argmax"),
    ("\\argmin", "argmin"),
    ("\\log", "log"),
    ("\\ln", "ln"),
    ("\\exp", "exp"),
    ("\\sin", "sin"),
    ("\\cos", "cos"),
    ("\\tan", "tan"),
    ("\\sinh", "sinh"),
    ("\\cosh", "cosh"),
    ("\\tanh", "tanh"),
    ("\\max", "max"),
    ("\\min", "min"),
    ("\\sup", "sup"),
    ("\\inf", "inf"),
    ("\\lim", "lim"),
    ("\\det", "det"),
    ("\\arg", "arg"),
    ("\\dim", "dim"),
    ("\\ker", "ker"),
    ("\\deg", "deg"),
    ("\\gcd", "gcd"),
    ("\\Pr", "Pr"),
    // Spacing.
    ("\\qquad", " "),
    ("\\quad", " "),
    ("\\,", " "),
    ("\\;", " "),
    ("\\:", " "),
    ("\\!", ""),
    ("\\ ", " "),
];

static LEFT_RIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:left|right|bigl|bigr|Bigl|Bigr|biggl|biggr|Biggl|Biggr|big|Big|bigg|Bigg)\b\.?")
        .unwrap()
});
static FRAC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[dt]?frac\s*\{([^{}]*)\}\s*\{([^{}]*)\}").unwrap());
static FRAC_SHORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[dt]?frac\s*([0-9A-Za-z])\s*([0-9A-Za-z])").unwrap());
static ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\sqrt\s*\[([^\]]*)\]\s*\{([^{}]*)\}").unwrap());
static SQRT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\sqrt\s*\{([^{}]*)\}").unwrap());
static SUPERSCRIPT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\^\s*\{([^{}]*)\}").unwrap());
static SUBSCRIPT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_\s*\{([^{}]*)\}").unwrap());
static ACCENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(hat|widehat|bar|overline|tilde|widetilde|vec|dot)\s*\{([^{}]*)\}").unwrap()
});
static FONT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\\(?:text|textrm|textbf|textit|mathrm|mathbf|mathit|mathsf|mathtt|mathcal|mathscr|mathfrak|mathbb|boldsymbol|bm|operatorname\*?)\s*\{([^{}]*)\}",
    )
    .unwrap()
});
static MATRIX_BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\begin\{[pbvVB]?matrix\}\s*").unwrap());
static MATRIX_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\\end\{[pbvVB]?matrix\}").unwrap());
static CASES_BEGIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\begin\{cases\}\s*").unwrap());
static PLAIN_ENV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:begin|end)\{(?:aligned|gathered|split|array|cases|smallmatrix)\}(?:\{[^{}]*\})?")
        .unwrap()
});
static ROW_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\\\\\s*").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Convert LaTeX math source to a readable Unicode approximation.
pub fn to_unicode(source: &str) -> String {
    let text = replace_symbols(source);
    let text = rewrite_structure(&text);
    let text: String = text
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '\\'))
        .map(|c| match c {
            OPEN_BRACE => '{',
            CLOSE_BRACE => '}',
            AMPERSAND => '&',
            '~' => ' ',
            c => c,
        })
        .collect();
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

fn replace_symbols(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with("\\\\") {
            out.push_str("\\\\");
            rest = &rest[2..];
            continue;
        }
        if c == '\\' {
            if let Some((command, symbol)) = SYMBOLS.iter().find(|(command, _)| matches_at(rest, command)) {
                out.push_str(symbol);
                rest = &rest[command.len()..];
                continue;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn matches_at(text: &str, command: &str) -> bool {
    if !text.starts_with(command) {
        return false;
    }
    let ends_in_letter = command.chars().last().is_some_and(|c| c.is_ascii_alphabetic());
    let next_is_letter = text[command.len()..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic());
    !(ends_in_letter && next_is_letter)
}

fn rewrite_structure(text: &str) -> String {
    let mut text = LEFT_RIGHT.replace_all(text, "").into_owned();
    text = MATRIX_BEGIN.replace_all(&text, "[").into_owned();
    text = MATRIX_END.replace_all(&text, "]").into_owned();
    text = CASES_BEGIN.replace_all(&text, "\u{E000} ").into_owned();
    text = PLAIN_ENV.replace_all(&text, "").into_owned();
    text = ROW_BREAK.replace_all(&text, "; ").into_owned();
    text = text.replace('&', " ");

    // Innermost groups first; repeat until nothing changes so nesting degrades gracefully.
    for _ in 0..32 {
        let before = text.clone();
        text = FRAC.replace_all(&text, "($1)/($2)").into_owned();
        text = FRAC_SHORT.replace_all(&text, "$1/$2").into_owned();
        text = ROOT.replace_all(&text, "$1√($2)").into_owned();
        text = SQRT.replace_all(&text, "√($1)").into_owned();
        text = ACCENT
            .replace_all(&text, |caps: &regex_lite::Captures| accent(&caps[1], &caps[2]))
            .into_owned();
        text = FONT.replace_all(&text, "$1").into_owned();
        text = SUPERSCRIPT.replace_all(&text, "^($1)").into_owned();
        text = SUBSCRIPT.replace_all(&text, "_($1)").into_owned();
        if text == before {
            break;
        }
    }
    text
}

fn accent(name: &str, body: &str) -> String {
    let mark = match name {
        "hat" | "widehat" => '\u{302}',
        "bar" | "overline" => '\u{304}',
        "tilde" | "widetilde" => '\u{303}',
        "vec" => '\u{20D7}',
        _ => '\u{307}',
    };
    let mut chars = body.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => format!("{c}{mark}"),
        _ => body.to_string(),
    }
}
