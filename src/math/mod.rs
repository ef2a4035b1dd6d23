// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

//! Math rendering in three fidelity tiers.
//!
//! 1. [`FidelityTier::Typeset`]: MathML produced by `pulldown-latex`.
//! 2. [`FidelityTier::Unicode`]: plain text through [`unicode::to_unicode`].
//! 3. [`FidelityTier::Verbatim`]: the LaTeX source as written.
//!
//! A tier 1 failure never aborts a render; the caller falls back to tier 3.

pub mod mathml;
pub mod unicode;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
pub enum FidelityTier {
    #[default]
    #[serde(rename = "mathml")]
    #[value(name = "mathml")]
    Typeset,

    #[serde(rename = "unicode")]
    #[value(name = "unicode")]
    Unicode,

    #[serde(rename = "raw")]
    #[value(name = "raw")]
    Verbatim,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("cannot typeset `{0}`")]
    Parse(String),

    #[error("failed to write MathML: {0}")]
    Write(String),
}

pub trait MathRenderer {
    /// Render `source` (without delimiters) to HTML-ready markup.
    fn render(&self, source: &str, display: bool) -> Result<String, MathError>;
}

pub struct UnicodeRenderer;

impl MathRenderer for UnicodeRenderer {
    fn render(&self, source: &str, _display: bool) -> Result<String, MathError> {
        Ok(htmlize::escape_text(unicode::to_unicode(source)).into_owned())
    }
}

pub struct VerbatimRenderer;

impl MathRenderer for VerbatimRenderer {
    fn render(&self, source: &str, _display: bool) -> Result<String, MathError> {
        Ok(htmlize::escape_text(source).into_owned())
    }
}

pub fn renderer(tier: FidelityTier) -> Box<dyn MathRenderer> {
    match tier {
        FidelityTier::Typeset => Box::new(mathml::MathmlRenderer),
        FidelityTier::Unicode => Box::new(UnicodeRenderer),
        FidelityTier::Verbatim => Box::new(VerbatimRenderer),
    }
}

/// Render with `tier`, falling back to the verbatim source on failure.
pub fn render_or_fallback(renderer: &dyn MathRenderer, source: &str, display: bool) -> String {
    match renderer.render(source, display) {
        Ok(markup) => markup,
        Err(error) => {
            log::warn!("math fallback to source: {}", error);
            htmlize::escape_text(source).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl MathRenderer for Failing {
        fn render(&self, source: &str, _display: bool) -> Result<String, MathError> {
            Err(MathError::Parse(source.to_string()))
        }
    }

    #[test]
    fn test_fallback_is_escaped_source() {
        assert_eq!(render_or_fallback(&Failing, "a < b", false), "a &lt; b");
    }

    #[test]
    fn test_tiers() {
        assert_eq!(renderer(FidelityTier::Unicode).render(r"\alpha", false).unwrap(), "α");
        assert_eq!(renderer(FidelityTier::Verbatim).render(r"\alpha", false).unwrap(), r"\alpha");
    }
}
