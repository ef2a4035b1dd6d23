// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use pulldown_latex::{config::DisplayMode, mathml::push_mathml, Parser, RenderConfig, Storage};

use super::{MathError, MathRenderer};

pub struct MathmlRenderer;

impl MathRenderer for MathmlRenderer {
    fn render(&self, source: &str, display: bool) -> Result<String, MathError> {
        let storage = Storage::new();
        let parser = Parser::new(source, &storage);
        let mut config: RenderConfig = Default::default();
        config.display_mode = match display {
            true => DisplayMode::Block,
            false => DisplayMode::Inline,
        };

        let mut mathml = String::new();
        push_mathml(&mut mathml, parser, config).map_err(|e| MathError::Write(e.to_string()))?;

        // Parse errors are reported inside the markup rather than as `Err`.
        if mathml.contains("<merror") {
            return Err(MathError::Parse(source.to_string()));
        }
        Ok(mathml.replace('\n', ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_mathml() {
        let mathml = MathmlRenderer.render("x^2", false).unwrap();
        assert!(mathml.starts_with("<math"));
        assert!(mathml.contains("<msup"));
        assert!(!mathml.contains("display=\"block\""));
    }

    #[test]
    fn test_display_mathml() {
        let mathml = MathmlRenderer.render(r"\frac{a}{b}", true).unwrap();
        assert!(mathml.contains("display=\"block\""));
        assert!(mathml.contains("<mfrac"));
    }

    #[test]
    fn test_parse_error() {
        assert!(MathmlRenderer.render(r"\frac{a", false).is_err());
    }
}
