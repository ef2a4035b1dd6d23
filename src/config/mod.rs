// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

pub mod export;
pub mod paper;
pub mod pdf;
pub mod preview;
pub mod provider;

use camino::Utf8PathBuf;
use export::Export;
use paper::Paper;
use pdf::Pdf;
use preview::Preview;
use provider::Provider;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "./Paperpress.toml";

#[derive(Deserialize, Debug, Default, Serialize)]
pub struct Config {
    #[serde(default)]
    pub paper: Paper,

    #[serde(default)]
    pub provider: Provider,

    #[serde(default)]
    pub preview: Preview,

    #[serde(default)]
    pub export: Export,

    #[serde(default)]
    pub pdf: Pdf,
}

/// Try to find toml file in the current directory or the parent directory.
pub fn find_config(mut toml_file: Utf8PathBuf) -> eyre::Result<Utf8PathBuf> {
    if !toml_file.exists() {
        let missing = || eyre::eyre!("cannot find configuration file: {}", toml_file);
        let dir = match toml_file.parent() {
            Some(dir) if !dir.as_str().is_empty() => dir.to_owned(),
            _ => Utf8PathBuf::from("."),
        };
        let dir = dir.canonicalize_utf8().map_err(|_| missing())?;
        let parent = dir.parent().ok_or_else(missing)?;

        let candidate = parent.join(DEFAULT_CONFIG_PATH);
        if !candidate.exists() {
            return Err(eyre::eyre!("cannot find configuration file: {}", candidate));
        }
        toml_file = candidate;
    }
    Ok(toml_file)
}

pub fn parse_config(config: &str) -> eyre::Result<Config> {
    let config: Config =
        toml::from_str(config).map_err(|e| eyre::eyre!("failed to parse config file: {}", e))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{math::FidelityTier, pdf::PaperSize, provider::ProviderKind};

    #[test]
    fn test_empty_toml() {
        let config = parse_config("").unwrap();

        assert_eq!(config.paper.state_dir, "./.paperpress");
        assert!(config.paper.show_code);
        assert_eq!(config.provider.kind, ProviderKind::Anthropic);
        assert_eq!(config.provider.model(), "claude-sonnet-4-5");
        assert_eq!(config.provider.command[0], "paperpress-llm");
        assert_eq!(config.preview.math, FidelityTier::Typeset);
        assert_eq!(config.preview.vspace_px_per_cm, 16.0);
        assert_eq!(config.export.dir, "./exports");
        assert_eq!(config.pdf.paper_size, PaperSize::A4);
    }

    #[test]
    fn test_simple_toml() {
        let config = parse_config(
            r#"
            [provider]
            kind = "openai"
            model = "gpt-5-mini"
            command = ["llm", "-m", "<model>"]

            [preview]
            math = "unicode"
            vspace-px-per-cm = 20.0

            [pdf]
            paper-size = "letter"
            "#,
        )
        .unwrap();

        assert_eq!(config.provider.kind, ProviderKind::OpenAi);
        assert_eq!(config.provider.model(), "gpt-5-mini");
        assert_eq!(config.provider.command, ["llm", "-m", "<model>"]);
        assert_eq!(config.preview.math, FidelityTier::Unicode);
        assert_eq!(config.preview.vspace_px_per_cm, 20.0);
        assert_eq!(config.pdf.paper_size, PaperSize::Letter);
        assert_eq!(config.pdf.body_size, 11.0);
    }

    #[test]
    fn test_bad_toml() {
        assert!(parse_config("[preview]\nmath = \"latex\"").is_err());
    }

    #[test]
    fn test_find_config() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        std::fs::write(root.join("Paperpress.toml"), "").unwrap();
        std::fs::create_dir(root.join("paper")).unwrap();

        let direct = root.join("Paperpress.toml");
        assert_eq!(find_config(direct.clone()).unwrap(), direct);

        let found = find_config(root.join("paper/Paperpress.toml")).unwrap();
        assert!(found.ends_with("Paperpress.toml"));
        assert!(found.exists());

        assert!(find_config(root.join("paper/missing/Paperpress.toml")).is_err());
    }
}
