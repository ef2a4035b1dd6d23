// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

//! The language-model collaborator.
//!
//! Paperpress never talks HTTP itself. A [`Provider`] turns a prompt into
//! text; [`command::CommandProvider`] delegates to an external program.

pub mod command;
pub mod prompt;
pub mod response;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum)]
pub enum ProviderKind {
    #[default]
    #[serde(rename = "anthropic")]
    #[value(name = "anthropic")]
    Anthropic,

    #[serde(rename = "openai")]
    #[value(name = "openai")]
    OpenAi,

    #[serde(rename = "google")]
    #[value(name = "google")]
    Google,

    #[serde(rename = "xai")]
    #[value(name = "xai")]
    Xai,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Anthropic,
        ProviderKind::OpenAi,
        ProviderKind::Google,
        ProviderKind::Xai,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Google => "google",
            ProviderKind::Xai => "xai",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Google => "Google",
            ProviderKind::Xai => "xAI",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "claude-sonnet-4-5",
            ProviderKind::OpenAi => "gpt-5",
            ProviderKind::Google => "gemini-2.5-pro",
            ProviderKind::Xai => "grok-4",
        }
    }

    /// Conventional environment variable holding the API key.
    pub fn env_var(self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Google => "GEMINI_API_KEY",
            ProviderKind::Xai => "XAI_API_KEY",
        }
    }

    pub fn docs_url(self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "https://docs.anthropic.com/en/api",
            ProviderKind::OpenAi => "https://platform.openai.com/docs",
            ProviderKind::Google => "https://ai.google.dev/gemini-api/docs",
            ProviderKind::Xai => "https://docs.x.ai/",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API key required for {0}. Please add it in Settings.")]
    MissingApiKey(ProviderKind),

    #[error("no generator command is configured for {0}")]
    NotConfigured(ProviderKind),

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("{0}")]
    Failed(String),

    #[error("{0} returned an empty response")]
    Empty(ProviderKind),
}

pub trait Provider {
    fn kind(&self) -> ProviderKind;
    fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue() {
        let models: Vec<_> = ProviderKind::ALL.iter().map(|kind| kind.default_model()).collect();
        assert_eq!(models, ["claude-sonnet-4-5", "gpt-5", "gemini-2.5-pro", "grok-4"]);
        assert_eq!(ProviderKind::OpenAi.to_string(), "openai");
        assert_eq!(ProviderKind::Xai.display_name(), "xAI");
    }

    #[test]
    fn test_missing_key_message() {
        assert_eq!(
            ProviderError::MissingApiKey(ProviderKind::Google).to_string(),
            "API key required for google. Please add it in Settings."
        );
    }

    #[test]
    fn test_kind_from_config() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: ProviderKind,
        }
        let wrapper: Wrapper = toml::from_str(r#"kind = "openai""#).unwrap();
        assert_eq!(wrapper.kind, ProviderKind::OpenAi);
    }
}
