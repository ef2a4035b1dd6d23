// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use std::{
    io::{self, Write},
    process::{Command, Stdio},
    thread,
};

use super::{CompletionRequest, Provider, ProviderError, ProviderKind};

pub const API_KEY_ENV: &str = "PAPERPRESS_API_KEY";
pub const SYSTEM_ENV: &str = "PAPERPRESS_SYSTEM";
pub const MAX_TOKENS_ENV: &str = "PAPERPRESS_MAX_TOKENS";
pub const PROVIDER_ENV: &str = "PAPERPRESS_PROVIDER";
pub const MODEL_ENV: &str = "PAPERPRESS_MODEL";

/// Runs an external generator: the prompt goes to stdin, the completion is
/// read from stdout. `<provider>` and `<model>` in the command are replaced.
pub struct CommandProvider {
    kind: ProviderKind,
    model: String,
    api_key: Option<String>,
    command: Vec<String>,
}

impl CommandProvider {
    pub fn new(kind: ProviderKind, model: String, api_key: Option<String>, command: Vec<String>) -> Self {
        Self {
            kind,
            model,
            api_key,
            command,
        }
    }

    fn argv(&self) -> Vec<String> {
        self.command
            .iter()
            .map(|arg| arg.replace("<provider>", self.kind.id()).replace("<model>", &self.model))
            .collect()
    }
}

impl Provider for CommandProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ProviderError::MissingApiKey(self.kind))?;

        let argv = self.argv();
        let Some((program, args)) = argv.split_first() else {
            return Err(ProviderError::NotConfigured(self.kind));
        };
        let spawn_error = |source: io::Error| ProviderError::Spawn {
            command: program.clone(),
            source,
        };

        log::debug!("running generator `{}` with model {}", argv.join(" "), self.model);
        let mut child = Command::new(program)
            .args(args)
            .env(API_KEY_ENV, api_key)
            .env(SYSTEM_ENV, &request.system)
            .env(MAX_TOKENS_ENV, request.max_tokens.to_string())
            .env(PROVIDER_ENV, self.kind.id())
            .env(MODEL_ENV, &self.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // The child may fill its stdout pipe before it has read all of stdin.
        let writer = child.stdin.take().map(|mut stdin| {
            let prompt = request.prompt.clone();
            thread::spawn(move || match stdin.write_all(prompt.as_bytes()) {
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                result => result,
            })
        });

        let output = child.wait_with_output().map_err(spawn_error)?;
        if let Some(writer) = writer {
            match writer.join() {
                Ok(result) => result.map_err(spawn_error)?,
                Err(_) => log::warn!("prompt writer for `{}` panicked", program),
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ProviderError::Failed(match stderr.is_empty() {
                true => format!("`{}` exited with {}", program, output.status),
                false => stderr,
            }));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        if text.trim().is_empty() {
            return Err(ProviderError::Empty(self.kind));
        }
        Ok(text)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str, api_key: Option<&str>) -> CommandProvider {
        CommandProvider::new(
            ProviderKind::Anthropic,
            ProviderKind::Anthropic.default_model().to_string(),
            api_key.map(str::to_string),
            vec!["sh".to_string(), "-c".to_string(), script.to_string()],
        )
    }

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            system: "system".to_string(),
            prompt: prompt.to_string(),
            max_tokens: 16,
        }
    }

    #[test]
    fn test_prompt_round_trip() {
        let provider = sh("cat", Some("k"));
        assert_eq!(provider.complete(&request("hello")).unwrap(), "hello");
    }

    #[test]
    fn test_placeholders_and_env() {
        let provider = sh("echo <provider> <model> $PAPERPRESS_API_KEY $PAPERPRESS_MAX_TOKENS", Some("secret"));
        assert_eq!(
            provider.complete(&request("")).unwrap(),
            "anthropic claude-sonnet-4-5 secret 16\n"
        );
    }

    #[test]
    fn test_missing_key() {
        let error = sh("cat", None).complete(&request("x")).unwrap_err();
        assert!(matches!(error, ProviderError::MissingApiKey(ProviderKind::Anthropic)));
        let error = sh("cat", Some("  ")).complete(&request("x")).unwrap_err();
        assert!(matches!(error, ProviderError::MissingApiKey(_)));
    }

    #[test]
    fn test_failure_carries_stderr() {
        let error = sh("echo rate limited >&2; exit 3", Some("k")).complete(&request("x")).unwrap_err();
        assert_eq!(error.to_string(), "rate limited");
    }

    #[test]
    fn test_empty_output() {
        let error = sh("true", Some("k")).complete(&request("ignored")).unwrap_err();
        assert!(matches!(error, ProviderError::Empty(_)));
    }

    #[test]
    fn test_not_configured() {
        let provider = CommandProvider::new(ProviderKind::Xai, "grok-4".to_string(), Some("k".to_string()), vec![]);
        assert!(matches!(provider.complete(&request("x")), Err(ProviderError::NotConfigured(_))));
    }
}
