// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use std::{fmt::Display, fs};

use camino::Utf8Path;
use eyre::{eyre, WrapErr};
use serde::{Deserialize, Serialize};

use crate::path_utils;

pub const ERROR_PREFIX: &str = "❌ Error: ";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Append-only conversation log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
        });
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Role::User, content);
    }

    pub fn push_agent(&mut self, content: impl Into<String>) {
        self.push(Role::Agent, content);
    }

    pub fn push_error(&mut self, error: impl Display) {
        self.push(Role::Agent, format!("{}{}", ERROR_PREFIX, error));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// A missing or unreadable history starts a new conversation. A corrupt
    /// one is moved aside first, so saving the new one keeps the old log.
    pub fn load(path: &Utf8Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::new();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring corrupt chat history `{}`: {}", path, e);
            if let Some(backup) = path_utils::set_aside(path) {
                log::warn!("the corrupt history was moved to `{}`", backup);
            }
            Self::new()
        })
    }

    pub fn save(&self, path: &Utf8Path) -> eyre::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).wrap_err_with(|| eyre!("failed to create `{}`", parent))?;
        }
        let json = serde_json::to_string_pretty(self).wrap_err("failed to serialize chat history")?;
        fs::write(path, json).wrap_err_with(|| eyre!("failed to write `{}`", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn test_push() {
        let mut history = ChatHistory::new();
        history.push_user("make it shorter");
        history.push_error("API key required for openai. Please add it in Settings.");
        assert_eq!(history.len(), 2);
        assert_eq!(history.messages()[0].role, Role::User);
        assert_eq!(
            history.last().unwrap().content,
            "❌ Error: API key required for openai. Please add it in Settings."
        );
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join(".paperpress/chat.json")).unwrap();
        assert!(ChatHistory::load(&path).is_empty());

        let mut history = ChatHistory::new();
        history.push_user("hi");
        history.push_agent("hello");
        history.save(&path).unwrap();
        assert_eq!(ChatHistory::load(&path), history);

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains(r#""role": "agent""#));
    }

    #[test]
    fn test_corrupt_history_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("chat.json")).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let mut history = ChatHistory::load(&path);
        assert!(history.is_empty());
        history.push_user("start over");
        history.save(&path).unwrap();

        let backup = dir.path().join("chat.json.bak");
        assert_eq!(fs::read_to_string(backup).unwrap(), "{ not json");
        assert_eq!(ChatHistory::load(&path), history);
    }
}
