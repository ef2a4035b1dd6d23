// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

//! Local key/value preferences. Nothing read from here is ever fatal: a
//! missing file or a malformed value falls back to its default, and a file
//! that is not a JSON object is moved aside.

use std::{fs, str::FromStr};

use camino::Utf8Path;
use eyre::{eyre, WrapErr};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{path_utils, provider::ProviderKind};

pub const VIEW_TAB: &str = "view.tab";
pub const VIEW_SPLIT: &str = "view.split";

const DEFAULT_SPLIT: u8 = 50;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Settings {
    values: IndexMap<String, String>,
}

/// Which pane of the workspace page is shown first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Paper,
    Code,
}

impl FromStr for Tab {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "paper" => Ok(Tab::Paper),
            "code" => Ok(Tab::Code),
            _ => Err(()),
        }
    }
}

impl Tab {
    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Paper => "paper",
            Tab::Code => "code",
        }
    }
}

fn api_key_name(kind: ProviderKind) -> String {
    format!("api-key.{}", kind.id())
}

impl Settings {
    pub fn load(path: &Utf8Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        let raw: IndexMap<String, serde_json::Value> = match serde_json::from_str(&content) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("ignoring corrupt settings `{}`: {}", path, e);
                if let Some(backup) = path_utils::set_aside(path) {
                    log::warn!("the corrupt settings were moved to `{}`", backup);
                }
                return Self::default();
            }
        };
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(value) => Some((key, value)),
                serde_json::Value::Number(value) => Some((key, value.to_string())),
                serde_json::Value::Bool(value) => Some((key, value.to_string())),
                other => {
                    log::warn!("ignoring setting `{}` in `{}`: {}", key, path, other);
                    None
                }
            })
            .collect();
        Self { values }
    }

    pub fn save(&self, path: &Utf8Path) -> eyre::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).wrap_err_with(|| eyre!("failed to create `{}`", parent))?;
        }
        let json = serde_json::to_string_pretty(self).wrap_err("failed to serialize settings")?;
        fs::write(path, json).wrap_err_with(|| eyre!("failed to write `{}`", path))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.shift_remove(key)
    }

    pub fn save_api_key(&mut self, kind: ProviderKind, key: &str) {
        self.set(api_key_name(kind), key.trim());
    }

    pub fn clear_api_key(&mut self, kind: ProviderKind) -> bool {
        self.remove(&api_key_name(kind)).is_some()
    }

    /// The stored key, else the provider's environment variable.
    pub fn api_key(&self, kind: ProviderKind) -> Option<String> {
        let stored = self.get(&api_key_name(kind)).map(str::to_string);
        stored
            .or_else(|| std::env::var(kind.env_var()).ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn has_stored_api_key(&self, kind: ProviderKind) -> bool {
        self.get(&api_key_name(kind)).is_some_and(|key| !key.is_empty())
    }

    pub fn tab(&self) -> Tab {
        self.get_or(VIEW_TAB, Tab::Paper.as_str()).parse().unwrap_or_default()
    }

    /// Width of the paper pane in percent, within `20..=80`.
    pub fn split(&self) -> u8 {
        self.get(VIEW_SPLIT)
            .and_then(|split| split.trim().parse::<u8>().ok())
            .filter(|split| (20..=80).contains(split))
            .unwrap_or(DEFAULT_SPLIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn test_defaults_on_bad_values() {
        let mut settings = Settings::default();
        assert_eq!(settings.tab(), Tab::Paper);
        assert_eq!(settings.split(), 50);
        settings.set(VIEW_TAB, "sideways");
        settings.set(VIEW_SPLIT, "250");
        assert_eq!(settings.tab(), Tab::Paper);
        assert_eq!(settings.split(), 50);
        settings.set(VIEW_TAB, "code");
        settings.set(VIEW_SPLIT, "65");
        assert_eq!(settings.tab(), Tab::Code);
        assert_eq!(settings.split(), 65);
        assert_eq!(settings.get_or("missing", "fallback"), "fallback");
    }

    #[test]
    fn test_api_keys() {
        let mut settings = Settings::default();
        settings.save_api_key(ProviderKind::Xai, "  xai-123 ");
        assert_eq!(settings.api_key(ProviderKind::Xai).as_deref(), Some("xai-123"));
        assert!(settings.has_stored_api_key(ProviderKind::Xai));
        assert!(settings.clear_api_key(ProviderKind::Xai));
        assert!(!settings.clear_api_key(ProviderKind::Xai));
        assert!(!settings.has_stored_api_key(ProviderKind::Xai));
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join(".paperpress/settings.json")).unwrap();
        assert_eq!(Settings::load(&path), Settings::default());

        let mut settings = Settings::default();
        settings.save_api_key(ProviderKind::OpenAi, "sk-1");
        settings.set(VIEW_TAB, "code");
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.get("api-key.openai"), Some("sk-1"));

        fs::write(&path, "[1, 2").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        assert!(!path.exists());
        assert_eq!(fs::read_to_string(format!("{}.bak", path)).unwrap(), "[1, 2");
    }

    #[test]
    fn test_bad_value_keeps_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("settings.json")).unwrap();
        fs::write(
            &path,
            r#"{"api-key.openai": "sk-1", "view.split": 65, "view.tab": ["code"], "api-key.xai": null}"#,
        )
        .unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.get("api-key.openai"), Some("sk-1"));
        assert_eq!(settings.split(), 65);
        assert_eq!(settings.tab(), Tab::Paper);
        assert_eq!(settings.get(VIEW_TAB), None);
        assert!(!settings.has_stored_api_key(ProviderKind::Xai));
    }
}
