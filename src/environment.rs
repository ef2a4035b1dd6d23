// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use std::sync::OnceLock;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use eyre::{eyre, WrapErr};

use crate::{
    config::{self, Config},
    export::ExportOptions,
    path_utils,
    preview::PreviewOptions,
    provider::command::CommandProvider,
    record,
    settings::Settings,
};

pub const CHAT_FILE: &str = "chat.json";
pub const SETTINGS_FILE: &str = "settings.json";

pub struct Environment {
    /// The workspace root, i.e. the directory holding `Paperpress.toml`.
    pub root: Utf8PathBuf,
    pub config: Config,
}

static ENVIRONMENT: OnceLock<Environment> = OnceLock::new();

fn get_environment() -> &'static Environment {
    ENVIRONMENT.get().expect("environment must be initialized")
}

pub fn config() -> &'static Config {
    &get_environment().config
}

pub fn init_environment(toml_file: Utf8PathBuf) -> eyre::Result<()> {
    let toml_file = config::find_config(toml_file)?;

    let (root, _file_name) = path_utils::split_file_name(&toml_file)
        .ok_or_else(|| eyre!("invalid configuration path `{}`", toml_file))?;
    let toml = std::fs::read_to_string(&toml_file)
        .wrap_err_with(|| eyre!("failed to read `{}`", toml_file))?;

    log::debug!("workspace root: `{}`", root);
    _ = ENVIRONMENT.set(Environment {
        root: root.to_owned(),
        config: config::parse_config(&toml)?,
    });
    Ok(())
}

/// Mock environment for testing purposes.
#[cfg(test)]
pub fn mock_environment() {
    _ = ENVIRONMENT.set(Environment {
        root: "./".into(),
        config: Config::default(),
    });
}

pub fn root_dir() -> &'static Utf8Path {
    &get_environment().root
}

pub fn state_dir() -> Utf8PathBuf {
    root_dir().join(&config().paper.state_dir)
}

pub fn chat_path() -> Utf8PathBuf {
    state_dir().join(CHAT_FILE)
}

pub fn settings_path() -> Utf8PathBuf {
    state_dir().join(SETTINGS_FILE)
}

pub fn paper_dir() -> Utf8PathBuf {
    record::paper_dir(root_dir())
}

pub fn preview_output() -> Utf8PathBuf {
    root_dir().join(&config().preview.output)
}

pub fn show_code() -> bool {
    config().paper.show_code
}

pub fn load_settings() -> Settings {
    Settings::load(&settings_path())
}

pub fn preview_options() -> PreviewOptions {
    let preview = &config().preview;
    PreviewOptions {
        tier: preview.math,
        vspace_px_per_cm: preview.vspace_px_per_cm,
    }
}

pub fn export_options(date: NaiveDate) -> ExportOptions {
    let pdf = &config().pdf;
    ExportOptions {
        dir: root_dir().join(&config().export.dir),
        date,
        geometry: pdf.paper_size.geometry(),
        body_size: pdf.body_size,
        progress: true,
    }
}

/// The configured generator, with the key taken from `settings` or the
/// provider's environment variable.
pub fn provider(settings: &Settings) -> CommandProvider {
    let provider = &config().provider;
    CommandProvider::new(
        provider.kind,
        provider.model().to_string(),
        settings.api_key(provider.kind),
        provider.command.clone(),
    )
}

/// Shorten `path` for status lines.
pub fn display_path(path: &Utf8Path) -> String {
    path_utils::display_path(root_dir(), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;

    #[test]
    fn test_mock_paths() {
        mock_environment();
        assert_eq!(path_utils::pretty_path(&chat_path()), ".paperpress/chat.json");
        assert_eq!(path_utils::pretty_path(&settings_path()), ".paperpress/settings.json");
        assert_eq!(path_utils::pretty_path(&paper_dir()), "paper");
        assert_eq!(display_path(&root_dir().join("exports/a.pdf")), "exports/a.pdf");
        assert_eq!(provider(&Settings::default()).kind(), config().provider.kind);
    }
}
