// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use std::io::BufRead;

use clap::Parser;
use color_print::cprintln;
use eyre::WrapErr;

use crate::{config, environment, provider::ProviderKind, settings::Settings};

#[derive(Parser)]
pub struct KeyCommandCli {
    #[command(subcommand)]
    pub command: KeyCommand,
}

#[derive(clap::Subcommand)]
pub enum KeyCommand {
    /// Store the API key of a provider.
    #[command(visible_alias = "s")]
    Set(KeySetCommand),

    /// Forget the stored API key of a provider.
    #[command(visible_alias = "c")]
    Clear(KeyClearCommand),

    /// Show which providers have a key available.
    #[command(visible_alias = "l")]
    List(KeyListCommand),
}

#[derive(clap::Args)]
pub struct KeySetCommand {
    #[arg(value_enum)]
    provider: ProviderKind,

    /// The key. Read from standard input when omitted.
    key: Option<String>,

    /// Path to the configuration file (e.g., "Paperpress.toml").
    #[arg(short, long, default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    config: String,
}

#[derive(clap::Args)]
pub struct KeyClearCommand {
    #[arg(value_enum)]
    provider: ProviderKind,

    /// Path to the configuration file (e.g., "Paperpress.toml").
    #[arg(short, long, default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    config: String,
}

#[derive(clap::Args)]
pub struct KeyListCommand {
    /// Path to the configuration file (e.g., "Paperpress.toml").
    #[arg(short, long, default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    config: String,
}

pub fn set_key(command: &KeySetCommand) -> eyre::Result<()> {
    environment::init_environment(command.config.clone().into())?;

    let key = match &command.key {
        Some(key) => key.clone(),
        None => {
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .wrap_err("failed to read the key from standard input")?;
            line
        }
    };
    if key.trim().is_empty() {
        return Err(eyre::eyre!("the key for {} is empty", command.provider.display_name()));
    }

    let mut settings = environment::load_settings();
    settings.save_api_key(command.provider, &key);
    settings.save(&environment::settings_path())?;
    cprintln!("<g>Saved the {} API key.</>", command.provider.display_name());
    Ok(())
}

pub fn clear_key(command: &KeyClearCommand) -> eyre::Result<()> {
    environment::init_environment(command.config.clone().into())?;

    let mut settings = environment::load_settings();
    if !settings.clear_api_key(command.provider) {
        println!("No {} API key is stored.", command.provider.display_name());
        return Ok(());
    }
    settings.save(&environment::settings_path())?;
    cprintln!("<g>Removed the {} API key.</>", command.provider.display_name());
    Ok(())
}

pub fn list_keys(command: &KeyListCommand) -> eyre::Result<()> {
    environment::init_environment(command.config.clone().into())?;

    let settings = environment::load_settings();
    let active = environment::config().provider.kind;
    for kind in ProviderKind::ALL {
        let marker = if kind == active { "*" } else { " " };
        let line = format!("{} {:<10} {:<18}", marker, kind.id(), kind.default_model());
        match key_source(&settings, kind) {
            Some(source) => cprintln!("{} <g>{}</>", line, source),
            None => cprintln!("{} <y>no key</> (get one at {})", line, kind.docs_url()),
        }
    }
    Ok(())
}

fn key_source(settings: &Settings, kind: ProviderKind) -> Option<String> {
    match settings.has_stored_api_key(kind) {
        true => Some("stored".to_string()),
        false => settings.api_key(kind).map(|_| format!("from ${}", kind.env_var())),
    }
}
