// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use camino::{Utf8Path, Utf8PathBuf};
use eyre::WrapErr;

use crate::{config, record::PaperRecord};

#[derive(clap::Args)]
pub struct NewCommand {
    /// Path to the new workspace.
    #[arg(default_value_t = Utf8PathBuf::from("."))]
    pub path: Utf8PathBuf,

    /// Title of the paper.
    #[arg(short, long)]
    pub title: String,

    /// What the paper is about.
    #[arg(short, long, default_value_t = String::new())]
    pub description: String,
}

pub fn new_workspace(command: &NewCommand) -> eyre::Result<()> {
    let root = &command.path;
    let config_path = root.join(config::DEFAULT_CONFIG_PATH);
    if config_path.exists() {
        return Err(eyre::eyre!("Already exists: {}", config_path));
    }

    std::fs::create_dir_all(root).wrap_err("failed to create workspace directory")?;
    new_config_inner(&config_path)?;

    PaperRecord::new(command.title.trim(), command.description.trim()).save(root)?;
    println!("Created new workspace at: {}", root);
    if command.description.trim().is_empty() {
        println!("Add a description in paper/paper.toml before running `paperpress generate`.");
    }
    Ok(())
}

fn new_config_inner(config_path: &Utf8Path) -> eyre::Result<()> {
    let config = config::Config::default();
    let toml = toml::to_string(&config).wrap_err("failed to serialize default config")?;

    std::fs::write(config_path, toml).wrap_err("failed to create default config file")?;
    println!("Created new config at: {}", config_path);
    Ok(())
}
