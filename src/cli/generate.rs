// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use color_print::cprintln;
use eyre::WrapErr;

use crate::{config, environment, progress::LoadingIndicator, record, session};

#[derive(clap::Args)]
pub struct GenerateCommand {
    /// Title of the paper, replacing the one stored in the workspace.
    #[arg(short, long)]
    title: Option<String>,

    /// What the paper is about, replacing the stored description.
    #[arg(short, long)]
    description: Option<String>,

    /// Path to the configuration file (e.g., "Paperpress.toml").
    #[arg(short, long, default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    config: String,
}

pub fn generate(command: &GenerateCommand) -> eyre::Result<()> {
    environment::init_environment(command.config.clone().into())?;

    let mut session = super::load_session()?;
    let title = command.title.clone().unwrap_or_else(|| session.record.title.clone());
    let description = command
        .description
        .clone()
        .unwrap_or_else(|| session.record.description.clone());

    let provider = environment::provider(&environment::load_settings());
    let mut indicator = LoadingIndicator::spinner(session::STARTED);
    let result = session.generate(&provider, &title, &description, &|step| indicator.set_message(step));
    indicator.clear();

    super::save_session(&session)?;
    result.wrap_err("failed to generate the paper")?;

    let root = environment::root_dir();
    cprintln!("<g>{}</>", session::ALL_DONE);
    println!("  paper: {}", environment::display_path(&record::body_path(root)));
    println!("  code:  {}", environment::display_path(&record::code_path(root)));
    Ok(())
}
