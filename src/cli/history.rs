// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use color_print::cprintln;

use crate::{
    chat::{ChatHistory, Role, ERROR_PREFIX},
    config, environment,
};

#[derive(clap::Args)]
pub struct HistoryCommand {
    /// Only show the last N messages.
    #[arg(short = 'n', long)]
    last: Option<usize>,

    /// Path to the configuration file (e.g., "Paperpress.toml").
    #[arg(short, long, default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    config: String,
}

pub fn history(command: &HistoryCommand) -> eyre::Result<()> {
    environment::init_environment(command.config.clone().into())?;

    let history = ChatHistory::load(&environment::chat_path());
    if history.is_empty() {
        println!("No messages yet.");
        return Ok(());
    }

    let messages = history.messages();
    let skip = command.last.map_or(0, |last| messages.len().saturating_sub(last));
    for message in &messages[skip..] {
        match message.role {
            Role::User => cprintln!("<c,bold>you</> {}", message.content),
            Role::Agent if message.content.starts_with(ERROR_PREFIX) => {
                cprintln!("<m,bold>agent</> <r>{}</>", message.content)
            }
            Role::Agent => cprintln!("<m,bold>agent</> {}", message.content),
        }
    }
    Ok(())
}
