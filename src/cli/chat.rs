// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use color_print::cprintln;
use eyre::WrapErr;

use crate::{config, environment, progress::LoadingIndicator, provider::response::Reply, session};

#[derive(clap::Args)]
pub struct ChatCommand {
    /// The request, e.g. "shorten the abstract" or "use numpy in the code".
    #[arg(required = true)]
    message: Vec<String>,

    /// Path to the configuration file (e.g., "Paperpress.toml").
    #[arg(short, long, default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    config: String,
}

pub fn chat(command: &ChatCommand) -> eyre::Result<()> {
    environment::init_environment(command.config.clone().into())?;

    let mut session = super::load_session()?;
    let provider = environment::provider(&environment::load_settings());
    let message = command.message.join(" ");

    let mut indicator = LoadingIndicator::spinner("Thinking...");
    let result = session.chat(&provider, &message);
    indicator.clear();

    super::save_session(&session)?;
    match result.wrap_err("failed to process the message")? {
        Reply::Latex(_) => cprintln!("<g>{}</>", session::PAPER_UPDATED),
        Reply::Python(_) => cprintln!("<g>{}</>", session::CODE_UPDATED),
        Reply::Answer(answer) => println!("{}", answer),
    }
    Ok(())
}
