// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use color_print::cprintln;

use crate::{clipboard, config, environment, record::PaperRecord};

#[derive(clap::Args)]
pub struct CopyCommand {
    /// Copy a complete document that compiles as is, instead of the bare body.
    #[arg(short, long)]
    wrapped: bool,

    /// Print to standard output instead of the clipboard.
    #[arg(long)]
    stdout: bool,

    /// Path to the configuration file (e.g., "Paperpress.toml").
    #[arg(short, long, default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    config: String,
}

pub fn copy(command: &CopyCommand) -> eyre::Result<()> {
    environment::init_environment(command.config.clone().into())?;

    let record = PaperRecord::load(environment::root_dir())?;
    let text = clipboard::clipboard_text(&record.latex_body, command.wrapped)?;
    if command.stdout {
        println!("{}", text.trim_end());
        return Ok(());
    }

    clipboard::copy(&text)?;
    match command.wrapped {
        true => cprintln!("<g>LaTeX document copied to clipboard!</> Paste it into Overleaf and compile with pdflatex."),
        false => cprintln!("<g>LaTeX body copied to clipboard!</>"),
    }
    Ok(())
}
