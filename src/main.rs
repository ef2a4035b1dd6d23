// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

mod chat;
mod cli;
mod clipboard;
mod config;
mod counter;
mod environment;
mod export;
mod html_flake;
mod html_macro;
mod latex;
mod math;
mod path_utils;
mod pdf;
mod preview;
mod progress;
mod provider;
mod record;
mod session;
mod settings;
mod slug;

use clap::Parser;

use crate::cli::{
    chat::ChatCommand,
    copy::CopyCommand,
    export::ExportCommand,
    generate::GenerateCommand,
    history::HistoryCommand,
    key::{KeyCommand, KeyCommandCli},
    new::NewCommand,
    preview::PreviewCommand,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print debug logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Create a new paper workspace.
    #[command(visible_alias = "n")]
    New(NewCommand),

    /// Write the paper and its experiment code from the title and description.
    #[command(visible_alias = "g")]
    Generate(GenerateCommand),

    /// Ask for a change to the paper or the code, or ask a question.
    #[command(visible_alias = "c")]
    Chat(ChatCommand),

    /// Show the conversation so far.
    #[command()]
    History(HistoryCommand),

    /// Render the paper to an HTML page, and re-render it on changes with `--watch`.
    #[command(visible_alias = "p")]
    Preview(PreviewCommand),

    /// Write the paper as PDF or LaTeX, or the code as Python.
    #[command(visible_alias = "e")]
    Export(ExportCommand),

    /// Copy the LaTeX source to the clipboard.
    #[command()]
    Copy(CopyCommand),

    /// Manage provider API keys.
    #[command(visible_alias = "k")]
    Key(KeyCommandCli),
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match &cli.command {
        Command::New(command) => crate::cli::new::new_workspace(command)?,
        Command::Generate(command) => crate::cli::generate::generate(command)?,
        Command::Chat(command) => crate::cli::chat::chat(command)?,
        Command::History(command) => crate::cli::history::history(command)?,
        Command::Preview(command) => crate::cli::preview::preview(command)?,
        Command::Export(command) => crate::cli::export::export(command)?,
        Command::Copy(command) => crate::cli::copy::copy(command)?,
        Command::Key(KeyCommandCli { command }) => match command {
            KeyCommand::Set(command) => crate::cli::key::set_key(command)?,
            KeyCommand::Clear(command) => crate::cli::key::clear_key(command)?,
            KeyCommand::List(command) => crate::cli::key::list_keys(command)?,
        },
    };
    Ok(())
}
