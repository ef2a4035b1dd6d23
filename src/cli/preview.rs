// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use color_print::ceprintln;
use eyre::{eyre, WrapErr};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::{
    config, environment, html_flake,
    math::FidelityTier,
    preview::{self, PreviewOptions},
    record::PaperRecord,
    settings::{self, Settings, Tab},
};

#[derive(clap::Args)]
pub struct PreviewCommand {
    /// Re-render whenever a file under `paper/` changes.
    #[arg(short, long)]
    watch: bool,

    /// How math is rendered, overriding `[preview] math`.
    #[arg(long, value_enum)]
    math: Option<FidelityTier>,

    /// Which pane comes first when the code is shown (remembered).
    #[arg(long, value_parser = ["paper", "code"])]
    tab: Option<String>,

    /// Width of the paper pane in percent, 20 to 80 (remembered).
    #[arg(long, value_parser = clap::value_parser!(u8).range(20..=80))]
    split: Option<u8>,

    /// Path to the configuration file (e.g., "Paperpress.toml").
    #[arg(short, long, default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    config: String,
}

pub fn preview(command: &PreviewCommand) -> eyre::Result<()> {
    environment::init_environment(command.config.clone().into())?;

    let settings = remember_view(command)?;
    let mut options = environment::preview_options();
    if let Some(math) = command.math {
        options.tier = math;
    }

    let output = environment::preview_output();
    let write_preview = || -> eyre::Result<()> {
        let record = PaperRecord::load(environment::root_dir())?;
        if !record.has_paper() {
            ceprintln!("<y>Warning: the paper is empty, run `paperpress generate` first.</>");
        }
        let page = render_page(&record, &options, &settings, environment::show_code());
        write_file(&output, &page)
    };

    write_preview()?;
    println!("Wrote preview to: {}", environment::display_path(&output));

    if command.watch {
        watch_paths(&[environment::paper_dir()], |_| write_preview())?;
    }
    Ok(())
}

/// Store the view flags given on the command line and return the settings.
fn remember_view(command: &PreviewCommand) -> eyre::Result<Settings> {
    let mut settings = environment::load_settings();
    if command.tab.is_none() && command.split.is_none() {
        return Ok(settings);
    }
    if let Some(tab) = &command.tab {
        settings.set(settings::VIEW_TAB, tab);
    }
    if let Some(split) = command.split {
        settings.set(settings::VIEW_SPLIT, split.to_string());
    }
    settings.save(&environment::settings_path())?;
    Ok(settings)
}

/// The preview page: the paper alone, or next to its code.
pub fn render_page(record: &PaperRecord, options: &PreviewOptions, settings: &Settings, show_code: bool) -> String {
    let body = preview::render_preview(&record.latex_body, options);
    let title = record.display_title();
    match show_code && record.has_code() {
        true => html_flake::html_split_doc(
            title,
            &body,
            &record.python_code,
            settings.split(),
            settings.tab() == Tab::Code,
        ),
        false => html_flake::html_doc(title, &body),
    }
}

fn write_file(path: &Utf8Path, content: &str) -> eyre::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).wrap_err_with(|| eyre!("failed to create `{}`", parent))?;
    }
    std::fs::write(path, content).wrap_err_with(|| eyre!("failed to write `{}`", path))
}

/// from: https://github.com/notify-rs/notify/blob/main/examples/monitor_raw.rs#L18
fn watch_paths<F>(watched_paths: &[Utf8PathBuf], action: F) -> eyre::Result<()>
where
    F: Fn(&Utf8Path) -> eyre::Result<()>,
{
    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = RecommendedWatcher::new(tx, Config::default())?;

    print!("[watch] ");
    for watched_path in watched_paths {
        if !watched_path.exists() {
            ceprintln!("<y>[watch] Warning: Path \"{}\" does not exist, skipping.</>", watched_path);
            continue;
        }
        watcher.watch(watched_path.as_std_path(), RecursiveMode::Recursive)?;
        print!("\"{}\"  ", watched_path);
    }
    println!("\n\nPress Ctrl+C to stop watching.\n");

    for res in rx {
        match res {
            Ok(event) => {
                // Windows only reports `Modify(Any)`, so every modification counts.
                if let EventKind::Modify(_) = event.kind {
                    for path in event.paths {
                        println!("[watch] Change: {path:?}");
                        std::io::stdout().flush()?;
                        if let Ok(p) = <&Utf8Path>::try_from(path.as_path()) {
                            if let Err(error) = action(p) {
                                ceprintln!("<r>[watch] Error: {:?}</>", error);
                            }
                        }
                    }
                }
            }
            Err(error) => ceprintln!("<r>[watch] Error: {:?}</>", error),
        }
    }

    Ok(())
}
