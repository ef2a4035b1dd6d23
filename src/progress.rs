// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub const GENERATING_PDF: &str = "Generating PDF...";

/// A transient spinner. It is removed by [`LoadingIndicator::clear`] and
/// again on drop, so an early return or a panic never leaves it behind.
pub struct LoadingIndicator {
    bar: Option<ProgressBar>,
}

impl LoadingIndicator {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self::with_bar(bar, message)
    }

    /// Same bookkeeping, nothing drawn.
    #[must_use]
    pub fn hidden(message: &str) -> Self {
        Self::with_bar(ProgressBar::hidden(), message)
    }

    fn with_bar(bar: ProgressBar, message: &str) -> Self {
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        self.clear();
    }
}
