// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Paper {
    /// Holds the conversation and the local settings.
    pub state_dir: String,

    /// Show the experiment code next to the paper in the preview page.
    pub show_code: bool,
}

impl Default for Paper {
    fn default() -> Self {
        Self {
            state_dir: "./.paperpress".to_string(),
            show_code: true,
        }
    }
}
