// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Export {
    pub dir: String,
}

impl Default for Export {
    fn default() -> Self {
        Self {
            dir: "./exports".to_string(),
        }
    }
}
