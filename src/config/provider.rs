// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use serde::{Deserialize, Serialize};

use crate::provider::ProviderKind;

#[derive(Deserialize, Debug, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Provider {
    pub kind: ProviderKind,

    /// Falls back to the default model of `kind`.
    pub model: Option<String>,

    /// The generator program and its arguments. `<provider>` and `<model>`
    /// are substituted before it runs.
    pub command: Vec<String>,
}

impl Default for Provider {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            model: None,
            command: ["paperpress-llm", "--provider", "<provider>", "--model", "<model>"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Provider {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(self.kind.default_model())
    }
}
