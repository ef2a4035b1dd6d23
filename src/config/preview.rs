// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use serde::{Deserialize, Serialize};

use crate::math::FidelityTier;

#[derive(Deserialize, Debug, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Preview {
    pub math: FidelityTier,
    pub vspace_px_per_cm: f32,
    pub output: String,
}

impl Default for Preview {
    fn default() -> Self {
        Self {
            math: FidelityTier::Typeset,
            vspace_px_per_cm: 16.0,
            output: "./.paperpress/preview.html".to_string(),
        }
    }
}
