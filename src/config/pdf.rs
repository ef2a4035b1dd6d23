// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use serde::{Deserialize, Serialize};

use crate::pdf::PaperSize;

#[derive(Deserialize, Debug, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Pdf {
    pub paper_size: PaperSize,
    pub body_size: f32,
}

impl Default for Pdf {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            body_size: 11.0,
        }
    }
}
