// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use std::{fs, io};

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{eyre, WrapErr};
use serde::{Deserialize, Serialize};

pub const PAPER_DIR: &str = "paper";
pub const META_FILE: &str = "paper.toml";
pub const BODY_FILE: &str = "body.tex";
pub const CODE_FILE: &str = "experiment.py";

/// The generated paper and its experiment code.
///
/// `latex_body` is a bare body: no document class, no preamble and no
/// `document` environment. The body and code are stored as plain files so
/// they can be edited by hand between commands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaperRecord {
    pub title: String,
    pub description: String,
    pub latex_body: String,
    pub python_code: String,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default, rename_all = "kebab-case")]
struct PaperMeta {
    title: String,
    description: String,
}

pub fn paper_dir(root: &Utf8Path) -> Utf8PathBuf {
    root.join(PAPER_DIR)
}

pub fn body_path(root: &Utf8Path) -> Utf8PathBuf {
    paper_dir(root).join(BODY_FILE)
}

pub fn code_path(root: &Utf8Path) -> Utf8PathBuf {
    paper_dir(root).join(CODE_FILE)
}

fn read_or_empty(path: &Utf8Path) -> eyre::Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e).wrap_err_with(|| eyre!("failed to read `{}`", path)),
    }
}

impl PaperRecord {
    pub fn new<S: Into<String>>(title: S, description: S) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Load the record under `root`; missing files read as empty.
    pub fn load(root: &Utf8Path) -> eyre::Result<Self> {
        let dir = paper_dir(root);
        let meta_path = dir.join(META_FILE);
        let meta: PaperMeta = toml::from_str(&read_or_empty(&meta_path)?)
            .wrap_err_with(|| eyre!("failed to parse `{}`", meta_path))?;
        Ok(Self {
            title: meta.title,
            description: meta.description,
            latex_body: read_or_empty(&dir.join(BODY_FILE))?,
            python_code: read_or_empty(&dir.join(CODE_FILE))?,
        })
    }

    pub fn save(&self, root: &Utf8Path) -> eyre::Result<()> {
        let dir = paper_dir(root);
        fs::create_dir_all(&dir).wrap_err_with(|| eyre!("failed to create `{}`", dir))?;

        let meta = PaperMeta {
            title: self.title.clone(),
            description: self.description.clone(),
        };
        let meta = toml::to_string(&meta).wrap_err("failed to serialize paper metadata")?;
        for (name, content) in [
            (META_FILE, meta.as_str()),
            (BODY_FILE, self.latex_body.as_str()),
            (CODE_FILE, self.python_code.as_str()),
        ] {
            let path = dir.join(name);
            fs::write(&path, content).wrap_err_with(|| eyre!("failed to write `{}`", path))?;
        }
        Ok(())
    }

    pub fn has_paper(&self) -> bool {
        !self.latex_body.trim().is_empty()
    }

    pub fn has_code(&self) -> bool {
        !self.python_code.trim().is_empty()
    }

    /// The title, or a placeholder when it is blank.
    pub fn display_title(&self) -> &str {
        match self.title.trim() {
            "" => "Untitled paper",
            title => title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn root(dir: &tempfile::TempDir) -> &Utf8Path {
        Utf8Path::from_path(dir.path()).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let record = PaperRecord {
            title: "Sparse \"Attention\"".to_string(),
            description: "multi\nline".to_string(),
            latex_body: "\\section{Intro}\n".to_string(),
            python_code: "import torch\n".to_string(),
        };
        record.save(root(&dir)).unwrap();
        assert_eq!(PaperRecord::load(root(&dir)).unwrap(), record);
        assert!(root(&dir).join("paper/body.tex").exists());
    }

    #[test]
    fn test_missing_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let record = PaperRecord::load(root(&dir)).unwrap();
        assert_eq!(record, PaperRecord::default());
        assert!(!record.has_paper());
        assert_eq!(record.display_title(), "Untitled paper");
    }

    #[test]
    fn test_corrupt_meta() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(paper_dir(root(&dir))).unwrap();
        fs::write(paper_dir(root(&dir)).join(META_FILE), "title = ").unwrap();
        assert!(PaperRecord::load(root(&dir)).is_err());
    }
}
