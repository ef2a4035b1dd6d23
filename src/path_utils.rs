// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Posix-style path with `.` and `..` resolved lexically.
pub fn pretty_path(path: &Utf8Path) -> String {
    let mut segments = Vec::new();
    for c in path.components() {
        match c {
            Utf8Component::Prefix(_) | Utf8Component::RootDir | Utf8Component::CurDir => (),
            Utf8Component::ParentDir => {
                segments.pop();
            }
            Utf8Component::Normal(_) => segments.push(c.as_str()),
        }
    }
    segments.join("/")
}

/// `path` relative to `root` for status lines; paths outside `root` are
/// shown as they are.
pub fn display_path(root: &Utf8Path, path: &Utf8Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) => pretty_path(relative),
        Err(_) => path.to_string(),
    }
}

pub fn split_file_name(path: &Utf8Path) -> Option<(&Utf8Path, &str)> {
    let mut components = path.components();
    let name = components.next_back();
    let base = components.as_path();
    Some((base, name?.as_str()))
}

/// Move an unreadable state file to `<name>.bak` so the next save cannot
/// overwrite it. An older backup is replaced.
pub fn set_aside(path: &Utf8Path) -> Option<Utf8PathBuf> {
    let backup = Utf8PathBuf::from(format!("{}.bak", path));
    match std::fs::rename(path, &backup) {
        Ok(()) => Some(backup),
        Err(e) => {
            log::warn!("failed to move `{}` aside: {}", path, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_base() {
        assert_eq!(split_file_name("a/b".into()), Some(("a".into(), "b")));
        assert_eq!(split_file_name("./Paperpress.toml".into()), Some((".".into(), "Paperpress.toml")));
        assert_eq!(split_file_name("a".into()), Some(("".into(), "a")));
        assert_eq!(split_file_name("".into()), None);
    }

    #[test]
    fn test_display_path() {
        assert_eq!(pretty_path("./exports/../exports/a.pdf".into()), "exports/a.pdf");
        assert_eq!(display_path("/work".into(), "/work/./exports/a.pdf".into()), "exports/a.pdf");
        assert_eq!(display_path("/work".into(), "/tmp/a.pdf".into()), "/tmp/a.pdf");
    }

    #[test]
    fn test_set_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("chat.json")).unwrap();
        std::fs::write(&path, "{ broken").unwrap();

        let backup = set_aside(&path).unwrap();
        assert_eq!(backup.file_name(), Some("chat.json.bak"));
        assert!(!path.exists());
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "{ broken");
        assert_eq!(set_aside(&path), None);
    }
}
