// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use arboard::Clipboard;
use thiserror::Error;

use crate::latex::document::{self, Flavor};

#[derive(Error, Debug, Clone)]
pub enum ClipboardError {
    #[error("Failed to access clipboard: {0}")]
    AccessError(String),

    #[error("Failed to write to clipboard: {0}")]
    WriteError(String),

    #[error("there is no paper to copy yet")]
    Empty,
}

/// What goes to the clipboard: the bare body, or a compilable document.
pub fn clipboard_text(body: &str, wrapped: bool) -> Result<String, ClipboardError> {
    if body.trim().is_empty() {
        return Err(ClipboardError::Empty);
    }
    Ok(match wrapped {
        true => document::wrap_document(body, Flavor::Clipboard),
        false => body.to_string(),
    })
}

/// The clipboard handle is opened per call; it is not `Send` everywhere.
pub fn copy(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::AccessError(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| ClipboardError::WriteError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_text() {
        assert!(matches!(clipboard_text(" \n", true), Err(ClipboardError::Empty)));
        assert_eq!(clipboard_text("\\section{A}", false).unwrap(), "\\section{A}");

        let wrapped = clipboard_text("\\section{A}", true).unwrap();
        assert!(wrapped.contains("pdfauthor={paperpress}"));
        assert!(wrapped.contains("\\begin{document}\n\n\\section{A}\n\n\\end{document}"));
    }
}
