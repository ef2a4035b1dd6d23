// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

//! Writing the paper out as `.tex`, `.py` and `.pdf` files named
//! `<slug>-<date>.<ext>`.

use std::{fs, io};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    latex::document::{self, Flavor},
    pdf::{self, FormatOptions, PageGeometry, PaintError, Painter},
    progress::{self, LoadingIndicator},
    record::PaperRecord,
    slug::{self, Ext},
};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("there is no paper to export yet")]
    NoPaper,

    #[error("there is no code to export yet")]
    NoCode,

    #[error("Failed to generate PDF: {0}")]
    Paint(#[from] PaintError),

    #[error("failed to write `{path}`")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub dir: Utf8PathBuf,
    pub date: NaiveDate,
    pub geometry: PageGeometry,
    pub body_size: f32,
    /// Draw a spinner while the PDF is produced.
    pub progress: bool,
}

impl ExportOptions {
    pub fn new(dir: Utf8PathBuf, date: NaiveDate) -> Self {
        Self {
            dir,
            date,
            geometry: PageGeometry::default(),
            body_size: FormatOptions::default().body_size,
            progress: false,
        }
    }

    fn path(&self, record: &PaperRecord, ext: Ext) -> Utf8PathBuf {
        self.dir.join(slug::export_file_name(&record.title, self.date, ext))
    }
}

fn write_file(path: &Utf8Path, bytes: &[u8]) -> Result<(), ExportError> {
    let write_error = |path: &Utf8Path| {
        let path = path.to_owned();
        move |source| ExportError::Write { path, source }
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error(parent))?;
    }
    fs::write(path, bytes).map_err(write_error(path))?;
    log::info!("exported `{}`", path);
    Ok(())
}

pub fn export_tex(record: &PaperRecord, options: &ExportOptions) -> Result<Utf8PathBuf, ExportError> {
    if !record.has_paper() {
        return Err(ExportError::NoPaper);
    }
    let path = options.path(record, Ext::Tex);
    let doc = document::wrap_document(&record.latex_body, Flavor::Export);
    write_file(&path, doc.as_bytes())?;
    Ok(path)
}

pub fn export_python(record: &PaperRecord, options: &ExportOptions) -> Result<Utf8PathBuf, ExportError> {
    if !record.has_code() {
        return Err(ExportError::NoCode);
    }
    let path = options.path(record, Ext::Python);
    write_file(&path, record.python_code.as_bytes())?;
    Ok(path)
}

/// Lay the paper out and replay it on `painter`. Nothing is written unless
/// painting succeeds.
pub fn export_pdf(
    record: &PaperRecord,
    options: &ExportOptions,
    painter: &mut dyn Painter,
) -> Result<Utf8PathBuf, ExportError> {
    if !record.has_paper() {
        return Err(ExportError::NoPaper);
    }

    let mut indicator = match options.progress {
        true => LoadingIndicator::spinner(progress::GENERATING_PDF),
        false => LoadingIndicator::hidden(progress::GENERATING_PDF),
    };
    let format_options = FormatOptions {
        geometry: options.geometry,
        title: record.display_title().to_string(),
        body_size: options.body_size,
    };
    let layout = pdf::format_document(&record.latex_body, &format_options);
    log::debug!("laid out {} page(s)", layout.pages.len());
    let bytes = pdf::paint(&layout, painter)?;
    indicator.clear();

    let path = options.path(record, Ext::Pdf);
    write_file(&path, &bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{PdfPainter, TextOp};

    struct LostCanvas;

    impl Painter for LostCanvas {
        fn begin_page(&mut self, _geometry: &PageGeometry) -> Result<(), PaintError> {
            Ok(())
        }

        fn draw(&mut self, _op: &TextOp) -> Result<(), PaintError> {
            Err(PaintError::Backend("canvas lost".to_string()))
        }

        fn finish(&mut self, _title: &str) -> Result<Vec<u8>, PaintError> {
            Ok(vec![])
        }
    }

    fn record() -> PaperRecord {
        PaperRecord {
            title: "Sparse Attention: A Study".to_string(),
            description: "long context".to_string(),
            latex_body: "\\section{Introduction}\nAttention $\\alpha$ scales.".to_string(),
            python_code: "import torch\n".to_string(),
        }
    }

    fn options(dir: &tempfile::TempDir) -> ExportOptions {
        let dir = Utf8PathBuf::from_path_buf(dir.path().join("exports")).unwrap();
        ExportOptions::new(dir, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
    }

    #[test]
    fn test_export_tex_and_python() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(&dir);

        let tex = export_tex(&record(), &options).unwrap();
        assert_eq!(tex.file_name(), Some("sparse-attention-a-study-2026-03-14.tex"));
        let content = fs::read_to_string(&tex).unwrap();
        assert!(content.starts_with('%'));
        assert!(content.contains("\\documentclass[11pt]{article}"));
        assert!(content.ends_with("\\end{document}\n"));

        let py = export_python(&record(), &options).unwrap();
        assert_eq!(py.file_name(), Some("sparse-attention-a-study-2026-03-14.py"));
        assert_eq!(fs::read_to_string(py).unwrap(), "import torch\n");
    }

    #[test]
    fn test_export_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(&dir);
        let path = export_pdf(&record(), &options, &mut PdfPainter::new()).unwrap();
        assert_eq!(path.extension(), Some("pdf"));
        assert!(fs::read(path).unwrap().starts_with(b"%PDF-"));
    }

    #[test]
    fn test_export_pdf_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(&dir);
        let error = export_pdf(&record(), &options, &mut LostCanvas).unwrap_err();
        assert_eq!(error.to_string(), "Failed to generate PDF: canvas lost");
        assert!(!options.dir.exists());
    }

    #[test]
    fn test_nothing_to_export() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(&dir);
        let empty = PaperRecord::new("Empty", "");
        assert!(matches!(export_tex(&empty, &options), Err(ExportError::NoPaper)));
        assert!(matches!(export_python(&empty, &options), Err(ExportError::NoCode)));
        assert!(matches!(
            export_pdf(&empty, &options, &mut PdfPainter::new()),
            Err(ExportError::NoPaper)
        ));
    }
}
