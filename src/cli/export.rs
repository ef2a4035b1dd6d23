// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use camino::Utf8PathBuf;
use color_print::cprintln;

use crate::{
    config, environment,
    export::{self, ExportError, ExportOptions},
    pdf::{PaperSize, PdfPainter},
    record::PaperRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// The synthetic PDF, with math approximated in Unicode.
    Pdf,
    /// A standalone LaTeX document.
    Tex,
    /// The experiment code.
    Py,
    /// Everything there is to export.
    All,
}

#[derive(clap::Args)]
pub struct ExportCommand {
    #[arg(value_enum)]
    format: Format,

    /// Page size of the PDF, overriding `[pdf] paper-size`.
    #[arg(long, value_enum)]
    paper_size: Option<PaperSize>,

    /// Path to the configuration file (e.g., "Paperpress.toml").
    #[arg(short, long, default_value_t = config::DEFAULT_CONFIG_PATH.into())]
    config: String,
}

pub fn export(command: &ExportCommand) -> eyre::Result<()> {
    environment::init_environment(command.config.clone().into())?;

    let record = PaperRecord::load(environment::root_dir())?;
    let mut options = environment::export_options(chrono::Utc::now().date_naive());
    if let Some(paper_size) = command.paper_size {
        options.geometry = paper_size.geometry();
    }

    for path in export_with(&record, &options, command.format)? {
        cprintln!("<g>Exported</> {}", environment::display_path(&path));
    }
    Ok(())
}

fn export_with(record: &PaperRecord, options: &ExportOptions, format: Format) -> Result<Vec<Utf8PathBuf>, ExportError> {
    let pdf = || export::export_pdf(record, options, &mut PdfPainter::new());
    match format {
        Format::Pdf => Ok(vec![pdf()?]),
        Format::Tex => Ok(vec![export::export_tex(record, options)?]),
        Format::Py => Ok(vec![export::export_python(record, options)?]),
        Format::All => {
            let mut paths = vec![export::export_tex(record, options)?, pdf()?];
            if record.has_code() {
                paths.push(export::export_python(record, options)?);
            }
            Ok(paths)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_export_all() {
        let dir = tempfile::tempdir().unwrap();
        let dir = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let options = ExportOptions::new(dir.clone(), NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        let mut record = PaperRecord::new("Tiny", "");
        record.latex_body = "\\section{One}\nText.".to_string();

        let paths = export_with(&record, &options, Format::All).unwrap();
        let names: Vec<_> = paths.iter().filter_map(|p| p.file_name()).collect();
        assert_eq!(names, ["tiny-2026-01-02.tex", "tiny-2026-01-02.pdf"]);

        assert!(matches!(export_with(&record, &options, Format::Py), Err(ExportError::NoCode)));
    }
}
