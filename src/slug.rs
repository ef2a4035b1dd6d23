// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use std::{fmt::Display, sync::LazyLock};

use chrono::NaiveDate;
use regex_lite::Regex;

pub const FALLBACK_SLUG: &str = "research-paper";

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// File-name-safe form of a paper title.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Slug(String);

impl Slug {
    pub fn new<S: AsRef<str>>(title: S) -> Self {
        Self(slugify(title.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for Slug {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ext {
    Pdf,
    Tex,
    Python,
    Html,
}

impl Display for Ext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Ext::Pdf => "pdf",
            Ext::Tex => "tex",
            Ext::Python => "py",
            Ext::Html => "html",
        };
        write!(f, "{s}")
    }
}

/// Lowercase, collapse every run of characters outside `[a-z0-9]` into one
/// hyphen and trim hyphens from both ends.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let slug = NON_ALNUM.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// `<slug>-<YYYY-MM-DD>.<ext>`
pub fn export_file_name(title: &str, date: NaiveDate, ext: Ext) -> String {
    format!("{}-{}.{}", Slug::new(title), date.format("%Y-%m-%d"), ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(
            slugify("AdaLoRA: Efficient Fine-Tuning!"),
            "adalora-efficient-fine-tuning"
        );
        assert_eq!(slugify("  Attention   Is All You Need "), "attention-is-all-you-need");
        assert_eq!(slugify("GPT-4 & Beyond (2025)"), "gpt-4-beyond-2025");
        assert_eq!(slugify("Über Größe"), "ber-gr-e");
    }

    #[test]
    fn test_slugify_fallback() {
        assert_eq!(slugify(""), FALLBACK_SLUG);
        assert_eq!(slugify("!!!"), FALLBACK_SLUG);
        assert_eq!(slugify("∑∫∂"), FALLBACK_SLUG);
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(
            export_file_name("AdaLoRA: Efficient Fine-Tuning!", date, Ext::Pdf),
            "adalora-efficient-fine-tuning-2025-03-07.pdf"
        );
        assert_eq!(export_file_name("", date, Ext::Python), "research-paper-2025-03-07.py");
        assert_eq!(Slug::new("A B"), "a-b");
    }
}
