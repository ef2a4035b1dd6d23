// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

/// Builds an HTML element as a [`String`].
///
/// ```ignore
/// html!(div class = "center", data_line = {line} => (inner) "\n")
/// ```
///
/// Attribute names have `_` replaced by `-`, attribute values are escaped.
/// Children are any single token tree implementing [`ToString`] and are
/// inserted verbatim, so callers escape text themselves.
#[macro_export]
macro_rules! html {
    ($tag:ident $($attr:ident = $value:expr),* => $($child:tt)*) => {{
        let mut element = String::new();
        element.push('<');
        element.push_str(stringify!($tag));
        $(
            element.push(' ');
            element.push_str(&stringify!($attr).replace('_', "-"));
            element.push_str("=\"");
            element.push_str(&htmlize::escape_attribute(($value).to_string()));
            element.push('"');
        )*
        element.push('>');
        $(
            element.push_str(&($child).to_string());
        )*
        element.push_str("</");
        element.push_str(stringify!($tag));
        element.push('>');
        element
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_html_macro() {
        let line = 3;
        let text = "x";
        assert_eq!(
            crate::html!(div class = "center", data_line = {line} => {text} ("y")),
            r#"<div class="center" data-line="3">xy</div>"#
        );
        assert_eq!(crate::html!(p => ), "<p></p>");
        assert_eq!(
            crate::html!(span title = "a\"b" => "c"),
            r#"<span title="a&quot;b">c</span>"#
        );
    }
}
