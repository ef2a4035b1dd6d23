// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

/// Environments whose body is taken literally, comments included.
pub const VERBATIM_ENVS: &[&str] = &["verbatim", "lstlisting", "minted", "Verbatim"];

/// Remove `%` comments. Lines consisting only of a comment are dropped
/// entirely so they never introduce a paragraph break; `\%` is kept.
/// The bodies of [`VERBATIM_ENVS`] are copied unchanged.
pub fn strip_comments(src: &str) -> String {
    let src = normalize_newlines(src);
    let mut out = String::with_capacity(src.len());
    let mut verbatim: Option<&str> = None;
    'lines: for line in src.split('\n') {
        // Comments are only looked for from `literal_end` on.
        let mut literal_end = 0;
        if let Some(name) = verbatim {
            match find_end(line, 0, name) {
                Some(end) => {
                    verbatim = None;
                    literal_end = end;
                }
                None => {
                    out.push_str(line);
                    out.push('\n');
                    continue;
                }
            }
        }

        let comment = loop {
            let comment = comment_start(&line[literal_end..]).map(|index| literal_end + index);
            match find_begin(line, literal_end) {
                Some((begin, name)) if comment.map_or(true, |index| begin < index) => {
                    match find_end(line, begin, name) {
                        Some(end) => literal_end = end,
                        None => {
                            verbatim = Some(name);
                            out.push_str(line);
                            out.push('\n');
                            continue 'lines;
                        }
                    }
                }
                _ => break comment,
            }
        };

        match comment {
            Some(index) if literal_end == 0 && line[..index].trim().is_empty() => continue,
            Some(index) => out.push_str(line[..index].trim_end()),
            None => out.push_str(line),
        }
        out.push('\n');
    }
    out.pop();
    out
}

/// Byte index and name of the first verbatim environment opened in `line`
/// at or after `from`.
fn find_begin(line: &str, from: usize) -> Option<(usize, &'static str)> {
    VERBATIM_ENVS
        .iter()
        .filter_map(|name| {
            let index = line[from..].find(&format!("\\begin{{{}}}", name))?;
            Some((from + index, *name))
        })
        .min_by_key(|(index, _)| *index)
}

/// Byte offset just past the `\end{name}` closing at or after `from`.
fn find_end(line: &str, from: usize, name: &str) -> Option<usize> {
    let end = format!("\\end{{{}}}", name);
    line[from..].find(&end).map(|index| from + index + end.len())
}

pub fn normalize_newlines(src: &str) -> String {
    src.replace("\r\n", "\n").replace('\r', "\n")
}

/// Byte index of the first unescaped `%` in `line`.
fn comment_start(line: &str) -> Option<usize> {
    let mut backslashes = 0;
    for (index, c) in line.char_indices() {
        match c {
            '\\' => backslashes += 1,
            '%' if backslashes % 2 == 0 => return Some(index),
            _ => backslashes = 0,
        }
    }
    None
}

/// Line number (0-based) of byte offset `pos` in `src`.
pub fn line_of(src: &str, pos: usize) -> usize {
    src[..pos.min(src.len())].matches('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("a % note\nb"), "a\nb");
        assert_eq!(strip_comments("50\\% of % cut"), "50\\% of");
        assert_eq!(strip_comments("a\n% whole line\nb"), "a\nb");
        assert_eq!(strip_comments("a\\\\% after break"), "a\\\\");
        assert_eq!(strip_comments("x\r\ny"), "x\ny");
    }

    #[test]
    fn test_verbatim_keeps_percent() {
        let src = "% head\n\\begin{verbatim}\nrate = 0.5  % fifty percent\n% whole line\n\\end{verbatim} % tail\nafter % cut";
        assert_eq!(
            strip_comments(src),
            "\\begin{verbatim}\nrate = 0.5  % fifty percent\n% whole line\n\\end{verbatim}\nafter"
        );
        assert_eq!(
            strip_comments("\\begin{lstlisting}[language=Python] % kept\nx %= 2\n\\end{lstlisting}"),
            "\\begin{lstlisting}[language=Python] % kept\nx %= 2\n\\end{lstlisting}"
        );
        assert_eq!(strip_comments("% \\begin{verbatim}\na % b"), "a");
        assert_eq!(strip_comments("\\begin{verbatim}a%b\\end{verbatim} % c\nd % e"), "\\begin{verbatim}a%b\\end{verbatim}\nd");
    }

    #[test]
    fn test_line_of() {
        assert_eq!(line_of("a\nb\nc", 0), 0);
        assert_eq!(line_of("a\nb\nc", 2), 1);
        assert_eq!(line_of("a\nb\nc", 99), 2);
    }
}
