use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered colorizing table applied to the refined text.
///
/// Placeholders from the markup stage come back as HTML, hyphens are
/// normalized to U+2015 horizontal bars, page and volume markers are
/// wrapped in colored blocks, and parenthesized asides are set off in
/// green. Rules run sequentially; the dash normalization must precede the
/// marker wrapping and the final space squeeze must come last.
const COLOR_RULES: &[(&str, &str)] = &[
    ("FOREIGNOPEN", ""),
    ("FOREIGNCLOSE", ""),
    ("OPENTABLE", "<Table>"),
    ("ROWROLDATA", r#"<row role="data">"#),
    ("CELLROLEROWSDATA", r#"<cell role="data" rows="1" cols="1">"#),
    ("CLOSECELL", "</cell>"),
    ("CLOSEROW", "</row>"),
    ("CLOSETABLE", "</Table>"),
    ("HI_OPEN", r#"<b><i><FONT COLOR="DarkBlue">"#),
    ("HI_CLOSE", "</FONT></i></b>"),
    ("― - ", "―"),
    ("-", "―"),
    ("― ―", "―"),
    (
        r"((―|-)*a[0-9]+(―|-)+)",
        r#"<p></p><b><FONT COLOR="DarkSlateGray">[${1}]</FONT></b>"#,
    ),
    (
        r"((―|-)*b[0-9]+(―|-)+)",
        r#"<p></p><b><FONT COLOR="DarkRed">[${1}]</FONT></b>"#,
    ),
    (
        r"((―|-)*A[0-9]+(―|-)+)",
        r#"<p></p><b><FONT COLOR="SaddleBrown">[${1}]</FONT></b>"#,
    ),
    (
        r"((―|-)*B[0-9]+(―|-)+)",
        r#"<p></p><b><FONT COLOR="Indigo">[${1}]</FONT></b>"#,
    ),
    (
        r"(\(.+?[^(\n\f\r]\))",
        r#"<b><i><FONT COLOR="DarkOliveGreen"> ${1} </FONT></i></b>"#,
    ),
    (r"[ ]{2,}", " "),
];

static COLORS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    COLOR_RULES
        .iter()
        .map(|&(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
        .collect()
});

/// Apply the colorizing table to the refined text.
pub fn colorize_text(text: &str) -> String {
    let mut content = text.to_string();
    for (re, replacement) in COLORS.iter() {
        let rewritten = re.replace_all(&content, *replacement);
        if let Cow::Owned(rewritten) = rewritten {
            content = rewritten;
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::refine::TAB_SENTINEL;

    #[test]
    fn restores_placeholders_as_colored_markup() {
        let input = format!("word{TAB_SENTINEL}HI_OPENtext HI_CLOSE FOREIGNOPEN FOREIGNCLOSE");
        let out = colorize_text(&input);
        assert!(out.contains(r#"<FONT COLOR="DarkBlue">"#));
        assert!(out.contains("</FONT>"));
        assert!(!out.contains("HI_OPEN"));
        assert!(!out.contains("FOREIGNOPEN"));
        assert!(out.contains(TAB_SENTINEL));
    }

    #[test]
    fn hyphens_become_horizontal_bars() {
        assert_eq!(colorize_text("x - y"), "x ― y");
    }

    #[test]
    fn wraps_page_markers_in_colored_blocks() {
        let out = colorize_text("foo a123- bar");
        assert!(out.contains(r#"<FONT COLOR="DarkSlateGray">"#));
        assert!(out.contains("[a123―]"));
    }

    #[test]
    fn wraps_parentheticals_in_green() {
        let out = colorize_text("word (an aside) rest");
        assert!(out.contains(r#"<FONT COLOR="DarkOliveGreen"> (an aside) </FONT>"#));
    }

    #[test]
    fn squeezes_runs_of_spaces() {
        assert_eq!(colorize_text("a    b"), "a b");
    }
}
