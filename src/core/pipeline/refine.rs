/// Placeholder that keeps the key/definition separator safe while the
/// colorizing rules run over the text.
pub const TAB_SENTINEL: &str = "#####_____#####_____#####";

/// Clean the combined tabfile text: protect the tab separators, flatten
/// escaped newlines, and drop the `<k>` headword wrappers, leaving every
/// definition on one physical line.
pub fn refine_text(text: &str) -> String {
    let content = text.replace('\t', TAB_SENTINEL);
    let content = content.replace("\\n", "<br>");
    let content = content.replace("<k>", "");
    let content = content.replace("</k>", "");
    content.replace("<br>", " ")
}

/// Swap the sentinel back to a real tab and guarantee a trailing newline.
/// This is the last rewrite before the StarDict writer parses the file.
pub fn restore_tabs(text: &str) -> String {
    let mut content = text.replace(TAB_SENTINEL, "\t");
    if !content.ends_with('\n') {
        content.push('\n');
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protects_tabs_and_flattens_markup() {
        let out = refine_text("word\tdefinition with \\n newline <k>key</k>");
        assert!(!out.contains('\t'));
        assert!(out.contains(TAB_SENTINEL));
        assert!(!out.contains("\\n"));
        assert!(!out.contains("<k>"));
        assert!(!out.contains("<br>"));
    }

    #[test]
    fn escaped_newlines_become_spaces() {
        assert_eq!(refine_text("a\\nb"), "a b");
    }

    #[test]
    fn restore_tabs_round_trips_and_terminates_file() {
        let refined = refine_text("word\tdef");
        assert_eq!(restore_tabs(&refined), "word\tdef\n");
    }

    #[test]
    fn restore_tabs_keeps_existing_trailing_newline() {
        assert_eq!(restore_tabs("a\tb\n"), "a\tb\n");
    }
}
