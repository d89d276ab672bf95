/// Whitespace-delimited word count, matching how the backend reports
/// `word_count` for extracted text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Collapse text to a single line and truncate it for log/status display.
pub fn preview_line(text: &str, max_chars: usize) -> String {
    let collapsed: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let truncated: String = collapsed.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{truncated}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_splits_on_any_whitespace() {
        assert_eq!(word_count("Experienced  developer\nwith Rust"), 4);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
    }

    #[test]
    fn preview_collapses_and_truncates() {
        assert_eq!(preview_line("a b c", 10), "a b c");
        let long = "word ".repeat(20);
        let preview = preview_line(&long, 12);
        assert!(preview.chars().count() <= 12);
        assert!(preview.ends_with('…'));
    }
}
