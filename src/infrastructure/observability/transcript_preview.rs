const MAX_VISIBLE_CHARS: usize = 40;

/// Short, bounded rendering of respondent text for log lines.
pub fn transcript_preview(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total = trimmed.chars().count();
    let visible: String = trimmed
        .chars()
        .take(MAX_VISIBLE_CHARS)
        .map(|c| if c.is_ascii_digit() { '#' } else { c })
        .collect();

    if total > MAX_VISIBLE_CHARS {
        format!("{}... ({} chars total)", visible, total)
    } else {
        visible
    }
}
