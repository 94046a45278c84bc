//! User-facing message text (Telegram HTML parse mode).
//!
//! Length limits come from the messenger's capabilities; all counts are in
//! characters of the HTML source, which is never shorter than the rendered text.

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Truncate to `max_len` characters, marking the cut with `...`.
pub fn truncate_text(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut out = s.chars().take(max_len).collect::<String>();
    out.push_str("...");
    out
}

/// Escape `s`, stopping (with `...`) before the escaped text would pass `budget` characters.
fn escape_within(s: &str, budget: usize) -> String {
    let full = escape_html(s);
    if full.chars().count() <= budget {
        return full;
    }

    let budget = budget.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let piece = escape_html(ch.encode_utf8(&mut [0; 4]));
        let len = piece.chars().count();
        if used + len > budget {
            break;
        }
        out.push_str(&piece);
        used += len;
    }
    out.push_str("...");
    out
}

fn code(s: &str, budget: usize) -> String {
    format!("<code>{}</code>", escape_within(s, budget))
}

/// Room for one file name in a caption limited to `max_caption_len`.
fn caption_name_budget(max_caption_len: usize) -> usize {
    (max_caption_len / 2).saturating_sub(64).max(16)
}

/// Caption on the document sent back to the owner.
pub fn renamed_caption(old_name: &str, new_name: &str, max_caption_len: usize) -> String {
    let budget = caption_name_budget(max_caption_len);
    format!(
        "✅ Renamed:\n{} ➜ {}",
        code(old_name, budget),
        code(new_name, budget)
    )
}

/// Caption on the copy forwarded to the channel.
pub fn channel_caption(new_name: &str, max_caption_len: usize) -> String {
    format!(
        "{} uploaded by bot",
        code(new_name, caption_name_budget(max_caption_len))
    )
}

const TEMPLATES_HEADER: &str = "Currently removing templates:";

/// `/templates` reply, split into messages of at most `max_message_len` characters.
///
/// Chunks break between entries, so every chunk is valid HTML on its own. A
/// single entry too long for one message is shortened.
pub fn templates_list(templates: &[String], max_message_len: usize) -> Vec<String> {
    if templates.is_empty() {
        return vec![
            "No templates set. Add one with <code>/addtemplate &lt;text&gt;</code>.".to_string(),
        ];
    }

    // "- <code>" + "</code>" plus room for the header on the first chunk.
    let entry_budget = max_message_len.saturating_sub(TEMPLATES_HEADER.len() + 16).max(16);

    let mut chunks = Vec::new();
    let mut current = TEMPLATES_HEADER.to_string();
    let mut current_len = current.chars().count();
    for t in templates {
        let line = format!("- {}", code(t, entry_budget));
        let line_len = line.chars().count();
        if current_len + 1 + line_len > max_message_len && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(&line);
        current_len += line_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html_specials() {
        assert_eq!(escape_html("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("ééé", 3), "ééé");
        assert_eq!(truncate_text("éééé", 3), "ééé...");
    }

    #[test]
    fn captions_escape_file_names() {
        let c = renamed_caption("<b>x</b>.mkv", "x.mkv", 1024);
        assert!(c.contains("<code>&lt;b&gt;x&lt;/b&gt;.mkv</code>"));
        assert!(c.contains("<code>x.mkv</code>"));
        assert_eq!(
            channel_caption("a&b", 1024),
            "<code>a&amp;b</code> uploaded by bot"
        );
    }

    #[test]
    fn long_names_keep_caption_short() {
        for long in ["n".repeat(5000), "&".repeat(5000)] {
            assert!(renamed_caption(&long, &long, 1024).chars().count() <= 1024);
            assert!(channel_caption(&long, 1024).chars().count() <= 1024);
        }
        // Entities are never cut in half.
        let c = channel_caption(&"&".repeat(5000), 1024);
        assert!(c.contains("&amp;...</code>"));
    }

    #[test]
    fn lists_templates_in_order() {
        let list = vec!["b".to_string(), "<a>".to_string()];
        assert_eq!(
            templates_list(&list, 4096),
            vec!["Currently removing templates:\n- <code>b</code>\n- <code>&lt;a&gt;</code>"]
        );
        let empty = templates_list(&[], 4096);
        assert_eq!(empty.len(), 1);
        assert!(empty[0].starts_with("No templates set"));
    }

    #[test]
    fn long_template_lists_are_split_between_entries() {
        let list: Vec<String> = ["a", "b", "c"].iter().map(|c| c.repeat(1500)).collect();
        let chunks = templates_list(&list, 4096);
        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 4096);
            assert_eq!(chunk.matches("<code>").count(), chunk.matches("</code>").count());
        }
        assert!(chunks[0].starts_with("Currently removing templates:"));
        let joined = chunks.join("\n");
        for t in &list {
            assert!(joined.contains(&format!("<code>{t}</code>")));
        }
    }

    #[test]
    fn oversized_template_is_shortened_to_fit() {
        let list = vec!["<".repeat(5000), "ok".to_string()];
        let chunks = templates_list(&list, 4096);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4096));
        assert!(chunks[0].contains("&lt;...</code>"));
        assert!(chunks.last().unwrap().ends_with("<code>ok</code>"));
    }
}
