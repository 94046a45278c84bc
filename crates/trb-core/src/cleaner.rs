use std::sync::OnceLock;

use regex::Regex;

static SEPARATOR_RUN: OnceLock<Regex> = OnceLock::new();

fn separator_run() -> &'static Regex {
    SEPARATOR_RUN.get_or_init(|| Regex::new(r"[\s_-]+").expect("valid regex"))
}

/// Strip every template from `name`, then normalize separators.
///
/// Templates are applied in list order as literal, case-sensitive substrings;
/// each one removes all of its non-overlapping occurrences. Afterwards every
/// run of whitespace, `_` and `-` becomes a single space and the ends are
/// trimmed. An empty result is returned as-is; callers decide what to do.
pub fn clean_filename(name: &str, templates: &[String]) -> String {
    let mut out = name.to_string();
    for template in templates {
        if template.is_empty() {
            continue;
        }
        if out.contains(template.as_str()) {
            out = out.replace(template.as_str(), "");
        }
    }

    separator_run().replace_all(&out, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn removes_templates_then_collapses_separators() {
        assert_eq!(
            clean_filename("My_Show - S01E01.mkv", &t(&["My_Show", " - "])),
            "S01E01.mkv"
        );
    }

    #[test]
    fn normalizes_without_templates() {
        assert_eq!(clean_filename("a---b___c", &[]), "a b c");
        assert_eq!(clean_filename("  a \t b\n", &[]), "a b");
        assert_eq!(clean_filename("plain.txt", &[]), "plain.txt");
    }

    #[test]
    fn removes_every_occurrence_case_sensitively() {
        assert_eq!(
            clean_filename("[HD] part [HD] two [hd].mp4", &t(&["[HD]"])),
            "part two [hd].mp4"
        );
    }

    #[test]
    fn templates_are_literal_not_patterns() {
        assert_eq!(clean_filename("a.b.c axbxc", &t(&["."])), "abc axbxc");
        assert_eq!(clean_filename("x(1)+y", &t(&["(1)+"])), "xy");
    }

    #[test]
    fn template_order_matters() {
        // "ab" first eats the overlap, so "bc" never matches.
        assert_eq!(clean_filename("abc", &t(&["ab", "bc"])), "c");
        assert_eq!(clean_filename("abc", &t(&["bc", "ab"])), "a");
    }

    #[test]
    fn removal_can_expose_new_matches_for_later_templates() {
        assert_eq!(clean_filename("fooXbar", &t(&["X", "foobar"])), "");
    }

    #[test]
    fn empty_result_is_not_replaced() {
        assert_eq!(clean_filename("@chan", &t(&["@chan"])), "");
        assert_eq!(clean_filename("_-_", &[]), "");
    }

    #[test]
    fn empty_templates_are_ignored() {
        assert_eq!(clean_filename("a_b", &t(&["", "b"])), "a");
    }

    #[test]
    fn is_deterministic_and_idempotent_once_templates_are_gone() {
        let templates = t(&["@uploader", "[720p]"]);
        let names = [
            "@uploader Movie_Name [720p].mkv",
            "--Some   file__name--.pdf",
            "nothing to strip.zip",
        ];
        for name in names {
            let once = clean_filename(name, &templates);
            assert_eq!(once, clean_filename(name, &templates));
            assert!(templates.iter().all(|t| !once.contains(t.as_str())));
            assert_eq!(clean_filename(&once, &templates), once);
        }
    }
}
