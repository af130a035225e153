// file: src/fetcher/excerpt.rs
// description: markup stripping and word-bounded excerpt accumulation

use scraper::Html;

/// Tags whose content is never visible text.
const NON_TEXT_TAGS: &[&str] = &["script", "style", "noscript"];

/// Extract visible text from raw HTML, whitespace-collapsed.
///
/// Script, style and noscript blocks are removed before parsing; everything
/// else contributes its text nodes, joined by single spaces.
pub fn page_text(html: &str) -> String {
    let mut cleaned = html.to_owned();
    for tag in NON_TEXT_TAGS {
        cleaned = strip_tag(&cleaned, tag);
    }

    let document = Html::parse_document(&cleaned);
    let text: Vec<&str> = document
        .root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect();

    text.join(" ")
}

/// Accumulate whole words from `text` into an excerpt of at most `max_chars`
/// characters. Stops before the word that would exceed the budget, so the
/// excerpt always ends at a word boundary (or is empty).
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        // +1 accounts for the separating space.
        if used + word_chars + 1 > max_chars {
            break;
        }
        out.push(' ');
        out.push_str(word);
        used += word_chars + 1;
    }

    out.trim_start().to_owned()
}

/// Remove every instance of `tag` and its content, case-insensitively.
fn strip_tag(html: &str, tag: &str) -> String {
    let mut result = String::with_capacity(html.len());
    // ASCII-only lowercasing keeps byte offsets valid in the original
    // string; Unicode lowercasing can change byte lengths.
    let lower = html.to_ascii_lowercase();
    let open_tag = format!("<{tag}");
    let close_tag = format!("</{tag}>");

    let mut pos = 0;
    loop {
        let start = match lower[pos..].find(&open_tag) {
            Some(offset) => pos + offset,
            None => {
                result.push_str(&html[pos..]);
                break;
            }
        };

        // Reject partial matches such as <styled> for <style>.
        let after_tag = start + open_tag.len();
        if after_tag < lower.len() {
            let next_byte = lower.as_bytes()[after_tag];
            if !matches!(next_byte, b' ' | b'>' | b'/' | b'\n' | b'\r' | b'\t') {
                result.push_str(&html[pos..after_tag]);
                pos = after_tag;
                continue;
            }
        }

        result.push_str(&html[pos..start]);

        let end = match lower[start..].find(&close_tag) {
            Some(offset) => start + offset + close_tag.len(),
            None => match lower[start..].find('>') {
                Some(offset) => start + offset + 1,
                None => html.len(),
            },
        };

        pos = end;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn excerpt_never_exceeds_budget() {
        let text = "the quick brown fox jumps over the lazy dog";
        for budget in 0..=text.len() + 5 {
            let e = excerpt(text, budget);
            assert!(
                e.chars().count() <= budget,
                "budget {budget} exceeded: {e:?}"
            );
        }
    }

    #[test]
    fn excerpt_ends_on_word_boundary() {
        let text = "alpha beta gamma delta";
        for budget in 0..=30 {
            let e = excerpt(text, budget);
            if e.is_empty() {
                continue;
            }
            let last = e.split_whitespace().last().expect("non-empty");
            assert!(
                ["alpha", "beta", "gamma", "delta"].contains(&last),
                "budget {budget} cut mid-word: {e:?}"
            );
        }
    }

    #[test]
    fn excerpt_stops_before_overflowing_word() {
        // " one"(4) + " two"(4) = 8 used; " three" would need 14 > 12.
        assert_eq!(excerpt("one two three", 12), "one two");
    }

    #[test]
    fn excerpt_of_empty_text_is_empty() {
        assert_eq!(excerpt("", 500), "");
        assert_eq!(excerpt("   \n\t  ", 500), "");
    }

    #[test]
    fn excerpt_word_larger_than_budget_is_empty() {
        assert_eq!(excerpt("supercalifragilistic", 5), "");
    }

    #[test]
    fn excerpt_counts_chars_not_bytes() {
        // Each é is two bytes but one char.
        let e = excerpt("café café café", 10);
        assert_eq!(e, "café café");
    }

    #[test]
    fn page_text_strips_tags_and_collapses_whitespace() {
        let html = "<html><body><h1>Title</h1>\n\n  <p>Some   body\ttext</p></body></html>";
        assert_eq!(page_text(html), "Title Some body text");
    }

    #[test]
    fn page_text_drops_script_and_style() {
        let html = r#"<html><head><style>.a { color: red; }</style></head>
            <body><p>Visible</p><script>var hidden = 1;</script>
            <noscript>Enable JS</noscript></body></html>"#;
        let text = page_text(html);
        assert!(text.contains("Visible"));
        assert!(!text.contains("hidden"));
        assert!(!text.contains("color"));
        assert!(!text.contains("Enable JS"));
    }

    #[test]
    fn page_text_of_empty_input_is_empty() {
        assert_eq!(page_text(""), "");
    }

    #[test]
    fn strip_tag_ignores_similar_tag_names() {
        let html = "<style>x</style><styled>keep</styled>";
        let stripped = strip_tag(html, "style");
        assert!(stripped.contains("keep"));
        assert!(!stripped.contains(">x<"));
    }

    #[test]
    fn strip_tag_survives_multibyte_text_around_tags() {
        // U+0130 grows under Unicode lowercasing; offsets must stay valid.
        let stripped = strip_tag("İ<style>x</style>😀 tail", "style");
        assert_eq!(stripped, "İ😀 tail");
    }

    #[test]
    fn page_text_with_multibyte_chars_and_stripped_tags() {
        let text = page_text("İ<style>x</style>😀 tail");
        assert!(text.contains("tail"));
        assert!(!text.contains('x'));
    }

    #[test]
    fn strip_tag_handles_unclosed_tag() {
        let html = "<p>before</p><script>never closed";
        let stripped = strip_tag(html, "script");
        assert!(stripped.contains("before"));
        assert!(!stripped.contains("never closed"));
    }
}
