//! Shared builders for puzzle markup and reply cleanup.
//!
//! Every strategy renders the same kinds of pieces (tiles, boxes, cards) and
//! reads the same kind of noisy model replies. These helpers keep that out of
//! the strategy files so they can focus on puzzle logic.

/// Escape text for inclusion in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _    => out.push(c),
        }
    }
    out
}

/// `<tag class="...">text</tag>` with the text escaped.
pub fn element(tag: &str, class: &str, text: &str) -> String {
    format!("<{tag} class=\"{class}\">{}</{tag}>", escape_html(text))
}

/// Wrap already-rendered children in a container `div`.
pub fn container(class: &str, children: &[String]) -> String {
    format!("<div class=\"{class}\">{}</div>", children.concat())
}

/// Strip surrounding quotes, punctuation and list markers from a model reply
/// fragment: `"1. Apple."` -> `Apple`.
pub fn clean_fragment(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_marker = trimmed
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches(['.', ')', '-', '*', '•'])
        .trim();
    // Only drop the numbering if something is left of the word.
    let base = if without_marker.is_empty() { trimmed } else { without_marker };
    base.trim_matches(|c: char| !c.is_alphanumeric()).to_string()
}

/// First whitespace-separated token of a reply, cleaned.
pub fn first_word(raw: &str) -> String {
    raw.split_whitespace()
        .map(clean_fragment)
        .find(|w| !w.is_empty())
        .unwrap_or_default()
}

/// Strip surrounding quotes and trailing punctuation from a free-text reply.
pub fn clean_sentence(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim()
        .to_string()
}

/// Largest magnitude rendered through the exact integer path.
const EXACT_INTEGER_LIMIT: f64 = 9.0e15;

/// Render a number without a trailing `.0`; at most four decimals otherwise.
pub fn format_number(value: f64) -> String {
    if value.abs() >= EXACT_INTEGER_LIMIT {
        return format!("{value:.0}");
    }
    if (value - value.round()).abs() < 1e-9 {
        return format!("{}", value.round() as i64);
    }
    let fixed = format!("{value:.4}");
    match fixed.trim_end_matches('0').trim_end_matches('.') {
        "-0" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_html("<b>\"R&D\"</b>"), "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt;");
        assert_eq!(element("span", "tile", "A<"), "<span class=\"tile\">A&lt;</span>");
    }

    #[test]
    fn cleans_numbered_and_quoted_fragments() {
        assert_eq!(clean_fragment("1. Apple."), "Apple");
        assert_eq!(clean_fragment("  \"moon\" "), "moon");
        assert_eq!(clean_fragment("- bridge"), "bridge");
        assert_eq!(clean_fragment("42"), "42");
        assert_eq!(first_word("  Puddle. is a word"), "Puddle");
        assert_eq!(first_word("   "), "");
    }

    #[test]
    fn formats_integers_and_decimals() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.0 / 3.0), "0.3333");
        assert_eq!(format_number(2.00001), "2");
    }

    #[test]
    fn large_values_keep_every_digit() {
        assert_eq!(format_number(1e19), "10000000000000000000");
        assert_eq!(format_number(-1e21), "-1000000000000000000000");
        assert_eq!(format_number(8.0e15), "8000000000000000");
    }

    #[test]
    fn tiny_negatives_render_as_zero() {
        assert_eq!(format_number(-0.00001), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-0.25), "-0.25");
    }
}
