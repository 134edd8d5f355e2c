// src/utils/html.rs

use std::collections::HashSet;

/// Normalizes a taker-supplied display name before it is signed into a token
/// and shown on leaderboards.
///
/// Uses ammonia with an empty tag whitelist: markup is dropped, `<script>` and
/// `<style>` lose their content too, and the remaining text is entity-escaped.
/// Returns `None` if nothing printable is left.
pub fn clean_display_name(input: &str) -> Option<String> {
    let cleaned = ammonia::Builder::default()
        .tags(HashSet::new())
        .clean(input)
        .to_string();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_plain_text() {
        assert_eq!(
            clean_display_name("  Ana   <b>Lima</b> "),
            Some("Ana Lima".to_string())
        );
    }

    #[test]
    fn test_display_name_only_markup() {
        assert_eq!(clean_display_name("<script>alert(1)</script>"), None);
        assert_eq!(clean_display_name("   "), None);
    }
}
