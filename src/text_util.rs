//! Text utilities for chat edge cases: masking non-translatable tokens
//! across the translate round-trip and cleaning leaked markup.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// Raid target markers: {rt1}..{rt8}, {star}, {circle}, {diamond},
// {triangle}, {moon}, {square}, {cross}, {skull}
static RE_WOW_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\{(?:rt[1-8]|star|circle|diamond|triangle|moon|square|cross|skull)\}")
        .unwrap()
});

static RE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)https?://[^\s<>"]+|www\.[^\s<>"]+"#).unwrap());

// Full item/spell links: |cFFFFFFFF|Hitem:12345|h[Item Name]|h|r
static RE_WOW_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|c[0-9a-fA-F]{8}\|H[^|]+\|h\[[^\]]*\]\|h\|r").unwrap());

static RE_COLOR_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|c[0-9a-fA-F]{8}").unwrap());

/// `(placeholder, original)` pairs in insertion order.
pub type Replacements = Vec<(String, String)>;

fn mask(re: &Regex, text: &str, counter: &mut usize, replacements: &mut Replacements) -> String {
    re.replace_all(text, |caps: &Captures| {
        let placeholder = format!("__WCT{}__", *counter);
        *counter += 1;
        replacements.push((placeholder.clone(), caps[0].to_string()));
        placeholder
    })
    .into_owned()
}

/// Replace non-translatable tokens with placeholders the MT engine
/// passes through untouched.
pub fn strip_for_translation(text: &str) -> (String, Replacements) {
    let mut replacements = Replacements::new();
    let mut counter = 0;

    // Order matters: WoW links first (they contain special chars), then URLs, then markers
    let result = mask(&RE_WOW_LINK, text, &mut counter, &mut replacements);
    let result = mask(&RE_URL, &result, &mut counter, &mut replacements);
    let result = mask(&RE_WOW_MARKERS, &result, &mut counter, &mut replacements);

    (result, replacements)
}

/// Restore the original tokens after translation.
pub fn restore_tokens(text: &str, replacements: &Replacements) -> String {
    let mut result = text.to_string();
    for (placeholder, original) in replacements {
        result = result.replace(placeholder, original);
    }
    result
}

pub fn is_empty_or_whitespace(text: &str) -> bool {
    text.trim().is_empty()
}

/// Clean message text of color codes that leak into the chat log,
/// preserving emoji and other unicode.
pub fn clean_message_text(text: &str) -> String {
    let cleaned = RE_COLOR_OPEN.replace_all(text, "");
    cleaned.replace("|r", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_preserved_across_round_trip() {
        let text = "Check https://wowhead.com/item/123 for info";
        let (cleaned, replacements) = strip_for_translation(text);
        assert!(!cleaned.contains("https://wowhead.com/item/123"));
        assert_eq!(replacements.len(), 1);
        let restored = restore_tokens("Проверьте __WCT0__ для инфо", &replacements);
        assert!(restored.contains("https://wowhead.com/item/123"));
    }

    #[test]
    fn raid_markers_masked() {
        let (cleaned, replacements) = strip_for_translation("Focus {skull} and CC {star}");
        assert!(!cleaned.contains("{skull}"));
        assert!(!cleaned.contains("{star}"));
        assert_eq!(replacements.len(), 2);
    }

    #[test]
    fn rt_markers_masked() {
        let (_, replacements) = strip_for_translation("Focus {rt1} first, then {rt8}");
        assert_eq!(replacements.len(), 2);
    }

    #[test]
    fn wow_link_masked() {
        let text = "Equip |cFFFF8800|Hitem:12345|h[Sword of Truth]|h|r please";
        let (cleaned, replacements) = strip_for_translation(text);
        assert_eq!(replacements.len(), 1);
        assert!(!cleaned.contains("|cFFFF8800"));
    }

    #[test]
    fn no_tokens_is_identity() {
        let text = "Simple message without tokens";
        let (cleaned, replacements) = strip_for_translation(text);
        assert_eq!(cleaned, text);
        assert!(replacements.is_empty());
    }

    #[test]
    fn placeholders_are_ordered_and_shaped() {
        let (cleaned, _) = strip_for_translation("focus {skull} on https://wowhead.com/npc/1");
        // URL is masked before markers, so it takes index 0
        assert_eq!(cleaned, "focus __WCT1__ on __WCT0__");
    }

    #[test]
    fn restore_multiple() {
        let text = "{star} kill {skull} then go to https://example.com";
        let (cleaned, replacements) = strip_for_translation(text);
        let translated = cleaned
            .replace("kill", "убить")
            .replace("then go to", "потом идём на");
        let restored = restore_tokens(&translated, &replacements);
        assert!(restored.contains("{star}"));
        assert!(restored.contains("{skull}"));
        assert!(restored.contains("https://example.com"));
    }

    #[test]
    fn round_trip_is_identity_without_translation() {
        let text = "pull {rt8} see www.wowhead.com and |cFF00FF00|Hspell:42|h[Heal]|h|r now";
        let (cleaned, replacements) = strip_for_translation(text);
        assert_eq!(restore_tokens(&cleaned, &replacements), text);
    }

    #[test]
    fn clean_removes_color_codes() {
        let cleaned = clean_message_text("|cFF40FF40Green text|r normal");
        assert!(!cleaned.contains("|c"));
        assert!(!cleaned.contains("|r"));
        assert!(cleaned.contains("Green text"));
    }

    #[test]
    fn clean_trims_whitespace() {
        assert_eq!(clean_message_text("  hello  "), "hello");
        assert_eq!(clean_message_text("Normal message"), "Normal message");
    }

    #[test]
    fn emptiness_checks() {
        assert!(is_empty_or_whitespace(""));
        assert!(is_empty_or_whitespace("   "));
        assert!(is_empty_or_whitespace("\t\n"));
        assert!(!is_empty_or_whitespace("hello"));
    }
}
