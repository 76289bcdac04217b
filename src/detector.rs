//! Language detection for chat messages, with the gaming-jargon guard rails
//! statistical detectors need on short chat text.

use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use whatlang::Lang;

// Short gaming phrases that must never be treated as foreign text.
// Abbreviations with translations (gg, ty, brb, afk, ...) are handled by the
// phrasebook — they are NOT listed here so they can reach the phrasebook
// lookup in the pipeline.
static SKIP_PHRASES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "kk", "ok", "lol", "lmao", "rip", "ez", "pst", "+", "++", "+++", "1", "2", "3", "123",
        "go", "pull", "cc", "aoe", "dps", "heal", "tank", "res", "rez", "buff", "nerf", "proc",
        "crit", "dodge", "miss",
    ]
    .into_iter()
    .collect()
});

const MIN_TEXT_LENGTH: usize = 3;

// Short text gets the lenient confidence gate.
const SHORT_TEXT_THRESHOLD: usize = 20;
const STRICT_MIN_CONFIDENCE: f64 = 0.25;
const LENIENT_MIN_CONFIDENCE: f64 = 0.10;

// If the detector can't decide but text is mostly Cyrillic, assume Russian
// (the dominant Cyrillic language on WoW servers).
const CYRILLIC_THRESHOLD: f64 = 0.5;

// Short Russian text is often confused with these Cyrillic siblings.
const CYRILLIC_SIBLINGS: [Lang; 5] = [Lang::Bul, Lang::Ukr, Lang::Bel, Lang::Srp, Lang::Mkd];

/// Detection verdict for a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// Too short, gaming jargon, or the user's own language — don't translate.
    Skip,
    /// No statistical decision; let the MT provider auto-detect.
    Unknown,
    Language(Lang),
}

fn cyrillic_ratio(text: &str) -> f64 {
    let mut alpha = 0usize;
    let mut cyrillic = 0usize;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            alpha += 1;
            if ('\u{0400}'..='\u{04FF}').contains(&ch) {
                cyrillic += 1;
            }
        }
    }
    if alpha == 0 {
        0.0
    } else {
        cyrillic as f64 / alpha as f64
    }
}

/// Detects the language of chat messages, skipping gaming jargon.
pub struct ChatLanguageDetector {
    own_language: Lang,
}

impl ChatLanguageDetector {
    pub fn new(own_language: Lang) -> Self {
        Self { own_language }
    }

    pub fn own_language(&self) -> Lang {
        self.own_language
    }

    pub fn set_own_language(&mut self, lang: Lang) {
        self.own_language = lang;
    }

    pub fn detect(&self, text: &str) -> Detection {
        let cleaned = text.trim().to_lowercase();

        if cleaned.chars().count() < MIN_TEXT_LENGTH {
            return Detection::Skip;
        }
        if SKIP_PHRASES.contains(cleaned.as_str()) {
            return Detection::Skip;
        }

        // Short text gets a lower confidence bar.
        let min_confidence = if cleaned.chars().count() <= SHORT_TEXT_THRESHOLD {
            LENIENT_MIN_CONFIDENCE
        } else {
            STRICT_MIN_CONFIDENCE
        };

        let mut detected = whatlang::detect(text)
            .filter(|info| info.confidence() >= min_confidence)
            .map(|info| info.lang());

        // Cyrillic fallback: helps with short slang like "мда", "щяс" that
        // statistical detection fails to classify.
        if detected.is_none() {
            let ratio = cyrillic_ratio(text);
            if ratio >= CYRILLIC_THRESHOLD {
                debug!(
                    "Cyrillic fallback: {:.0}% -> RUSSIAN for {:?}",
                    ratio * 100.0,
                    text
                );
                detected = Some(Lang::Rus);
            }
        }

        let Some(lang) = detected else {
            debug!("Undetectable, deferring to MT auto-detect: {:?}", text);
            return Detection::Unknown;
        };

        if lang == self.own_language {
            return Detection::Skip;
        }

        // Short Cyrillic text is routinely misdetected as BG/UK. On WoW
        // servers predominantly-Cyrillic chat is Russian, so coerce — and
        // when the user's own language IS Russian, that means skip.
        if CYRILLIC_SIBLINGS.contains(&lang) && cyrillic_ratio(text) >= CYRILLIC_THRESHOLD {
            debug!("Cyrillic sibling {:?} -> treating as RU: {:?}", lang, text);
            if self.own_language == Lang::Rus {
                return Detection::Skip;
            }
            return Detection::Language(Lang::Rus);
        }

        Detection::Language(lang)
    }
}

/// whatlang language -> DeepL language code.
pub fn to_deepl_code(lang: Lang) -> Option<&'static str> {
    Some(match lang {
        Lang::Eng => "EN",
        Lang::Rus => "RU",
        Lang::Deu => "DE",
        Lang::Fra => "FR",
        Lang::Spa => "ES",
        Lang::Ita => "IT",
        Lang::Por => "PT",
        Lang::Pol => "PL",
        Lang::Nld => "NL",
        Lang::Swe => "SV",
        Lang::Dan => "DA",
        Lang::Fin => "FI",
        Lang::Ces => "CS",
        Lang::Ron => "RO",
        Lang::Hun => "HU",
        Lang::Bul => "BG",
        Lang::Ell => "EL",
        Lang::Tur => "TR",
        Lang::Ukr => "UK",
        Lang::Jpn => "JA",
        Lang::Kor => "KO",
        Lang::Cmn => "ZH",
        Lang::Est => "ET",
        Lang::Lav => "LV",
        Lang::Lit => "LT",
        Lang::Slv => "SL",
        Lang::Slk => "SK",
        Lang::Ind => "ID",
        Lang::Nob => "NB",
        _ => return None,
    })
}

/// DeepL language code -> whatlang language (for the own-language setting).
pub fn from_deepl_code(code: &str) -> Option<Lang> {
    Some(match code.to_uppercase().as_str() {
        "EN" => Lang::Eng,
        "RU" => Lang::Rus,
        "DE" => Lang::Deu,
        "FR" => Lang::Fra,
        "ES" => Lang::Spa,
        "IT" => Lang::Ita,
        "PT" => Lang::Por,
        "PL" => Lang::Pol,
        "NL" => Lang::Nld,
        "SV" => Lang::Swe,
        "DA" => Lang::Dan,
        "FI" => Lang::Fin,
        "CS" => Lang::Ces,
        "RO" => Lang::Ron,
        "HU" => Lang::Hun,
        "BG" => Lang::Bul,
        "EL" => Lang::Ell,
        "TR" => Lang::Tur,
        "UK" => Lang::Ukr,
        "JA" => Lang::Jpn,
        "KO" => Lang::Kor,
        "ZH" => Lang::Cmn,
        "ET" => Lang::Est,
        "LV" => Lang::Lav,
        "LT" => Lang::Lit,
        "SL" => Lang::Slv,
        "SK" => Lang::Slk,
        "ID" => Lang::Ind,
        "NB" => Lang::Nob,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en_detector() -> ChatLanguageDetector {
        ChatLanguageDetector::new(Lang::Eng)
    }

    #[test]
    fn too_short_is_skipped() {
        let d = en_detector();
        assert_eq!(d.detect(""), Detection::Skip);
        assert_eq!(d.detect("hi"), Detection::Skip);
        assert_eq!(d.detect("  я "), Detection::Skip);
    }

    #[test]
    fn skip_phrases_never_detected() {
        let d = en_detector();
        assert_eq!(d.detect("lol"), Detection::Skip);
        assert_eq!(d.detect("PULL"), Detection::Skip);
        assert_eq!(d.detect("123"), Detection::Skip);
        assert_eq!(d.detect("+++"), Detection::Skip);
    }

    #[test]
    fn own_language_is_skipped() {
        let d = en_detector();
        assert_eq!(
            d.detect("the quick brown fox jumps over the lazy dog"),
            Detection::Skip
        );
    }

    #[test]
    fn foreign_language_is_detected() {
        let d = en_detector();
        assert_eq!(
            d.detect("Это довольно длинное сообщение на русском языке"),
            Detection::Language(Lang::Rus)
        );
    }

    #[test]
    fn cyrillic_fallback_forces_russian() {
        // Short Cyrillic slang: whether the statistical model abstains or
        // guesses a sibling, the verdict must come out Russian.
        let d = en_detector();
        match d.detect("мда") {
            Detection::Language(Lang::Rus) => {}
            other => panic!("expected RU, got {:?}", other),
        }
    }

    #[test]
    fn cyrillic_sibling_coerced_to_own_russian() {
        let mut d = en_detector();
        d.set_own_language(Lang::Rus);
        // Whatever the sibling verdict, predominantly Cyrillic text must not
        // be translated for a Russian user.
        for text in ["привет как дела", "що там", "мда уж"] {
            match d.detect(text) {
                Detection::Skip | Detection::Unknown => {}
                Detection::Language(lang) => {
                    assert!(
                        !CYRILLIC_SIBLINGS.contains(&lang) && lang != Lang::Rus,
                        "sibling {:?} leaked through for {:?}",
                        lang,
                        text
                    );
                }
            }
        }
    }

    #[test]
    fn own_language_is_mutable() {
        let mut d = en_detector();
        assert_eq!(d.own_language(), Lang::Eng);
        d.set_own_language(Lang::Rus);
        assert_eq!(d.own_language(), Lang::Rus);
        assert_eq!(
            d.detect("Это довольно длинное сообщение на русском языке"),
            Detection::Skip
        );
    }

    #[test]
    fn deepl_code_round_trip() {
        for lang in [Lang::Eng, Lang::Rus, Lang::Deu, Lang::Jpn, Lang::Nob] {
            let code = to_deepl_code(lang).unwrap();
            assert_eq!(from_deepl_code(code), Some(lang));
        }
        assert_eq!(to_deepl_code(Lang::Epo), None);
        assert_eq!(from_deepl_code("XX"), None);
    }

    #[test]
    fn cyrillic_ratio_counts_letters_only() {
        assert!(cyrillic_ratio("мда") >= 1.0);
        assert_eq!(cyrillic_ratio("12345"), 0.0);
        assert!(cyrillic_ratio("abc где") > 0.4);
    }
}
