//! DeepL translation adapter with retry and error mapping.

use log::{error, warn};
use std::io;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// What went wrong with a translation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationErrorKind {
    #[error("translation quota exceeded")]
    QuotaExceeded,
    #[error("translation failed after retries")]
    MaxRetriesExceeded,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider error: {0}")]
    Provider(String),
}

/// Result of one translation attempt. On failure `translated` retains the
/// original text so the UI always has something to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub original: String,
    pub translated: String,
    pub source_lang: String,
    pub target_lang: String,
    pub success: bool,
    pub error: Option<TranslationErrorKind>,
}

impl TranslationOutcome {
    pub fn success(original: &str, translated: String, source_lang: &str, target_lang: &str) -> Self {
        Self {
            original: original.to_string(),
            translated,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            success: true,
            error: None,
        }
    }

    fn failure(original: &str, source_lang: &str, target_lang: &str, kind: TranslationErrorKind) -> Self {
        Self {
            original: original.to_string(),
            translated: original.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            success: false,
            error: Some(kind),
        }
    }
}

/// Seam for the pipeline: production code talks to DeepL, tests script the
/// responses.
pub trait Translator: Send {
    /// Translate `text`. `source_lang` of None (or empty) means provider
    /// auto-detect; on success `source_lang` in the outcome carries the
    /// detected code.
    fn translate(&self, text: &str, target_lang: &str, source_lang: Option<&str>) -> TranslationOutcome;
}

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

// DeepL requires a regional variant for these targets.
fn normalize_target_lang(lang: &str) -> String {
    match lang.to_uppercase().as_str() {
        "EN" => "EN-US".to_string(),
        "PT" => "PT-BR".to_string(),
        other => other.to_string(),
    }
}

fn lang_code(lang: &deepl::Lang) -> String {
    format!("{:?}", lang).replace('_', "-")
}

/// Bidirectional translation via the DeepL API.
pub struct DeepLTranslator {
    api: deepl::DeepLApi,
    rt: tokio::runtime::Runtime,
    max_retries: u32,
    retry_delay: Duration,
}

impl DeepLTranslator {
    pub fn new(api_key: &str) -> io::Result<Self> {
        let rt = tokio::runtime::Runtime::new()?;
        let api = deepl::DeepLApi::with(api_key).new();
        Ok(Self {
            api,
            rt,
            max_retries: MAX_RETRIES,
            retry_delay: RETRY_DELAY,
        })
    }

    /// Monthly character usage: (used, limit). For the settings UI.
    pub fn get_usage(&self) -> Result<(u64, u64), TranslationErrorKind> {
        self.rt
            .block_on(self.api.get_usage())
            .map(|usage| (usage.character_count, usage.character_limit))
            .map_err(|e| TranslationErrorKind::Transport(format_deepl_error(&e)))
    }
}

impl Translator for DeepLTranslator {
    fn translate(&self, text: &str, target_lang: &str, source_lang: Option<&str>) -> TranslationOutcome {
        // Whitespace-only input: trivial success, no network call.
        if text.trim().is_empty() {
            return TranslationOutcome::success(
                text,
                text.to_string(),
                source_lang.unwrap_or(""),
                target_lang,
            );
        }

        let effective_target = normalize_target_lang(target_lang);
        let Ok(target) = deepl::Lang::from_str(&effective_target) else {
            let msg = format!("invalid target language code: {}", effective_target);
            warn!("{}", msg);
            return TranslationOutcome::failure(
                text,
                source_lang.unwrap_or(""),
                target_lang,
                TranslationErrorKind::Provider(msg),
            );
        };

        let source = match source_lang.filter(|s| !s.is_empty()) {
            Some(code) => match deepl::Lang::from_str(&code.to_uppercase()) {
                Ok(lang) => Some(lang),
                Err(_) => {
                    let msg = format!("invalid source language code: {}", code);
                    warn!("{}", msg);
                    return TranslationOutcome::failure(
                        text,
                        code,
                        target_lang,
                        TranslationErrorKind::Provider(msg),
                    );
                }
            },
            None => None,
        };

        for attempt in 0..self.max_retries {
            let mut builder = self.api.translate_text(text, target.clone());
            if let Some(src) = source.clone() {
                builder.source_lang(src);
            }

            match self.rt.block_on(async { (&mut builder).await }) {
                Ok(resp) => {
                    let Some(sentence) = resp.translations.first() else {
                        return TranslationOutcome::failure(
                            text,
                            source_lang.unwrap_or(""),
                            target_lang,
                            TranslationErrorKind::Provider("no translation returned".into()),
                        );
                    };
                    let detected = lang_code(&sentence.detected_source_language);
                    return TranslationOutcome::success(
                        text,
                        sentence.text.clone(),
                        &detected,
                        target_lang,
                    );
                }
                Err(e) => {
                    let msg = format_deepl_error(&e);
                    // Quota exhaustion is terminal; retrying only burns time.
                    if msg.contains("quota") {
                        error!("DeepL quota exceeded");
                        return TranslationOutcome::failure(
                            text,
                            source_lang.unwrap_or(""),
                            target_lang,
                            TranslationErrorKind::QuotaExceeded,
                        );
                    }
                    warn!(
                        "DeepL error (attempt {}/{}): {}",
                        attempt + 1,
                        self.max_retries,
                        msg
                    );
                    if attempt + 1 < self.max_retries {
                        std::thread::sleep(self.retry_delay * 2u32.pow(attempt));
                    }
                }
            }
        }

        TranslationOutcome::failure(
            text,
            source_lang.unwrap_or(""),
            target_lang,
            TranslationErrorKind::MaxRetriesExceeded,
        )
    }
}

/// User-facing messages for the common HTTP failure codes.
fn format_deepl_error(e: &deepl::Error) -> String {
    let s = format!("{}", e);
    if s.contains("403") {
        "invalid API key".into()
    } else if s.contains("429") {
        "rate limit exceeded, please wait".into()
    } else if s.contains("456") {
        "quota exceeded".into()
    } else {
        s
    }
}
