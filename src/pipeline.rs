//! Translation pipeline: scanner/watcher → parser → dedup → filters →
//! phrasebook → detector → cache → shield → DeepL → output callback.
//!
//! A single consumer thread drives every step; the scanner, the file
//! watcher and the GUI all talk to it through one input channel.

use log::{debug, info, warn};
use std::collections::{HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use whatlang::Lang;

use crate::cache::TranslationCache;
use crate::detector::{to_deepl_code, ChatLanguageDetector, Detection};
use crate::glossary;
use crate::parser::{parse_line, Channel, ChatMessage};
use crate::phrasebook;
use crate::scanner::{MemoryChatWatcher, WowStatus};
use crate::text_util::{
    clean_message_text, is_empty_or_whitespace, restore_tokens, strip_for_translation,
};
use crate::translator::{DeepLTranslator, TranslationOutcome, Translator};
use crate::watcher::ChatLogWatcher;

/// A chat message with its translation, as handed to the GUI sink.
#[derive(Debug, Clone)]
pub struct TranslatedMessage {
    pub original: ChatMessage,
    pub translation: Option<TranslationOutcome>,
    pub source_lang: String,
}

pub type MessageCallback = Box<dyn Fn(TranslatedMessage) + Send>;

/// Runtime pipeline settings, hot-swappable via `update_config`.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub chatlog_path: PathBuf,
    pub deepl_api_key: String,
    pub target_lang: String,
    pub own_language: Lang,
    pub own_character: String,
    pub enabled_channels: HashSet<Channel>,
    pub translation_enabled: bool,
    pub db_path: PathBuf,
    pub use_memory_reader: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chatlog_path: PathBuf::from("WoWChatLog.txt"),
            deepl_api_key: String::new(),
            target_lang: "EN".to_string(),
            own_language: Lang::Eng,
            own_character: String::new(),
            enabled_channels: [
                Channel::Say,
                Channel::Yell,
                Channel::Party,
                Channel::PartyLeader,
                Channel::Raid,
                Channel::RaidLeader,
                Channel::Guild,
                Channel::WhisperFrom,
                Channel::WhisperTo,
                Channel::Instance,
                Channel::InstanceLeader,
            ]
            .into_iter()
            .collect(),
            translation_enabled: true,
            db_path: PathBuf::from("translations.db"),
            use_memory_reader: true,
        }
    }
}

/// Messages consumed by the pipeline thread.
pub enum PipelineEvent {
    RawLine(String),
    ConfigUpdate(PipelineConfig),
    Shutdown,
}

// ─── Dedup map ───────────────────────────────────────────────────────

const DEDUP_TTL: Duration = Duration::from_secs(30);
const DEDUP_MAX: usize = 512;

type MsgKey = (String, String); // (author, text)

/// Recent (author, text) pairs: the scanner and the file watcher both
/// deliver the same message, at most once may pass.
struct DedupMap {
    order: VecDeque<(MsgKey, Instant)>,
    seen: HashSet<MsgKey>,
    ttl: Duration,
}

impl DedupMap {
    fn new(ttl: Duration) -> Self {
        Self {
            order: VecDeque::new(),
            seen: HashSet::new(),
            ttl,
        }
    }

    fn is_duplicate(&self, key: &MsgKey) -> bool {
        self.seen.contains(key)
    }

    fn insert(&mut self, key: MsgKey) {
        self.order.push_back((key.clone(), Instant::now()));
        self.seen.insert(key);
        self.evict();
    }

    fn evict(&mut self) {
        let now = Instant::now();
        while let Some((key, at)) = self.order.front() {
            if now.duration_since(*at) > self.ttl || self.order.len() > DEDUP_MAX {
                self.seen.remove(key);
                self.order.pop_front();
            } else {
                break;
            }
        }
    }
}

// ─── Per-line processing ─────────────────────────────────────────────

/// Owns every pipeline collaborator; lives on the consumer thread.
struct PipelineWorker {
    config: PipelineConfig,
    cache: TranslationCache,
    detector: ChatLanguageDetector,
    translator: Box<dyn Translator>,
    dedup: DedupMap,
    on_message: MessageCallback,
}

impl PipelineWorker {
    fn new(
        config: PipelineConfig,
        cache: TranslationCache,
        translator: Box<dyn Translator>,
        on_message: MessageCallback,
    ) -> Self {
        let detector = ChatLanguageDetector::new(config.own_language);
        Self {
            config,
            cache,
            detector,
            translator,
            dedup: DedupMap::new(DEDUP_TTL),
            on_message,
        }
    }

    fn emit(&self, original: ChatMessage, translation: Option<TranslationOutcome>, source_lang: &str) {
        (self.on_message)(TranslatedMessage {
            original,
            translation,
            source_lang: source_lang.to_string(),
        });
    }

    /// Hot-update settings without a restart.
    fn apply_config(&mut self, config: PipelineConfig) {
        if self.config.own_language != config.own_language {
            info!(
                "Own language changed: {:?} -> {:?}",
                self.config.own_language, config.own_language
            );
        }
        if self.config.target_lang != config.target_lang {
            info!(
                "Target language changed: {} -> {}",
                self.config.target_lang, config.target_lang
            );
        }
        self.detector.set_own_language(config.own_language);
        self.config = config;
    }

    fn handle_line(&mut self, line: &str) {
        debug!("New line: {:.120}", line);
        let Some(msg) = parse_line(line) else {
            debug!("Parse returned None for: {:.150}", line);
            return;
        };

        info!(
            "Parsed: [{}] {}: {:.60}",
            msg.channel.label(),
            msg.author,
            msg.text
        );

        // The scanner and the file watcher may deliver the same message.
        let dedup_key = (msg.author.clone(), msg.text.clone());
        if self.dedup.is_duplicate(&dedup_key) {
            debug!("Duplicate message from {}, skipping", msg.author);
            return;
        }
        self.dedup.insert(dedup_key);

        if !self.config.enabled_channels.contains(&msg.channel) {
            debug!("Channel {} not enabled", msg.channel.label());
            return;
        }

        // Own messages: shown in the overlay, never translated.
        if !self.config.own_character.is_empty() && msg.author == self.config.own_character {
            self.emit(msg, None, "");
            return;
        }

        if !self.config.translation_enabled {
            self.emit(msg, None, "");
            return;
        }

        let cleaned = clean_message_text(&msg.text);
        if is_empty_or_whitespace(&cleaned) {
            return;
        }

        let target_lang = self.config.target_lang.clone();

        // Abbreviations before language detection: catches short gg/ty/bb
        // that fall under the detector's minimum length.
        if let Some(hit) = phrasebook::lookup_abbreviation(&cleaned, &target_lang) {
            let outcome = TranslationOutcome::success(&cleaned, hit.to_string(), "", &target_lang);
            self.emit(msg, Some(outcome), "");
            return;
        }

        let source_lang = match self.detector.detect(&cleaned) {
            Detection::Skip => {
                info!("Skip (own lang / skip-phrase): {:.60}", cleaned);
                self.emit(msg, None, "");
                return;
            }
            Detection::Unknown => {
                info!("Translating (auto-detect)->{}: {:.60}", target_lang, cleaned);
                String::new()
            }
            Detection::Language(lang) => match to_deepl_code(lang) {
                Some(code) => {
                    info!("Translating {}->{}: {:.60}", code, target_lang, cleaned);
                    code.to_string()
                }
                None => {
                    info!("Skip (unmapped lang {:?}): {:.60}", lang, cleaned);
                    self.emit(msg, None, "");
                    return;
                }
            },
        };

        // Phrasebook: instant, no API call.
        if let Some(hit) = phrasebook::lookup(&cleaned, &source_lang, &target_lang) {
            let outcome =
                TranslationOutcome::success(&cleaned, hit.to_string(), &source_lang, &target_lang);
            self.emit(msg, Some(outcome), &source_lang);
            return;
        }

        // Cache.
        if let Some(cached) = self.cache.get(&cleaned, &source_lang, &target_lang) {
            let outcome =
                TranslationOutcome::success(&cleaned, cached, &source_lang, &target_lang);
            self.emit(msg, Some(outcome), &source_lang);
            return;
        }

        self.translate_and_emit(msg, &cleaned, &source_lang, &target_lang);
    }

    /// The MT leg: shield tokens, expand WoW jargon, call the provider,
    /// restore, cache.
    fn translate_and_emit(
        &mut self,
        msg: ChatMessage,
        cleaned: &str,
        source_lang: &str,
        target_lang: &str,
    ) {
        let (masked, replacements) = strip_for_translation(cleaned);
        let to_translate = glossary::expand_wow_terms(&masked);

        let src_display = if source_lang.is_empty() { "auto" } else { source_lang };
        info!("Calling DeepL: {}->{} {:.60}", src_display, target_lang, to_translate);
        let mut result = self.translator.translate(
            &to_translate,
            target_lang,
            Some(source_lang).filter(|s| !s.is_empty()),
        );
        info!(
            "DeepL result: success={}, translated={:.60}",
            result.success, result.translated
        );

        // If the provider auto-detected the user's own language, skip
        // (e.g. "zerg" coming back as RU).
        let own_code = to_deepl_code(self.config.own_language).unwrap_or("");
        if result.success && source_lang.is_empty() && result.source_lang == own_code {
            info!("DeepL detected own lang ({}), skipping: {:.60}", own_code, cleaned);
            self.emit(msg, None, "");
            return;
        }

        if result.success && !replacements.is_empty() {
            result.translated = restore_tokens(&result.translated, &replacements);
        }
        result.original = cleaned.to_string();

        // Cache successful translations under the provider-detected source
        // when we let it auto-detect.
        if result.success {
            let cache_src = if source_lang.is_empty() {
                result.source_lang.clone()
            } else {
                source_lang.to_string()
            };
            self.cache.put(cleaned, &cache_src, target_lang, &result.translated);
        }

        self.emit(msg, Some(result), source_lang);
    }
}

// ─── Pipeline front ──────────────────────────────────────────────────

/// Read the last lines of the chat log as untranslated history.
pub fn load_history(
    chatlog_path: &Path,
    max_lines: usize,
    enabled_channels: &HashSet<Channel>,
) -> Vec<TranslatedMessage> {
    ChatLogWatcher::read_tail(chatlog_path, max_lines)
        .iter()
        .filter_map(|line| parse_line(line))
        .filter(|msg| enabled_channels.contains(&msg.channel))
        .map(|msg| TranslatedMessage {
            original: msg,
            translation: None,
            source_lang: String::new(),
        })
        .collect()
}

/// Owns the source threads and the consumer thread.
pub struct TranslationPipeline {
    tx: mpsc::Sender<PipelineEvent>,
    thread: Option<thread::JoinHandle<()>>,
    watcher: ChatLogWatcher,
    memory_watcher: Option<MemoryChatWatcher>,
}

impl TranslationPipeline {
    /// Start the pipeline. Fails only on the startup-fatal conditions:
    /// the persistent cache cannot be opened or the MT runtime cannot boot.
    pub fn start(config: PipelineConfig, on_message: MessageCallback) -> io::Result<Self> {
        let cache = TranslationCache::open(&config.db_path)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        cache.cleanup();
        let translator: Box<dyn Translator> =
            Box::new(DeepLTranslator::new(&config.deepl_api_key)?);

        let (tx, rx) = mpsc::channel::<PipelineEvent>();

        // File watcher: history + fallback source.
        let watcher_tx = tx.clone();
        let mut watcher = ChatLogWatcher::new(
            config.chatlog_path.clone(),
            Box::new(move |line| {
                let _ = watcher_tx.send(PipelineEvent::RawLine(line));
            }),
        );
        watcher.start();

        // Memory scanner: the real-time source.
        let memory_watcher = if config.use_memory_reader {
            let scanner_tx = tx.clone();
            let mut mw = MemoryChatWatcher::new(Box::new(move |line| {
                let _ = scanner_tx.send(PipelineEvent::RawLine(line));
            }));
            mw.start();
            Some(mw)
        } else {
            None
        };

        let mut worker = PipelineWorker::new(config, cache, translator, on_message);
        let thread = thread::spawn(move || {
            while let Ok(event) = rx.recv() {
                match event {
                    PipelineEvent::RawLine(line) => worker.handle_line(&line),
                    PipelineEvent::ConfigUpdate(config) => worker.apply_config(config),
                    PipelineEvent::Shutdown => break,
                }
            }
            info!("Pipeline thread exiting");
        });

        info!(
            "Pipeline started ({})",
            if memory_watcher.is_some() {
                "memory scanner + file watcher"
            } else {
                "file watcher only"
            }
        );

        Ok(Self {
            tx,
            thread: Some(thread),
            watcher,
            memory_watcher,
        })
    }

    /// Thread-safe config hand-off; applied before the next message.
    pub fn update_config(&self, config: PipelineConfig) {
        let _ = self.tx.send(PipelineEvent::ConfigUpdate(config));
    }

    /// Connection status for the GUI poll.
    pub fn wow_status(&self) -> WowStatus {
        match &self.memory_watcher {
            Some(mw) => mw.status(),
            None => WowStatus::Offline,
        }
    }

    /// Cloneable status handle for a polling thread.
    pub fn status_handle(&self) -> Option<crate::scanner::ScannerStatus> {
        self.memory_watcher.as_ref().map(|mw| mw.status_handle())
    }

    pub fn stop(&mut self) {
        if let Some(mut mw) = self.memory_watcher.take() {
            mw.stop();
        }
        self.watcher.stop();
        let _ = self.tx.send(PipelineEvent::Shutdown);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!("Pipeline thread panicked during shutdown");
            }
        }
        info!("Pipeline stopped");
    }
}

impl Drop for TranslationPipeline {
    fn drop(&mut self) {
        let _ = self.tx.send(PipelineEvent::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::TranslationErrorKind;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct FakeTranslator {
        calls: Arc<Mutex<Vec<(String, String, Option<String>)>>>,
        detected_source: String,
        fail_with: Option<TranslationErrorKind>,
    }

    impl FakeTranslator {
        fn new(detected_source: &str) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                detected_source: detected_source.to_string(),
                fail_with: None,
            }
        }

        fn failing(kind: TranslationErrorKind) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                detected_source: String::new(),
                fail_with: Some(kind),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Translator for FakeTranslator {
        fn translate(
            &self,
            text: &str,
            target_lang: &str,
            source_lang: Option<&str>,
        ) -> TranslationOutcome {
            self.calls.lock().unwrap().push((
                text.to_string(),
                target_lang.to_string(),
                source_lang.map(String::from),
            ));
            if let Some(kind) = &self.fail_with {
                return TranslationOutcome {
                    original: text.to_string(),
                    translated: text.to_string(),
                    source_lang: source_lang.unwrap_or("").to_string(),
                    target_lang: target_lang.to_string(),
                    success: false,
                    error: Some(kind.clone()),
                };
            }
            let detected = match source_lang {
                Some(src) => src.to_string(),
                None => self.detected_source.clone(),
            };
            TranslationOutcome::success(text, format!("T[{}]", text), &detected, target_lang)
        }
    }

    struct Harness {
        worker: PipelineWorker,
        emitted: Arc<Mutex<Vec<TranslatedMessage>>>,
        translator: FakeTranslator,
        _dir: tempfile::TempDir,
    }

    fn harness_with(config: PipelineConfig, translator: FakeTranslator) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let cache = TranslationCache::open(&dir.path().join("cache.db")).unwrap();
        let emitted = Arc::new(Mutex::new(Vec::new()));
        let sink = emitted.clone();
        let worker = PipelineWorker::new(
            config,
            cache,
            Box::new(translator.clone()),
            Box::new(move |m| sink.lock().unwrap().push(m)),
        );
        Harness {
            worker,
            emitted,
            translator,
            _dir: dir,
        }
    }

    fn harness(config: PipelineConfig) -> Harness {
        harness_with(config, FakeTranslator::new("EN"))
    }

    fn en_to_ru_config() -> PipelineConfig {
        PipelineConfig {
            target_lang: "RU".to_string(),
            own_language: Lang::Eng,
            ..Default::default()
        }
    }

    #[test]
    fn phrasebook_short_circuits_before_mt() {
        let mut h = harness(en_to_ru_config());
        h.worker
            .handle_line("3/14 20:01:02.000  [Party] Hero-Stormrage: thanks");

        let emitted = h.emitted.lock().unwrap();
        assert_eq!(emitted.len(), 1);
        let translation = emitted[0].translation.as_ref().unwrap();
        assert!(translation.success);
        assert_eq!(translation.translated, "спасибо");
        assert_eq!(h.translator.call_count(), 0);
    }

    #[test]
    fn abbreviation_hits_below_detector_minimum() {
        let mut h = harness(en_to_ru_config());
        h.worker.handle_line("3/14 20:01:02.000  [Party] Ally-Realm: gg");

        let emitted = h.emitted.lock().unwrap();
        let translation = emitted[0].translation.as_ref().unwrap();
        assert_eq!(translation.translated, "хорошая игра");
        assert_eq!(translation.source_lang, "");
        assert_eq!(h.translator.call_count(), 0);
    }

    #[test]
    fn own_language_text_passes_through_untranslated() {
        let mut h = harness(en_to_ru_config());
        h.worker.handle_line(
            "3/14 20:01:03.000  [Raid] Hero-Stormrage: the quick brown fox jumps over the lazy dog",
        );

        let emitted = h.emitted.lock().unwrap();
        assert_eq!(emitted.len(), 1);
        assert!(emitted[0].translation.is_none());
        assert_eq!(h.translator.call_count(), 0);
    }

    #[test]
    fn cyrillic_fallback_translates_short_slang() {
        let mut h = harness(en_to_ru_config());
        h.worker.handle_line("3/14 20:01:04.000  [Say] Гость-Сервер: мда");

        let calls = h.translator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].2.as_deref(), Some("RU"));

        let emitted = h.emitted.lock().unwrap();
        let translation = emitted[0].translation.as_ref().unwrap();
        assert!(translation.success);
        assert_eq!(emitted[0].source_lang, "RU");
    }

    #[test]
    fn tokens_survive_the_translate_round_trip() {
        let config = PipelineConfig {
            target_lang: "EN".to_string(),
            own_language: Lang::Rus,
            ..Default::default()
        };
        let mut h = harness(config);
        h.worker.handle_line(
            "3/14 20:05:00.000  [Raid] Leader-Realm: please focus {skull} first and check https://wowhead.com/npc/1 for tactics",
        );

        {
            let calls = h.translator.calls.lock().unwrap();
            assert_eq!(calls.len(), 1);
            let sent = &calls[0].0;
            assert!(sent.contains("__WCT0__"), "masked text sent to MT: {}", sent);
            assert!(sent.contains("__WCT1__"), "masked text sent to MT: {}", sent);
            assert!(!sent.contains("{skull}"));
            assert!(!sent.contains("https://wowhead.com"));
        }

        let emitted = h.emitted.lock().unwrap();
        let translation = emitted[0].translation.as_ref().unwrap();
        assert!(translation.translated.contains("{skull}"));
        assert!(translation.translated.contains("https://wowhead.com/npc/1"));
    }

    #[test]
    fn duplicate_from_second_source_is_dropped() {
        let mut h = harness(en_to_ru_config());
        // Scanner delivery, then the file watcher's copy of the same message.
        h.worker.handle_line("3/14 20:01:05.000  [Party] Ally-Realm: gg");
        h.worker.handle_line("3/14 20:01:05.500  [Party] Ally-Realm: gg");

        assert_eq!(h.emitted.lock().unwrap().len(), 1);
    }

    #[test]
    fn disabled_channel_is_filtered() {
        let mut config = en_to_ru_config();
        config.enabled_channels.remove(&Channel::Yell);
        let mut h = harness(config);
        h.worker.handle_line("3/14 20:01:06.000  [Yell] Loud-Realm: спасибо");
        assert!(h.emitted.lock().unwrap().is_empty());
        assert_eq!(h.translator.call_count(), 0);
    }

    #[test]
    fn own_character_passes_through() {
        let mut config = en_to_ru_config();
        config.own_character = "Hero".to_string();
        let mut h = harness(config);
        h.worker.handle_line("3/14 20:01:07.000  [Party] Hero-Stormrage: спасибо всем");

        let emitted = h.emitted.lock().unwrap();
        assert_eq!(emitted.len(), 1);
        assert!(emitted[0].translation.is_none());
        assert_eq!(h.translator.call_count(), 0);
    }

    #[test]
    fn translation_disabled_still_emits() {
        let mut config = en_to_ru_config();
        config.translation_enabled = false;
        let mut h = harness(config);
        h.worker.handle_line("3/14 20:01:08.000  [Party] Some-Realm: спасибо");

        let emitted = h.emitted.lock().unwrap();
        assert_eq!(emitted.len(), 1);
        assert!(emitted[0].translation.is_none());
        assert_eq!(h.translator.call_count(), 0);
    }

    #[test]
    fn cache_hit_skips_mt_and_mt_result_is_cached() {
        let mut h = harness(en_to_ru_config());
        let text = "Это довольно длинное сообщение на русском языке";

        h.worker
            .handle_line(&format!("3/14 20:01:09.000  [Party] Раз-Два: {}", text));
        assert_eq!(h.translator.call_count(), 1);

        // Same text from another author: dedup key differs, cache hits.
        h.worker
            .handle_line(&format!("3/14 20:01:40.000  [Party] Три-Четыре: {}", text));
        assert_eq!(h.translator.call_count(), 1, "second lookup must hit the cache");

        let emitted = h.emitted.lock().unwrap();
        assert_eq!(emitted.len(), 2);
        let second = emitted[1].translation.as_ref().unwrap();
        assert!(second.success);
        assert_eq!(second.translated, format!("T[{}]", text));
    }

    #[test]
    fn mt_failure_keeps_original_and_is_not_cached() {
        let translator = FakeTranslator::failing(TranslationErrorKind::MaxRetriesExceeded);
        let mut h = harness_with(en_to_ru_config(), translator);
        let text = "Это довольно длинное сообщение на русском языке";
        h.worker
            .handle_line(&format!("3/14 20:01:10.000  [Party] Раз-Два: {}", text));

        let emitted = h.emitted.lock().unwrap();
        let translation = emitted[0].translation.as_ref().unwrap();
        assert!(!translation.success);
        assert_eq!(translation.translated, text);
        assert_eq!(
            translation.error,
            Some(TranslationErrorKind::MaxRetriesExceeded)
        );
        assert_eq!(h.worker.cache.stats().db_entries, 0);
    }

    #[test]
    fn auto_detect_own_language_is_suppressed() {
        // Provider reports the detected source as the user's own language.
        let translator = FakeTranslator::new("EN");
        let mut h = harness_with(en_to_ru_config(), translator);

        let msg = ChatMessage {
            timestamp: "3/14 20:01:11.000".to_string(),
            channel: Channel::Party,
            author: "Auto-Realm".to_string(),
            server: String::new(),
            text: "zerg".to_string(),
        };
        h.worker.translate_and_emit(msg, "zerg", "", "RU");

        assert_eq!(h.translator.call_count(), 1);
        let emitted = h.emitted.lock().unwrap();
        assert_eq!(emitted.len(), 1);
        assert!(emitted[0].translation.is_none());
    }

    #[test]
    fn hot_reconfigure_applies_to_next_message() {
        let mut h = harness(en_to_ru_config());
        let russian = "Это довольно длинное сообщение на русском языке";

        h.worker
            .handle_line(&format!("3/14 20:01:12.000  [Party] Раз-Два: {}", russian));
        assert_eq!(h.translator.call_count(), 1);

        // Switch own language to Russian: the same kind of text now skips MT.
        let mut updated = en_to_ru_config();
        updated.own_language = Lang::Rus;
        updated.target_lang = "EN".to_string();
        h.worker.apply_config(updated);

        h.worker.handle_line(&format!(
            "3/14 20:01:13.000  [Party] Пять-Шесть: {} опять",
            russian
        ));
        assert_eq!(h.translator.call_count(), 1, "own-language text must skip MT");

        let emitted = h.emitted.lock().unwrap();
        assert!(emitted[1].translation.is_none());
    }

    #[test]
    fn dedup_map_expires_entries() {
        let mut dedup = DedupMap::new(Duration::from_millis(10));
        let key = ("Ally".to_string(), "gg".to_string());
        dedup.insert(key.clone());
        assert!(dedup.is_duplicate(&key));

        std::thread::sleep(Duration::from_millis(20));
        dedup.insert(("Other".to_string(), "x".to_string()));
        assert!(!dedup.is_duplicate(&key));
    }

    #[test]
    fn load_history_filters_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("WoWChatLog.txt");
        std::fs::write(
            &path,
            "3/14 20:00:00.000  [Party] One-Realm: hello\n\
             3/14 20:00:01.000  [Trade] Spam-Realm: WTS boost\n\
             3/14 20:00:02.000  [Yell] Two-Realm: hey\n",
        )
        .unwrap();

        let mut enabled: HashSet<Channel> = HashSet::new();
        enabled.insert(Channel::Party);
        let history = load_history(&path, 50, &enabled);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].original.author, "One");
        assert!(history[0].translation.is_none());
    }
}
