//! Two-level translation cache: in-memory LRU + SQLite persistent store.

use log::info;
use lru::LruCache;
use rusqlite::{params, Connection, OptionalExtension};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS translations (
    source_text TEXT NOT NULL,
    source_lang TEXT NOT NULL,
    target_lang TEXT NOT NULL,
    translated  TEXT NOT NULL,
    created_at  INTEGER NOT NULL,
    PRIMARY KEY (source_text, source_lang, target_lang)
);
CREATE INDEX IF NOT EXISTS idx_created_at ON translations(created_at);
";

type CacheKey = (String, String, String); // (source_text, source_lang, target_lang)

pub const DEFAULT_TTL_SECS: u64 = 7 * 24 * 3600;
pub const DEFAULT_MEMORY_SIZE: usize = 1000;

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub memory_entries: usize,
    pub memory_max: usize,
    pub db_entries: usize,
}

/// Level 1 is a volatile LRU; level 2 is SQLite and survives restarts.
/// The connection sits behind a mutex so the cleanup helper may run from
/// another thread.
pub struct TranslationCache {
    memory: Mutex<LruCache<CacheKey, (String, u64)>>,
    conn: Mutex<Connection>,
    ttl: u64,
    memory_max: usize,
}

impl TranslationCache {
    pub fn open(db_path: &Path) -> rusqlite::Result<Self> {
        Self::with_limits(db_path, DEFAULT_MEMORY_SIZE, DEFAULT_TTL_SECS)
    }

    pub fn with_limits(db_path: &Path, memory_size: usize, ttl: u64) -> rusqlite::Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(SCHEMA)?;
        let cap = NonZeroUsize::new(memory_size).unwrap_or(NonZeroUsize::MIN);
        Ok(Self {
            memory: Mutex::new(LruCache::new(cap)),
            conn: Mutex::new(conn),
            ttl,
            memory_max: cap.get(),
        })
    }

    fn key(text: &str, source_lang: &str, target_lang: &str) -> CacheKey {
        (
            text.to_string(),
            source_lang.to_uppercase(),
            target_lang.to_uppercase(),
        )
    }

    /// Look up a translation. Checks memory first, then SQLite; persistent
    /// hits within TTL are promoted into memory, expired rows are deleted.
    pub fn get(&self, text: &str, source_lang: &str, target_lang: &str) -> Option<String> {
        let key = Self::key(text, source_lang, target_lang);
        let now = epoch_secs();

        if let Ok(mut memory) = self.memory.lock() {
            let hit = memory
                .get(&key)
                .map(|(value, created_at)| (value.clone(), *created_at));
            if let Some((value, created_at)) = hit {
                if now.saturating_sub(created_at) > self.ttl {
                    memory.pop(&key);
                } else {
                    return Some(value);
                }
            }
        }

        let conn = self.conn.lock().ok()?;
        let row: Option<(String, u64)> = conn
            .query_row(
                "SELECT translated, created_at FROM translations \
                 WHERE source_text = ?1 AND source_lang = ?2 AND target_lang = ?3",
                params![key.0, key.1, key.2],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()
            .ok()?;

        let (translated, created_at) = row?;

        if now.saturating_sub(created_at) > self.ttl {
            let _ = conn.execute(
                "DELETE FROM translations \
                 WHERE source_text = ?1 AND source_lang = ?2 AND target_lang = ?3",
                params![key.0, key.1, key.2],
            );
            return None;
        }
        drop(conn);

        if let Ok(mut memory) = self.memory.lock() {
            memory.put(key, (translated.clone(), created_at));
        }
        Some(translated)
    }

    /// Store a translation in both levels.
    pub fn put(&self, text: &str, source_lang: &str, target_lang: &str, translated: &str) {
        let key = Self::key(text, source_lang, target_lang);
        let now = epoch_secs();

        if let Ok(mut memory) = self.memory.lock() {
            memory.put(key.clone(), (translated.to_string(), now));
        }

        if let Ok(conn) = self.conn.lock() {
            let _ = conn.execute(
                "INSERT OR REPLACE INTO translations \
                 (source_text, source_lang, target_lang, translated, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![key.0, key.1, key.2, translated, now],
            );
        }
    }

    /// Remove expired rows from the persistent store. Returns deleted count.
    pub fn cleanup(&self) -> usize {
        let cutoff = epoch_secs().saturating_sub(self.ttl);
        let deleted = self
            .conn
            .lock()
            .ok()
            .and_then(|conn| {
                conn.execute("DELETE FROM translations WHERE created_at < ?1", params![cutoff])
                    .ok()
            })
            .unwrap_or(0);
        if deleted > 0 {
            info!("Cleaned up {} expired translations", deleted);
        }
        deleted
    }

    pub fn stats(&self) -> CacheStats {
        let memory_entries = self.memory.lock().map(|m| m.len()).unwrap_or(0);
        let db_entries = self
            .conn
            .lock()
            .ok()
            .and_then(|conn| {
                conn.query_row("SELECT COUNT(*) FROM translations", [], |r| r.get::<_, usize>(0))
                    .ok()
            })
            .unwrap_or(0);
        CacheStats {
            memory_entries,
            memory_max: self.memory_max,
            db_entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_cache(dir: &tempfile::TempDir) -> TranslationCache {
        TranslationCache::with_limits(&dir.path().join("test_cache.db"), 3, 2).unwrap()
    }

    #[test]
    fn miss_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = small_cache(&dir);
        assert_eq!(cache.get("hello", "EN", "RU"), None);
    }

    #[test]
    fn put_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let cache = small_cache(&dir);
        cache.put("hello", "EN", "RU", "привет");
        assert_eq!(cache.get("hello", "EN", "RU").as_deref(), Some("привет"));
    }

    #[test]
    fn lang_codes_are_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let cache = small_cache(&dir);
        cache.put("hello", "en", "ru", "привет");
        assert_eq!(cache.get("hello", "EN", "RU").as_deref(), Some("привет"));
    }

    #[test]
    fn lang_pairs_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let cache = small_cache(&dir);
        cache.put("hello", "EN", "RU", "привет");
        cache.put("hello", "EN", "DE", "hallo");
        assert_eq!(cache.get("hello", "EN", "RU").as_deref(), Some("привет"));
        assert_eq!(cache.get("hello", "EN", "DE").as_deref(), Some("hallo"));
    }

    #[test]
    fn overwrite_replaces_value() {
        let dir = tempfile::tempdir().unwrap();
        let cache = small_cache(&dir);
        cache.put("hello", "EN", "RU", "привет");
        cache.put("hello", "EN", "RU", "здравствуйте");
        assert_eq!(cache.get("hello", "EN", "RU").as_deref(), Some("здравствуйте"));
    }

    #[test]
    fn lru_evicts_to_persistent_level() {
        let dir = tempfile::tempdir().unwrap();
        let cache = small_cache(&dir);
        cache.put("a", "EN", "RU", "а");
        cache.put("b", "EN", "RU", "б");
        cache.put("c", "EN", "RU", "в");
        cache.put("d", "EN", "RU", "г"); // evicts "a" from memory

        assert_eq!(cache.stats().memory_entries, 3);
        // "a" is gone from memory but still served from SQLite
        assert_eq!(cache.get("a", "EN", "RU").as_deref(), Some("а"));
    }

    #[test]
    fn get_refreshes_lru_order() {
        let dir = tempfile::tempdir().unwrap();
        let cache = small_cache(&dir);
        cache.put("a", "EN", "RU", "а");
        cache.put("b", "EN", "RU", "б");
        cache.put("c", "EN", "RU", "в");
        cache.get("a", "EN", "RU");
        cache.put("d", "EN", "RU", "г"); // "b" is now the LRU victim

        let memory = cache.memory.lock().unwrap();
        assert!(memory.contains(&("a".into(), "EN".into(), "RU".into())));
        assert!(!memory.contains(&("b".into(), "EN".into(), "RU".into())));
    }

    #[test]
    fn expired_entries_are_dropped_and_cleaned() {
        let dir = tempfile::tempdir().unwrap();
        // TTL of zero: everything expires immediately.
        let cache =
            TranslationCache::with_limits(&dir.path().join("ttl.db"), 3, 0).unwrap();
        cache.put("hello", "EN", "RU", "привет");
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert_eq!(cache.get("hello", "EN", "RU"), None);

        cache.put("again", "EN", "RU", "снова");
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert_eq!(cache.cleanup(), 1);
        assert_eq!(cache.stats().db_entries, 0);
    }

    #[test]
    fn stats_reflect_contents() {
        let dir = tempfile::tempdir().unwrap();
        let cache = small_cache(&dir);
        let empty = cache.stats();
        assert_eq!(empty.memory_entries, 0);
        assert_eq!(empty.db_entries, 0);
        assert_eq!(empty.memory_max, 3);

        cache.put("hello", "EN", "RU", "привет");
        let one = cache.stats();
        assert_eq!(one.memory_entries, 1);
        assert_eq!(one.db_entries, 1);
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persist.db");

        let first = TranslationCache::open(&path).unwrap();
        first.put("hello", "EN", "RU", "привет");
        drop(first);

        let second = TranslationCache::open(&path).unwrap();
        assert_eq!(second.get("hello", "EN", "RU").as_deref(), Some("привет"));
    }
}
