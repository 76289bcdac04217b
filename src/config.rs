use log::{error, info};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use crate::detector;
use crate::parser::Channel;
use crate::pipeline::PipelineConfig;

pub const CONFIG_FILE: &str = "config.json";

// Standard install locations, probed when the registry has no answer.
const WOW_PATHS: &[&str] = &[
    "C:/Program Files (x86)/World of Warcraft",
    "C:/Program Files/World of Warcraft",
    "D:/World of Warcraft",
    "D:/Games/World of Warcraft",
];

// Chat log location inside the install.
const CHATLOG_RELATIVE: &str = "_retail_/Logs/WoWChatLog.txt";

/// Persisted application settings. Unknown keys in the file are ignored;
/// missing keys take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // API
    pub deepl_api_key: String,

    // Paths
    pub wow_path: String,
    pub chatlog_path: String,

    // Languages
    pub ui_language: String,
    pub own_language: String,
    pub target_language: String,

    // Overlay
    pub overlay_opacity: u8,
    pub overlay_font_size: u32,
    pub overlay_x: i32,
    pub overlay_y: i32,
    pub overlay_width: u32,
    pub overlay_height: u32,

    // Hotkeys
    pub hotkey_toggle_translate: String,
    pub hotkey_toggle_interactive: String,
    pub hotkey_clipboard_translate: String,

    // Channels
    pub channels_party: bool,
    pub channels_raid: bool,
    pub channels_guild: bool,
    pub channels_say: bool,
    pub channels_whisper: bool,
    pub channels_yell: bool,
    pub channels_instance: bool,

    // Translation
    pub translation_enabled_default: bool,

    // Debug
    pub show_debug_console: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            deepl_api_key: String::new(),
            wow_path: String::new(),
            chatlog_path: String::new(),
            ui_language: "RU".into(),
            own_language: "RU".into(),
            target_language: "EN".into(),
            overlay_opacity: 180,
            overlay_font_size: 10,
            overlay_x: 100,
            overlay_y: 100,
            overlay_width: 450,
            overlay_height: 300,
            hotkey_toggle_translate: "Ctrl+Shift+T".into(),
            hotkey_toggle_interactive: "Ctrl+Shift+I".into(),
            hotkey_clipboard_translate: "Ctrl+Shift+C".into(),
            channels_party: true,
            channels_raid: true,
            channels_guild: true,
            channels_say: true,
            channels_whisper: true,
            channels_yell: false,
            channels_instance: true,
            translation_enabled_default: true,
            show_debug_console: false,
        }
    }
}

impl AppConfig {
    /// Load from a JSON file; any parse failure falls back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    error!("Failed to parse config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Atomic save: write to a temp file next to the target, then rename.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

pub fn config_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(windows)]
fn registry_wow_path() -> Option<String> {
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::ERROR_SUCCESS;
    use windows::Win32::System::Registry::{
        RegCloseKey, RegOpenKeyExW, RegQueryValueExW, HKEY, HKEY_LOCAL_MACHINE, KEY_READ,
        REG_VALUE_TYPE,
    };

    let subkey: Vec<u16> = r"SOFTWARE\WOW6432Node\Blizzard Entertainment\World of Warcraft"
        .encode_utf16()
        .chain(Some(0))
        .collect();
    let value_name: Vec<u16> = "InstallPath".encode_utf16().chain(Some(0)).collect();

    let mut key = HKEY::default();
    let status = unsafe {
        RegOpenKeyExW(
            HKEY_LOCAL_MACHINE,
            PCWSTR::from_raw(subkey.as_ptr()),
            None,
            KEY_READ,
            &mut key,
        )
    };
    if status != ERROR_SUCCESS {
        return None;
    }

    let mut buf = [0u16; 512];
    let mut len = (buf.len() * 2) as u32;
    let mut kind = REG_VALUE_TYPE::default();
    let status = unsafe {
        RegQueryValueExW(
            key,
            PCWSTR::from_raw(value_name.as_ptr()),
            None,
            Some(&mut kind),
            Some(buf.as_mut_ptr() as *mut u8),
            Some(&mut len),
        )
    };
    unsafe {
        let _ = RegCloseKey(key);
    }
    if status != ERROR_SUCCESS {
        return None;
    }

    let chars = (len as usize / 2).min(buf.len());
    let path = String::from_utf16_lossy(&buf[..chars])
        .trim_end_matches('\0')
        .to_string();
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

#[cfg(not(windows))]
fn registry_wow_path() -> Option<String> {
    None
}

/// Find the game install: install metadata first, then common locations.
pub fn detect_wow_path() -> String {
    if let Some(path) = registry_wow_path() {
        if Path::new(&path).exists() {
            return path;
        }
    }

    for candidate in WOW_PATHS {
        if Path::new(candidate).exists() {
            return candidate.to_string();
        }
    }

    String::new()
}

/// Resolve the chat-log path from config, falling back to discovery and
/// finally to a bare relative filename.
pub fn resolve_chatlog_path(config: &AppConfig) -> PathBuf {
    if !config.chatlog_path.is_empty() {
        return PathBuf::from(&config.chatlog_path);
    }

    let wow_path = if config.wow_path.is_empty() {
        detect_wow_path()
    } else {
        config.wow_path.clone()
    };
    if !wow_path.is_empty() {
        return Path::new(&wow_path).join(CHATLOG_RELATIVE);
    }

    PathBuf::from("WoWChatLog.txt")
}

/// Expand the channel-group toggles into the concrete channel set and
/// assemble the runtime pipeline configuration.
pub fn build_pipeline_config(config: &AppConfig) -> PipelineConfig {
    let mut enabled = std::collections::HashSet::new();
    if config.channels_party {
        enabled.extend([Channel::Party, Channel::PartyLeader]);
    }
    if config.channels_raid {
        enabled.extend([Channel::Raid, Channel::RaidLeader, Channel::RaidWarning]);
    }
    if config.channels_guild {
        enabled.extend([Channel::Guild, Channel::Officer]);
    }
    if config.channels_say {
        enabled.insert(Channel::Say);
    }
    if config.channels_yell {
        enabled.insert(Channel::Yell);
    }
    if config.channels_whisper {
        enabled.extend([Channel::WhisperFrom, Channel::WhisperTo]);
    }
    if config.channels_instance {
        enabled.extend([Channel::Instance, Channel::InstanceLeader]);
    }

    let own_language =
        detector::from_deepl_code(&config.own_language).unwrap_or(whatlang::Lang::Eng);

    PipelineConfig {
        chatlog_path: resolve_chatlog_path(config),
        deepl_api_key: config.deepl_api_key.clone(),
        target_lang: config.target_language.clone(),
        own_language,
        own_character: String::new(),
        enabled_channels: enabled,
        translation_enabled: config.translation_enabled_default,
        db_path: config_dir().join("translations.db"),
        use_memory_reader: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load(Path::new("/no/such/config.json"));
        assert_eq!(config.target_language, "EN");
        assert_eq!(config.own_language, "RU");
        assert!(config.channels_party);
        assert!(!config.channels_yell);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"deepl_api_key": "key123", "own_language": "EN", "future_unknown_key": 42}"#,
        )
        .unwrap();

        let config = AppConfig::load(&path);
        assert_eq!(config.deepl_api_key, "key123");
        assert_eq!(config.own_language, "EN");
        // untouched fields fall back to defaults
        assert_eq!(config.target_language, "EN");
        assert_eq!(config.overlay_opacity, 180);
        assert_eq!(config.hotkey_toggle_translate, "Ctrl+Shift+T");
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let config = AppConfig::load(&path);
        assert_eq!(config.target_language, "EN");
    }

    #[test]
    fn save_round_trips_and_is_pretty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.deepl_api_key = "secret".into();
        config.channels_yell = true;
        config.save(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains('\n'), "expected pretty-printed JSON");

        let loaded = AppConfig::load(&path);
        assert_eq!(loaded.deepl_api_key, "secret");
        assert!(loaded.channels_yell);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn chatlog_path_resolution_order() {
        let mut config = AppConfig::default();
        config.chatlog_path = "/explicit/ChatLog.txt".into();
        assert_eq!(
            resolve_chatlog_path(&config),
            PathBuf::from("/explicit/ChatLog.txt")
        );

        config.chatlog_path.clear();
        config.wow_path = "/games/wow".into();
        assert_eq!(
            resolve_chatlog_path(&config),
            Path::new("/games/wow").join(CHATLOG_RELATIVE)
        );
    }

    #[test]
    fn channel_toggles_expand_to_groups() {
        let mut config = AppConfig::default();
        config.channels_yell = true;
        let pipeline = build_pipeline_config(&config);

        for channel in [
            Channel::Say,
            Channel::Yell,
            Channel::Party,
            Channel::PartyLeader,
            Channel::Raid,
            Channel::RaidLeader,
            Channel::RaidWarning,
            Channel::Guild,
            Channel::Officer,
            Channel::WhisperFrom,
            Channel::WhisperTo,
            Channel::Instance,
            Channel::InstanceLeader,
        ] {
            assert!(pipeline.enabled_channels.contains(&channel), "{:?}", channel);
        }

        config.channels_raid = false;
        let pipeline = build_pipeline_config(&config);
        assert!(!pipeline.enabled_channels.contains(&Channel::Raid));
        assert!(!pipeline.enabled_channels.contains(&Channel::RaidWarning));
    }

    #[test]
    fn own_language_code_maps_to_detector_language() {
        let mut config = AppConfig::default();
        config.own_language = "RU".into();
        assert_eq!(build_pipeline_config(&config).own_language, whatlang::Lang::Rus);

        config.own_language = "unknown".into();
        assert_eq!(build_pipeline_config(&config).own_language, whatlang::Lang::Eng);
    }
}
