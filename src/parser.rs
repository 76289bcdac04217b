//! Parser for the WoW chat-log line format.
//!
//! Handles both English and localized (Russian) clients, plus the
//! hyperlink-wrapped forms produced by the addon's AddMessage hook.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Say,
    Yell,
    Party,
    PartyLeader,
    Raid,
    RaidLeader,
    RaidWarning,
    Guild,
    Officer,
    WhisperFrom,
    WhisperTo,
    Instance,
    InstanceLeader,
}

impl Channel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Say => "Say",
            Self::Yell => "Yell",
            Self::Party => "Party",
            Self::PartyLeader => "Party Leader",
            Self::Raid => "Raid",
            Self::RaidLeader => "Raid Leader",
            Self::RaidWarning => "Raid Warning",
            Self::Guild => "Guild",
            Self::Officer => "Officer",
            Self::WhisperFrom => "Whisper From",
            Self::WhisperTo => "Whisper To",
            Self::Instance => "Instance",
            Self::InstanceLeader => "Instance Leader",
        }
    }

    /// Map a raw log channel name to the enum (English + Russian client).
    fn from_log_name(name: &str) -> Option<Self> {
        match name {
            "Say" | "Сказать" => Some(Self::Say),
            "Yell" | "Крик" => Some(Self::Yell),
            "Party" | "Группа" => Some(Self::Party),
            "Party Leader" | "Лидер группы" => Some(Self::PartyLeader),
            "Raid" | "Рейд" => Some(Self::Raid),
            "Raid Leader" | "Лидер рейда" => Some(Self::RaidLeader),
            "Raid Warning" | "Объявление рейда" | "Объявление рейду" => {
                Some(Self::RaidWarning)
            }
            "Guild" | "Гильдия" => Some(Self::Guild),
            "Officer" | "Офицер" => Some(Self::Officer),
            "Instance" | "Подземелье" => Some(Self::Instance),
            "Instance Leader" | "Лидер подземелья" => Some(Self::InstanceLeader),
            _ => None,
        }
    }

    /// Map a |Hchannel:XXX| hyperlink ID to the enum (non-EN clients).
    fn from_hchannel_id(id: &str) -> Option<Self> {
        Self::from_addon_event(id).filter(|c| !c.is_whisper_channel())
    }

    /// Map an addon CHAT_MSG_* event name to the enum.
    pub fn from_addon_event(event: &str) -> Option<Self> {
        match event {
            "SAY" => Some(Self::Say),
            "YELL" => Some(Self::Yell),
            "PARTY" => Some(Self::Party),
            "PARTY_LEADER" => Some(Self::PartyLeader),
            "RAID" => Some(Self::Raid),
            "RAID_LEADER" => Some(Self::RaidLeader),
            "RAID_WARNING" => Some(Self::RaidWarning),
            "GUILD" => Some(Self::Guild),
            "OFFICER" => Some(Self::Officer),
            "WHISPER" => Some(Self::WhisperFrom),
            "WHISPER_INFORM" => Some(Self::WhisperTo),
            "INSTANCE_CHAT" => Some(Self::Instance),
            "INSTANCE_CHAT_LEADER" => Some(Self::InstanceLeader),
            _ => None,
        }
    }

    fn is_whisper_channel(&self) -> bool {
        matches!(self, Self::WhisperFrom | Self::WhisperTo)
    }
}

/// Parsed chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub timestamp: String,
    pub channel: Channel,
    pub author: String,
    pub server: String,
    pub text: String,
}

impl ChatMessage {
    pub fn is_whisper(&self) -> bool {
        self.channel.is_whisper_channel()
    }
}

/// Current local time in the chat-log timestamp format (M/D HH:MM:SS.mmm).
pub fn local_timestamp() -> String {
    chrono::Local::now().format("%-m/%-d %H:%M:%S%.3f").to_string()
}

// WoW Chat Log format examples:
// 2/15 21:30:45.123  [Party] Артас-Азурегос: Привет всем
// 2/15 21:30:45.123  [Raid Leader] Thrall-Sargeras: Pull in 5
// 2/15 21:30:45.123  To [Артас-Азурегос]: whisper text
// 2/15 21:30:45.123  [Артас-Азурегос] whispers: incoming text

// Standard channel message: timestamp  [Channel] Author-Server: text
// Also supports [Channel] [Author-Server]: text (RU client AddMessage format)
static RE_CHANNEL_MSG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d+/\d+\s+\d+:\d+:\d+\.\d+)\s+\[([^\]]+)\]\s+\[?([^-\s:\]]+)(?:-([^\s:\]]+))?\]?:\s+(.+)$",
    )
    .unwrap()
});

// Non-EN client format: timestamp  |Hchannel:TYPE|h[LocalizedName]|h Author-Server: text
// Author may be wrapped in |Hplayer:...|h[Author-Server]|h from the AddMessage hook
static RE_HCHANNEL_MSG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d+/\d+\s+\d+:\d+:\d+\.\d+)\s+\|Hchannel:(\w+)\|h\[[^\]]*\]\|h\s+(?:\|Hplayer:[^|]*\|h)?\[?([^-\s:\]|]+)(?:-([^\s:\]|]+))?\]?(?:\|h)?:\s+(.+)$",
    )
    .unwrap()
});

// Bracket channel + player hyperlink (RU scrollback):
// timestamp  [Объявление рейду] |Hplayer:...|h[Name-Server]|h: text
static RE_BRACKET_HPLAYER_MSG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d+/\d+\s+\d+:\d+:\d+\.\d+)\s+\[([^\]]+)\]\s+\|Hplayer:[^|]*\|h\[([^-\]|]+)(?:-([^\]|]+))?\]\|h:\s+(.+)$",
    )
    .unwrap()
});

// Whisper TO: timestamp  To [Author-Server]: text
static RE_WHISPER_TO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+/\d+\s+\d+:\d+:\d+\.\d+)\s+To\s+\[([^-\]]+)(?:-([^\]]+))?\]:\s+(.+)$")
        .unwrap()
});

// Whisper TO (Russian): timestamp  Кому [Author-Server]: text
static RE_WHISPER_TO_RU: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+/\d+\s+\d+:\d+:\d+\.\d+)\s+Кому\s+\[([^-\]]+)(?:-([^\]]+))?\]:\s+(.+)$")
        .unwrap()
});

// Whisper FROM: timestamp  [Author-Server] whispers: text
// Also handles |Hplayer:...|h[Author]|h wrapper from AddMessage, both locales.
static RE_WHISPER_FROM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d+/\d+\s+\d+:\d+:\d+\.\d+)\s+(?:\|Hplayer:[^|]*\|h)?\[([^-\]|]+)(?:-([^\]|]+))?\](?:\|h)?\s+(?:whispers|шепчет):\s+(.+)$",
    )
    .unwrap()
});

// Whisper TO via AddMessage: "Вы шепчете [Name]: text" / "You whisper [Name]: text"
static RE_WHISPER_TO_ADDMSG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d+/\d+\s+\d+:\d+:\d+\.\d+)\s+(?:Вы шепчете|You whisper)\s+(?:\|Hplayer:[^|]*\|h)?\[?([^-\]|:]+)(?:-([^\]|:]+))?\]?(?:\|h)?:\s+(.+)$",
    )
    .unwrap()
});

// Say/Yell from the AddMessage hook (no [Channel] prefix, uses a verb):
// Player: |Hplayer:Name-Server:flags|h[Name-Server]|h говорит: text
// NPC:    NPC Name говорит: text  (no hyperlink, name may have spaces)
static RE_SAY_YELL_PLAYER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d+/\d+\s+\d+:\d+:\d+\.\d+)\s+\|Hplayer:[^|]*\|h\[([^-\]|]+)(?:-([^\]|]+))?\]\|h\s+(says|yells|говорит|кричит):\s+(.+)$",
    )
    .unwrap()
});

static RE_SAY_YELL_PLAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d+/\d+\s+\d+:\d+:\d+\.\d+)\s+(.+?)\s+(says|yells|говорит|кричит):\s+(.+)$",
    )
    .unwrap()
});

fn say_yell_channel(verb: &str) -> Option<Channel> {
    match verb.to_lowercase().as_str() {
        "says" | "говорит" => Some(Channel::Say),
        "yells" | "кричит" => Some(Channel::Yell),
        _ => None,
    }
}

// System message patterns to filter out
static SYSTEM_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)has joined|has left|has come online|has gone offline",
        r"присоединился|покинул|входит в игру|выходит из игры",
        r"^\|c[0-9a-fA-F]{8}\|H", // WoW item/spell links
        r"^LOOT:",
        r"^You (receive|create|gain|lose|die|earned)",
        r"заслужил[аи]?\s+достижение", // RU achievements
        r"получает добычу|получает предмет", // RU loot
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

// Inline color codes (|cXXXXXXXX and |r); hyperlinks are preserved.
static RE_COLOR_CODES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|c[0-9a-fA-F]{8}|\|r").unwrap());

// WoW hyperlink markup for full stripping (|cXXXX|Hxxx|hText|h|r runs).
static RE_WOW_MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|c[0-9a-fA-F]{8}|\|r|\|H[^|]*\|h|\|h").unwrap());

// Full WoW hyperlink: |cXXXXXXXX|Htype:data|h[Display Name]|h|r
static RE_WOW_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|c[0-9a-fA-F]{8}\|H[^|]+\|h\[[^\]]*\]\|h\|r").unwrap());

fn strip_wow_markup(text: &str) -> String {
    RE_WOW_MARKUP.replace_all(text, "").into_owned()
}

/// True if the raw text consists entirely of WoW item/spell links.
fn is_item_link_only(raw_text: &str) -> bool {
    RE_WOW_LINK.is_match(raw_text) && RE_WOW_LINK.replace_all(raw_text, "").trim().is_empty()
}

fn is_system_message(text: &str) -> bool {
    SYSTEM_PATTERNS.iter().any(|p| p.is_match(text))
}

/// Strip markup and filter out item-link-only / system messages.
fn clean_text(raw_text: &str) -> Option<String> {
    let raw = raw_text.trim();
    if is_item_link_only(raw) {
        return None;
    }
    let text = strip_wow_markup(raw);
    if is_system_message(&text) {
        return None;
    }
    Some(text)
}

fn group<'a>(caps: &'a regex::Captures, i: usize) -> &'a str {
    caps.get(i).map(|m| m.as_str()).unwrap_or("")
}

fn build_message(
    caps: &regex::Captures,
    channel: Channel,
    author_idx: usize,
    text_idx: usize,
) -> Option<ChatMessage> {
    let text = clean_text(group(caps, text_idx))?;
    Some(ChatMessage {
        timestamp: group(caps, 1).to_string(),
        channel,
        author: group(caps, author_idx).to_string(),
        server: group(caps, author_idx + 1).to_string(),
        text,
    })
}

/// Parse a single chat-log line into a `ChatMessage`.
///
/// Returns None if the line is unparseable or a system message.
pub fn parse_line(line: &str) -> Option<ChatMessage> {
    // Strip inline color codes but keep hyperlinks: the addon may send raw
    // markup with color-coded player names like [|cff3fc7ebName-Server|r].
    let line = RE_COLOR_CODES.replace_all(line, "");

    // Whisper TO (English "To [Author]", Russian "Кому [Author]")
    for regex in [&*RE_WHISPER_TO, &*RE_WHISPER_TO_RU] {
        if let Some(caps) = regex.captures(&line) {
            return build_message(&caps, Channel::WhisperTo, 2, 4);
        }
    }

    // Whisper FROM ("whispers:" / "шепчет:", optional player hyperlink)
    if let Some(caps) = RE_WHISPER_FROM.captures(&line) {
        return build_message(&caps, Channel::WhisperFrom, 2, 4);
    }

    // Non-EN hyperlink format: |Hchannel:TYPE|h[Name]|h Author: text
    if let Some(caps) = RE_HCHANNEL_MSG.captures(&line) {
        let channel = Channel::from_hchannel_id(group(&caps, 2))?;
        return build_message(&caps, channel, 3, 5);
    }

    // Bracket channel + player hyperlink: [Channel] |Hplayer:...|h[Name]|h: text
    if let Some(caps) = RE_BRACKET_HPLAYER_MSG.captures(&line) {
        if let Some(channel) = Channel::from_log_name(group(&caps, 2)) {
            if let Some(msg) = build_message(&caps, channel, 3, 5) {
                return Some(msg);
            }
        }
    }

    // Standard EN channel message: [Channel] Author: text
    if let Some(caps) = RE_CHANNEL_MSG.captures(&line) {
        // Unknown channel (numbered channels, trade, etc.)
        let channel = Channel::from_log_name(group(&caps, 2))?;
        return build_message(&caps, channel, 3, 5);
    }

    // AddMessage whisper TO (Вы шепчете / You whisper)
    if let Some(caps) = RE_WHISPER_TO_ADDMSG.captures(&line) {
        return build_message(&caps, Channel::WhisperTo, 2, 4);
    }

    // Say/Yell player format: |Hplayer:...|h[Name]|h говорит: text
    if let Some(caps) = RE_SAY_YELL_PLAYER.captures(&line) {
        if let Some(channel) = say_yell_channel(group(&caps, 4)) {
            if let Some(msg) = build_message(&caps, channel, 2, 5) {
                return Some(msg);
            }
        }
    }

    // Say/Yell plain form: NPC Name говорит: text
    if let Some(caps) = RE_SAY_YELL_PLAIN.captures(&line) {
        if let Some(channel) = say_yell_channel(group(&caps, 3)) {
            if let Some(text) = clean_text(group(&caps, 4)) {
                // Author may have spaces (NPC names); no server
                return Some(ChatMessage {
                    timestamp: group(&caps, 1).to_string(),
                    channel,
                    author: group(&caps, 2).trim().to_string(),
                    server: String::new(),
                    text,
                });
            }
        }
    }

    None
}

/// Parse a line from the addon's legacy memory-buffer form.
///
/// Format: `SEQ|CHANNEL|Author-Server|MessageText`.
/// Returns (message, sequence_number).
pub fn parse_addon_line(line: &str) -> (Option<ChatMessage>, u64) {
    let parts: Vec<&str> = line.splitn(4, '|').collect();
    if parts.len() < 4 {
        return (None, 0);
    }

    let Ok(seq) = parts[0].parse::<u64>() else {
        return (None, 0);
    };

    let Some(channel) = Channel::from_addon_event(parts[1]) else {
        return (None, seq);
    };

    let (author, server) = match parts[2].split_once('-') {
        Some((a, s)) => (a, s),
        None => (parts[2], ""),
    };

    let Some(text) = clean_text(parts[3]) else {
        return (None, seq);
    };

    (
        Some(ChatMessage {
            timestamp: local_timestamp(),
            channel,
            author: author.to_string(),
            server: server.to_string(),
            text,
        }),
        seq,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_message() {
        let msg = parse_line("2/15 21:30:45.123  [Party] Артас-Азурегос: Привет всем").unwrap();
        assert_eq!(msg.channel, Channel::Party);
        assert_eq!(msg.author, "Артас");
        assert_eq!(msg.server, "Азурегос");
        assert_eq!(msg.text, "Привет всем");
        assert_eq!(msg.timestamp, "2/15 21:30:45.123");
    }

    #[test]
    fn raid_leader_message() {
        let msg = parse_line("2/15 21:30:45.123  [Raid Leader] Thrall-Sargeras: Pull in 5").unwrap();
        assert_eq!(msg.channel, Channel::RaidLeader);
        assert_eq!(msg.author, "Thrall");
        assert_eq!(msg.server, "Sargeras");
        assert_eq!(msg.text, "Pull in 5");
    }

    #[test]
    fn say_without_server() {
        let msg = parse_line("2/15 21:30:45.123  [Say] PlayerName: Hello").unwrap();
        assert_eq!(msg.author, "PlayerName");
        assert_eq!(msg.server, "");
    }

    #[test]
    fn russian_channel_name() {
        let msg = parse_line("2/15 21:30:45.123  [Гильдия] Кириллик-Сервер: текст").unwrap();
        assert_eq!(msg.channel, Channel::Guild);
        assert_eq!(msg.author, "Кириллик");
        assert_eq!(msg.server, "Сервер");
    }

    #[test]
    fn whisper_from() {
        let msg =
            parse_line("2/15 21:30:45.123  [Артас-Азурегос] whispers: тайное сообщение").unwrap();
        assert_eq!(msg.channel, Channel::WhisperFrom);
        assert_eq!(msg.author, "Артас");
        assert!(msg.is_whisper());
    }

    #[test]
    fn whisper_from_russian_verb() {
        let msg = parse_line("2/15 21:30:45.123  [Fury] шепчет: привет").unwrap();
        assert_eq!(msg.channel, Channel::WhisperFrom);
        assert_eq!(msg.author, "Fury");
        assert_eq!(msg.text, "привет");
    }

    #[test]
    fn whisper_from_hyperlinked() {
        let msg = parse_line(
            "2/15 21:30:45.123  |Hplayer:Name-Server:1|h[Name-Server]|h whispers: hi there",
        )
        .unwrap();
        assert_eq!(msg.channel, Channel::WhisperFrom);
        assert_eq!(msg.author, "Name");
        assert_eq!(msg.server, "Server");
        assert_eq!(msg.text, "hi there");
    }

    #[test]
    fn whisper_to() {
        let msg = parse_line("2/15 21:30:45.123  To [Артас-Азурегос]: мой ответ").unwrap();
        assert_eq!(msg.channel, Channel::WhisperTo);
        assert_eq!(msg.author, "Артас");
        assert_eq!(msg.text, "мой ответ");
    }

    #[test]
    fn whisper_to_russian() {
        let msg = parse_line("2/15 21:30:45.123  Кому [Друг]: ответ").unwrap();
        assert_eq!(msg.channel, Channel::WhisperTo);
        assert_eq!(msg.author, "Друг");
    }

    #[test]
    fn whisper_to_addmessage_form() {
        let msg = parse_line("2/15 21:30:45.123  Вы шепчете [Fury]: текст").unwrap();
        assert_eq!(msg.channel, Channel::WhisperTo);
        assert_eq!(msg.author, "Fury");
    }

    #[test]
    fn hchannel_message() {
        let msg = parse_line(
            "2/15 21:30:45.123  |Hchannel:RAID_WARNING|h[Объявление рейду]|h Лидер-Сервер: все сюда",
        )
        .unwrap();
        assert_eq!(msg.channel, Channel::RaidWarning);
        assert_eq!(msg.author, "Лидер");
        assert_eq!(msg.server, "Сервер");
        assert_eq!(msg.text, "все сюда");
    }

    #[test]
    fn hchannel_with_player_link() {
        let msg = parse_line(
            "2/15 21:30:45.123  |Hchannel:PARTY|h[Группа]|h |Hplayer:Вася-Гордунни:1:PARTY|h[Вася-Гордунни]|h: го",
        )
        .unwrap();
        assert_eq!(msg.channel, Channel::Party);
        assert_eq!(msg.author, "Вася");
        assert_eq!(msg.server, "Гордунни");
        assert_eq!(msg.text, "го");
    }

    #[test]
    fn bracket_channel_with_player_link() {
        let msg = parse_line(
            "2/15 21:30:45.123  [Объявление рейду] |Hplayer:Лид-Сервер:1:RAID_WARNING|h[Лид-Сервер]|h: пулл",
        )
        .unwrap();
        assert_eq!(msg.channel, Channel::RaidWarning);
        assert_eq!(msg.author, "Лид");
        assert_eq!(msg.text, "пулл");
    }

    #[test]
    fn say_verb_hyperlinked_player() {
        let msg = parse_line(
            "2/15 21:30:45.123  |Hplayer:Гость-Сервер:1|h[Гость-Сервер]|h говорит: мда",
        )
        .unwrap();
        assert_eq!(msg.channel, Channel::Say);
        assert_eq!(msg.author, "Гость");
        assert_eq!(msg.text, "мда");
    }

    #[test]
    fn npc_yell_plain() {
        let msg = parse_line("2/15 21:30:45.123  Lich King yells: You will all serve me").unwrap();
        assert_eq!(msg.channel, Channel::Yell);
        assert_eq!(msg.author, "Lich King");
        assert_eq!(msg.server, "");
    }

    #[test]
    fn color_codes_stripped_but_links_kept() {
        let msg = parse_line(
            "2/15 21:30:45.123  [Party] |cff3fc7ebИмя-Сервер|r: привет",
        )
        .unwrap();
        assert_eq!(msg.author, "Имя");
        assert_eq!(msg.server, "Сервер");
    }

    #[test]
    fn unknown_channel_returns_none() {
        assert!(parse_line("2/15 21:30:45.123  [Trade] Spammer-Server: WTS boost").is_none());
    }

    #[test]
    fn garbage_returns_none() {
        assert!(parse_line("").is_none());
        assert!(parse_line("this is not a valid log line").is_none());
    }

    #[test]
    fn system_message_filtered() {
        assert!(parse_line("2/15 21:30:45.123  [Guild] Player-Server: has come online").is_none());
        assert!(parse_line("2/15 21:30:45.123  [Say] Player-Server: LOOT: something").is_none());
    }

    #[test]
    fn item_link_only_filtered() {
        let line = "2/15 21:30:45.123  [Party] Player-Server: |cFFFF8800|Hitem:12345|h[Sword of Truth]|h|r";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn colon_in_text_preserved() {
        let msg = parse_line("2/15 21:30:45.123  [Party] Player-Server: boss at 50%: phase 2").unwrap();
        assert_eq!(msg.text, "boss at 50%: phase 2");
    }

    #[test]
    fn addon_line_round_trips_tokens() {
        let (msg, seq) = parse_addon_line("17|PARTY|Hero-Stormrage|pull in 5");
        let msg = msg.unwrap();
        assert_eq!(seq, 17);
        assert_eq!(msg.channel, Channel::Party);
        assert_eq!(msg.author, "Hero");
        assert_eq!(msg.server, "Stormrage");
        assert_eq!(msg.text, "pull in 5");
    }

    #[test]
    fn addon_line_whisper_and_no_server() {
        let (msg, seq) = parse_addon_line("3|WHISPER|Ally|gg");
        let msg = msg.unwrap();
        assert_eq!(seq, 3);
        assert_eq!(msg.channel, Channel::WhisperFrom);
        assert_eq!(msg.author, "Ally");
        assert_eq!(msg.server, "");
    }

    #[test]
    fn addon_line_unknown_channel_keeps_seq() {
        let (msg, seq) = parse_addon_line("9|EMOTE|Who|waves");
        assert!(msg.is_none());
        assert_eq!(seq, 9);
    }

    #[test]
    fn addon_line_timestamp_is_parseable() {
        let (msg, _) = parse_addon_line("1|SAY|Solo|hi there");
        let ts = msg.unwrap().timestamp;
        let re = Regex::new(r"^\d+/\d+ \d+:\d+:\d+\.\d+$").unwrap();
        assert!(re.is_match(&ts), "bad timestamp: {}", ts);
    }
}
