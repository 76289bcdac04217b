//! Reads chat lines from the addon's in-memory buffer string.
//!
//! The addon publishes chat events in a Lua string bracketed by
//! `__WCT_BUF__`/`__WCT_END__` markers. Lua strings are immutable — every
//! buffer rebuild allocates a NEW string at a NEW address, and the stale one
//! lingers until the collector reclaims it. The scanner finds the current
//! buffer with a tiered cascade, follows it as it relocates, and delivers
//! lines with unseen sequence numbers.
//!
//! All memory access is read-only through standard OS query/read calls.

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashSet, VecDeque};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::memory::{self, BufferRegion, ProcessMemoryReader};
use crate::parser::{local_timestamp, Channel};
use crate::stop::StopSignal;
use crate::watcher::LineCallback;

// Markers written by the addon into its buffer string.
pub const MARKER_START: &[u8] = b"__WCT_BUF__";
pub const MARKER_END: &[u8] = b"__WCT_END__";

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const ATTACH_RETRY_INTERVAL: Duration = Duration::from_secs(5);
const SCAN_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// Max read-ahead for one buffer probe.
const MAX_BUF_READ: usize = 64 * 1024;
/// Lua allocates strings in small pages; regions above this are skipped by
/// the heap tier.
const HEAP_REGION_MAX: usize = 8 * 1024 * 1024;
/// Chunk size for region scanning, overlapped by the marker length.
const SCAN_CHUNK: usize = 4 * 1024 * 1024;

/// How many past marker regions to remember.
const REGION_HISTORY_SIZE: usize = 16;

/// Adaptive rescan ladder: ramp up when idle, reset on new messages.
const RESCAN_INTERVALS: [Duration; 4] = [
    Duration::from_secs(2),
    Duration::from_secs(5),
    Duration::from_secs(10),
    Duration::from_secs(30),
];

/// How long re-delivery suppression lasts after a sequence reset.
const PRE_RESET_GUARD: Duration = Duration::from_secs(60);
/// Payload prefix length used for reset dedup, in chars.
const PRE_RESET_PREFIX: usize = 200;

const RAW_LOG_FILE: &str = "wct_raw.log";

/// Process names to try, in order.
pub const WOW_PROCESS_NAMES: &[&str] = &["Wow.exe", "WowT.exe", "WowB.exe"];

// ─── Connection status ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WowStatus {
    Offline = 0,
    Searching = 1,
    Attached = 2,
}

impl WowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Searching => "searching",
            Self::Attached => "attached",
        }
    }
}

/// Cheap cross-thread status snapshot for the GUI poll.
#[derive(Clone)]
pub struct ScannerStatus(Arc<AtomicU8>);

impl ScannerStatus {
    fn new() -> Self {
        Self(Arc::new(AtomicU8::new(WowStatus::Offline as u8)))
    }

    fn set(&self, status: WowStatus) {
        self.0.store(status as u8, Ordering::Relaxed);
    }

    pub fn get(&self) -> WowStatus {
        match self.0.load(Ordering::Relaxed) {
            2 => WowStatus::Attached,
            1 => WowStatus::Searching,
            _ => WowStatus::Offline,
        }
    }
}

// ─── Region history ──────────────────────────────────────────────────

/// Bounded move-to-front list of regions where markers were found. Lua
/// tends to reuse the same heap segments, so scanning these first beats a
/// full region sweep by two orders of magnitude.
struct RegionHistory {
    entries: VecDeque<BufferRegion>,
}

impl RegionHistory {
    fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(REGION_HISTORY_SIZE),
        }
    }

    fn record(&mut self, region: BufferRegion) {
        if let Some(pos) = self.entries.iter().position(|r| *r == region) {
            self.entries.remove(pos);
        }
        self.entries.push_front(region);
        self.entries.truncate(REGION_HISTORY_SIZE);
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn regions(&self) -> Vec<BufferRegion> {
        self.entries.iter().copied().collect()
    }
}

// ─── Buffer content helpers ──────────────────────────────────────────

fn find_subslice(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < from + needle.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

/// Highest sequence number on any line of the buffer content.
fn extract_max_seq(content: &[u8]) -> u64 {
    let mut max_seq = 0;
    for line in content.split(|&b| b == b'\n') {
        let Some(idx) = line.iter().position(|&b| b == b'|') else {
            continue;
        };
        if idx == 0 {
            continue;
        }
        if let Ok(seq) = std::str::from_utf8(&line[..idx])
            .unwrap_or("")
            .trim()
            .parse::<u64>()
        {
            max_seq = max_seq.max(seq);
        }
    }
    max_seq
}

static RE_EMBEDDED_TS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}:\d{2}\s+").unwrap());

/// Quick check whether a RAW payload is obvious system/addon noise.
fn is_system_noise(text: &str) -> bool {
    let t = RE_EMBEDDED_TS.replace(text.trim_start(), "");
    let t = t.as_ref();
    if ["<DBM>", "<BW>", "<WA>", "|TInterface", "[WCT]", "[MoveAny"]
        .iter()
        .any(|p| t.starts_with(p))
    {
        return true;
    }
    if t.contains("|Hachievement:") {
        return true;
    }
    if t.contains("заслужил") && t.contains("достижение") {
        return true;
    }
    if t.contains("has earned") && t.contains("achievement") {
        return true;
    }
    if t.contains(" создает: ") || t.contains(" creates: ") {
        return true;
    }
    if t.contains(" производит ") && t.contains(" в звание ") {
        return true;
    }
    if t.starts_with("Вы превращаете") || t.starts_with("You convert") {
        return true;
    }
    if [
        "Вы не состоите",
        "You are not in",
        "Смена канала",
        "Channel ",
        "Вы покинули канал",
        "You left channel",
        "Ведите себя",
        "Please keep",
        "Сообщение дня от гильдии",
        "Guild Message of the Day",
    ]
    .iter()
    .any(|p| t.starts_with(p))
    {
        return true;
    }
    if t.contains(" ставит маяк ") || t.contains(" получает добычу") {
        return true;
    }
    if t.contains(" получает предмет") || t.contains(" receives loot") {
        return true;
    }
    if t.contains(" засыпает.") || t.contains(" очищает ") || t.contains(" освобождает ") {
        return true;
    }
    if t.contains(" находит что-то ") || t.contains(" в панике пытается бежать") {
        return true;
    }
    t.starts_with("Получено:") || t.starts_with("You receive")
}

fn payload_prefix(payload: &str) -> String {
    payload.chars().take(PRE_RESET_PREFIX).collect()
}

/// Lua strings may carry embedded NULs from taint-corrupted
/// GetMessageInfo() results. Truncate at the first NUL, then right-trim
/// control bytes.
fn sanitize_payload(payload: &str) -> &str {
    let payload = match payload.find('\0') {
        Some(pos) => &payload[..pos],
        None => payload,
    };
    payload.trim_end_matches(|c: char| (c as u32) <= 0x08)
}

/// Convert a legacy buffer entry to a chat-log line the parser accepts.
fn make_synthetic_log_line(channel: &str, author: &str, text: &str) -> Option<String> {
    let ts = local_timestamp();
    match channel {
        "WHISPER" => Some(format!("{}  [{}] whispers: {}", ts, author, text)),
        "WHISPER_INFORM" => Some(format!("{}  To [{}]: {}", ts, author, text)),
        _ => {
            let log_channel = Channel::from_addon_event(channel)?;
            Some(format!("{}  [{}] {}: {}", ts, log_channel.label(), author, text))
        }
    }
}

// ─── Scanner ─────────────────────────────────────────────────────────

/// Drives the attach → find marker → poll → rescan-on-stale loop.
struct BufScanner {
    reader: Box<dyn ProcessMemoryReader>,
    on_line: LineCallback,
    status: ScannerStatus,
    raw_log_path: Option<PathBuf>,

    attached: bool,
    last_seq: u64,

    buf_addr: usize,
    all_regions: Vec<BufferRegion>,
    region_history: RegionHistory,

    // Consecutive stale reads, with exponential-backoff tiers.
    stale_count: u32,
    stale_tier: u32,

    // Seq reset guard: recent payload prefixes to avoid re-delivery.
    pre_reset_texts: HashSet<String>,
    pre_reset_expire: Option<Instant>,

    // Proactive relocation rescan.
    last_rescan: Instant,
    rescan_interval: Duration,
    same_addr_count: u32,
}

impl BufScanner {
    fn new(
        reader: Box<dyn ProcessMemoryReader>,
        on_line: LineCallback,
        status: ScannerStatus,
        raw_log_path: Option<PathBuf>,
    ) -> Self {
        Self {
            reader,
            on_line,
            status,
            raw_log_path,
            attached: false,
            last_seq: 0,
            buf_addr: 0,
            all_regions: Vec::new(),
            region_history: RegionHistory::new(),
            stale_count: 0,
            stale_tier: 0,
            pre_reset_texts: HashSet::new(),
            pre_reset_expire: None,
            last_rescan: Instant::now(),
            rescan_interval: RESCAN_INTERVALS[0],
            same_addr_count: 0,
        }
    }

    fn run_loop(&mut self, stop: &StopSignal) {
        while !stop.is_stopped() {
            // Step 1: attach to the game process
            if !self.attached {
                self.status.set(WowStatus::Searching);
                match self.try_attach() {
                    Ok(true) => {}
                    Ok(false) => {
                        if stop.wait_timeout(ATTACH_RETRY_INTERVAL) {
                            break;
                        }
                        continue;
                    }
                    Err(e) => {
                        info!("Cannot attach to WoW: {}", e);
                        if stop.wait_timeout(ATTACH_RETRY_INTERVAL) {
                            break;
                        }
                        continue;
                    }
                }
            }
            self.status.set(WowStatus::Attached);

            // Step 2: find the marker if we don't have one
            if self.buf_addr == 0 && !self.find_marker(0) {
                if !self.reader.is_process_alive() {
                    info!("WoW process gone, detaching");
                    self.detach();
                }
                if stop.wait_timeout(SCAN_RETRY_INTERVAL) {
                    break;
                }
                continue;
            }

            // Step 3: read the buffer and deliver new messages
            self.poll_buffer();
            if self.attached && !self.reader.is_process_alive() {
                info!("WoW process gone, detaching");
                self.detach();
                continue;
            }

            if stop.wait_timeout(POLL_INTERVAL) {
                break;
            }
        }
        self.detach();
        self.status.set(WowStatus::Offline);
    }

    // ── Attach / detach ──────────────────────────────────────────────

    fn try_attach(&mut self) -> std::io::Result<bool> {
        let mut sys = sysinfo::System::new();
        sys.refresh_processes(sysinfo::ProcessesToUpdate::All, true);

        for proc_name in WOW_PROCESS_NAMES {
            let found = sys
                .processes()
                .values()
                .find(|p| p.name().to_string_lossy().eq_ignore_ascii_case(proc_name));
            let Some(process) = found else { continue };
            let pid = process.pid().as_u32();
            self.reader.attach(pid)?;
            self.attached = true;
            info!("Attached to {} (PID {})", proc_name, pid);

            // Cache memory regions for fast rescans
            self.all_regions = self.reader.memory_regions()?;
            info!("Cached {} readable memory regions", self.all_regions.len());
            return Ok(true);
        }
        Ok(false)
    }

    fn detach(&mut self) {
        let _ = self.reader.detach();
        self.attached = false;
        self.buf_addr = 0;
        self.all_regions.clear();
        self.stale_count = 0;
        self.status.set(WowStatus::Searching);
    }

    // ── Marker scanning (tiered cascade) ─────────────────────────────

    /// Scan a region set for the best (highest seq) marker above `min_seq`.
    fn scan_regions_for_marker(&self, regions: &[BufferRegion], min_seq: u64) -> Option<usize> {
        let mut best_addr = None;
        let mut best_seq = 0u64;

        for region in regions {
            let mut off = 0;
            while off < region.size {
                let read_size = SCAN_CHUNK.min(region.size - off);
                let Ok(chunk) = self.reader.read_memory(region.base + off, read_size) else {
                    break;
                };
                if chunk.is_empty() {
                    break;
                }

                let mut pos = 0;
                while let Some(hit) = find_subslice(&chunk, MARKER_START, pos) {
                    let addr = region.base + off + hit;
                    if let Some(seq) = self.candidate_seq(addr) {
                        if seq > min_seq && seq > best_seq {
                            best_seq = seq;
                            best_addr = Some(addr);
                        }
                    }
                    pos = hit + 1;
                }

                // Overlap chunk boundaries to catch split markers.
                if chunk.len() < read_size {
                    break;
                }
                if off + read_size >= region.size {
                    break;
                }
                off += read_size - (MARKER_START.len() - 1);
            }
        }

        best_addr
    }

    /// Validate a candidate marker address, returning its max seq.
    fn candidate_seq(&self, addr: usize) -> Option<u64> {
        // A probe crossing the region end would fail wholesale; clamp it.
        let read_size = self
            .all_regions
            .iter()
            .find(|r| r.contains(addr))
            .map(|r| MAX_BUF_READ.min(r.base + r.size - addr))
            .unwrap_or(MAX_BUF_READ);
        let raw = self.reader.read_memory(addr, read_size).ok()?;
        if !raw.starts_with(MARKER_START) {
            return None;
        }
        let end = find_subslice(&raw, MARKER_END, MARKER_START.len())?;
        let content = &raw[MARKER_START.len()..end];
        let seq = extract_max_seq(content);
        if seq > 0 {
            Some(seq)
        } else {
            None
        }
    }

    fn heap_regions(&self) -> Vec<BufferRegion> {
        self.all_regions
            .iter()
            .filter(|r| r.size <= HEAP_REGION_MAX)
            .copied()
            .collect()
    }

    /// Find the buffer marker using the tiered cascade:
    /// 1. History scan (~30ms) — regions where markers were previously found
    /// 2. Heap scan (~2.5s) — all ≤8MB regions
    /// 3. Full sweep (~7s) — every cached region, last resort
    fn find_marker(&mut self, min_seq: u64) -> bool {
        if self.region_history.is_empty() {
            debug!("No region history, skipping history scan");
        } else {
            let t0 = Instant::now();
            if let Some(addr) = self.scan_regions_for_marker(&self.region_history.regions(), min_seq)
            {
                info!(
                    "History scan HIT: marker at 0x{:X} ({}ms)",
                    addr,
                    t0.elapsed().as_millis()
                );
                self.adopt_marker(addr);
                return true;
            }
            info!("History scan MISS ({}ms)", t0.elapsed().as_millis());
        }

        if let Ok(regions) = self.reader.memory_regions() {
            self.all_regions = regions;
        }

        let t0 = Instant::now();
        if let Some(addr) = self.scan_regions_for_marker(&self.heap_regions(), min_seq) {
            info!(
                "Heap scan HIT: marker at 0x{:X} ({:.1}s)",
                addr,
                t0.elapsed().as_secs_f64()
            );
            self.adopt_marker(addr);
            return true;
        }
        info!("Heap scan MISS ({:.1}s)", t0.elapsed().as_secs_f64());

        let t0 = Instant::now();
        if let Some(addr) = self.scan_regions_for_marker(&self.all_regions.clone(), min_seq) {
            info!(
                "Full scan: marker at 0x{:X} ({:.1}s)",
                addr,
                t0.elapsed().as_secs_f64()
            );
            self.adopt_marker(addr);
            return true;
        }

        warn!(
            "All scans failed: marker not found ({:.1}s total)",
            t0.elapsed().as_secs_f64()
        );
        false
    }

    fn adopt_marker(&mut self, addr: usize) {
        self.buf_addr = addr;
        self.stale_count = 0;
        self.record_hit_from_addr(addr);
        self.maybe_skip_existing(addr);
    }

    /// Record the region containing `addr` in the history.
    fn record_hit_from_addr(&mut self, addr: usize) {
        if let Some(region) = self.all_regions.iter().find(|r| r.contains(addr)) {
            self.region_history.record(*region);
        }
    }

    /// Skip existing buffer history on first connect so old chatter does
    /// not flood the overlay.
    fn maybe_skip_existing(&mut self, addr: usize) {
        if self.last_seq != 0 {
            return;
        }
        if let Some(max_seq) = self.candidate_seq(addr) {
            self.last_seq = max_seq;
            info!("Skipping existing buffer (last_seq={})", max_seq);
        }
    }

    // ── Polling ──────────────────────────────────────────────────────

    fn read_buffer(&self) -> Option<String> {
        if self.buf_addr == 0 {
            return None;
        }
        let read_size = self
            .all_regions
            .iter()
            .find(|r| r.contains(self.buf_addr))
            .map(|r| MAX_BUF_READ.min(r.base + r.size - self.buf_addr))
            .unwrap_or(MAX_BUF_READ);
        let raw = self.reader.read_memory(self.buf_addr, read_size).ok()?;
        if !raw.starts_with(MARKER_START) {
            return None;
        }
        let end = find_subslice(&raw, MARKER_END, MARKER_START.len())?;
        Some(String::from_utf8_lossy(&raw[MARKER_START.len()..end]).into_owned())
    }

    /// Read the addon buffer and deliver new messages.
    ///
    /// Two staleness scenarios: the marker is gone (string was collected),
    /// or the old string is still readable but frozen. The first trips the
    /// tiered rescan, the second is caught by the periodic relocation check.
    fn poll_buffer(&mut self) {
        if self.buf_addr == 0 {
            return;
        }

        let Some(content) = self.read_buffer() else {
            self.stale_count += 1;
            // Threshold doubles each tier, capped: 2, 4, 8, 16
            let stale_threshold = (2u32 << self.stale_tier.min(3)).min(16);
            if self.stale_count >= stale_threshold {
                if self.stale_tier == 0 {
                    info!("Marker gone, triggering rescan (tier 0)");
                } else {
                    debug!(
                        "Marker still gone (tier={}, count={}), rescan",
                        self.stale_tier, self.stale_count
                    );
                }
                self.stale_tier += 1;
                self.buf_addr = 0;
                self.stale_count = 0;
            }
            return;
        };

        if content.trim().is_empty() {
            return;
        }

        self.stale_count = 0;
        self.stale_tier = 0;
        self.deliver_new_messages(&content);

        if self.last_rescan.elapsed() >= self.rescan_interval {
            self.last_rescan = Instant::now();
            self.check_for_newer_buffer();
        }
    }

    /// Proactively check whether a newer buffer exists: history scan first,
    /// heap scan on miss. No escalation ladder — go straight to what works.
    fn check_for_newer_buffer(&mut self) {
        let t0 = Instant::now();
        let mut scan_type = "history";
        let mut new_addr = if self.region_history.is_empty() {
            None
        } else {
            self.scan_regions_for_marker(&self.region_history.regions(), 0)
        };

        if new_addr.is_none() {
            if let Ok(regions) = self.reader.memory_regions() {
                self.all_regions = regions;
            }
            new_addr = self.scan_regions_for_marker(&self.heap_regions(), 0);
            scan_type = "heap";
        }

        match new_addr {
            Some(addr) if addr != self.buf_addr => {
                info!(
                    "Found newer buffer at 0x{:X} (was 0x{:X}), {} scan took {}ms",
                    addr,
                    self.buf_addr,
                    scan_type,
                    t0.elapsed().as_millis()
                );
                self.buf_addr = addr;
                self.stale_count = 0;
                self.stale_tier = 0;
                self.same_addr_count = 0;
                self.rescan_interval = RESCAN_INTERVALS[0];
                self.record_hit_from_addr(addr);
            }
            _ => {
                self.same_addr_count += 1;
                let tier =
                    ((self.same_addr_count / 3) as usize).min(RESCAN_INTERVALS.len() - 1);
                self.rescan_interval = RESCAN_INTERVALS[tier];
                if self.same_addr_count <= 3 || self.same_addr_count % 10 == 0 {
                    info!(
                        "Periodic rescan #{}: same buffer ({}, {}ms, next in {}s)",
                        self.same_addr_count,
                        scan_type,
                        t0.elapsed().as_millis(),
                        self.rescan_interval.as_secs()
                    );
                }
            }
        }
    }

    // ── Delivery ─────────────────────────────────────────────────────

    fn deliver_new_messages(&mut self, content: &str) {
        let lines: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            return;
        }

        // Detect seq reset: after /reload the addon restarts seq from 1 and
        // replays its saved buffer.
        let max_seq_in_buf = lines
            .iter()
            .filter_map(|l| l.split('|').next()?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        if max_seq_in_buf > 0 && max_seq_in_buf < self.last_seq {
            info!(
                "Seq reset detected (buf max={}, last_seq={}) — saving texts & resetting",
                max_seq_in_buf, self.last_seq
            );
            self.pre_reset_texts = lines
                .iter()
                .filter_map(|l| l.splitn(3, '|').nth(2))
                .map(payload_prefix)
                .collect();
            self.pre_reset_expire = Some(Instant::now() + PRE_RESET_GUARD);
            self.last_seq = 0;
        }

        let mut new_count = 0;
        for line in &lines {
            let mut parts = line.splitn(3, '|');
            let Some(Ok(seq)) = parts.next().map(|s| s.parse::<u64>()) else {
                continue;
            };
            let Some(kind) = parts.next() else { continue };
            let Some(raw_payload) = parts.next() else { continue };

            if seq <= self.last_seq {
                continue;
            }
            self.last_seq = seq;

            // Seq reset guard: skip messages already delivered before reset.
            if !self.pre_reset_texts.is_empty()
                && self.pre_reset_texts.contains(&payload_prefix(raw_payload))
            {
                debug!("Seq reset dedup: skipping #{} (already delivered)", seq);
                continue;
            }

            new_count += 1;
            let payload = sanitize_payload(raw_payload);

            if kind == "RAW" {
                self.append_raw_log(seq, payload);

                if is_system_noise(payload) {
                    debug!("Addon raw #{}: [skip system] {:.120}", seq, payload);
                    continue;
                }

                // Strip an embedded client-side HH:MM:SS prefix
                let stripped = RE_EMBEDDED_TS.replace(payload, "");
                let log_line = format!("{}  {}", local_timestamp(), stripped);
                info!("Addon raw #{}: {:.200}", seq, log_line);
                (self.on_line)(log_line);
            } else {
                // Legacy format: SEQ|CHANNEL|Author|Text
                let legacy: Vec<&str> = line.splitn(4, '|').collect();
                if legacy.len() >= 4 {
                    if let Some(log_line) =
                        make_synthetic_log_line(legacy[1], legacy[2], legacy[3])
                    {
                        debug!("Addon msg #{}: {:.80}", seq, log_line);
                        (self.on_line)(log_line);
                    }
                }
            }
        }

        // Expire the reset dedup set
        if let Some(expire) = self.pre_reset_expire {
            if Instant::now() > expire {
                debug!(
                    "Pre-reset dedup set expired ({} entries)",
                    self.pre_reset_texts.len()
                );
                self.pre_reset_texts.clear();
                self.pre_reset_expire = None;
            }
        }

        if new_count > 0 {
            info!(
                "Delivered {} new messages (last_seq={})",
                new_count, self.last_seq
            );
            // Back to fast rescans while messages are flowing.
            self.rescan_interval = RESCAN_INTERVALS[0];
            self.same_addr_count = 0;
        }
    }

    fn append_raw_log(&self, seq: u64, payload: &str) {
        let Some(path) = &self.raw_log_path else { return };
        let Ok(mut file) = std::fs::OpenOptions::new().create(true).append(true).open(path)
        else {
            return;
        };
        let _ = writeln!(file, "[{}] #{} {}", local_timestamp(), seq, payload);
    }
}

// ─── Public watcher ──────────────────────────────────────────────────

/// Bridges the buffer scanner to the pipeline: owns the scanner thread and
/// exposes the connection status.
pub struct MemoryChatWatcher {
    stop: StopSignal,
    status: ScannerStatus,
    thread: Option<thread::JoinHandle<()>>,
    callback: Option<LineCallback>,
    raw_log_path: Option<PathBuf>,
}

impl MemoryChatWatcher {
    pub fn new(on_new_line: LineCallback) -> Self {
        Self {
            stop: StopSignal::new(),
            status: ScannerStatus::new(),
            thread: None,
            callback: Some(on_new_line),
            raw_log_path: Some(PathBuf::from(RAW_LOG_FILE)),
        }
    }

    pub fn start(&mut self) {
        let Some(callback) = self.callback.take() else {
            return;
        };
        let stop = self.stop.clone();
        let status = self.status.clone();
        let raw_log_path = self.raw_log_path.clone();
        self.thread = Some(thread::spawn(move || {
            let mut scanner =
                BufScanner::new(memory::create_reader(), callback, status, raw_log_path);
            scanner.run_loop(&stop);
        }));
        info!("Addon buffer scanner thread started");
    }

    pub fn stop(&mut self) {
        self.stop.stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
        self.status.set(WowStatus::Offline);
        info!("Addon buffer scanner stopped");
    }

    pub fn status(&self) -> WowStatus {
        self.status.get()
    }

    /// Cloneable handle for polling the status from another thread.
    pub fn status_handle(&self) -> ScannerStatus {
        self.status.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.status.get() == WowStatus::Attached
    }
}
