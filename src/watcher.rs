//! Chat-log file watcher using polling.
//!
//! The game buffers chat-log writes, so filesystem notifications are
//! unreliable. We poll the file size every second instead.

use log::{info, warn};
use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::stop::StopSignal;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub type LineCallback = Box<dyn Fn(String) + Send>;

/// Monitors the chat log for new lines by polling file size.
pub struct ChatLogWatcher {
    file_path: PathBuf,
    stop: StopSignal,
    thread: Option<thread::JoinHandle<()>>,
    callback: Option<LineCallback>,
}

impl ChatLogWatcher {
    pub fn new(file_path: PathBuf, on_new_line: LineCallback) -> Self {
        Self {
            file_path,
            stop: StopSignal::new(),
            thread: None,
            callback: Some(on_new_line),
        }
    }

    /// Read the last N non-blank lines from the file (history on startup).
    pub fn read_tail(path: &Path, max_lines: usize) -> Vec<String> {
        let Ok(content) = fs::read_to_string(path) else {
            return Vec::new();
        };
        let lines: Vec<&str> = content.lines().collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..]
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    }

    /// Start polling. Only new data written after this call is delivered.
    pub fn start(&mut self) {
        let Some(callback) = self.callback.take() else {
            return;
        };
        let path = self.file_path.clone();
        let stop = self.stop.clone();
        let position = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        self.thread = Some(thread::spawn(move || {
            let mut poller = TailPoller { path, position, callback };
            while !stop.wait_timeout(POLL_INTERVAL) {
                poller.read_new_lines();
            }
        }));
        info!("Watching (poll) {}", self.file_path.display());
    }

    pub fn stop(&mut self) {
        self.stop.stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
        info!("Stopped watching");
    }
}

struct TailPoller {
    path: PathBuf,
    position: u64,
    callback: LineCallback,
}

impl TailPoller {
    fn read_new_lines(&mut self) {
        let Ok(meta) = fs::metadata(&self.path) else {
            return;
        };
        let size = meta.len();

        // File was truncated or recreated
        if size < self.position {
            info!("Chat log truncated or recreated, resetting position");
            self.position = 0;
        }
        if size == self.position {
            return;
        }

        let mut file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Cannot read chat log: {}", e);
                return;
            }
        };
        if file.seek(SeekFrom::Start(self.position)).is_err() {
            return;
        }
        let mut data = String::new();
        match file.read_to_string(&mut data) {
            Ok(n) => self.position += n as u64,
            Err(e) => {
                warn!("Cannot read chat log: {}", e);
                return;
            }
        }

        for line in data.lines() {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                (self.callback)(trimmed.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    fn collector() -> (LineCallback, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = lines.clone();
        let cb: LineCallback = Box::new(move |l| sink.lock().unwrap().push(l));
        (cb, lines)
    }

    #[test]
    fn delivers_appended_lines_and_skips_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");
        fs::write(&path, "old line\n").unwrap();

        let (cb, lines) = collector();
        let mut poller = TailPoller {
            path: path.clone(),
            position: fs::metadata(&path).unwrap().len(),
            callback: cb,
        };

        let mut f = fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(f, "new one").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "  new two  ").unwrap();
        drop(f);

        poller.read_new_lines();
        assert_eq!(*lines.lock().unwrap(), vec!["new one", "new two"]);
    }

    #[test]
    fn truncation_resets_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");
        fs::write(&path, "a long first generation of content\n").unwrap();

        let (cb, lines) = collector();
        let mut poller = TailPoller {
            path: path.clone(),
            position: fs::metadata(&path).unwrap().len(),
            callback: cb,
        };

        // Shrink the file below the recorded position.
        fs::write(&path, "fresh\n").unwrap();
        poller.read_new_lines();
        assert_eq!(*lines.lock().unwrap(), vec!["fresh"]);
    }

    #[test]
    fn missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let (cb, lines) = collector();
        let mut poller = TailPoller {
            path: dir.path().join("nope.log"),
            position: 0,
            callback: cb,
        };
        poller.read_new_lines();
        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn read_tail_returns_last_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");
        fs::write(&path, "one\ntwo\n\nthree\nfour\n").unwrap();
        let tail = ChatLogWatcher::read_tail(&path, 2);
        assert_eq!(tail, vec!["three", "four"]);
    }

    #[test]
    fn read_tail_missing_file_is_empty() {
        assert!(ChatLogWatcher::read_tail(Path::new("/no/such/file"), 10).is_empty());
    }
}
