//! RFID keystroke-capture engine.
//!
//! The badge reader is a USB-HID keyboard emulator: a tag arrives as a burst
//! of alphanumeric key presses followed by Enter. This module turns that raw
//! stream into discrete tag codes, gated by an explicit arm/disarm lifecycle.
//! It is pure: callers own the key source (terminal reader or a recorded
//! trace) and whatever happens with an emitted code.

use anyhow::Context;
use std::io::BufRead;
use std::time::Instant;

/// Keys bursts arriving further apart than this belong to different scans;
/// a part-filled buffer older than the gap is noise and gets discarded.
pub const DEFAULT_GAP_MS: u64 = 500;
/// Uniform minimum tag length. Shorter Enter-terminated bursts are rejected.
pub const DEFAULT_MIN_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
}

#[derive(Debug, Clone, Copy)]
pub struct KeyPress {
    pub key: Key,
    /// Milliseconds on any monotonic clock shared by one key stream.
    pub at_ms: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct ScanConfig {
    pub gap_ms: u64,
    pub min_len: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            gap_ms: DEFAULT_GAP_MS,
            min_len: DEFAULT_MIN_LEN,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ScanStats {
    pub keys: usize,
    pub emitted: usize,
    pub rejected_short: usize,
    pub stale_discards: usize,
}

/// Armed/unarmed capture state plus the character buffer.
///
/// Contract: never emits while unarmed; never emits a code shorter than the
/// configured minimum; a buffer that went stale is discarded, not
/// concatenated with the next scan; safe to keep pushing right after an
/// emission.
#[derive(Debug)]
pub struct ScanSession {
    cfg: ScanConfig,
    armed: bool,
    buffer: String,
    last_key_ms: Option<u64>,
    stats: ScanStats,
}

impl ScanSession {
    pub fn new(cfg: ScanConfig) -> Self {
        Self {
            cfg,
            armed: false,
            buffer: String::new(),
            last_key_ms: None,
            stats: ScanStats::default(),
        }
    }

    pub fn arm(&mut self) {
        self.armed = true;
        log::debug!("scan session armed");
    }

    /// Disarm and drop any partial buffer. Called on every exit path of a
    /// scan loop: success, cancel, and error.
    pub fn disarm(&mut self) {
        self.armed = false;
        self.buffer.clear();
        self.last_key_ms = None;
        log::debug!("scan session disarmed");
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Feed one key press; returns a completed tag code when the press
    /// terminates a valid burst.
    pub fn push(&mut self, press: KeyPress) -> Option<String> {
        if !self.armed {
            return None;
        }
        self.stats.keys += 1;

        if let Some(last) = self.last_key_ms {
            let stale = press.at_ms.saturating_sub(last) > self.cfg.gap_ms;
            if stale && !self.buffer.is_empty() {
                log::debug!("discarding stale scan buffer ({} chars)", self.buffer.len());
                self.buffer.clear();
                self.stats.stale_discards += 1;
            }
        }
        self.last_key_ms = Some(press.at_ms);

        match press.key {
            Key::Char(c) if c.is_ascii_alphanumeric() => {
                self.buffer.push(c);
                None
            }
            Key::Char(_) => None,
            Key::Enter => {
                let code = std::mem::take(&mut self.buffer);
                if code.len() >= self.cfg.min_len {
                    self.stats.emitted += 1;
                    Some(code)
                } else {
                    if !code.is_empty() {
                        log::debug!("rejecting short scan ({} < {})", code.len(), self.cfg.min_len);
                        self.stats.rejected_short += 1;
                    }
                    None
                }
            }
        }
    }
}

/// Parse a recorded key trace: one key per line, `<delta_ms> <char|ENTER>`,
/// blank lines and `#` comments ignored. Deltas are relative to the previous
/// key, mirroring what a listener would observe from the reader.
pub fn parse_trace(reader: impl BufRead) -> anyhow::Result<Vec<KeyPress>> {
    let mut out = Vec::new();
    let mut clock_ms: u64 = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("trace line {}", idx + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (delta, token) = match (parts.next(), parts.next()) {
            (Some(d), Some(t)) => (d, t),
            _ => anyhow::bail!("trace line {}: expected `<delta_ms> <key>`", idx + 1),
        };
        let delta: u64 = delta
            .trim_start_matches('+')
            .parse()
            .with_context(|| format!("trace line {}: bad delta", idx + 1))?;
        clock_ms = clock_ms
            .checked_add(delta)
            .with_context(|| format!("trace line {}: clock overflow", idx + 1))?;
        let key = if token.eq_ignore_ascii_case("enter") {
            Key::Enter
        } else {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => anyhow::bail!("trace line {}: key must be one char or ENTER", idx + 1),
            }
        };
        out.push(KeyPress {
            key,
            at_ms: clock_ms,
        });
    }
    Ok(out)
}

/// Interactive key source: each stdin line is one reader burst (the HID
/// reader types the code and terminates it with Enter). Intra-line timing is
/// not observable through a line-buffered terminal, so all chars of a line
/// share the read timestamp; the staleness gap applies between lines.
pub fn stdin_keys() -> impl Iterator<Item = KeyPress> {
    let started = Instant::now();
    std::io::stdin()
        .lines()
        .map_while(Result::ok)
        .flat_map(move |line| {
            let at_ms = started.elapsed().as_millis() as u64;
            let mut presses: Vec<KeyPress> = line
                .trim()
                .chars()
                .map(|c| KeyPress {
                    key: Key::Char(c),
                    at_ms,
                })
                .collect();
            presses.push(KeyPress {
                key: Key::Enter,
                at_ms,
            });
            presses
        })
}
