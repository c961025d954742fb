use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Speaker assigned to lines without a label
pub const UNKNOWN_SPEAKER: &str = "不明";

const HOSTILE_LEXICON: &[&str] = &[
    "死ね", "殺す", "バカ", "馬鹿", "クソ", "ゴミ", "最悪", "黙れ", "雑魚",
];

// Content stops at any line terminator, not only `\n`
static SPEAKER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^\s:：]+)\s*[:：]([^\r\n\u{2028}\u{2029}]+)$").unwrap()
});
static SPEAKER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s:：]+\s*[:：]").unwrap());

/// Per-speaker counters gathered from a transcript
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeakerStats {
    pub lines: u32,
    /// Total content length in UTF-16 code units
    pub chars: u32,
    pub questions: u32,
    pub exclaims: u32,
    /// Hostile lexicon hits
    pub negatives: u32,
}

impl SpeakerStats {
    fn record(&mut self, content: &str) {
        self.lines += 1;
        self.chars += content.encode_utf16().count() as u32;
        self.questions += content.chars().filter(|c| matches!(c, '?' | '？')).count() as u32;
        self.exclaims += content.chars().filter(|c| matches!(c, '!' | '！')).count() as u32;
        self.negatives += count_hostile(content);
    }

    /// Mean content length per line, 0 when the speaker never spoke
    pub fn avg_len(&self) -> f64 {
        if self.lines == 0 {
            0.0
        } else {
            f64::from(self.chars) / f64::from(self.lines)
        }
    }
}

/// Count hostile lexicon occurrences (non-overlapping, per lexeme)
pub fn count_hostile(content: &str) -> u32 {
    HOSTILE_LEXICON
        .iter()
        .map(|lexeme| content.matches(lexeme).count() as u32)
        .sum()
}

/// Split a `name: content` line. Returns `None` for the speaker when the line
/// has no label.
pub fn split_speaker(line: &str) -> (Option<&str>, &str) {
    match SPEAKER_LINE.captures(line) {
        Some(caps) => {
            let speaker = caps.get(1).map(|m| m.as_str().trim());
            let content = caps.get(2).map_or("", |m| m.as_str().trim());
            (speaker, content)
        }
        None => (None, line),
    }
}

/// Remove a leading speaker label, if any
pub fn strip_speaker_label(line: &str) -> &str {
    match SPEAKER_PREFIX.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// A transcript reduced to lines, participants and per-speaker stats
#[derive(Debug, Clone, Default)]
pub struct ParsedTranscript {
    /// Non-empty trimmed lines
    pub lines: Vec<String>,
    /// Distinct speakers in first-seen order
    pub participants: Vec<String>,
    pub stats: HashMap<String, SpeakerStats>,
}

impl ParsedTranscript {
    pub fn parse(transcript: &str) -> Self {
        let mut parsed = Self::default();

        for line in transcript
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
        {
            let (speaker, content) = split_speaker(line);
            let speaker = speaker.unwrap_or(UNKNOWN_SPEAKER);

            if !parsed.participants.iter().any(|p| p == speaker) {
                parsed.participants.push(speaker.to_string());
            }
            parsed
                .stats
                .entry(speaker.to_string())
                .or_default()
                .record(content);
            parsed.lines.push(line.to_string());
        }

        parsed
    }

    /// Stats for a speaker, all-zero when the speaker never appeared
    pub fn stats_for(&self, speaker: &str) -> SpeakerStats {
        self.stats.get(speaker).copied().unwrap_or_default()
    }
}
