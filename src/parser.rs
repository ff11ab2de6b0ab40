// ═══════════════════════════════════════════════════════════════════════════════
// 📦 parser.rs - Detector Line Parser
// ═══════════════════════════════════════════════════════════════════════════════
// This module parses the text lines printed by the camera detector board.
// Accepts `key=value` or `key:value` pairs in any order, e.g.
//   faces=1 fg=6234
//   FACES:0, FG:120, MOTION:1
// ═══════════════════════════════════════════════════════════════════════════════

use regex::Regex;

use crate::detectors::RawReading;

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Detector Parser / محلل خرج الكاشف
// ═══════════════════════════════════════════════════════════════════════════════

/// Parser for detector output lines
/// محلل أسطر خرج الكاشف
pub struct DetectorParser {
    /// Regex pattern matching `key=value` pairs
    /// نمط التعبير النمطي لمطابقة أزواج المفتاح والقيمة
    pair_regex: Regex,
}

impl DetectorParser {
    /// Create a new parser instance
    /// إنشاء مثيل محلل جديد
    pub fn new() -> Self {
        let pair_regex = Regex::new(r"(?i)\b(faces|fg|motion)\s*[:=]\s*(\d+)")
            .expect("Failed to compile regex");

        Self { pair_regex }
    }

    /// Parse one line into a reading.
    ///
    /// Returns `None` when the line has none of the known keys (boot
    /// messages, debug prints, partial lines).
    pub fn parse(&self, line: &str) -> Option<RawReading> {
        let mut reading = RawReading::default();
        let mut matched = false;

        for caps in self.pair_regex.captures_iter(line) {
            let Ok(value) = caps[2].parse::<u64>() else {
                continue;
            };
            matched = true;

            match caps[1].to_ascii_lowercase().as_str() {
                "faces" => reading.faces = value.min(u32::MAX as u64) as u32,
                "fg" => reading.foreground_pixels = value,
                _ => reading.motion_hint = Some(value != 0),
            }
        }

        matched.then_some(reading)
    }
}

impl Default for DetectorParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Split complete lines off the front of a buffer.
///
/// The trailing partial line (if any) stays in `buffer` for the next read.
/// يقسم الأسطر المكتملة ويترك السطر الناقص في المخزن
pub fn drain_lines(buffer: &mut String) -> Vec<String> {
    let Some(last_newline) = buffer.rfind('\n') else {
        return Vec::new();
    };

    let complete: String = buffer.drain(..=last_newline).collect();
    complete
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Unit Tests / اختبارات الوحدة
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value_line() {
        let parser = DetectorParser::new();
        let reading = parser.parse("faces=2 fg=6234").unwrap();

        assert_eq!(reading.faces, 2);
        assert_eq!(reading.foreground_pixels, 6234);
        assert_eq!(reading.motion_hint, None);
    }

    #[test]
    fn test_parse_colon_and_case() {
        let parser = DetectorParser::new();
        let reading = parser.parse("FACES:0, FG:120, Motion:1").unwrap();

        assert_eq!(reading.faces, 0);
        assert_eq!(reading.foreground_pixels, 120);
        assert_eq!(reading.motion_hint, Some(true));
    }

    #[test]
    fn test_ignores_unrelated_lines() {
        let parser = DetectorParser::new();
        assert!(parser.parse("I (312) boot: ESP-IDF v5.1").is_none());
        assert!(parser.parse("").is_none());
    }

    #[test]
    fn test_drain_lines_keeps_partial() {
        let mut buffer = String::from("faces=1 fg=0\r\n\nfaces=0 fg=9000\nfac");
        let lines = drain_lines(&mut buffer);

        assert_eq!(lines, vec!["faces=1 fg=0", "faces=0 fg=9000"]);
        assert_eq!(buffer, "fac");

        assert!(drain_lines(&mut buffer).is_empty());
    }
}
