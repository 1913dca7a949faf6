//! Timestamps carried by log lines
//!
//! Every line the game writes starts with two stamps:
//!
//! ```text
//! [SYS: 2024-11-02 14:03:11][GAME: 00:12.34] steerControl: ...
//! ```
//!
//! The in-game stamp is `MM:SS.CC` and converts to seconds. The wall-clock stamp is
//! kept as the literal `HH:MM:SS` string.

use chrono::NaiveTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static GAME_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[GAME:\s*(\d{2}:\d{2}\.\d{2})\]").expect("game timestamp pattern")
});

static WALL_CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[SYS: \d{4}-\d{2}-\d{2} (\d{2}:\d{2}:\d{2})\]").expect("wall clock pattern")
});

/// Which of the two line stamps a schema keys its records on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampKind {
    /// `[GAME: MM:SS.CC]`, converted to seconds
    #[default]
    Game,
    /// `[SYS: YYYY-MM-DD HH:MM:SS]`, kept as `HH:MM:SS`
    Wall,
}

impl TimestampKind {
    /// Extract this kind of timestamp from a line
    pub fn extract(&self, line: &str) -> Option<Timestamp> {
        match self {
            TimestampKind::Game => game_time(line).map(Timestamp::Game),
            TimestampKind::Wall => wall_clock(line).map(|s| Timestamp::Wall(s.to_string())),
        }
    }
}

/// A parsed line timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// In-game time in seconds
    Game(f64),
    /// Literal wall-clock time (`HH:MM:SS`)
    Wall(String),
}

impl Timestamp {
    /// In-game seconds, if this is a game timestamp
    pub fn seconds(&self) -> Option<f64> {
        match self {
            Timestamp::Game(s) => Some(*s),
            Timestamp::Wall(_) => None,
        }
    }

    /// Literal wall-clock string, if this is a wall-clock timestamp
    pub fn wall_clock(&self) -> Option<&str> {
        match self {
            Timestamp::Game(_) => None,
            Timestamp::Wall(s) => Some(s),
        }
    }

    /// Interpret a wall-clock timestamp as a time of day
    pub fn as_naive_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(self.wall_clock()?, "%H:%M:%S").ok()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Game(s) => write!(f, "{:.2}", s),
            Timestamp::Wall(s) => f.write_str(s),
        }
    }
}

/// Convert an `MM:SS.CC` game time string to seconds (`60 * MM + SS.CC`)
pub fn parse_game_time(s: &str) -> Option<f64> {
    let (minutes, seconds) = s.split_once(':')?;
    let minutes: f64 = minutes.trim().parse().ok()?;
    let seconds: f64 = seconds.trim().parse().ok()?;
    Some(minutes * 60.0 + seconds)
}

/// Game time of a line in seconds
pub fn game_time(line: &str) -> Option<f64> {
    let caps = GAME_TIME_RE.captures(line)?;
    parse_game_time(caps.get(1)?.as_str())
}

/// Wall-clock `HH:MM:SS` of a line
pub fn wall_clock(line: &str) -> Option<&str> {
    WALL_CLOCK_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Latest game time found anywhere in a file
///
/// This is the race time of a run: the game keeps logging until the race ends.
pub fn final_game_time<I, S>(lines: I) -> Option<f64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| game_time(line.as_ref()))
        .fold(None, |max: Option<f64>, t| Some(max.map_or(t, |m| m.max(t))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_game_time() {
        assert_eq!(parse_game_time("01:30.50"), Some(90.5));
        assert_eq!(parse_game_time("00:00.00"), Some(0.0));
        assert_eq!(parse_game_time("12.5"), None);
    }

    #[test]
    fn test_line_stamps() {
        let line = "[SYS: 2024-11-02 14:03:11][GAME: 00:12.34] steerControl: FPS: 60";
        assert_eq!(game_time(line), Some(12.34));
        assert_eq!(wall_clock(line), Some("14:03:11"));

        let ts = TimestampKind::Wall.extract(line).unwrap();
        assert_eq!(ts.seconds(), None);
        assert_eq!(ts.as_naive_time(), NaiveTime::from_hms_opt(14, 3, 11));
        assert_eq!(ts.to_string(), "14:03:11");
    }

    #[test]
    fn test_final_game_time() {
        let lines = [
            "[GAME: 00:01.00] a",
            "no stamp here",
            "[GAME: 01:02.50] b",
            "[GAME: 00:59.99] c",
        ];
        assert_eq!(final_game_time(lines), Some(62.5));
        assert_eq!(final_game_time(["nothing"]), None);
    }
}
