use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// How command executions relate to each other.
///
/// - `Concurrent`: every accepted change launches its own command instance,
///   independent of anything still running (default behaviour).
/// - `Serial`: launches are still fire-and-forget for the dispatcher, but the
///   child processes run one at a time in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    #[default]
    Concurrent,
    Serial,
}

impl FromStr for ExecMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concurrent" => Ok(ExecMode::Concurrent),
            "serial" => Ok(ExecMode::Serial),
            other => Err(format!(
                "invalid exec mode: {other} (expected \"concurrent\" or \"serial\")"
            )),
        }
    }
}

/// Change detection strategy, selected once at startup from the poll period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Re-stat every target each `period` and compare modification times.
    Poll { period: Duration },
    /// Subscribe to OS change notifications.
    Notification,
}

impl Strategy {
    /// A zero period selects notification mode.
    pub fn from_poll_period(period: Duration) -> Self {
        if period.is_zero() {
            Strategy::Notification
        } else {
            Strategy::Poll { period }
        }
    }

    /// Only the notification strategy needs duplicate suppression; polling
    /// already filters on strictly newer modification times.
    pub fn needs_debounce(&self) -> bool {
        matches!(self, Strategy::Notification)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Poll { period } => write!(f, "poll({period:?})"),
            Strategy::Notification => f.write_str("notification"),
        }
    }
}

/// Parse a simple duration string like `"300ms"`, `"3s"`, `"1m"`, `"2h"`.
///
/// A bare integer is taken as milliseconds, so `"0"` is accepted.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = match s.chars().position(|c| !c.is_ascii_digit()) {
        Some(idx) => idx,
        None => {
            let value: u64 = s
                .parse()
                .map_err(|e| format!("invalid duration number '{}': {}", s, e))?;
            return Ok(Duration::from_millis(value));
        }
    };

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => value
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration too large: '{}'", s)),
        "h" => value
            .checked_mul(60 * 60)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration too large: '{}'", s)),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_units_and_bare_millis() {
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("3s"), Ok(Duration::from_secs(3)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse_duration(" 0 "), Ok(Duration::ZERO));
        assert_eq!(parse_duration("40"), Ok(Duration::from_millis(40)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("ms").is_err());
        assert!(parse_duration("5 fortnights").is_err());
        assert!(parse_duration("9999999999999999h").is_err());
        assert!(parse_duration("999999999999999999m").is_err());
    }

    #[test]
    fn zero_period_selects_notification() {
        assert_eq!(Strategy::from_poll_period(Duration::ZERO), Strategy::Notification);
        assert!(Strategy::Notification.needs_debounce());

        let poll = Strategy::from_poll_period(Duration::from_millis(300));
        assert_eq!(
            poll,
            Strategy::Poll {
                period: Duration::from_millis(300)
            }
        );
        assert!(!poll.needs_debounce());
    }

    #[test]
    fn exec_mode_from_str() {
        assert_eq!("Serial".parse::<ExecMode>(), Ok(ExecMode::Serial));
        assert_eq!("concurrent".parse::<ExecMode>(), Ok(ExecMode::Concurrent));
        assert!("parallel".parse::<ExecMode>().is_err());
    }
}
