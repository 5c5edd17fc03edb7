//! Append-only audit log, capped to the most recent entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const LOG_CAPACITY: usize = 2000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditLog {
    entries: Vec<String>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl AsRef<str>) {
        self.record(Utc::now(), message);
    }

    /// Appends `"<YYYY-MM-DD HH:MM:SS>  <message>"` and drops the oldest
    /// entries beyond [`LOG_CAPACITY`].
    pub fn record(&mut self, at: DateTime<Utc>, message: impl AsRef<str>) {
        let stamp = at.format("%Y-%m-%d %H:%M:%S");
        self.entries.push(format!("{stamp}  {}", message.as_ref()));
        self.enforce_capacity();
    }

    pub(crate) fn enforce_capacity(&mut self) {
        if self.entries.len() > LOG_CAPACITY {
            let excess = self.entries.len() - LOG_CAPACITY;
            self.entries.drain(..excess);
        }
    }

    pub fn tail(&self, n: usize) -> &[String] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_prefixes_stamp() {
        let mut log = AuditLog::new();
        let at = Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 5).unwrap();
        log.record(at, "[2024-07-01] HALF: A 15->7, B 0->0, C 3->1");
        assert_eq!(
            log.last(),
            Some("2024-07-01 09:30:05  [2024-07-01] HALF: A 15->7, B 0->0, C 3->1")
        );
    }

    #[test]
    fn capped_to_capacity() {
        let mut log = AuditLog::new();
        for i in 0..(LOG_CAPACITY + 5) {
            log.push(format!("entry {i}"));
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        assert!(log.entries()[0].ends_with("entry 5"));
        assert!(log.last().unwrap().ends_with(&format!("entry {}", LOG_CAPACITY + 4)));
    }

    #[test]
    fn tail_shorter_than_log() {
        let mut log = AuditLog::new();
        log.push("one");
        log.push("two");
        log.push("three");
        let tail = log.tail(2);
        assert_eq!(tail.len(), 2);
        assert!(tail[1].ends_with("three"));
        assert_eq!(log.tail(50).len(), 3);
    }
}
