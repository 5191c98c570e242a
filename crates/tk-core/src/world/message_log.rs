//! Game message history

use core::fmt;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::{MSG_LIMIT, MSG_MERGE_LIMIT};

/// One log line, possibly standing for several identical messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub count: u32,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count > 1 {
            write!(f, "{} (x{})", self.text, self.count)
        } else {
            f.write_str(&self.text)
        }
    }
}

/// Bounded message log.
///
/// Keeps the latest [`MSG_LIMIT`] lines. A message identical to the last
/// line bumps its counter instead of adding a line, until the counter
/// reaches `MSG_MERGE_LIMIT - 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    lines: VecDeque<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message to the end of the log
    pub fn message(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::trace!(text = %text, "message logged");

        if let Some(last) = self.lines.back_mut()
            && last.text == text
            && last.count + 1 < MSG_MERGE_LIMIT
        {
            last.count += 1;
            return;
        }

        if self.lines.len() == MSG_LIMIT {
            self.lines.pop_front();
        }
        self.lines.push_back(Message { text, count: 1 });
    }

    /// Lines from oldest to newest
    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &Message> {
        self.lines.iter()
    }

    /// The newest `n` lines, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Message> {
        self.lines.iter().skip(self.lines.len().saturating_sub(n))
    }

    pub fn last(&self) -> Option<&Message> {
        self.lines.back()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_messages_merge() {
        let mut log = MessageLog::new();
        log.message("The orc hits you.");
        log.message("The orc hits you.");
        log.message("The orc hits you.");
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().to_string(), "The orc hits you. (x3)");
    }

    #[test]
    fn test_merge_stops_at_nine() {
        let mut log = MessageLog::new();
        for _ in 0..12 {
            log.message("Drip.");
        }
        let counts: Vec<u32> = log.lines().map(|m| m.count).collect();
        assert_eq!(counts, vec![9, 3]);
    }

    #[test]
    fn test_different_messages_do_not_merge() {
        let mut log = MessageLog::new();
        log.message("a");
        log.message("b");
        log.message("a");
        assert_eq!(log.len(), 3);
        assert_eq!(log.last().unwrap().to_string(), "a");
    }

    #[test]
    fn test_oldest_lines_dropped() {
        let mut log = MessageLog::new();
        for i in 0..MSG_LIMIT + 5 {
            log.message(format!("line {i}"));
        }
        assert_eq!(log.len(), MSG_LIMIT);
        assert_eq!(log.lines().next().unwrap().text, "line 5");
        assert_eq!(log.recent(2).map(|m| m.text.as_str()).collect::<Vec<_>>(), vec![
            format!("line {}", MSG_LIMIT + 3),
            format!("line {}", MSG_LIMIT + 4),
        ]);
    }
}
