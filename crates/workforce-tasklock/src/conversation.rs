// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conversation history with character-cap eviction.

use std::collections::VecDeque;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHARACTER_CAP: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: ConversationRole,
    pub content: String,
    pub timestamp_ms: i64,
}

/// Ordered history bounded by a total-character cap; oldest entries are
/// evicted first after each append so retained entries are always a
/// contiguous suffix of the input order.
pub struct ConversationHistory {
    cap: usize,
    entries: RwLock<VecDeque<ConversationEntry>>,
    total_chars: RwLock<usize>,
}

impl ConversationHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            entries: RwLock::new(VecDeque::new()),
            total_chars: RwLock::new(0),
        }
    }

    pub fn append(&self, role: ConversationRole, content: String, timestamp_ms: i64) {
        let added_len = content.chars().count();
        let mut entries = self.entries.write();
        let mut total = self.total_chars.write();

        entries.push_back(ConversationEntry {
            role,
            content,
            timestamp_ms,
        });
        *total += added_len;

        while *total > self.cap {
            match entries.pop_front() {
                Some(evicted) => *total -= evicted.content.chars().count(),
                None => break,
            }
        }
    }

    pub fn snapshot(&self, limit: Option<usize>) -> Vec<ConversationEntry> {
        let entries = self.entries.read();
        match limit {
            Some(n) if n < entries.len() => entries.iter().skip(entries.len() - n).cloned().collect(),
            _ => entries.iter().cloned().collect(),
        }
    }

    pub fn total_chars(&self) -> usize {
        *self.total_chars.read()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CHARACTER_CAP)
    }
}

#[cfg(test)]
#[path = "conversation_tests.rs"]
mod tests;
