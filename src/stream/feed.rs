use crate::model::ChatMessage;
use std::collections::VecDeque;

pub const FEED_CAPACITY: usize = 50;

/// Time-ordered chat messages, keeping only the most recent `capacity`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatFeed {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl Default for ChatFeed {
    fn default() -> Self {
        Self::new(FEED_CAPACITY)
    }
}

impl ChatFeed {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Replaces the whole feed with a single message.
    pub fn reset_with(&mut self, message: ChatMessage) {
        self.messages.clear();
        self.messages.push_back(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }
}
