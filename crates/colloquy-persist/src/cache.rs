use colloquy_types::{ChatMessage, TRIGGER_MESSAGE};
use dashmap::DashMap;

/// Per-thread volatile transcripts used for instant rendering
///
/// No eviction of its own: entries go away when their thread is deleted,
/// which keeps the map bounded by the thread quota.
#[derive(Debug, Default)]
pub struct MessageCache {
    entries: DashMap<String, Vec<ChatMessage>>,
}

impl MessageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached transcript, empty when nothing is cached
    pub fn get(&self, thread_id: &str) -> Vec<ChatMessage> {
        self.entries
            .get(thread_id)
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    /// Overwrite the whole transcript
    pub fn set(&self, thread_id: &str, messages: Vec<ChatMessage>) {
        tracing::debug!(thread_id = %thread_id, count = messages.len(), "Cache overwritten");
        self.entries.insert(thread_id.to_string(), messages);
    }

    pub fn append(&self, thread_id: &str, message: ChatMessage) {
        self.entries
            .entry(thread_id.to_string())
            .or_default()
            .push(message);
    }

    pub fn clear(&self, thread_id: &str) {
        if self.entries.remove(thread_id).is_some() {
            tracing::debug!(thread_id = %thread_id, "Cache entry dropped");
        }
    }

    pub fn clear_all(&self) {
        self.entries.clear();
    }

    pub fn contains(&self, thread_id: &str) -> bool {
        self.entries.contains_key(thread_id)
    }

    /// Whether the cached transcript holds no real conversation
    ///
    /// Nothing cached, or only the warm-up trigger, counts as empty.
    pub fn is_effectively_empty(&self, thread_id: &str) -> bool {
        match self.entries.get(thread_id) {
            None => true,
            Some(messages) => match messages.as_slice() {
                [] => true,
                [only] => only.text == TRIGGER_MESSAGE,
                _ => false,
            },
        }
    }

    /// Whether any cached message was written by the user
    pub fn has_user_messages(&self, thread_id: &str) -> bool {
        self.entries
            .get(thread_id)
            .map(|messages| messages.iter().any(ChatMessage::is_user))
            .unwrap_or(false)
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

    #[test]
    fn test_get_missing_is_empty() {
        let cache = MessageCache::new();
        assert!(cache.get("nope").is_empty());
        assert!(!cache.contains("nope"));
    }

    #[test]
    fn test_append_creates_entry() {
        let cache = MessageCache::new();
        cache.append("1_a", ChatMessage::user("hi"));
        cache.append("1_a", ChatMessage::assistant("hello"));

        let messages = cache.get("1_a");
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_user());
    }

    #[test]
    fn test_set_overwrites_wholesale() {
        let cache = MessageCache::new();
        cache.append("1_a", ChatMessage::user("stale"));
        cache.set("1_a", vec![ChatMessage::assistant("fresh")]);

        assert_eq!(cache.get("1_a"), vec![ChatMessage::assistant("fresh")]);
    }

    #[test]
    fn test_clear_and_clear_all() {
        let cache = MessageCache::new();
        cache.append("1_a", ChatMessage::user("a"));
        cache.append("2_a", ChatMessage::user("b"));

        cache.clear("1_a");
        assert!(!cache.contains("1_a"));
        assert_eq!(cache.len(), 1);

        cache.clear_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_trigger_only_transcript_is_empty() {
        let cache = MessageCache::new();
        assert!(cache.is_effectively_empty("1_a"));

        cache.set("1_a", vec![ChatMessage::assistant(TRIGGER_MESSAGE)]);
        assert!(cache.is_effectively_empty("1_a"));

        cache.append("1_a", ChatMessage::user("real"));
        assert!(!cache.is_effectively_empty("1_a"));
        assert!(cache.has_user_messages("1_a"));
    }
}
