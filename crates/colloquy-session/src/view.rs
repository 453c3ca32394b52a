use colloquy_types::ChatMessage;

/// What the conversation pane shows
///
/// `thread_id` is also the pointer to the thread whose live messages are
/// flushed into the cache when the user switches away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionView {
    pub thread_id: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub loading: bool,
}

impl SessionView {
    pub fn for_thread(thread_id: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            messages,
            loading: false,
        }
    }

    pub fn shows(&self, thread_id: &str) -> bool {
        self.thread_id.as_deref() == Some(thread_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shows() {
        let view = SessionView::for_thread("1_a", vec![]);
        assert!(view.shows("1_a"));
        assert!(!view.shows("2_a"));
        assert!(!SessionView::default().shows("1_a"));
    }
}
