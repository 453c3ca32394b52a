/// Accumulates the assistant reply of a single turn
///
/// The bridge sometimes finishes a stream by replaying the whole reply as one
/// more content frame. A chunk that is byte-identical to everything
/// accumulated so far is treated as that replay and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyAccumulator {
    text: String,
    chunks: usize,
    discarded: usize,
}

impl ReplyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a content chunk
    ///
    /// Returns false when the chunk was discarded as a full-text replay.
    pub fn push(&mut self, content: &str) -> bool {
        if content == self.text {
            self.discarded += 1;
            return false;
        }

        self.text.push_str(content);
        self.chunks += 1;
        true
    }

    /// Overwrite the reply, e.g. with a failure notice
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of chunks appended
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Number of replayed chunks dropped
    pub fn discarded_count(&self) -> usize {
        self.discarded
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
