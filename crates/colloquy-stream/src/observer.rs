/// Callbacks driven by [`crate::StreamingClient::stream`]
///
/// All callbacks run on the task that drives the stream, between chunk reads.
pub trait StreamObserver: Send {
    /// Loading ends on the first content frame, on an error, or when the stream closes
    fn on_loading_change(&mut self, _loading: bool) {}

    /// A new chunk was appended; `reply` is the accumulated text so far
    fn on_content(&mut self, _chunk: &str, _reply: &str) {}

    fn on_scroll(&mut self) {}

    /// Full reply text once the stream completed with non-blank content
    fn on_speak(&mut self, _text: &str) {}

    /// The reply was replaced by `notice`
    fn on_error(&mut self, _notice: &str, _reply: &str) {}
}

/// Observer that ignores every callback
pub struct NoopObserver;

impl StreamObserver for NoopObserver {}
