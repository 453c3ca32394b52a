use async_trait::async_trait;
use colloquy_types::{Quota, Thread};

/// Side effects owned by the presentation layer
///
/// Nothing the session decides depends on these calls.
pub trait SessionUi: Send + Sync {
    fn loading_changed(&self, _loading: bool) {}

    fn scroll_to_bottom(&self) {}

    /// Read a finished reply aloud
    fn speak(&self, _text: &str) {}
}

/// UI that renders nothing
pub struct NoopUi;

impl SessionUi for NoopUi {}

/// Asks the user whether the oldest thread may be sacrificed
#[async_trait]
pub trait OverflowPrompt: Send + Sync {
    async fn confirm_evict_oldest(&self, oldest: &Thread, quota: Quota) -> bool;
}

/// Prompt that always accepts the eviction
pub struct AlwaysConfirm;

#[async_trait]
impl OverflowPrompt for AlwaysConfirm {
    async fn confirm_evict_oldest(&self, _oldest: &Thread, _quota: Quota) -> bool {
        true
    }
}
