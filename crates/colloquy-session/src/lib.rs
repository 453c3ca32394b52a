pub mod builder;
pub mod cleanup;
pub mod error;
pub mod orchestrator;
pub mod send;
pub mod ui;
pub mod view;

pub use builder::SessionBuilder;
pub use cleanup::CleanupReport;
pub use error::{Result, SessionError};
pub use orchestrator::SessionOrchestrator;
pub use ui::{AlwaysConfirm, NoopUi, OverflowPrompt, SessionUi};
pub use view::SessionView;
