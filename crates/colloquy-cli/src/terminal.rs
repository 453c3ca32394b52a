use async_trait::async_trait;
use colloquy_session::{OverflowPrompt, SessionUi, SessionView};
use colloquy_types::{ChatMessage, Quota, Role, Thread};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// Standard input shared by the command loop and the overflow prompt
pub type Input = Arc<Mutex<Lines<BufReader<Stdin>>>>;

pub fn stdin_lines() -> Input {
    Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()))
}

pub fn flush() {
    let _ = std::io::stdout().flush();
}

pub struct TerminalUi;

impl SessionUi for TerminalUi {
    fn speak(&self, text: &str) {
        tracing::debug!(chars = text.chars().count(), "Reply ready for speech");
    }
}

/// Asks on the terminal before the oldest chat is sacrificed
pub struct TerminalPrompt {
    input: Input,
}

impl TerminalPrompt {
    pub fn new(input: Input) -> Self {
        Self { input }
    }
}

#[async_trait]
impl OverflowPrompt for TerminalPrompt {
    async fn confirm_evict_oldest(&self, oldest: &Thread, quota: Quota) -> bool {
        print!(
            "Maximum number of chats reached ({}). Send anyway and delete \"{}\"? [y/N] ",
            quota, oldest.name
        );
        flush();

        let mut input = self.input.lock().await;
        match input.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim(), "y" | "Y" | "yes"),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read confirmation");
                false
            }
        }
    }
}

/// Tracks what of the session view has already been printed
#[derive(Debug, Default)]
pub struct Cursor {
    thread_id: Option<String>,
    count: usize,
    printed: String,
    loading: bool,
}

fn label(message: &ChatMessage) -> &'static str {
    match message.role {
        Role::User => "you",
        Role::Assistant => "agent",
        Role::Other => "system",
    }
}

fn transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}\n", label(m), m.text))
        .collect()
}

impl Cursor {
    /// Text to print to bring the terminal up to date with `view`
    pub fn advance(&mut self, view: &SessionView) -> String {
        let mut out = String::new();
        let last_text = view
            .messages
            .last()
            .map(|m| m.text.clone())
            .unwrap_or_default();

        if view.thread_id != self.thread_id {
            if let Some(id) = &view.thread_id {
                out.push_str(&format!("--- chat {} ---\n", id));
                out.push_str(&transcript(&view.messages));
            }
        } else if view.messages.len() == self.count + 2 && view.loading {
            let user = &view.messages[view.messages.len() - 2];
            out.push_str(&format!("{}: {}\nagent: {}", label(user), user.text, last_text));
        } else if view.messages.len() != self.count {
            out.push_str(&transcript(&view.messages));
        } else if let Some(rest) = last_text.strip_prefix(self.printed.as_str()) {
            out.push_str(rest);
        } else {
            out.push('\n');
            out.push_str(&last_text);
        }

        if self.loading && !view.loading && view.thread_id == self.thread_id {
            out.push('\n');
        }

        self.thread_id = view.thread_id.clone();
        self.count = view.messages.len();
        self.printed = last_text;
        self.loading = view.loading;
        out
    }
}

/// Print view updates as they are published
pub fn spawn_renderer(mut view: watch::Receiver<SessionView>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut cursor = Cursor::default();
        while view.changed().await.is_ok() {
            let snapshot = view.borrow_and_update().clone();
            let out = cursor.advance(&snapshot);
            if !out.is_empty() {
                print!("{}", out);
                flush();
            }
        }
    })
}
