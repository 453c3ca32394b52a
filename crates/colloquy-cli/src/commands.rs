/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: focus the input and send it
    Send(String),
    New,
    Home,
    Switch(String),
    Delete(String),
    Clear,
    List,
    Health,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let Some(rest) = line.strip_prefix('/') else {
            return Some(Command::Send(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        let command = match (name, arg) {
            ("new", _) => Command::New,
            ("home", _) => Command::Home,
            ("switch", id) if !id.is_empty() => Command::Switch(id.to_string()),
            ("delete", id) if !id.is_empty() => Command::Delete(id.to_string()),
            ("clear", _) => Command::Clear,
            ("list", _) | ("ls", _) => Command::List,
            ("health", _) => Command::Health,
            ("help", _) | ("?", _) => Command::Help,
            ("quit", _) | ("exit", _) => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        };
        Some(command)
    }
}

pub const HELP: &str = "\
commands:
  <text>          send a message on the current chat
  /new            start a new chat
  /home           leave the current chat
  /switch <id>    open a chat
  /delete <id>    delete a chat
  /clear          delete the current chat
  /list           list chats
  /health         check the agent backend
  /quit           exit";
