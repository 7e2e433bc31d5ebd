//! Slash command parsing.
//!
//! Lines starting with `/` are commands; anything else is a message for the
//! selected room. A leading `//` sends the rest of the line, starting with a
//! single `/`, as a message.

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/list`
    List,
    /// `/join <room>`
    Join {
        /// Room to join.
        room: String,
    },
    /// `/leave [room]`, defaulting to the selected room.
    Leave {
        /// Room to leave, if named.
        room: Option<String>,
    },
    /// `/create <room>`
    Create {
        /// Name of the new room.
        room: String,
    },
    /// `/destroy <room>`
    Destroy {
        /// Room to destroy.
        room: String,
    },
    /// `/select <room>`
    Select {
        /// Room to view.
        room: String,
    },
    /// `/quit` or `/q`
    Quit,
    /// Plain text for the selected room.
    Message {
        /// Message body.
        text: String,
    },
    /// Unrecognized command name.
    Unknown {
        /// The command as typed, without the slash.
        input: String,
    },
    /// Recognized command with bad arguments.
    InvalidArgs {
        /// Command name.
        command: &'static str,
        /// What was wrong.
        error: &'static str,
    },
}

/// Parse one line of input.
pub fn parse(line: &str) -> Command {
    let Some(body) = line.strip_prefix('/') else {
        return Command::Message { text: line.to_string() };
    };
    if body.starts_with('/') {
        return Command::Message { text: body.to_string() };
    }

    let (name, rest) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
    let room = rest.trim();

    let with_room = |command: &'static str, build: fn(String) -> Command| {
        if room.is_empty() {
            Command::InvalidArgs { command, error: "missing room name" }
        } else {
            build(room.to_string())
        }
    };

    match name {
        "list" => Command::List,
        "join" => with_room("join", |room| Command::Join { room }),
        "leave" => Command::Leave { room: (!room.is_empty()).then(|| room.to_string()) },
        "create" => with_room("create", |room| Command::Create { room }),
        "destroy" => with_room("destroy", |room| Command::Destroy { room }),
        "select" => with_room("select", |room| Command::Select { room }),
        "quit" | "q" => Command::Quit,
        _ => Command::Unknown { input: body.to_string() },
    }
}
