//! Command parsing for the chat protocol.
//!
//! A line whose first character is `/` is a command; the first token is
//! upper-cased and matched against a fixed verb table. Everything else is
//! chat text. Parameter presence is checked by the handlers, after the
//! shared authentication guard has run.

/// Result of parsing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Line was empty or whitespace-only; silently discarded.
    Empty,
    /// Regular chat text for the sender's active room.
    Chat(String),
    /// A recognized or unknown command.
    Command(Command),
}

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the help text.
    Info,
    /// Claim a display name.
    Login(Option<String>),
    /// Give up the claimed name.
    Logout,
    /// Join a chatroom, creating it if needed.
    Join(Option<String>),
    /// Leave the named chatroom.
    Leave(Option<String>),
    /// Kick a user from a chatroom (admin only).
    Kick {
        room: Option<String>,
        name: Option<String>,
    },
    /// Block a user's messages.
    Block(Option<String>),
    /// List blocked users.
    Blocked,
    /// Send a private message.
    Pm {
        to: Option<String>,
        text: Option<String>,
    },
    /// List all chatrooms.
    Channels,
    /// Show the active chatroom.
    Channel,
    /// Show a chatroom's user count.
    Chatters(Option<String>),
    /// Show the connected-user count.
    Users,
    /// Show the caller's display name.
    WhoAmI,
    /// Look up the public IP.
    MyIp,
    /// Close the connection.
    Exit,
    /// Anything not in the verb table.
    Unknown(String),
}

impl Command {
    /// Whether the shared authentication guard applies to this command.
    ///
    /// `LOGIN` is the command that authenticates, so it runs unguarded;
    /// re-login while authenticated is rejected by the registry instead.
    /// Unknown verbs are exempt too: they get the fixed invalid-command
    /// reply regardless of login state.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Command::Info | Command::Exit | Command::Login(_) | Command::Unknown(_)
        )
    }

    /// Verb name for audit logging.
    pub fn verb(&self) -> &str {
        match self {
            Command::Info => "INFO",
            Command::Login(_) => "LOGIN",
            Command::Logout => "LOGOUT",
            Command::Join(_) => "JOIN",
            Command::Leave(_) => "LEAVE",
            Command::Kick { .. } => "KICK",
            Command::Block(_) => "BLOCK",
            Command::Blocked => "BLOCKED",
            Command::Pm { .. } => "PM",
            Command::Channels => "CHANNELS",
            Command::Channel => "CHANNEL",
            Command::Chatters(_) => "CHATTERS",
            Command::Users => "USERS",
            Command::WhoAmI => "WHOAMI",
            Command::MyIp => "MYIP",
            Command::Exit => "EXIT",
            Command::Unknown(verb) => verb,
        }
    }
}

/// Parse one trimmed input line.
pub fn parse(line: &str) -> Input {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Input::Empty;
    }

    if !trimmed.starts_with('/') {
        return Input::Chat(trimmed.to_string());
    }

    let tokens: Vec<&str> = trimmed[1..].split_whitespace().collect();
    let verb = tokens.first().map(|v| v.to_uppercase()).unwrap_or_default();
    let params = tokens.get(1..).unwrap_or_default();

    let arg = |i: usize| params.get(i).map(|s| s.to_string());
    let rest = |i: usize| {
        if params.len() > i {
            Some(params[i..].join(" "))
        } else {
            None
        }
    };

    let command = match verb.as_str() {
        "INFO" => Command::Info,
        "LOGIN" => Command::Login(arg(0)),
        "LOGOUT" => Command::Logout,
        "JOIN" => Command::Join(arg(0)),
        "LEAVE" => Command::Leave(arg(0)),
        "KICK" => Command::Kick {
            room: arg(0),
            name: arg(1),
        },
        "BLOCK" => Command::Block(arg(0)),
        "BLOCKED" => Command::Blocked,
        "PM" => Command::Pm {
            to: arg(0),
            text: rest(1),
        },
        "CHANNELS" => Command::Channels,
        "CHANNEL" => Command::Channel,
        "CHATTERS" => Command::Chatters(arg(0)),
        "USERS" => Command::Users,
        "WHOAMI" => Command::WhoAmI,
        "MYIP" => Command::MyIp,
        "EXIT" => Command::Exit,
        _ => Command::Unknown(verb),
    };

    Input::Command(command)
}
