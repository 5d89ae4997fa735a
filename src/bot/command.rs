use crate::session::Direction;

// Available slash commands: (command, description)
pub const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/start", "Show the direction keyboard"),
    ("/translate", "Translate text: /translate <lang> <text>"),
    ("/history", "Show your last translations"),
    ("/stats", "Show your usage statistics"),
    ("/languages", "List supported languages"),
    ("/help", "Show available commands"),
];

/// Slash command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    /// `/translate <lang> <text>`; either part may be missing and is
    /// validated by the router.
    Translate {
        lang: Option<String>,
        text: String,
    },
    History,
    Stats,
    Languages,
    Unknown(String),
}

/// Inbound message kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A reply-keyboard button; the transport delivers it as its label text.
    Button(Direction),
    Text(String),
    Command(BotCommand),
    Empty,
}

pub fn parse_input(input: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }

    if let Some(direction) = Direction::from_label(input) {
        return Input::Button(direction);
    }

    input
        .strip_prefix('/')
        .map_or_else(|| Input::Text(input.to_string()), parse_slash_command)
}

fn parse_slash_command(cmd: &str) -> Input {
    let (head, rest) = split_first_word(cmd);
    // Group chats address commands as /name@bot_username
    let name = head.split('@').next().unwrap_or(head);

    let command = match name {
        "start" => BotCommand::Start,
        "help" => BotCommand::Help,
        "translate" | "t" => {
            let (lang, text) = split_first_word(rest);
            BotCommand::Translate {
                lang: (!lang.is_empty()).then(|| lang.to_string()),
                text: text.to_string(),
            }
        }
        "history" => BotCommand::History,
        "stats" => BotCommand::Stats,
        "languages" | "langs" => BotCommand::Languages,
        _ => BotCommand::Unknown(name.to_string()),
    };

    Input::Command(command)
}

/// Splits off the first whitespace-delimited word; the remainder keeps its
/// inner formatting but is trimmed at both ends.
fn split_first_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim()),
        None => (s, ""),
    }
}
