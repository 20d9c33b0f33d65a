//! Transport-facing types: inbound events, commands and replies.

use capify_core::{ActionToken, UserId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Inbound
// =============================================================================

/// Fixed command handlers, routed by the transport independently of
/// classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Start,
    Help,
    Track,
    Keyboard,
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::Start,
        Command::Help,
        Command::Track,
        Command::Keyboard,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Track => "track",
            Command::Keyboard => "keyboard",
        }
    }

    /// Parse a command token such as `track`, `/track` or `/track@capify_bot`.
    ///
    /// When `bot_username` is set, a `@mention` must name this bot.
    /// Returns `None` for anything that is not one of the known commands.
    pub fn parse(token: &str, bot_username: Option<&str>) -> Option<Self> {
        let token = token.trim();
        let token = token.strip_prefix('/').unwrap_or(token);
        let (name, mention) = match token.split_once('@') {
            Some((name, mention)) => (name, Some(mention)),
            None => (token, None),
        };
        if let (Some(mention), Some(expected)) = (mention, bot_username) {
            if !mention.eq_ignore_ascii_case(expected.trim_start_matches('@')) {
                return None;
            }
        }
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

/// What the transport received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundKind {
    Command(Command),
    /// A generic text message.
    Text(String),
    /// Callback payload from a pressed button.
    Callback(String),
}

/// One event delivered by the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inbound {
    pub user: UserId,
    /// Display name for greetings, when the transport knows it.
    pub display_name: Option<String>,
    pub kind: InboundKind,
}

impl Inbound {
    pub fn text(user: impl Into<UserId>, text: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            display_name: None,
            kind: InboundKind::Text(text.into()),
        }
    }

    pub fn command(user: impl Into<UserId>, command: Command) -> Self {
        Self {
            user: user.into(),
            display_name: None,
            kind: InboundKind::Command(command),
        }
    }

    pub fn callback(user: impl Into<UserId>, token: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            display_name: None,
            kind: InboundKind::Callback(token.into()),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

// =============================================================================
// Outbound
// =============================================================================

/// How the transport should interpret reply text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    #[default]
    Plain,
    Html,
}

/// A selectable option shown under a reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    pub label: String,
    /// Opaque payload handed back on press.
    pub token: String,
}

impl From<ActionToken> for ActionButton {
    fn from(action: ActionToken) -> Self {
        Self {
            label: action.label().to_string(),
            token: action.token().to_string(),
        }
    }
}

/// Extra interface attached to a reply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyMarkup {
    #[default]
    None,
    /// Ask the client to open a reply box addressed to the user.
    ForceReply { selective: bool },
    /// Rows of inline buttons.
    InlineKeyboard(Vec<Vec<ActionButton>>),
}

/// The single reply produced for one inbound event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub parse_mode: ParseMode,
    pub markup: ReplyMarkup,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: ParseMode::Html,
            ..Self::default()
        }
    }

    pub fn with_markup(mut self, markup: ReplyMarkup) -> Self {
        self.markup = markup;
        self
    }

    /// Buttons attached to this reply, flattened row by row.
    pub fn buttons(&self) -> Vec<&ActionButton> {
        match &self.markup {
            ReplyMarkup::InlineKeyboard(rows) => rows.iter().flatten().collect(),
            _ => Vec::new(),
        }
    }
}
