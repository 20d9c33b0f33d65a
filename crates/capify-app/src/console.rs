//! Line-oriented console transport.
//!
//! Stands in for the chat network: each stdin line becomes one inbound
//! event and each event gets one reply line (plus keyboard rows).
//!
//! Line syntax:
//! - `/track` : a command (unknown commands are not routed to the core)
//! - `#1` : a button press carrying callback token `1`
//! - anything else, including a blank line : a generic text message
//!
//! Any line may start with `@user ` to act as a different user.

use std::sync::Arc;

use capify_chat::{ChatError, ChatOrchestrator, Inbound, InboundKind, Reply, ReplyMarkup};
use capify_core::UserId;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// Outcome of reading one console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleLine {
    Event(Inbound),
    /// A `/command` the core has no handler for.
    UnknownCommand(String),
}

/// Console adapter around a [`ChatOrchestrator`].
pub struct ConsoleTransport {
    orchestrator: Arc<ChatOrchestrator>,
    default_user: UserId,
    display_name: Option<String>,
}

impl ConsoleTransport {
    pub fn new(
        orchestrator: Arc<ChatOrchestrator>,
        default_user: UserId,
        display_name: Option<String>,
    ) -> Self {
        Self {
            orchestrator,
            default_user,
            display_name,
        }
    }

    /// Turn one input line into an event.
    pub fn parse_line(&self, line: &str) -> ConsoleLine {
        let line = line.trim_end_matches(['\r', '\n']);
        let (user, rest, display_name) = match line.trim_start().strip_prefix('@') {
            Some(prefixed) => {
                let (id, rest) = prefixed
                    .split_once(char::is_whitespace)
                    .unwrap_or((prefixed, ""));
                if id.is_empty() {
                    (self.default_user.clone(), line, self.display_name.clone())
                } else {
                    (UserId::new(id), rest, None)
                }
            }
            None => (self.default_user.clone(), line, self.display_name.clone()),
        };

        let trimmed = rest.trim_start();
        let kind = if trimmed.starts_with('/') {
            let token = trimmed.split_whitespace().next().unwrap_or(trimmed);
            match self.orchestrator.parse_command(token) {
                Some(command) => InboundKind::Command(command),
                None => return ConsoleLine::UnknownCommand(token.to_string()),
            }
        } else if let Some(token) = trimmed.strip_prefix('#') {
            InboundKind::Callback(token.trim().to_string())
        } else {
            InboundKind::Text(rest.to_string())
        };

        ConsoleLine::Event(Inbound {
            user,
            display_name,
            kind,
        })
    }

    /// Read events until EOF, writing one reply per event.
    ///
    /// Returns the number of events handled.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut handled = 0;

        while let Some(line) = lines.next_line().await? {
            let event = match self.parse_line(&line) {
                ConsoleLine::Event(event) => event,
                ConsoleLine::UnknownCommand(token) => {
                    debug!(command = %token, "No handler for command");
                    continue;
                }
            };

            let output = format_reply(&self.orchestrator.dispatch(&event));
            writer.write_all(output.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
            handled += 1;
        }

        info!(handled, "Console input closed");
        Ok(handled)
    }
}

/// Render a reply (or error) the way the console shows it.
pub fn format_reply(result: &Result<Reply, ChatError>) -> String {
    match result {
        Ok(reply) => {
            let mut out = reply.text.clone();
            if let ReplyMarkup::InlineKeyboard(rows) = &reply.markup {
                for row in rows {
                    let buttons: Vec<String> = row
                        .iter()
                        .map(|b| format!("[{}: #{}]", b.label, b.token))
                        .collect();
                    out.push('\n');
                    out.push_str(&buttons.join(" "));
                }
            }
            out
        }
        Err(e) => format!("Sorry: {}", e),
    }
}
