//! Chat orchestrator: central coordinator wiring classifier, sessions,
//! updater and presenter.
//!
//! Routes commands, generic text and button callbacks to exactly one reply.

use std::sync::Arc;

use capify_core::config::{CapifyConfig, PresenterConfig};
use capify_core::{ActionToken, Draft, Taxonomy, UserId};
use tracing::{debug, warn};

use crate::classifier::FieldClassifier;
use crate::error::ChatError;
use crate::presenter::Presenter;
use crate::session::SessionStore;
use crate::types::{Command, Inbound, InboundKind, Reply};
use crate::updater::DraftUpdater;

/// Central chat orchestrator.
///
/// Safe to share across threads; per-user work is serialized by the
/// session store.
#[derive(Debug)]
pub struct ChatOrchestrator {
    classifier: FieldClassifier,
    sessions: SessionStore,
    updater: DraftUpdater,
    presenter: Presenter,
    bot_username: Option<String>,
}

impl ChatOrchestrator {
    /// Build an orchestrator from loaded configuration.
    pub fn new(config: &CapifyConfig) -> Result<Self, ChatError> {
        let taxonomy = config.taxonomy.build()?;
        let mut orchestrator = Self::with_parts(taxonomy, config.presenter.clone());
        orchestrator.bot_username = config.bot.username.clone();
        Ok(orchestrator)
    }

    /// Build an orchestrator from an explicit taxonomy and placeholders.
    pub fn with_parts(taxonomy: Taxonomy, placeholders: PresenterConfig) -> Self {
        Self {
            classifier: FieldClassifier::new(Arc::new(taxonomy)),
            sessions: SessionStore::new(),
            updater: DraftUpdater,
            presenter: Presenter::new(placeholders),
            bot_username: None,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn classifier(&self) -> &FieldClassifier {
        &self.classifier
    }

    /// Parse a command token against this bot's username.
    pub fn parse_command(&self, token: &str) -> Option<Command> {
        Command::parse(token, self.bot_username.as_deref())
    }

    /// Single entry point for transport events.
    pub fn dispatch(&self, event: &Inbound) -> Result<Reply, ChatError> {
        match &event.kind {
            InboundKind::Command(command) => {
                self.handle_command(&event.user, event.display_name.as_deref(), *command)
            }
            InboundKind::Text(text) => self.handle_message(&event.user, text),
            InboundKind::Callback(token) => self.handle_callback(&event.user, token),
        }
    }

    /// Handle one of the fixed commands. None of them mutate the draft.
    pub fn handle_command(
        &self,
        user: &UserId,
        display_name: Option<&str>,
        command: Command,
    ) -> Result<Reply, ChatError> {
        debug!(user = %user, command = command.name(), "Handling command");
        match command {
            Command::Start => Ok(self.presenter.greeting(user, display_name)),
            Command::Help => Ok(self.presenter.help()),
            Command::Track => {
                let draft = self.current_draft(user);
                Ok(Reply::plain(self.presenter.render(&draft)))
            }
            Command::Keyboard => {
                let draft = self.current_draft(user);
                Ok(self.presenter.render_editable(&draft))
            }
        }
    }

    /// Classify a generic message, store it, and acknowledge it.
    ///
    /// Never rejects the text: anything that is not a more specific field
    /// becomes the description.
    pub fn handle_message(&self, user: &UserId, text: &str) -> Result<Reply, ChatError> {
        let text = text.trim();
        let kind = self.classifier.classify(text);
        let draft = self.updater.apply_to(&self.sessions, user, kind, text)?;
        Ok(Reply::plain(self.presenter.confirmation(&draft, kind)))
    }

    /// Handle a pressed Edit / Confirm button.
    ///
    /// The buttons are rendered but not wired to any state change yet, so
    /// known tokens report `ActionNotSupported` and leave the draft alone.
    pub fn handle_callback(&self, user: &UserId, token: &str) -> Result<Reply, ChatError> {
        let action = ActionToken::from_token(token)
            .ok_or_else(|| ChatError::UnknownAction(token.to_string()))?;
        warn!(user = %user, action = %action, "Draft action is not supported");
        Err(ChatError::ActionNotSupported(action))
    }

    /// Current draft for `user`, creating an empty session on first contact.
    pub fn current_draft(&self, user: &UserId) -> Draft {
        self.sessions.draft(user)
    }
}

impl Default for ChatOrchestrator {
    fn default() -> Self {
        Self::with_parts(Taxonomy::default(), PresenterConfig::default())
    }
}

// =============================================================================
// Tests
// =============================================================================
